//! Focus state - owned by the host, mutated by the engine.
//!
//! Holds:
//! - `focused` signal (currently focused widget id, `WIDGET_ID_NONE` if none)
//! - the transient edit buffer while an Edit widget is in edit mode
//! - the button currently held down by the mouse
//!
//! The focused id lives in a `spark_signals::Signal`, so an application can
//! observe focus changes (status lines, help text) by cloning the signal.

use std::fmt;

use spark_signals::{signal, Signal};

use crate::types::{WidgetId, WIDGET_ID_NONE};

// =============================================================================
// EditState
// =============================================================================

/// Transient text of an Edit widget in edit mode.
///
/// `cursor` counts characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub widget: WidgetId,
    pub buffer: String,
    pub cursor: usize,
}

impl EditState {
    /// Start editing `text` with the cursor at its end.
    pub fn new(widget: WidgetId, text: &str) -> Self {
        Self {
            widget,
            buffer: text.to_string(),
            cursor: text.chars().count(),
        }
    }
}

// =============================================================================
// FocusState
// =============================================================================

pub struct FocusState {
    focused: Signal<WidgetId>,
    pub(crate) edit: Option<EditState>,
    pub(crate) pressed: Option<WidgetId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self {
            focused: signal(WIDGET_ID_NONE),
            edit: None,
            pressed: None,
        }
    }

    /// Currently focused widget id.
    #[inline]
    pub fn focused(&self) -> WidgetId {
        self.focused.get()
    }

    /// Check if any widget is focused.
    pub fn has_focus(&self) -> bool {
        self.focused() != WIDGET_ID_NONE
    }

    /// Handle to the focused-id signal.
    pub fn focused_signal(&self) -> Signal<WidgetId> {
        self.focused.clone()
    }

    pub(crate) fn set_focused(&mut self, id: WidgetId) {
        self.focused.set(id);
    }

    /// Edit buffer, while an Edit widget is in edit mode.
    pub fn edit(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    /// Edit buffer of `id`, if that widget is the one being edited.
    pub fn edit_of(&self, id: WidgetId) -> Option<&EditState> {
        self.edit.as_ref().filter(|e| e.widget == id)
    }

    /// Button held down by the mouse.
    pub fn pressed(&self) -> Option<WidgetId> {
        self.pressed
    }
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FocusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusState")
            .field("focused", &self.focused())
            .field("edit", &self.edit)
            .field("pressed", &self.pressed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_follows_focus() {
        let mut st = FocusState::new();
        let sig = st.focused_signal();
        assert!(!st.has_focus());
        st.set_focused(7);
        assert_eq!(sig.get(), 7);
        assert_eq!(st.focused(), 7);
    }

    #[test]
    fn test_edit_cursor_counts_chars() {
        let e = EditState::new(3, "żółw");
        assert_eq!(e.cursor, 4);
    }

    #[test]
    fn test_edit_of_filters_by_widget() {
        let mut st = FocusState::new();
        st.edit = Some(EditState::new(5, "x"));
        assert!(st.edit_of(5).is_some());
        assert!(st.edit_of(6).is_none());
    }
}
