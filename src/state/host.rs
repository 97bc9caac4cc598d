//! Host interface - what the application supplies to the engine.
//!
//! Split by capability so an application implements only what it uses:
//! - [`FocusStore`]: where the focus state lives (required)
//! - [`WidgetQueries`]: per-widget state getters, all defaulted
//! - [`WidgetEvents`]: interaction notifications, all defaulted to no-ops
//!
//! Anything implementing the last two is a [`WidgetHost`].

use std::io::{self, Write};

use crate::engine::widget::{Widget, WidgetKind};
use crate::input::keycode::KeyCode;
use crate::types::{Coord, Rect, WidgetId};

use super::focus::{EditState, FocusState};

// =============================================================================
// State snapshots
// =============================================================================

/// List box rows as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListBoxState {
    /// Highlighted row.
    pub item: Option<usize>,
    /// Committed selection.
    pub selected: Option<usize>,
    pub count: usize,
}

/// Combo box state as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboBoxState {
    /// Highlighted candidate (while open) or current value.
    pub item: usize,
    pub selected: usize,
    pub count: usize,
    pub drop_down: bool,
}

/// Read-only text box content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBoxState<'a> {
    pub lines: &'a [String],
    pub top_line: usize,
    /// Content replaced since the last query; scrolling restarts at the top.
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressBarState {
    pub pos: u32,
    pub max: u32,
}

// =============================================================================
// Traits
// =============================================================================

/// Access to the host-owned [`FocusState`].
pub trait FocusStore {
    fn focus_state(&self) -> &FocusState;
    fn focus_state_mut(&mut self) -> &mut FocusState;
}

/// Widget state queries. Override only what your widgets need.
pub trait WidgetQueries: FocusStore {
    fn is_enabled(&self, _w: &Widget) -> bool {
        true
    }

    /// This widget's own visibility; ancestors are checked by the engine.
    fn is_visible(&self, _w: &Widget) -> bool {
        true
    }

    fn is_focused(&self, w: &Widget) -> bool {
        self.focus_state().focused() == w.id
    }

    /// Screen position of a floating window, overriding its declared coord.
    fn window_coord(&self, _w: &Widget) -> Option<Coord> {
        None
    }

    fn window_title(&self, _w: &Widget) -> Option<String> {
        None
    }

    fn checkbox_checked(&self, _w: &Widget) -> bool {
        false
    }

    /// `radio_id` of the selected radio in `w`'s group.
    fn radio_index(&self, _w: &Widget) -> Option<u16> {
        None
    }

    fn page_ctrl_page_index(&self, _w: &Widget) -> usize {
        0
    }

    fn list_box_state(&self, _w: &Widget) -> ListBoxState {
        ListBoxState::default()
    }

    fn list_box_item(&self, _w: &Widget, _idx: usize) -> String {
        String::new()
    }

    fn combo_box_state(&self, _w: &Widget) -> ComboBoxState {
        ComboBoxState::default()
    }

    fn combo_box_item(&self, _w: &Widget, _idx: usize) -> String {
        String::new()
    }

    fn text_box_state(&self, _w: &Widget) -> TextBoxState<'_> {
        TextBoxState::default()
    }

    fn progress_bar_state(&self, _w: &Widget) -> ProgressBarState {
        ProgressBarState::default()
    }

    fn led_lit(&self, _w: &Widget) -> bool {
        false
    }

    fn edit_text(&self, _w: &Widget) -> String {
        String::new()
    }

    /// Label text; defaults to the text declared on the widget.
    fn label_text(&self, w: &Widget) -> String {
        match &w.kind {
            WidgetKind::Label(p) => p.text.clone(),
            _ => String::new(),
        }
    }
}

/// Interaction notifications. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait WidgetEvents {
    /// Request a redraw of `id`.
    fn invalidate(&mut self, id: WidgetId) {}

    fn on_button_down(&mut self, w: &Widget, kc: &KeyCode) {}
    fn on_button_up(&mut self, w: &Widget, kc: &KeyCode) {}
    fn on_checkbox_toggle(&mut self, w: &Widget) {}
    fn on_radio_select(&mut self, w: &Widget) {}

    /// Edit committed with the final text.
    fn on_edit_change(&mut self, w: &Widget, text: &str) {}

    /// First refusal on every key while editing. Return `true` when the key
    /// was consumed (the buffer may have been changed).
    fn on_edit_input_evt(&mut self, w: &Widget, kc: &KeyCode, edit: &mut EditState) -> bool {
        false
    }

    fn on_page_control_page_change(&mut self, w: &Widget, page: usize) {}
    fn on_list_box_select(&mut self, w: &Widget, idx: usize) {}
    fn on_list_box_change(&mut self, w: &Widget, idx: usize) {}
    fn on_combo_box_select(&mut self, w: &Widget, idx: usize) {}
    fn on_combo_box_change(&mut self, w: &Widget, idx: usize) {}
    fn on_combo_box_drop(&mut self, w: &Widget, open: bool) {}
    fn on_text_box_scroll(&mut self, w: &Widget, top_line: usize) {}

    fn on_custom_widget_draw(&mut self, w: &Widget, rect: Rect, out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn on_custom_widget_input_evt(&mut self, w: &Widget, kc: &KeyCode) -> bool {
        false
    }

    /// Last stop for input nobody else handled; `w` is the root window.
    fn on_window_unhandled_input_evt(&mut self, w: &Widget, kc: &KeyCode) -> bool {
        false
    }
}

/// The complete host interface.
pub trait WidgetHost: WidgetQueries + WidgetEvents {}

impl<T: WidgetQueries + WidgetEvents + ?Sized> WidgetHost for T {}
