//! Edit widget editing.
//!
//! An Edit widget has two sub-states. Not editing: Enter copies the host's
//! text into a transient [`EditState`] and starts editing. Editing: the host
//! gets first refusal on every key, then the built-in editor handles it:
//! - Left/Right/Home/End move the cursor
//! - Backspace/Delete remove one character, or with Ctrl the whole prefix or
//!   suffix
//! - Tab inserts spaces
//! - Enter commits to the host, Esc discards
//! - any other unmodified text is inserted at the cursor

use unicode_width::UnicodeWidthChar;

use crate::engine::{EngineContext, Widget};
use crate::state::{EditState, WidgetHost};

use super::keycode::{Key, KeyCode};

// =============================================================================
// Buffer operations
// =============================================================================

/// What a key did to the edit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOutcome {
    Changed,
    Moved,
    Commit,
    Cancel,
    Ignored,
}

impl EditState {
    fn byte_at(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map_or(self.buffer.len(), |(b, _)| b)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert text at the cursor.
    pub fn insert(&mut self, text: &str) {
        let at = self.byte_at(self.cursor);
        self.buffer.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Delete everything before the cursor.
    pub fn erase_prefix(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_at(self.cursor);
        self.buffer.drain(..at);
        self.cursor = 0;
        true
    }

    /// Delete everything from the cursor on.
    pub fn erase_suffix(&mut self) -> bool {
        let at = self.byte_at(self.cursor);
        if at >= self.buffer.len() {
            return false;
        }
        self.buffer.truncate(at);
        true
    }

    pub fn move_by(&mut self, delta: isize) {
        let len = self.char_len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    pub fn move_to(&mut self, pos: usize) {
        self.cursor = pos.min(self.char_len());
    }

    pub(crate) fn apply_key(&mut self, kc: &KeyCode, tab_spaces: usize) -> EditOutcome {
        if let Some(key) = kc.special() {
            let changed = |done: bool| if done { EditOutcome::Changed } else { EditOutcome::Moved };
            return match key {
                Key::Left => {
                    self.move_by(-1);
                    EditOutcome::Moved
                }
                Key::Right => {
                    self.move_by(1);
                    EditOutcome::Moved
                }
                Key::Home => {
                    self.move_to(0);
                    EditOutcome::Moved
                }
                Key::End => {
                    self.move_to(usize::MAX);
                    EditOutcome::Moved
                }
                Key::Backspace if kc.ctrl() => changed(self.erase_prefix()),
                Key::Backspace => changed(self.backspace()),
                Key::Delete if kc.ctrl() => changed(self.erase_suffix()),
                Key::Delete => changed(self.delete()),
                Key::Tab if !kc.has_modifiers() => {
                    self.insert(&" ".repeat(tab_spaces));
                    EditOutcome::Changed
                }
                Key::Enter => EditOutcome::Commit,
                Key::Esc => EditOutcome::Cancel,
                _ => EditOutcome::Ignored,
            };
        }

        if kc.ctrl() || kc.alt() {
            return EditOutcome::Ignored;
        }
        match kc.text_seq().and_then(|t| t.as_str()) {
            Some(text) if !text.chars().any(char::is_control) => {
                self.insert(text);
                EditOutcome::Changed
            }
            _ => EditOutcome::Ignored,
        }
    }
}

/// Visible window of an edit field `width` cells wide: characters scrolled
/// off the left, and the cursor column within the field.
pub(crate) fn edit_view(edit: &EditState, width: usize) -> (usize, usize) {
    let skip = edit.cursor.saturating_sub(width.max(1) - 1);
    let col = edit
        .buffer
        .chars()
        .skip(skip)
        .take(edit.cursor - skip)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    (skip, col)
}

// =============================================================================
// Dispatch
// =============================================================================

pub(crate) fn begin_edit<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget) {
    let text = ctx.host.edit_text(w);
    tracing::debug!(id = w.id, "edit begin");
    ctx.host.focus_state_mut().edit = Some(EditState::new(w.id, &text));
    ctx.invalidate(w.id);
    ctx.update_cursor();
}

/// Keyboard input for a focused Edit widget.
pub(crate) fn handle_key<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    kc: &KeyCode,
) -> bool {
    let editing = ctx.host.focus_state().edit_of(w.id).is_some();
    if !editing {
        if kc.is_plain(Key::Enter) {
            begin_edit(ctx, w);
            return true;
        }
        return false;
    }

    let Some(mut edit) = ctx.host.focus_state_mut().edit.take() else {
        return false;
    };

    if ctx.host.on_edit_input_evt(w, kc, &mut edit) {
        ctx.host.focus_state_mut().edit = Some(edit);
        ctx.invalidate(w.id);
        ctx.update_cursor();
        return true;
    }

    match edit.apply_key(kc, ctx.config.edit_tab_spaces) {
        EditOutcome::Commit => {
            tracing::debug!(id = w.id, "edit commit");
            ctx.host.on_edit_change(w, &edit.buffer);
            ctx.invalidate(w.id);
            ctx.update_cursor();
        }
        EditOutcome::Cancel => {
            tracing::debug!(id = w.id, "edit cancelled");
            ctx.invalidate(w.id);
            ctx.update_cursor();
        }
        EditOutcome::Changed | EditOutcome::Moved => {
            ctx.host.focus_state_mut().edit = Some(edit);
            ctx.invalidate(w.id);
            ctx.update_cursor();
        }
        EditOutcome::Ignored => {
            ctx.host.focus_state_mut().edit = Some(edit);
            return false;
        }
    }
    true
}

/// Left click inside an Edit at screen column `col`.
///
/// While editing the cursor jumps to the clicked character; a click on an
/// Edit that already had focus starts editing.
pub(crate) fn click<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    field_col: u16,
    col: u16,
    was_focused: bool,
) -> bool {
    let width = w.size.width as usize;
    let Some(edit) = ctx.host.focus_state_mut().edit.as_mut().filter(|e| e.widget == w.id) else {
        if was_focused {
            begin_edit(ctx, w);
            return true;
        }
        return false;
    };

    let (skip, _) = edit_view(edit, width);
    let target = col.saturating_sub(field_col) as usize;
    let mut used = 0;
    let mut pos = skip;
    for c in edit.buffer.chars().skip(skip) {
        let cw = c.width().unwrap_or(0);
        if used + cw > target {
            break;
        }
        used += cw;
        pos += 1;
    }
    edit.move_to(pos);
    ctx.invalidate(w.id);
    ctx.update_cursor();
    true
}
