//! Keyboard dispatch chain.
//!
//! Routes a decoded key through:
//! 1. The focused widget's kind handler (Edit, CheckBox, Radio, Button,
//!    PageCtrl, ListBox, ComboBox, TextBox, Custom)
//! 2. Page keys (PgUp/PgDown/F11/F12) → nearest enclosing PageCtrl
//! 3. Global keys: Tab / Shift+Tab → focus navigation, Esc → focus parent
//! 4. Host fallback on the root window

use std::time::Duration;

use crate::engine::{EngineContext, Widget, WidgetKind};
use crate::state::WidgetHost;

use super::focus::next_focusable;
use super::keycode::{Key, KeyCode};
use super::scroll::{clamp_scroll, step_circular, step_from};
use super::text_edit;

/// Route a key. Returns true if it was consumed.
pub fn process_key<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, kc: &KeyCode) -> bool {
    let tree = ctx.tree;
    let focused = ctx.host.focus_state().focused();
    let Some(w) = tree.get_widget_by_id(focused) else {
        tracing::trace!(key = %kc, "no focused widget");
        return false;
    };

    // 1. Kind handler
    let mut handled = ctx.host.is_enabled(w) && dispatch_kind(ctx, w, kc);

    // 2. Page keys bubble to the enclosing page control
    if !handled && page_step(kc).is_some() && !matches!(w.kind, WidgetKind::PageCtrl(_)) {
        if let Some(pc) = tree.find_ancestor(w, |a| matches!(a.kind, WidgetKind::PageCtrl(_))) {
            handled = key_page_ctrl(ctx, pc, kc);
        }
    }

    // 3. Global keys
    if !handled && kc.is_special() {
        handled = global_key(ctx, w, kc);
    }

    // 4. Host fallback
    if !handled {
        handled = ctx.host.on_window_unhandled_input_evt(tree.root(), kc);
    }
    tracing::trace!(key = %kc, id = w.id, handled, "key dispatched");
    handled
}

fn dispatch_kind<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) -> bool {
    match &w.kind {
        WidgetKind::Edit(_) => text_edit::handle_key(ctx, w, kc),
        WidgetKind::CheckBox(_) if is_activate(kc) => {
            ctx.host.on_checkbox_toggle(w);
            ctx.invalidate(w.id);
            true
        }
        WidgetKind::Radio(_) if is_activate(kc) => {
            select_radio(ctx, w);
            true
        }
        WidgetKind::Button(_) if kc.is_plain(Key::Enter) => {
            press_button(ctx, w, kc);
            true
        }
        WidgetKind::PageCtrl(_) => key_page_ctrl(ctx, w, kc),
        WidgetKind::ListBox(_) => key_list_box(ctx, w, kc),
        WidgetKind::ComboBox(_) => key_combo_box(ctx, w, kc),
        WidgetKind::TextBox(_) => key_text_box(ctx, w, kc),
        WidgetKind::Custom => ctx.host.on_custom_widget_input_evt(w, kc),
        _ => false,
    }
}

fn global_key<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) -> bool {
    match kc.special() {
        Some(Key::Tab) if !kc.ctrl() && !kc.alt() => {
            ctx.focus_next(!kc.shift());
            true
        }
        Some(Key::Esc) if !kc.has_modifiers() => match ctx.tree.parent(w) {
            Some(parent) => {
                ctx.change_focus_to(parent.id);
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn is_activate(kc: &KeyCode) -> bool {
    kc.is_char(' ') || kc.is_plain(Key::Enter)
}

// =============================================================================
// CheckBox / Radio / Button
// =============================================================================

/// Select a radio and invalidate every sibling radio of the same group.
pub(crate) fn select_radio<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget) {
    let WidgetKind::Radio(props) = &w.kind else {
        return;
    };
    ctx.host.on_radio_select(w);

    let tree = ctx.tree;
    let Some(parent) = tree.parent(w) else {
        return;
    };
    for sib in tree.children(parent) {
        if let WidgetKind::Radio(p) = &sib.kind {
            if p.group_id == props.group_id {
                ctx.invalidate(sib.id);
            }
        }
    }
}

/// Keyboard click: press, redraw, hold, release.
fn press_button<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) {
    ctx.host.focus_state_mut().pressed = Some(w.id);
    ctx.host.on_button_down(w, kc);
    ctx.invalidate(w.id);
    ctx.redraw_now(w.id);

    ctx.platform.sleep(Duration::from_millis(ctx.config.button_hold_ms));

    ctx.host.on_button_up(w, kc);
    ctx.host.focus_state_mut().pressed = None;
    ctx.invalidate(w.id);
}

// =============================================================================
// PageCtrl
// =============================================================================

fn page_step(kc: &KeyCode) -> Option<isize> {
    if kc.has_modifiers() {
        return None;
    }
    match kc.special()? {
        Key::PgUp | Key::F(11) => Some(-1),
        Key::PgDown | Key::F(12) => Some(1),
        _ => None,
    }
}

fn key_page_ctrl<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) -> bool {
    let Some(delta) = page_step(kc) else {
        return false;
    };
    let count = ctx.tree.children(w).len();
    if count == 0 {
        return false;
    }
    let cur = ctx.host.page_ctrl_page_index(w);
    if cur >= count {
        tracing::warn!(id = w.id, page = cur, count, "page index out of range");
    }
    select_page(ctx, w, step_circular(cur, delta, count));
    true
}

/// Switch `pc` to `page`, cancelling any edit and focusing the first
/// focusable widget of the new page (the control itself if none).
pub(crate) fn select_page<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, pc: &Widget, page: usize) {
    let tree = ctx.tree;
    let Some(page_w) = tree.children(pc).get(page) else {
        return;
    };
    tracing::debug!(id = pc.id, page, "page change");
    ctx.cancel_edit();
    ctx.host.on_page_control_page_change(pc, page);
    ctx.invalidate(pc.id);

    let target = next_focusable(tree, &*ctx.host, page_w, None, true).unwrap_or(pc.id);
    if !ctx.change_focus_to(target) {
        ctx.update_cursor();
    }
}

// =============================================================================
// ListBox
// =============================================================================

fn key_list_box<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) -> bool {
    let st = ctx.host.list_box_state(w);
    if st.count == 0 || kc.has_modifiers() {
        return false;
    }
    let cur = st.item.unwrap_or(0);
    let page = w.inner_rows() as isize;

    let delta = match kc.special() {
        Some(Key::Up) => -1,
        Some(Key::Down) => 1,
        Some(Key::PgUp) => -page,
        Some(Key::PgDown) => page,
        Some(Key::Enter) => {
            if st.selected != Some(cur) {
                ctx.host.on_list_box_select(w, cur);
                ctx.invalidate(w.id);
            }
            return true;
        }
        _ => return false,
    };
    move_list_item(ctx, w, step_from(st.item, delta, st.count));
    true
}

pub(crate) fn move_list_item<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, item: usize) {
    if ctx.host.list_box_state(w).item != Some(item) {
        ctx.host.on_list_box_change(w, item);
        ctx.invalidate(w.id);
        ctx.update_cursor();
    }
}

// =============================================================================
// ComboBox
// =============================================================================

fn key_combo_box<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) -> bool {
    let st = ctx.host.combo_box_state(w);
    if kc.is_char(' ') {
        set_drop_down(ctx, w, !st.drop_down);
        return true;
    }
    if !st.drop_down || kc.has_modifiers() {
        return false;
    }

    let WidgetKind::ComboBox(props) = &w.kind else {
        return false;
    };
    let page = props.drop_down_size.max(1) as isize;
    let delta = match kc.special() {
        Some(Key::Up) => -1,
        Some(Key::Down) => 1,
        Some(Key::PgUp) => -page,
        Some(Key::PgDown) => page,
        Some(Key::Enter) => {
            commit_combo(ctx, w, st.item);
            return true;
        }
        Some(Key::Esc) => {
            set_drop_down(ctx, w, false);
            return true;
        }
        _ => return false,
    };
    if st.count > 0 {
        let item = step_circular(st.item, delta, st.count);
        ctx.host.on_combo_box_change(w, item);
        ctx.invalidate(w.id);
    }
    true
}

pub(crate) fn set_drop_down<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, open: bool) {
    tracing::debug!(id = w.id, open, "combo drop-down");
    ctx.host.on_combo_box_drop(w, open);
    ctx.invalidate(w.id);
    if !open {
        // the overlay covered whatever lies below the combo
        let root = ctx.tree.root().id;
        ctx.invalidate(root);
    }
}

pub(crate) fn commit_combo<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, item: usize) {
    ctx.host.on_combo_box_select(w, item);
    set_drop_down(ctx, w, false);
}

// =============================================================================
// TextBox
// =============================================================================

fn key_text_box<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, kc: &KeyCode) -> bool {
    if kc.has_modifiers() {
        return false;
    }
    let page = w.inner_rows() as isize;
    let delta = match kc.special() {
        Some(Key::Up) => -1,
        Some(Key::Down) => 1,
        Some(Key::PgUp) => -page,
        Some(Key::PgDown) => page,
        _ => return false,
    };
    scroll_text_box(ctx, w, delta);
    true
}

/// Scroll by `delta` lines, clamped; a changed line list restarts at 0.
pub(crate) fn scroll_text_box<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, w: &Widget, delta: isize) {
    let (count, top, changed) = {
        let st = ctx.host.text_box_state(w);
        (st.lines.len(), st.top_line, st.changed)
    };
    let top = if changed { 0 } else { top };
    let max_top = count.saturating_sub(w.inner_rows());
    let new_top = clamp_scroll(top, delta, max_top);
    if changed || new_top != top {
        ctx.host.on_text_box_scroll(w, new_top);
        ctx.invalidate(w.id);
    }
}
