//! Mouse dispatch.
//!
//! Resolution order for a mouse report:
//! 1. A Button held down by an earlier press keeps receiving the pointer
//!    until release, wherever the pointer drifts
//! 2. An open combo drop-down is tested first; a middle click on the combo
//!    commits its highlight, any other press outside the list closes it
//! 3. Otherwise the widget under the pointer, via hit-testing
//!
//! Kind handlers mirror the keyboard: left click activates or selects the
//! clicked row, the wheel steps by one (a page with Ctrl held), and a
//! middle click on an open combo commits its highlight.

use crate::engine::{EngineContext, Widget, WidgetKind};
use crate::state::WidgetHost;
use crate::types::Rect;

use super::keyboard::{
    commit_combo, move_list_item, scroll_text_box, select_page, select_radio, set_drop_down,
};
use super::keycode::{KeyCode, MouseBtn, MouseEvt};
use super::scroll::{page_top, step_circular, step_from};
use super::text_edit;

/// Route a mouse report. Returns true if it was consumed.
pub fn process_mouse<H: WidgetHost>(ctx: &mut EngineContext<'_, H>, kc: &KeyCode) -> bool {
    let Some(m) = kc.mouse_evt() else {
        return false;
    };
    let tree = ctx.tree;

    // 1. Held button
    if let Some(pressed) = ctx.host.focus_state().pressed() {
        match tree.get_widget_by_id(pressed) {
            Some(w) if matches!(w.kind, WidgetKind::Button(_)) => {
                if m.btn == MouseBtn::ButtonReleased {
                    ctx.host.focus_state_mut().pressed = None;
                    ctx.host.on_button_up(w, kc);
                    ctx.invalidate(w.id);
                }
                return true;
            }
            _ => ctx.host.focus_state_mut().pressed = None,
        }
    }

    // 2. Open drop-down
    if let Some(combo) = open_combo(ctx) {
        let overlay = combo_overlay_rect(ctx, combo);
        if overlay.contains(m.col, m.row) {
            return mouse_combo_overlay(ctx, combo, overlay, &m, kc);
        }
        if m.btn.is_press() {
            let on_combo = tree.screen_rect(combo, &*ctx.host).contains(m.col, m.row);
            if on_combo && m.btn == MouseBtn::ButtonMid {
                let item = ctx.host.combo_box_state(combo).item;
                commit_combo(ctx, combo, item);
                return true;
            }
            set_drop_down(ctx, combo, false);
            if on_combo {
                return true;
            }
        }
    }

    // 3. Hit-test
    let Some((w, rect)) = tree.widget_at(m.col, m.row, &*ctx.host) else {
        return ctx.host.on_window_unhandled_input_evt(tree.root(), kc);
    };
    if !ctx.host.is_enabled(w) {
        return false;
    }

    let was_focused = ctx.host.focus_state().focused() == w.id;
    if m.btn == MouseBtn::ButtonLeft && w.kind.is_focusable() && !was_focused {
        ctx.change_focus_to(w.id);
    }

    let handled = match &w.kind {
        WidgetKind::Button(_) if m.btn == MouseBtn::ButtonLeft => {
            ctx.host.focus_state_mut().pressed = Some(w.id);
            ctx.host.on_button_down(w, kc);
            ctx.invalidate(w.id);
            true
        }
        WidgetKind::CheckBox(_) if m.btn == MouseBtn::ButtonLeft => {
            ctx.host.on_checkbox_toggle(w);
            ctx.invalidate(w.id);
            true
        }
        WidgetKind::Radio(_) if m.btn == MouseBtn::ButtonLeft => {
            select_radio(ctx, w);
            true
        }
        WidgetKind::Edit(_) if m.btn == MouseBtn::ButtonLeft => {
            text_edit::click(ctx, w, rect.coord.col, m.col, was_focused) || !was_focused
        }
        WidgetKind::PageCtrl(_) => mouse_page_ctrl(ctx, w, rect, &m),
        WidgetKind::ListBox(_) => mouse_list_box(ctx, w, rect, &m, kc),
        WidgetKind::ComboBox(_) => mouse_combo_box(ctx, w, &m, kc),
        WidgetKind::TextBox(_) => mouse_text_box(ctx, w, &m, kc),
        WidgetKind::Custom => ctx.host.on_custom_widget_input_evt(w, kc),
        _ => false,
    };

    if handled {
        return true;
    }
    ctx.host.on_window_unhandled_input_evt(tree.root(), kc)
}

/// Rows moved by one wheel notch; a whole page with Ctrl held.
fn wheel_delta(m: &MouseEvt, kc: &KeyCode, page: usize, step: u16) -> Option<isize> {
    let amount = if kc.ctrl() { page.max(1) as isize } else { step.max(1) as isize };
    match m.btn {
        MouseBtn::WheelUp => Some(-amount),
        MouseBtn::WheelDown => Some(amount),
        _ => None,
    }
}

// =============================================================================
// PageCtrl
// =============================================================================

fn mouse_page_ctrl<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    rect: Rect,
    m: &MouseEvt,
) -> bool {
    let WidgetKind::PageCtrl(props) = &w.kind else {
        return false;
    };
    let count = ctx.tree.children(w).len();
    if count == 0 {
        return false;
    }
    let cur = ctx.host.page_ctrl_page_index(w);
    match m.btn {
        MouseBtn::ButtonLeft => {
            let in_tabs = m.col < rect.coord.col.saturating_add(props.tab_width);
            let first_row = rect.coord.row.saturating_add(props.vert_offs);
            if !in_tabs || m.row < first_row {
                return false;
            }
            let page = (m.row - first_row) as usize;
            if page >= count {
                return false;
            }
            if page != cur {
                select_page(ctx, w, page);
            }
            true
        }
        MouseBtn::WheelUp | MouseBtn::WheelDown => {
            let delta = if m.btn == MouseBtn::WheelUp { -1 } else { 1 };
            select_page(ctx, w, step_circular(cur, delta, count));
            true
        }
        _ => false,
    }
}

// =============================================================================
// ListBox
// =============================================================================

fn mouse_list_box<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    rect: Rect,
    m: &MouseEvt,
    kc: &KeyCode,
) -> bool {
    let st = ctx.host.list_box_state(w);
    if st.count == 0 {
        return false;
    }
    let rows = w.inner_rows();
    let cur = st.item.unwrap_or(0);

    if let Some(delta) = wheel_delta(m, kc, rows, ctx.config.wheel_step) {
        move_list_item(ctx, w, step_from(st.item, delta, st.count));
        return true;
    }
    if m.btn != MouseBtn::ButtonLeft {
        return false;
    }

    let frame = w.has_frame() as u16;
    let first_row = rect.coord.row + frame;
    if m.row < first_row {
        return true;
    }
    let row = (m.row - first_row) as usize;
    let idx = page_top(cur, rows) + row;
    if row >= rows || idx >= st.count {
        return true;
    }
    move_list_item(ctx, w, idx);
    if ctx.host.list_box_state(w).selected != Some(idx) {
        ctx.host.on_list_box_select(w, idx);
        ctx.invalidate(w.id);
    }
    true
}

// =============================================================================
// ComboBox
// =============================================================================

/// The combo whose drop-down is open, if any.
fn open_combo<'t, H: WidgetHost>(ctx: &EngineContext<'t, H>) -> Option<&'t Widget> {
    let tree = ctx.tree;
    tree.iter().find(|w| {
        matches!(w.kind, WidgetKind::ComboBox(_))
            && ctx.host.combo_box_state(w).drop_down
            && tree.is_visible(w, &*ctx.host)
    })
}

/// Drop-down rows shown for `w`.
pub(crate) fn drop_down_rows(w: &Widget, count: usize) -> usize {
    let size = match &w.kind {
        WidgetKind::ComboBox(p) => p.drop_down_size.max(1) as usize,
        _ => 1,
    };
    size.min(count)
}

/// Screen area of the open list, right below the combo.
pub(crate) fn combo_overlay_rect<H: WidgetHost>(ctx: &EngineContext<'_, H>, w: &Widget) -> Rect {
    let r = ctx.tree.screen_rect(w, &*ctx.host);
    let count = ctx.host.combo_box_state(w).count;
    Rect::new(
        r.coord.col,
        r.coord.row.saturating_add(1),
        r.size.width,
        drop_down_rows(w, count) as u16,
    )
}

fn mouse_combo_overlay<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    overlay: Rect,
    m: &MouseEvt,
    kc: &KeyCode,
) -> bool {
    let st = ctx.host.combo_box_state(w);
    let rows = overlay.size.height as usize;
    if let Some(delta) = wheel_delta(m, kc, rows, ctx.config.wheel_step) {
        if st.count > 0 {
            ctx.host.on_combo_box_change(w, step_circular(st.item, delta, st.count));
            ctx.invalidate(w.id);
        }
        return true;
    }
    match m.btn {
        MouseBtn::ButtonLeft => {
            let idx = page_top(st.item, rows) + (m.row - overlay.coord.row) as usize;
            if idx < st.count {
                commit_combo(ctx, w, idx);
            }
            true
        }
        MouseBtn::ButtonMid => {
            commit_combo(ctx, w, st.item);
            true
        }
        _ => true,
    }
}

fn mouse_combo_box<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    m: &MouseEvt,
    kc: &KeyCode,
) -> bool {
    let st = ctx.host.combo_box_state(w);
    if let Some(delta) = wheel_delta(m, kc, drop_down_rows(w, st.count), ctx.config.wheel_step) {
        if st.count > 0 {
            let item = step_circular(st.item, delta, st.count);
            ctx.host.on_combo_box_change(w, item);
            if !st.drop_down {
                ctx.host.on_combo_box_select(w, item);
            }
            ctx.invalidate(w.id);
        }
        return true;
    }
    // presses on an open combo never get here
    if m.btn == MouseBtn::ButtonLeft {
        set_drop_down(ctx, w, true);
        return true;
    }
    false
}

// =============================================================================
// TextBox
// =============================================================================

fn mouse_text_box<H: WidgetHost>(
    ctx: &mut EngineContext<'_, H>,
    w: &Widget,
    m: &MouseEvt,
    kc: &KeyCode,
) -> bool {
    match wheel_delta(m, kc, w.inner_rows(), ctx.config.wheel_step) {
        Some(delta) => {
            scroll_text_box(ctx, w, delta);
            true
        }
        None => false,
    }
}
