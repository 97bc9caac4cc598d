//! Focus navigation.
//!
//! Finds the next/previous focusable widget and applies focus changes:
//! - Depth-first among a parent's children; a PageCtrl only exposes its
//!   selected page
//! - Stepping past the end of a Panel continues after the Panel in its
//!   parent, so focus flows out of sub-panels
//! - Any other container wraps around to its first (or last) child
//!
//! A focus change invalidates the old and new widgets and moves the
//! terminal cursor to the new widget's interaction point.

use crate::engine::{EngineContext, FlattenedTree, Widget, WidgetKind};
use crate::state::{WidgetHost, WidgetQueries};
use crate::types::{Coord, WidgetId, WIDGET_ID_NONE};

use super::scroll::page_top;
use super::text_edit::edit_view;

// =============================================================================
// Search
// =============================================================================

/// Next (or previous) focusable widget among `parent`'s children.
///
/// With `focused == None` returns the first (forward) or last (backward)
/// focusable descendant. Otherwise steps from `focused`, which must be a
/// direct child of `parent`.
pub fn next_focusable<Q: WidgetQueries + ?Sized>(
    tree: &FlattenedTree,
    host: &Q,
    parent: &Widget,
    focused: Option<WidgetId>,
    forward: bool,
) -> Option<WidgetId> {
    let mut search = Search { tree, host, forward, first_parent: None };
    match focused {
        None => search.first_in(parent),
        Some(id) => search.after(parent, id),
    }
}

/// Next focusable widget starting from the host's current focus.
pub fn next_from_focus<Q: WidgetQueries + ?Sized>(
    tree: &FlattenedTree,
    host: &Q,
    forward: bool,
) -> Option<WidgetId> {
    let focused = host.focus_state().focused();
    let Some(w) = tree.get_widget_by_id(focused) else {
        return next_focusable(tree, host, tree.root(), None, forward);
    };

    if w.kind.is_container() {
        let inside = next_focusable(tree, host, w, None, forward);
        if inside.is_some() {
            return inside;
        }
    }
    match tree.parent(w) {
        Some(parent) => next_focusable(tree, host, parent, Some(w.id), forward),
        None => None,
    }
}

struct Search<'t, Q: ?Sized> {
    tree: &'t FlattenedTree,
    host: &'t Q,
    forward: bool,
    /// Container where the search first wrapped; seeing it again is a loop.
    first_parent: Option<u16>,
}

impl<'t, Q: WidgetQueries + ?Sized> Search<'t, Q> {
    fn candidates(&self, parent: &Widget) -> &'t [Widget] {
        let children = self.tree.children(parent);
        match parent.kind {
            WidgetKind::PageCtrl(_) => {
                let page = self.host.page_ctrl_page_index(parent);
                children.get(page..page + 1).unwrap_or(&[])
            }
            _ => children,
        }
    }

    fn order(&self, range: std::ops::Range<usize>) -> Vec<usize> {
        if self.forward {
            range.collect()
        } else {
            range.rev().collect()
        }
    }

    fn is_focusable(&self, w: &Widget) -> bool {
        w.kind.is_focusable() && self.host.is_enabled(w) && self.tree.is_visible(w, self.host)
    }

    /// `w` itself if focusable, else its first focusable descendant.
    fn enter(&mut self, w: &Widget) -> Option<WidgetId> {
        if self.is_focusable(w) {
            return Some(w.id);
        }
        if w.kind.is_container() && self.host.is_enabled(w) && self.tree.is_shown(w, self.host) {
            return self.first_in(w);
        }
        None
    }

    fn first_in(&mut self, parent: &Widget) -> Option<WidgetId> {
        let kids = self.candidates(parent);
        self.order(0..kids.len())
            .into_iter()
            .find_map(|i| self.enter(&kids[i]))
    }

    fn after(&mut self, parent: &Widget, focused: WidgetId) -> Option<WidgetId> {
        let kids = self.candidates(parent);
        let Some(pos) = kids.iter().position(|c| c.id == focused) else {
            tracing::warn!(id = focused, parent = parent.id, "focused widget not among children");
            return None;
        };

        let rest = if self.forward { pos + 1..kids.len() } else { 0..pos };
        if let Some(id) = self.order(rest).into_iter().find_map(|i| self.enter(&kids[i])) {
            return Some(id);
        }

        if matches!(parent.kind, WidgetKind::Panel(_)) {
            if let Some(grand) = self.tree.parent(parent) {
                return self.after(grand, parent.id);
            }
        }

        let own = parent.link().own_idx;
        if self.first_parent == Some(own) {
            tracing::warn!(parent = parent.id, "focus search looped without a candidate");
            return None;
        }
        self.first_parent.get_or_insert(own);

        let head = if self.forward { 0..pos + 1 } else { pos..kids.len() };
        self.order(head).into_iter().find_map(|i| self.enter(&kids[i]))
    }
}

// =============================================================================
// Cursor placement
// =============================================================================

/// Screen cell where the terminal cursor sits while `w` has focus.
pub fn cursor_position<Q: WidgetQueries + ?Sized>(
    tree: &FlattenedTree,
    host: &Q,
    w: &Widget,
) -> Option<Coord> {
    if !tree.is_visible(w, host) {
        return None;
    }
    let at = tree.screen_coord(w, host);
    let pos = match &w.kind {
        WidgetKind::Edit(_) => {
            let col = host
                .focus_state()
                .edit_of(w.id)
                .map_or(0, |e| edit_view(e, w.size.width as usize).1);
            at.shifted(col as i32, 0)
        }
        WidgetKind::CheckBox(_) | WidgetKind::Radio(_) => at.shifted(1, 0),
        WidgetKind::Button(_) => at.shifted(2, 0),
        WidgetKind::ListBox(_) => {
            let st = host.list_box_state(w);
            let rows = w.inner_rows();
            let item = st.item.unwrap_or(0);
            let frame = w.has_frame() as i32;
            at.shifted(frame, frame + (item - page_top(item, rows)) as i32)
        }
        WidgetKind::ComboBox(_) => at.shifted(1, 0),
        WidgetKind::TextBox(_) => at.shifted(1, 1),
        _ => return None,
    };
    Some(pos)
}

// =============================================================================
// Focus changes
// =============================================================================

impl<H: WidgetHost> EngineContext<'_, H> {
    /// Move focus to `new_id`. Returns false when nothing changed.
    pub fn change_focus_to(&mut self, new_id: WidgetId) -> bool {
        let tree = self.tree;
        let old_id = self.host.focus_state().focused();
        if new_id == old_id {
            return false;
        }
        let new_w = tree.get_widget_by_id(new_id);
        if new_id != WIDGET_ID_NONE && new_w.is_none() {
            tracing::warn!(id = new_id, "focus target not in tree");
            return false;
        }

        if self.host.focus_state().edit().is_some_and(|e| e.widget == old_id) {
            self.cancel_edit();
        }

        tracing::debug!(from = old_id, to = new_id, "focus");
        self.host.focus_state_mut().set_focused(new_id);

        if tree.get_widget_by_id(old_id).is_some_and(|w| w.kind.is_focusable()) {
            self.invalidate(old_id);
        }
        if new_w.is_some_and(|w| w.kind.is_focusable()) {
            self.invalidate(new_id);
        }

        self.update_cursor();

        if let Some(w) = new_w.filter(|w| matches!(w.kind, WidgetKind::ListBox(_))) {
            let st = self.host.list_box_state(w);
            if st.selected.is_none() && st.count > 0 {
                self.host.on_list_box_select(w, st.item.unwrap_or(0));
            }
        }
        true
    }

    /// Tab / Shift+Tab.
    pub fn focus_next(&mut self, forward: bool) -> bool {
        match next_from_focus(self.tree, &*self.host, forward) {
            Some(id) => self.change_focus_to(id),
            None => false,
        }
    }

    /// Focus the first focusable widget of the tree.
    pub fn focus_first(&mut self) -> bool {
        match next_focusable(self.tree, &*self.host, self.tree.root(), None, true) {
            Some(id) => self.change_focus_to(id),
            None => false,
        }
    }
}
