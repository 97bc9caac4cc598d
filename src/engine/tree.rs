//! Flattened widget tree and the queries that walk it.
//!
//! Structure queries (lookup, parent, children) need only the tree. Geometry
//! and visibility also consult the host, because window position, the
//! selected page and per-widget visibility are application state.

use std::collections::HashMap;

use super::flatten::{flatten, TreeError, WidgetNode};
use super::widget::{Widget, WidgetKind};
use crate::state::WidgetQueries;
use crate::types::{Coord, Rect, Size, WidgetId};

// =============================================================================
// FlattenedTree
// =============================================================================

/// Index-addressed widget array. Index 0 is the root Window.
#[derive(Debug, Clone)]
pub struct FlattenedTree {
    widgets: Vec<Widget>,
    by_id: HashMap<WidgetId, usize>,
}

impl FlattenedTree {
    /// Flatten and validate a nested definition.
    pub fn build(root: &WidgetNode) -> Result<Self, TreeError> {
        let widgets = flatten(root)?;
        let by_id = widgets
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id, i))
            .collect();
        Ok(Self { widgets, by_id })
    }

    pub fn root(&self) -> &Widget {
        &self.widgets[0]
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widgets in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Widget> {
        self.widgets.get(idx)
    }

    /// Lookup by id. Absence is not an error.
    pub fn get_widget_by_id(&self, id: WidgetId) -> Option<&Widget> {
        self.by_id.get(&id).map(|&i| &self.widgets[i])
    }

    /// Parent of `w`; `None` for the root.
    pub fn parent(&self, w: &Widget) -> Option<&Widget> {
        if w.is_root() {
            return None;
        }
        self.widgets.get(w.link.parent_idx as usize)
    }

    /// Direct children, in declaration order.
    pub fn children(&self, w: &Widget) -> &[Widget] {
        &self.widgets[w.link.children()]
    }

    /// Position of `w` among its parent's children.
    pub fn child_position(&self, w: &Widget) -> Option<usize> {
        let parent = self.parent(w)?;
        Some((w.link.own_idx - parent.link.childs_idx) as usize)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors<'a>(&'a self, w: &'a Widget) -> impl Iterator<Item = &'a Widget> + 'a {
        std::iter::successors(self.parent(w), move |p| self.parent(p))
    }

    /// Nearest ancestor matching `pred`.
    pub fn find_ancestor<'a>(
        &'a self,
        w: &'a Widget,
        pred: impl Fn(&Widget) -> bool,
    ) -> Option<&'a Widget> {
        self.ancestors(w).find(|a| pred(a))
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Absolute screen position of `w`.
    ///
    /// Sums the declared coords up the ancestor chain. The root Window's coord
    /// may be overridden by the host; a PageCtrl ancestor shifts its content
    /// right by the tab-strip width.
    pub fn screen_coord<Q: WidgetQueries + ?Sized>(&self, w: &Widget, host: &Q) -> Coord {
        if w.is_root() {
            return host.window_coord(w).unwrap_or(w.coord);
        }
        let mut coord = w.coord;
        for a in self.ancestors(w) {
            let origin = match &a.kind {
                WidgetKind::Window(_) if a.is_root() => host.window_coord(a).unwrap_or(a.coord),
                WidgetKind::PageCtrl(p) => a.coord.offset(Coord::new(p.tab_width, 0)),
                _ => a.coord,
            };
            coord = coord.offset(origin);
        }
        coord
    }

    /// Size used for hit-testing; pages span their control minus the tab strip.
    pub fn effective_size(&self, w: &Widget) -> Size {
        if !matches!(w.kind, WidgetKind::Page(_)) || w.size != Size::default() {
            return w.effective_size();
        }
        match self.parent(w) {
            Some(Widget { kind: WidgetKind::PageCtrl(p), size, .. }) => {
                Size::new(size.width.saturating_sub(p.tab_width), size.height)
            }
            _ => w.effective_size(),
        }
    }

    /// Screen rectangle of `w`.
    pub fn screen_rect<Q: WidgetQueries + ?Sized>(&self, w: &Widget, host: &Q) -> Rect {
        Rect {
            coord: self.screen_coord(w, host),
            size: self.effective_size(w),
        }
    }

    /// Widget under a 1-based screen point.
    ///
    /// The smallest containing rectangle wins; on equal area the later widget
    /// wins. The scan stops at the first interactive leaf that contains the
    /// point.
    pub fn widget_at<Q: WidgetQueries + ?Sized>(
        &self,
        col: u16,
        row: u16,
        host: &Q,
    ) -> Option<(&Widget, Rect)> {
        let mut best: Option<(&Widget, Rect)> = None;
        for w in &self.widgets {
            let rect = self.screen_rect(w, host);
            if !rect.contains(col, row) || !self.is_visible(w, host) {
                continue;
            }
            if w.kind.is_focusable() {
                best = Some((w, rect));
                break;
            }
            if best.is_none_or(|(_, b)| rect.area() <= b.area()) {
                best = Some((w, rect));
            }
        }
        if let Some((w, _)) = best {
            tracing::trace!(col, row, id = w.id, kind = w.kind.name(), "hit");
        }
        best
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    /// Visibility of `w` alone: the host's answer, and for a Page whether
    /// it is the selected page of its control.
    pub fn is_shown<Q: WidgetQueries + ?Sized>(&self, w: &Widget, host: &Q) -> bool {
        if !host.is_visible(w) {
            return false;
        }
        if !matches!(w.kind, WidgetKind::Page(_)) {
            return true;
        }
        match self.parent(w) {
            Some(parent) if matches!(parent.kind, WidgetKind::PageCtrl(_)) => {
                self.child_position(w) == Some(host.page_ctrl_page_index(parent))
            }
            _ => true,
        }
    }

    /// Visible only if `w` and every ancestor are shown.
    pub fn is_visible<Q: WidgetQueries + ?Sized>(&self, w: &Widget, host: &Q) -> bool {
        self.is_shown(w, host) && self.ancestors(w).all(|a| self.is_shown(a, host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FocusState, FocusStore};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Host {
        focus: FocusState,
        hidden: HashSet<WidgetId>,
        page: usize,
        window_at: Option<Coord>,
    }

    impl FocusStore for Host {
        fn focus_state(&self) -> &FocusState {
            &self.focus
        }
        fn focus_state_mut(&mut self) -> &mut FocusState {
            &mut self.focus
        }
    }

    impl WidgetQueries for Host {
        fn is_visible(&self, w: &Widget) -> bool {
            !self.hidden.contains(&w.id)
        }
        fn page_ctrl_page_index(&self, _w: &Widget) -> usize {
            self.page
        }
        fn window_coord(&self, _w: &Widget) -> Option<Coord> {
            self.window_at
        }
    }

    fn nested() -> FlattenedTree {
        let root = WidgetNode::window(1, "w").size(80, 24).child(
            WidgetNode::panel(2, "a").at(1, 1).size(40, 10).child(
                WidgetNode::panel(3, "b").at(1, 1).size(30, 8).child(
                    WidgetNode::panel(4, "c")
                        .at(1, 1)
                        .size(20, 6)
                        .child(WidgetNode::label(5, "x").size(3, 1)),
                ),
            ),
        );
        FlattenedTree::build(&root).unwrap()
    }

    #[test]
    fn test_nested_coords_add_up() {
        let tree = nested();
        let host = Host::default();
        let w = tree.get_widget_by_id(5).unwrap();
        assert_eq!(tree.screen_coord(w, &host), Coord::new(3, 3));
    }

    #[test]
    fn test_window_coord_override_translates_descendants() {
        let tree = nested();
        let host = Host { window_at: Some(Coord::new(10, 5)), ..Default::default() };
        let w = tree.get_widget_by_id(5).unwrap();
        assert_eq!(tree.screen_coord(w, &host), Coord::new(13, 8));
        assert_eq!(tree.screen_coord(tree.root(), &host), Coord::new(10, 5));
    }

    #[test]
    fn test_parent_round_trip() {
        let tree = nested();
        for w in tree.iter().skip(1) {
            let p = tree.parent(w).unwrap();
            assert_eq!(p.link.own_idx, w.link.parent_idx);
            assert!(tree.children(p).iter().any(|c| c.id == w.id));
        }
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn test_hidden_ancestor_hides_descendants() {
        let tree = nested();
        let mut host = Host::default();
        let w = tree.get_widget_by_id(5).unwrap();
        assert!(tree.is_visible(w, &host));
        host.hidden.insert(3);
        assert!(!tree.is_visible(w, &host));
        assert!(tree.is_visible(tree.get_widget_by_id(2).unwrap(), &host));
    }

    #[test]
    fn test_smallest_rect_wins() {
        let tree = nested();
        let host = Host::default();
        let (w, rect) = tree.widget_at(3, 3, &host).unwrap();
        assert_eq!(w.id, 5);
        assert_eq!(rect, Rect::new(3, 3, 3, 1));
        let (w, _) = tree.widget_at(2, 2, &host).unwrap();
        assert_eq!(w.id, 3);
        assert!(tree.widget_at(90, 1, &host).is_none());
    }

    #[test]
    fn test_pages_follow_selection_and_tab_width() {
        let root = WidgetNode::window(1, "w").size(80, 24).child(
            WidgetNode::page_ctrl(2, 10).at(1, 1).size(50, 10).children([
                WidgetNode::page(3, "one").child(WidgetNode::button(5, "ok").at(1, 1)),
                WidgetNode::page(4, "two"),
            ]),
        );
        let tree = FlattenedTree::build(&root).unwrap();
        let mut host = Host::default();
        let button = tree.get_widget_by_id(5).unwrap();
        assert_eq!(tree.screen_coord(button, &host), Coord::new(12, 2));

        let page = tree.get_widget_by_id(3).unwrap();
        assert_eq!(tree.screen_rect(page, &host), Rect::new(11, 1, 40, 10));

        assert!(tree.is_visible(button, &host));
        host.page = 1;
        assert!(!tree.is_visible(button, &host));
        assert!(tree.is_visible(tree.get_widget_by_id(4).unwrap(), &host));
    }
}
