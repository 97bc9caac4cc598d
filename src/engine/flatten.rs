//! Flattener - nested widget definitions to an index-addressed array.
//!
//! A tree is declared as nested [`WidgetNode`]s and flattened once into a
//! contiguous `Vec<Widget>` where parent/child relationships are indices:
//!
//! ```text
//! Window(1)                 index: 0    1    2    3    4    5    6
//! ├─ Panel(2)                      W1   P2   P3   B4   L5   E6   C7
//! │  ├─ Label(5)            P2.childs = 4..6   P3.childs = 6..7
//! │  └─ Edit(6)             W1.childs = 1..4
//! ├─ Panel(3)
//! │  └─ Check(7)
//! └─ Button(4)
//! ```
//!
//! Allocation keeps one "next free slot" cursor. Placing a node reserves a
//! contiguous block for all of its direct children, then places each child in
//! declaration order; a child's own block is taken from the already-advanced
//! cursor. Sibling blocks stay contiguous while the blocks themselves come out
//! in pre-order. Fixtures depend on this exact order.

use std::collections::HashSet;

use thiserror::Error;

use super::widget::*;
use crate::types::{Coord, Size, WidgetId, WIDGET_ID_NONE};

// =============================================================================
// Errors
// =============================================================================

/// Problems with a widget definition, found while flattening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("root widget {id} is a {kind}, expected a Window")]
    RootNotWindow { id: WidgetId, kind: &'static str },

    #[error("a {kind} widget uses the reserved id 0")]
    ReservedId { kind: &'static str },

    #[error("widget id {0} is used more than once")]
    DuplicateId(WidgetId),

    #[error("{kind} widget {id} cannot have children")]
    ChildrenOnLeaf { id: WidgetId, kind: &'static str },

    #[error("tree has {0} widgets, more than an index can address")]
    TooLarge(usize),
}

// =============================================================================
// WidgetNode builder
// =============================================================================

/// One node of a nested widget definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetNode {
    widget: Widget,
    children: Vec<WidgetNode>,
}

impl WidgetNode {
    pub fn new(id: WidgetId, kind: WidgetKind) -> Self {
        Self {
            widget: Widget::new(id, kind),
            children: Vec::new(),
        }
    }

    /// Set the position relative to the parent.
    pub fn at(mut self, col: u16, row: u16) -> Self {
        self.widget.coord = Coord::new(col, row);
        self
    }

    /// Set the declared size.
    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.widget.size = Size::new(width, height);
        self
    }

    /// Append one child.
    pub fn child(mut self, node: WidgetNode) -> Self {
        self.children.push(node);
        self
    }

    /// Append children in declaration order.
    pub fn children(mut self, nodes: impl IntoIterator<Item = WidgetNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn id(&self) -> WidgetId {
        self.widget.id
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.widget.kind
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    // -------------------------------------------------------------------------
    // Per-kind shorthands
    // -------------------------------------------------------------------------

    pub fn window(id: WidgetId, title: &str) -> Self {
        Self::new(
            id,
            WidgetKind::Window(WindowProps {
                title: title.to_string(),
                frame: crate::types::FrameStyle::Double,
                ..Default::default()
            }),
        )
    }

    pub fn panel(id: WidgetId, title: &str) -> Self {
        Self::new(
            id,
            WidgetKind::Panel(PanelProps { title: title.to_string(), ..Default::default() }),
        )
    }

    pub fn page(id: WidgetId, title: &str) -> Self {
        Self::new(
            id,
            WidgetKind::Page(PageProps { title: title.to_string(), ..Default::default() }),
        )
    }

    pub fn page_ctrl(id: WidgetId, tab_width: u16) -> Self {
        Self::new(
            id,
            WidgetKind::PageCtrl(PageCtrlProps { tab_width, vert_offs: 1 }),
        )
    }

    pub fn label(id: WidgetId, text: &str) -> Self {
        Self::new(
            id,
            WidgetKind::Label(LabelProps { text: text.to_string(), ..Default::default() }),
        )
    }

    pub fn edit(id: WidgetId) -> Self {
        Self::new(id, WidgetKind::Edit(EditProps::default()))
    }

    pub fn check_box(id: WidgetId, text: &str) -> Self {
        Self::new(
            id,
            WidgetKind::CheckBox(CheckBoxProps { text: text.to_string(), ..Default::default() }),
        )
    }

    pub fn radio(id: WidgetId, text: &str, group_id: u16, radio_id: u16) -> Self {
        Self::new(
            id,
            WidgetKind::Radio(RadioProps {
                text: text.to_string(),
                group_id,
                radio_id,
                ..Default::default()
            }),
        )
    }

    pub fn button(id: WidgetId, text: &str) -> Self {
        Self::new(
            id,
            WidgetKind::Button(ButtonProps { text: text.to_string(), ..Default::default() }),
        )
    }

    pub fn led(id: WidgetId, text: &str) -> Self {
        Self::new(
            id,
            WidgetKind::Led(LedProps { text: text.to_string(), ..Default::default() }),
        )
    }

    pub fn progress_bar(id: WidgetId) -> Self {
        Self::new(id, WidgetKind::ProgressBar(ProgressBarProps::default()))
    }

    pub fn list_box(id: WidgetId) -> Self {
        Self::new(id, WidgetKind::ListBox(ListBoxProps::default()))
    }

    pub fn combo_box(id: WidgetId, drop_down_size: u16) -> Self {
        Self::new(
            id,
            WidgetKind::ComboBox(ComboBoxProps { drop_down_size, ..Default::default() }),
        )
    }

    pub fn text_box(id: WidgetId) -> Self {
        Self::new(id, WidgetKind::TextBox(TextBoxProps::default()))
    }

    pub fn custom(id: WidgetId) -> Self {
        Self::new(id, WidgetKind::Custom)
    }
}

// =============================================================================
// Flattening
// =============================================================================

/// Flatten a nested definition into `1 + root.descendant_count()` slots.
pub fn flatten(root: &WidgetNode) -> Result<Vec<Widget>, TreeError> {
    if !matches!(root.widget.kind, WidgetKind::Window(_)) {
        return Err(TreeError::RootNotWindow {
            id: root.widget.id,
            kind: root.widget.kind.name(),
        });
    }

    let total = 1 + root.descendant_count();
    if total > u16::MAX as usize {
        return Err(TreeError::TooLarge(total));
    }

    let mut seen = HashSet::with_capacity(total);
    validate(root, &mut seen)?;

    let mut slots: Vec<Option<Widget>> = vec![None; total];
    let mut next_free: u16 = 1;
    place(root, 0, &mut slots, &mut next_free);

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(TreeError::TooLarge(total))
}

fn validate(node: &WidgetNode, seen: &mut HashSet<WidgetId>) -> Result<(), TreeError> {
    let w = &node.widget;
    if w.id == WIDGET_ID_NONE {
        return Err(TreeError::ReservedId { kind: w.kind.name() });
    }
    if !seen.insert(w.id) {
        return Err(TreeError::DuplicateId(w.id));
    }
    if !node.children.is_empty() && !w.kind.is_container() {
        return Err(TreeError::ChildrenOnLeaf { id: w.id, kind: w.kind.name() });
    }
    node.children.iter().try_for_each(|c| validate(c, seen))
}

/// Copy `node` into `slots[idx]`, reserve its children block and recurse.
fn place(node: &WidgetNode, idx: u16, slots: &mut [Option<Widget>], next_free: &mut u16) {
    let mut widget = node.widget.clone();
    widget.link = Link { own_idx: idx, ..Link::default() };

    let childs_cnt = node.children.len() as u16;
    let childs_idx = *next_free;
    if childs_cnt > 0 {
        widget.link.childs_idx = childs_idx;
        widget.link.childs_cnt = childs_cnt;
        *next_free += childs_cnt;
    }
    slots[idx as usize] = Some(widget);

    for (i, child) in node.children.iter().enumerate() {
        let child_idx = childs_idx + i as u16;
        place(child, child_idx, slots, next_free);
        if let Some(placed) = slots[child_idx as usize].as_mut() {
            placed.link.parent_idx = idx;
        }
    }
}
