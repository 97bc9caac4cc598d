//! Widget model - one tagged variant per widget kind.
//!
//! A [`Widget`] is a plain value: id, declared geometry, kind-specific payload
//! and the [`Link`] record written by the flattener. Everything the widget
//! needs at runtime that can change (checked state, selection, text) lives in
//! the host and is asked for through [`crate::state::WidgetQueries`].

use unicode_width::UnicodeWidthStr;

use crate::types::{Color, Coord, FrameStyle, Size, WidgetId};

// =============================================================================
// Link
// =============================================================================

/// Index-based tree links, filled in by the flattener.
///
/// `childs_idx..childs_idx + childs_cnt` is the contiguous run of direct
/// children. The root has `own_idx == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Link {
    pub own_idx: u16,
    pub parent_idx: u16,
    pub childs_idx: u16,
    pub childs_cnt: u16,
}

impl Link {
    /// Index range of the direct children.
    #[inline]
    pub fn children(&self) -> std::ops::Range<usize> {
        let start = self.childs_idx as usize;
        start..start + self.childs_cnt as usize
    }
}

// =============================================================================
// Kind payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowProps {
    pub title: String,
    pub fg: Color,
    pub bg: Color,
    pub frame: FrameStyle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelProps {
    pub title: String,
    pub fg: Color,
    pub bg: Color,
    pub no_frame: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageProps {
    pub title: String,
    pub fg: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageCtrlProps {
    /// Width of the tab strip on the left; page content starts after it.
    pub tab_width: u16,
    /// Rows between the top of the control and the first tab title.
    pub vert_offs: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelProps {
    /// Static text; when empty the host supplies it.
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditProps {
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckBoxProps {
    pub text: String,
    pub fg: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadioProps {
    pub text: String,
    pub fg: Color,
    /// Radios sharing a group id under the same parent are mutually exclusive.
    pub group_id: u16,
    /// Position of this radio within its group.
    pub radio_id: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    #[default]
    Simple,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonProps {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedProps {
    pub text: String,
    pub fg: Color,
    pub bg_on: Color,
    pub bg_off: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressBarStyle {
    #[default]
    Hash,
    Shade,
    Rectangle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressBarProps {
    pub fg: Color,
    pub style: ProgressBarStyle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListBoxProps {
    pub fg: Color,
    pub bg: Color,
    pub no_frame: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComboBoxProps {
    pub fg: Color,
    pub bg: Color,
    /// Rows shown by the open drop-down list.
    pub drop_down_size: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBoxProps {
    pub fg: Color,
    pub bg: Color,
}

// =============================================================================
// WidgetKind
// =============================================================================

/// Kind tag plus kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Window(WindowProps),
    Panel(PanelProps),
    Page(PageProps),
    PageCtrl(PageCtrlProps),
    Label(LabelProps),
    Edit(EditProps),
    CheckBox(CheckBoxProps),
    Radio(RadioProps),
    Button(ButtonProps),
    Led(LedProps),
    ProgressBar(ProgressBarProps),
    ListBox(ListBoxProps),
    ComboBox(ComboBoxProps),
    TextBox(TextBoxProps),
    /// Application-drawn widget; drawing and input go to the host.
    Custom,
}

impl WidgetKind {
    /// Kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Window(_) => "Window",
            Self::Panel(_) => "Panel",
            Self::Page(_) => "Page",
            Self::PageCtrl(_) => "PageCtrl",
            Self::Label(_) => "Label",
            Self::Edit(_) => "Edit",
            Self::CheckBox(_) => "CheckBox",
            Self::Radio(_) => "Radio",
            Self::Button(_) => "Button",
            Self::Led(_) => "Led",
            Self::ProgressBar(_) => "ProgressBar",
            Self::ListBox(_) => "ListBox",
            Self::ComboBox(_) => "ComboBox",
            Self::TextBox(_) => "TextBox",
            Self::Custom => "Custom",
        }
    }

    /// Kinds that own children and are passed through by focus traversal.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Window(_) | Self::Panel(_) | Self::Page(_) | Self::PageCtrl(_)
        )
    }

    /// Kinds that can hold keyboard focus.
    pub fn is_focusable(&self) -> bool {
        matches!(
            self,
            Self::Edit(_)
                | Self::CheckBox(_)
                | Self::Radio(_)
                | Self::Button(_)
                | Self::ListBox(_)
                | Self::ComboBox(_)
                | Self::TextBox(_)
        )
    }
}

// =============================================================================
// Widget
// =============================================================================

/// One widget slot of a flattened tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    /// Position relative to the parent's content origin.
    pub coord: Coord,
    pub size: Size,
    pub kind: WidgetKind,
    pub(crate) link: Link,
}

impl Widget {
    pub fn new(id: WidgetId, kind: WidgetKind) -> Self {
        Self {
            id,
            coord: Coord::default(),
            size: Size::default(),
            kind,
            link: Link::default(),
        }
    }

    /// Tree links assigned during flattening.
    #[inline]
    pub fn link(&self) -> Link {
        self.link
    }

    /// Check if this widget is the tree root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.link.own_idx == 0
    }

    /// Size used for hit-testing and drawing.
    ///
    /// Check boxes, radios and buttons are as wide as their decoration plus
    /// the visible width of their text.
    pub fn effective_size(&self) -> Size {
        let text = match &self.kind {
            WidgetKind::CheckBox(p) => &p.text,
            WidgetKind::Radio(p) => &p.text,
            WidgetKind::Button(p) => &p.text,
            _ => return self.size,
        };
        let width = 4 + text.width().min(u16::MAX as usize - 4) as u16;
        Size::new(width, self.size.height.max(1))
    }

    /// Check if the widget draws a border around its content.
    pub fn has_frame(&self) -> bool {
        match &self.kind {
            WidgetKind::Window(p) => p.frame != FrameStyle::None,
            WidgetKind::Panel(p) => !p.no_frame,
            WidgetKind::ListBox(p) => !p.no_frame,
            WidgetKind::TextBox(_) => true,
            _ => false,
        }
    }

    /// Content rows of a list or text box, never less than one.
    pub fn inner_rows(&self) -> usize {
        let frame = if self.has_frame() { 2 } else { 0 };
        (self.size.height.saturating_sub(frame) as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_width_counts_visible_text() {
        let mut w = Widget::new(
            7,
            WidgetKind::Button(ButtonProps { text: "Źle".into(), ..Default::default() }),
        );
        w.size = Size::new(1, 1);
        assert_eq!(w.effective_size(), Size::new(7, 1));
    }

    #[test]
    fn test_declared_size_for_other_kinds() {
        let mut w = Widget::new(3, WidgetKind::ListBox(ListBoxProps::default()));
        w.size = Size::new(20, 6);
        assert_eq!(w.effective_size(), Size::new(20, 6));
        assert_eq!(w.inner_rows(), 4);

        w.kind = WidgetKind::ListBox(ListBoxProps { no_frame: true, ..Default::default() });
        assert_eq!(w.inner_rows(), 6);
    }

    #[test]
    fn test_kind_classes() {
        assert!(WidgetKind::Page(PageProps::default()).is_container());
        assert!(!WidgetKind::Page(PageProps::default()).is_focusable());
        assert!(WidgetKind::TextBox(TextBoxProps::default()).is_focusable());
        assert!(!WidgetKind::Label(LabelProps::default()).is_focusable());
        assert!(!WidgetKind::Custom.is_container());
    }

    #[test]
    fn test_link_children_range() {
        let l = Link { own_idx: 2, parent_idx: 0, childs_idx: 5, childs_cnt: 3 };
        assert_eq!(l.children(), 5..8);
    }
}
