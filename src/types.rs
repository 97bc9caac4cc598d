//! Core types for twidgets.
//!
//! These types define the foundation that everything builds on: widget ids,
//! character-cell geometry and the fixed color/attribute vocabulary the
//! renderer understands.
//!
//! Screen coordinates are 1-based terminal cells, the same convention the
//! terminal uses for `ESC [ row ; col H` and for mouse reports.

use bitflags::bitflags;

// =============================================================================
// Widget identity
// =============================================================================

/// Numeric widget identifier, unique within one tree.
pub type WidgetId = u16;

/// Reserved id meaning "no widget".
pub const WIDGET_ID_NONE: WidgetId = 0;

// =============================================================================
// Geometry
// =============================================================================

/// Column/row position in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub col: u16,
    pub row: u16,
}

impl Coord {
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Component-wise sum, saturating at the terminal limits.
    #[inline]
    pub const fn offset(self, other: Coord) -> Self {
        Self {
            col: self.col.saturating_add(other.col),
            row: self.row.saturating_add(other.row),
        }
    }

    /// Shift by a signed delta, saturating at zero.
    #[inline]
    pub fn shifted(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: (self.col as i32 + dcol).clamp(0, u16::MAX as i32) as u16,
            row: (self.row as i32 + drow).clamp(0, u16::MAX as i32) as u16,
        }
    }
}

/// Width/height in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub coord: Coord,
    pub size: Size,
}

impl Rect {
    pub const fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            coord: Coord::new(col, row),
            size: Size::new(width, height),
        }
    }

    /// Check if the point lies inside (right/bottom edges exclusive).
    #[inline]
    pub fn contains(&self, col: u16, row: u16) -> bool {
        let col = col as u32;
        let row = row as u32;
        let left = self.coord.col as u32;
        let top = self.coord.row as u32;
        col >= left
            && row >= top
            && col < left + self.size.width as u32
            && row < top + self.size.height as u32
    }

    /// Number of cells covered.
    #[inline]
    pub fn area(&self) -> u32 {
        self.size.width as u32 * self.size.height as u32
    }
}

// =============================================================================
// Color
// =============================================================================

/// The fixed 16-color terminal palette.
///
/// `Default` lets the terminal pick; `Inherit` keeps whatever the enclosing
/// widget pushed onto the style stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Inherit,
    Default,
    Black,
    BlackIntense,
    Red,
    RedIntense,
    Green,
    GreenIntense,
    Yellow,
    YellowIntense,
    Blue,
    BlueIntense,
    Magenta,
    MagentaIntense,
    Cyan,
    CyanIntense,
    White,
    WhiteIntense,
}

impl Color {
    /// Map onto the crossterm color vocabulary. `None` for [`Color::Inherit`].
    pub fn to_crossterm(self) -> Option<crossterm::style::Color> {
        use crossterm::style::Color as C;
        let c = match self {
            Self::Inherit => return None,
            Self::Default => C::Reset,
            Self::Black => C::Black,
            Self::BlackIntense => C::DarkGrey,
            Self::Red => C::DarkRed,
            Self::RedIntense => C::Red,
            Self::Green => C::DarkGreen,
            Self::GreenIntense => C::Green,
            Self::Yellow => C::DarkYellow,
            Self::YellowIntense => C::Yellow,
            Self::Blue => C::DarkBlue,
            Self::BlueIntense => C::Blue,
            Self::Magenta => C::DarkMagenta,
            Self::MagentaIntense => C::Magenta,
            Self::Cyan => C::DarkCyan,
            Self::CyanIntense => C::Cyan,
            Self::White => C::Grey,
            Self::WhiteIntense => C::White,
        };
        Some(c)
    }
}

// =============================================================================
// Text attributes
// =============================================================================

bitflags! {
    /// Text attributes the renderer can emit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontAttr: u8 {
        const BOLD      = 1 << 0;
        const FAINT     = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE   = 1 << 3;
    }
}

// =============================================================================
// Frames
// =============================================================================

/// Which fixed glyph set a frame is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameStyle {
    #[default]
    None,
    Single,
    Double,
    /// Tab-strip frame used by page controls.
    PgCtrl,
}
