//! ANSI escape sequences for drawing.
//!
//! This module provides the fixed sequences the renderer emits:
//! - Cursor movement and visibility
//! - 16-color foreground/background selection
//! - Text attributes (bold, faint, underline, inverse)
//! - Frame glyph sets

use std::io::Write;

use crossterm::queue;
use crossterm::style::{SetBackgroundColor, SetForegroundColor};

use crate::types::{Color, Coord, FontAttr, FrameStyle};

// =============================================================================
// Constants
// =============================================================================

/// Escape character.
pub const ESC: &str = "\x1b";

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

// =============================================================================
// Cursor
// =============================================================================

/// Move cursor to a 1-based screen cell.
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, at: Coord) -> std::io::Result<()> {
    write!(w, "{CSI}{};{}H", at.row.max(1), at.col.max(1))
}

/// Hide cursor.
#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "{CSI}?25l")
}

/// Show cursor.
#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "{CSI}?25h")
}

/// Clear the whole screen.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "{CSI}2J")
}

// =============================================================================
// Colors and attributes
// =============================================================================

/// Reset colors and attributes.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "{CSI}0m")
}

/// Set foreground color. `Inherit` emits nothing.
pub fn fg<W: Write>(w: &mut W, color: Color) -> std::io::Result<()> {
    match color.to_crossterm() {
        Some(c) => queue!(w, SetForegroundColor(c)),
        None => Ok(()),
    }
}

/// Set background color. `Inherit` emits nothing.
pub fn bg<W: Write>(w: &mut W, color: Color) -> std::io::Result<()> {
    match color.to_crossterm() {
        Some(c) => queue!(w, SetBackgroundColor(c)),
        None => Ok(()),
    }
}

/// Turn on text attributes.
pub fn attrs<W: Write>(w: &mut W, attr: FontAttr) -> std::io::Result<()> {
    if attr.contains(FontAttr::BOLD) {
        write!(w, "{CSI}1m")?;
    }
    if attr.contains(FontAttr::FAINT) {
        write!(w, "{CSI}2m")?;
    }
    if attr.contains(FontAttr::UNDERLINE) {
        write!(w, "{CSI}4m")?;
    }
    if attr.contains(FontAttr::INVERSE) {
        write!(w, "{CSI}7m")?;
    }
    Ok(())
}

// =============================================================================
// Frames
// =============================================================================

/// Corner and edge glyphs of one frame style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

const SINGLE: FrameGlyphs = FrameGlyphs {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
};

const DOUBLE: FrameGlyphs = FrameGlyphs {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
};

/// Tab strip: heavy left edge, light elsewhere.
const PG_CTRL: FrameGlyphs = FrameGlyphs {
    top_left: '┍',
    top_right: '┑',
    bottom_left: '┕',
    bottom_right: '┙',
    horizontal: '━',
    vertical: '│',
};

/// Glyphs for `style`; `None` draws no frame.
pub fn frame_glyphs(style: FrameStyle) -> Option<&'static FrameGlyphs> {
    match style {
        FrameStyle::None => None,
        FrameStyle::Single => Some(&SINGLE),
        FrameStyle::Double => Some(&DOUBLE),
        FrameStyle::PgCtrl => Some(&PG_CTRL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cursor_to_is_row_then_col() {
        assert_eq!(emit(|w| cursor_to(w, Coord::new(7, 3))), "\x1b[3;7H");
        assert_eq!(emit(|w| cursor_to(w, Coord::new(0, 0))), "\x1b[1;1H");
    }

    #[test]
    fn test_inherit_emits_nothing() {
        assert_eq!(emit(|w| fg(w, Color::Inherit)), "");
        assert!(!emit(|w| bg(w, Color::Blue)).is_empty());
    }

    #[test]
    fn test_attrs() {
        assert_eq!(emit(|w| attrs(w, FontAttr::BOLD | FontAttr::INVERSE)), "\x1b[1m\x1b[7m");
    }

    #[test]
    fn test_frame_sets() {
        assert!(frame_glyphs(FrameStyle::None).is_none());
        assert_eq!(frame_glyphs(FrameStyle::Double).map(|g| g.top_left), Some('╔'));
    }
}
