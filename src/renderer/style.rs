//! Color/attribute stack.
//!
//! Each widget pushes its colors while it and its children draw; `Inherit`
//! entries resolve against whatever is below them.

use std::io::{self, Write};

use super::ansi;
use crate::types::{Color, FontAttr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: FontAttr,
}

impl Style {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg, attrs: FontAttr::empty() }
    }

    /// Fill `Inherit` colors from `base`; attributes accumulate.
    fn over(self, base: Style) -> Style {
        Style {
            fg: if self.fg == Color::Inherit { base.fg } else { self.fg },
            bg: if self.bg == Color::Inherit { base.bg } else { self.bg },
            attrs: base.attrs | self.attrs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleStack {
    stack: Vec<Style>,
}

impl StyleStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Style::new(Color::Default, Color::Default)],
        }
    }

    pub fn push(&mut self, style: Style) {
        let resolved = style.over(self.current());
        self.stack.push(resolved);
    }

    /// The base entry is never popped.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn current(&self) -> Style {
        self.stack.last().copied().unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Emit the current style, optionally with extra attributes.
    pub fn apply<W: Write>(&self, w: &mut W, extra: FontAttr) -> io::Result<()> {
        let s = self.current();
        ansi::reset(w)?;
        ansi::fg(w, s.fg)?;
        ansi::bg(w, s.bg)?;
        ansi::attrs(w, s.attrs | extra)
    }
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new()
    }
}
