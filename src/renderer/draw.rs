//! Draw coordinator - walks a subtree and emits each widget.
//!
//! Children are drawn after their parent at the parent's content origin,
//! with the parent's colors pushed on the style stack. Hidden widgets (and
//! unselected pages) are skipped together with their subtrees.

use std::io::{self, Write};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::ansi::{self, frame_glyphs, FrameGlyphs};
use super::style::{Style, StyleStack};
use crate::engine::widget::*;
use crate::engine::FlattenedTree;
use crate::input::mouse::drop_down_rows;
use crate::input::scroll::page_top;
use crate::input::text_edit::edit_view;
use crate::state::WidgetHost;
use crate::types::{Color, Coord, FontAttr, FrameStyle, Rect, Size, WidgetId};

// =============================================================================
// Text helpers
// =============================================================================

/// Clip `text` to `width` cells and pad with spaces to exactly `width`.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Clip `text` to at most `width` cells.
fn clip(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

// =============================================================================
// DrawCoordinator
// =============================================================================

pub struct DrawCoordinator<'t, 'h, H: WidgetHost + ?Sized> {
    tree: &'t FlattenedTree,
    host: &'h mut H,
    styles: StyleStack,
}

impl<'t, 'h, H: WidgetHost + ?Sized> DrawCoordinator<'t, 'h, H> {
    pub fn new(tree: &'t FlattenedTree, host: &'h mut H) -> Self {
        Self { tree, host, styles: StyleStack::new() }
    }

    /// Draw widget `id` and everything below it.
    pub fn draw<W: Write>(&mut self, out: &mut W, id: WidgetId) -> io::Result<()> {
        let tree = self.tree;
        let Some(w) = tree.get_widget_by_id(id) else {
            tracing::warn!(id, "draw: widget not in tree");
            return Ok(());
        };
        if !tree.is_visible(w, &*self.host) {
            return Ok(());
        }

        // Inherit colors from the ancestors, outermost first.
        let ancestors: Vec<&Widget> = tree.ancestors(w).collect();
        for a in ancestors.iter().rev() {
            self.styles.push(style_of(a));
        }
        let at = tree.screen_coord(w, &*self.host);
        let result = self.draw_subtree(out, w, at);
        for _ in &ancestors {
            self.styles.pop();
        }
        result?;

        // An open drop-down overlays whatever was drawn after its combo.
        if let Some(combo) = self.open_combo_within(w) {
            let at = tree.screen_coord(combo, &*self.host);
            self.styles.push(style_of(combo));
            let r = self.draw_combo_overlay(out, combo, at);
            self.styles.pop();
            r?;
        }
        Ok(())
    }

    fn open_combo_within(&self, w: &Widget) -> Option<&'t Widget> {
        let tree = self.tree;
        tree.iter().find(|c| {
            matches!(c.kind, WidgetKind::ComboBox(_))
                && (c.id == w.id || tree.ancestors(c).any(|a| a.id == w.id))
                && self.host.combo_box_state(c).drop_down
                && tree.is_visible(c, &*self.host)
        })
    }

    fn draw_subtree<W: Write>(&mut self, out: &mut W, w: &Widget, at: Coord) -> io::Result<()> {
        self.styles.push(style_of(w));
        let result = self.draw_kind(out, w, at).and_then(|()| {
            let origin = match &w.kind {
                WidgetKind::PageCtrl(p) => at.offset(Coord::new(p.tab_width, 0)),
                _ => at,
            };
            let tree = self.tree;
            for child in tree.children(w) {
                if tree.is_shown(child, &*self.host) {
                    self.draw_subtree(out, child, origin.offset(child.coord))?;
                }
            }
            Ok(())
        });
        self.styles.pop();
        result
    }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    fn text_at<W: Write>(&self, out: &mut W, at: Coord, text: &str, extra: FontAttr) -> io::Result<()> {
        self.styles.apply(out, extra)?;
        ansi::cursor_to(out, at)?;
        out.write_all(text.as_bytes())
    }

    fn fill<W: Write>(&self, out: &mut W, rect: Rect) -> io::Result<()> {
        let blank = " ".repeat(rect.size.width as usize);
        self.styles.apply(out, FontAttr::empty())?;
        for r in 0..rect.size.height {
            ansi::cursor_to(out, rect.coord.shifted(0, r as i32))?;
            out.write_all(blank.as_bytes())?;
        }
        Ok(())
    }

    fn frame<W: Write>(&self, out: &mut W, rect: Rect, g: &FrameGlyphs, title: &str) -> io::Result<()> {
        let Rect { coord, size } = rect;
        if size.width < 2 || size.height < 2 {
            return Ok(());
        }
        let inner = (size.width - 2) as usize;
        let horiz: String = std::iter::repeat_n(g.horizontal, inner).collect();
        self.styles.apply(out, FontAttr::empty())?;

        ansi::cursor_to(out, coord)?;
        write!(out, "{}{}{}", g.top_left, horiz, g.top_right)?;
        for r in 1..size.height - 1 {
            ansi::cursor_to(out, coord.shifted(0, r as i32))?;
            write!(out, "{}", g.vertical)?;
            ansi::cursor_to(out, coord.shifted(size.width as i32 - 1, r as i32))?;
            write!(out, "{}", g.vertical)?;
        }
        ansi::cursor_to(out, coord.shifted(0, size.height as i32 - 1))?;
        write!(out, "{}{}{}", g.bottom_left, horiz, g.bottom_right)?;

        if !title.is_empty() && inner > 4 {
            let t = format!(" {} ", clip(title, inner - 4));
            let col = (inner - t.width()) / 2 + 1;
            self.text_at(out, coord.shifted(col as i32, 0), &t, FontAttr::BOLD)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Per-kind routines
    // -------------------------------------------------------------------------

    fn draw_kind<W: Write>(&mut self, out: &mut W, w: &Widget, at: Coord) -> io::Result<()> {
        let size = self.tree.effective_size(w);
        let rect = Rect { coord: at, size };
        let focused = self.host.is_focused(w);
        let focus_attr = if focused { FontAttr::BOLD } else { FontAttr::empty() };

        match &w.kind {
            WidgetKind::Window(p) => {
                self.fill(out, rect)?;
                let title = self.host.window_title(w).unwrap_or_else(|| p.title.clone());
                match frame_glyphs(p.frame) {
                    Some(g) => self.frame(out, rect, g, &title),
                    None if !title.is_empty() => {
                        self.text_at(out, at, &clip(&title, size.width as usize), FontAttr::BOLD)
                    }
                    None => Ok(()),
                }
            }
            WidgetKind::Panel(p) => {
                self.fill(out, rect)?;
                match frame_glyphs(if p.no_frame { FrameStyle::None } else { FrameStyle::Single }) {
                    Some(g) => self.frame(out, rect, g, &p.title),
                    None => Ok(()),
                }
            }
            WidgetKind::Page(_) => self.fill(out, rect),
            WidgetKind::PageCtrl(p) => self.draw_page_ctrl(out, w, p, rect),
            WidgetKind::Label(_) => {
                let text = self.host.label_text(w);
                let text = if size.width > 0 { clip(&text, size.width as usize) } else { text };
                self.text_at(out, at, &text, FontAttr::empty())
            }
            WidgetKind::Edit(_) => {
                let width = (size.width as usize).max(1);
                let text = match self.host.focus_state().edit_of(w.id) {
                    Some(e) => {
                        let (skip, _) = edit_view(e, width);
                        e.buffer.chars().skip(skip).collect()
                    }
                    None => self.host.edit_text(w),
                };
                let attr = if focused { FontAttr::UNDERLINE | FontAttr::BOLD } else { FontAttr::UNDERLINE };
                self.text_at(out, at, &fit_width(&text, width), attr)
            }
            WidgetKind::CheckBox(p) => {
                let mark = if self.host.checkbox_checked(w) { 'x' } else { ' ' };
                self.text_at(out, at, &format!("[{mark}] {}", p.text), focus_attr)
            }
            WidgetKind::Radio(p) => {
                let on = self.host.radio_index(w) == Some(p.radio_id);
                let mark = if on { '*' } else { ' ' };
                self.text_at(out, at, &format!("({mark}) {}", p.text), focus_attr)
            }
            WidgetKind::Button(p) => {
                let pressed = self.host.focus_state().pressed() == Some(w.id);
                let mut attr = focus_attr;
                if pressed || p.style == ButtonStyle::Solid {
                    attr |= FontAttr::INVERSE;
                }
                self.text_at(out, at, &format!("[ {} ]", p.text), attr)
            }
            WidgetKind::Led(p) => {
                let bg = if self.host.led_lit(w) { p.bg_on } else { p.bg_off };
                self.styles.push(Style::new(Color::Inherit, bg));
                let r = self.text_at(out, at, &p.text, FontAttr::empty());
                self.styles.pop();
                r
            }
            WidgetKind::ProgressBar(p) => {
                let st = self.host.progress_bar_state(w);
                let width = size.width as usize;
                let filled = if st.max == 0 {
                    0
                } else {
                    (st.pos.min(st.max) as u64 * width as u64 / st.max as u64) as usize
                };
                let (on, off) = match p.style {
                    ProgressBarStyle::Hash => ('#', '.'),
                    ProgressBarStyle::Shade => ('█', '░'),
                    ProgressBarStyle::Rectangle => ('■', '□'),
                };
                let bar: String = std::iter::repeat_n(on, filled)
                    .chain(std::iter::repeat_n(off, width - filled))
                    .collect();
                self.text_at(out, at, &bar, FontAttr::empty())
            }
            WidgetKind::ListBox(_) => self.draw_list_box(out, w, rect, focused),
            WidgetKind::ComboBox(_) => {
                let st = self.host.combo_box_state(w);
                let text = if st.count > 0 {
                    self.host.combo_box_item(w, if st.drop_down { st.item } else { st.selected })
                } else {
                    String::new()
                };
                let inner = (size.width as usize).saturating_sub(3);
                let arrow = if st.drop_down { '▲' } else { '▼' };
                self.text_at(out, at, &format!("[{}{arrow}]", fit_width(&text, inner)), focus_attr)
            }
            WidgetKind::TextBox(_) => self.draw_text_box(out, w, rect),
            WidgetKind::Custom => {
                self.styles.apply(out, FontAttr::empty())?;
                self.host.on_custom_widget_draw(w, rect, out)
            }
        }
    }

    fn draw_page_ctrl<W: Write>(
        &mut self,
        out: &mut W,
        w: &Widget,
        p: &PageCtrlProps,
        rect: Rect,
    ) -> io::Result<()> {
        let strip = Rect {
            coord: rect.coord,
            size: Size::new(p.tab_width, rect.size.height),
        };
        self.fill(out, strip)?;
        if let Some(g) = frame_glyphs(FrameStyle::PgCtrl) {
            self.frame(out, strip, g, "")?;
        }

        let selected = self.host.page_ctrl_page_index(w);
        let width = p.tab_width.saturating_sub(2) as usize;
        let tree = self.tree;
        for (i, page) in tree.children(w).iter().enumerate() {
            let title = match &page.kind {
                WidgetKind::Page(pp) => pp.title.as_str(),
                _ => "",
            };
            let attr = if i == selected { FontAttr::INVERSE } else { FontAttr::empty() };
            let row = p.vert_offs as i32 + i as i32;
            if row >= rect.size.height as i32 - 1 {
                break;
            }
            self.text_at(out, rect.coord.shifted(1, row), &fit_width(title, width), attr)?;
        }
        Ok(())
    }

    fn draw_list_box<W: Write>(&mut self, out: &mut W, w: &Widget, rect: Rect, focused: bool) -> io::Result<()> {
        let framed = w.has_frame();
        if framed {
            self.fill(out, rect)?;
            if let Some(g) = frame_glyphs(FrameStyle::Single) {
                self.frame(out, rect, g, "")?;
            }
        }
        let st = self.host.list_box_state(w);
        let rows = w.inner_rows();
        let off = framed as i32;
        let width = (rect.size.width as usize).saturating_sub(2 * framed as usize);
        let item = st.item.unwrap_or(0);
        let top = page_top(item, rows);

        for r in 0..rows {
            let idx = top + r;
            let text = if idx < st.count { self.host.list_box_item(w, idx) } else { String::new() };
            let mut attr = FontAttr::empty();
            if idx < st.count && st.item == Some(idx) {
                attr |= if focused { FontAttr::INVERSE } else { FontAttr::UNDERLINE };
            }
            if st.selected == Some(idx) {
                attr |= FontAttr::BOLD;
            }
            self.text_at(out, rect.coord.shifted(off, off + r as i32), &fit_width(&text, width), attr)?;
        }
        Ok(())
    }

    fn draw_combo_overlay<W: Write>(&mut self, out: &mut W, w: &Widget, at: Coord) -> io::Result<()> {
        let st = self.host.combo_box_state(w);
        let rows = drop_down_rows(w, st.count);
        let width = self.tree.effective_size(w).width as usize;
        let top = page_top(st.item, rows);
        for r in 0..rows {
            let idx = top + r;
            let text = if idx < st.count { self.host.combo_box_item(w, idx) } else { String::new() };
            let attr = if idx == st.item { FontAttr::INVERSE } else { FontAttr::empty() };
            self.text_at(out, at.shifted(0, 1 + r as i32), &fit_width(&text, width), attr)?;
        }
        Ok(())
    }

    fn draw_text_box<W: Write>(&mut self, out: &mut W, w: &Widget, rect: Rect) -> io::Result<()> {
        self.fill(out, rect)?;
        if let Some(g) = frame_glyphs(FrameStyle::Single) {
            self.frame(out, rect, g, "")?;
        }
        let rows = w.inner_rows();
        let width = (rect.size.width as usize).saturating_sub(2);
        let lines: Vec<String> = {
            let st = self.host.text_box_state(w);
            let top = if st.changed { 0 } else { st.top_line };
            st.lines.iter().skip(top).take(rows).cloned().collect()
        };
        for (r, line) in lines.iter().enumerate() {
            self.text_at(out, rect.coord.shifted(1, 1 + r as i32), &fit_width(line, width), FontAttr::empty())?;
        }
        Ok(())
    }
}

/// Colors a widget pushes for itself and its children.
fn style_of(w: &Widget) -> Style {
    match &w.kind {
        WidgetKind::Window(p) => Style::new(p.fg, p.bg),
        WidgetKind::Panel(p) => Style::new(p.fg, p.bg),
        WidgetKind::Page(p) => Style::new(p.fg, Color::Inherit),
        WidgetKind::Label(p) => Style::new(p.fg, p.bg),
        WidgetKind::Edit(p) => Style::new(p.fg, p.bg),
        WidgetKind::CheckBox(p) => Style::new(p.fg, Color::Inherit),
        WidgetKind::Radio(p) => Style::new(p.fg, Color::Inherit),
        WidgetKind::Button(p) => Style::new(p.fg, p.bg),
        WidgetKind::Led(p) => Style::new(p.fg, Color::Inherit),
        WidgetKind::ProgressBar(p) => Style::new(p.fg, Color::Inherit),
        WidgetKind::ListBox(p) => Style::new(p.fg, p.bg),
        WidgetKind::ComboBox(p) => Style::new(p.fg, p.bg),
        WidgetKind::TextBox(p) => Style::new(p.fg, p.bg),
        WidgetKind::PageCtrl(_) | WidgetKind::Custom => Style::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_pads_and_clips() {
        assert_eq!(fit_width("ab", 4), "ab  ");
        assert_eq!(fit_width("abcdef", 3), "abc");
        // wide glyph that would straddle the edge is dropped
        assert_eq!(fit_width("a漢", 2), "a ");
    }

    #[test]
    fn test_clip_never_pads() {
        assert_eq!(clip("ab", 5), "ab");
        assert_eq!(clip("abcdef", 2), "ab");
    }
}
