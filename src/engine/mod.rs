//! Widget engine - flattened trees and the per-call context.
//!
//! - `widget`: Widget model, one variant per kind
//! - `flatten`: Nested definition to index-addressed array
//! - `tree`: Lookup, parent/children, screen coords, hit-testing, visibility
//!
//! # Architecture
//!
//! A tree is flattened once. Every top-level call (input or draw) then builds
//! a short-lived [`EngineContext`] naming the tree, the host and the platform
//! it works against:
//!
//! ```text
//! bytes → AnsiDecoder → KeyCode → EngineContext::process_input
//!                                     ├─ keyboard / mouse handlers
//!                                     ├─ focus navigation
//!                                     └─ host events → invalidate → draw
//! ```
//!
//! Nested windows are handled by building a second context for the nested
//! tree; nothing is global.

pub mod flatten;
pub mod tree;
pub mod widget;

pub use flatten::{flatten, TreeError, WidgetNode};
pub use tree::FlattenedTree;
pub use widget::*;

use std::io;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::input::focus::cursor_position;
use crate::input::keycode::KeyCode;
use crate::input::parser::AnsiDecoder;
use crate::input::{keyboard, mouse};
use crate::platform::Platform;
use crate::renderer::{ansi, draw::DrawCoordinator};
use crate::state::WidgetHost;
use crate::types::WidgetId;

// =============================================================================
// EngineContext
// =============================================================================

/// Everything one input or draw call works against.
pub struct EngineContext<'a, H: WidgetHost> {
    pub tree: &'a FlattenedTree,
    pub host: &'a mut H,
    pub platform: &'a mut dyn Platform,
    pub config: EngineConfig,
}

impl<'a, H: WidgetHost> EngineContext<'a, H> {
    pub fn new(tree: &'a FlattenedTree, host: &'a mut H, platform: &'a mut dyn Platform) -> Self {
        Self {
            tree,
            host,
            platform,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Route one decoded event. Returns true if something handled it.
    pub fn process_input(&mut self, kc: KeyCode) -> bool {
        if kc.is_none() {
            return false;
        }
        tracing::trace!(key = %kc, "input");
        if kc.mouse_evt().is_some() {
            mouse::process_mouse(self, &kc)
        } else {
            keyboard::process_key(self, &kc)
        }
    }

    pub fn process_key(&mut self, kc: &KeyCode) -> bool {
        keyboard::process_key(self, kc)
    }

    pub fn process_mouse(&mut self, kc: &KeyCode) -> bool {
        mouse::process_mouse(self, kc)
    }

    /// Read whatever the platform has within `timeout`, decode it and
    /// dispatch every complete event. Returns the number of events seen.
    pub fn pump(&mut self, decoder: &mut AnsiDecoder, timeout: Duration) -> io::Result<usize> {
        let bytes = self.platform.read(timeout)?;
        decoder.push(&bytes);
        let mut events = 0;
        loop {
            let before = decoder.pending().len();
            let kc = decoder.decode();
            if decoder.pending().len() == before {
                break;
            }
            if !kc.is_none() {
                self.process_input(kc);
                events += 1;
            }
        }
        Ok(events)
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    /// Draw the whole tree.
    pub fn draw_all(&mut self) -> io::Result<()> {
        let root = self.tree.root().id;
        self.draw(root)
    }

    /// Draw one widget and its subtree, then put the cursor back.
    pub fn draw(&mut self, id: WidgetId) -> io::Result<()> {
        self.draw_many(&[id])
    }

    /// Draw several widgets in one write.
    pub fn draw_many(&mut self, ids: &[WidgetId]) -> io::Result<()> {
        let mut out = Vec::with_capacity(4096);
        ansi::cursor_hide(&mut out)?;
        {
            let mut coord = DrawCoordinator::new(self.tree, &mut *self.host);
            for &id in ids {
                coord.draw(&mut out, id)?;
            }
        }
        ansi::reset(&mut out)?;
        self.cursor_sequence(&mut out)?;
        self.platform.write(&out)?;
        self.platform.flush()
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    pub(crate) fn invalidate(&mut self, id: WidgetId) {
        self.host.invalidate(id);
    }

    /// Redraw `id` and flush right away; failures only log.
    pub(crate) fn redraw_now(&mut self, id: WidgetId) {
        if let Err(e) = self.draw(id) {
            tracing::warn!(id, error = %e, "immediate redraw failed");
        }
    }

    /// Move the terminal cursor to the focused widget's interaction point,
    /// or hide it when that widget has none.
    pub(crate) fn update_cursor(&mut self) {
        let mut out = Vec::with_capacity(16);
        let result = self
            .cursor_sequence(&mut out)
            .and_then(|()| self.platform.write(&out))
            .and_then(|()| self.platform.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "cursor update failed");
        }
    }

    fn cursor_sequence(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let focused = self.host.focus_state().focused();
        let pos = self
            .tree
            .get_widget_by_id(focused)
            .and_then(|w| cursor_position(self.tree, &*self.host, w));
        match pos {
            Some(at) => {
                ansi::cursor_to(out, at)?;
                ansi::cursor_show(out)
            }
            None => ansi::cursor_hide(out),
        }
    }

    /// Drop the edit buffer without committing it.
    pub(crate) fn cancel_edit(&mut self) {
        if let Some(edit) = self.host.focus_state_mut().edit.take() {
            tracing::debug!(id = edit.widget, "edit cancelled");
            self.invalidate(edit.widget);
        }
    }
}
