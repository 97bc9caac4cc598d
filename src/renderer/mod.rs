//! Renderer - widget subtrees to ANSI output.
//!
//! - `ansi`: Escape sequences and frame glyph sets
//! - `style`: Color stack with inheritance
//! - `draw`: Per-kind drawing, driven by [`DrawCoordinator`]
//!
//! Drawing is immediate: the engine draws the widgets a host asked for into
//! one buffer and hands it to the platform in a single write.

pub mod ansi;
pub mod draw;
pub mod style;

pub use draw::{fit_width, DrawCoordinator};
pub use style::{Style, StyleStack};
