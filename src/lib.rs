//! # twidgets
//!
//! Terminal widget engine: flattened widget trees, keyboard focus
//! navigation, key and mouse dispatch to per-kind handlers, and decoding of
//! raw terminal input.
//!
//! ## Architecture
//!
//! A nested widget definition is flattened once into an index-addressed
//! array where every widget knows its parent and its contiguous run of
//! children. The application (the *host*) owns all widget state and answers
//! queries about it; the engine owns only behavior:
//!
//! ```text
//! WidgetNode ──flatten──▶ FlattenedTree
//!                              │
//! stdin bytes ─▶ AnsiDecoder ─▶ KeyCode ─▶ EngineContext ─▶ host events
//!                                              │                │
//!                                              └── draw ◀── invalidate
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ids, geometry, colors, attributes
//! - [`engine`] - Widget model, flattening, tree traversal, `EngineContext`
//! - [`state`] - Host traits and host-owned focus state
//! - [`input`] - Key codes, decoding, focus, key and mouse dispatch
//! - [`renderer`] - ANSI output and per-kind drawing
//! - [`platform`] - Terminal and in-memory I/O
//! - [`config`] - TOML-backed engine settings

pub mod config;
pub mod engine;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod state;
pub mod types;

pub use types::*;

pub use config::{ConfigError, EngineConfig};

pub use engine::{flatten, EngineContext, FlattenedTree, TreeError, Widget, WidgetKind, WidgetNode};

pub use input::{decode_input_seq, AnsiDecoder, Key, KeyCode, KeyMod, MouseBtn, MouseEvt};

pub use platform::{BufferPlatform, Platform, StdPlatform};

pub use renderer::DrawCoordinator;

pub use state::{EditState, FocusState, FocusStore, WidgetEvents, WidgetHost, WidgetQueries};
