//! Input system - terminal bytes → decoded events → widget handlers.
//!
//! # Architecture
//!
//! ```text
//! platform bytes → parser (AnsiDecoder) → KeyCode
//!                                             │
//!                                 ┌───────────┴───────────┐
//!                                 │                       │
//!                             Keyboard                  Mouse
//!                                 │                       │
//!                  ┌──────────────┼──────────┐            │
//!                  │              │          │            │
//!               Focus        Text Edit    Scroll      Hit-test → Click/Wheel
//!                  │              │          │            │
//!                  └──────────────┴──────────┴────────────┘
//!                                 │
//!                     host events + invalidate(id)
//! ```

pub mod focus;
pub mod keyboard;
pub mod keycode;
pub mod mouse;
pub mod parser;
pub mod scroll;
pub mod text_edit;

pub use focus::{cursor_position, next_focusable, next_from_focus};
pub use keycode::{Input, Key, KeyCode, KeyMod, MouseBtn, MouseEvt, Utf8Seq};
pub use parser::{decode_input_seq, AnsiDecoder};
