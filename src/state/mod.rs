//! State owned by the host application.
//!
//! - `focus` - Focused widget id (reactive), edit buffer, held button
//! - `host` - Capability traits the application implements

pub mod focus;
pub mod host;

pub use focus::{EditState, FocusState};
pub use host::{
    ComboBoxState, FocusStore, ListBoxState, ProgressBarState, TextBoxState, WidgetEvents,
    WidgetHost, WidgetQueries,
};
