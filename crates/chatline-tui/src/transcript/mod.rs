//! Transcript pane: scroll state, rendering and the loading placeholder.

mod placeholder;
mod state;
mod widget;

pub use placeholder::input_placeholder;
pub use state::{TranscriptState, SCROLL_SPEED};
pub use widget::{content_height, Transcript};
