//! Text rendering utilities.
//!
//! - [`wrap_text`] - Word wrapping for transcript turns
//! - [`visual_width`], [`truncate_to_width`] - Unicode-aware measurement

mod width;
mod wrap;

pub use width::{truncate_to_width, visual_width};
pub use wrap::wrap_text;
