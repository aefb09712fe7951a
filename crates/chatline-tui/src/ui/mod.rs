//! UI building blocks for the chatline TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
