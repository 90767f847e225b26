//! Concrete surfaces for the chat panel.
//!
//! - [`terminal`]: stdin/stdout front-end used by the binary

pub mod terminal;

pub use terminal::{TerminalInput, TerminalPicker, TerminalSurface};
