//! Chat Panel
//!
//! A small chat client: it renders user and bot messages in a scrolling
//! list, forwards typed text and chosen files to a backend over HTTP, and
//! reveals bot replies character by character.
//!
//! # Architecture
//!
//! - **Controller**: [`panel::ChatPanel`] drives injected UI handles
//! - **Backend**: [`backend::Backend`] trait with a reqwest implementation
//! - **UI**: terminal surface used by the `chat-panel` binary
//!
//! # Modules
//!
//! - [`backend`]: `/chat` and `/upload` client and wire types
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`panel`]: controller, UI handle traits and typing animation
//! - [`ui`]: concrete surfaces

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod backend;
pub mod config;
pub mod error;
pub mod panel;
pub mod ui;

pub use error::{Error, Result};
