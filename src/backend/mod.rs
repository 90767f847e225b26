//! Chat backend client.
//!
//! The panel talks to its backend through the [`Backend`] trait so the
//! controller can be driven by a scripted backend in tests. [`HttpBackend`]
//! is the real implementation over reqwest.
//!
//! # Contract
//!
//! - `POST /chat` with `{"message": ...}` → `{"response": ...}` or `{"error": ...}`
//! - `POST /upload` with a multipart `file` part → `{"message": ...}` or `{"error": ...}`

mod http;
mod types;

pub use http::HttpBackend;
pub use types::{
    ChatReply, ChatRequest, PendingUpload, ReplyOutcome, ServerReply, UploadReply,
};

use async_trait::async_trait;

use crate::error::Result;

/// The two endpoints the panel depends on.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send a chat message. An empty message requests the greeting.
    async fn chat(&self, message: &str) -> Result<ChatReply>;

    /// Upload one file.
    async fn upload(&self, file: PendingUpload) -> Result<UploadReply>;
}
