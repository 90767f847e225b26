//! Wire types for the `/chat` and `/upload` endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

// =============================================================================
// Chat
// =============================================================================

/// Body of a `POST /chat` request. An empty message asks for a greeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

/// Body of a `/chat` reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    /// Bot answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Application-level error reported by the backend.
    #[serde(
        default,
        deserialize_with = "error_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    /// Anything else the backend sent, kept for diagnostics.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Backends sometimes put codes or objects in `error`. Non-strings are shown
/// as their JSON text; `null`, `false` and `0` count as no error.
fn error_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

// =============================================================================
// Upload
// =============================================================================

/// Body of an `/upload` reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadReply {
    /// Bot description of the uploaded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Application-level error reported by the backend.
    #[serde(
        default,
        deserialize_with = "error_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    /// Name the backend stored the file under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file chosen for upload, held until its request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PendingUpload {
    /// Build an upload from in-memory content.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Set an explicit MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            content_type: Some(content_type),
            bytes,
        })
    }

    /// MIME type sent with the multipart part.
    pub fn mime(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

// =============================================================================
// Classification
// =============================================================================

/// What a reply asks the panel to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Render as a bot message.
    Answer(String),
    /// Render as `Error: <text>`.
    Failure(String),
    /// Neither field present; log it and show nothing.
    Unrecognized,
}

/// Replies that carry a success field and an `error` field.
pub trait ServerReply {
    fn outcome(&self) -> ReplyOutcome;
}

/// Empty strings count as absent, so `{"response": ""}` falls through to
/// the error branch.
fn present(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.is_empty())
}

fn classify(success: Option<&String>, error: Option<&String>) -> ReplyOutcome {
    if let Some(text) = present(success) {
        ReplyOutcome::Answer(text.to_string())
    } else if let Some(text) = present(error) {
        ReplyOutcome::Failure(text.to_string())
    } else {
        ReplyOutcome::Unrecognized
    }
}

impl ServerReply for ChatReply {
    fn outcome(&self) -> ReplyOutcome {
        classify(self.response.as_ref(), self.error.as_ref())
    }
}

impl ServerReply for UploadReply {
    fn outcome(&self) -> ReplyOutcome {
        classify(self.message.as_ref(), self.error.as_ref())
    }
}
