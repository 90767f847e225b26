//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{Backend, ChatReply, ChatRequest, PendingUpload, UploadReply};
use crate::config::BackendConfig;
use crate::error::Result;

/// HTTP client for the chat backend.
///
/// # Example
///
/// ```rust,no_run
/// use chat_panel::backend::{Backend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:5000")?;
/// let reply = backend.chat("Hello!").await?;
/// println!("{:?}", reply.response);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    chat_path: String,
    upload_path: String,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client using the default `/chat` and `/upload` paths.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url,
            chat_path: "/chat".into(),
            upload_path: "/upload".into(),
            http,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let mut backend = Self::with_client(&config.base_url, builder.build()?)?;
        backend.chat_path.clone_from(&config.chat_path);
        backend.upload_path.clone_from(&config.upload_path);
        Ok(backend)
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Decode the body whatever the status: the backend reports failures as
    /// `{"error": ...}` alongside 4xx/5xx codes.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            debug!(name: "backend.reply.status", status = status.as_u16(), "Non-success status");
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, message: &str) -> Result<ChatReply> {
        let req = ChatRequest {
            message: message.to_string(),
        };
        let response = self
            .http
            .post(self.url(&self.chat_path)?)
            .json(&req)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn upload(&self, file: PendingUpload) -> Result<UploadReply> {
        let mime = file.mime().to_string();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&mime)?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.url(&self.upload_path)?)
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }
}
