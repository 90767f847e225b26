//! Chat panel controller.
//!
//! The controller owns the whole behavior of the panel: greeting on
//! startup, submitting typed text, uploading a chosen file, and rendering
//! messages (bot messages through the typing animation).
//!
//! It is built from injected [`PanelHandles`] and a [`Backend`], so it runs
//! the same against a terminal, a test fake, or any other surface.
//!
//! # Example
//!
//! ```rust,ignore
//! let panel = ChatPanel::new(handles, backend, PanelSettings::default());
//! panel.greet();
//! panel.handle_event(PanelEvent::KeyUp(Key::Enter));
//! ```
//!
//! Each request runs in its own task. Nothing guards against several
//! requests being in flight, and replies render in the order they arrive.

mod handles;
mod typing;

pub use handles::{
    FilePicker, InputField, Message, MessageId, MessageSurface, PanelHandles, Sender,
};
pub use typing::{DEFAULT_TYPING_INTERVAL, TypingAnimator};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::backend::{Backend, PendingUpload, ReplyOutcome, ServerReply};
use crate::config::PanelConfig;

/// Shown when a chat request fails in transport or decoding.
pub const CHAT_FAILURE_TEXT: &str = "Error communicating with chatbot.";

/// Shown when an upload request fails in transport or decoding.
pub const UPLOAD_FAILURE_TEXT: &str = "Error uploading image.";

/// Prefix of application-level errors reported by the backend.
pub const ERROR_PREFIX: &str = "Error: ";

/// Keys the input field reports on key-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// User interactions the panel reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    SendClicked,
    KeyUp(Key),
    UploadClicked,
    /// The file picker returned. May be empty when the user backed out.
    FilesSelected(Vec<PendingUpload>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    pub typing_interval: Duration,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            typing_interval: DEFAULT_TYPING_INTERVAL,
        }
    }
}

impl From<&PanelConfig> for PanelSettings {
    fn from(config: &PanelConfig) -> Self {
        Self {
            typing_interval: config.typing_interval(),
        }
    }
}

/// The chat panel controller. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ChatPanel {
    handles: PanelHandles,
    backend: Arc<dyn Backend>,
    animator: TypingAnimator,
    next_id: Arc<AtomicU64>,
}

impl fmt::Debug for ChatPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPanel")
            .field("animator", &self.animator)
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ChatPanel {
    pub fn new(handles: PanelHandles, backend: Arc<dyn Backend>, settings: PanelSettings) -> Self {
        Self {
            handles,
            backend,
            animator: TypingAnimator::new(settings.typing_interval),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn animator(&self) -> &TypingAnimator {
        &self.animator
    }

    /// Fetch and render the greeting.
    ///
    /// Failures are only logged; the user sees nothing.
    pub fn greet(&self) -> JoinHandle<()> {
        let panel = self.clone();
        tokio::spawn(async move {
            match panel.backend.chat("").await {
                Ok(reply) => match reply.outcome() {
                    ReplyOutcome::Answer(text) => {
                        panel.display_message(text, Sender::Chatbot);
                    }
                    _ => {
                        warn!(name: "chat.greeting.unexpected", reply = ?reply, "Unexpected greeting format");
                    }
                },
                Err(e) => {
                    error!(name: "chat.greeting.failed", error = %e, "Error fetching initial message");
                }
            }
        })
    }

    /// Submit the input field.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the user
    /// message is rendered and the field cleared before this returns; the
    /// returned task carries the request and renders its reply.
    pub fn send_message(&self) -> Option<JoinHandle<()>> {
        let text = self.handles.input.value().trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.display_message(text.clone(), Sender::User);
        self.handles.input.clear();

        let panel = self.clone();
        Some(tokio::spawn(async move {
            info!(name: "chat.request.sent", chars = text.chars().count(), "Sending chat message");
            match panel.backend.chat(&text).await {
                Ok(reply) => {
                    let outcome = reply.outcome();
                    if outcome == ReplyOutcome::Unrecognized {
                        error!(name: "chat.reply.unexpected", reply = ?reply, "Unexpected response format");
                    }
                    panel.render_outcome(outcome);
                }
                Err(e) => {
                    error!(name: "chat.request.failed", error = %e, "Chat request failed");
                    panel.display_message(CHAT_FAILURE_TEXT, Sender::Error);
                }
            }
        }))
    }

    /// Upload one file and render the backend's description of it.
    pub fn upload_file(&self, file: PendingUpload) -> JoinHandle<()> {
        let panel = self.clone();
        tokio::spawn(async move {
            info!(
                name: "upload.request.sent",
                file = %file.file_name,
                bytes = file.bytes.len(),
                "Uploading file"
            );
            match panel.backend.upload(file).await {
                Ok(reply) => {
                    let outcome = reply.outcome();
                    if outcome == ReplyOutcome::Unrecognized {
                        error!(name: "upload.reply.unexpected", reply = ?reply, "Unexpected response format");
                    }
                    panel.render_outcome(outcome);
                }
                Err(e) => {
                    error!(name: "upload.request.failed", error = %e, "Upload request failed");
                    panel.display_message(UPLOAD_FAILURE_TEXT, Sender::Error);
                }
            }
        })
    }

    /// Append one render unit and scroll to the bottom.
    ///
    /// Bot messages are appended empty and filled in by the typing
    /// animation; everything else shows its full text at once.
    pub fn display_message(&self, text: impl Into<String>, sender: Sender) -> MessageId {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let text = text.into();
        let surface = &self.handles.messages;

        if sender.is_animated() {
            surface.append(id, sender, "");
            self.animator.start(id, text, Arc::clone(surface));
        } else {
            surface.append(id, sender, &text);
        }
        surface.scroll_to_bottom();

        id
    }

    /// Render a prepared [`Message`].
    pub fn render(&self, message: Message) -> MessageId {
        self.display_message(message.text, message.sender)
    }

    /// Dispatch a user interaction. Returns the request task it started, if any.
    pub fn handle_event(&self, event: PanelEvent) -> Option<JoinHandle<()>> {
        match event {
            PanelEvent::SendClicked | PanelEvent::KeyUp(Key::Enter) => self.send_message(),
            PanelEvent::KeyUp(_) => None,
            PanelEvent::UploadClicked => {
                self.handles.picker.open();
                None
            }
            PanelEvent::FilesSelected(files) => files
                .into_iter()
                .next()
                .map(|file| self.upload_file(file)),
        }
    }

    /// Stop all running animations. Messages rendered later animate as usual.
    pub fn shutdown(&self) {
        self.animator.cancel_all();
    }

    fn render_outcome(&self, outcome: ReplyOutcome) {
        match outcome {
            ReplyOutcome::Answer(text) => {
                self.render(Message::new(text, Sender::Chatbot));
            }
            ReplyOutcome::Failure(text) => {
                self.render(Message::new(format!("{ERROR_PREFIX}{text}"), Sender::Error));
            }
            ReplyOutcome::Unrecognized => {}
        }
    }
}
