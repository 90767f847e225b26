//! UI handles the panel controller is constructed with.

use std::fmt;
use std::sync::Arc;

/// Identity of one rendered message. Assigned in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Chatbot,
    Error,
}

impl Sender {
    /// Style class paired with `message` on the render unit.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Chatbot => "chatbot",
            Self::Error => "error",
        }
    }

    /// Full class list of a render unit.
    pub fn classes(self) -> [&'static str; 2] {
        ["message", self.css_class()]
    }

    /// Whether messages from this sender are revealed by the typing animation.
    pub fn is_animated(self) -> bool {
        matches!(self, Self::Chatbot)
    }
}

/// A transient render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }
}

/// The text field messages are typed into.
pub trait InputField: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);
}

/// The file chooser behind the upload button.
pub trait FilePicker: Send + Sync {
    /// Ask the user to choose a file. The choice comes back later as
    /// [`super::PanelEvent::FilesSelected`].
    fn open(&self);
}

/// The scrolling message list.
pub trait MessageSurface: Send + Sync {
    /// Append a render unit.
    fn append(&self, id: MessageId, sender: Sender, text: &str);

    /// Replace the text of an existing render unit.
    fn set_text(&self, id: MessageId, text: &str);

    /// Scroll the list to its bottom.
    fn scroll_to_bottom(&self);
}

/// Everything the controller binds to.
#[derive(Clone)]
pub struct PanelHandles {
    pub input: Arc<dyn InputField>,
    pub picker: Arc<dyn FilePicker>,
    pub messages: Arc<dyn MessageSurface>,
}

impl fmt::Debug for PanelHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelHandles").finish_non_exhaustive()
    }
}
