//! Terminal implementations of the panel handles.
//!
//! Standard input plays the text field and the file picker; the transcript
//! is redrawn to a writer (stdout in the binary) whenever it changes.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::warn;

use crate::panel::{FilePicker, InputField, Message, MessageId, MessageSurface, Sender};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Line-buffered text field.
#[derive(Debug, Default)]
pub struct TerminalInput {
    value: Mutex<String>,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field's contents, as if the user had typed `text`.
    pub fn set_value(&self, text: impl Into<String>) {
        *self.value.lock() = text.into();
    }
}

impl InputField for TerminalInput {
    fn value(&self) -> String {
        self.value.lock().clone()
    }

    fn clear(&self) {
        self.value.lock().clear();
    }
}

/// File picker that asks for a path on the next input line.
#[derive(Debug, Default)]
pub struct TerminalPicker {
    armed: AtomicBool,
}

impl TerminalPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next input line should be read as a file path. Disarms.
    pub fn take_armed(&self) -> bool {
        self.armed.swap(false, Ordering::AcqRel)
    }
}

impl FilePicker for TerminalPicker {
    fn open(&self) {
        self.armed.store(true, Ordering::Release);
        eprintln!("Path of the file to upload (empty line to cancel):");
    }
}

fn label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "[you]",
        Sender::Chatbot => "[bot]",
        Sender::Error => "[error]",
    }
}

#[derive(Debug)]
struct Transcript<W> {
    entries: Vec<(MessageId, Message)>,
    out: W,
}

/// Message list that keeps the transcript in memory and shows its tail.
///
/// Every append, text update and scroll redraws synchronously into `W` while
/// the transcript lock is held, so animation ticks block on the writer. A
/// slow writer (a pipe nobody drains) stalls the tasks that render into it.
#[derive(Debug)]
pub struct TerminalSurface<W: Write + Send> {
    visible: usize,
    clear_screen: bool,
    inner: Mutex<Transcript<W>>,
}

impl<W: Write + Send> TerminalSurface<W> {
    /// `visible` is how many of the latest messages are drawn.
    pub fn new(out: W, visible: usize) -> Self {
        Self {
            visible: visible.max(1),
            clear_screen: true,
            inner: Mutex::new(Transcript {
                entries: Vec::new(),
                out,
            }),
        }
    }

    /// Draw without the clear-screen escape, for plain writers.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    /// Snapshot of the transcript in append order.
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Consume the surface and return its writer.
    pub fn into_inner(self) -> W {
        self.inner.into_inner().out
    }

    fn redraw(&self, transcript: &mut Transcript<W>) {
        let start = transcript.entries.len().saturating_sub(self.visible);
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        for (_, message) in &transcript.entries[start..] {
            frame.push_str(label(message.sender));
            frame.push(' ');
            frame.push_str(&message.text);
            frame.push('\n');
        }

        let result = transcript
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| transcript.out.flush());
        if let Err(e) = result {
            warn!(name: "terminal.write.failed", error = %e, "Failed to draw transcript");
        }
    }
}

impl<W: Write + Send> MessageSurface for TerminalSurface<W> {
    fn append(&self, id: MessageId, sender: Sender, text: &str) {
        self.inner
            .lock()
            .entries
            .push((id, Message::new(text, sender)));
    }

    fn set_text(&self, id: MessageId, text: &str) {
        let mut transcript = self.inner.lock();
        let Some((_, message)) = transcript.entries.iter_mut().find(|(i, _)| *i == id) else {
            return;
        };
        message.text.clear();
        message.text.push_str(text);
        self.redraw(&mut transcript);
    }

    fn scroll_to_bottom(&self) {
        let mut transcript = self.inner.lock();
        self.redraw(&mut transcript);
    }
}
