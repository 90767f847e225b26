//! Chat Panel terminal client
//!
//! Reads lines from stdin and shows the conversation on stdout. Logs go to
//! stderr.
//!
//! - a plain line is sent as a chat message
//! - `/upload <path>` uploads a file; `/upload` alone asks for the path
//! - `/quit` exits

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_panel::backend::{HttpBackend, PendingUpload};
use chat_panel::config::AppConfig;
use chat_panel::panel::{ChatPanel, Key, PanelEvent, PanelHandles, PanelSettings};
use chat_panel::ui::{TerminalInput, TerminalPicker, TerminalSurface};

/// Which panel event an input line stands for.
enum Command {
    Quit,
    OpenPicker,
    Upload(String),
    Type(String),
}

fn parse_line(line: &str, picking: bool) -> Command {
    if picking {
        return Command::Upload(line.trim().to_string());
    }
    match line.trim() {
        "/quit" => Command::Quit,
        "/upload" => Command::OpenPicker,
        trimmed => match trimmed.strip_prefix("/upload ") {
            Some(path) => Command::Upload(path.trim().to_string()),
            None => Command::Type(line.to_string()),
        },
    }
}

async fn choose_files(path: &str) -> Vec<PendingUpload> {
    if path.is_empty() {
        return Vec::new();
    }
    match PendingUpload::from_path(path).await {
        Ok(file) => vec![file],
        Err(e) => {
            error!(name: "upload.file.unreadable", path = %path, error = %e, "Cannot read file");
            Vec::new()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED); stdout belongs to the transcript
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("Configuration error")?;

    info!(
        name: "panel.config.loaded",
        base_url = %config.backend.base_url,
        typing_interval_ms = config.panel.typing_interval_ms,
        "Configuration loaded"
    );

    let backend = Arc::new(HttpBackend::from_config(&config.backend)?);
    let input = Arc::new(TerminalInput::new());
    let picker = Arc::new(TerminalPicker::new());
    let surface = Arc::new(TerminalSurface::new(
        std::io::stdout(),
        config.panel.visible_messages,
    ));

    let handles = PanelHandles {
        input: input.clone(),
        picker: picker.clone(),
        messages: surface,
    };
    let panel = ChatPanel::new(handles, backend, PanelSettings::from(&config.panel));

    panel.greet();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = match parse_line(&line, picker.take_armed()) {
            Command::Quit => break,
            Command::OpenPicker => PanelEvent::UploadClicked,
            Command::Upload(path) => PanelEvent::FilesSelected(choose_files(&path).await),
            Command::Type(text) => {
                input.set_value(text);
                PanelEvent::KeyUp(Key::Enter)
            }
        };
        panel.handle_event(event);
    }

    panel.shutdown();
    info!(name: "panel.stopped", "Chat panel stopped");
    Ok(())
}
