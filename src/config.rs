use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::error::Result;

/// Prefix for environment overrides, e.g. `CHAT_PANEL_BACKEND__BASE_URL`.
const ENV_PREFIX: &str = "CHAT_PANEL";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the chat backend
    #[arg(long, env = "CHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Milliseconds between revealed characters of a bot message
    #[arg(long, env = "TYPING_INTERVAL_MS")]
    pub typing_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub panel: PanelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub chat_path: String,
    pub upload_path: String,
    /// Per-request timeout. Requests wait indefinitely when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub typing_interval_ms: u64,
    /// How many of the most recent messages the terminal view keeps on screen.
    pub visible_messages: usize,
}

impl PanelConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("backend.base_url", "http://127.0.0.1:5000")?
            .set_default("backend.chat_path", "/chat")?
            .set_default("backend.upload_path", "/upload")?
            .set_default("panel.typing_interval_ms", 15)?
            .set_default("panel.visible_messages", 40)?;

        // An explicit file must exist; ./config.{yaml,toml,json} is picked up when present.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Priority: CLI flag > CLI env var > prefixed env > config file > defaults.
        if let Some(url) = cli.base_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(ms) = cli.typing_interval_ms {
            builder = builder.set_override("panel.typing_interval_ms", ms)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> std::result::Result<(), config::ConfigError> {
        if self.panel.typing_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "panel.typing_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
