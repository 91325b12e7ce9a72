use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "LEGION_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub log: LogConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the concierge backend. `LEGION_API_URL` takes precedence.
    pub base_url: String,
    /// Timeout for non-streaming account calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    /// Fixed chat session id. A fresh ULID is generated per run when unset.
    pub session_id: Option<String>,
    /// Agent the conversation starts with.
    pub initial_agent: String,
    /// Opening message from the initial agent. Empty disables it.
    pub greeting: String,
    /// Open preview panels whatever card the signed-in user holds.
    pub previews: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            initial_agent: "Sam".to_string(),
            greeting: "Hi! I'm Sam, your travel planner. How can I help you today? 🌟"
                .to_string(),
            previews: false,
        }
    }
}

impl ChatConfig {
    /// The configured session id, or a fresh ULID.
    pub fn session_id(&self) -> String {
        self.session_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| ulid::Ulid::new().to_string())
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Custom session file. Defaults to ~/.local/share/legion/session.json.
    pub path: Option<String>,
}

impl SessionConfig {
    /// Resolve the session file path, using the configured path or the XDG default.
    pub fn resolve_path(&self) -> PathBuf {
        if let Some(ref custom) = self.path {
            return PathBuf::from(custom);
        }
        data_dir().join("session.json")
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the user config, falling back to defaults when it is missing or
    /// broken, then apply environment overrides.
    pub fn load_or_default() -> Self {
        let path = config_path();
        let mut config = if path.exists() {
            Self::load(&path).unwrap_or_else(|e| {
                eprintln!("warning: {e}");
                Config::default()
            })
        } else {
            Config::default()
        };
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }
}

fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("legion").join("config.toml")
}

fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("legion")
}
