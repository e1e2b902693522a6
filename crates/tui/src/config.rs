use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use txpanel_core::{AdminPerms, ModalOptions};

pub const CONFIG_FILE: &str = "txpanel.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration (persisted as `txpanel.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TxpanelConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub modal: ModalSettings,
    #[serde(default)]
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Bearer token sent with every request. Empty means none.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn token(&self) -> Option<&str> {
        Some(self.token.trim()).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModalSettings {
    #[serde(default)]
    pub touch: bool,
    #[serde(default = "default_close_grace_ms")]
    pub close_grace_ms: u64,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self {
            touch: false,
            close_grace_ms: default_close_grace_ms(),
        }
    }
}

impl ModalSettings {
    pub fn options(&self) -> ModalOptions {
        ModalOptions {
            touch: self.touch,
            close_grace: Duration::from_millis(self.close_grace_ms),
        }
    }
}

/// Permissions of the signed-in admin, as granted by the panel.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AdminSettings {
    #[serde(default)]
    pub master: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AdminSettings {
    pub fn perms(&self) -> AdminPerms {
        AdminPerms {
            is_master: self.master,
            permissions: self.permissions.clone(),
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:40120".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_close_grace_ms() -> u64 {
    200
}

// ── File I/O ────────────────────────────────────────────────────────────

pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".config").join("txpanel"))
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Load `path`, or `~/.config/txpanel/txpanel.toml` when `None`. A missing
/// file yields the defaults; a malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<TxpanelConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if !path.exists() {
        return Ok(TxpanelConfig::default());
    }
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}
