//! Client settings persisted between runs.
//!
//! Settings live in the platform config directory:
//! - macOS: ~/Library/Application Support/com.Referable.referable/
//! - Windows: %APPDATA%/Referable/referable/config/
//! - Linux: ~/.config/referable/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use referable_import::ClientConfig;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "Referable";
const APP_NAME: &str = "referable";
const CONFIG_FILENAME: &str = "referable.toml";

/// Stars shown in place of a hidden token.
const MASK_WIDTH: usize = 8;
/// Tokens up to this many characters are hidden entirely.
const MASK_SHOWS_TAIL_AFTER: usize = 8;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the import backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Full URL of the import endpoint.
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    /// Replaces stored values with whichever overrides are present.
    #[must_use]
    pub fn with_overrides(mut self, endpoint: Option<String>, api_token: Option<String>) -> Self {
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        if api_token.is_some() {
            self.api_token = api_token;
        }
        self
    }

    /// Builds the HTTP client configuration. Fails when no endpoint is set.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let Some(endpoint) = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
        else {
            bail!("no import endpoint configured; pass --endpoint or set `endpoint` in the config file");
        };
        Ok(ClientConfig::new(endpoint)
            .with_api_token(self.api_token.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs.max(1))))
    }

    /// Token for display: the last four characters of a long token, nothing
    /// of a short one.
    pub fn masked_token(&self) -> Option<String> {
        self.api_token.as_deref().map(|token| {
            let chars: Vec<char> = token.chars().collect();
            if chars.len() <= MASK_SHOWS_TAIL_AFTER {
                return "*".repeat(MASK_WIDTH);
            }
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}{tail}", "*".repeat(MASK_WIDTH))
        })
    }
}

/// Default settings file location, when the platform has one.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads settings from `explicit`, or from [`settings_path`] when `None`.
///
/// An explicit file must exist and parse. The default file falls back to
/// defaults when missing or unreadable.
pub fn load_settings(explicit: Option<&Path>) -> Result<ClientSettings> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    let Some(path) = settings_path() else {
        warn!("could not determine settings path, using defaults");
        return Ok(ClientSettings::default());
    };
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to parse settings, using defaults");
                Ok(ClientSettings::default())
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            Ok(ClientSettings::default())
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read settings, using defaults");
            Ok(ClientSettings::default())
        }
    }
}

/// Loads and parses the settings file at `path`.
pub fn load_from(path: &Path) -> Result<ClientSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let settings = toml::from_str(&content)
        .with_context(|| format!("parse settings file {}", path.display()))?;
    info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Writes `settings` to `path`, creating the parent directory if needed.
pub fn save_to(settings: &ClientSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).with_context(|| format!("write settings file {}", path.display()))?;
    info!(path = %path.display(), "saved settings");
    Ok(())
}
