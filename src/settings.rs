use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::composer::Session;
use crate::constants::{DEFAULT_HEADERS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROTOCOL, SETTINGS_DIR, SETTINGS_FILE};
use crate::models::HeaderRow;

/// Connection defaults remembered between runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub protocol: String,
    pub port: String,
    pub headers: Vec<HeaderRow>,
    /// Request timeout; no timeout when absent
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: DEFAULT_HOST.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            port: DEFAULT_PORT.to_string(),
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| HeaderRow::new(*k, *v))
                .collect(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    /// Seed a session's connection fields
    pub fn apply_to(&self, session: &mut Session) {
        session.host = self.host.clone();
        session.protocol = self.protocol.clone();
        session.port = self.port.clone();
        session.header_rows = self.headers.clone();
    }

    /// Capture the session's connection fields, keeping the timeout
    pub fn update_from(&mut self, session: &Session) {
        self.host = session.host.trim().to_string();
        self.protocol = session.protocol.clone();
        self.port = session.port.trim().to_string();
        self.headers = session.header_rows.clone();
    }
}

/// Reads and writes the settings file
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// `~/.apitry/settings.yaml`
    pub fn new() -> Self {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_DIR);
        SettingsStore::at(dir.join(SETTINGS_FILE))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults when the file does not exist yet
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable settings");
            Settings::default()
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_yaml::to_string(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
