use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
#[cfg(unix)]
use std::{
    fs::Permissions,
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
};

use serde::{Deserialize, Serialize};

/// Connection parameters written after every successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SavedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no saved configuration found at {0}")]
    Missing(String),
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait ConfigStore {
    fn load(&self) -> Result<Option<SavedConfig>, ConfigError>;
    fn save(&self, config: &SavedConfig) -> Result<(), ConfigError>;
    /// Where the record lives, for messages.
    fn location(&self) -> String;
}

/// JSON file store, by default `$HOME/.skil/config.json`.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `SKIL_CONFIG_PATH` if set, else `$HOME/.skil/config.json`, else
    /// `.skil/config.json` relative to the working directory.
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var("SKIL_CONFIG_PATH") {
            return Self::new(path);
        }
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default();
        Self::new(base.join(".skil").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// The record holds a password, so on Unix the file is readable by its owner only.
fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let file = options.open(path)?;
    // mode() only applies on creation; tighten files left by older saves
    #[cfg(unix)]
    file.set_permissions(Permissions::from_mode(0o600))?;
    Ok(file)
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Option<SavedConfig>, ConfigError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, config: &SavedConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let raw = serde_json::to_vec_pretty(config).map_err(|source| ConfigError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        let mut file = open_private(&self.path).map_err(|e| self.io_err(e))?;
        file.write_all(&raw).map_err(|e| self.io_err(e))?;
        tracing::debug!(path=%self.path.display(), "saved connection config");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    saved: Mutex<Option<SavedConfig>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_saved(config: SavedConfig) -> Self {
        Self {
            saved: Mutex::new(Some(config)),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Option<SavedConfig>, ConfigError> {
        Ok(self
            .saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, config: &SavedConfig) -> Result<(), ConfigError> {
        *self
            .saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(config.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
