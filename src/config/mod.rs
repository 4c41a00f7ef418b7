//! Local configuration store.
//!
//! Settings live in memory behind a read-mostly lock and are persisted to a
//! per-user TOML file. Session-only changes never touch the file.

pub mod settings;

pub use settings::{ConfigName, ConfigValue, Settings};

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::github::error::{GitHubError, GitHubResult};

/// Directory name used under the platform config/data directories.
pub const APP_DIR: &str = "ghcmd";

/// File name of the persisted settings.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Default location of the settings file, if the platform has a config dir.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Configuration provider backed by an optional settings file.
#[derive(Debug)]
pub struct Configuration {
    path: Option<PathBuf>,
    current: RwLock<Settings>,
}

impl Configuration {
    /// In-memory configuration with defaults and no backing file.
    #[must_use]
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            current: RwLock::new(settings),
        }
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = read_settings_file(&path);
        Self {
            path: Some(path),
            current: RwLock::new(settings),
        }
    }

    /// Load from the per-user default location.
    #[must_use]
    pub fn load_default() -> Self {
        match default_settings_path() {
            Some(path) => Self::load(path),
            None => {
                warn!("No per-user configuration directory; settings will not be persisted");
                Self::in_memory(Settings::default())
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> Settings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn get(&self, name: ConfigName) -> ConfigValue {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
    }

    /// Change one setting; persisted unless `session_only`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a type mismatch, `Config` when the file cannot be written.
    pub fn set(
        &self,
        name: ConfigName,
        value: impl Into<ConfigValue>,
        session_only: bool,
    ) -> GitHubResult<()> {
        let value = value.into();
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            current.set(name, value.clone())?;
        }
        debug!("Configuration {name} set (session only: {session_only})");

        if session_only {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Only the changed property is written; other persisted values stay as they are.
        let mut persisted = read_settings_file(path);
        persisted.set(name, value)?;
        write_settings_file(path, &persisted)
    }

    /// Restore defaults; unless `session_only`, also delete the settings file.
    ///
    /// # Errors
    ///
    /// `Config` when the file exists but cannot be removed.
    pub fn reset(&self, session_only: bool) -> GitHubResult<()> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Settings::default();
        if session_only {
            return Ok(());
        }
        if let Some(path) = &self.path
            && path.exists()
        {
            std::fs::remove_file(path).map_err(|e| {
                GitHubError::Config(format!("failed to remove {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }

    /// Discard session-only changes by re-reading the settings file.
    pub fn restore_from_file(&self) {
        let settings = self
            .path
            .as_deref()
            .map(read_settings_file)
            .unwrap_or_default();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Write the current settings to `path`.
    ///
    /// # Errors
    ///
    /// `Config` when serialization or the write fails.
    pub fn backup_to(&self, path: &Path) -> GitHubResult<()> {
        write_settings_file(path, &self.snapshot())
    }

    /// Replace both the in-memory and persisted settings with the contents of `path`.
    ///
    /// # Errors
    ///
    /// `Config` when `path` cannot be read or parsed, or the settings file
    /// cannot be written.
    pub fn restore_from(&self, path: &Path) -> GitHubResult<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GitHubError::Config(format!("failed to read {}: {e}", path.display())))?;
        let settings: Settings = toml::from_str(&contents)
            .map_err(|e| GitHubError::Config(format!("failed to parse {}: {e}", path.display())))?;
        if let Some(own) = &self.path {
            write_settings_file(own, &settings)?;
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }
}

fn read_settings_file(path: &Path) -> Settings {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
        Err(e) => {
            warn!("Failed to read settings from {}: {e}; using defaults", path.display());
            return Settings::default();
        }
    };
    toml::from_str(&contents).unwrap_or_else(|e| {
        warn!("Settings file {} is corrupt ({e}); using defaults", path.display());
        Settings::default()
    })
}

fn write_settings_file(path: &Path, settings: &Settings) -> GitHubResult<()> {
    let contents = toml::to_string_pretty(settings)
        .map_err(|e| GitHubError::Config(format!("failed to serialize settings: {e}")))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            GitHubError::Config(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, contents)
        .map_err(|e| GitHubError::Config(format!("failed to write {}: {e}", path.display())))
}
