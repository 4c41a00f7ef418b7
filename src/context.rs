//! Explicit process state shared by every call: settings and credentials.

use std::path::Path;

use crate::auth::{CredentialPaths, CredentialStore};
use crate::config::{Configuration, Settings};

/// Configuration plus credential cache for one application.
///
/// Built once at start-up and shared as `Arc<GitHubContext>`; both halves are
/// read-mostly and safe for concurrent readers.
#[derive(Debug)]
pub struct GitHubContext {
    config: Configuration,
    credentials: CredentialStore,
}

impl GitHubContext {
    #[must_use]
    pub fn new(config: Configuration, credentials: CredentialStore) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Per-user settings file and encrypted token store.
    #[must_use]
    pub fn load_default() -> Self {
        Self::new(Configuration::load_default(), CredentialStore::load_default())
    }

    /// Settings file and token store rooted at `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            Configuration::load(dir.join(crate::config::SETTINGS_FILE)),
            CredentialStore::with_paths(CredentialPaths::in_dir(dir)),
        )
    }

    /// Nothing persisted; useful for tests and embedding.
    #[must_use]
    pub fn ephemeral(settings: Settings) -> Self {
        Self::new(Configuration::in_memory(settings), CredentialStore::in_memory())
    }

    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Drop session-only state: settings revert to the file, the cached token is forgotten.
    pub fn reset(&self) {
        self.config.restore_from_file();
        self.credentials.reset_session();
    }
}
