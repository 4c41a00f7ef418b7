//! Access token resolution and per-user encrypted storage.
//!
//! Resolution order for every request:
//! 1. the value supplied explicitly by the caller,
//! 2. the value cached in memory for this context,
//! 3. the encrypted token file,
//! 4. the `GITHUB_TOKEN` environment variable,
//! 5. nothing: the call proceeds unauthenticated.
//!
//! Each step is a fallback. A file that cannot be decrypted is reported with a
//! warning and skipped.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::config::APP_DIR;
use crate::github::error::{GitHubError, GitHubResult};

/// Environment variable consulted after the stored credential.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const TOKEN_FILE: &str = "access_token.enc";
const KEY_FILE: &str = "access_token.key";
const NONCE_LEN: usize = 12;

/// Where the encrypted token and its key live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    pub token_file: PathBuf,
    pub key_file: PathBuf,
}

impl CredentialPaths {
    /// Both files inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            token_file: dir.join(TOKEN_FILE),
            key_file: dir.join(KEY_FILE),
        }
    }

    /// Per-user default under the platform data directory.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::data_local_dir().map(|dir| Self::in_dir(&dir.join(APP_DIR)))
    }
}

/// Access token provider for one [`GitHubContext`](crate::GitHubContext).
#[derive(Debug)]
pub struct CredentialStore {
    paths: Option<CredentialPaths>,
    cached: RwLock<Option<SecretString>>,
    read_env: bool,
    warned_anonymous: AtomicBool,
}

impl CredentialStore {
    /// Store with no file backing and no environment fallback.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            paths: None,
            cached: RwLock::new(None),
            read_env: false,
            warned_anonymous: AtomicBool::new(false),
        }
    }

    /// Store backed by the encrypted file at `paths`.
    #[must_use]
    pub fn with_paths(paths: CredentialPaths) -> Self {
        Self {
            paths: Some(paths),
            ..Self::in_memory()
        }
    }

    /// Per-user default store, with the environment fallback enabled.
    #[must_use]
    pub fn load_default() -> Self {
        Self {
            paths: CredentialPaths::default_location(),
            read_env: true,
            ..Self::in_memory()
        }
    }

    /// Enable or disable the `GITHUB_TOKEN` fallback.
    #[must_use]
    pub fn read_env(mut self, enabled: bool) -> Self {
        self.read_env = enabled;
        self
    }

    /// Resolve the token for one call.
    ///
    /// Returns `None` when no source has a token; the first such call emits a
    /// warning unless `suppress_warning` is set.
    pub fn resolve(
        &self,
        explicit: Option<&SecretString>,
        suppress_warning: bool,
    ) -> Option<SecretString> {
        if let Some(token) = explicit.filter(|t| !t.expose_secret().is_empty()) {
            return Some(clone_secret(token));
        }

        if let Some(token) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Some(clone_secret(token));
        }

        if let Some(paths) = &self.paths {
            match read_encrypted(paths) {
                Ok(Some(token)) => {
                    debug!("Access token loaded from {}", paths.token_file.display());
                    let out = clone_secret(&token);
                    *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
                    return Some(out);
                }
                Ok(None) => {}
                Err(e) => warn!(
                    "Stored access token at {} could not be read ({e}); continuing without it",
                    paths.token_file.display()
                ),
            }
        }

        if self.read_env
            && let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            return Some(SecretString::from(token));
        }

        if !suppress_warning && !self.warned_anonymous.swap(true, Ordering::Relaxed) {
            warn!(
                "No access token is configured; requests are unauthenticated and subject to \
                 stricter rate limits"
            );
        }
        None
    }

    /// Cache `token` for this session and, unless `session_only`, encrypt it to disk.
    ///
    /// # Errors
    ///
    /// `Credential` when the token or key file cannot be written.
    pub fn set_authentication(&self, token: SecretString, session_only: bool) -> GitHubResult<()> {
        if token.expose_secret().is_empty() {
            return Err(GitHubError::InvalidInput("access token cannot be empty".into()));
        }
        if !session_only && let Some(paths) = &self.paths {
            write_encrypted(paths, &token)?;
        }
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    /// Forget the cached token and, unless `session_only`, delete the stored one.
    ///
    /// # Errors
    ///
    /// `Credential` when an existing file cannot be removed.
    pub fn clear_authentication(&self, session_only: bool) -> GitHubResult<()> {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.warned_anonymous.store(false, Ordering::Relaxed);
        if session_only {
            return Ok(());
        }
        if let Some(paths) = &self.paths {
            for file in [&paths.token_file, &paths.key_file] {
                if file.exists() {
                    std::fs::remove_file(file).map_err(|e| {
                        GitHubError::Credential(format!("failed to remove {}: {e}", file.display()))
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Whether a token is cached or stored, without consulting the environment.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
            || self
                .paths
                .as_ref()
                .is_some_and(|p| p.token_file.exists())
    }

    /// Drop the session cache; stored files are untouched.
    pub(crate) fn reset_session(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.warned_anonymous.store(false, Ordering::Relaxed);
    }
}

fn clone_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

fn cipher_for(key_bytes: &[u8]) -> Result<ChaCha20Poly1305, String> {
    ChaCha20Poly1305::new_from_slice(key_bytes).map_err(|_| "invalid key length".to_string())
}

fn read_encrypted(paths: &CredentialPaths) -> Result<Option<SecretString>, String> {
    let encoded = match std::fs::read_to_string(&paths.token_file) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    let key = std::fs::read(&paths.key_file).map_err(|e| format!("key file: {e}"))?;
    let cipher = cipher_for(&key)?;

    let blob = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("not base64: {e}"))?;
    if blob.len() <= NONCE_LEN {
        return Err("file is truncated".into());
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| "decryption failed".to_string())?;
    let token = String::from_utf8(plaintext).map_err(|_| "token is not UTF-8".to_string())?;
    Ok(Some(SecretString::from(token)))
}

fn write_encrypted(paths: &CredentialPaths, token: &SecretString) -> GitHubResult<()> {
    let fail = |what: &str, e: &dyn std::fmt::Display| {
        GitHubError::Credential(format!("failed to {what}: {e}"))
    };

    for file in [&paths.token_file, &paths.key_file] {
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fail("create credential directory", &e))?;
        }
    }

    let key = match std::fs::read(&paths.key_file) {
        Ok(existing) if existing.len() == 32 => existing,
        _ => {
            let fresh = ChaCha20Poly1305::generate_key(&mut OsRng).to_vec();
            write_private(&paths.key_file, &fresh).map_err(|e| fail("write key file", &e))?;
            fresh
        }
    };
    let cipher = cipher_for(&key).map_err(|e| fail("initialize cipher", &e))?;
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, token.expose_secret().as_bytes())
        .map_err(|e| fail("encrypt token", &e))?;

    let mut blob = nonce.to_vec();
    blob.extend_from_slice(&ciphertext);
    write_private(&paths.token_file, STANDARD.encode(blob).as_bytes())
        .map_err(|e| fail("write token file", &e))
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
