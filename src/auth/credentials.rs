use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// The session token pair persisted between invocations.
///
/// Both fields are always present together; there is no partial record. The
/// pair is replaced wholesale on every refresh because the server may rotate
/// the refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Single-slot storage for the current session's credentials.
///
/// There is exactly one credential record system-wide; no provider or
/// profile namespace exists.
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials.
    ///
    /// A missing or unreadable file means "logged out", so this returns
    /// `None` rather than an error for any failure to produce a record.
    fn load(&self) -> Option<Credentials>;

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError>;

    /// Remove the stored record. Absent file is not an error.
    fn clear(&self) -> Result<(), AuthError>;

    fn exists(&self) -> bool {
        self.load().is_some()
    }
}

/// File-backed credential store writing a single JSON file with
/// owner-only permissions.
///
/// # Example
/// ```no_run
/// use mainbase::auth::{Credentials, CredentialStore, FileCredentialStore};
///
/// let store = FileCredentialStore::new_default();
/// store.save(&Credentials {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
/// })?;
/// # Ok::<(), mainbase::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `~/.config/mainbase-cli/credentials.json`.
    pub fn new_default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credentials> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        Self::ensure_parent(&self.path)?;
        let serialized = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("mainbase-cli")
        .join("credentials.json")
}
