use std::path::{Path, PathBuf};

use crate::error::AuthError;
use crate::token::Token;

/// File-backed credential cache.
///
/// One cache file per application, holding the most recently obtained
/// [`Token`] as JSON. A save always replaces the whole file; reads never
/// fail the flow, they only decide whether re-authorization is needed.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at the conventional per-user location,
    /// `<home>/.credentials/<app_name>.json`.
    pub fn for_app(app_name: &str) -> Result<Self, AuthError> {
        let home = dirs::home_dir()
            .ok_or_else(|| AuthError::Config("could not determine home directory".to_string()))?;
        Ok(Self {
            path: home.join(".credentials").join(format!("{app_name}.json")),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token.
    ///
    /// Returns `None` when the file is missing or does not parse as a token.
    /// A corrupt cache is treated exactly like a missing one: the caller
    /// re-authorizes and the next save overwrites the bad content.
    pub fn load(&self) -> Option<Token> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "ignoring unreadable credential cache"
                );
                None
            }
        }
    }

    /// Write the token, fully replacing any previous cache content.
    ///
    /// The parent directory is created as needed. The cache holds a refresh
    /// token, so both directory and file are restricted to the owner on
    /// Unix-like systems.
    pub fn save(&self, token: &Token) -> Result<(), AuthError> {
        let write_err = |source: std::io::Error| AuthError::CacheWrite {
            path: self.path.clone(),
            source,
        };

        // Owner-only mode applies to directories created here; a pre-existing
        // directory keeps whatever permissions it already has.
        if let Some(dir) = self.path.parent() {
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                std::fs::DirBuilder::new()
                    .recursive(true)
                    .mode(0o700)
                    .create(dir)
                    .map_err(write_err)?;
            }
            #[cfg(not(unix))]
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(token)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        std::fs::write(&self.path, content).map_err(write_err)?;

        // Owner read/write only on Unix-like systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        Ok(())
    }
}
