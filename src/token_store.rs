//! Persists the Vault token at the conventional per-user location
//! (`~/.vault-token`), last-write-wins, no versioning.

use crate::error::Error;
use std::path::{Path, PathBuf};

const TOKEN_FILE_NAME: &str = ".vault-token";

pub struct TokenStore {
    // Resolved exactly once at construction; never recomputed mid-operation.
    path: PathBuf,
}

impl TokenStore {
    /// Resolve the store against the user's home directory.
    pub fn new() -> Result<Self, Error> {
        let dirs = directories::UserDirs::new().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine home directory",
            )
        })?;

        Ok(Self {
            path: dirs.home_dir().join(TOKEN_FILE_NAME),
        })
    }

    /// Store against an explicit path. Used by tests and by callers that
    /// override the token location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the token atomically: the contents land in a sibling temporary
    /// file first and replace the target in a single rename, so a partial
    /// write never corrupts an existing token.
    pub fn store(&self, token: &str) -> Result<(), Error> {
        let tmp = self.path.with_extension("tmp");

        std::fs::write(&tmp, token)?;
        set_owner_only(&tmp)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "token persisted");
        Ok(())
    }

    /// Read the stored token back, byte for byte.
    pub fn read(&self) -> Result<String, Error> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    /// Remove the stored token. Erasing a token that does not exist is not
    /// an error.
    pub fn erase(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in_temp_dir() -> (TokenStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::with_path(dir.path().join(TOKEN_FILE_NAME));
        (store, dir)
    }

    #[test]
    fn test_round_trip_exact_bytes() {
        let (store, _dir) = store_in_temp_dir();
        store.store("abc123").unwrap();
        assert_eq!(store.read().unwrap(), "abc123");
    }

    #[test]
    fn test_overwrite_last_write_wins() {
        let (store, _dir) = store_in_temp_dir();
        store.store("first").unwrap();
        store.store("second").unwrap();
        assert_eq!(store.read().unwrap(), "second");
    }

    #[test]
    fn test_erase_is_idempotent() {
        let (store, _dir) = store_in_temp_dir();
        store.store("abc123").unwrap();
        store.erase().unwrap();
        store.erase().unwrap();
    }

    #[test]
    fn test_read_after_erase_is_not_found() {
        let (store, _dir) = store_in_temp_dir();
        store.store("abc123").unwrap();
        store.erase().unwrap();

        match store.read().unwrap_err() {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = store_in_temp_dir();
        store.store("abc123").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_no_leftover_temp_file() {
        let (store, dir) = store_in_temp_dir();
        store.store("abc123").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![TOKEN_FILE_NAME]);
    }
}
