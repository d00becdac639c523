//! File-backed session token storage for the terminal client.

use crop_advisor_core::error::{ClientError, Result};
use crop_advisor_core::session::TokenStore;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keeps the bearer token in a single file, by default
/// `~/.config/crop-advisor/token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read token file");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        self.write(token).map_err(|e| {
            ClientError::Storage(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), "Token stored");
        Ok(())
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Token removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not remove token file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested").join("token"))
    }

    #[test]
    fn missing_file_means_no_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get(), None);
        assert!(!store.has_token());
    }

    #[test]
    fn set_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set("tok-123").unwrap();

        assert!(store.path().exists());
        assert_eq!(store.get().as_deref(), Some("tok-123"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("tok-123").unwrap();
        fs::write(store.path(), "  tok-123\n").unwrap();

        assert_eq!(store.get().as_deref(), Some("tok-123"));
    }

    #[test]
    fn blank_file_means_no_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("x").unwrap();
        fs::write(store.path(), "\n").unwrap();

        assert_eq!(store.get(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("tok").unwrap();

        store.clear();
        assert!(!store.path().exists());
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("tok").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
