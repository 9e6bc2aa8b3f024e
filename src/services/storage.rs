//! Durable storage for the session token

use serde_json::{Map, Value};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Well-known key the token is persisted under
pub const TOKEN_KEY: &str = "auth_token";

/// Backend that keeps the token across restarts
#[cfg_attr(test, mockall::automock)]
pub trait TokenStorage: Send + Sync {
    /// Read the persisted token, `None` when nothing is stored
    fn load(&self) -> io::Result<Option<String>>;

    fn store(&self, token: &str) -> io::Result<()>;

    /// Remove the persisted token. Clearing an empty storage succeeds.
    fn clear(&self) -> io::Result<()>;
}

/// Token persisted as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> io::Result<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let document: Map<String, Value> = serde_json::from_str(&raw)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

        Ok(document.get(TOKEN_KEY).and_then(Value::as_str).map(str::to_string))
    }

    fn store(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut document = Map::new();
        document.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        let body = serde_json::to_vec_pretty(&document)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

        // Atomic replace through a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn store(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
