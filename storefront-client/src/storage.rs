//! Session storage - JSON files under a per-session directory
//!
//! Holds the persisted cart and the bearer token. Nothing here is shared
//! across sessions; each session directory is independent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// File name of the persisted cart
pub const CART_FILE: &str = "cart.json";
/// File name of the bearer token
pub const TOKEN_FILE: &str = "token";

/// JSON document stored at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save<T: Serialize>(&self, value: &T) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, json)
    }

    /// `None` when the file is missing or unreadable as `T`
    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        if !self.path.exists() {
            return None;
        }
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Bearer token kept as a plain text file
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Trimmed token; missing, empty or unreadable files yield `None`.
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    pub fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Storage rooted at one session directory
#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cart_file(&self) -> JsonFile {
        JsonFile::new(self.dir.join(CART_FILE))
    }

    pub fn token_file(&self) -> TokenFile {
        TokenFile::new(self.dir.join(TOKEN_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonFile::new(temp_dir.path().join("nested").join("doc.json"));

        assert!(!file.exists());
        assert!(file.load::<Vec<u32>>().is_none());

        file.save(&vec![1u32, 2, 3]).unwrap();
        assert!(file.exists());
        assert_eq!(file.load::<Vec<u32>>().unwrap(), vec![1, 2, 3]);

        file.delete().unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_json_file_corrupt_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonFile::new(temp_dir.path().join("doc.json"));
        fs::write(file.path(), "{ not json").unwrap();
        assert!(file.load::<Vec<u32>>().is_none());
    }

    #[test]
    fn test_token_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(temp_dir.path());
        let token = storage.token_file();

        assert!(token.load().is_none());

        fs::write(token.path(), "  \n").unwrap();
        assert!(token.load().is_none());

        token.save(" abc.def \n").unwrap();
        assert_eq!(token.load().as_deref(), Some("abc.def"));

        token.delete().unwrap();
        assert!(token.load().is_none());
    }
}
