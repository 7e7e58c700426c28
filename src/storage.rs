use crate::session::TokenStore;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no data directory available")]
    NoDataDir,
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode session: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not parse session file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

pub fn data_dir() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "songbirdcolumbia", "SongbirdDesk")?;
    Some(proj.data_dir().to_path_buf())
}

/// Persists the bearer token as a small TOML file so a restart keeps the
/// admin signed in.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self, StoreError> {
        let dir = data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::at(dir.join("session.toml")))
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io(e)),
        };
        let stored: StoredSession = toml::from_str(&text)?;
        Ok(Some(stored.token).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io(e))?;
        }
        let body = toml::to_string_pretty(&StoredSession {
            token: token.to_string(),
        })?;
        fs::write(&self.path, body).map_err(|e| self.io(e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io(e)),
        }
    }
}
