use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use workshop_logging::{workshop_debug, workshop_warn};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Per-session storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageSlot {
    Sidebar,
    Personality,
    GzDoors,
    Chat,
    Annotations,
}

impl StorageSlot {
    pub fn key(self) -> &'static str {
        match self {
            StorageSlot::Sidebar => "sidebar",
            StorageSlot::Personality => "personality",
            StorageSlot::GzDoors => "gz_doors",
            StorageSlot::Chat => "chat",
            StorageSlot::Annotations => "annotations",
        }
    }
}

pub const LAST_SESSION_KEY: &str = "workshop:last_session";

pub fn session_key(session_id: &str, slot: StorageSlot) -> String {
    format!("workshop:{session_id}:{}", slot.key())
}

/// Directory-backed key/value store of JSON documents. Last write wins.
#[derive(Debug, Clone)]
pub struct LocalStore {
    writer: AtomicFileWriter,
}

impl LocalStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    /// Missing, unreadable and corrupt entries all read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                workshop_warn!("cannot read {}: {}", path.display(), err);
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                workshop_warn!("discarding corrupt entry {}: {}", key, err);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let encoded = serde_json::to_vec_pretty(value)?;
        let path = self.writer.write(&file_name_for(key), &encoded)?;
        workshop_debug!("stored {} at {}", key, path.display());
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_slot<T: DeserializeOwned>(&self, session_id: &str, slot: StorageSlot) -> Option<T> {
        self.get(&session_key(session_id, slot))
    }

    pub fn set_slot<T: Serialize + ?Sized>(
        &self,
        session_id: &str,
        slot: StorageSlot,
        value: &T,
    ) -> Result<(), PersistError> {
        self.set(&session_key(session_id, slot), value)
    }

    pub fn last_session(&self) -> Option<String> {
        self.get::<String>(LAST_SESSION_KEY)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn set_last_session(&self, session_id: &str) -> Result<(), PersistError> {
        self.set(LAST_SESSION_KEY, session_id)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.writer.dir().join(file_name_for(key))
    }
}

// Keys contain ':' which is not a valid filename character everywhere.
fn file_name_for(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '.'
            }
        })
        .collect();
    format!("{safe}.json")
}
