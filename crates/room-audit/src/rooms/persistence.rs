use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::domain::Room;

pub const SCHEMA_VERSION: u32 = 1;

/// Versioned on-disk layout for the full room collection. History rides
/// embedded inside each room record.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomsDocument {
    pub schema_version: u32,
    pub rooms: Vec<Room>,
}

impl RoomsDocument {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            rooms,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage failure: {0}")]
    Io(#[from] io::Error),
    #[error("stored room data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored room data uses schema version {found}, expected {expected}")]
    UnsupportedSchema { found: u32, expected: u32 },
}

/// Load/save contract for the full room collection.
pub trait PersistenceGateway: Send + Sync {
    /// Missing prior data yields an empty collection, never an error.
    /// Malformed or mismatched data is an error, not a silent empty state.
    fn load_all(&self) -> Result<Vec<Room>, PersistenceError>;

    /// Full-collection overwrite.
    fn save_all(&self, rooms: &[Room]) -> Result<(), PersistenceError>;
}

/// File-backed store. Saves write a sibling staging file and rename it
/// over the target, so a crash mid-save leaves the previous file readable.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.as_os_str().to_owned();
        staged.push(".tmp");
        PathBuf::from(staged)
    }
}

impl PersistenceGateway for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Room>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let document: RoomsDocument = serde_json::from_str(&raw)?;
        if document.schema_version != SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedSchema {
                found: document.schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(document.rooms)
    }

    fn save_all(&self, rooms: &[Room]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = serde_json::to_string_pretty(&RoomsDocument::new(rooms.to_vec()))?;
        let staged = self.staging_path();
        fs::write(&staged, payload)?;
        fs::rename(&staged, &self.path)?;
        Ok(())
    }
}

/// Volatile store for demos and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: Mutex<Vec<Room>>,
}

impl PersistenceGateway for MemoryStore {
    fn load_all(&self) -> Result<Vec<Room>, PersistenceError> {
        Ok(self.rooms.lock().expect("store mutex poisoned").clone())
    }

    fn save_all(&self, rooms: &[Room]) -> Result<(), PersistenceError> {
        *self.rooms.lock().expect("store mutex poisoned") = rooms.to_vec();
        Ok(())
    }
}
