//! Named-map store
//!
//! A small filesystem-backed name-to-transport-string store, the
//! counterpart of keeping one saved document per map name in a key/value
//! store. The engine never calls this implicitly; hosts wire the editor's
//! dirty flag to `save` at gesture end.

use std::path::PathBuf;

/// Error raised by store operations.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// Map names become file names; path separators are rejected.
    InvalidName(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store IO error: {}", e),
            StoreError::InvalidName(name) => write!(f, "invalid map name: {:?}", name),
        }
    }
}

impl std::error::Error for StoreError {}

const MAP_EXT: &str = "map";

/// Filesystem store of saved maps, one file per map name.
#[derive(Debug, Clone)]
pub struct MapStore {
    base_dir: PathBuf,
}

impl MapStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(format!("{}.{}", name, MAP_EXT)))
    }

    /// Save a transport string under a map name, creating the store
    /// directory if needed.
    pub fn save(&self, name: &str, data: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, data)?;
        log::info!("saved map {:?} ({} bytes)", name, data.len());
        Ok(())
    }

    /// Load the transport string saved under a map name. A missing map is
    /// `Ok(None)`, not an error.
    pub fn load(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(name)?;
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a saved map. Deleting a map that was never saved is fine.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all saved maps, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == MAP_EXT))
            .filter_map(|p| p.file_stem()?.to_str().map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }
}
