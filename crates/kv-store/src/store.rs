//! [`JsonFileStore`]: a whole-file JSON object on disk.

use std::{
    ffi::OsStr,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// The persisted mapping. Keys are unique; order carries no meaning.
pub type Mapping = serde_json::Map<String, Value>;

/// Extension that older callers still pass; rewritten to `.json`.
const LEGACY_EXTENSION: &str = "pkl";

/// Errors from writing the store. Reads never fail; see [`JsonFileStore::load`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file or its temporary sibling could not be written.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping could not be serialised.
    #[error("store serialisation failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A key-value mapping persisted as one JSON object in a single file.
///
/// Every [`save`](Self::save) replaces the whole file. Readers tolerate a
/// missing, empty or corrupted file by returning an empty mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Create a handle for `path`. Nothing touches the filesystem yet.
    ///
    /// A `.pkl` extension is rewritten to `.json`. Relative paths resolve
    /// against the working directory at the time of each operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_path = if path.extension() == Some(OsStr::new(LEGACY_EXTENSION)) {
            path.with_extension("json")
        } else {
            path
        };
        Self { file_path }
    }

    /// The normalised path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Ensure the backing file exists, creating it with an empty object.
    ///
    /// An existing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if existence cannot be checked or the file
    /// cannot be created (for example, a missing parent directory).
    pub fn initialize_file(&self) -> Result<(), StoreError> {
        if self.file_path.try_exists()? {
            return Ok(());
        }
        self.save(&Mapping::new())
    }

    /// Persist `mapping`, fully replacing any previous contents.
    ///
    /// The new contents are written to a temporary file in the same directory
    /// and renamed over the old file, so readers never see a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialisation or any filesystem step fails.
    pub fn save(&self, mapping: &Mapping) -> Result<(), StoreError> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".kv-store-")
            .tempfile_in(self.parent_dir())?;
        serde_json::to_writer_pretty(&mut tmp, mapping)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.file_path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.file_path.display(), entries = mapping.len(), "store saved");
        Ok(())
    }

    /// Read the persisted mapping.
    ///
    /// Returns an empty mapping when the file is absent, empty, unreadable,
    /// not valid JSON, or valid JSON that is not an object.
    pub fn load(&self) -> Mapping {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Mapping::new(),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "store unreadable; treating as empty");
                return Mapping::new();
            }
        };

        if contents.trim().is_empty() {
            return Mapping::new();
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(path = %self.file_path.display(), "store is not a JSON object; treating as empty");
                Mapping::new()
            }
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "store is corrupted; treating as empty");
                Mapping::new()
            }
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}
