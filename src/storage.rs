use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// The named records kept between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    RecipeBook,
    MealPlan,
}

impl StorageKey {
    pub fn name(self) -> &'static str {
        match self {
            StorageKey::RecipeBook => "recipeBook",
            StorageKey::MealPlan => "mealPlan",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialise {key}: {source}")]
    Serialization {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed record store. Records are always read and written whole.
pub trait Storage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: StorageKey, contents: &str) -> Result<(), StorageError>;
}

/// Reads and parses a record. Missing, empty and unparseable records all come
/// back as `None`; the latter is logged.
pub fn load_record<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: StorageKey,
) -> Result<Option<T>, StorageError> {
    let Some(contents) = storage.read(key)? else {
        return Ok(None);
    };
    if contents.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Discarding unreadable {} record: {e}", key.name());
            Ok(None)
        }
    }
}

pub fn save_record<T: Serialize>(
    storage: &mut dyn Storage,
    key: StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    let serialized = serde_json::to_string_pretty(value).map_err(|source| {
        StorageError::Serialization {
            key: key.name(),
            source,
        }
    })?;
    storage.write(key, &serialized)?;
    tracing::debug!("Persisted {} ({} bytes)", key.name(), serialized.len());
    Ok(())
}

/// One JSON file per record under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.name()))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Io {
                key: key.name(),
                source,
            })
    }

    fn write(&mut self, key: StorageKey, contents: &str) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            key: key.name(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        fs::write(self.path_for(key), contents).map_err(io_error)
    }
}

/// Volatile store, used for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: HashMap<StorageKey, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(&key).cloned())
    }

    fn write(&mut self, key: StorageKey, contents: &str) -> Result<(), StorageError> {
        self.records.insert(key, contents.to_string());
        Ok(())
    }
}
