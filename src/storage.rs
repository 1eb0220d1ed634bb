//! Durable client-side key/value storage backed by a JSON file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ClientError;

const FILE_NAME: &str = "local_storage.json";

pub const TOKEN_KEY: &str = "token";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const PRIMARY_COLOR_KEY: &str = "primaryColor";
pub const SECONDARY_COLOR_KEY: &str = "secondaryColor";

#[derive(Clone, Debug)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(FILE_NAME),
        }
    }

    fn read_all(&self) -> Map<String, Value> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "ignoring unreadable local storage");
                Map::new()
            }
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.read_all()
            .remove(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ClientError> {
        let mut map = self.read_all();
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_all(&map)
    }

    pub fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut map = self.read_all();
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));
        assert_eq!(storage.get::<String>(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, &"abc").unwrap();
        storage.set(DARK_MODE_KEY, &true).unwrap();
        assert_eq!(storage.get::<String>(TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(storage.get::<bool>(DARK_MODE_KEY), Some(true));

        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get::<String>(TOKEN_KEY), None);
        assert_eq!(storage.get::<bool>(DARK_MODE_KEY), Some(true));
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), "{not json").unwrap();
        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.get::<bool>(DARK_MODE_KEY), None);
        storage.set(DARK_MODE_KEY, &false).unwrap();
        assert_eq!(storage.get::<bool>(DARK_MODE_KEY), Some(false));
    }
}
