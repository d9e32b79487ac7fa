//! Key/value persistence
//!
//! Values are JSON strings. On the web they live in LocalStorage; natively
//! each key is a `<key>.json` file in the data directory.

use crate::error::StorageError;

/// Environment variable overriding the native data directory
pub const DATA_DIR_ENV: &str = "MERGE2048_DATA_DIR";

/// String key/value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{DATA_DIR_ENV, KeyValueStore};
    use crate::error::StorageError;

    /// One JSON file per key under a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// `$MERGE2048_DATA_DIR`, or the working directory
        pub fn from_env() -> Self {
            let dir = std::env::var_os(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            Self::new(dir)
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path(key)) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.dir)?;
            // Write-then-rename so a crash never leaves a truncated file
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            fs::write(&tmp, value)?;
            fs::rename(&tmp, self.path(key))?;
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;
    use crate::error::StorageError;

    /// Browser LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)
        }
    }

    impl KeyValueStore for LocalStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Self::storage()?
                .get_item(key)
                .map_err(|_| StorageError::Unavailable)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|_| StorageError::WriteRejected(key.to_string()))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|_| StorageError::Unavailable)
        }
    }
}

/// The platform's default store
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> FileStore {
    FileStore::from_env()
}

/// The platform's default store
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> LocalStore {
    LocalStore
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get_item("nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set_item("k", "{\"a\":1}").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(store.dir().join("k.json").exists());
        assert!(!store.dir().join("k.json.tmp").exists());

        store.set_item("k", "2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("2"));

        store.remove_item("k").unwrap();
        assert!(store.get_item("k").unwrap().is_none());
        // Removing twice is fine
        store.remove_item("k").unwrap();
    }
}
