use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::StoreError;

/// String key-value persistence, the shape of a browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key under `base_dir`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn open(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp_path, &path).map_err(io_err)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

pub(crate) fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Disk storage with an in-memory mirror. When the disk is unusable it
/// warns once and keeps going memory-only; callers never see an error.
#[derive(Debug)]
pub struct LocalStorage {
    disk: Option<FileStorage>,
    memory: MemoryStorage,
}

impl LocalStorage {
    pub fn open(base_dir: PathBuf) -> Self {
        let disk = match FileStorage::open(base_dir) {
            Ok(disk) => Some(disk),
            Err(e) => {
                warn!("storage unavailable, progress will not survive restart: {e}");
                None
            }
        };
        Self {
            disk,
            memory: MemoryStorage::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            disk: None,
            memory: MemoryStorage::default(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.disk.is_some()
    }

    fn degrade(&mut self, err: StoreError) {
        warn!("storage write failed, continuing in memory only: {err}");
        self.disk = None;
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.memory
            .get(key)
            .or_else(|| self.disk.as_ref().and_then(|d| d.get(key)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.memory.set(key, value)?;
        if let Some(disk) = self.disk.as_mut()
            && let Err(e) = disk.set(key, value)
        {
            self.degrade(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.memory.remove(key)?;
        if let Some(disk) = self.disk.as_mut()
            && let Err(e) = disk.remove(key)
        {
            self.degrade(e);
        }
        Ok(())
    }
}
