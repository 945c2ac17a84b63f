use super::files::{atomic_write, backup_file, backup_name, ensure_dir, read_bytes, read_file};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A durable string slot per key
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Raw stored bytes, which need not be valid UTF-8
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key)?.map(String::into_bytes))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Keep a copy of the current value aside before it gets overwritten,
    /// under `<key>.corrupt.<timestamp>`
    fn backup(&mut self, key: &str) -> Result<()> {
        let Some(value) = self.get(key)? else {
            return Ok(());
        };
        let backup_key = backup_name(key, "corrupt", |candidate| {
            matches!(self.get(candidate), Ok(Some(_)))
        });
        self.set(&backup_key, &value)?;
        tracing::info!(key = %backup_key, "backed up unreadable data");
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = ensure_dir(dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_file(self.path_for(key))
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        read_bytes(self.path_for(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        atomic_write(self.path_for(key), value)
    }

    fn backup(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            let backup_path = backup_file(&path, "corrupt")?;
            tracing::info!(path = %backup_path.display(), "backed up unreadable data");
        }
        Ok(())
    }
}

/// In-memory store, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .values
            .keys()
            .map(String::as_str)
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
