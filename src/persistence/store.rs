use super::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Keys used in the store
pub mod keys {
    pub const THEME: &str = "theme";
    pub const NOTEPAD: &str = "notepadContent";
    pub const MAIN_TASK: &str = "mainTaskContent";
    pub const STATS: &str = "glassFocusStats";
}

/// String-keyed store persisted as a flat JSON object.
///
/// Every mutation is written through to disk before it returns.
#[derive(Debug, Clone, Default)]
pub struct KvStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl KvStore {
    /// Open the store at `path`. A missing file gives an empty store, and so
    /// does an unreadable one (the damage is logged and overwritten on the next write).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;

        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store is corrupt, starting empty");
                    BTreeMap::new()
                }
            }
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    /// A store that never touches disk
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store `value` under `key`. When the write fails the old value is put
    /// back, so memory never holds what disk does not.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize store")?;
        atomic_write(path, &json)
    }
}
