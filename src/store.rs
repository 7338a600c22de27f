use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The stored form of an alias: whichever of the three address fields the
/// alias binds. The range is kept in its canonical string form.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worksheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

/// Persistent alias mapping. The resolution engine takes a store at
/// construction rather than reaching for ambient global config, so tests can
/// hand it a `MemStore`.
pub trait AliasStore {
    fn get(&self, name: &str) -> Option<AliasRecord>;
    fn set(&mut self, name: &str, record: AliasRecord);
    /// Returns whether the alias existed.
    fn remove(&mut self, name: &str) -> bool;
    fn list(&self) -> BTreeMap<String, AliasRecord>;
    /// Write any pending changes out to the backing storage.
    fn flush(&self) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    aliases: BTreeMap<String, AliasRecord>,
}

/// Alias store backed by a JSON file on disk.
pub struct FileStore {
    path: PathBuf,
    aliases: BTreeMap<String, AliasRecord>,
}

impl FileStore {
    pub fn open(path: &str) -> Result<Self> {
        let p = Path::new(path);
        if !p.exists() {
            info!("Alias file not found, starting empty: {}", path);
            return Ok(FileStore {
                path: p.to_path_buf(),
                aliases: BTreeMap::new(),
            });
        }

        debug!("Loading aliases from: {}", path);
        let content = fs::read_to_string(p)?;
        let file: StoreFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse alias file {}: {}", path, e))?;

        debug!("Loaded {} aliases", file.aliases.len());
        Ok(FileStore {
            path: p.to_path_buf(),
            aliases: file.aliases,
        })
    }
}

impl AliasStore for FileStore {
    fn get(&self, name: &str) -> Option<AliasRecord> {
        self.aliases.get(name).cloned()
    }

    fn set(&mut self, name: &str, record: AliasRecord) {
        self.aliases.insert(name.to_string(), record);
    }

    fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove(name).is_some()
    }

    fn list(&self) -> BTreeMap<String, AliasRecord> {
        self.aliases.clone()
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&StoreFile {
            aliases: self.aliases.clone(),
        })?;
        fs::write(&self.path, json)?;
        debug!("Saved {} aliases to {}", self.aliases.len(), self.path.display());
        Ok(())
    }
}

/// In-memory alias store, used as the test fake.
#[derive(Debug, Default)]
pub struct MemStore {
    aliases: BTreeMap<String, AliasRecord>,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }
}

impl AliasStore for MemStore {
    fn get(&self, name: &str) -> Option<AliasRecord> {
        self.aliases.get(name).cloned()
    }

    fn set(&mut self, name: &str, record: AliasRecord) {
        self.aliases.insert(name.to_string(), record);
    }

    fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove(name).is_some()
    }

    fn list(&self) -> BTreeMap<String, AliasRecord> {
        self.aliases.clone()
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(workbook: Option<&str>, worksheet: Option<&str>, range: Option<&str>) -> AliasRecord {
        AliasRecord {
            workbook: workbook.map(String::from),
            worksheet: worksheet.map(String::from),
            range: range.map(String::from),
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        let path = path.to_str().unwrap();

        let mut store = FileStore::open(path).unwrap();
        store.set("mybook", record(Some("wb"), None, None));
        store.set("mydata", record(Some("wb"), Some("ws"), Some("A1:B2")));
        store.flush().unwrap();

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.get("mybook"), Some(record(Some("wb"), None, None)));
        assert_eq!(
            reopened.get("mydata"),
            Some(record(Some("wb"), Some("ws"), Some("A1:B2")))
        );
        assert_eq!(reopened.get("missing"), None);
        assert_eq!(reopened.list().len(), 2);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let store = FileStore::open(path.to_str().unwrap()).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn file_store_creates_parent_dirs_on_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/down/aliases.json");
        let path = path.to_str().unwrap();

        let mut store = FileStore::open(path).unwrap();
        store.set("x", record(Some("wb"), None, None));
        store.flush().unwrap();

        assert!(Path::new(path).exists());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(FileStore::open(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn remove_reports_existence() {
        let mut store = MemStore::new();
        store.set("x", record(Some("wb"), None, None));
        assert!(store.remove("x"));
        assert!(!store.remove("x"));
    }

    #[test]
    fn record_serialization_skips_empty_fields() {
        let json = serde_json::to_string(&record(Some("wb"), None, None)).unwrap();
        assert_eq!(json, r#"{"workbook":"wb"}"#);
    }
}
