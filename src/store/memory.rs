//! In-memory config store with an optional JSON snapshot on disk
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ConfigStore, Value};
use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Section {
    id: String,
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default)]
    options: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    sections: Vec<Section>,
}

/// Ordered sections kept in memory, written out as JSON on [`ConfigStore::save`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    sections: Vec<Section>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl MemoryStore {
    /// An empty store that never touches the disk
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Load the snapshot at `path`; a missing file opens an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let snapshot = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Snapshot {
                path: path.display().to_string(),
                source: e,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No store snapshot at {}, starting empty", path.display());
                Snapshot::default()
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        Ok(MemoryStore {
            sections: snapshot.sections,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    /// Whether there are changes not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn find(&self, section_type: &str, section_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.id == section_id && s.section_type == section_type)
    }

    fn find_mut(
        &mut self,
        section_type: &str,
        section_id: &str,
    ) -> Result<Option<&mut Section>, StoreError> {
        match self.sections.iter_mut().find(|s| s.id == section_id) {
            Some(s) if s.section_type != section_type => Err(StoreError::TypeMismatch {
                section_id: section_id.to_string(),
                expected: section_type.to_string(),
                actual: s.section_type.clone(),
            }),
            found => Ok(found),
        }
    }

    fn write_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        };
        let snapshot = Snapshot {
            sections: self.sections.clone(),
        };
        let content = serde_json::to_string_pretty(&snapshot).map_err(|e| StoreError::Snapshot {
            path: path.display().to_string(),
            source: e,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        // replace the snapshot in one step so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, section_type: &str, section_id: &str, key: &str) -> Option<Value> {
        self.find(section_type, section_id)
            .and_then(|s| s.options.get(key))
            .cloned()
    }

    fn set(
        &mut self,
        section_type: &str,
        section_id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        match self.find_mut(section_type, section_id)? {
            Some(section) => {
                section.options.insert(key.to_string(), value);
            }
            None => {
                debug!("Creating {} section {}", section_type, section_id);
                let mut options = BTreeMap::new();
                options.insert(key.to_string(), value);
                self.sections.push(Section {
                    id: section_id.to_string(),
                    section_type: section_type.to_string(),
                    options,
                });
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn unset(&mut self, section_type: &str, section_id: &str, key: &str) -> Result<(), StoreError> {
        if let Some(section) = self.find_mut(section_type, section_id)? {
            if section.options.remove(key).is_some() {
                self.dirty = true;
            }
        }
        Ok(())
    }

    fn foreach_section(&self, section_type: &str, f: &mut dyn FnMut(&str)) {
        self.sections
            .iter()
            .filter(|s| s.section_type == section_type)
            .for_each(|s| f(&s.id));
    }

    fn delete_section(&mut self, section_type: &str, section_id: &str) -> Result<(), StoreError> {
        let before = self.sections.len();
        self.sections
            .retain(|s| !(s.id == section_id && s.section_type == section_type));
        if self.sections.len() == before {
            return Err(StoreError::UnknownSection {
                section_type: section_type.to_string(),
                section_id: section_id.to_string(),
            });
        }
        self.dirty = true;
        Ok(())
    }

    fn reorder(&mut self, section_type: &str, order: &[&str]) -> Result<(), StoreError> {
        if let Some(missing) = order.iter().find(|id| self.find(section_type, id).is_none()) {
            return Err(StoreError::UnknownSection {
                section_type: section_type.to_string(),
                section_id: missing.to_string(),
            });
        }

        let slots: Vec<usize> = self
            .sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.section_type == section_type)
            .map(|(i, _)| i)
            .collect();

        // listed sections first in the requested order, the rest keep their relative order
        let rank = |id: &str| order.iter().position(|o| *o == id).unwrap_or(order.len());
        let mut typed: Vec<Section> = slots.iter().map(|&i| self.sections[i].clone()).collect();
        typed.sort_by_key(|s| rank(&s.id));

        for (slot, section) in slots.into_iter().zip(typed) {
            if self.sections[slot].id != section.id {
                self.dirty = true;
            }
            self.sections[slot] = section;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            self.write_snapshot(path)?;
            info!("Saved configuration to {}", path.display());
        }
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &MemoryStore, section_type: &str) -> Vec<String> {
        let mut out = Vec::new();
        store.foreach_section(section_type, &mut |id: &str| out.push(id.to_string()));
        out
    }

    #[test]
    fn set_creates_sections_in_order() {
        let mut store = MemoryStore::new();
        store.set("network", "cfg01", "id", "a".into()).unwrap();
        store.set("easytier", "global", "enabled", "1".into()).unwrap();
        store.set("network", "cfg02", "id", "b".into()).unwrap();

        assert_eq!(ids(&store, "network"), vec!["cfg01", "cfg02"]);
        assert_eq!(store.get("network", "cfg02", "id"), Some(Value::from("b")));
        assert_eq!(store.get("easytier", "cfg02", "id"), None);
        assert!(store.is_dirty());
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut store = MemoryStore::new();
        store.set("easytier", "global", "enabled", "1".into()).unwrap();
        let err = store.set("network", "global", "id", "x".into()).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[test]
    fn reorder_only_touches_one_type() {
        let mut store = MemoryStore::new();
        store.set("network", "a", "id", "a".into()).unwrap();
        store.set("easytier", "global", "enabled", "1".into()).unwrap();
        store.set("network", "b", "id", "b".into()).unwrap();
        store.set("network", "c", "id", "c".into()).unwrap();

        store.reorder("network", &["c", "a"]).unwrap();
        assert_eq!(ids(&store, "network"), vec!["c", "a", "b"]);
        assert_eq!(ids(&store, "easytier"), vec!["global"]);

        assert!(store.reorder("network", &["zz"]).is_err());
    }

    #[test]
    fn delete_unknown_section_fails() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.delete_section("network", "nope"),
            Err(StoreError::UnknownSection { .. })
        ));
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");

        let mut store = MemoryStore::open(&path).unwrap();
        store.set("easytier", "global", "network", "office-lan".into()).unwrap();
        store
            .set("easytier", "global", "peers", vec!["tcp://a.example:11010"].into())
            .unwrap();
        store.save().unwrap();
        assert!(!store.is_dirty());

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("easytier", "global", "network"),
            Some(Value::from("office-lan"))
        );
        assert_eq!(
            reopened.get("easytier", "global", "peers"),
            Some(Value::List(vec!["tcp://a.example:11010".to_string()]))
        );
    }

    #[test]
    fn malformed_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            MemoryStore::open(&path),
            Err(StoreError::Snapshot { .. })
        ));
    }
}
