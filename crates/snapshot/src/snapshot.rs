use crate::error::{Result, SnapshotError};
use serde::{Deserialize, Serialize};
use settings_index::{Contribution, ContributionStore, FileKey};
use std::collections::BTreeMap;
use std::path::Path;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Persisted map of file key to the contribution last merged for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotStore {
    files: BTreeMap<FileKey, Contribution>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSnapshot {
    schema_version: u32,
    files: BTreeMap<FileKey, Contribution>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_store(store: &ContributionStore) -> Self {
        Self {
            files: store.files().clone(),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let persisted: PersistedSnapshot = serde_json::from_slice(&bytes)?;
        if persisted.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedSchema {
                found: persisted.schema_version,
                expected: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        log::debug!(
            "Loaded {} settings contributions from {}",
            persisted.files.len(),
            path.display()
        );
        Ok(Self {
            files: persisted.files,
        })
    }

    /// Load `path`, or start empty when it does not exist yet.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            log::info!("No settings snapshot at {}; starting empty", path.display());
            return Ok(Self::new());
        }
        Self::load(path).await
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let persisted = PersistedSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            files: self.files.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Store `contribution` for `key`; empty contributions remove the entry.
    pub fn set_file(&mut self, key: FileKey, contribution: Contribution) {
        if contribution.is_empty() {
            self.files.remove(&key);
        } else {
            self.files.insert(key, contribution);
        }
    }

    pub fn remove_file(&mut self, key: &FileKey) -> bool {
        self.files.remove(key).is_some()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub const fn files(&self) -> &BTreeMap<FileKey, Contribution> {
        &self.files
    }

    /// Contributions in the form `SettingsCache::merge_loaded` consumes.
    #[must_use]
    pub fn into_contributions(self) -> BTreeMap<FileKey, Contribution> {
        self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use settings_index::SettingsCache;
    use tempfile::TempDir;

    fn cache_with_scenes() -> SettingsCache {
        let mut cache = SettingsCache::default();
        let mut build_settings = Contribution::new();
        build_settings.add_build_settings_scene("Assets/Foo.unity");
        build_settings.add_build_settings_scene("Assets/Pkg/Foo.unity");
        build_settings.add_disabled_build_settings_scene("Assets/Debug.unity");
        cache.merge(
            &FileKey::new("ProjectSettings/EditorBuildSettings.asset"),
            Some(build_settings),
        );

        let mut tags = Contribution::new();
        tags.add_tag("Enemy");
        tags.add_layer("Water");
        cache.merge(&FileKey::new("ProjectSettings/TagManager.asset"), Some(tags));
        cache
    }

    #[tokio::test]
    async fn roundtrip_restores_the_same_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Library/settings-index/snapshot.json");

        let cache = cache_with_scenes();
        SnapshotStore::from_store(cache.store())
            .save(&path)
            .await
            .unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = SnapshotStore::load(&path).await.unwrap();
        assert_eq!(loaded.file_count(), 2);

        let mut restored = SettingsCache::default();
        restored.merge_loaded(loaded.into_contributions());
        assert_eq!(restored.index(), cache.index());
        assert!(restored
            .index()
            .is_scene_presented_at_build_settings("Foo")
            .ambiguous);
    }

    #[tokio::test]
    async fn foreign_schema_version_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        tokio::fs::write(&path, br#"{"schema_version": 99, "files": {}}"#)
            .await
            .unwrap();

        let err = SnapshotStore::load(&path).await.unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedSchema {
                found: 99,
                expected: SNAPSHOT_SCHEMA_VERSION
            }
        ));
    }

    #[tokio::test]
    async fn missing_snapshot_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::load_or_default(tmp.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(store, SnapshotStore::new());
    }

    #[test]
    fn empty_contribution_removes_entry() {
        let mut store = SnapshotStore::new();
        let key = FileKey::new("ProjectSettings/InputManager.asset");
        let mut inputs = Contribution::new();
        inputs.add_input("Horizontal");
        store.set_file(key.clone(), inputs);
        assert_eq!(store.file_count(), 1);

        store.set_file(key.clone(), Contribution::new());
        assert_eq!(store.file_count(), 0);
        assert!(!store.remove_file(&key));
    }
}
