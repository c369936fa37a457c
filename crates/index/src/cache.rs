use crate::aggregate::AggregatedIndex;
use crate::builder::{ContributionBuilder, SourceFile};
use crate::config::SettingsIndexConfig;
use crate::contribution::{Contribution, FileKey};
use crate::store::ContributionStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Cache shared between a host's analysis workers and its query paths.
///
/// Build under the read guard; merge, drop and `merge_loaded` under the write guard.
pub type SharedSettingsCache = Arc<RwLock<SettingsCache>>;

/// What a merge did to the stored contribution for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    Inserted,
    Replaced,
    Removed,
    Unchanged,
}

/// Summary of a bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub files: usize,
    pub skipped_empty: usize,
    pub scenes: usize,
    pub build_settings_scenes: usize,
    pub tags: usize,
    pub layers: usize,
    pub inputs: usize,
}

/// Per-file contributions and the aggregate derived from them.
///
/// The aggregate always equals the sum of the stored contributions, whether it
/// was reached through single merges or a bulk [`SettingsCache::merge_loaded`].
#[derive(Debug)]
pub struct SettingsCache {
    builder: ContributionBuilder,
    store: ContributionStore,
    index: AggregatedIndex,
}

impl SettingsCache {
    #[must_use]
    pub fn new(config: SettingsIndexConfig) -> Self {
        let builder = ContributionBuilder::new(config.serialization_mode);
        Self::with_builder(config.builtin_tags, builder)
    }

    /// Cache whose builder carries extra asset handlers. Availability follows the
    /// serialization mode the builder was created with.
    #[must_use]
    pub fn with_builder<I, S>(builtin_tags: I, builder: ContributionBuilder) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            builder,
            store: ContributionStore::new(),
            index: AggregatedIndex::new(builtin_tags),
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedSettingsCache {
        Arc::new(RwLock::new(self))
    }

    #[must_use]
    pub fn index(&self) -> &AggregatedIndex {
        &self.index
    }

    #[must_use]
    pub fn store(&self) -> &ContributionStore {
        &self.store
    }

    #[must_use]
    pub fn builder(&self) -> &ContributionBuilder {
        &self.builder
    }

    /// Candidate contribution for `file`. Touches neither the store nor the aggregate.
    #[must_use]
    pub fn build(&self, file: &SourceFile, is_startup: bool) -> Option<Contribution> {
        self.builder.build(file, is_startup)
    }

    /// Install `candidate` as the contribution of `key`, replacing any previous one.
    ///
    /// `None` or an empty contribution removes the file's entry.
    pub fn merge(&mut self, key: &FileKey, candidate: Option<Contribution>) -> MergeOutcome {
        let candidate = candidate.and_then(Contribution::non_empty);

        let previous = self.store.remove(key);
        if let Some(previous) = &previous {
            self.index.remove(previous);
        }

        let outcome = match (&previous, &candidate) {
            (None, None) => MergeOutcome::Unchanged,
            (None, Some(_)) => MergeOutcome::Inserted,
            (Some(_), None) => MergeOutcome::Removed,
            (Some(old), Some(new)) if old == new => MergeOutcome::Unchanged,
            (Some(_), Some(_)) => MergeOutcome::Replaced,
        };

        if let Some(candidate) = candidate {
            self.index.add(&candidate);
            self.store.insert(key.clone(), candidate);
        }

        log::debug!("Merged settings contribution for {key}: {outcome:?}");
        outcome
    }

    /// Forget everything `key` contributed.
    pub fn drop_file(&mut self, key: &FileKey) -> MergeOutcome {
        self.merge(key, None)
    }

    /// Build `file` and merge the result.
    pub fn update(&mut self, file: &SourceFile, is_startup: bool) -> MergeOutcome {
        let candidate = self.build(file, is_startup);
        self.merge(file.key(), candidate)
    }

    /// Replace the store with a persisted snapshot and re-derive the aggregate from it.
    pub fn merge_loaded<I>(&mut self, snapshot: I) -> LoadStats
    where
        I: IntoIterator<Item = (FileKey, Contribution)>,
    {
        self.index.reset();

        let mut stats = LoadStats::default();
        let mut files = BTreeMap::new();
        for (key, contribution) in snapshot {
            let Some(contribution) = contribution.non_empty() else {
                stats.skipped_empty += 1;
                continue;
            };
            self.index.add(&contribution);
            // A later duplicate key replaces the earlier entry.
            if let Some(replaced) = files.insert(key, contribution) {
                self.index.remove(&replaced);
            }
        }
        self.store.replace_all(files);

        stats.files = self.store.len();
        stats.scenes = self.index.scene_count();
        stats.build_settings_scenes = self.index.scene_count_in_build_settings();
        stats.tags = self.index.tag_count();
        stats.layers = self.index.layer_count();
        stats.inputs = self.index.input_count();
        log::info!("Loaded settings index snapshot: {stats:?}");
        stats
    }

    /// Owned copy of the stored contributions, ready to be persisted.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<FileKey, Contribution> {
        self.store.files().clone()
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new(SettingsIndexConfig::default())
    }
}
