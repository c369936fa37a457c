use crate::contribution::{Contribution, FileKey};
use std::collections::BTreeMap;

/// Last contribution merged for every file that currently has one.
///
/// Empty contributions are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionStore {
    files: BTreeMap<FileKey, Contribution>,
}

impl ContributionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &FileKey) -> Option<&Contribution> {
        self.files.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &FileKey) -> bool {
        self.files.contains_key(key)
    }

    pub(crate) fn insert(
        &mut self,
        key: FileKey,
        contribution: Contribution,
    ) -> Option<Contribution> {
        debug_assert!(!contribution.is_empty(), "empty contributions are never stored");
        self.files.insert(key, contribution)
    }

    pub(crate) fn remove(&mut self, key: &FileKey) -> Option<Contribution> {
        self.files.remove(key)
    }

    pub(crate) fn replace_all(&mut self, files: BTreeMap<FileKey, Contribution>) {
        self.files = files;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileKey, &Contribution)> + '_ {
        self.files.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FileKey> + '_ {
        self.files.keys()
    }

    #[must_use]
    pub const fn files(&self) -> &BTreeMap<FileKey, Contribution> {
        &self.files
    }
}

impl IntoIterator for ContributionStore {
    type Item = (FileKey, Contribution);
    type IntoIter = std::collections::btree_map::IntoIter<FileKey, Contribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}
