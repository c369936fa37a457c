use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable, opaque identity of a source file (its project-relative path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileKey(String);

impl FileKey {
    pub fn new(key: impl Into<String>) -> Self {
        let mut key = key.into();
        if key.contains('\\') {
            key = key.replace('\\', "/");
        }
        Self(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FileKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<FileKey> for String {
    fn from(value: FileKey) -> Self {
        value.0
    }
}

/// Facts a single source file asserts into the aggregated settings index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Canonical project-relative paths of scenes found anywhere in the project.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub scene_names: BTreeSet<String>,

    /// Full scene paths listed as enabled in the build settings.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub scene_names_in_build_settings: BTreeSet<String>,

    /// Full scene paths listed as disabled in the build settings.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub disabled_scene_names_in_build_settings: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub layers: BTreeSet<String>,

    /// Input axis names.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub inputs: BTreeSet<String>,
}

impl Contribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scene_names.is_empty()
            && self.scene_names_in_build_settings.is_empty()
            && self.disabled_scene_names_in_build_settings.is_empty()
            && self.tags.is_empty()
            && self.layers.is_empty()
            && self.inputs.is_empty()
    }

    pub fn add_scene(&mut self, path: impl Into<String>) {
        self.scene_names.insert(path.into());
    }

    pub fn add_build_settings_scene(&mut self, path: impl Into<String>) {
        self.scene_names_in_build_settings.insert(path.into());
    }

    pub fn add_disabled_build_settings_scene(&mut self, path: impl Into<String>) {
        self.disabled_scene_names_in_build_settings.insert(path.into());
    }

    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.insert(name.into());
    }

    pub fn add_layer(&mut self, name: impl Into<String>) {
        self.layers.insert(name.into());
    }

    pub fn add_input(&mut self, name: impl Into<String>) {
        self.inputs.insert(name.into());
    }

    /// `Some(self)` unless the contribution carries no facts.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}
