use crate::contribution::Contribution;
use crate::counting_set::CountingSet;
use crate::scene::short_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Answer to "is this scene listed in the build settings?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScenePresence {
    pub present: bool,
    /// The short name resolves to more than one full scene path.
    pub ambiguous: bool,
}

impl ScenePresence {
    const ABSENT: Self = Self {
        present: false,
        ambiguous: false,
    };
    const UNIQUE: Self = Self {
        present: true,
        ambiguous: false,
    };
    const AMBIGUOUS: Self = Self {
        present: true,
        ambiguous: true,
    };
}

/// Project-wide union of every stored contribution.
///
/// Each union is counted per contributing file, so a fact stays present until the
/// last file asserting it is dropped. Built-in tags are seeded once and sit outside
/// the accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedIndex {
    builtin_tags: BTreeSet<String>,

    scene_names: CountingSet<String>,
    scene_names_in_build_settings: CountingSet<String>,
    disabled_scene_names_in_build_settings: CountingSet<String>,
    tags: CountingSet<String>,
    layers: CountingSet<String>,
    inputs: CountingSet<String>,

    short_name_at_build_settings: CountingSet<String>,
    disabled_short_name_at_build_settings: CountingSet<String>,
    short_name_all: CountingSet<String>,
}

impl AggregatedIndex {
    pub fn new<I, S>(builtin_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            builtin_tags: builtin_tags.into_iter().map(Into::into).collect(),
            scene_names: CountingSet::new(),
            scene_names_in_build_settings: CountingSet::new(),
            disabled_scene_names_in_build_settings: CountingSet::new(),
            tags: CountingSet::new(),
            layers: CountingSet::new(),
            inputs: CountingSet::new(),
            short_name_at_build_settings: CountingSet::new(),
            disabled_short_name_at_build_settings: CountingSet::new(),
            short_name_all: CountingSet::new(),
        }
    }

    /// Back to the seeded state: built-in tags only.
    pub(crate) fn reset(&mut self) {
        self.scene_names.clear();
        self.scene_names_in_build_settings.clear();
        self.disabled_scene_names_in_build_settings.clear();
        self.tags.clear();
        self.layers.clear();
        self.inputs.clear();
        self.short_name_at_build_settings.clear();
        self.disabled_short_name_at_build_settings.clear();
        self.short_name_all.clear();
    }

    pub(crate) fn add(&mut self, contribution: &Contribution) {
        for name in &contribution.scene_names_in_build_settings {
            self.scene_names_in_build_settings.add(name.clone());
            self.short_name_at_build_settings.add(short_name(name).to_string());
        }
        for name in &contribution.disabled_scene_names_in_build_settings {
            self.disabled_scene_names_in_build_settings.add(name.clone());
            self.disabled_short_name_at_build_settings.add(short_name(name).to_string());
        }
        for name in &contribution.scene_names {
            self.scene_names.add(name.clone());
            self.short_name_all.add(short_name(name).to_string());
        }
        add_all(&mut self.tags, &contribution.tags);
        add_all(&mut self.layers, &contribution.layers);
        add_all(&mut self.inputs, &contribution.inputs);
    }

    /// Subtract a contribution previously passed to [`AggregatedIndex::add`].
    pub(crate) fn remove(&mut self, contribution: &Contribution) {
        for name in &contribution.scene_names_in_build_settings {
            remove_counted(&mut self.scene_names_in_build_settings, name);
            remove_counted(&mut self.short_name_at_build_settings, short_name(name));
        }
        for name in &contribution.disabled_scene_names_in_build_settings {
            remove_counted(&mut self.disabled_scene_names_in_build_settings, name);
            remove_counted(&mut self.disabled_short_name_at_build_settings, short_name(name));
        }
        for name in &contribution.scene_names {
            remove_counted(&mut self.scene_names, name);
            remove_counted(&mut self.short_name_all, short_name(name));
        }
        for name in &contribution.tags {
            remove_counted(&mut self.tags, name);
        }
        for name in &contribution.layers {
            remove_counted(&mut self.layers, name);
        }
        for name in &contribution.inputs {
            remove_counted(&mut self.inputs, name);
        }
    }

    /// True if `name` is a known full scene path, or its short name matches any scene.
    #[must_use]
    pub fn is_scene_exists(&self, name: &str) -> bool {
        self.scene_names.contains(name) || self.short_name_all.contains(short_name(name))
    }

    #[must_use]
    pub fn is_scene_presented_at_build_settings(&self, name: &str) -> ScenePresence {
        match self.short_name_at_build_settings.count(short_name(name)) {
            0 if self.scene_names_in_build_settings.contains(name) => ScenePresence::UNIQUE,
            0 => ScenePresence::ABSENT,
            1 => ScenePresence::UNIQUE,
            _ => ScenePresence::AMBIGUOUS,
        }
    }

    #[must_use]
    pub fn is_scene_disabled_at_build_settings(&self, name: &str) -> bool {
        self.disabled_short_name_at_build_settings
            .contains(short_name(name))
            || self.disabled_scene_names_in_build_settings.contains(name)
    }

    /// Names a completion consumer may offer: unambiguous short names plus every full path.
    #[must_use]
    pub fn all_possible_scene_names(&self) -> BTreeSet<&str> {
        self.short_name_all
            .items()
            .filter(|(_, count)| *count == 1)
            .map(|(name, _)| name.as_str())
            .chain(self.scene_names.values().map(String::as_str))
            .collect()
    }

    #[must_use]
    pub fn scene_count_in_build_settings(&self) -> usize {
        self.scene_names_in_build_settings.len()
    }

    /// Enabled build-settings scenes, followed by the disabled ones when requested.
    pub fn scenes_from_build_settings(
        &self,
        include_disabled: bool,
    ) -> impl Iterator<Item = &str> + '_ {
        let disabled = include_disabled
            .then(|| self.disabled_scene_names_in_build_settings.values())
            .into_iter()
            .flatten();
        self.scene_names_in_build_settings
            .values()
            .chain(disabled)
            .map(String::as_str)
    }

    /// Built-in tags followed by every declared tag not already built in.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.builtin_tags.iter().map(String::as_str).chain(
            self.tags
                .values()
                .map(String::as_str)
                .filter(|tag| !self.builtin_tags.contains(*tag)),
        )
    }

    pub fn all_layers(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.values().map(String::as_str)
    }

    pub fn all_inputs(&self) -> impl Iterator<Item = &str> + '_ {
        self.inputs.values().map(String::as_str)
    }

    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.builtin_tags.contains(name) || self.tags.contains(name)
    }

    #[must_use]
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.contains(name)
    }

    #[must_use]
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains(name)
    }

    #[must_use]
    pub fn builtin_tags(&self) -> &BTreeSet<String> {
        &self.builtin_tags
    }

    /// Raw counters keyed by short name, for diagnostics and tests.
    #[must_use]
    pub fn short_name_at_build_settings(&self) -> &CountingSet<String> {
        &self.short_name_at_build_settings
    }

    #[must_use]
    pub fn disabled_short_name_at_build_settings(&self) -> &CountingSet<String> {
        &self.disabled_short_name_at_build_settings
    }

    #[must_use]
    pub fn short_name_all(&self) -> &CountingSet<String> {
        &self.short_name_all
    }

    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scene_names.len()
    }

    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.all_tags().count()
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }
}

fn add_all(set: &mut CountingSet<String>, names: &BTreeSet<String>) {
    for name in names {
        set.add(name.clone());
    }
}

fn remove_counted(set: &mut CountingSet<String>, name: &str) {
    debug_assert!(
        set.contains(name),
        "removing `{name}` which no stored contribution added"
    );
    set.remove(name);
}
