use pretty_assertions::assert_eq;
use settings_index::{
    short_name, Contribution, FileKey, ScenePresence, SettingsCache, SettingsIndexConfig,
};
use std::collections::BTreeMap;
use std::thread;

fn build_settings(paths: &[&str]) -> Contribution {
    let mut contribution = Contribution::new();
    for path in paths {
        contribution.add_build_settings_scene(*path);
    }
    contribution
}

fn presence(present: bool, ambiguous: bool) -> ScenePresence {
    ScenePresence { present, ambiguous }
}

/// Small deterministic generator so the operation sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) as usize) % bound
    }
}

const SCENES: [&str; 6] = [
    "Assets/Foo.unity",
    "Assets/Pkg/Foo.unity",
    "Assets/Bar.unity",
    "Assets/Levels/Bar.UNITY",
    "Assets/Menu.unity",
    "Packages/com.example/Boot.unity",
];

const NAMES: [&str; 4] = ["Player", "Enemy", "Water", "Jump"];

fn random_contribution(rng: &mut Lcg) -> Option<Contribution> {
    let mut contribution = Contribution::new();
    for scene in SCENES {
        match rng.below(6) {
            0 => contribution.add_build_settings_scene(scene),
            1 => contribution.add_disabled_build_settings_scene(scene),
            2 => contribution.add_scene(scene),
            _ => {}
        }
    }
    for name in NAMES {
        match rng.below(5) {
            0 => contribution.add_tag(name),
            1 => contribution.add_layer(name),
            2 => contribution.add_input(name),
            _ => {}
        }
    }
    match rng.below(4) {
        0 => None,
        _ => Some(contribution),
    }
}

fn expected_short_name_counts(cache: &SettingsCache) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (_, contribution) in cache.store().iter() {
        for path in &contribution.scene_names_in_build_settings {
            *counts.entry(short_name(path).to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn actual_short_name_counts(cache: &SettingsCache) -> BTreeMap<String, usize> {
    cache
        .index()
        .short_name_at_build_settings()
        .items()
        .map(|(name, count)| (name.clone(), count))
        .collect()
}

#[test]
fn short_name_counts_track_merged_files() {
    let mut rng = Lcg(7);
    let mut cache = SettingsCache::default();
    let keys: Vec<FileKey> = (0..5).map(|i| FileKey::new(format!("file-{i}"))).collect();

    for _ in 0..400 {
        let key = &keys[rng.below(keys.len())];
        if rng.below(5) == 0 {
            cache.drop_file(key);
        } else {
            let candidate = random_contribution(&mut rng);
            cache.merge(key, candidate);
        }
        assert_eq!(actual_short_name_counts(&cache), expected_short_name_counts(&cache));
    }
}

#[test]
fn merging_the_same_contribution_twice_is_idempotent() {
    let mut once = SettingsCache::default();
    let mut twice = SettingsCache::default();
    let key = FileKey::new("ProjectSettings/EditorBuildSettings.asset");
    let mut contribution = build_settings(&["Assets/Foo.unity", "Assets/Pkg/Foo.unity"]);
    contribution.add_tag("Enemy");

    once.merge(&key, Some(contribution.clone()));
    twice.merge(&key, Some(contribution.clone()));
    twice.merge(&key, Some(contribution));

    assert_eq!(once.index(), twice.index());
    assert_eq!(once.store(), twice.store());
}

#[test]
fn snapshot_reload_reproduces_incremental_state() {
    let mut rng = Lcg(42);
    let mut incremental = SettingsCache::default();
    let keys: Vec<FileKey> = (0..8).map(|i| FileKey::new(format!("Assets/f{i}.asset"))).collect();

    for _ in 0..200 {
        let key = &keys[rng.below(keys.len())];
        let candidate = random_contribution(&mut rng);
        incremental.merge(key, candidate);
    }

    let mut restored = SettingsCache::default();
    restored.merge(&FileKey::new("stale"), Some(build_settings(&["Assets/Stale.unity"])));
    restored.merge_loaded(incremental.snapshot());
    assert_eq!(restored.index(), incremental.index());
    assert_eq!(restored.store(), incremental.store());

    // Load order must not matter.
    let mut reversed = SettingsCache::default();
    reversed.merge_loaded(incremental.snapshot().into_iter().rev());
    assert_eq!(reversed.index(), incremental.index());
}

#[test]
fn short_name_ambiguity_comes_and_goes() {
    let mut cache = SettingsCache::default();
    let a = FileKey::new("A");
    let b = FileKey::new("B");

    cache.merge(&a, Some(build_settings(&["Assets/Foo.unity"])));
    assert_eq!(
        cache.index().is_scene_presented_at_build_settings("Foo"),
        presence(true, false)
    );

    cache.merge(&b, Some(build_settings(&["Assets/Pkg/Foo.unity"])));
    assert_eq!(
        cache.index().is_scene_presented_at_build_settings("Foo"),
        presence(true, true)
    );

    cache.drop_file(&b);
    assert_eq!(
        cache.index().is_scene_presented_at_build_settings("Foo"),
        presence(true, false)
    );
}

#[test]
fn full_path_is_found_without_collisions() {
    let mut cache = SettingsCache::default();
    cache.merge(
        &FileKey::new("ProjectSettings/EditorBuildSettings.asset"),
        Some(build_settings(&["Assets/Scenes/Credits.unity"])),
    );

    assert_eq!(
        cache
            .index()
            .is_scene_presented_at_build_settings("Assets/Scenes/Credits.unity"),
        presence(true, false)
    );
    assert_eq!(
        cache
            .index()
            .is_scene_presented_at_build_settings("Assets/Scenes/Intro.unity"),
        presence(false, false)
    );
}

#[test]
fn builtin_tags_survive_every_drop() {
    let mut cache = SettingsCache::new(SettingsIndexConfig::default());
    assert!(cache.index().has_tag("Untagged"));

    let key = FileKey::new("ProjectSettings/TagManager.asset");
    let mut tags = Contribution::new();
    tags.add_tag("Untagged");
    tags.add_tag("Enemy");
    cache.merge(&key, Some(tags));
    cache.drop_file(&key);

    assert!(cache.index().has_tag("Untagged"));
    assert!(cache.index().has_tag("MainCamera"));
    assert!(!cache.index().has_tag("Enemy"));
}

#[test]
fn names_shared_by_two_files_survive_one_drop() {
    let mut cache = SettingsCache::default();
    let mut first = Contribution::new();
    first.add_tag("Enemy");
    first.add_layer("Water");
    first.add_input("Jump");
    let second = first.clone();

    cache.merge(&FileKey::new("one"), Some(first));
    cache.merge(&FileKey::new("two"), Some(second));
    cache.drop_file(&FileKey::new("one"));

    assert!(cache.index().has_tag("Enemy"));
    assert!(cache.index().has_layer("Water"));
    assert!(cache.index().has_input("Jump"));

    cache.drop_file(&FileKey::new("two"));
    assert!(!cache.index().has_layer("Water"));
    assert_eq!(cache.index().all_inputs().count(), 0);
}

#[test]
fn shared_cache_serves_readers_while_a_writer_merges() {
    let shared = SettingsCache::default().into_shared();

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..50 {
                let path = format!("Assets/Scene{i}.unity");
                let mut guard = shared.write().expect("write lock");
                guard.merge(&FileKey::new(path.as_str()), Some(build_settings(&[path.as_str()])));
            }
        })
    };
    let reader = {
        let shared = shared.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                let guard = shared.read().expect("read lock");
                let count = guard.index().scene_count_in_build_settings();
                assert_eq!(count, guard.store().len());
            }
        })
    };

    writer.join().expect("writer");
    reader.join().expect("reader");
    let guard = shared.read().expect("read lock");
    assert_eq!(guard.index().scene_count_in_build_settings(), 50);
}
