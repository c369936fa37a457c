/// Extension of serialized scene files, including the leading dot.
pub const SCENE_FILE_EXTENSION: &str = ".unity";

/// Reduce a scene path to its short name: the last `/` segment with the scene
/// extension stripped (ASCII case-insensitive).
///
/// A name that is already short is returned unchanged.
#[must_use]
pub fn short_name(path: &str) -> &str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    strip_scene_extension(file_name).unwrap_or(file_name)
}

/// Whether `path` names a scene file.
#[must_use]
pub fn is_scene_path(path: &str) -> bool {
    strip_scene_extension(path).is_some()
}

fn strip_scene_extension(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(SCENE_FILE_EXTENSION.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, ext) = name.split_at(split);
    ext.eq_ignore_ascii_case(SCENE_FILE_EXTENSION).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_name_strips_directories_and_extension() {
        assert_eq!(short_name("Assets/Scenes/Main.unity"), "Main");
        assert_eq!(short_name("Assets/Scenes/Main.UNITY"), "Main");
        assert_eq!(short_name("Main.unity"), "Main");
    }

    #[test]
    fn short_name_keeps_bare_names_and_other_extensions() {
        assert_eq!(short_name("Main"), "Main");
        assert_eq!(short_name("Assets/Prefabs/Main.prefab"), "Main.prefab");
        assert_eq!(short_name("Assets/Scenes/"), "");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn scene_paths_are_detected_case_insensitively() {
        assert!(is_scene_path("Assets/Level.unity"));
        assert!(is_scene_path("Assets/Level.Unity"));
        assert!(!is_scene_path("ProjectSettings/TagManager.asset"));
        assert!(!is_scene_path("unity"));
        assert!(!is_scene_path("Assets/Сцена"));
    }
}
