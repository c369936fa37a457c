use std::path::{Path, PathBuf};

/// Project-local cache directory the engine already keeps out of version control.
pub const SNAPSHOT_DIR_NAME: &str = "Library";
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

const SNAPSHOT_SUBDIR_NAME: &str = "settings-index";

#[must_use]
pub fn snapshot_path_for_project_root(root: &Path) -> PathBuf {
    root.join(SNAPSHOT_DIR_NAME)
        .join(SNAPSHOT_SUBDIR_NAME)
        .join(SNAPSHOT_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_lives_under_library() {
        let path = snapshot_path_for_project_root(Path::new("/work/game"));
        assert_eq!(
            path,
            PathBuf::from("/work/game/Library/settings-index/snapshot.json")
        );
    }
}
