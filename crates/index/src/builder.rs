use crate::config::AssetSerializationMode;
use crate::contribution::{Contribution, FileKey};
use crate::error::Result;
use crate::scene::is_scene_path;
use std::path::{Path, PathBuf};

/// A project file offered to the contribution builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    key: FileKey,
    asset_path: String,
    location: PathBuf,
    in_asset_module: bool,
}

impl SourceFile {
    /// A file belonging to the project's asset module.
    ///
    /// `asset_path` is the canonical project-relative path (`Assets/...`,
    /// `ProjectSettings/...`); `location` is where handlers read it from.
    pub fn asset(asset_path: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        let key = FileKey::new(asset_path);
        Self {
            asset_path: key.as_str().to_string(),
            key,
            location: location.into(),
            in_asset_module: true,
        }
    }

    /// A file outside the asset module; never applicable.
    pub fn external(path: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            in_asset_module: false,
            ..Self::asset(path, location)
        }
    }

    #[must_use]
    pub fn key(&self) -> &FileKey {
        &self.key
    }

    #[must_use]
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    #[must_use]
    pub fn in_asset_module(&self) -> bool {
        self.in_asset_module
    }

    #[must_use]
    pub fn is_scene(&self) -> bool {
        is_scene_path(&self.asset_path)
    }
}

/// One asset kind (build settings, tag manager, input manager, ...) able to
/// populate part of a contribution.
pub trait SettingsAssetHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_applicable(&self, file: &SourceFile) -> bool;

    fn build(
        &self,
        file: &SourceFile,
        is_startup: bool,
        contribution: &mut Contribution,
    ) -> Result<()>;
}

/// Records a scene file's own path as an existing scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneFileHandler;

impl SettingsAssetHandler for SceneFileHandler {
    fn name(&self) -> &'static str {
        "scene_file"
    }

    fn is_applicable(&self, file: &SourceFile) -> bool {
        file.is_scene()
    }

    fn build(
        &self,
        file: &SourceFile,
        _is_startup: bool,
        contribution: &mut Contribution,
    ) -> Result<()> {
        contribution.add_scene(file.asset_path());
        Ok(())
    }
}

/// Runs the ordered handler list over a file to produce its contribution.
pub struct ContributionBuilder {
    serialization_mode: AssetSerializationMode,
    handlers: Vec<Box<dyn SettingsAssetHandler>>,
}

impl ContributionBuilder {
    /// Builder with only the scene-file handler registered.
    #[must_use]
    pub fn new(serialization_mode: AssetSerializationMode) -> Self {
        Self {
            serialization_mode,
            handlers: vec![Box::new(SceneFileHandler)],
        }
    }

    /// Append a handler; handlers run in registration order.
    #[must_use]
    pub fn with_handler(mut self, handler: impl SettingsAssetHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.serialization_mode.is_force_text()
    }

    #[must_use]
    pub fn is_applicable(&self, file: &SourceFile) -> bool {
        self.is_available() && file.in_asset_module()
    }

    /// Contribution for `file`, or `None` when it is not applicable, carries no
    /// facts, or a handler fails.
    #[must_use]
    pub fn build(&self, file: &SourceFile, is_startup: bool) -> Option<Contribution> {
        if !self.is_applicable(file) {
            return None;
        }

        let mut contribution = Contribution::new();
        for handler in &self.handlers {
            if !handler.is_applicable(file) {
                continue;
            }
            if let Err(err) = handler.build(file, is_startup, &mut contribution) {
                log::warn!(
                    "Settings handler {} failed on {}: {err}",
                    handler.name(),
                    file.key()
                );
                return None;
            }
        }

        contribution.non_empty()
    }

    pub fn handler_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|handler| handler.name())
    }
}

impl std::fmt::Debug for ContributionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContributionBuilder")
            .field("serialization_mode", &self.serialization_mode)
            .field("handlers", &self.handler_names().collect::<Vec<_>>())
            .finish()
    }
}
