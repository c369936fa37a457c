//! # Settings Index
//!
//! Incremental aggregation of project settings facts (scenes, tags, layers,
//! input axes) contributed by individually analyzed project files.
//!
//! ## Pipeline
//!
//! ```text
//! File change (host)
//!     │
//!     ├──> ContributionBuilder (ordered asset handlers)
//!     │      └─> Contribution | None
//!     │
//!     ├──> SettingsCache::merge / drop
//!     │      ├─> subtract previous contribution (ContributionStore lookup)
//!     │      └─> add new contribution, store it
//!     │
//!     └──> AggregatedIndex
//!            └─> ambiguity-aware queries
//! ```
//!
//! ## Example
//!
//! ```
//! use settings_index::{Contribution, FileKey, SettingsCache, SettingsIndexConfig};
//!
//! let mut cache = SettingsCache::new(SettingsIndexConfig::default());
//!
//! let mut contribution = Contribution::new();
//! contribution.add_build_settings_scene("Assets/Scenes/Main.unity");
//! cache.merge(&FileKey::new("ProjectSettings/EditorBuildSettings.asset"), Some(contribution));
//!
//! let presence = cache.index().is_scene_presented_at_build_settings("Main");
//! assert!(presence.present);
//! assert!(!presence.ambiguous);
//! ```

mod aggregate;
mod builder;
mod cache;
mod config;
mod contribution;
mod counting_set;
mod error;
mod scene;
mod store;

pub use aggregate::{AggregatedIndex, ScenePresence};
pub use builder::{ContributionBuilder, SceneFileHandler, SettingsAssetHandler, SourceFile};
pub use cache::{LoadStats, MergeOutcome, SettingsCache, SharedSettingsCache};
pub use config::{
    parse_serialization_mode, AssetSerializationMode, SettingsIndexConfig, BUILTIN_TAGS,
    SERIALIZATION_MODE_ENV,
};
pub use contribution::{Contribution, FileKey};
pub use counting_set::CountingSet;
pub use error::{HandlerError, Result};
pub use scene::{is_scene_path, short_name, SCENE_FILE_EXTENSION};
pub use store::ContributionStore;
