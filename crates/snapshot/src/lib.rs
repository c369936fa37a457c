//! # Settings Snapshot
//!
//! Persistence for per-file settings contributions, so a settings index can be
//! restored at startup without re-analyzing every project file.
//!
//! ```text
//! SettingsCache::snapshot()
//!     │
//!     ├──> SnapshotStore::save (JSON, atomic rename)
//!     │
//!     └──> SnapshotStore::load ──> SettingsCache::merge_loaded
//! ```

mod error;
mod marshaller;
mod paths;
mod snapshot;

pub use error::{Result, SnapshotError};
pub use marshaller::{ContributionMarshaller, JsonMarshaller};
pub use paths::{snapshot_path_for_project_root, SNAPSHOT_DIR_NAME, SNAPSHOT_FILE_NAME};
pub use snapshot::{SnapshotStore, SNAPSHOT_SCHEMA_VERSION};
