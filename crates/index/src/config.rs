use serde::{Deserialize, Serialize};

/// Tags every project has, whether or not its tag manager declares them.
pub const BUILTIN_TAGS: [&str; 7] = [
    "Untagged",
    "Respawn",
    "Finish",
    "EditorOnly",
    "MainCamera",
    "Player",
    "GameController",
];

pub const SERIALIZATION_MODE_ENV: &str = "SETTINGS_INDEX_SERIALIZATION_MODE";

/// How the project serializes its assets. Only force-text assets can be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSerializationMode {
    #[default]
    ForceText,
    Mixed,
    ForceBinary,
}

impl AssetSerializationMode {
    #[must_use]
    pub const fn is_force_text(self) -> bool {
        matches!(self, Self::ForceText)
    }

    /// Mode from [`SERIALIZATION_MODE_ENV`], defaulting to force-text.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = std::env::var(SERIALIZATION_MODE_ENV).ok();
        parse_serialization_mode(raw.as_deref())
    }
}

/// Parse a serialization mode name; missing or unknown values fall back to force-text.
#[must_use]
pub fn parse_serialization_mode(raw: Option<&str>) -> AssetSerializationMode {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return AssetSerializationMode::default();
    };
    match value.to_ascii_lowercase().replace('-', "_").as_str() {
        "force_text" | "text" => AssetSerializationMode::ForceText,
        "mixed" => AssetSerializationMode::Mixed,
        "force_binary" | "binary" => AssetSerializationMode::ForceBinary,
        other => {
            log::warn!("Unknown asset serialization mode {other:?}; assuming force_text");
            AssetSerializationMode::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsIndexConfig {
    pub serialization_mode: AssetSerializationMode,
    pub builtin_tags: Vec<String>,
}

impl SettingsIndexConfig {
    /// Defaults with the serialization mode taken from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            serialization_mode: AssetSerializationMode::from_env(),
            ..Self::default()
        }
    }
}

impl Default for SettingsIndexConfig {
    fn default() -> Self {
        Self {
            serialization_mode: AssetSerializationMode::default(),
            builtin_tags: BUILTIN_TAGS.iter().map(|tag| (*tag).to_string()).collect(),
        }
    }
}
