// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.ron";

/// Default number of corridors a single room may lead to
pub const DEFAULT_MAX_CHILD_CORRIDORS: usize = 3;

/// Tunables for room graph validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSettings {
    /// Settings format version
    pub version: u32,
    /// Maximum number of corridors a room may have as children
    pub max_child_corridors: usize,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            max_child_corridors: DEFAULT_MAX_CHILD_CORRIDORS,
        }
    }
}

impl GraphSettings {
    /// Default settings with a different corridor fan-out
    pub fn with_max_child_corridors(max_child_corridors: usize) -> Self {
        Self {
            max_child_corridors,
            ..Self::default()
        }
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::from_str(s)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion(settings.version));
        }
        Ok(settings)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&contents)?;
        tracing::info!(
            "Loaded graph settings from {:?} (max_child_corridors = {})",
            path,
            settings.max_child_corridors
        );
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No settings at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed settings file
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings written by a newer version
    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GraphSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.max_child_corridors, 3);
    }

    #[test]
    fn test_serialization() {
        let settings = GraphSettings::with_max_child_corridors(5);
        let ron_str = settings.to_ron().unwrap();
        let loaded = GraphSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = GraphSettings::from_ron("(version: 99, max_child_corridors: 3)");
        assert!(matches!(result, Err(SettingsError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        assert_eq!(GraphSettings::load_or_default(&path).unwrap(), GraphSettings::default());

        GraphSettings::with_max_child_corridors(1).save(&path).unwrap();
        let loaded = GraphSettings::load_or_default(&path).unwrap();
        assert_eq!(loaded.max_child_corridors, 1);
    }
}
