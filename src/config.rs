//! Configuration for loading a [`ProguardMap`](crate::ProguardMap).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Where to find the mapping and how strictly to parse it.
///
/// Usually embedded in a larger JSON config, unknown keys are ignored.
///
/// ```
/// use std::path::Path;
///
/// use proguard_map::MapConfig;
///
/// let config = MapConfig::from_json(
///     r#"{"proguard_map": "build/mapping.txt", "skip_malformed_lines": true}"#,
/// )
/// .unwrap();
/// assert_eq!(config.proguard_map.as_deref(), Some(Path::new("build/mapping.txt")));
/// assert!(config.skip_malformed_lines);
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MapConfig {
    /// Path of the mapping report. Without one every translation is the
    /// identity.
    pub proguard_map: Option<PathBuf>,
    /// Skip malformed lines instead of failing.
    pub skip_malformed_lines: bool,
}

impl MapConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }
}
