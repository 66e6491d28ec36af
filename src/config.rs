use crate::error::ConfigError;
use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::fs;

/// Tunables for drop resolution and container sizing.
///
/// Every field has a default, so a partial JSON document only overrides the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Footprint of a dropped node before its real size is known. Also used
    /// as the extent of any node that has no explicit size.
    pub probe_size: Size,
    /// Smallest size a container ever reports, with or without children.
    pub container_floor: Size,
    /// Added to the minimum size handed to interactive resizers.
    pub resizer_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            probe_size: Size::new(40.0, 40.0),
            container_floor: Size::new(500.0, 200.0),
            resizer_padding: 20.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
