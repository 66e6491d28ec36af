//! Handle (port) descriptors and the registry that resolves them per subtype.
//!
//! Handles are never stored on nodes. They are derived from a node's subtype
//! every time they are needed, so a node always exposes exactly the ports its
//! subtype currently declares.

use crate::error::ConfigError;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

mod builtin;

/// Key used for the left-side fallback list.
pub const DEFAULT_SUBTYPE: &str = "default";

static GLOBAL_REGISTRY: Lazy<HandleRegistry> = Lazy::new(builtin::registry);

/// One of the two sides of a node.
///
/// Used both to pick a handle list (`resolve_handles`) and to describe where
/// an individual handle is drawn. Right-positioned handles emit edges,
/// left-positioned handles receive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// A named connection point on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleDescriptor {
    pub position: Side,
    pub id: String,
    pub label: String,
    pub icon: String,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub is_optional: bool,
}

impl HandleDescriptor {
    pub fn new(position: Side, id: &str, label: &str, icon: &str) -> Self {
        Self {
            position,
            id: id.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
            is_array: false,
            is_optional: false,
        }
    }

    /// Marks the handle as carrying a collection rather than a scalar.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Marks the handle as allowed to stay unconnected.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// Maps a subtype to its ordered left-side and right-side handle lists.
///
/// Resolution is total: an unknown subtype falls back to the `"default"`
/// entry on the left side and to an empty list on the right side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandleRegistry {
    #[serde(default)]
    left: AHashMap<String, Vec<HandleDescriptor>>,
    #[serde(default)]
    right: AHashMap<String, Vec<HandleDescriptor>>,
}

impl HandleRegistry {
    /// The built-in table, initialised on first use and never mutated.
    pub fn global() -> &'static HandleRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn builder() -> HandleRegistryBuilder {
        HandleRegistryBuilder::default()
    }

    /// Parses a table of the form `{"left": {subtype: [..]}, "right": {..}}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn resolve_handles(&self, subtype: &str, side: Side) -> &[HandleDescriptor] {
        match side {
            Side::Left => self
                .left
                .get(subtype)
                .or_else(|| self.left.get(DEFAULT_SUBTYPE))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            Side::Right => self.right.get(subtype).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Every handle a subtype exposes, left list first.
    pub fn all_handles(&self, subtype: &str) -> impl Iterator<Item = &HandleDescriptor> {
        self.resolve_handles(subtype, Side::Left)
            .iter()
            .chain(self.resolve_handles(subtype, Side::Right))
    }

    /// Looks up the handle `id` drawn at `position`, searching the left list
    /// before the right list.
    pub fn find_handle(
        &self,
        subtype: &str,
        id: &str,
        position: Side,
    ) -> Option<&HandleDescriptor> {
        self.all_handles(subtype)
            .find(|handle| handle.id == id && handle.position == position)
    }
}

/// Resolves handles against the process-wide built-in table.
pub fn resolve_handles(subtype: &str, side: Side) -> &'static [HandleDescriptor] {
    HandleRegistry::global().resolve_handles(subtype, side)
}

#[derive(Default)]
pub struct HandleRegistryBuilder {
    registry: HandleRegistry,
}

impl HandleRegistryBuilder {
    /// Starts from a copy of the built-in table.
    pub fn from_builtin() -> Self {
        Self {
            registry: HandleRegistry::global().clone(),
        }
    }

    /// Sets (or replaces) the handle list for `subtype` on `side`.
    pub fn with_handles(
        mut self,
        subtype: &str,
        side: Side,
        handles: Vec<HandleDescriptor>,
    ) -> Self {
        let table = match side {
            Side::Left => &mut self.registry.left,
            Side::Right => &mut self.registry.right,
        };
        table.insert(subtype.to_string(), handles);
        self
    }

    pub fn build(self) -> HandleRegistry {
        self.registry
    }
}
