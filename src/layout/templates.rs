use crate::error::ConfigError;
use crate::geometry::Point;
use crate::graph::NodeKind;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Subtype given to children seeded into a fresh container.
pub const SEED_CHILD_SUBTYPE: &str = "subflow-child";

/// A child node created together with its container, at a fixed offset
/// inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedChild {
    pub offset: Point,
    #[serde(default = "default_seed_subtype")]
    pub subtype: String,
    #[serde(default)]
    pub label: String,
}

fn default_seed_subtype() -> String {
    SEED_CHILD_SUBTYPE.to_string()
}

impl SeedChild {
    pub fn new(x: f64, y: f64, label: &str) -> Self {
        Self {
            offset: Point::new(x, y),
            subtype: default_seed_subtype(),
            label: label.to_string(),
        }
    }
}

/// What creating a node of a given subtype means.
///
/// A subtype that seeds children is always a container. When loaded from
/// JSON, `kind` defaults to `container` if `seeds` is non-empty, and an
/// explicit `leaf` with seeds is rejected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawBehavior")]
pub struct SubtypeBehavior {
    pub kind: NodeKind,
    pub seeds: Vec<SeedChild>,
}

#[derive(Deserialize)]
struct RawBehavior {
    #[serde(default)]
    kind: Option<NodeKind>,
    #[serde(default)]
    seeds: Vec<SeedChild>,
}

impl TryFrom<RawBehavior> for SubtypeBehavior {
    type Error = ConfigError;

    fn try_from(raw: RawBehavior) -> Result<Self, Self::Error> {
        let kind = match (raw.kind, raw.seeds.is_empty()) {
            (Some(NodeKind::Leaf), false) => {
                return Err(ConfigError::InvalidBehavior(
                    "a leaf subtype cannot seed children".to_string(),
                ));
            }
            (Some(kind), _) => kind,
            (None, true) => NodeKind::Leaf,
            (None, false) => NodeKind::Container,
        };
        Ok(Self {
            kind,
            seeds: raw.seeds,
        })
    }
}

impl SubtypeBehavior {
    pub fn container() -> Self {
        Self {
            kind: NodeKind::Container,
            seeds: Vec::new(),
        }
    }

    /// Adds a seed child, turning the behaviour into a container.
    pub fn with_seed(mut self, seed: SeedChild) -> Self {
        self.kind = NodeKind::Container;
        self.seeds.push(seed);
        self
    }
}

/// Registration table from subtype to behaviour.
///
/// Subtypes without an entry are plain leaves with no seeded children, so
/// adding a subtype is a data change only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtypeCatalog {
    behaviors: AHashMap<String, SubtypeBehavior>,
}

impl Default for SubtypeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SubtypeCatalog {
    pub fn empty() -> Self {
        Self {
            behaviors: AHashMap::new(),
        }
    }

    /// The collection operators that open a nested sub-flow.
    pub fn builtin() -> Self {
        Self::empty()
            .with_subtype(
                "subflow-if-else",
                SubtypeBehavior::container().with_seed(SeedChild::new(50.0, 100.0, "child node")),
            )
            .with_subtype(
                "subflow-map",
                SubtypeBehavior::container()
                    .with_seed(SeedChild::new(50.0, 100.0, "child node"))
                    .with_seed(SeedChild::new(600.0, 100.0, "child node 2")),
            )
            .with_subtype("subflow-filter", SubtypeBehavior::container())
            .with_subtype("subflow-reduce", SubtypeBehavior::container())
            .with_subtype("subflow-find-first", SubtypeBehavior::container())
    }

    /// Parses a table of the form `{subtype: {"kind": .., "seeds": [..]}}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_subtype(mut self, subtype: &str, behavior: SubtypeBehavior) -> Self {
        self.behaviors.insert(subtype.to_string(), behavior);
        self
    }

    pub fn behavior(&self, subtype: &str) -> Option<&SubtypeBehavior> {
        self.behaviors.get(subtype)
    }

    pub fn kind_of(&self, subtype: &str) -> NodeKind {
        self.behavior(subtype).map(|b| b.kind).unwrap_or_default()
    }

    pub fn seeds_for(&self, subtype: &str) -> &[SeedChild] {
        self.behavior(subtype)
            .map(|b| b.seeds.as_slice())
            .unwrap_or(&[])
    }
}
