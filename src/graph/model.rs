use crate::geometry::{Point, Size};
use crate::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Whether a node is an ordinary operation or a group that can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Leaf,
    Container,
}

/// Movement constraint relative to the parent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeExtent {
    /// The node may not be moved above or left of its parent's origin.
    Parent,
}

/// Opaque payload carried by a node for its renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NodeData {
    pub fn labelled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }
}

/// A node on the canvas.
///
/// `position` is canvas-absolute when `parent_id` is `None`, otherwise it is
/// relative to the parent container's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub kind: NodeKind,
    pub subtype: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub expand_parent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<NodeExtent>,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, subtype: &str) -> Self {
        Self {
            id: id.into(),
            kind,
            subtype: subtype.to_string(),
            position: Point::ORIGIN,
            size: None,
            parent_id: None,
            expand_parent: false,
            extent: None,
            data: NodeData::default(),
        }
    }

    pub fn leaf(id: impl Into<NodeId>, subtype: &str) -> Self {
        Self::new(id, NodeKind::Leaf, subtype)
    }

    pub fn container(id: impl Into<NodeId>, subtype: &str) -> Self {
        Self::new(id, NodeKind::Container, subtype)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn expanding_parent(mut self) -> Self {
        self.expand_parent = true;
        self
    }

    pub fn with_extent(mut self, extent: NodeExtent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }
}

/// A directed connection from a source handle to a target handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub source_handle: String,
    pub target: NodeId,
    pub target_handle: String,
}

impl Edge {
    /// True when the edge joins exactly the endpoints named by `request`.
    pub fn joins(&self, request: &EdgeRequest) -> bool {
        self.source == request.source
            && self.source_handle == request.source_handle
            && self.target == request.target
            && self.target_handle == request.target_handle
    }
}

/// A proposed edge, checked by the connection validator before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRequest {
    pub source: NodeId,
    pub source_handle: String,
    pub target: NodeId,
    pub target_handle: String,
}

impl EdgeRequest {
    pub fn new(
        source: impl Into<NodeId>,
        source_handle: &str,
        target: impl Into<NodeId>,
        target_handle: &str,
    ) -> Self {
        Self {
            source: source.into(),
            source_handle: source_handle.to_string(),
            target: target.into(),
            target_handle: target_handle.to_string(),
        }
    }
}
