use super::resize::bounds_of;
use super::templates::SubtypeCatalog;
use crate::config::LayoutConfig;
use crate::error::GraphError;
use crate::geometry::{Point, Rect, to_parent_relative};
use crate::graph::{GraphStore, Node, NodeData, NodeExtent};
use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A request to create a node at a canvas-absolute position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub subtype: String,
    pub position: Point,
    #[serde(default)]
    pub data: NodeData,
}

impl DropRequest {
    pub fn new(subtype: &str, x: f64, y: f64) -> Self {
        Self {
            subtype: subtype.to_string(),
            position: Point::new(x, y),
            data: NodeData::default(),
        }
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }
}

/// Where a dropped node ends up.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub parent_id: Option<NodeId>,
    /// Relative to `parent_id` when set, canvas-absolute otherwise.
    pub position: Point,
    pub expand_parent: bool,
}

/// Decides whether a dropped node lands on the free canvas or inside a
/// container, and builds the nodes to insert.
pub struct ContainmentResolver<'a> {
    config: &'a LayoutConfig,
    catalog: &'a SubtypeCatalog,
}

impl<'a> ContainmentResolver<'a> {
    pub fn new(config: &'a LayoutConfig, catalog: &'a SubtypeCatalog) -> Self {
        Self { config, catalog }
    }

    /// Placeholder footprint of a node dropped at `position`.
    pub fn probe(&self, position: Point) -> Rect {
        Rect::from_origin_size(position, self.config.probe_size)
    }

    /// First container in store order whose absolute bounds intersect `probe`.
    ///
    /// Earlier-inserted containers win when several overlap the probe.
    pub fn find_container<'s>(&self, store: &'s GraphStore, probe: &Rect) -> Option<&'s Node> {
        store.containers().find(|container| {
            let hit = bounds_of(store, &container.id, self.config)
                .is_some_and(|bounds| bounds.intersects(probe));
            trace!(container = %container.id, hit, "probed container");
            hit
        })
    }

    pub fn resolve(&self, store: &GraphStore, position: Point) -> Placement {
        let probe = self.probe(position);
        let Some(container) = self.find_container(store, &probe) else {
            return Placement {
                parent_id: None,
                position,
                expand_parent: false,
            };
        };

        let origin = store
            .absolute_position(&container.id)
            .unwrap_or(container.position);
        Placement {
            parent_id: Some(container.id.clone()),
            position: to_parent_relative(position, origin).clamp_non_negative(),
            expand_parent: true,
        }
    }

    /// Builds the dropped node followed by any children its subtype seeds.
    pub fn plan(&self, store: &GraphStore, request: DropRequest) -> Vec<Node> {
        let placement = self.resolve(store, request.position);
        let kind = self.catalog.kind_of(&request.subtype);

        let mut node = Node::new(fresh_id(store), kind, &request.subtype).with_data(request.data);
        node.position = placement.position;
        node.parent_id = placement.parent_id;
        node.expand_parent = placement.expand_parent;

        let seeds = self.catalog.seeds_for(&request.subtype).iter().map(|seed| {
            Node::leaf(fresh_id(store), &seed.subtype)
                .at(seed.offset.x, seed.offset.y)
                .with_parent(node.id.clone())
                .with_extent(NodeExtent::Parent)
                .with_data(NodeData::labelled(&seed.label))
        });

        let mut batch = vec![node.clone()];
        batch.extend(seeds);
        batch
    }

    /// Resolves the drop and inserts the node and its seeds atomically.
    /// Returns the id of the dropped node.
    pub fn drop_node(
        &self,
        store: &mut GraphStore,
        request: DropRequest,
    ) -> Result<NodeId, GraphError> {
        let batch = self.plan(store, request);
        let id = batch[0].id.clone();
        debug!(
            node = %id,
            subtype = %batch[0].subtype,
            parent = ?batch[0].parent_id,
            seeds = batch.len() - 1,
            "dropping node"
        );
        store.insert_nodes(batch)?;
        Ok(id)
    }
}

/// Draws generated ids until one is not already taken by a host-supplied node.
/// The counter never repeats, so ids drawn for one batch are distinct too.
fn fresh_id(store: &GraphStore) -> NodeId {
    loop {
        let id = NodeId::generate();
        if !store.contains(&id) {
            return id;
        }
        trace!(id = %id, "generated id already in use, drawing again");
    }
}
