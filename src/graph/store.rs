use super::model::{Edge, EdgeRequest, Node, NodeExtent};
use crate::connection::ConnectionValidator;
use crate::error::GraphError;
use crate::geometry::{Point, to_parent_relative};
use crate::handles::{HandleRegistry, Side};
use crate::id::{EdgeId, NodeId};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::fmt;
use tracing::debug;

/// A change that has been fully applied to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    NodesInserted(Vec<NodeId>),
    EdgeAdded(EdgeId),
    NodeMoved(NodeId),
    NodeReparented {
        node: NodeId,
        parent: Option<NodeId>,
    },
    NodesRemoved {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    EdgesRemoved(Vec<EdgeId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Canonical owner of the node and edge collections.
///
/// Nodes keep their insertion order, which doubles as z-order and as the
/// tie-break for containment queries. Every action either applies completely
/// or returns an error and leaves the store untouched; subscribers are only
/// notified after an action has fully applied.
#[derive(Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: AHashMap<NodeId, usize>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Selectors ---

    pub fn get(&self, id: impl AsRef<str>) -> Option<&Node> {
        self.index.get(id.as_ref()).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.index.contains_key(id.as_ref())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: impl AsRef<str>) -> Option<&Edge> {
        let id = id.as_ref();
        self.edges.iter().find(|e| e.id == id)
    }

    /// Container nodes in store order.
    pub fn containers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_container())
    }

    /// Direct children of `id`, in store order.
    pub fn children_of(&self, id: impl AsRef<str>) -> Vec<&Node> {
        let id = id.as_ref();
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_ref().is_some_and(|p| p == id))
            .collect()
    }

    /// Parent chain of `id`, nearest first. Empty for root nodes and unknown ids.
    pub fn ancestors(&self, id: impl AsRef<str>) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent_id.as_ref());
        while let Some(parent_id) = current {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            // The parent chain is acyclic; the bound only guards a corrupted store.
            if chain.len() >= self.nodes.len() {
                break;
            }
            chain.push(parent);
            current = parent.parent_id.as_ref();
        }
        chain
    }

    /// Canvas-absolute position: own relative position plus every ancestor's.
    pub fn absolute_position(&self, id: impl AsRef<str>) -> Option<Point> {
        let node = self.get(id)?;
        Some(
            self.ancestors(&node.id)
                .iter()
                .fold(node.position, |acc, ancestor| acc + ancestor.position),
        )
    }

    /// All descendants of `id` (children, grandchildren, ...), excluding `id`.
    pub fn descendants(&self, id: impl AsRef<str>) -> Vec<NodeId> {
        let mut children: AHashMap<&str, Vec<&NodeId>> = AHashMap::new();
        for node in &self.nodes {
            if let Some(parent) = &node.parent_id {
                children.entry(parent.as_str()).or_default().push(&node.id);
            }
        }

        let mut found = Vec::new();
        let mut stack = vec![id.as_ref()];
        while let Some(current) = stack.pop() {
            for child in children.get(current).into_iter().flatten() {
                found.push((*child).clone());
                stack.push(child.as_str());
            }
        }
        found
    }

    // --- Subscriptions ---

    /// Registers a listener called after every successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    // --- Node actions ---

    pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        self.insert_nodes(vec![node])
    }

    /// Inserts every node of `batch` or none of them.
    ///
    /// A batch member may name a container that appears earlier in the same
    /// batch as its parent. Subscribers see a single notification.
    pub fn insert_nodes(&mut self, batch: Vec<Node>) -> Result<(), GraphError> {
        if batch.is_empty() {
            return Ok(());
        }
        if let Some(duplicate) = batch.iter().map(|n| &n.id).duplicates().next() {
            return Err(GraphError::Validation(format!(
                "Node id '{}' appears more than once in the batch",
                duplicate
            )));
        }
        for (position, node) in batch.iter().enumerate() {
            self.validate_new_node(node, &batch[..position])?;
        }

        let ids: Vec<NodeId> = batch.iter().map(|n| n.id.clone()).collect();
        for node in batch {
            self.index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
        debug!(count = ids.len(), first = %ids[0], "inserted nodes");
        self.notify(StoreChange::NodesInserted(ids));
        Ok(())
    }

    fn validate_new_node(&self, node: &Node, pending: &[Node]) -> Result<(), GraphError> {
        if node.id.as_str().trim().is_empty() {
            return Err(GraphError::Validation("Node id must not be empty".to_string()));
        }
        if self.contains(&node.id) {
            return Err(GraphError::Validation(format!(
                "Node id '{}' is already in use",
                node.id
            )));
        }
        if let Some(parent_id) = &node.parent_id {
            // The parent must already exist, so a new node can never close a cycle.
            let parent = self
                .get(parent_id)
                .or_else(|| pending.iter().find(|p| &p.id == parent_id))
                .ok_or_else(|| {
                    GraphError::Validation(format!(
                        "Parent '{}' of node '{}' does not exist",
                        parent_id, node.id
                    ))
                })?;
            if !parent.is_container() {
                return Err(GraphError::Validation(format!(
                    "Parent '{}' of node '{}' is not a container",
                    parent_id, node.id
                )));
            }
        }
        Ok(())
    }

    /// Moves a node without changing its parent.
    ///
    /// Nodes with [`NodeExtent::Parent`] are kept at or below/right of their
    /// parent's origin.
    pub fn reposition(&mut self, id: impl AsRef<str>, position: Point) -> Result<Point, GraphError> {
        let idx = self.index_of(id.as_ref())?;
        let node = &mut self.nodes[idx];
        let position = match (node.extent, &node.parent_id) {
            (Some(NodeExtent::Parent), Some(_)) => position.clamp_non_negative(),
            _ => position,
        };
        node.position = position;

        let node_id = node.id.clone();
        debug!(node = %node_id, x = position.x, y = position.y, "repositioned node");
        self.notify(StoreChange::NodeMoved(node_id));
        Ok(position)
    }

    /// Moves a node into `new_parent` (or onto the free canvas for `None`),
    /// keeping its absolute position.
    pub fn reparent(
        &mut self,
        id: impl AsRef<str>,
        new_parent: Option<NodeId>,
    ) -> Result<(), GraphError> {
        let idx = self.index_of(id.as_ref())?;
        let node_id = self.nodes[idx].id.clone();
        let absolute = self.absolute_position(&node_id).unwrap_or_default();

        let relative = match &new_parent {
            None => absolute,
            Some(parent_id) => {
                let parent = self.get(parent_id).ok_or_else(|| {
                    GraphError::Validation(format!("Parent '{}' does not exist", parent_id))
                })?;
                if !parent.is_container() {
                    return Err(GraphError::Validation(format!(
                        "Parent '{}' is not a container",
                        parent_id
                    )));
                }
                if parent.id == node_id || self.ancestors(parent_id).iter().any(|a| a.id == node_id)
                {
                    return Err(GraphError::Validation(format!(
                        "Moving '{}' into '{}' would create a cycle",
                        node_id, parent_id
                    )));
                }
                let origin = self.absolute_position(parent_id).unwrap_or_default();
                let relative = to_parent_relative(absolute, origin);
                match self.nodes[idx].extent {
                    Some(NodeExtent::Parent) => relative.clamp_non_negative(),
                    None => relative,
                }
            }
        };

        let node = &mut self.nodes[idx];
        node.parent_id = new_parent.clone();
        node.position = relative;
        debug!(node = %node_id, parent = ?new_parent, "reparented node");
        self.notify(StoreChange::NodeReparented {
            node: node_id,
            parent: new_parent,
        });
        Ok(())
    }

    /// Removes a node together with all of its descendants and every edge
    /// touching any removed node. Returns the removed node ids.
    pub fn remove_node(&mut self, id: impl AsRef<str>) -> Result<Vec<NodeId>, GraphError> {
        let idx = self.index_of(id.as_ref())?;
        let mut removed = vec![self.nodes[idx].id.clone()];
        removed.extend(self.descendants(&self.nodes[idx].id));

        let doomed: AHashSet<&NodeId> = removed.iter().collect();
        self.nodes.retain(|n| !doomed.contains(&n.id));
        let (dropped, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| doomed.contains(&e.source) || doomed.contains(&e.target));
        self.edges = kept;
        self.rebuild_index();

        let edges: Vec<EdgeId> = dropped.into_iter().map(|e| e.id).collect();
        debug!(
            node = %removed[0],
            descendants = removed.len() - 1,
            edges = edges.len(),
            "removed node"
        );
        self.notify(StoreChange::NodesRemoved {
            nodes: removed.clone(),
            edges,
        });
        Ok(removed)
    }

    // --- Edge actions ---

    /// Admits an edge after the validator accepts it.
    ///
    /// Connecting the same four endpoints twice returns the existing edge id
    /// instead of adding a duplicate.
    pub fn connect(
        &mut self,
        request: EdgeRequest,
        validator: &ConnectionValidator<'_>,
    ) -> Result<EdgeId, GraphError> {
        validator.validate(self, &request)?;

        if let Some(existing) = self.edges.iter().find(|e| e.joins(&request)) {
            return Ok(existing.id.clone());
        }

        let edge = Edge {
            id: self.fresh_edge_id(),
            source: request.source,
            source_handle: request.source_handle,
            target: request.target,
            target_handle: request.target_handle,
        };
        let id = edge.id.clone();
        debug!(
            edge = %id,
            source = %edge.source,
            target = %edge.target,
            "connected nodes"
        );
        self.edges.push(edge);
        self.notify(StoreChange::EdgeAdded(id.clone()));
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: impl AsRef<str>) -> Result<Edge, GraphError> {
        let id = id.as_ref();
        let position = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GraphError::NotFound { id: id.to_string() })?;
        let edge = self.edges.remove(position);
        self.notify(StoreChange::EdgesRemoved(vec![edge.id.clone()]));
        Ok(edge)
    }

    /// Drops every edge whose endpoints or handles no longer resolve against
    /// `registry`. Returns the dropped edges in store order.
    pub fn prune_invalid_edges(&mut self, registry: &HandleRegistry) -> Vec<Edge> {
        let (kept, dropped): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|edge| self.edge_resolves(edge, registry));
        self.edges = kept;

        if !dropped.is_empty() {
            debug!(count = dropped.len(), "pruned invalid edges");
            let ids = dropped.iter().map(|e| e.id.clone()).collect();
            self.notify(StoreChange::EdgesRemoved(ids));
        }
        dropped
    }

    fn edge_resolves(&self, edge: &Edge, registry: &HandleRegistry) -> bool {
        let (Some(source), Some(target)) = (self.get(&edge.source), self.get(&edge.target)) else {
            return false;
        };
        registry
            .find_handle(&source.subtype, &edge.source_handle, Side::Right)
            .is_some()
            && registry
                .find_handle(&target.subtype, &edge.target_handle, Side::Left)
                .is_some()
    }

    /// Skips generated ids that a host-supplied node or edge already uses.
    fn fresh_edge_id(&self) -> EdgeId {
        loop {
            let id = EdgeId::generate();
            if !self.contains(&id) && self.edge(&id).is_none() {
                return id;
            }
        }
    }

    fn index_of(&self, id: &str) -> Result<usize, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NotFound { id: id.to_string() })
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }
}
