use crate::config::LayoutConfig;
use crate::connection::{AlwaysCompatible, Compatibility, ConnectionValidator};
use crate::error::GraphError;
use crate::geometry::{Point, Size};
use crate::graph::{Edge, EdgeRequest, GraphStore, Node, StoreChange, SubscriptionId};
use crate::handles::{HandleDescriptor, HandleRegistry, Side};
use crate::id::{EdgeId, NodeId};
use crate::layout::{ContainerMetrics, ContainmentResolver, DropRequest, SubtypeCatalog};
use crate::layout::{container_metrics, min_size};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositionRequest {
    pub node_id: NodeId,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub node_id: NodeId,
}

/// One inbound request, as it appears in a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CanvasCommand {
    Create(DropRequest),
    Connect(EdgeRequest),
    Reposition(RepositionRequest),
    Remove(RemoveRequest),
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandOutcome {
    Created { node_id: NodeId },
    Connected { edge_id: EdgeId },
    Moved { node_id: NodeId, position: Point },
    Removed { node_ids: Vec<NodeId> },
}

/// A node as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    #[serde(flatten)]
    pub node: Node,
    pub absolute_position: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerMetrics>,
}

/// Read-only copy of the graph for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<Edge>,
}

/// The editing surface: a graph store plus the rules that guard it.
///
/// Every inbound request is a single synchronous call; a rejected request
/// leaves the graph unchanged.
pub struct Canvas {
    store: GraphStore,
    config: LayoutConfig,
    registry: Cow<'static, HandleRegistry>,
    catalog: SubtypeCatalog,
    compatibility: Box<dyn Compatibility>,
}

pub struct CanvasBuilder {
    config: LayoutConfig,
    registry: Cow<'static, HandleRegistry>,
    catalog: SubtypeCatalog,
    compatibility: Box<dyn Compatibility>,
}

impl Default for CanvasBuilder {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            registry: Cow::Borrowed(HandleRegistry::global()),
            catalog: SubtypeCatalog::builtin(),
            compatibility: Box::new(AlwaysCompatible),
        }
    }
}

impl CanvasBuilder {
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the built-in handle table.
    pub fn with_handle_registry(mut self, registry: HandleRegistry) -> Self {
        self.registry = Cow::Owned(registry);
        self
    }

    pub fn with_catalog(mut self, catalog: SubtypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_compatibility(mut self, compatibility: impl Compatibility + 'static) -> Self {
        self.compatibility = Box::new(compatibility);
        self
    }

    pub fn build(self) -> Canvas {
        Canvas {
            store: GraphStore::new(),
            config: self.config,
            registry: self.registry,
            catalog: self.catalog,
            compatibility: self.compatibility,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Canvas {
    pub fn builder() -> CanvasBuilder {
        CanvasBuilder::default()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &SubtypeCatalog {
        &self.catalog
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Inbound requests ---

    pub fn create_node(&mut self, request: DropRequest) -> Result<NodeId, GraphError> {
        ContainmentResolver::new(&self.config, &self.catalog).drop_node(&mut self.store, request)
    }

    pub fn connect(&mut self, request: EdgeRequest) -> Result<EdgeId, GraphError> {
        let validator = ConnectionValidator::new(&self.registry, self.compatibility.as_ref());
        self.store.connect(request, &validator)
    }

    pub fn reposition(&mut self, request: RepositionRequest) -> Result<Point, GraphError> {
        self.store.reposition(&request.node_id, request.position)
    }

    pub fn remove(&mut self, request: RemoveRequest) -> Result<Vec<NodeId>, GraphError> {
        self.store.remove_node(&request.node_id)
    }

    /// Moves a node into or out of a container, keeping where it sits on screen.
    pub fn reparent(
        &mut self,
        node_id: impl AsRef<str>,
        new_parent: Option<NodeId>,
    ) -> Result<(), GraphError> {
        self.store.reparent(node_id, new_parent)
    }

    pub fn apply(&mut self, command: CanvasCommand) -> Result<CommandOutcome, GraphError> {
        match command {
            CanvasCommand::Create(request) => self
                .create_node(request)
                .map(|node_id| CommandOutcome::Created { node_id }),
            CanvasCommand::Connect(request) => self
                .connect(request)
                .map(|edge_id| CommandOutcome::Connected { edge_id }),
            CanvasCommand::Reposition(request) => {
                let node_id = request.node_id.clone();
                self.reposition(request)
                    .map(|position| CommandOutcome::Moved { node_id, position })
            }
            CanvasCommand::Remove(request) => self
                .remove(request)
                .map(|node_ids| CommandOutcome::Removed { node_ids }),
        }
    }

    // --- Derived reads ---

    pub fn handles_of(&self, node_id: impl AsRef<str>, side: Side) -> Option<&[HandleDescriptor]> {
        self.store
            .get(node_id)
            .map(|node| self.registry.resolve_handles(&node.subtype, side))
    }

    pub fn min_size(&self, container_id: impl AsRef<str>) -> Result<Size, GraphError> {
        min_size(&self.store, container_id, &self.config)
    }

    pub fn container_metrics(
        &self,
        container_id: impl AsRef<str>,
    ) -> Result<ContainerMetrics, GraphError> {
        container_metrics(&self.store, container_id, &self.config)
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        let nodes = self
            .store
            .nodes()
            .iter()
            .map(|node| NodeView {
                node: node.clone(),
                absolute_position: self
                    .store
                    .absolute_position(&node.id)
                    .unwrap_or(node.position),
                container: node
                    .is_container()
                    .then(|| container_metrics(&self.store, &node.id, &self.config).ok())
                    .flatten(),
            })
            .collect();

        CanvasSnapshot {
            nodes,
            edges: self.store.edges().to_vec(),
        }
    }
}
