//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kumiko crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumiko::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let config = LayoutConfig::from_file("path/to/layout.json")?;
//! let mut canvas = Canvas::builder().with_config(config).build();
//!
//! let group = canvas.create_node(DropRequest::new("subflow-filter", 0.0, 0.0))?;
//! let inner = canvas.create_node(DropRequest::new("is-empty", 120.0, 60.0))?;
//! canvas.connect(EdgeRequest::new(inner.clone(), "3", group.clone(), "4"))?;
//!
//! println!("{:?}", canvas.container_metrics(&group)?);
//! # Ok(())
//! # }
//! ```

// Editing surface
pub use crate::canvas::{
    Canvas, CanvasBuilder, CanvasCommand, CanvasSnapshot, CommandOutcome, NodeView,
    RemoveRequest, RepositionRequest,
};

// Graph model and store
pub use crate::graph::{
    Edge, EdgeRequest, GraphStore, Node, NodeData, NodeExtent, NodeKind, StoreChange,
    SubscriptionId,
};
pub use crate::id::{EdgeId, NodeId};

// Geometry
pub use crate::geometry::{Point, Rect, Size, to_parent_relative, union_bounds};

// Handles and connections
pub use crate::connection::{AlwaysCompatible, ArityMatch, Compatibility, ConnectionValidator};
pub use crate::handles::{
    HandleDescriptor, HandleRegistry, HandleRegistryBuilder, Side, resolve_handles,
};

// Layout
pub use crate::config::LayoutConfig;
pub use crate::layout::{
    ContainerMetrics, ContainmentResolver, DropRequest, Placement, SeedChild, SubtypeBehavior,
    SubtypeCatalog,
};

// Error types
pub use crate::error::{ConfigError, ConnectionError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
