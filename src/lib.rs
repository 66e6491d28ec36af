//! # Kumiko - Containment & Layout Engine for Node Canvases
//!
//! **Kumiko** owns the graph behind a visual node editor: typed operation nodes on an
//! infinite canvas, connected through typed ports, and nested inside container
//! ("group") nodes that grow to fit their contents. Rendering, menus and persistence
//! stay with the host; Kumiko decides what the graph *is*.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Canvas**: `Canvas::builder()` wires a `GraphStore` to the handle
//!     registry, the subtype catalog, a layout configuration and a port
//!     compatibility rule. The defaults cover the built-in collection operators.
//! 2.  **Drop Nodes**: `create_node` runs the containment resolver. A node dropped
//!     over a container becomes its child, positioned in the container's space;
//!     containers that seed children get them in the same atomic insert.
//! 3.  **Connect Ports**: `connect` checks that both nodes exist, that the handles
//!     resolve on the correct side, and that the compatibility rule agrees.
//! 4.  **Render**: `snapshot` hands the renderer every node with its absolute
//!     position and, for containers, the derived minimum and rendered sizes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumiko::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut canvas = Canvas::builder().with_compatibility(ArityMatch).build();
//!
//!     // A map container; it seeds two child nodes of its own.
//!     let map = canvas.create_node(DropRequest::new("subflow-map", 100.0, 100.0))?;
//!
//!     // Dropped inside the container's bounds, so it becomes a child.
//!     let inner = canvas.create_node(DropRequest::new("uppercase", 300.0, 180.0))?;
//!     assert_eq!(
//!         canvas.store().get(&inner).and_then(|n| n.parent_id.clone()),
//!         Some(map.clone())
//!     );
//!
//!     // The container's minimum size follows its children.
//!     let min = canvas.min_size(&map)?;
//!     println!("map container needs at least {} x {}", min.width, min.height);
//!
//!     let json = serde_json::to_string_pretty(&canvas.snapshot())?;
//!     println!("{json}");
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod config;
pub mod connection;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod handles;
pub mod id;
pub mod layout;
pub mod prelude;
