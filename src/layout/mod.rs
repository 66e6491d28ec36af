//! Drop resolution, seed templates and container auto-sizing.

pub mod containment;
pub mod resize;
pub mod templates;

pub use containment::{ContainmentResolver, DropRequest, Placement};
pub use resize::{ContainerMetrics, bounds_of, container_metrics, min_size, rendered_size};
pub use templates::{SEED_CHILD_SUBTYPE, SeedChild, SubtypeBehavior, SubtypeCatalog};
