//! Container sizing derived from the current children, recomputed on every read.
//!
//! Nothing here is cached: each call walks the store as it is now, so adding,
//! moving, resizing or removing a child is visible on the next read.

use crate::config::LayoutConfig;
use crate::error::GraphError;
use crate::geometry::{Rect, Size, union_bounds};
use crate::graph::{GraphStore, Node};
use serde::Serialize;

/// Everything a renderer needs to draw a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMetrics {
    /// Smallest size that still encloses every child, never below the floor.
    pub min_size: Size,
    /// `min_size` plus the configured padding, for interactive resizers.
    pub resizer_min_size: Size,
    pub has_children: bool,
    /// Stored size (or the floor) grown to cover `expand_parent` children.
    pub rendered_size: Size,
}

/// Minimum size of `container_id`.
///
/// With no children this is exactly the configured floor, whatever size is
/// stored on the node. Otherwise it reaches the right/bottom edge of the
/// children's union, measured from the container's origin.
pub fn min_size(
    store: &GraphStore,
    container_id: impl AsRef<str>,
    config: &LayoutConfig,
) -> Result<Size, GraphError> {
    let container = require_container(store, container_id.as_ref())?;
    Ok(min_size_of(store, container, config))
}

pub fn container_metrics(
    store: &GraphStore,
    container_id: impl AsRef<str>,
    config: &LayoutConfig,
) -> Result<ContainerMetrics, GraphError> {
    let container = require_container(store, container_id.as_ref())?;
    let min_size = min_size_of(store, container, config);
    Ok(ContainerMetrics {
        min_size,
        resizer_min_size: min_size.pad(config.resizer_padding),
        has_children: !store.children_of(&container.id).is_empty(),
        rendered_size: rendered_size(store, container, config),
    })
}

/// On-screen size of any node.
///
/// Leaves use their explicit size or the probe footprint. Containers use
/// their explicit size or the floor, grown on each axis to the far edge of
/// every child that asks to expand its parent.
pub fn rendered_size(store: &GraphStore, node: &Node, config: &LayoutConfig) -> Size {
    if !node.is_container() {
        return node.size.unwrap_or(config.probe_size);
    }

    let base = node.size.unwrap_or(config.container_floor);
    let expanding = store
        .children_of(&node.id)
        .into_iter()
        .filter(|child| child.expand_parent)
        .map(|child| relative_rect(store, child, config));
    match union_bounds(expanding) {
        Some(bounds) => base.max(Size::new(bounds.right(), bounds.bottom())),
        None => base,
    }
}

/// Rectangle of `id` in canvas-absolute coordinates.
pub fn bounds_of(store: &GraphStore, id: impl AsRef<str>, config: &LayoutConfig) -> Option<Rect> {
    let node = store.get(id)?;
    let origin = store.absolute_position(&node.id)?;
    Some(Rect::from_origin_size(
        origin,
        rendered_size(store, node, config),
    ))
}

fn min_size_of(store: &GraphStore, container: &Node, config: &LayoutConfig) -> Size {
    let children = store.children_of(&container.id);
    let rects = children
        .into_iter()
        .map(|child| relative_rect(store, child, config));
    match union_bounds(rects) {
        Some(bounds) => Size::new(bounds.right(), bounds.bottom()).max(config.container_floor),
        None => config.container_floor,
    }
}

/// A child's rectangle in its parent's coordinate space.
fn relative_rect(store: &GraphStore, child: &Node, config: &LayoutConfig) -> Rect {
    Rect::from_origin_size(child.position, rendered_size(store, child, config))
}

fn require_container<'s>(store: &'s GraphStore, id: &str) -> Result<&'s Node, GraphError> {
    let node = store
        .get(id)
        .ok_or_else(|| GraphError::NotFound { id: id.to_string() })?;
    if !node.is_container() {
        return Err(GraphError::Validation(format!(
            "Node '{}' is not a container",
            node.id
        )));
    }
    Ok(node)
}
