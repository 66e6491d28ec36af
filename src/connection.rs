use crate::error::ConnectionError;
use crate::graph::{EdgeRequest, GraphStore, Node};
use crate::handles::{HandleDescriptor, HandleRegistry, Side};

/// Decides whether a source handle may feed a target handle.
///
/// This is the seam hosts use to plug in their own port typing rules.
pub trait Compatibility {
    fn is_compatible(&self, source: &HandleDescriptor, target: &HandleDescriptor) -> bool;
}

impl<F> Compatibility for F
where
    F: Fn(&HandleDescriptor, &HandleDescriptor) -> bool,
{
    fn is_compatible(&self, source: &HandleDescriptor, target: &HandleDescriptor) -> bool {
        self(source, target)
    }
}

/// Accepts every pair of handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysCompatible;

impl Compatibility for AlwaysCompatible {
    fn is_compatible(&self, _source: &HandleDescriptor, _target: &HandleDescriptor) -> bool {
        true
    }
}

/// Scalar ports only connect to scalar ports, array ports only to array ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArityMatch;

impl Compatibility for ArityMatch {
    fn is_compatible(&self, source: &HandleDescriptor, target: &HandleDescriptor) -> bool {
        source.is_array == target.is_array
    }
}

/// Gates edge creation: both endpoints must exist, both handles must resolve
/// on the correct side, and the compatibility predicate must agree.
pub struct ConnectionValidator<'a> {
    registry: &'a HandleRegistry,
    compatibility: &'a dyn Compatibility,
}

impl<'a> ConnectionValidator<'a> {
    pub fn new(registry: &'a HandleRegistry, compatibility: &'a dyn Compatibility) -> Self {
        Self {
            registry,
            compatibility,
        }
    }

    /// A validator over the built-in handle table that accepts any handle pair.
    pub fn with_defaults() -> ConnectionValidator<'static> {
        ConnectionValidator {
            registry: HandleRegistry::global(),
            compatibility: &AlwaysCompatible,
        }
    }

    pub fn registry(&self) -> &'a HandleRegistry {
        self.registry
    }

    /// Runs the checks in order and returns the first failure.
    pub fn validate(&self, store: &GraphStore, request: &EdgeRequest) -> Result<(), ConnectionError> {
        let source = lookup(store, request.source.as_str())?;
        let target = lookup(store, request.target.as_str())?;

        let source_handle = self.endpoint(source, &request.source_handle, Side::Right)?;
        let target_handle = self.endpoint(target, &request.target_handle, Side::Left)?;

        if !self
            .compatibility
            .is_compatible(source_handle, target_handle)
        {
            return Err(ConnectionError::IncompatibleTypes {
                source_node: source.id.to_string(),
                source_handle: request.source_handle.clone(),
                target_node: target.id.to_string(),
                target_handle: request.target_handle.clone(),
            });
        }
        Ok(())
    }

    /// Resolves `handle_id` on `node`, requiring it to be drawn at `position`.
    pub fn endpoint(
        &self,
        node: &Node,
        handle_id: &str,
        position: Side,
    ) -> Result<&'a HandleDescriptor, ConnectionError> {
        self.registry
            .find_handle(&node.subtype, handle_id, position)
            .ok_or_else(|| ConnectionError::UnknownHandle {
                node_id: node.id.to_string(),
                subtype: node.subtype.clone(),
                handle_id: handle_id.to_string(),
                side: position,
            })
    }
}

fn lookup<'s>(store: &'s GraphStore, node_id: &str) -> Result<&'s Node, ConnectionError> {
    store.get(node_id).ok_or_else(|| ConnectionError::UnknownNode {
        node_id: node_id.to_string(),
    })
}
