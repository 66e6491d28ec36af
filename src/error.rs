use crate::handles::Side;
use thiserror::Error;

/// Errors returned by graph store actions.
///
/// Every action that returns one of these leaves the store exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No node or edge with id '{id}' exists in the graph")]
    NotFound { id: String },

    #[error("Connection rejected: {0}")]
    Connection(#[from] ConnectionError),
}

/// Reasons a proposed edge is refused by the connection validator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("Node '{node_id}' referenced by the connection does not exist")]
    UnknownNode { node_id: String },

    #[error(
        "Node '{node_id}' (subtype '{subtype}') has no {side} handle with id '{handle_id}'"
    )]
    UnknownHandle {
        node_id: String,
        subtype: String,
        handle_id: String,
        side: Side,
    },

    #[error(
        "Handle '{source_handle}' on '{source_node}' cannot feed handle '{target_handle}' on '{target_node}'"
    )]
    IncompatibleTypes {
        source_node: String,
        source_handle: String,
        target_node: String,
        target_handle: String,
    },
}

/// Errors that can occur while loading a layout configuration or handle table.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid subtype behaviour: {0}")]
    InvalidBehavior(String),
}
