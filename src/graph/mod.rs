//! The node/edge data model and the store that owns it.

mod model;
mod store;

pub use model::*;
pub use store::{GraphStore, StoreChange, SubscriptionId};
