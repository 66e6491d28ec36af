//! Common test utilities for building graphs and canvases.
use kumiko::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// A store with two containers that overlap around (300, 150).
///
/// `group_a` spans (0, 0)-(500, 200) and is inserted first; `group_b` spans
/// (250, 100)-(750, 300).
#[allow(dead_code)]
pub fn overlapping_containers() -> GraphStore {
    let mut store = GraphStore::new();
    store
        .insert_node(Node::container("group_a", "subflow-filter").at(0.0, 0.0))
        .expect("insert group_a");
    store
        .insert_node(Node::container("group_b", "subflow-filter").at(250.0, 100.0))
        .expect("insert group_b");
    store
}

/// Three levels: `outer` (100, 50) > `middle` (20, 30) > `leaf` (5, 7).
#[allow(dead_code)]
pub fn nested_chain() -> GraphStore {
    let mut store = GraphStore::new();
    store
        .insert_nodes(vec![
            Node::container("outer", "subflow-map").at(100.0, 50.0),
            Node::container("middle", "subflow-filter")
                .at(20.0, 30.0)
                .with_parent("outer"),
            Node::leaf("leaf", "uppercase").at(5.0, 7.0).with_parent("middle"),
        ])
        .expect("insert nested chain");
    store
}

/// A canvas with a free leaf `src` and a map container `map` far away from it.
/// Returns the canvas and the generated ids `(src, map)`.
#[allow(dead_code)]
pub fn canvas_with_leaf_and_map() -> (Canvas, NodeId, NodeId) {
    let mut canvas = Canvas::default();
    let src = canvas
        .create_node(DropRequest::new("split-text", 0.0, 0.0))
        .expect("create leaf");
    let map = canvas
        .create_node(DropRequest::new("subflow-map", 1000.0, 1000.0))
        .expect("create map");
    (canvas, src, map)
}

/// Records every store change a subscriber sees.
#[allow(dead_code)]
pub fn record_changes(store: &mut GraphStore) -> Rc<RefCell<Vec<StoreChange>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |change| sink.borrow_mut().push(change.clone()));
    seen
}

#[allow(dead_code)]
pub fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.to_string()).collect()
}
