//! Tests for edge validation, deduplication and pruning.
mod common;
use common::*;
use kumiko::prelude::*;

#[test]
fn test_connect_leaf_into_container() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();

    let edge_id = canvas
        .connect(EdgeRequest::new(src.clone(), "3", map.clone(), "4"))
        .unwrap();

    let edge = canvas.store().edge(&edge_id).unwrap();
    assert_eq!(edge.source, src);
    assert_eq!(edge.target, map);
    assert_eq!(edge.source_handle, "3");
    assert_eq!(edge.target_handle, "4");
}

#[test]
fn test_unknown_node_is_rejected() {
    let (mut canvas, src, _map) = canvas_with_leaf_and_map();

    let err = canvas
        .connect(EdgeRequest::new(src, "3", "ghost", "4"))
        .unwrap_err();

    assert_eq!(
        err,
        GraphError::Connection(ConnectionError::UnknownNode {
            node_id: "ghost".to_string()
        })
    );
    assert!(canvas.store().edges().is_empty());
}

#[test]
fn test_unknown_handle_leaves_edges_unchanged() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();
    canvas
        .connect(EdgeRequest::new(src.clone(), "3", map.clone(), "4"))
        .unwrap();

    let err = canvas
        .connect(EdgeRequest::new(src.clone(), "99", map.clone(), "4"))
        .unwrap_err();

    match err {
        GraphError::Connection(ConnectionError::UnknownHandle {
            node_id,
            handle_id,
            side,
            ..
        }) => {
            assert_eq!(node_id, src.to_string());
            assert_eq!(handle_id, "99");
            assert_eq!(side, Side::Right);
        }
        other => panic!("expected UnknownHandle, got {other:?}"),
    }
    assert_eq!(canvas.store().edges().len(), 1);
}

#[test]
fn test_handle_on_wrong_side_is_unknown() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();

    // "4" is drawn on the left, so it cannot emit an edge.
    let as_source = canvas.connect(EdgeRequest::new(src.clone(), "4", map.clone(), "4"));
    assert!(matches!(
        as_source,
        Err(GraphError::Connection(ConnectionError::UnknownHandle {
            side: Side::Right,
            ..
        }))
    ));

    // The map's "400" output is right-positioned, so it cannot receive one.
    let as_target = canvas.connect(EdgeRequest::new(src, "3", map, "400"));
    assert!(matches!(
        as_target,
        Err(GraphError::Connection(ConnectionError::UnknownHandle {
            side: Side::Left,
            ..
        }))
    ));
}

#[test]
fn test_container_output_feeds_leaf() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();

    let edge = canvas.connect(EdgeRequest::new(map, "400", src, "4"));
    assert!(edge.is_ok());
}

#[test]
fn test_arity_match_rejects_scalar_into_array() {
    let mut canvas = Canvas::builder().with_compatibility(ArityMatch).build();
    let a = canvas
        .create_node(DropRequest::new("uppercase", 0.0, 0.0))
        .unwrap();
    let map = canvas
        .create_node(DropRequest::new("subflow-map", 1000.0, 0.0))
        .unwrap();

    // Scalar "3" into the array "4" input.
    let err = canvas
        .connect(EdgeRequest::new(a.clone(), "3", map.clone(), "4"))
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Connection(ConnectionError::IncompatibleTypes { .. })
    ));

    // Array "400" output into the array "4" input of a leaf.
    assert!(canvas.connect(EdgeRequest::new(map, "400", a, "4")).is_ok());
}

#[test]
fn test_closure_compatibility() {
    let only_same_icon =
        |source: &HandleDescriptor, target: &HandleDescriptor| source.icon == target.icon;
    let mut canvas = Canvas::builder()
        .with_compatibility(only_same_icon)
        .build();
    let a = canvas
        .create_node(DropRequest::new("uppercase", 0.0, 0.0))
        .unwrap();
    let b = canvas
        .create_node(DropRequest::new("lowercase", 0.0, 600.0))
        .unwrap();
    let reduce = canvas
        .create_node(DropRequest::new("subflow-reduce", 1000.0, 0.0))
        .unwrap();

    // Both default handles use the "text_fields" icon.
    assert!(canvas.connect(EdgeRequest::new(a.clone(), "3", b, "4")).is_ok());
    // The reduce input uses "tag".
    assert!(canvas.connect(EdgeRequest::new(a, "3", reduce, "4")).is_err());
}

#[test]
fn test_duplicate_connect_returns_existing_edge() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(0));
    let counter = std::rc::Rc::clone(&seen);
    canvas.subscribe(move |change| {
        if matches!(change, StoreChange::EdgeAdded(_)) {
            *counter.borrow_mut() += 1;
        }
    });

    let first = canvas
        .connect(EdgeRequest::new(src.clone(), "3", map.clone(), "4"))
        .unwrap();
    let second = canvas
        .connect(EdgeRequest::new(src, "3", map, "4"))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(canvas.store().edges().len(), 1);
    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn test_validator_against_store_directly() {
    let mut store = GraphStore::new();
    store
        .insert_nodes(vec![
            Node::leaf("a", "uppercase"),
            Node::container("r", "subflow-reduce"),
        ])
        .unwrap();
    let validator = ConnectionValidator::with_defaults();

    // The reduce node exposes a second input "500" on its left list.
    assert!(
        validator
            .validate(&store, &EdgeRequest::new("a", "3", "r", "4"))
            .is_ok()
    );
    let handle = validator
        .endpoint(store.get("r").unwrap(), "500", Side::Right)
        .unwrap();
    assert_eq!(handle.label, "Element B");
}

#[test]
fn test_prune_invalid_edges_after_registry_change() {
    let mut store = GraphStore::new();
    store
        .insert_nodes(vec![
            Node::leaf("a", "uppercase"),
            Node::leaf("b", "lowercase"),
            Node::container("f", "subflow-filter"),
        ])
        .unwrap();
    let validator = ConnectionValidator::with_defaults();
    let keep = store
        .connect(EdgeRequest::new("a", "3", "b", "4"), &validator)
        .unwrap();
    let stale = store
        .connect(EdgeRequest::new("f", "400", "b", "4"), &validator)
        .unwrap();

    // The filter loses its right-side output in the new table.
    let registry = HandleRegistryBuilder::from_builtin()
        .with_handles("subflow-filter", Side::Right, Vec::new())
        .build();
    let seen = record_changes(&mut store);

    let dropped = store.prune_invalid_edges(&registry);

    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].id, stale);
    assert_eq!(store.edges().len(), 1);
    assert_eq!(store.edges()[0].id, keep);
    assert_eq!(*seen.borrow(), vec![StoreChange::EdgesRemoved(vec![stale])]);

    // Nothing left to prune: no notification.
    assert!(store.prune_invalid_edges(&registry).is_empty());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_shared_handle_id_resolves_to_left_list_first() {
    // The map declares a left-positioned "4" on both of its lists.
    let registry = HandleRegistry::global();
    let handle = registry
        .find_handle("subflow-map", "4", Side::Left)
        .unwrap();
    assert_eq!(handle.label, "Samling");
    assert!(handle.is_array);

    // Under ArityMatch a scalar output therefore cannot reach the map's "4".
    let mut canvas = Canvas::builder().with_compatibility(ArityMatch).build();
    let src = canvas
        .create_node(DropRequest::new("uppercase", 0.0, 0.0))
        .unwrap();
    let map = canvas
        .create_node(DropRequest::new("subflow-map", 1000.0, 1000.0))
        .unwrap();
    let err = canvas
        .connect(EdgeRequest::new(src, "3", map, "4"))
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Connection(ConnectionError::IncompatibleTypes { .. })
    ));
}
