//! Tests for the canvas facade: commands, snapshots and configuration.
mod common;
use common::*;
use kumiko::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_apply_commands_from_json() {
    let mut canvas = Canvas::default();

    let create: CanvasCommand = serde_json::from_value(json!({
        "action": "create",
        "subtype": "subflow-filter",
        "position": { "x": 10.0, "y": 20.0 }
    }))
    .unwrap();
    let CommandOutcome::Created { node_id: group } = canvas.apply(create).unwrap() else {
        panic!("expected a created outcome");
    };

    let create_child: CanvasCommand = serde_json::from_value(json!({
        "action": "create",
        "subtype": "uppercase",
        "position": { "x": 60.0, "y": 70.0 },
        "data": { "label": "Upper", "inputType": "text", "color": "teal" }
    }))
    .unwrap();
    let CommandOutcome::Created { node_id: child } = canvas.apply(create_child).unwrap() else {
        panic!("expected a created outcome");
    };

    let node = canvas.store().get(&child).unwrap();
    assert_eq!(node.parent_id.as_ref(), Some(&group));
    assert_eq!(node.position, Point::new(50.0, 50.0));
    assert_eq!(node.data.label, "Upper");
    assert_eq!(node.data.input_type.as_deref(), Some("text"));
    assert_eq!(node.data.extra.get("color"), Some(&json!("teal")));

    let moved = canvas
        .apply(CanvasCommand::Reposition(RepositionRequest {
            node_id: child.clone(),
            position: Point::new(5.0, 5.0),
        }))
        .unwrap();
    assert_eq!(
        moved,
        CommandOutcome::Moved {
            node_id: child.clone(),
            position: Point::new(5.0, 5.0)
        }
    );

    let removed = canvas
        .apply(CanvasCommand::Remove(RemoveRequest { node_id: group }))
        .unwrap();
    assert!(matches!(removed, CommandOutcome::Removed { node_ids } if node_ids.len() == 2));
    assert!(canvas.store().nodes().is_empty());
}

#[test]
fn test_connect_command_shape() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();

    let command: CanvasCommand = serde_json::from_value(json!({
        "action": "connect",
        "source": src.as_str(),
        "sourceHandle": "3",
        "target": map.as_str(),
        "targetHandle": "4"
    }))
    .unwrap();
    let outcome = canvas.apply(command).unwrap();

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["result"], json!("connected"));
    assert!(value["edgeId"].is_string());
}

#[test]
fn test_rejected_command_leaves_graph_unchanged() {
    let (mut canvas, src, _map) = canvas_with_leaf_and_map();
    let before = canvas.snapshot();

    let err = canvas
        .apply(CanvasCommand::Reposition(RepositionRequest {
            node_id: "ghost".into(),
            position: Point::ORIGIN,
        }))
        .unwrap_err();
    assert!(matches!(err, GraphError::NotFound { .. }));

    let err = canvas
        .apply(CanvasCommand::Connect(EdgeRequest::new(src, "3", "ghost", "4")))
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));

    assert_eq!(canvas.snapshot(), before);
}

#[test]
fn test_snapshot_json_shape() {
    let (canvas, src, map) = canvas_with_leaf_and_map();

    let value = serde_json::to_value(canvas.snapshot()).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    // The leaf, the map and its two seeds.
    assert_eq!(nodes.len(), 4);

    let leaf = nodes.iter().find(|n| n["id"] == json!(src.as_str())).unwrap();
    assert_eq!(leaf["kind"], json!("leaf"));
    assert!(leaf.get("container").is_none());
    assert!(leaf.get("parentId").is_none());

    let group = nodes.iter().find(|n| n["id"] == json!(map.as_str())).unwrap();
    assert_eq!(group["kind"], json!("container"));
    assert_eq!(group["absolutePosition"], json!({ "x": 1000.0, "y": 1000.0 }));
    assert_eq!(group["container"]["minSize"], json!({ "width": 640.0, "height": 200.0 }));
    assert_eq!(group["container"]["hasChildren"], json!(true));

    let seed = nodes
        .iter()
        .find(|n| n["parentId"] == json!(map.as_str()))
        .unwrap();
    assert_eq!(seed["extent"], json!("parent"));
    assert_eq!(seed["absolutePosition"], json!({ "x": 1050.0, "y": 1100.0 }));
    assert_eq!(seed["data"]["label"], json!("child node"));
}

#[test]
fn test_handles_of_follows_subtype() {
    let (canvas, src, map) = canvas_with_leaf_and_map();

    let ids = |handles: &[HandleDescriptor]| -> Vec<String> {
        handles.iter().map(|h| h.id.clone()).collect()
    };
    assert_eq!(ids(canvas.handles_of(&src, Side::Left).unwrap()), vec!["4", "3"]);
    assert_eq!(ids(canvas.handles_of(&map, Side::Right).unwrap()), vec!["4", "400"]);
    assert!(canvas.handles_of(&src, Side::Right).unwrap().is_empty());
    assert!(canvas.handles_of("ghost", Side::Left).is_none());
}

#[test]
fn test_custom_handle_registry_on_canvas() {
    let registry = HandleRegistry::builder()
        .with_handles(
            "default",
            Side::Left,
            vec![
                HandleDescriptor::new(Side::Left, "in", "In", "input"),
                HandleDescriptor::new(Side::Right, "out", "Out", "output"),
            ],
        )
        .build();
    let mut canvas = Canvas::builder().with_handle_registry(registry).build();
    let a = canvas.create_node(DropRequest::new("x", 0.0, 0.0)).unwrap();
    let b = canvas.create_node(DropRequest::new("y", 0.0, 500.0)).unwrap();

    assert!(
        canvas
            .connect(EdgeRequest::new(a.clone(), "out", b.clone(), "in"))
            .is_ok()
    );
    assert!(canvas.connect(EdgeRequest::new(a, "3", b, "4")).is_err());
}

#[test]
fn test_reparent_through_canvas_notifies_once() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&seen);
    let subscription = canvas.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    canvas.reparent(&src, Some(map.clone())).unwrap();
    assert!(canvas.reparent(&map, Some(map.clone())).is_err());

    assert_eq!(
        *seen.borrow(),
        vec![StoreChange::NodeReparented {
            node: src.clone(),
            parent: Some(map.clone()),
        }]
    );
    assert_eq!(canvas.store().get(&src).unwrap().position, Point::new(-1000.0, -1000.0));
    assert!(canvas.unsubscribe(subscription));
}

#[test]
fn test_layout_config_partial_json() {
    let config = LayoutConfig::from_json_str(r#"{ "containerFloor": { "width": 300, "height": 120 } }"#)
        .unwrap();

    assert_eq!(config.container_floor, Size::new(300.0, 120.0));
    assert_eq!(config.probe_size, Size::new(40.0, 40.0));
    assert_eq!(config.resizer_padding, 20.0);
}

#[test]
fn test_layout_config_errors() {
    assert!(matches!(
        LayoutConfig::from_json_str("{ \"resizerPadding\": \"wide\" }"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        LayoutConfig::from_file("/definitely/not/here.json"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_generated_ids_are_unique_across_kinds() {
    let (mut canvas, src, map) = canvas_with_leaf_and_map();
    let edge = canvas
        .connect(EdgeRequest::new(src.clone(), "3", map.clone(), "4"))
        .unwrap();

    let mut all: Vec<String> = canvas
        .store()
        .nodes()
        .iter()
        .map(|n| n.id.to_string())
        .collect();
    all.push(edge.to_string());
    let count = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), count);
    assert!(all.iter().all(|id| id.starts_with("kmk_")));
}
