//! Cross-module tests driving a whole editing session


use crate::editor::{NodeKind, SceneSet, Selection};
use crate::scene::{ComponentKind, NodeId};

/// Nodes of the startup scene, by role
pub(crate) struct DemoScene {
    pub camera: NodeId,
    pub box1: NodeId,
    pub object1: NodeId,
    pub object2: NodeId,
    pub object3: NodeId,
    pub object4: NodeId,
    pub object5: NodeId,
    pub object6: NodeId,
    pub sphere1: NodeId,
    pub box2: NodeId,
    pub sphere2: NodeId,
}

/// Build the startup hierarchy in the current scene
pub(crate) fn build_demo(set: &mut SceneSet) -> DemoScene {
    let root = set
        .graph()
        .scene(set.current_scene())
        .unwrap()
        .root();
    let mut create = |parent, kind| set.create_child(parent, kind).unwrap();

    let camera = create(root, NodeKind::Camera);
    let box1 = create(root, NodeKind::Box);
    let object1 = create(root, NodeKind::Object);
    let object2 = create(root, NodeKind::Object);
    let object3 = create(object1, NodeKind::Object);
    let object4 = create(object1, NodeKind::Object);
    let object5 = create(object2, NodeKind::Object);
    let object6 = create(object5, NodeKind::Object);
    let sphere1 = create(object3, NodeKind::Sphere);
    let box2 = create(object4, NodeKind::Box);
    let sphere2 = create(object6, NodeKind::Sphere);

    DemoScene {
        camera,
        box1,
        object1,
        object2,
        object3,
        object4,
        object5,
        object6,
        sphere1,
        box2,
        sphere2,
    }
}

/// Every structural invariant of a session
pub(crate) fn assert_consistent(set: &SceneSet) {
    let graph = set.graph();
    assert!(!set.scenes().is_empty(), "no scenes left");
    assert_eq!(set.scenes().len(), graph.scene_count());
    assert!(graph.contains_scene(set.current_scene()));

    let mut reachable = 0;
    for &scene_id in set.scenes() {
        let root = graph.scene(scene_id).unwrap().root();
        let root_node = graph.node(root).unwrap();
        assert!(root_node.is_root());
        assert_eq!(root_node.scene(), scene_id);

        for id in graph.subtree(root) {
            reachable += 1;
            let node = graph.node(id).unwrap();
            let components = node.components();
            assert_eq!(node.scene(), scene_id, "{} has a stale scene", node.name());
            assert_eq!(components.count(ComponentKind::Transform), 1);
            assert!(components.count(ComponentKind::Primitive) <= 1);
            assert!(components.count(ComponentKind::Camera) <= 1);

            for &child in node.children() {
                assert_eq!(graph.node(child).unwrap().parent(), Some(id));
            }
            if let Some(parent) = node.parent() {
                let listed = graph.children(parent).iter().filter(|&&c| c == id).count();
                assert_eq!(listed, 1, "{} listed {listed} times", node.name());
            }
        }
    }
    assert_eq!(reachable, graph.node_count(), "unreachable nodes in the arena");

    match set.selection() {
        Selection::None => {}
        Selection::Scene(scene) => assert!(graph.contains_scene(scene)),
        Selection::Node(node) => assert!(graph.node(node).is_some_and(|n| !n.is_root())),
    }
    if let Some(camera) = set.current_camera() {
        assert!(graph.camera(camera).is_some());
    }
}
