//! Arena-backed scene graph
//!
//! One [`SceneGraph`] holds every scene and node of an editing session.
//! Nodes are addressed by [`NodeId`]; parent/child links are keys into the
//! same arena, which keeps ownership flat and makes removal of a subtree a
//! matter of collecting its keys.
//!
//! World matrices are cached per transform. A dirty transform always has
//! dirty descendants, so invalidation can stop at the first node that is
//! already dirty, and a read only recomputes the path from the nearest clean
//! ancestor.

use slotmap::SlotMap;

use super::{
    CameraComponent, Component, ComponentKind, ComponentRef, NodeId, Primitive, Scene,
    SceneError, SceneId, SceneNode, SceneResult,
};
use crate::foundation::color::Color;
use crate::foundation::math::{Mat4, Point3, Vec3};

/// Name given to every scene root node
pub const ROOT_NAME: &str = "root";

/// Owner of all scenes and nodes
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    scenes: SlotMap<SceneId, Scene>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // Scenes

    /// Create a scene together with its root node
    pub fn create_scene(
        &mut self,
        name: impl Into<String>,
        background: Color,
        ambient: Color,
    ) -> SceneId {
        let Self { nodes, scenes } = self;
        let name = name.into();
        let id = scenes.insert_with_key(|scene_id| {
            let root = nodes.insert(SceneNode::new(ROOT_NAME, None, scene_id));
            Scene::new(name, root, background, ambient)
        });
        log::debug!("Created scene {id:?}");
        id
    }

    /// Remove a scene and every node it contains
    ///
    /// Returns the removed node handles, root first.
    pub fn remove_scene(&mut self, scene: SceneId) -> SceneResult<Vec<NodeId>> {
        let root = self.scene_ref(scene)?.root();
        let removed = self.subtree(root);
        for id in &removed {
            self.nodes.remove(*id);
        }
        self.scenes.remove(scene);
        log::debug!("Removed scene {scene:?} with {} nodes", removed.len());
        Ok(removed)
    }

    /// Scene by handle
    pub fn scene(&self, scene: SceneId) -> Option<&Scene> {
        self.scenes.get(scene)
    }

    /// Mutable scene by handle
    pub fn scene_mut(&mut self, scene: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(scene)
    }

    /// Whether the handle refers to a live scene
    pub fn contains_scene(&self, scene: SceneId) -> bool {
        self.scenes.contains_key(scene)
    }

    /// All scenes in arena order
    pub fn scenes(&self) -> impl Iterator<Item = (SceneId, &Scene)> {
        self.scenes.iter()
    }

    /// Number of live scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Rename a scene
    pub fn rename_scene(&mut self, scene: SceneId, name: impl Into<String>) -> SceneResult<()> {
        self.scenes
            .get_mut(scene)
            .ok_or(SceneError::SceneNotFound(scene))?
            .set_name(name);
        Ok(())
    }

    fn scene_ref(&self, scene: SceneId) -> SceneResult<&Scene> {
        self.scenes.get(scene).ok_or(SceneError::SceneNotFound(scene))
    }

    // Nodes

    /// Node by handle
    pub fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Whether the handle refers to a live node
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Number of live nodes, scene roots included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ref(&self, node: NodeId) -> SceneResult<&SceneNode> {
        self.nodes.get(node).ok_or(SceneError::NodeNotFound(node))
    }

    fn node_entry(&mut self, node: NodeId) -> SceneResult<&mut SceneNode> {
        self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))
    }

    /// Create a bare node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> SceneResult<NodeId> {
        let scene = self.node_ref(parent)?.scene;
        let child = self.nodes.insert(SceneNode::new(name, Some(parent), scene));
        self.node_entry(parent)?.children.push(child);
        log::trace!("Added node {child:?} under {parent:?}");
        Ok(child)
    }

    /// Destroy `child` and its subtree, checking that it belongs to `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<Vec<NodeId>> {
        self.node_ref(parent)?;
        if self.node_ref(child)?.parent != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.delete_subtree(child)
    }

    /// Destroy a node, its descendants and all their components
    ///
    /// Returns the removed handles in pre-order. Scene roots can only go
    /// away with their scene.
    pub fn delete_subtree(&mut self, node: NodeId) -> SceneResult<Vec<NodeId>> {
        let parent = self.node_ref(node)?.parent.ok_or(SceneError::RootNode(node))?;
        self.node_entry(parent)?.children.retain(|&c| c != node);

        let removed = self.subtree(node);
        for id in &removed {
            self.nodes.remove(*id);
        }
        log::debug!("Deleted subtree {node:?} ({} nodes)", removed.len());
        Ok(removed)
    }

    /// Move a node under a new parent, or under its scene root for `None`
    ///
    /// The node is appended to the new parent's children and its whole
    /// subtree joins the new parent's scene. Local transforms are kept, so
    /// world matrices of the subtree are invalidated.
    pub fn reparent(&mut self, node: NodeId, new_parent: Option<NodeId>) -> SceneResult<()> {
        let moving = self.node_ref(node)?;
        let old_parent = moving.parent.ok_or(SceneError::RootNode(node))?;
        let target = match new_parent {
            Some(parent) => {
                self.node_ref(parent)?;
                parent
            }
            None => self.scene_ref(moving.scene)?.root(),
        };
        if target == node || self.is_ancestor(node, target) {
            return Err(SceneError::CycleDetected { node, target });
        }

        self.node_entry(old_parent)?.children.retain(|&c| c != node);
        self.node_entry(node)?.parent = Some(target);
        let target_entry = self.node_entry(target)?;
        target_entry.children.push(node);

        let scene = target_entry.scene;
        for id in self.subtree(node) {
            if let Some(entry) = self.nodes.get_mut(id) {
                entry.scene = scene;
            }
        }
        self.invalidate_subtree(node);
        log::debug!("Reparented {node:?} from {old_parent:?} to {target:?}");
        Ok(())
    }

    /// Handles of `node` and all its descendants in pre-order
    ///
    /// Empty when the node does not exist.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        if !self.contains_node(node) {
            return result;
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            result.push(id);
            if let Some(entry) = self.nodes.get(id) {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        result
    }

    /// Whether `ancestor` is a strict ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(SceneNode::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(SceneNode::parent);
        }
        false
    }

    /// Number of edges between the node and its scene root
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.nodes.get(node)?.parent;
        while let Some(id) = current {
            depth += 1;
            current = self.nodes.get(id)?.parent;
        }
        Some(depth)
    }

    // Queries used by the hierarchy view

    /// Children of a node, empty when it does not exist
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.nodes.get(node) {
            Some(entry) => &entry.children,
            None => &[],
        }
    }

    /// Visit each child of a node in order
    pub fn for_each_child(&self, node: NodeId, mut f: impl FnMut(NodeId, &SceneNode)) {
        for &child in self.children(node) {
            if let Some(entry) = self.nodes.get(child) {
                f(child, entry);
            }
        }
    }

    /// Visit each component of a node, transform first
    pub fn for_each_component(&self, node: NodeId, f: impl FnMut(ComponentRef<'_>)) {
        if let Some(entry) = self.nodes.get(node) {
            entry.components.iter().for_each(f);
        }
    }

    /// Whether the node exists and has no children
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(SceneNode::is_leaf)
    }

    /// Node name for display
    pub fn display_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(SceneNode::name)
    }

    /// Rename a node
    pub fn rename(&mut self, node: NodeId, name: impl Into<String>) -> SceneResult<()> {
        self.node_entry(node)?.set_name(name);
        Ok(())
    }

    /// Show or hide a node and its subtree in renders
    pub fn set_visible(&mut self, node: NodeId, visible: bool) -> SceneResult<()> {
        self.node_entry(node)?.visible = visible;
        Ok(())
    }

    /// Flip visibility, returning the new state
    pub fn toggle_visible(&mut self, node: NodeId) -> SceneResult<bool> {
        let entry = self.node_entry(node)?;
        entry.visible = !entry.visible;
        Ok(entry.visible)
    }

    // Components

    /// Attach a primitive or camera to a node
    pub fn add_component(&mut self, node: NodeId, component: Component) -> SceneResult<()> {
        let kind = component.kind();
        self.node_entry(node)?.components.attach(component)?;
        log::trace!("Attached {kind} to {node:?}");
        Ok(())
    }

    /// Detach and return a component from a node
    pub fn remove_component(
        &mut self,
        node: NodeId,
        kind: ComponentKind,
    ) -> SceneResult<Component> {
        let component = self.node_entry(node)?.components.detach(kind)?;
        log::trace!("Detached {kind} from {node:?}");
        Ok(component)
    }

    /// Component of the given kind on a node
    pub fn component(&self, node: NodeId, kind: ComponentKind) -> Option<ComponentRef<'_>> {
        self.nodes.get(node)?.components.find(kind)
    }

    /// Primitive attached to a node
    pub fn primitive(&self, node: NodeId) -> Option<&Primitive> {
        self.nodes.get(node)?.components.primitive()
    }

    /// Mutable primitive attached to a node
    pub fn primitive_mut(&mut self, node: NodeId) -> Option<&mut Primitive> {
        self.nodes.get_mut(node)?.components.primitive_mut()
    }

    /// Camera attached to a node
    pub fn camera(&self, node: NodeId) -> Option<&CameraComponent> {
        self.nodes.get(node)?.components.camera()
    }

    /// Mutable camera attached to a node
    pub fn camera_mut(&mut self, node: NodeId) -> Option<&mut CameraComponent> {
        self.nodes.get_mut(node)?.components.camera_mut()
    }

    /// Nodes of a scene carrying a primitive, in pre-order
    pub fn primitives_in_scene(&self, scene: SceneId) -> Vec<NodeId> {
        self.scenes.get(scene).map_or_else(Vec::new, |s| {
            self.subtree(s.root())
                .into_iter()
                .filter(|&id| self.primitive(id).is_some())
                .collect()
        })
    }

    // Transforms

    /// Set local position and invalidate the subtree
    pub fn set_local_position(&mut self, node: NodeId, position: Vec3) -> SceneResult<()> {
        self.node_entry(node)?
            .components
            .transform_mut()
            .set_local_position(position);
        self.invalidate_subtree(node);
        Ok(())
    }

    /// Set local Euler angles in degrees and invalidate the subtree
    pub fn set_local_euler_angles(&mut self, node: NodeId, euler_degrees: Vec3) -> SceneResult<()> {
        self.node_entry(node)?
            .components
            .transform_mut()
            .set_local_euler_angles(euler_degrees);
        self.invalidate_subtree(node);
        Ok(())
    }

    /// Set local scale (clamped) and invalidate the subtree
    pub fn set_local_scale(&mut self, node: NodeId, scale: Vec3) -> SceneResult<()> {
        self.node_entry(node)?
            .components
            .transform_mut()
            .set_local_scale(scale);
        self.invalidate_subtree(node);
        Ok(())
    }

    /// Mark the world matrices of `node` and its descendants stale
    fn invalidate_subtree(&self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(entry) = self.nodes.get(id) else {
                continue;
            };
            let transform = entry.transform();
            if id != node && transform.is_dirty() {
                continue;
            }
            transform.invalidate();
            stack.extend_from_slice(&entry.children);
        }
    }

    /// World matrix of a node, recomputing stale cache entries on the way
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut stale = Vec::new();
        let mut world = Mat4::identity();
        let mut current = Some(node);
        while let Some(id) = current {
            let entry = self.nodes.get(id)?;
            let transform = entry.transform();
            if !transform.is_dirty() {
                world = transform.cached_world();
                break;
            }
            stale.push(transform);
            current = entry.parent;
        }

        for transform in stale.into_iter().rev() {
            world *= transform.local_matrix();
            transform.store_world(world);
        }
        Some(world)
    }

    /// World-space origin of a node
    pub fn world_position(&self, node: NodeId) -> Option<Point3> {
        self.world_matrix(node)
            .map(|m| m.transform_point(&Point3::origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BuiltinMesh;
    use approx::assert_relative_eq;

    fn graph_with_scene() -> (SceneGraph, SceneId, NodeId) {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("Scene 1", Color::GRAY, Color::DARK_GRAY);
        let root = graph.scene(scene).unwrap().root();
        (graph, scene, root)
    }

    #[test]
    fn test_create_scene_has_root() {
        let (graph, scene, root) = graph_with_scene();
        let root_node = graph.node(root).unwrap();

        assert!(root_node.is_root());
        assert_eq!(root_node.scene(), scene);
        assert!(graph.is_leaf(root));
        assert_eq!(graph.scene(scene).unwrap().name(), "Scene 1");
    }

    #[test]
    fn test_add_and_remove_child() {
        let (mut graph, _, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();
        let b = graph.add_child(a, "b").unwrap();
        let c = graph.add_child(root, "c").unwrap();

        assert_eq!(graph.children(root), &[a, c]);
        assert_eq!(graph.node(b).unwrap().parent(), Some(a));

        assert_eq!(
            graph.remove_child(root, b),
            Err(SceneError::NotAChild { parent: root, child: b })
        );

        let removed = graph.remove_child(root, a).unwrap();
        assert_eq!(removed, vec![a, b]);
        assert!(!graph.contains_node(b));
        assert_eq!(graph.children(root), &[c]);
    }

    #[test]
    fn test_root_cannot_be_deleted_or_moved() {
        let (mut graph, _, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();

        assert_eq!(graph.delete_subtree(root), Err(SceneError::RootNode(root)));
        assert_eq!(graph.reparent(root, Some(a)), Err(SceneError::RootNode(root)));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let (mut graph, _, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();
        let b = graph.add_child(a, "b").unwrap();

        assert_eq!(
            graph.reparent(a, Some(b)),
            Err(SceneError::CycleDetected { node: a, target: b })
        );
        assert_eq!(
            graph.reparent(a, Some(a)),
            Err(SceneError::CycleDetected { node: a, target: a })
        );
        assert_eq!(graph.node(a).unwrap().parent(), Some(root));
        assert_eq!(graph.children(a), &[b]);
    }

    #[test]
    fn test_reparent_appends_and_moves_scene() {
        let (mut graph, _, root) = graph_with_scene();
        let other = graph.create_scene("Scene 2", Color::GRAY, Color::DARK_GRAY);
        let other_root = graph.scene(other).unwrap().root();
        let existing = graph.add_child(other_root, "existing").unwrap();

        let a = graph.add_child(root, "a").unwrap();
        let b = graph.add_child(a, "b").unwrap();

        graph.reparent(a, Some(other_root)).unwrap();

        assert_eq!(graph.children(other_root), &[existing, a]);
        assert!(graph.is_leaf(root));
        assert_eq!(graph.node(a).unwrap().scene(), other);
        assert_eq!(graph.node(b).unwrap().scene(), other);

        graph.reparent(b, None).unwrap();
        assert_eq!(graph.node(b).unwrap().parent(), Some(other_root));
    }

    #[test]
    fn test_world_matrix_follows_hierarchy() {
        let (mut graph, _, root) = graph_with_scene();
        let parent = graph.add_child(root, "parent").unwrap();
        let child = graph.add_child(parent, "child").unwrap();

        graph.set_local_position(parent, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        graph.set_local_scale(parent, Vec3::new(2.0, 2.0, 2.0)).unwrap();
        graph.set_local_position(child, Vec3::new(0.0, 1.0, 0.0)).unwrap();

        assert_relative_eq!(
            graph.world_position(child).unwrap(),
            Point3::new(1.0, 2.0, 0.0),
            epsilon = 1e-5
        );
        assert!(!graph.node(child).unwrap().transform().is_dirty());

        graph.set_local_position(parent, Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        assert!(graph.node(child).unwrap().transform().is_dirty());
        assert_relative_eq!(
            graph.world_position(child).unwrap(),
            Point3::new(-1.0, 2.0, 0.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_reparent_keeps_local_transform() {
        let (mut graph, _, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();
        let b = graph.add_child(root, "b").unwrap();
        graph.set_local_position(a, Vec3::new(5.0, 0.0, 0.0)).unwrap();
        graph.set_local_position(b, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(graph.world_position(b).unwrap(), Point3::new(0.0, 1.0, 0.0));

        graph.reparent(b, Some(a)).unwrap();
        assert_relative_eq!(graph.world_position(b).unwrap(), Point3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn test_component_lookup_through_graph() {
        let (mut graph, scene, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();
        let b = graph.add_child(a, "b").unwrap();
        graph.add_component(b, Primitive::builtin(BuiltinMesh::Sphere).into()).unwrap();

        assert!(graph.primitive(a).is_none());
        assert_eq!(graph.primitive(b).unwrap().mesh_name(), "Sphere");
        assert_eq!(graph.primitives_in_scene(scene), vec![b]);

        let mut kinds = Vec::new();
        graph.for_each_component(b, |c| kinds.push(c.kind()));
        assert_eq!(kinds, vec![ComponentKind::Transform, ComponentKind::Primitive]);

        graph.delete_subtree(a).unwrap();
        assert!(graph.primitives_in_scene(scene).is_empty());
    }

    #[test]
    fn test_remove_scene_removes_nodes() {
        let (mut graph, scene, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();
        graph.add_child(a, "b").unwrap();

        let removed = graph.remove_scene(scene).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.scene_count(), 0);
        assert_eq!(graph.remove_scene(scene), Err(SceneError::SceneNotFound(scene)));
    }

    #[test]
    fn test_for_each_child_visits_in_order() {
        let (mut graph, _, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();
        let b = graph.add_child(root, "b").unwrap();
        graph.add_child(a, "nested").unwrap();

        let mut seen = Vec::new();
        graph.for_each_child(root, |id, node| seen.push((id, node.name().to_string())));
        assert_eq!(seen, vec![(a, "a".to_string()), (b, "b".to_string())]);

        let mut missing = 0;
        graph.delete_subtree(b).unwrap();
        graph.for_each_child(b, |_, _| missing += 1);
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_visibility_and_scene_edits() {
        let (mut graph, scene, root) = graph_with_scene();
        let a = graph.add_child(root, "a").unwrap();

        graph.set_visible(a, false).unwrap();
        assert!(!graph.node(a).unwrap().visible);
        assert!(graph.toggle_visible(a).unwrap());

        graph.scene_mut(scene).unwrap().background_color = Color::BLACK;
        assert_eq!(graph.scene(scene).unwrap().background_color, Color::BLACK);

        graph.delete_subtree(a).unwrap();
        assert_eq!(graph.set_visible(a, true), Err(SceneError::NodeNotFound(a)));
    }
}
