//! Open scenes, selection and the intent dispatcher

use super::{
    CreateKind, EditorView, Intent, IntentQueue, NameGenerator, NodeKind, Notice, Selection,
    ViewMode,
};
use crate::config::EditorConfig;
use crate::scene::{
    CameraComponent, Component, ComponentKind, NodeId, Primitive, Scene, SceneError, SceneGraph,
    SceneId, SceneNode, SceneResult,
};

/// Editing session: scenes, selection and the current camera
///
/// At least one scene always exists. The selection is either a live scene,
/// a live non-root node, or nothing, and `current_scene` always names a
/// live scene.
#[derive(Debug)]
pub struct SceneSet {
    graph: SceneGraph,
    order: Vec<SceneId>,
    current_scene: SceneId,
    selection: Selection,
    current_camera: Option<NodeId>,
    names: NameGenerator,
    notices: Vec<Notice>,
    config: EditorConfig,
    view: EditorView,
    view_mode: ViewMode,
}

impl SceneSet {
    /// Start a session with one empty scene selected
    pub fn new(config: EditorConfig, mut names: NameGenerator) -> Self {
        let mut graph = SceneGraph::new();
        let first = graph.create_scene(
            names.next_scene(),
            config.scene_background,
            config.scene_ambient_light,
        );
        let view = EditorView::new(config.editor_camera.clone());
        log::info!("Editor session started");

        Self {
            graph,
            order: vec![first],
            current_scene: first,
            selection: Selection::Scene(first),
            current_camera: None,
            names,
            notices: Vec::new(),
            config,
            view,
            view_mode: ViewMode::Editor,
        }
    }

    /// Underlying graph
    pub const fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable graph for inspector edits
    ///
    /// Structural changes (delete, reparent, component removal) should go
    /// through the scene set so selection and the current camera stay valid.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Session settings
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Editor viewport camera
    pub const fn view(&self) -> &EditorView {
        &self.view
    }

    /// Mutable editor viewport camera
    pub fn view_mut(&mut self) -> &mut EditorView {
        &mut self.view
    }

    /// Viewport mode
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch viewport mode
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == ViewMode::Renderer && self.current_camera().is_none() {
            log::warn!("Renderer view selected without a current camera");
        }
        self.view_mode = mode;
    }

    /// Open scenes in creation order
    pub fn scenes(&self) -> &[SceneId] {
        &self.order
    }

    /// Scene that new top-level nodes go to
    pub const fn current_scene(&self) -> SceneId {
        self.current_scene
    }

    /// Current selection
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether `target` is the current selection
    pub fn is_current(&self, target: Selection) -> bool {
        self.selection == target
    }

    /// Node whose camera renders the scene, if it still carries one
    pub fn current_camera(&self) -> Option<NodeId> {
        self.current_camera.filter(|&node| self.graph.camera(node).is_some())
    }

    /// Pending notices, oldest first
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take pending notices for display
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn scene_root(&self, scene: SceneId) -> SceneResult<NodeId> {
        self.graph
            .scene(scene)
            .map(Scene::root)
            .ok_or(SceneError::SceneNotFound(scene))
    }

    // Creation

    /// Create a scene and make it current and selected
    pub fn create_scene(&mut self) -> SceneId {
        let name = self.names.next_scene();
        let scene = self.graph.create_scene(
            name,
            self.config.scene_background,
            self.config.scene_ambient_light,
        );
        self.order.push(scene);
        self.current_scene = scene;
        self.selection = Selection::Scene(scene);
        log::info!("Created {}", self.graph.scene(scene).map_or("scene", |s| s.name()));
        scene
    }

    /// Create a node under the current selection
    ///
    /// A selected node becomes the parent; otherwise the node goes under the
    /// root of the selected (or current) scene.
    pub fn create_object(&mut self, kind: NodeKind) -> SceneResult<NodeId> {
        self.create_under(self.selection, kind)
    }

    /// Create a node under a node, or under the root of a scene
    ///
    /// [`Selection::None`] means the current scene. A target that no longer
    /// exists fails without creating anything.
    pub fn create_under(&mut self, target: Selection, kind: NodeKind) -> SceneResult<NodeId> {
        let parent = match target {
            Selection::Node(node) => node,
            Selection::Scene(scene) => self.scene_root(scene)?,
            Selection::None => self.scene_root(self.current_scene)?,
        };
        self.create_child(parent, kind)
    }

    /// Create a named node of the given kind under `parent` and select it
    pub fn create_child(&mut self, parent: NodeId, kind: NodeKind) -> SceneResult<NodeId> {
        let scene = self
            .graph
            .node(parent)
            .ok_or(SceneError::NodeNotFound(parent))?
            .scene();
        let name = self.names.next_node(kind);
        let node = self.graph.add_child(parent, name)?;
        if let Some(component) = kind.default_component() {
            self.graph.add_component(node, component)?;
        }

        self.current_scene = scene;
        self.selection = Selection::Node(node);
        log::info!("Created {}", self.graph.display_name(node).unwrap_or_default());
        Ok(node)
    }

    // Deletion

    /// Delete whatever is selected
    pub fn delete_selection(&mut self) -> SceneResult<()> {
        match self.selection {
            Selection::Node(node) => self.delete_node(node).map(|_| ()),
            Selection::Scene(scene) => self.delete_scene(scene),
            Selection::None => Ok(()),
        }
    }

    /// Select a scene or node, then delete it
    ///
    /// A target that no longer exists fails before the selection changes.
    pub fn delete(&mut self, target: Selection) -> SceneResult<()> {
        match target {
            Selection::Node(node) => {
                let entry = self.graph.node(node).ok_or(SceneError::NodeNotFound(node))?;
                if entry.is_root() {
                    return Err(SceneError::RootNode(node));
                }
            }
            Selection::Scene(scene) => {
                if !self.graph.contains_scene(scene) {
                    return Err(SceneError::SceneNotFound(scene));
                }
            }
            Selection::None => return Ok(()),
        }
        self.select(target)?;
        self.delete_selection()
    }

    /// Delete a node and its subtree
    ///
    /// If the selection was inside the subtree it moves to the node's
    /// parent, or to its scene when the parent is the scene root, and that
    /// scene becomes current. Otherwise selection and current scene stay.
    pub fn delete_node(&mut self, node: NodeId) -> SceneResult<Vec<NodeId>> {
        let entry = self.graph.node(node).ok_or(SceneError::NodeNotFound(node))?;
        let parent = entry.parent().ok_or(SceneError::RootNode(node))?;
        let scene = entry.scene();

        let removed = self.graph.delete_subtree(node)?;
        self.forget_removed(&removed);

        if self.selection.is_none() {
            let parent_is_root = self.graph.node(parent).is_some_and(|p| p.is_root());
            self.selection = if parent_is_root {
                Selection::Scene(scene)
            } else {
                Selection::Node(parent)
            };
            self.current_scene = scene;
        }
        log::info!("Deleted {} node(s)", removed.len());
        Ok(removed)
    }

    /// Delete a scene unless it is the last one
    ///
    /// The last scene is kept, a [`Notice::LastScene`] is queued and
    /// [`SceneError::LastSceneDeletion`] returned. Otherwise the first
    /// remaining scene becomes current and selected.
    pub fn delete_scene(&mut self, scene: SceneId) -> SceneResult<()> {
        if !self.graph.contains_scene(scene) {
            return Err(SceneError::SceneNotFound(scene));
        }
        if self.order.len() <= 1 {
            log::warn!("Refusing to delete the last scene");
            self.notices.push(Notice::LastScene);
            return Err(SceneError::LastSceneDeletion);
        }

        let removed = self.graph.remove_scene(scene)?;
        self.order.retain(|&s| s != scene);
        self.forget_removed(&removed);

        let first = *self.order.first().ok_or(SceneError::LastSceneDeletion)?;
        self.current_scene = first;
        self.selection = Selection::Scene(first);
        log::info!("Deleted scene with {} node(s)", removed.len());
        Ok(())
    }

    /// Drop references to removed nodes
    fn forget_removed(&mut self, removed: &[NodeId]) {
        if self.current_camera.is_some_and(|c| removed.contains(&c)) {
            log::info!("Current camera deleted");
            self.current_camera = None;
        }
        if self.selection.node().is_some_and(|n| removed.contains(&n)) {
            self.selection = Selection::None;
        }
    }

    // Selection and structure

    /// Change the selection
    ///
    /// Selecting a scene or node also makes its scene current. A scene root
    /// is selected as its scene.
    pub fn select(&mut self, target: Selection) -> SceneResult<()> {
        self.selection = match target {
            Selection::None => Selection::None,
            Selection::Scene(scene) => {
                if !self.graph.contains_scene(scene) {
                    return Err(SceneError::SceneNotFound(scene));
                }
                self.current_scene = scene;
                target
            }
            Selection::Node(node) => {
                let entry = self.graph.node(node).ok_or(SceneError::NodeNotFound(node))?;
                self.current_scene = entry.scene();
                if entry.is_root() {
                    Selection::Scene(entry.scene())
                } else {
                    target
                }
            }
        };
        Ok(())
    }

    /// Move a node under a scene's root or under another node
    ///
    /// The target's scene becomes current.
    pub fn reparent(&mut self, node: NodeId, target: Selection) -> SceneResult<()> {
        let parent = match target {
            Selection::Scene(scene) if self.graph.contains_scene(scene) => self.scene_root(scene)?,
            Selection::Node(parent) if self.graph.contains_node(parent) => parent,
            _ => return Err(SceneError::AmbiguousReparentTarget),
        };
        self.graph.reparent(node, Some(parent))?;
        if let Some(scene) = self.graph.node(parent).map(SceneNode::scene) {
            self.current_scene = scene;
        }
        Ok(())
    }

    /// Rename a scene or node
    pub fn rename(&mut self, target: Selection, name: impl Into<String>) -> SceneResult<()> {
        match target {
            Selection::Scene(scene) => self.graph.rename_scene(scene, name),
            Selection::Node(node) => self.graph.rename(node, name),
            Selection::None => Ok(()),
        }
    }

    /// Flip a node's visibility, returning the new state
    pub fn toggle_visible(&mut self, node: NodeId) -> SceneResult<bool> {
        self.graph.toggle_visible(node)
    }

    // Components

    /// Attach a default component of the given kind
    ///
    /// Primitives start with the "None" mesh.
    pub fn add_component(&mut self, node: NodeId, kind: ComponentKind) -> SceneResult<()> {
        let component = match kind {
            ComponentKind::Transform => return Err(SceneError::DuplicateComponent(kind)),
            ComponentKind::Primitive => Component::Primitive(Primitive::empty()),
            ComponentKind::Camera => Component::Camera(CameraComponent::default()),
        };
        self.graph.add_component(node, component)
    }

    /// Detach a component, clearing the current camera if it was this one
    pub fn remove_component(
        &mut self,
        node: NodeId,
        kind: ComponentKind,
    ) -> SceneResult<Component> {
        let component = self.graph.remove_component(node, kind)?;
        if kind == ComponentKind::Camera && self.current_camera == Some(node) {
            log::info!("Current camera removed");
            self.current_camera = None;
        }
        Ok(component)
    }

    /// Make a node's camera the current one, or clear it
    ///
    /// Clearing only has an effect when `node` is the current camera.
    pub fn set_current_camera(&mut self, node: NodeId, current: bool) -> SceneResult<()> {
        if current {
            if !self.graph.contains_node(node) {
                return Err(SceneError::NodeNotFound(node));
            }
            if self.graph.camera(node).is_none() {
                return Err(SceneError::MissingComponent(ComponentKind::Camera));
            }
            self.current_camera = Some(node);
        } else if self.current_camera == Some(node) {
            self.current_camera = None;
        }
        Ok(())
    }

    /// Move the editor camera in front of a node
    pub fn focus_on(&mut self, node: NodeId) -> SceneResult<()> {
        let position = self
            .graph
            .world_position(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        let scale = self
            .graph
            .node(node)
            .ok_or(SceneError::NodeNotFound(node))?
            .transform()
            .local_scale();
        self.view.focus(position.coords, scale, self.config.focus_offset);
        Ok(())
    }

    // Intents

    /// Apply a single intent
    pub fn apply(&mut self, intent: Intent) -> SceneResult<()> {
        match intent {
            Intent::Create { kind: CreateKind::Scene, .. } => {
                self.create_scene();
                Ok(())
            }
            Intent::Create { kind: CreateKind::Node(kind), under } => {
                self.create_under(under, kind).map(|_| ())
            }
            Intent::Delete(target) => self.delete(target),
            Intent::Select(target) => self.select(target),
            Intent::Reparent { node, target } => self.reparent(node, target),
            Intent::Rename { target, name } => self.rename(target, name),
            Intent::ToggleVisible(node) => self.toggle_visible(node).map(|_| ()),
            Intent::FocusCameraOn(node) => self.focus_on(node),
            Intent::AddComponent { node, kind } => self.add_component(node, kind),
            Intent::RemoveComponent { node, kind } => {
                self.remove_component(node, kind).map(|_| ())
            }
            Intent::SetCurrentCamera { node, current } => self.set_current_camera(node, current),
        }
    }

    /// Apply every queued intent in order, returning how many succeeded
    ///
    /// Failures are logged and skipped; the scene set is unchanged by a
    /// failed intent.
    pub fn apply_all(&mut self, queue: &mut IntentQueue) -> usize {
        let mut applied = 0;
        for intent in queue.drain() {
            match self.apply(intent.clone()) {
                Ok(()) => applied += 1,
                Err(err @ (SceneError::DuplicateComponent(_) | SceneError::LastSceneDeletion)) => {
                    log::debug!("Intent {intent:?} refused: {err}");
                }
                Err(err) => log::warn!("Intent {intent:?} failed: {err}"),
            }
        }
        applied
    }
}

impl Default for SceneSet {
    fn default() -> Self {
        Self::new(EditorConfig::default(), NameGenerator::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn root_of(set: &SceneSet, scene: SceneId) -> NodeId {
        set.graph().scene(scene).unwrap().root()
    }

    #[test]
    fn test_new_session_has_one_selected_scene() {
        let set = SceneSet::default();
        let scene = set.current_scene();

        assert_eq!(set.scenes(), &[scene]);
        assert_eq!(set.selection(), Selection::Scene(scene));
        assert_eq!(set.graph().scene(scene).unwrap().name(), "Scene 1");
    }

    #[test]
    fn test_create_box_under_selected_scene() {
        let mut set = SceneSet::default();
        let scene = set.current_scene();

        let node = set.create_object(NodeKind::Box).unwrap();

        assert_eq!(set.graph().display_name(node), Some("Box 1"));
        assert_eq!(set.graph().node(node).unwrap().parent(), Some(root_of(&set, scene)));
        assert_eq!(set.graph().primitive(node).unwrap().mesh_name(), "Box");
        assert_eq!(set.selection(), Selection::Node(node));
    }

    #[test]
    fn test_create_nests_under_selected_node() {
        let mut set = SceneSet::default();
        let parent = set.create_object(NodeKind::Object).unwrap();
        let child = set.create_object(NodeKind::Camera).unwrap();

        assert_eq!(set.graph().node(child).unwrap().parent(), Some(parent));
        assert_eq!(set.graph().display_name(child), Some("Camera 1"));
        assert!(set.graph().camera(child).is_some());
    }

    #[test]
    fn test_delete_moves_selection_to_parent_or_scene() {
        let mut set = SceneSet::default();
        let scene = set.current_scene();
        let top = set.create_object(NodeKind::Object).unwrap();
        let nested = set.create_object(NodeKind::Sphere).unwrap();

        set.delete_selection().unwrap();
        assert!(!set.graph().contains_node(nested));
        assert_eq!(set.selection(), Selection::Node(top));

        set.delete_selection().unwrap();
        assert_eq!(set.selection(), Selection::Scene(scene));
        assert!(set.graph().is_leaf(root_of(&set, scene)));
    }

    #[test]
    fn test_last_scene_guard() {
        let mut set = SceneSet::default();
        let scene = set.current_scene();

        assert_eq!(set.delete_selection(), Err(SceneError::LastSceneDeletion));
        assert_eq!(set.scenes(), &[scene]);
        assert_eq!(set.take_notices(), vec![Notice::LastScene]);
        assert!(set.notices().is_empty());
    }

    #[test]
    fn test_delete_scene_selects_first_remaining() {
        let mut set = SceneSet::default();
        let first = set.current_scene();
        let second = set.create_scene();
        set.create_object(NodeKind::Box).unwrap();
        set.select(Selection::Scene(second)).unwrap();

        set.delete_selection().unwrap();

        assert_eq!(set.scenes(), &[first]);
        assert_eq!(set.current_scene(), first);
        assert_eq!(set.selection(), Selection::Scene(first));
        assert_eq!(set.graph().scene_count(), 1);
    }

    #[test]
    fn test_reparent_to_other_scene_makes_it_current() {
        let mut set = SceneSet::default();
        let first = set.current_scene();
        let node = set.create_object(NodeKind::Object).unwrap();
        let second = set.create_scene();
        set.select(Selection::Scene(first)).unwrap();

        set.reparent(node, Selection::Scene(second)).unwrap();

        assert_eq!(set.current_scene(), second);
        assert_eq!(set.graph().node(node).unwrap().scene(), second);
        assert_eq!(
            set.reparent(node, Selection::None),
            Err(SceneError::AmbiguousReparentTarget)
        );
    }

    #[test]
    fn test_current_camera_cleared_on_removal() {
        let mut set = SceneSet::default();
        let camera = set.create_object(NodeKind::Camera).unwrap();
        let plain = set.create_object(NodeKind::Object).unwrap();

        assert_eq!(
            set.set_current_camera(plain, true),
            Err(SceneError::MissingComponent(ComponentKind::Camera))
        );
        set.set_current_camera(camera, true).unwrap();
        assert_eq!(set.current_camera(), Some(camera));

        set.remove_component(camera, ComponentKind::Camera).unwrap();
        assert_eq!(set.current_camera(), None);

        set.add_component(camera, ComponentKind::Camera).unwrap();
        set.set_current_camera(camera, true).unwrap();
        set.delete_node(camera).unwrap();
        assert_eq!(set.current_camera(), None);
    }

    #[test]
    fn test_apply_all_swallows_failures() {
        let mut set = SceneSet::default();
        let node = set.create_object(NodeKind::Box).unwrap();

        let mut queue = IntentQueue::new();
        queue.push(Intent::AddComponent { node, kind: ComponentKind::Primitive });
        queue.push(Intent::Rename { target: Selection::Node(node), name: "Crate".into() });
        queue.push(Intent::ToggleVisible(node));

        assert_eq!(set.apply_all(&mut queue), 2);
        assert!(queue.is_empty());
        assert_eq!(set.graph().display_name(node), Some("Crate"));
        assert!(!set.graph().node(node).unwrap().visible);
        assert_eq!(set.graph().node(node).unwrap().components().len(), 2);
    }

    #[test]
    fn test_focus_backs_off_by_scaled_offset() {
        let mut set = SceneSet::default();
        let node = set.create_object(NodeKind::Box).unwrap();
        set.graph_mut().set_local_position(node, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        set.graph_mut().set_local_scale(node, Vec3::new(2.0, 2.0, 2.0)).unwrap();

        set.apply(Intent::FocusCameraOn(node)).unwrap();

        let offset = set.config().focus_offset;
        assert_relative_eq!(set.view().position, Vec3::new(1.0, 2.0, 3.0 + 2.0 * offset));
    }

    #[test]
    fn test_delete_outside_selection_keeps_current_scene() {
        let mut set = SceneSet::default();
        let first = set.current_scene();
        let doomed = set.create_object(NodeKind::Box).unwrap();
        let second = set.create_scene();
        let kept = set.create_object(NodeKind::Sphere).unwrap();

        set.delete_node(doomed).unwrap();

        assert!(!set.graph().contains_node(doomed));
        assert_eq!(set.selection(), Selection::Node(kept));
        assert_eq!(set.current_scene(), second);
        assert!(set.graph().is_leaf(root_of(&set, first)));
    }

    #[test]
    fn test_targeted_intents_fail_on_missing_target() {
        let mut set = SceneSet::default();
        let scene = set.current_scene();
        let node = set.create_object(NodeKind::Object).unwrap();
        set.delete_node(node).unwrap();
        assert_eq!(set.selection(), Selection::Scene(scene));

        assert_eq!(
            set.apply(Intent::Delete(Selection::Node(node))),
            Err(SceneError::NodeNotFound(node))
        );
        assert_eq!(
            set.apply(Intent::Create {
                kind: CreateKind::Node(NodeKind::Box),
                under: Selection::Node(node),
            }),
            Err(SceneError::NodeNotFound(node))
        );
        let root = root_of(&set, scene);
        assert_eq!(set.delete(Selection::Node(root)), Err(SceneError::RootNode(root)));
        assert_eq!(set.scenes(), &[scene]);
        assert_eq!(set.selection(), Selection::Scene(scene));
        assert!(set.graph().is_leaf(root));
    }
}
