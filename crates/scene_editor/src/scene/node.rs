//! Scene graph vertex

use super::{ComponentSet, NamedEntity, SceneId, TransformComponent};

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`](super::SceneGraph)
    pub struct NodeId;
}

/// Named tree vertex owning its components
///
/// Links are maintained by the scene graph: `parent` and `children` always
/// agree, and `scene` is the scene whose root contains the node.
#[derive(Debug, Clone)]
pub struct SceneNode {
    entity: NamedEntity,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) components: ComponentSet,
    pub(crate) scene: SceneId,

    /// Skipped with its subtree by the render traversal when false
    pub visible: bool,
}

impl SceneNode {
    pub(crate) fn new(name: impl Into<String>, parent: Option<NodeId>, scene: SceneId) -> Self {
        Self {
            entity: NamedEntity::new(name),
            parent,
            children: Vec::new(),
            components: ComponentSet::default(),
            scene,
            visible: true,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.entity.set_name(name);
    }

    /// Parent node, `None` only for scene roots
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Owning scene
    pub const fn scene(&self) -> SceneId {
        self.scene
    }

    /// Whether this node is a scene root
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Attached components
    pub const fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Shortcut for the node's transform
    pub const fn transform(&self) -> &TransformComponent {
        self.components.transform()
    }
}
