//! Current selection

use crate::scene::{NodeId, SceneId};

/// What the inspector is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// Nothing selected
    #[default]
    None,
    /// A whole scene
    Scene(SceneId),
    /// A single node
    Node(NodeId),
}

impl Selection {
    /// Selected node, if a node is selected
    pub const fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Selected scene, if a scene is selected
    pub const fn scene(self) -> Option<SceneId> {
        match self {
            Self::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    /// Whether nothing is selected
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<NodeId> for Selection {
    fn from(value: NodeId) -> Self {
        Self::Node(value)
    }
}

impl From<SceneId> for Selection {
    fn from(value: SceneId) -> Self {
        Self::Scene(value)
    }
}
