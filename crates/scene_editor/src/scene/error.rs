//! Errors raised by scene graph and editor operations
//!
//! Every variant is recoverable: the operation that detects it leaves the
//! graph exactly as it was.

use thiserror::Error;

use super::{ComponentKind, NodeId, SceneId};

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A component of this kind is already attached to the node
    #[error("node already has a {0} component")]
    DuplicateComponent(ComponentKind),

    /// The transform is installed at construction and cannot be detached
    #[error("the transform component cannot be removed")]
    TransformNotRemovable,

    /// The node has no component of this kind
    #[error("node has no {0} component")]
    MissingComponent(ComponentKind),

    /// Handle does not refer to a live node
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// Handle does not refer to a live scene
    #[error("scene {0:?} does not exist")]
    SceneNotFound(SceneId),

    /// `child` is not in `parent`'s child list
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent the caller named
        parent: NodeId,
        /// Node that was expected under it
        child: NodeId,
    },

    /// Moving `node` under `target` would make it its own ancestor
    #[error("cannot move node {node:?} under itself or its descendant {target:?}")]
    CycleDetected {
        /// Node being moved
        node: NodeId,
        /// Requested new parent
        target: NodeId,
    },

    /// Scene roots are owned by their scene and cannot be moved or deleted
    #[error("node {0:?} is a scene root")]
    RootNode(NodeId),

    /// Reparent target resolves to neither a scene nor a node
    #[error("reparent target does not resolve to a scene or a node")]
    AmbiguousReparentTarget,

    /// Deleting the only remaining scene
    #[error("must be at least one scene")]
    LastSceneDeletion,
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
