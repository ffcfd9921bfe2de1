//! Deferred editing commands
//!
//! Traversals borrow the scene set immutably, so anything a GUI row wants to
//! change is recorded here and applied with [`SceneSet::apply_all`] after the
//! pass.
//!
//! [`SceneSet::apply_all`]: super::SceneSet::apply_all

use std::collections::VecDeque;

use super::{NodeKind, Selection};
use crate::scene::{ComponentKind, NodeId};

/// What the create menu should make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    /// A new scene
    Scene,
    /// A node of the given kind
    Node(NodeKind),
}

/// A user edit waiting to be applied
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Create a scene, or a node under a scene's root or another node
    ///
    /// `under` is ignored for scenes; [`Selection::None`] puts a node under
    /// the current scene's root.
    Create {
        /// What to make
        kind: CreateKind,
        /// Where a new node goes
        under: Selection,
    },
    /// Select a scene or node and delete it
    Delete(Selection),
    /// Change the current selection
    Select(Selection),
    /// Move a node under a scene root or another node
    Reparent {
        /// Dragged node
        node: NodeId,
        /// Drop target
        target: Selection,
    },
    /// Rename a scene or node
    Rename {
        /// Renamed entity
        target: Selection,
        /// New name
        name: String,
    },
    /// Flip a node's visibility
    ToggleVisible(NodeId),
    /// Move the editor camera in front of a node
    FocusCameraOn(NodeId),
    /// Attach a default primitive or camera
    AddComponent {
        /// Target node
        node: NodeId,
        /// Kind to attach
        kind: ComponentKind,
    },
    /// Detach a primitive or camera
    RemoveComponent {
        /// Target node
        node: NodeId,
        /// Kind to detach
        kind: ComponentKind,
    },
    /// Make a node's camera current, or clear it
    SetCurrentCamera {
        /// Node carrying the camera
        node: NodeId,
        /// Whether it should be current
        current: bool,
    },
}

/// FIFO of pending intents
#[derive(Debug, Clone, Default)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
}

impl IntentQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an intent
    pub fn push(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    /// Take all pending intents in submission order
    pub fn drain(&mut self) -> impl Iterator<Item = Intent> + '_ {
        self.pending.drain(..)
    }

    /// Number of pending intents
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Extend<Intent> for IntentQueue {
    fn extend<T: IntoIterator<Item = Intent>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}
