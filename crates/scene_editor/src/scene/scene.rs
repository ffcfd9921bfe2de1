//! Scene: a named tree root with environment colors

use super::{NamedEntity, NodeId};
use crate::foundation::color::Color;

slotmap::new_key_type! {
    /// Stable handle to a scene in a [`SceneGraph`](super::SceneGraph)
    pub struct SceneId;
}

/// Named scene owning one root node
#[derive(Debug, Clone)]
pub struct Scene {
    entity: NamedEntity,
    root: NodeId,

    /// Clear color used when rendering the scene
    pub background_color: Color,

    /// Ambient light color
    pub ambient_light: Color,
}

impl Scene {
    pub(crate) fn new(
        name: impl Into<String>,
        root: NodeId,
        background: Color,
        ambient: Color,
    ) -> Self {
        Self {
            entity: NamedEntity::new(name),
            root,
            background_color: background,
            ambient_light: ambient,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.entity.set_name(name);
    }

    /// Root node; top-level nodes are its children
    pub const fn root(&self) -> NodeId {
        self.root
    }
}
