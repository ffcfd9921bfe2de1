//! Default names for created scenes and nodes

use crate::scene::{BuiltinMesh, CameraComponent, Component, Primitive};

/// Node presets offered by the create menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Bare node with only a transform
    Object,
    /// Node with a box primitive
    Box,
    /// Node with a sphere primitive
    Sphere,
    /// Node with a camera
    Camera,
}

impl NodeKind {
    /// Prefix of generated names
    pub const fn label(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Box => "Box",
            Self::Sphere => "Sphere",
            Self::Camera => "Camera",
        }
    }

    /// Component attached on creation, if any
    pub fn default_component(self) -> Option<Component> {
        match self {
            Self::Object => None,
            Self::Box => Some(Primitive::builtin(BuiltinMesh::Box).into()),
            Self::Sphere => Some(Primitive::builtin(BuiltinMesh::Sphere).into()),
            Self::Camera => Some(CameraComponent::default().into()),
        }
    }
}

/// Per-kind counters producing "Scene 1", "Box 3", ...
///
/// Counters only ever grow, so names are not reused after deletion.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    scenes: u32,
    objects: u32,
    boxes: u32,
    spheres: u32,
    cameras: u32,
}

impl NameGenerator {
    /// Fresh generator with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Next scene name
    pub fn next_scene(&mut self) -> String {
        self.scenes += 1;
        format!("Scene {}", self.scenes)
    }

    /// Next node name for the given kind
    pub fn next_node(&mut self, kind: NodeKind) -> String {
        let counter = match kind {
            NodeKind::Object => &mut self.objects,
            NodeKind::Box => &mut self.boxes,
            NodeKind::Sphere => &mut self.spheres,
            NodeKind::Camera => &mut self.cameras,
        };
        *counter += 1;
        format!("{} {}", kind.label(), counter)
    }
}
