//! Drawable primitive component

use crate::foundation::color::Color;

/// Opaque handle to a mesh owned by the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(u32);

impl MeshHandle {
    /// Wrap a renderer-side mesh id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id understood by the renderer
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Meshes every renderer is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinMesh {
    /// Unit cube
    Box,
    /// Unit sphere
    Sphere,
}

impl BuiltinMesh {
    /// All built-in meshes in menu order
    pub const ALL: [Self; 2] = [Self::Box, Self::Sphere];

    /// Handle reserved for this mesh
    pub const fn handle(self) -> MeshHandle {
        match self {
            Self::Box => MeshHandle(0),
            Self::Sphere => MeshHandle(1),
        }
    }

    /// Display name shown in the inspector
    pub const fn name(self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Sphere => "Sphere",
        }
    }
}

/// Mesh reference plus a flat color
///
/// A primitive without a mesh (the "None" mesh) is valid and simply draws
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    mesh: Option<MeshHandle>,
    mesh_name: String,

    /// Flat color passed to the renderer
    pub color: Color,
}

impl Primitive {
    /// Name reported for a primitive with no mesh
    pub const NO_MESH: &'static str = "None";

    /// Primitive drawing an arbitrary renderer mesh
    pub fn new(mesh: MeshHandle, mesh_name: impl Into<String>, color: Color) -> Self {
        Self {
            mesh: Some(mesh),
            mesh_name: mesh_name.into(),
            color,
        }
    }

    /// Primitive with the "None" mesh
    pub fn empty() -> Self {
        Self {
            mesh: None,
            mesh_name: Self::NO_MESH.to_string(),
            color: Color::WHITE,
        }
    }

    /// White primitive drawing a built-in mesh
    pub fn builtin(mesh: BuiltinMesh) -> Self {
        Self::new(mesh.handle(), mesh.name(), Color::WHITE)
    }

    /// Mesh handle, `None` for the "None" mesh
    pub const fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }

    /// Mesh display name
    pub fn mesh_name(&self) -> &str {
        &self.mesh_name
    }

    /// Swap to another mesh
    pub fn set_mesh(&mut self, mesh: MeshHandle, mesh_name: impl Into<String>) {
        self.mesh = Some(mesh);
        self.mesh_name = mesh_name.into();
    }

    /// Swap to a built-in mesh
    pub fn set_builtin(&mut self, mesh: BuiltinMesh) {
        self.set_mesh(mesh.handle(), mesh.name());
    }

    /// Switch to the "None" mesh
    pub fn clear_mesh(&mut self) {
        self.mesh = None;
        self.mesh_name = Self::NO_MESH.to_string();
    }
}

impl Default for Primitive {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_swap() {
        let mut primitive = Primitive::empty();
        assert_eq!(primitive.mesh(), None);
        assert_eq!(primitive.mesh_name(), "None");

        primitive.set_builtin(BuiltinMesh::Sphere);
        assert_eq!(primitive.mesh(), Some(BuiltinMesh::Sphere.handle()));
        assert_eq!(primitive.mesh_name(), "Sphere");

        primitive.clear_mesh();
        assert_eq!(primitive.mesh(), None);
        assert_eq!(primitive.mesh_name(), Primitive::NO_MESH);
    }

    #[test]
    fn test_builtin_handles_are_distinct() {
        assert_ne!(BuiltinMesh::Box.handle(), BuiltinMesh::Sphere.handle());
    }

    #[test]
    fn test_builtin_meshes_in_menu_order() {
        let ids = BuiltinMesh::ALL.map(|mesh| mesh.handle().id());
        let names = BuiltinMesh::ALL.map(BuiltinMesh::name);

        assert_eq!(ids, [0, 1]);
        assert_eq!(names, ["Box", "Sphere"]);
        assert_eq!(MeshHandle::new(7).id(), 7);
    }
}
