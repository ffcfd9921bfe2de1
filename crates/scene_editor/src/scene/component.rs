//! Typed node components
//!
//! The component set is closed: every node owns exactly one transform and
//! at most one primitive and one camera. Components are held by value, so a
//! detached component belongs to whoever received it and can never sit on
//! two nodes at once.

use std::fmt;

use super::{CameraComponent, Primitive, SceneError, SceneResult, TransformComponent};

/// Component variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Hierarchical transform
    Transform,
    /// Drawable primitive
    Primitive,
    /// Camera projection
    Camera,
}

impl ComponentKind {
    /// Name shown in the inspector and in logs
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Transform => "Transform",
            Self::Primitive => "Primitive",
            Self::Camera => "Camera",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Owned component value
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Transform payload
    Transform(TransformComponent),
    /// Primitive payload
    Primitive(Primitive),
    /// Camera payload
    Camera(CameraComponent),
}

impl Component {
    /// Variant tag
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::Primitive(_) => ComponentKind::Primitive,
            Self::Camera(_) => ComponentKind::Camera,
        }
    }
}

impl From<Primitive> for Component {
    fn from(value: Primitive) -> Self {
        Self::Primitive(value)
    }
}

impl From<CameraComponent> for Component {
    fn from(value: CameraComponent) -> Self {
        Self::Camera(value)
    }
}

/// Borrowed view of a component, yielded by component iteration
#[derive(Debug, Clone, Copy)]
pub enum ComponentRef<'a> {
    /// Borrowed transform
    Transform(&'a TransformComponent),
    /// Borrowed primitive
    Primitive(&'a Primitive),
    /// Borrowed camera
    Camera(&'a CameraComponent),
}

impl ComponentRef<'_> {
    /// Variant tag
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::Primitive(_) => ComponentKind::Primitive,
            Self::Camera(_) => ComponentKind::Camera,
        }
    }
}

/// Components owned by one node
///
/// The transform is a dedicated field; the optional components keep their
/// attachment order, which is the order traversals visit them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSet {
    transform: TransformComponent,
    attached: Vec<Component>,
}

impl ComponentSet {
    /// Set holding only the given transform
    pub fn with_transform(transform: TransformComponent) -> Self {
        Self {
            transform,
            attached: Vec::new(),
        }
    }

    /// The node's transform
    pub const fn transform(&self) -> &TransformComponent {
        &self.transform
    }

    pub(crate) fn transform_mut(&mut self) -> &mut TransformComponent {
        &mut self.transform
    }

    /// Attach a component, rejecting a second one of the same kind
    ///
    /// On error the set is unchanged and the component is dropped.
    pub fn attach(&mut self, component: Component) -> SceneResult<()> {
        let kind = component.kind();
        if kind == ComponentKind::Transform || self.contains(kind) {
            return Err(SceneError::DuplicateComponent(kind));
        }
        self.attached.push(component);
        Ok(())
    }

    /// Remove and return the component of the given kind
    pub fn detach(&mut self, kind: ComponentKind) -> SceneResult<Component> {
        if kind == ComponentKind::Transform {
            return Err(SceneError::TransformNotRemovable);
        }
        let index = self
            .attached
            .iter()
            .position(|c| c.kind() == kind)
            .ok_or(SceneError::MissingComponent(kind))?;
        Ok(self.attached.remove(index))
    }

    /// Whether a component of the given kind is present
    pub fn contains(&self, kind: ComponentKind) -> bool {
        kind == ComponentKind::Transform || self.attached.iter().any(|c| c.kind() == kind)
    }

    /// Borrow the component of the given kind
    pub fn find(&self, kind: ComponentKind) -> Option<ComponentRef<'_>> {
        self.iter().find(|c| c.kind() == kind)
    }

    /// Number of components of the given kind (0 or 1)
    pub fn count(&self, kind: ComponentKind) -> usize {
        self.iter().filter(|c| c.kind() == kind).count()
    }

    /// Total number of components including the transform
    pub fn len(&self) -> usize {
        self.attached.len() + 1
    }

    /// Always false; the transform is always present
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The primitive, if attached
    pub fn primitive(&self) -> Option<&Primitive> {
        self.attached.iter().find_map(|c| match c {
            Component::Primitive(p) => Some(p),
            _ => None,
        })
    }

    /// Mutable primitive, if attached
    pub fn primitive_mut(&mut self) -> Option<&mut Primitive> {
        self.attached.iter_mut().find_map(|c| match c {
            Component::Primitive(p) => Some(p),
            _ => None,
        })
    }

    /// The camera, if attached
    pub fn camera(&self) -> Option<&CameraComponent> {
        self.attached.iter().find_map(|c| match c {
            Component::Camera(camera) => Some(camera),
            _ => None,
        })
    }

    /// Mutable camera, if attached
    pub fn camera_mut(&mut self) -> Option<&mut CameraComponent> {
        self.attached.iter_mut().find_map(|c| match c {
            Component::Camera(camera) => Some(camera),
            _ => None,
        })
    }

    /// Transform first, then the optional components in attachment order
    pub fn iter(&self) -> impl Iterator<Item = ComponentRef<'_>> {
        std::iter::once(ComponentRef::Transform(&self.transform)).chain(self.attached.iter().map(
            |c| match c {
                Component::Transform(t) => ComponentRef::Transform(t),
                Component::Primitive(p) => ComponentRef::Primitive(p),
                Component::Camera(camera) => ComponentRef::Camera(camera),
            },
        ))
    }
}
