//! Scene graph and component model
//!
//! Scenes own a root node; nodes own their children and their components.
//! All nodes and scenes of an editing session live in one [`SceneGraph`]
//! arena and are referred to by stable [`NodeId`] / [`SceneId`] handles, so
//! parent links are plain keys rather than pointers.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Arena of nodes and scenes with the tree operations
//! - [`SceneNode`] - Tree vertex: name, parent, ordered children, components
//! - [`Component`] - Closed set of component variants (transform, primitive, camera)
//! - [`TransformComponent`] - Local TRS with a lazily cached world matrix

pub mod camera;
pub mod component;
pub mod entity;
pub mod error;
pub mod graph;
pub mod node;
pub mod primitive;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use camera::{CameraComponent, Frustum, ProjectionType};
pub use component::{Component, ComponentKind, ComponentRef, ComponentSet};
pub use entity::NamedEntity;
pub use error::{SceneError, SceneResult};
pub use graph::SceneGraph;
pub use node::{NodeId, SceneNode};
pub use primitive::{BuiltinMesh, MeshHandle, Primitive};
pub use scene::{Scene, SceneId};
pub use transform::TransformComponent;
