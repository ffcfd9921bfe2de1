//! # Scene Editor
//!
//! Scene graph and component model for an interactive hierarchy editor.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed tree of named nodes with stable handles
//! - **Typed Components**: Transform, Primitive and Camera with singleton rules
//! - **Reparenting**: Cycle-checked moves that keep transforms and scene membership in sync
//! - **Selection**: Scene set with a single current scene/node selection
//! - **Traversals**: Per-frame render queue and lazily expanded hierarchy outline
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_editor::prelude::*;
//!
//! let mut editor = SceneSet::default();
//! let scene = editor.current_scene();
//! let root = editor.graph().scene(scene).unwrap().root();
//!
//! let cube = editor.create_child(root, NodeKind::Box).unwrap();
//! assert_eq!(editor.graph().display_name(cube), Some("Box 1"));
//! assert_eq!(editor.selection(), Selection::Node(cube));
//!
//! let mut queue = RenderQueue::new();
//! RenderTraversal::new(editor.graph(), editor.config())
//!     .run(scene, &mut queue)
//!     .unwrap();
//! assert_eq!(queue.primitive_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod editor;
pub mod foundation;
pub mod scene;
pub mod traversal;

#[cfg(test)]
mod tests;

/// Common imports for editor users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EditorConfig},
        editor::{
            CreateKind, EditorView, Intent, IntentQueue, NameGenerator, NodeKind, Notice,
            SceneSet, Selection, ViewMode,
        },
        foundation::{
            color::Color,
            math::{Mat4, Mat4Ext, Point3, Vec3},
        },
        scene::{
            BuiltinMesh, CameraComponent, Component, ComponentKind, ComponentRef, MeshHandle,
            NodeId, Primitive, ProjectionType, Scene, SceneError, SceneGraph, SceneId,
            SceneNode, SceneResult, TransformComponent,
        },
        traversal::{
            CameraView, DisplayTraversal, DrawCommand, DrawStyle, FrameView, HierarchyRow,
            HierarchyView, RenderQueue, RenderTraversal, RowFlags, RowResponse, Viewport,
        },
    };
}
