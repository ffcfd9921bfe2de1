//! Scene traversals
//!
//! - [`RenderTraversal`] walks one scene per frame and fills a [`RenderQueue`]
//! - [`DisplayTraversal`] walks every scene for the hierarchy outline and
//!   turns row interactions into intents
//!
//! Both borrow the graph immutably and use explicit stacks bounded by
//! `max_traversal_depth`.

pub mod display;
pub mod render;

pub use display::{DisplayTraversal, HierarchyRow, HierarchyView, RowFlags, RowResponse};
pub use render::{
    render_frame, CameraView, DrawCommand, DrawStyle, FrameView, PrimitiveUniform,
    RenderQueue, RenderTraversal, Viewport,
};
