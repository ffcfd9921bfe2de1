//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the editor:
//! - Math types and operations
//! - Colors shared by scenes, primitives and overlays
//! - Logging utilities

pub mod color;
pub mod logging;
pub mod math;
