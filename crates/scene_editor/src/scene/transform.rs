//! Hierarchical transform component
//!
//! Each node carries exactly one transform. Local values are edited directly;
//! the world matrix is cached and only recomputed by the scene graph when the
//! transform or one of its ancestors has been marked dirty.

use std::cell::Cell;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Quat, Vec3};

/// Local TRS with a lazily recomputed world matrix
///
/// Rotation is stored as Euler angles in degrees (X roll, Y pitch, Z yaw) so
/// that inspector edits round-trip without quaternion drift.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    local_position: Vec3,
    local_euler_angles: Vec3,
    local_scale: Vec3,
    world: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }
}

impl TransformComponent {
    /// Smallest magnitude a scale axis is allowed to reach
    pub const MIN_SCALE: f32 = 0.0001;

    /// Create a transform from local position, Euler angles (degrees) and scale
    pub fn new(position: Vec3, euler_degrees: Vec3, scale: Vec3) -> Self {
        Self {
            local_position: position,
            local_euler_angles: euler_degrees,
            local_scale: clamp_scale(scale),
            world: Cell::new(Mat4::identity()),
            dirty: Cell::new(true),
        }
    }

    /// Builder pattern: set local position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.local_position = position;
        self
    }

    /// Builder pattern: set local Euler angles in degrees
    pub fn with_euler_angles(mut self, euler_degrees: Vec3) -> Self {
        self.local_euler_angles = euler_degrees;
        self
    }

    /// Builder pattern: set local scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.local_scale = clamp_scale(scale);
        self
    }

    /// Position relative to the parent
    pub const fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Euler angles in degrees relative to the parent
    pub const fn local_euler_angles(&self) -> Vec3 {
        self.local_euler_angles
    }

    /// Scale relative to the parent
    pub const fn local_scale(&self) -> Vec3 {
        self.local_scale
    }

    /// Local rotation as a quaternion
    pub fn rotation(&self) -> Quat {
        utils::euler_degrees_to_quat(self.local_euler_angles)
    }

    /// Local matrix in T * R * S order
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_euler_trs(self.local_position, self.local_euler_angles, self.local_scale)
    }

    /// Whether the cached world matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub(crate) fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
        self.invalidate();
    }

    pub(crate) fn set_local_euler_angles(&mut self, euler_degrees: Vec3) {
        self.local_euler_angles = euler_degrees;
        self.invalidate();
    }

    pub(crate) fn set_local_scale(&mut self, scale: Vec3) {
        self.local_scale = clamp_scale(scale);
        self.invalidate();
    }

    pub(crate) fn invalidate(&self) {
        self.dirty.set(true);
    }

    /// Last stored world matrix, stale when dirty
    pub(crate) fn cached_world(&self) -> Mat4 {
        self.world.get()
    }

    pub(crate) fn store_world(&self, world: Mat4) {
        self.world.set(world);
        self.dirty.set(false);
    }
}

/// Keep every axis at least `MIN_SCALE` away from zero, preserving sign
fn clamp_scale(scale: Vec3) -> Vec3 {
    scale.map(|s| {
        if s.abs() < TransformComponent::MIN_SCALE {
            TransformComponent::MIN_SCALE.copysign(if s == 0.0 { 1.0 } else { s })
        } else {
            s
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_identity_and_dirty() {
        let transform = TransformComponent::default();
        assert_relative_eq!(transform.local_matrix(), Mat4::identity());
        assert!(transform.is_dirty());
    }

    #[test]
    fn test_scale_is_clamped() {
        let transform = TransformComponent::default().with_scale(Vec3::new(0.0, -0.00001, 2.0));
        assert_relative_eq!(
            transform.local_scale(),
            Vec3::new(TransformComponent::MIN_SCALE, -TransformComponent::MIN_SCALE, 2.0)
        );
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut transform = TransformComponent::default();
        transform.store_world(Mat4::identity());
        assert!(!transform.is_dirty());

        transform.set_local_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(transform.is_dirty());

        transform.store_world(transform.local_matrix());
        assert_relative_eq!(
            transform.cached_world().transform_point(&Point3::origin()),
            Point3::new(1.0, 2.0, 3.0)
        );
    }
}
