//! Math utilities and types
//!
//! Provides the math types used by transforms, cameras and the render queue.
//! Matrices follow the right-handed, Y-up, column-vector convention with
//! clip-space depth in `[-1, 1]`.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Rotation from Euler angles in degrees (X roll, Y pitch, Z yaw)
    pub fn euler_degrees_to_quat(angles: Vec3) -> Quat {
        Quat::from_euler_angles(
            deg_to_rad(angles.x),
            deg_to_rad(angles.y),
            deg_to_rad(angles.z),
        )
    }

    /// Arithmetic mean of the three components
    pub fn mean(v: Vec3) -> f32 {
        (v.x + v.y + v.z) / 3.0
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix (`fov_y` in radians)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix for a view volume of the given height
    fn orthographic(height: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Compose translation, Euler rotation (degrees) and scale in T * R * S order
    fn from_euler_trs(position: Vec3, euler_degrees: Vec3, scale: Vec3) -> Mat4;

    /// Same matrix with the scale removed from its basis vectors
    fn rigid_part(&self) -> Mat4;

    /// Translation column as a point
    fn origin(&self) -> Point3;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();
        let mut result = Mat4::zeros();

        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = (far + near) / (near - far);
        result[(2, 3)] = 2.0 * far * near / (near - far);
        result[(3, 2)] = -1.0;

        result
    }

    fn orthographic(height: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let top = height * 0.5;
        let right = top * aspect;
        let mut result = Mat4::identity();

        result[(0, 0)] = 1.0 / right;
        result[(1, 1)] = 1.0 / top;
        result[(2, 2)] = -2.0 / (far - near);
        result[(2, 3)] = -(far + near) / (far - near);

        result
    }

    fn from_euler_trs(position: Vec3, euler_degrees: Vec3, scale: Vec3) -> Mat4 {
        Mat4::new_translation(&position)
            * utils::euler_degrees_to_quat(euler_degrees).to_homogeneous()
            * Mat4::new_nonuniform_scaling(&scale)
    }

    fn rigid_part(&self) -> Mat4 {
        let mut result = *self;
        for column in 0..3 {
            let axis: Vec3 = self.fixed_view::<3, 1>(0, column).into_owned();
            let length = axis.norm();
            if length > f32::EPSILON {
                result
                    .fixed_view_mut::<3, 1>(0, column)
                    .copy_from(&(axis / length));
            }
        }
        result
    }

    fn origin(&self) -> Point3 {
        Point3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }
}
