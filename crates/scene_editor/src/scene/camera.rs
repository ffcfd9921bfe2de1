//! Camera component
//!
//! Projection parameters only. The camera looks down the local -Z axis of
//! the node that owns it, so its view matrix comes from that node's
//! transform.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Point3};

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionType {
    /// Pinhole projection driven by the view angle
    #[default]
    Perspective,
    /// Parallel projection driven by the view height
    Orthographic,
}

/// Camera projection parameters
///
/// Setters clamp their input so the projection is always well formed:
/// the view angle stays in `[MIN_ANGLE, MAX_ANGLE]`, the height is at least
/// `MIN_HEIGHT`, and `far >= near + MIN_DEPTH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraSettings")]
pub struct CameraComponent {
    projection: ProjectionType,
    view_angle: f32,
    height: f32,
    near: f32,
    far: f32,
    aspect_ratio: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            projection: ProjectionType::Perspective,
            view_angle: 60.0,
            height: 10.0,
            near: 0.01,
            far: 1000.0,
            aspect_ratio: 1.0,
        }
    }
}

/// Unchecked camera fields as written in a config file
#[derive(Deserialize)]
#[serde(default)]
struct CameraSettings {
    projection: ProjectionType,
    view_angle: f32,
    height: f32,
    near: f32,
    far: f32,
    aspect_ratio: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let camera = CameraComponent::default();
        Self {
            projection: camera.projection,
            view_angle: camera.view_angle,
            height: camera.height,
            near: camera.near,
            far: camera.far,
            aspect_ratio: camera.aspect_ratio,
        }
    }
}

impl From<CameraSettings> for CameraComponent {
    fn from(settings: CameraSettings) -> Self {
        let mut camera = Self {
            projection: settings.projection,
            ..Self::default()
        };
        camera.set_view_angle(settings.view_angle);
        camera.set_height(settings.height);
        camera.set_clipping_planes(settings.near, settings.far);
        camera.set_aspect_ratio(settings.aspect_ratio);
        camera
    }
}

impl CameraComponent {
    /// Narrowest perspective view angle in degrees
    pub const MIN_ANGLE: f32 = 1.0;

    /// Widest perspective view angle in degrees
    pub const MAX_ANGLE: f32 = 179.0;

    /// Smallest orthographic view height
    pub const MIN_HEIGHT: f32 = 0.01;

    /// Smallest near distance and near/far separation
    pub const MIN_DEPTH: f32 = 0.01;

    /// Perspective camera with the given view angle in degrees
    pub fn perspective(view_angle: f32, near: f32, far: f32) -> Self {
        let mut camera = Self::default();
        camera.set_view_angle(view_angle);
        camera.set_clipping_planes(near, far);
        camera
    }

    /// Orthographic camera with the given view height
    pub fn orthographic(height: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            projection: ProjectionType::Orthographic,
            ..Self::default()
        };
        camera.set_height(height);
        camera.set_clipping_planes(near, far);
        camera
    }

    /// Current projection model
    pub const fn projection_type(&self) -> ProjectionType {
        self.projection
    }

    /// Perspective view angle in degrees
    pub const fn view_angle(&self) -> f32 {
        self.view_angle
    }

    /// Orthographic view height
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Near clipping distance
    pub const fn near(&self) -> f32 {
        self.near
    }

    /// Far clipping distance
    pub const fn far(&self) -> f32 {
        self.far
    }

    /// Width over height
    pub const fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Distance between the clipping planes
    pub fn depth(&self) -> f32 {
        self.far - self.near
    }

    /// Switch projection model
    pub fn set_projection_type(&mut self, projection: ProjectionType) {
        self.projection = projection;
    }

    /// Set the view angle, clamped to `[MIN_ANGLE, MAX_ANGLE]`
    pub fn set_view_angle(&mut self, degrees: f32) {
        self.view_angle = degrees.clamp(Self::MIN_ANGLE, Self::MAX_ANGLE);
    }

    /// Set the view height, at least `MIN_HEIGHT`
    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(Self::MIN_HEIGHT);
    }

    /// Set both clipping planes
    ///
    /// `near` is raised to `MIN_DEPTH` and `far` is pushed out to keep at
    /// least `MIN_DEPTH` of depth.
    pub fn set_clipping_planes(&mut self, near: f32, far: f32) {
        let near = near.max(Self::MIN_DEPTH);
        self.near = near;
        self.far = far.max(near + Self::MIN_DEPTH);
    }

    /// Set width over height; non-positive values are ignored
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        } else {
            log::warn!("Ignoring non-positive camera aspect ratio {aspect_ratio}");
        }
    }

    /// Projection matrix with clip depth in `[-1, 1]`
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            ProjectionType::Perspective => Mat4::perspective(
                utils::deg_to_rad(self.view_angle),
                self.aspect_ratio,
                self.near,
                self.far,
            ),
            ProjectionType::Orthographic => {
                Mat4::orthographic(self.height, self.aspect_ratio, self.near, self.far)
            }
        }
    }

    /// Half extents `(width, height)` of the view volume at `distance`
    fn half_extents(&self, distance: f32) -> (f32, f32) {
        let half_height = match self.projection {
            ProjectionType::Perspective => {
                (utils::deg_to_rad(self.view_angle) * 0.5).tan() * distance
            }
            ProjectionType::Orthographic => self.height * 0.5,
        };
        (half_height * self.aspect_ratio, half_height)
    }

    /// World-space view volume for drawing
    ///
    /// `camera_to_world` should be free of scale. The far plane is pulled in
    /// to at most `max_depth` past the near plane.
    pub fn frustum(&self, camera_to_world: &Mat4, max_depth: f32) -> Frustum {
        let near = self.near;
        let far = self.far.min(near + max_depth);

        let plane = |distance: f32| {
            let (w, h) = self.half_extents(distance);
            [
                Point3::new(w, h, -distance),
                Point3::new(-w, h, -distance),
                Point3::new(-w, -h, -distance),
                Point3::new(w, -h, -distance),
            ]
            .map(|corner| camera_to_world.transform_point(&corner))
        };

        Frustum {
            near: plane(near),
            far: plane(far),
        }
    }
}

/// Corners of a view volume
///
/// Both rectangles run counter-clockwise from the top-right corner as seen
/// from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Near plane corners
    pub near: [Point3; 4],
    /// Far plane corners
    pub far: [Point3; 4],
}

impl Frustum {
    /// Number of edges in a frustum wireframe
    pub const EDGE_COUNT: usize = 12;

    /// Wireframe segments: near ring, far ring, then the four side edges
    pub fn edges(&self) -> [(Point3, Point3); Self::EDGE_COUNT] {
        let n = &self.near;
        let f = &self.far;
        [
            (n[0], n[1]),
            (n[1], n[2]),
            (n[2], n[3]),
            (n[3], n[0]),
            (f[0], f[1]),
            (f[1], f[2]),
            (f[2], f[3]),
            (f[3], f[0]),
            (n[0], f[0]),
            (n[1], f[1]),
            (n[2], f[2]),
            (n[3], f[3]),
        ]
    }
}
