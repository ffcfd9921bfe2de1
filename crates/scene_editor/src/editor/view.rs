//! Editor viewport camera

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Vec3};
use crate::scene::CameraComponent;

/// Which camera the main viewport renders through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Free editor camera with overlays
    #[default]
    Editor,
    /// The scene's current camera, no overlays
    Renderer,
}

/// Free-flying camera used to look at the scene while editing
///
/// It is not part of any scene, so it has its own position and Euler angles
/// instead of a node transform.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    /// World position
    pub position: Vec3,
    /// Euler angles in degrees
    pub euler_angles: Vec3,
    /// Projection settings
    pub camera: CameraComponent,
    /// Whether the ground grid is drawn
    pub show_ground: bool,
}

impl EditorView {
    /// Distance from the origin of the default view
    pub const DEFAULT_DISTANCE: f32 = 10.0;

    /// View camera with the given projection, placed at the default view
    pub fn new(camera: CameraComponent) -> Self {
        let aspect = camera.aspect_ratio();
        let mut view = Self {
            position: Vec3::zeros(),
            euler_angles: Vec3::zeros(),
            camera,
            show_ground: true,
        };
        view.set_default_view(aspect);
        view
    }

    /// Look at the origin from `+Z` with the given aspect ratio
    pub fn set_default_view(&mut self, aspect_ratio: f32) {
        self.position = Vec3::new(0.0, 0.0, Self::DEFAULT_DISTANCE);
        self.euler_angles = Vec3::zeros();
        self.camera.set_aspect_ratio(aspect_ratio);
    }

    /// Camera-to-world matrix
    pub fn camera_to_world(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * utils::euler_degrees_to_quat(self.euler_angles).to_homogeneous()
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Mat4 {
        let rotation = utils::euler_degrees_to_quat(self.euler_angles);
        rotation.inverse().to_homogeneous() * Mat4::new_translation(&-self.position)
    }

    /// Projection matrix of the view camera
    pub fn projection_matrix(&self) -> Mat4 {
        self.camera.projection_matrix()
    }

    /// Back off from `target` along `+Z` by `offset` scaled with the node's mean scale
    pub fn focus(&mut self, target: Vec3, scale: Vec3, offset: f32) {
        self.position = target + Vec3::new(0.0, 0.0, offset * utils::mean(scale));
        log::debug!("Editor view focused at {:?}", self.position);
    }
}

impl Default for EditorView {
    fn default() -> Self {
        Self::new(CameraComponent::default())
    }
}
