//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::scene::CameraComponent;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Editor-wide settings
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Wireframe color drawn over the selected primitive
    pub selected_wireframe_color: Color,

    /// Line color of the selected camera's frustum
    pub frustum_wireframe_color: Color,

    /// Height in pixels of the camera preview viewport
    pub preview_height: u32,

    /// Longest frustum drawn for a selected camera, measured from the near plane
    pub frustum_max_depth: f32,

    /// Distance the editor camera backs off when focusing a node
    pub focus_offset: f32,

    /// Deepest tree level the traversals descend into
    pub max_traversal_depth: usize,

    /// Background color given to new scenes
    pub scene_background: Color,

    /// Ambient light given to new scenes
    pub scene_ambient_light: Color,

    /// Projection used by the editor view camera
    pub editor_camera: CameraComponent,

    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            selected_wireframe_color: Color::from_rgb8(255, 102, 0),
            frustum_wireframe_color: Color::from_rgb8(255, 0, 0),
            preview_height: 200,
            frustum_max_depth: 10.0,
            focus_offset: 10.0,
            max_traversal_depth: 256,
            scene_background: Color::GRAY,
            scene_ambient_light: Color::DARK_GRAY,
            editor_camera: CameraComponent::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config for EditorConfig {}
