//! Viewport configuration
//!
//! Every field has a default, so an empty TOML file or `{}` JSON object is a
//! valid config.
//!
//! ```toml
//! background = [0.1, 0.1, 0.2, 1.0]
//!
//! [camera]
//! fov_degrees = 60.0
//! distance = 4.0
//!
//! [cube]
//! color = 0xff8800
//!
//! [animation]
//! rotation_step = 0.02
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ViewportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub camera: CameraConfig,
    pub cube: CubeConfig,
    pub animation: AnimationConfig,
    /// Clear color (RGBA, values 0.0 to 1.0).
    pub background: [f32; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            cube: CubeConfig::default(),
            animation: AnimationConfig::default(),
            background: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance along +Z the camera is placed at mount
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// 0xRRGGBB
    pub color: u32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            color: 0x00ff00,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Radians added to the x and y rotation every frame
    pub rotation_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { rotation_step: 0.01 }
    }
}

impl ViewportConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ViewportError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ViewportError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewportError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        log::info!("Loaded viewport config from {}", path.display());
        Self::from_toml_str(&source)
    }
}
