//! Stage Configuration
//!
//! Everything the stage needs is described by [`StageConfig`], loadable from
//! JSON. Every field has a default, so `{}` is a valid configuration that
//! reproduces the stock page: a camera at (20, 20, 20), soft ambient light,
//! one directional light and a four-screen scroll track.
//!
//! ```json
//! {
//!   "model": { "path": "models/building.gltf", "short_clip_policy": "loop" },
//!   "trigger": { "start": "top top", "end": "bottom bottom" },
//!   "framing": { "recenter": true }
//! }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, StageError};
use crate::framing::FramingPolicy;
use crate::scroll::TriggerConfig;
use crate::sync::ShortClipPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model file path (native) or URL (web).
    pub path: String,
    pub short_clip_policy: ShortClipPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/building.gltf".to_string(),
            short_clip_policy: ShortClipPolicy::Clamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [20.0, 20.0, 20.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_position: [f32; 3],
    pub directional_intensity: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.7,
            directional_color: [1.0, 1.0, 1.0],
            directional_position: [10.0, 10.0, 10.0],
            directional_intensity: 1.0,
        }
    }
}

/// The scrollable page the animation is mapped onto, and the stand-in box
/// shown until the model is ready.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Number of full-viewport sections stacked in the scroll region.
    pub sections: u32,
    pub placeholder_size: f32,
    pub placeholder_color: [f32; 3],
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            sections: 4,
            placeholder_size: 1.0,
            placeholder_color: [1.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub model: ModelConfig,
    pub trigger: TriggerConfig,
    pub framing: FramingPolicy,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
    pub page: PageLayout,
    /// Log a report of each loaded model.
    pub diagnostics: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            trigger: TriggerConfig::default(),
            framing: FramingPolicy::default(),
            camera: CameraSettings::default(),
            lighting: LightingSettings::default(),
            page: PageLayout::default(),
            diagnostics: true,
        }
    }
}

impl StageConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rejects values the stage cannot work with. NaN fails every check.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        let cam = &self.camera;
        if !(cam.fov_y_degrees > 0.0 && cam.fov_y_degrees < 180.0) {
            return Err(StageError::Config(format!(
                "camera.fov_y_degrees must be in (0, 180), got {}",
                cam.fov_y_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(StageError::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if Vec3::from_array(cam.position) == Vec3::from_array(cam.target) {
            return Err(StageError::Config("camera.position equals camera.target".into()));
        }

        let framing = &self.framing;
        if !(framing.min_extent >= 0.0 && framing.max_extent > framing.min_extent) {
            return Err(StageError::Config(format!(
                "framing extents must satisfy 0 <= min < max, got min={} max={}",
                framing.min_extent, framing.max_extent
            )));
        }
        if !(framing.target_extent > 0.0 && framing.target_extent.is_finite()) {
            return Err(StageError::Config(format!(
                "framing.target_extent must be positive, got {}",
                framing.target_extent
            )));
        }

        let light = &self.lighting;
        if !(light.ambient_intensity >= 0.0 && light.directional_intensity >= 0.0) {
            return Err(StageError::Config("light intensities must be non-negative".into()));
        }

        if self.page.sections == 0 {
            return Err(StageError::Config("page.sections must be at least 1".into()));
        }
        if !(self.page.placeholder_size > 0.0) {
            return Err(StageError::Config("page.placeholder_size must be positive".into()));
        }

        Ok(())
    }
}
