//! Model framing: brings models authored in odd units to a size the fixed
//! camera can see.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::{NodeHandle, Scene};

/// When and how a freshly loaded model is rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingPolicy {
    /// Models whose largest extent exceeds this are scaled down.
    pub max_extent: f32,
    /// Models whose largest extent is below this (and non-zero) are scaled up.
    pub min_extent: f32,
    /// Largest extent after rescaling.
    pub target_extent: f32,
    /// Move the model so its bounds are centred on the origin.
    pub recenter: bool,
}

impl Default for FramingPolicy {
    fn default() -> Self {
        Self {
            max_extent: 100.0,
            min_extent: 0.1,
            target_extent: 10.0,
            recenter: false,
        }
    }
}

impl FramingPolicy {
    /// Uniform scale to apply for a model of largest extent `extent`, if any.
    #[must_use]
    pub fn scale_for(&self, extent: f32) -> Option<f32> {
        if !extent.is_finite() || extent <= 0.0 {
            return None;
        }
        if extent > self.max_extent || extent < self.min_extent {
            Some(self.target_extent / extent)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingReport {
    /// World-space size before rescaling.
    pub size: Vec3,
    /// World-space centre before rescaling.
    pub center: Vec3,
    pub applied_scale: Option<f32>,
}

/// Measures the model under `root` and rescales it according to `policy`.
pub fn frame_model(scene: &mut Scene, root: NodeHandle, policy: &FramingPolicy) -> FramingReport {
    let bounds = scene.world_bounds(root);
    let size = bounds.size();
    let center = bounds.center();
    let applied_scale = policy.scale_for(bounds.max_extent());

    if let Some(node) = scene.get_node_mut(root) {
        if let Some(scale) = applied_scale {
            node.transform.scale *= scale;
            log::info!(
                "Model size {size:?} is outside [{}, {}], scaled by {scale:.4}",
                policy.min_extent,
                policy.max_extent
            );
        }
        if policy.recenter {
            let scale = applied_scale.unwrap_or(1.0);
            node.transform.position = -(center - node.transform.position) * scale;
        }
    }

    FramingReport {
        size,
        center,
        applied_scale,
    }
}
