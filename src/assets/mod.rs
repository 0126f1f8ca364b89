//! Asset Loading
//!
//! glTF 2.0 import into the [`Scene`](crate::scene::Scene). Native builds
//! read files through tokio; the browser build fetches bytes and parses
//! them from memory.

pub mod gltf;
pub mod io;

use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::scene::NodeHandle;

pub use self::gltf::{GltfLoader, MODEL_ROOT_NAME};

/// A model imported into a scene.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    /// File name or URL segment the model came from.
    pub name: String,
    /// Detached group node parenting the model.
    pub root: NodeHandle,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl ModelAsset {
    #[must_use]
    pub fn has_animations(&self) -> bool {
        !self.clips.is_empty()
    }

    /// Longest clip duration, zero without clips.
    #[must_use]
    pub fn longest_clip(&self) -> f32 {
        self.clips.iter().map(|c| c.duration).fold(0.0, f32::max)
    }
}
