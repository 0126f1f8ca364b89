#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Scroll-driven playback of glTF model animations.
//!
//! A model's clips are laid on one shared timeline as long as the longest
//! clip, and the page's scroll progress picks the point on that timeline:
//!
//! ```rust,ignore
//! use scrollstage::{GltfLoader, Stage, StageConfig};
//!
//! let mut stage = Stage::new(StageConfig::default())?;
//! stage.install_scroll_triggers(Some(900.0));
//! stage.mount_page()?;
//!
//! let asset = GltfLoader::load("models/building.gltf", stage.scene_mut()).await;
//! stage.mount_model(asset, None);
//!
//! stage.scroll_to(1350.0); // half way down a four-screen page
//! let frame = stage.tick();
//! ```

pub mod animation;
pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod framing;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod sync;
pub mod time;
pub mod web;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use assets::{GltfLoader, ModelAsset};
pub use config::StageConfig;
pub use diagnostics::{DiagnosticHook, LogDiagnostics, SceneInventory};
pub use errors::{Result, StageError};
pub use framing::{FramingPolicy, FramingReport, frame_model};
pub use scene::{Node, NodeHandle, Scene, SceneHost};
pub use scroll::{ScrollRegion, ScrollTriggers, TriggerConfig, TriggerEdge};
pub use stage::{MountOutcome, Stage};
pub use sync::{ScrollSync, SharedSync, ShortClipPolicy};
pub use time::{FrameState, FrameTimer};
