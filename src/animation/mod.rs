//! Keyframe Animation
//!
//! Clips, keyframe tracks and the playback handles that sample them:
//!
//! - [`AnimationClip`]: immutable named set of keyframe tracks with a duration
//! - [`AnimationAction`]: playback handle binding one clip to scene nodes
//! - [`AnimationMixer`]: owns a model's actions and writes samples into the scene
//! - [`Binder`]: resolves track target names to scene nodes
//!
//! Actions are positioned with absolute times rather than advanced by frame
//! deltas, which is what scroll scrubbing needs.

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode, resolve_time};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::AnimationMixer;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::{Interpolatable, MAX_MORPH_TARGETS, MorphWeightData};
