use std::sync::Arc;

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::KeyframeCursor;

/// How an action maps an absolute time that runs past its clip's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Hold the first/last frame outside `[0, duration]`.
    #[default]
    Once,
    /// Wrap back to the start.
    Loop,
    /// Bounce between start and end.
    PingPong,
}

/// Maps an absolute time onto a clip of length `duration`.
#[must_use]
pub fn resolve_time(time: f32, duration: f32, mode: LoopMode) -> f32 {
    if duration <= 0.0 || !time.is_finite() {
        return 0.0;
    }

    match mode {
        LoopMode::Once => time.clamp(0.0, duration),
        LoopMode::Loop => {
            if (0.0..=duration).contains(&time) {
                time
            } else {
                time.rem_euclid(duration)
            }
        }
        LoopMode::PingPong => {
            let period = duration * 2.0;
            let phase = time.rem_euclid(period);
            if phase > duration { period - phase } else { phase }
        }
    }
}

/// Playback handle for one clip.
///
/// The action never advances on its own: its owner pushes an absolute time
/// through [`AnimationAction::set_time`] and the mixer samples the clip at
/// that time when it is applied to the scene.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    pub(crate) clip: Arc<AnimationClip>,

    pub(crate) time: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub enabled: bool,

    pub(crate) bindings: Vec<PropertyBinding>,
    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            loop_mode: LoopMode::Once,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Local clip time in seconds, already resolved by the loop mode.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = resolve_time(time, self.clip.duration, self.loop_mode);
    }

    #[must_use]
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: Vec<PropertyBinding>) {
        self.bindings = bindings;
    }

    /// Whether the mixer should write this action's values this frame.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.weight > 0.0
    }
}
