//! Scroll-to-Animation Synchronizer
//!
//! [`ScrollSync`] turns a normalized scroll progress into one absolute time on
//! a shared timeline and pushes it to every clip of the model:
//!
//! ```text
//! shared_duration = max(clip.duration)
//! t               = clamp(progress, 0, 1) * shared_duration
//! clip time       = resolve(t, clip.duration, policy)
//! ```
//!
//! The state is shared with the scroll listener as [`SharedSync`]. The
//! listener only holds a weak reference, so dropping the state turns a
//! forgotten listener into a no-op instead of keeping the model alive.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
use crate::errors::{Result, StageError};
use crate::scene::{NodeHandle, Scene, SceneHost};
use crate::scroll::{ListenerHandle, RegionKey, ScrollTriggers, ScrollUpdate, TriggerConfig};

/// What a clip shorter than the shared timeline does once `t` passes its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortClipPolicy {
    /// Hold the last frame.
    #[default]
    Clamp,
    /// Wrap back into `[0, duration]`.
    Loop,
}

impl ShortClipPolicy {
    #[must_use]
    pub fn loop_mode(self) -> LoopMode {
        match self {
            ShortClipPolicy::Clamp => LoopMode::Once,
            ShortClipPolicy::Loop => LoopMode::Loop,
        }
    }
}

pub type SharedSync = Arc<Mutex<ScrollSync>>;

#[derive(Debug, Default)]
pub struct ScrollSync {
    mixer: AnimationMixer,
    shared_duration: f32,
    progress: f32,
    listener: Option<ListenerHandle>,
    model_root: Option<NodeHandle>,
    /// Set when the handle times moved since the last [`ScrollSync::apply`].
    dirty: bool,
}

impl ScrollSync {
    /// A state with no playback handles. Progress updates are ignored.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates one playback handle per clip, all at time 0.
    pub fn initialize(clips: &[Arc<AnimationClip>], policy: ShortClipPolicy) -> Result<Self> {
        if clips.is_empty() {
            return Err(StageError::NoAnimations);
        }

        let loop_mode = policy.loop_mode();
        let mut mixer = AnimationMixer::new();
        let mut shared_duration = 0.0_f32;
        for clip in clips {
            shared_duration = shared_duration.max(clip.duration);
            mixer.add_action(AnimationAction::new(Arc::clone(clip)).with_loop_mode(loop_mode));
        }

        log::info!(
            "Scroll sync ready: {} clip(s), shared duration {shared_duration:.3}s ({policy:?})",
            clips.len()
        );

        Ok(Self {
            mixer,
            shared_duration,
            progress: 0.0,
            listener: None,
            model_root: None,
            dirty: true,
        })
    }

    #[must_use]
    pub fn into_shared(self) -> SharedSync {
        Arc::new(Mutex::new(self))
    }

    /// Binds every clip's tracks to nodes under `root` and remembers `root`
    /// as the model to remove on teardown. Returns the number of bound tracks.
    pub fn bind(&mut self, scene: &Scene, root: NodeHandle) -> usize {
        self.model_root = Some(root);
        let mut bound = 0;
        for action in self.mixer.actions_mut() {
            let bindings = Binder::bind(scene, root, action.clip());
            bound += bindings.len();
            action.set_bindings(bindings);
        }
        self.dirty = true;
        bound
    }

    /// Drives every handle to `progress * shared_duration`.
    pub fn on_progress(&mut self, progress: f32) {
        if self.mixer.is_empty() {
            return;
        }

        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let time = progress * self.shared_duration;

        self.dirty |= (progress - self.progress).abs() > f32::EPSILON;
        self.progress = progress;
        self.mixer.set_time(time);
    }

    /// Samples the clips into the scene if the time moved since the last call.
    pub fn apply(&mut self, scene: &mut Scene) -> bool {
        if !self.dirty || self.mixer.is_empty() {
            return false;
        }
        self.dirty = false;
        self.mixer.apply(scene);
        true
    }

    /// Registers `shared` as the progress listener of `region`.
    ///
    /// A previous listener of this state is killed first. The new listener
    /// fires right away, so the handles match the current scroll position
    /// when this returns.
    pub fn attach(
        shared: &SharedSync,
        triggers: &mut ScrollTriggers,
        region: RegionKey,
        config: TriggerConfig,
    ) -> Result<ListenerHandle> {
        if let Some(previous) = shared.lock().listener.take() {
            triggers.kill(previous);
        }

        let weak: Weak<Mutex<ScrollSync>> = Arc::downgrade(shared);
        let handle = triggers.create(
            region,
            config,
            Box::new(move |update: &ScrollUpdate| {
                if let Some(state) = weak.upgrade() {
                    state.lock().on_progress(update.progress);
                }
            }),
        )?;

        shared.lock().listener = Some(handle);
        log::debug!("Scroll listener {handle:?} attached to region {region:?}");
        Ok(handle)
    }

    /// Kills the listener, drops every handle and removes the model from
    /// `host`. Safe to call any number of times; returns whether anything
    /// was released.
    pub fn teardown<H: SceneHost + ?Sized>(
        &mut self,
        triggers: Option<&mut ScrollTriggers>,
        host: &mut H,
    ) -> bool {
        let mut released = false;

        if let Some(listener) = self.listener.take() {
            if let Some(triggers) = triggers {
                released |= triggers.kill(listener);
            }
        }
        if !self.mixer.is_empty() {
            self.mixer.clear();
            released = true;
        }
        if let Some(root) = self.model_root.take() {
            released |= host.remove_object(root);
        }

        self.shared_duration = 0.0;
        self.progress = 0.0;
        self.dirty = false;

        if released {
            log::debug!("Scroll sync torn down");
        }
        released
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[must_use]
    pub fn shared_duration(&self) -> f32 {
        self.shared_duration
    }

    /// Absolute time on the shared timeline.
    #[must_use]
    pub fn shared_time(&self) -> f32 {
        self.mixer.time()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.mixer.len()
    }

    /// Local time of each handle, in clip order.
    #[must_use]
    pub fn applied_times(&self) -> Vec<f32> {
        self.mixer.actions().iter().map(AnimationAction::time).collect()
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn listener(&self) -> Option<ListenerHandle> {
        self.listener
    }

    #[must_use]
    pub fn model_root(&self) -> Option<NodeHandle> {
        self.model_root
    }

    /// Whether this state's listener is still registered with `triggers`.
    /// Unmounting the listener's region detaches it.
    #[must_use]
    pub fn is_attached(&self, triggers: &ScrollTriggers) -> bool {
        self.listener.is_some_and(|handle| triggers.is_registered(handle))
    }
}
