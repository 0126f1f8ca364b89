use crate::animation::action::AnimationAction;
use crate::animation::binding::TargetPath;
use crate::animation::clip::TrackData;
use crate::animation::values::MAX_MORPH_TARGETS;
use crate::scene::Scene;

/// Owns the actions of one model and writes their sampled values into the scene.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    time: f32,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: AnimationAction) {
        self.actions.push(action);
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut [AnimationAction] {
        &mut self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.time = 0.0;
    }

    /// Absolute time last pushed through [`AnimationMixer::set_time`].
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Moves every enabled action to `time`. Each action resolves the value
    /// against its own clip length and loop mode.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
        for action in &mut self.actions {
            if action.enabled {
                action.set_time(time);
            }
        }
    }

    /// Samples every active action at its current time and writes the result
    /// to the bound nodes. Returns the number of properties written.
    pub fn apply(&mut self, scene: &mut Scene) -> usize {
        let mut written = 0;

        for action in &mut self.actions {
            if !action.is_active() {
                continue;
            }
            let time = action.time;
            let clip = &action.clip;

            for binding in &action.bindings {
                let Some(track) = clip.tracks.get(binding.track_index) else {
                    continue;
                };
                let Some(cursor) = action.track_cursors.get_mut(binding.track_index) else {
                    continue;
                };
                let Some(node) = scene.get_node_mut(binding.node) else {
                    continue;
                };

                match (&track.data, binding.target) {
                    (TrackData::Vector3(t), TargetPath::Translation) => {
                        let Some(v) = t.sample_with_cursor(time, cursor) else { continue };
                        node.transform.position = v;
                    }
                    (TrackData::Vector3(t), TargetPath::Scale) => {
                        let Some(v) = t.sample_with_cursor(time, cursor) else { continue };
                        node.transform.scale = v;
                    }
                    (TrackData::Quaternion(t), TargetPath::Rotation) => {
                        let Some(q) = t.sample_with_cursor(time, cursor) else { continue };
                        node.transform.rotation = q;
                    }
                    (TrackData::MorphWeights(t), TargetPath::Weights) => {
                        let Some(w) = t.sample_with_cursor(time, cursor) else { continue };
                        let count = node.morph_weights.len().min(MAX_MORPH_TARGETS);
                        node.morph_weights[..count].copy_from_slice(&w.weights[..count]);
                    }
                    (TrackData::Scalar(t), TargetPath::Weights) => {
                        let Some(w) = t.sample_with_cursor(time, cursor) else { continue };
                        if let Some(first) = node.morph_weights.first_mut() {
                            *first = w;
                        }
                    }
                    _ => continue,
                }

                written += 1;
            }
        }

        written
    }
}
