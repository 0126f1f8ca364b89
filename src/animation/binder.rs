use rustc_hash::FxHashMap;

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a node under `root` by name.
    ///
    /// When several nodes share a name the first one in depth-first order wins.
    /// Tracks whose node cannot be found are left unbound.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut by_name: FxHashMap<&str, NodeHandle> = FxHashMap::default();
        scene.traverse(root, |handle, node| {
            by_name.entry(node.name.as_str()).or_insert(handle);
        });

        let mut bindings = Vec::with_capacity(clip.tracks.len());
        for (track_index, track) in clip.tracks.iter().enumerate() {
            match by_name.get(track.meta.node_name.as_str()) {
                Some(&node) => bindings.push(PropertyBinding {
                    track_index,
                    node,
                    target: track.meta.target,
                }),
                None => log::debug!(
                    "Clip '{}': no node named '{}' for track {track_index}",
                    clip.display_name(),
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}
