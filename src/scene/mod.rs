//! Scene Graph
//!
//! Minimal hierarchical scene the model is loaded into:
//! - [`Node`]: named node with a kind, TRS transform and children
//! - [`Transform`]: local position/rotation/scale with cached world matrix
//! - [`Scene`]: node storage, hierarchy edits, traversal and bounds
//! - [`SceneHost`]: the add/remove contract a render host exposes

pub mod bounds;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use bounds::BoundingBox;
pub use node::{CameraProjection, LightDesc, LightKind, Node, NodeKind};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}

/// Object management a render host provides.
///
/// `add_object` makes an existing, parentless node tree visible at top level;
/// `remove_object` drops the tree. Both return whether anything changed, so
/// repeated calls are harmless.
pub trait SceneHost {
    fn add_object(&mut self, root: NodeHandle) -> bool;
    fn remove_object(&mut self, root: NodeHandle) -> bool;
}
