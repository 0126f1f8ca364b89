use glam::{Affine3A, Vec3};

use crate::scene::NodeHandle;
use crate::scene::bounds::BoundingBox;
use crate::scene::transform::Transform;

/// Perspective projection parameters. `far = None` means an infinite far plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDesc {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

/// What a node represents to the render host.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    /// Geometry node; `local_bounds` is the union of its primitives' bounds.
    Mesh { local_bounds: Option<BoundingBox> },
    Camera(CameraProjection),
    Light(LightDesc),
    /// Solid box shown while no model is available.
    Placeholder { size: f32, color: Vec3 },
}

impl NodeKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Mesh { .. } => "Mesh",
            NodeKind::Camera(_) => "Camera",
            NodeKind::Light(_) => "Light",
            NodeKind::Placeholder { .. } => "Placeholder",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,
    /// Current morph target weights; empty when the mesh has no targets.
    pub morph_weights: Vec<f32>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    #[must_use]
    pub fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            morph_weights: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    /// Geometry bounds in the node's own space, if it has any geometry.
    #[must_use]
    pub fn local_bounds(&self) -> Option<BoundingBox> {
        match &self.kind {
            NodeKind::Mesh { local_bounds } => *local_bounds,
            NodeKind::Placeholder { size, .. } => Some(BoundingBox::cube(*size)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    #[must_use]
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera(_))
    }

    #[must_use]
    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }
}
