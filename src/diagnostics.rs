//! Optional load diagnostics.
//!
//! The stage only walks the model for reporting when a [`DiagnosticHook`] is
//! installed; the load path itself never traverses for logging.

use glam::Vec3;

use crate::animation::AnimationClip;
use crate::errors::StageError;
use crate::framing::FramingReport;
use crate::scene::{Node, NodeHandle, NodeKind, Scene};

/// Receives a report of each loaded model. Every method defaults to a no-op.
pub trait DiagnosticHook: Send {
    fn on_model_loaded(&mut self, _name: &str, _clip_count: usize) {}

    fn on_clip(&mut self, _index: usize, _clip: &AnimationClip) {}

    fn on_scene_object(&mut self, _node: &Node) {}

    fn on_framing(&mut self, _report: &FramingReport) {}

    fn on_missing_animations(&mut self, _name: &str) {}

    fn on_load_failed(&mut self, _error: &StageError) {}
}

/// Walks `root` and reports the model to `hook`.
pub fn report_model(
    hook: &mut dyn DiagnosticHook,
    scene: &Scene,
    root: NodeHandle,
    name: &str,
    clips: &[std::sync::Arc<AnimationClip>],
) {
    hook.on_model_loaded(name, clips.len());
    if clips.is_empty() {
        hook.on_missing_animations(name);
    }
    for (index, clip) in clips.iter().enumerate() {
        hook.on_clip(index, clip);
    }
    scene.traverse(root, |_, node| hook.on_scene_object(node));
}

/// Writes every report through the `log` facade.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl DiagnosticHook for LogDiagnostics {
    fn on_model_loaded(&mut self, name: &str, clip_count: usize) {
        log::info!("Model '{name}' loaded with {clip_count} animation(s)");
    }

    fn on_clip(&mut self, index: usize, clip: &AnimationClip) {
        log::info!(
            "Animation {index}: {}, duration {:.3}s, {} track(s)",
            clip.display_name(),
            clip.duration,
            clip.tracks.len()
        );
    }

    fn on_scene_object(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Mesh { .. } | NodeKind::Camera(_) | NodeKind::Light(_) => {
                log::debug!("{}: {}", node.kind.label(), node.name);
            }
            kind if !node.name.is_empty() => {
                log::debug!("Other object: {}, type: {}", node.name, kind.label());
            }
            _ => {}
        }
    }

    fn on_framing(&mut self, report: &FramingReport) {
        log::info!("Model size: {:?}, center: {:?}", report.size, report.center);
        if let Some(scale) = report.applied_scale {
            log::info!("Adjusted model scale: {scale}");
        }
    }

    fn on_missing_animations(&mut self, name: &str) {
        log::warn!("No animations found in model '{name}'");
    }

    fn on_load_failed(&mut self, error: &StageError) {
        log::warn!("Model failed to load: {error}");
    }
}

/// Counts what a model contains. Useful for tests and headless reports.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneInventory {
    pub meshes: usize,
    pub cameras: usize,
    pub lights: usize,
    /// Named nodes of any other kind.
    pub others: usize,
    pub clips: usize,
    pub longest_clip: f32,
    pub missing_animations: bool,
    pub load_failures: usize,
    pub size: Option<Vec3>,
    pub applied_scale: Option<f32>,
}

impl DiagnosticHook for SceneInventory {
    fn on_model_loaded(&mut self, _name: &str, clip_count: usize) {
        self.clips = clip_count;
    }

    fn on_clip(&mut self, _index: usize, clip: &AnimationClip) {
        self.longest_clip = self.longest_clip.max(clip.duration);
    }

    fn on_scene_object(&mut self, node: &Node) {
        match node.kind {
            NodeKind::Mesh { .. } => self.meshes += 1,
            NodeKind::Camera(_) => self.cameras += 1,
            NodeKind::Light(_) => self.lights += 1,
            _ if !node.name.is_empty() => self.others += 1,
            _ => {}
        }
    }

    fn on_framing(&mut self, report: &FramingReport) {
        self.size = Some(report.size);
        self.applied_scale = report.applied_scale;
    }

    fn on_missing_animations(&mut self, _name: &str) {
        self.missing_animations = true;
    }

    fn on_load_failed(&mut self, _error: &StageError) {
        self.load_failures += 1;
    }
}
