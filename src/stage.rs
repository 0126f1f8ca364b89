//! Stage
//!
//! Composes the scene, the scroll triggers and the synchronizer into the
//! scroll-animated model view:
//!
//! 1. [`Stage::new`] sets up camera, lights and a placeholder box.
//! 2. [`Stage::install_scroll_triggers`] registers the scroll source.
//! 3. [`Stage::mount_page`] or [`Stage::mount_region`] mounts the scroll track.
//! 4. [`Stage::mount_model`] adds the loaded model, frames it and attaches
//!    the scroll listener.
//! 5. The host feeds [`Stage::scroll_to`] / [`Stage::resize`] and calls
//!    [`Stage::tick`] once per frame.
//! 6. [`Stage::unmount`] releases the listener and the model and shows the
//!    placeholder again.

use glam::Vec3;

use crate::assets::ModelAsset;
use crate::config::StageConfig;
use crate::diagnostics::{self, DiagnosticHook, LogDiagnostics};
use crate::errors::{Result, StageError};
use crate::framing::frame_model;
use crate::scene::{CameraProjection, LightDesc, LightKind, Node, NodeHandle, NodeKind, Scene, SceneHost};
use crate::scroll::{ListenerHandle, RegionKey, ScrollRegion, ScrollTriggers};
use crate::sync::{ScrollSync, SharedSync};
use crate::time::{FrameState, FrameTimer};

/// How far [`Stage::mount_model`] got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// Model shown and driven by scroll.
    Animated,
    /// Model shown without animations to drive.
    Static,
    /// Loading failed; the placeholder is shown.
    Placeholder,
    /// Model shown with animations, but no scroll region to listen to yet.
    /// See [`Stage::retry_attach`].
    Detached,
}

pub struct Stage {
    config: StageConfig,
    scene: Scene,
    triggers: Option<ScrollTriggers>,
    sync: SharedSync,

    camera: NodeHandle,
    ambient_light: NodeHandle,
    directional_light: NodeHandle,
    placeholder: Option<NodeHandle>,

    region: Option<RegionKey>,
    /// Region was built from the page layout and follows viewport resizes.
    page_sized: bool,
    model_name: Option<String>,

    diagnostics: Option<Box<dyn DiagnosticHook>>,
    timer: FrameTimer,
}

impl Stage {
    pub fn new(config: StageConfig) -> Result<Self> {
        config.validate()?;

        let mut scene = Scene::new();

        let cam = &config.camera;
        let mut camera_node = Node::with_kind(
            "camera",
            NodeKind::Camera(CameraProjection {
                fov_y_degrees: cam.fov_y_degrees,
                near: cam.near,
                far: Some(cam.far),
            }),
        )
        .with_position(Vec3::from_array(cam.position));
        camera_node.transform.look_at(Vec3::from_array(cam.target), Vec3::Y);
        let camera = scene.add_node(camera_node);

        let light = &config.lighting;
        let ambient_light = scene.add_node(Node::with_kind(
            "ambient_light",
            NodeKind::Light(LightDesc {
                kind: LightKind::Ambient,
                color: Vec3::from_array(light.ambient_color),
                intensity: light.ambient_intensity,
            }),
        ));

        let mut sun = Node::with_kind(
            "directional_light",
            NodeKind::Light(LightDesc {
                kind: LightKind::Directional,
                color: Vec3::from_array(light.directional_color),
                intensity: light.directional_intensity,
            }),
        )
        .with_position(Vec3::from_array(light.directional_position));
        sun.transform.look_at(Vec3::ZERO, Vec3::Y);
        let directional_light = scene.add_node(sun);

        let placeholder = scene.add_node(placeholder_node(&config));

        let diagnostics: Option<Box<dyn DiagnosticHook>> = if config.diagnostics {
            Some(Box::new(LogDiagnostics))
        } else {
            None
        };

        Ok(Self {
            config,
            scene,
            triggers: None,
            sync: ScrollSync::empty().into_shared(),
            camera,
            ambient_light,
            directional_light,
            placeholder: Some(placeholder),
            region: None,
            page_sized: false,
            model_name: None,
            diagnostics,
            timer: FrameTimer::new(),
        })
    }

    /// Replaces the diagnostics hook. `None` disables load reports.
    pub fn set_diagnostics(&mut self, hook: Option<Box<dyn DiagnosticHook>>) {
        self.diagnostics = hook;
    }

    // ========================================================================
    // Scroll source
    // ========================================================================

    /// Registers the scroll-trigger system. Call once when a viewport exists;
    /// later calls are ignored. Without a viewport (`None`) nothing is
    /// installed and `false` is returned.
    pub fn install_scroll_triggers(&mut self, viewport_height: Option<f32>) -> bool {
        if self.triggers.is_some() {
            return true;
        }
        let Some(height) = viewport_height.filter(|h| h.is_finite()) else {
            log::debug!("No viewport, scroll triggers not installed");
            return false;
        };
        self.triggers = Some(ScrollTriggers::new(height));
        log::debug!("Scroll triggers installed (viewport {height}px)");
        true
    }

    /// Mounts `region` as the scroll track, replacing the geometry of a
    /// previously mounted one.
    pub fn mount_region(&mut self, region: ScrollRegion) -> Result<RegionKey> {
        let Some(triggers) = self.triggers.as_mut() else {
            return Err(StageError::Attach { region: region.label });
        };
        self.page_sized = false;

        if let Some(key) = self.region {
            if triggers.update_region(key, region.clone()) {
                return Ok(key);
            }
        }
        let key = triggers.mount_region(region);
        self.region = Some(key);
        Ok(key)
    }

    /// The page's scroll track: one full-viewport section per
    /// `page.sections`, starting at the top of the document.
    #[must_use]
    pub fn page_region(&self, viewport_height: f32) -> ScrollRegion {
        ScrollRegion::new(
            "scroll-content",
            0.0,
            self.config.page.sections as f32 * viewport_height,
        )
    }

    /// Mounts [`Stage::page_region`] for the current viewport. The region is
    /// re-laid out on every [`Stage::resize`].
    pub fn mount_page(&mut self) -> Result<RegionKey> {
        let height = self.triggers.as_ref().map_or(0.0, ScrollTriggers::viewport_height);
        let page = self.page_region(height);
        let key = self.mount_region(page)?;
        self.page_sized = true;
        Ok(key)
    }

    // ========================================================================
    // Model
    // ========================================================================

    /// Shows the outcome of a model load.
    ///
    /// A failed load drops any previous model and shows the placeholder. A
    /// model without clips is shown statically. Otherwise the clips are bound to the model and
    /// driven by `region` (or the mounted region when `None`).
    pub fn mount_model(&mut self, asset: Result<ModelAsset>, region: Option<RegionKey>) -> MountOutcome {
        let asset = match asset {
            Ok(asset) => asset,
            Err(err) => {
                log::warn!("Model unavailable, showing placeholder: {err}");
                if let Some(hook) = self.diagnostics.as_deref_mut() {
                    hook.on_load_failed(&err);
                }
                self.unmount();
                return MountOutcome::Placeholder;
            }
        };

        self.release_model();

        let root = asset.root;
        self.scene.add_object(root);
        if let Some(placeholder) = self.placeholder.take() {
            self.scene.remove_object(placeholder);
        }

        let report = frame_model(&mut self.scene, root, &self.config.framing);
        if let Some(hook) = self.diagnostics.as_deref_mut() {
            diagnostics::report_model(hook, &self.scene, root, &asset.name, &asset.clips);
            hook.on_framing(&report);
        }
        self.model_name = Some(asset.name.clone());

        let state = match ScrollSync::initialize(&asset.clips, self.config.model.short_clip_policy) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("'{}' is shown without scroll playback: {err}", asset.name);
                let mut state = ScrollSync::empty();
                state.bind(&self.scene, root);
                *self.sync.lock() = state;
                return MountOutcome::Static;
            }
        };

        {
            let mut sync = self.sync.lock();
            *sync = state;
            let bound = sync.bind(&self.scene, root);
            log::debug!("Bound {bound} track(s) of '{}'", asset.name);
        }

        if let Some(region) = region {
            self.region = Some(region);
        }
        match self.retry_attach() {
            Ok(_) => MountOutcome::Animated,
            Err(err) => {
                log::warn!("Scroll listener not attached: {err}");
                MountOutcome::Detached
            }
        }
    }

    /// Attaches the scroll listener for the current model, e.g. after
    /// [`MountOutcome::Detached`] once a region has been mounted.
    pub fn retry_attach(&mut self) -> Result<ListenerHandle> {
        if self.sync.lock().handle_count() == 0 {
            return Err(StageError::NoAnimations);
        }
        let (Some(triggers), Some(region)) = (self.triggers.as_mut(), self.region) else {
            return Err(StageError::Attach {
                region: "scroll-content".into(),
            });
        };
        ScrollSync::attach(&self.sync, triggers, region, self.config.trigger)
    }

    /// Releases the listener, removes the model and puts the placeholder
    /// back. Safe to call repeatedly.
    pub fn unmount(&mut self) -> bool {
        let released = self.release_model();
        self.show_placeholder();
        released
    }

    fn release_model(&mut self) -> bool {
        let released = self
            .sync
            .lock()
            .teardown(self.triggers.as_mut(), &mut self.scene);
        if let Some(name) = self.model_name.take() {
            log::debug!("Unmounted '{name}'");
        }
        released
    }

    fn show_placeholder(&mut self) {
        if self.placeholder.is_none() {
            self.placeholder = Some(self.scene.add_node(placeholder_node(&self.config)));
        }
    }

    // ========================================================================
    // Host input
    // ========================================================================

    pub fn scroll_to(&mut self, scroll_y: f32) {
        if let Some(triggers) = self.triggers.as_mut() {
            triggers.set_scroll(scroll_y);
        }
    }

    pub fn resize(&mut self, viewport_height: f32) {
        if !viewport_height.is_finite() {
            return;
        }
        let relayout = match (self.page_sized, self.region) {
            (true, Some(key)) => Some((key, self.page_region(viewport_height))),
            _ => None,
        };
        if let Some(triggers) = self.triggers.as_mut() {
            triggers.resize(viewport_height, relayout);
        }
    }

    /// Frame tick: writes the animation for the current scroll position
    /// into the scene and refreshes world matrices.
    pub fn tick(&mut self) -> FrameState {
        let dt = self.timer.tick();
        let (animated, progress, shared_time) = {
            let mut sync = self.sync.lock();
            let animated = sync.apply(&mut self.scene);
            (animated, sync.progress(), sync.shared_time())
        };
        self.scene.update_world_matrices();

        FrameState {
            frame: self.timer.frame_count(),
            dt,
            progress,
            shared_time,
            animated,
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn triggers(&self) -> Option<&ScrollTriggers> {
        self.triggers.as_ref()
    }

    #[must_use]
    pub fn sync(&self) -> &SharedSync {
        &self.sync
    }

    #[must_use]
    pub fn region(&self) -> Option<RegionKey> {
        self.region
    }

    #[must_use]
    pub fn model_root(&self) -> Option<NodeHandle> {
        self.sync.lock().model_root()
    }

    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Whether the model's scroll listener is registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.triggers
            .as_ref()
            .is_some_and(|triggers| self.sync.lock().is_attached(triggers))
    }

    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    #[must_use]
    pub fn camera(&self) -> NodeHandle {
        self.camera
    }

    /// Ambient and directional light nodes.
    #[must_use]
    pub fn lights(&self) -> [NodeHandle; 2] {
        [self.ambient_light, self.directional_light]
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.sync.lock().progress()
    }

    #[must_use]
    pub fn shared_time(&self) -> f32 {
        self.sync.lock().shared_time()
    }
}

fn placeholder_node(config: &StageConfig) -> Node {
    Node::with_kind(
        "placeholder",
        NodeKind::Placeholder {
            size: config.page.placeholder_size,
            color: Vec3::from_array(config.page.placeholder_color),
        },
    )
}
