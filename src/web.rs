#![cfg(all(target_arch = "wasm32", feature = "web"))]

//! Browser binding.
//!
//! ```js
//! const stage = await WebStage.start("building-animation", "/models/building.gltf");
//! function frame() { stage.tick(); requestAnimationFrame(frame); }
//! requestAnimationFrame(frame);
//! // on page teardown
//! stage.dispose();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

use crate::assets::{GltfLoader, io};
use crate::config::StageConfig;
use crate::errors::StageError;
use crate::scroll::ScrollRegion;
use crate::stage::Stage;

type EventClosure = Closure<dyn FnMut(web_sys::Event)>;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn viewport_height(window: &Window) -> f32 {
    window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32
}

fn scroll_offset(window: &Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

/// Container bounds in document coordinates.
fn container_region(window: &Window, element: &Element) -> ScrollRegion {
    let rect = element.get_bounding_client_rect();
    ScrollRegion::new(
        element.id(),
        rect.top() as f32 + scroll_offset(window),
        rect.height() as f32,
    )
}

#[wasm_bindgen]
pub struct WebStage {
    stage: Rc<RefCell<Stage>>,
    window: Window,
    listeners: Vec<(&'static str, EventClosure)>,
}

#[wasm_bindgen]
impl WebStage {
    /// Mounts the element `container_id` as the scroll track, loads
    /// `model_url` and starts following window scroll and resize.
    pub async fn start(container_id: String, model_url: String) -> Result<WebStage, JsValue> {
        console_error_panic_hook::set_once();
        // A second stage on the page finds the logger already installed.
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or_else(|| js_error("window not available"))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("document not available"))?;
        let container = document
            .get_element_by_id(&container_id)
            .ok_or_else(|| js_error(format!("element '{container_id}' not found")))?;

        let mut config = StageConfig::default();
        config.model.path.clone_from(&model_url);
        let mut stage = Stage::new(config).map_err(js_error)?;

        stage.install_scroll_triggers(Some(viewport_height(&window)));
        let region = stage
            .mount_region(container_region(&window, &container))
            .map_err(js_error)?;
        stage.scroll_to(scroll_offset(&window));

        let name = io::source_filename(&model_url).to_string();
        let asset = match io::fetch_bytes(&model_url).await {
            Ok(bytes) => GltfLoader::load_named_slice(&name, &bytes, stage.scene_mut()),
            Err(err) => Err(StageError::asset_load(&model_url, err)),
        };
        let outcome = stage.mount_model(asset, Some(region));
        log::info!("Stage started: {outcome:?}");

        let mut web_stage = WebStage {
            stage: Rc::new(RefCell::new(stage)),
            window,
            listeners: Vec::new(),
        };

        let stage = Rc::clone(&web_stage.stage);
        let window = web_stage.window.clone();
        web_stage.listen(
            "scroll",
            Closure::new(move |_: web_sys::Event| {
                stage.borrow_mut().scroll_to(scroll_offset(&window));
            }),
        )?;

        let stage = Rc::clone(&web_stage.stage);
        let window = web_stage.window.clone();
        web_stage.listen(
            "resize",
            Closure::new(move |_: web_sys::Event| {
                let mut stage = stage.borrow_mut();
                stage.resize(viewport_height(&window));
                if let Err(err) = stage.mount_region(container_region(&window, &container)) {
                    log::warn!("Scroll region not updated: {err}");
                }
            }),
        )?;

        Ok(web_stage)
    }

    fn listen(&mut self, event: &'static str, closure: EventClosure) -> Result<(), JsValue> {
        self.window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((event, closure));
        Ok(())
    }

    /// Per-frame update; call from the page's render loop. Returns whether
    /// the model pose changed.
    pub fn tick(&self) -> bool {
        self.stage.borrow_mut().tick().animated
    }

    pub fn progress(&self) -> f32 {
        self.stage.borrow().progress()
    }

    pub fn shared_time(&self) -> f32 {
        self.stage.borrow().shared_time()
    }

    pub fn shows_placeholder(&self) -> bool {
        self.stage.borrow().shows_placeholder()
    }

    /// Removes the DOM listeners and releases the model.
    pub fn dispose(&mut self) {
        for (event, closure) in self.listeners.drain(..) {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove '{event}' listener: {err:?}");
            }
        }
        self.stage.borrow_mut().unmount();
    }
}
