use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::errors::{Result, StageError};
use crate::scroll::region::{ScrollBounds, ScrollRegion, TriggerEdge};

new_key_type! {
    pub struct RegionKey;
    pub struct ListenerHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Progress increased.
    Forward,
    /// Progress decreased.
    Backward,
    /// Initial sync when the listener is created.
    None,
}

/// Delivered to a listener whenever its progress changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub progress: f32,
    pub direction: ScrollDirection,
    pub scroll_y: f32,
}

pub type ProgressCallback = Box<dyn FnMut(&ScrollUpdate) + Send>;

/// Start and end boundaries of a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub start: TriggerEdge,
    pub end: TriggerEdge,
}

impl Default for TriggerConfig {
    /// Progress runs from the region's top at the viewport top to its bottom
    /// at the viewport bottom.
    fn default() -> Self {
        Self {
            start: TriggerEdge::TOP_TOP,
            end: TriggerEdge::BOTTOM_BOTTOM,
        }
    }
}

struct Listener {
    region: RegionKey,
    config: TriggerConfig,
    bounds: ScrollBounds,
    last_progress: f32,
    callback: ProgressCallback,
}

/// Scroll-trigger registry: mounted regions and the progress listeners bound to them.
///
/// The host owns one instance, feeds it scroll offsets and viewport changes,
/// and it calls each listener when that listener's progress moves.
pub struct ScrollTriggers {
    viewport_height: f32,
    scroll_y: f32,
    regions: SlotMap<RegionKey, ScrollRegion>,
    listeners: SlotMap<ListenerHandle, Listener>,
}

impl fmt::Debug for ScrollTriggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollTriggers")
            .field("viewport_height", &self.viewport_height)
            .field("scroll_y", &self.scroll_y)
            .field("regions", &self.regions.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ScrollTriggers {
    #[must_use]
    pub fn new(viewport_height: f32) -> Self {
        Self {
            viewport_height: viewport_height.max(0.0),
            scroll_y: 0.0,
            regions: SlotMap::with_key(),
            listeners: SlotMap::with_key(),
        }
    }

    #[must_use]
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    #[must_use]
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    // ========================================================================
    // Regions
    // ========================================================================

    pub fn mount_region(&mut self, region: ScrollRegion) -> RegionKey {
        self.regions.insert(region)
    }

    #[must_use]
    pub fn region(&self, key: RegionKey) -> Option<&ScrollRegion> {
        self.regions.get(key)
    }

    /// Replaces a region's geometry after layout changes and notifies its listeners.
    pub fn update_region(&mut self, key: RegionKey, region: ScrollRegion) -> bool {
        let Some(slot) = self.regions.get_mut(key) else {
            return false;
        };
        *slot = region;
        self.refresh_bounds();
        self.dispatch();
        true
    }

    /// Drops a region together with every listener bound to it.
    pub fn unmount_region(&mut self, key: RegionKey) -> bool {
        if self.regions.remove(key).is_none() {
            return false;
        }
        let before = self.listeners.len();
        self.listeners.retain(|_, l| l.region != key);
        let killed = before - self.listeners.len();
        if killed > 0 {
            log::debug!("Unmounting region {key:?} killed {killed} listener(s)");
        }
        true
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Registers `callback` against `region`.
    ///
    /// The callback runs once right away with the current progress, then on
    /// every progress change.
    pub fn create(
        &mut self,
        region: RegionKey,
        config: TriggerConfig,
        mut callback: ProgressCallback,
    ) -> Result<ListenerHandle> {
        let Some(mounted) = self.regions.get(region) else {
            return Err(StageError::Attach {
                region: format!("{region:?}"),
            });
        };

        let bounds = ScrollBounds::compute(mounted, &config.start, &config.end, self.viewport_height);
        let progress = bounds.progress(self.scroll_y);
        callback(&ScrollUpdate {
            progress,
            direction: ScrollDirection::None,
            scroll_y: self.scroll_y,
        });

        Ok(self.listeners.insert(Listener {
            region,
            config,
            bounds,
            last_progress: progress,
            callback,
        }))
    }

    /// Unregisters a listener. Returns `false` if it was already gone.
    pub fn kill(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle).is_some()
    }

    pub fn kill_all(&mut self) -> usize {
        let count = self.listeners.len();
        self.listeners.clear();
        count
    }

    #[must_use]
    pub fn is_registered(&self, handle: ListenerHandle) -> bool {
        self.listeners.contains_key(handle)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Last progress delivered to `handle`.
    #[must_use]
    pub fn progress(&self, handle: ListenerHandle) -> Option<f32> {
        self.listeners.get(handle).map(|l| l.last_progress)
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn set_scroll(&mut self, scroll_y: f32) {
        if !scroll_y.is_finite() {
            return;
        }
        self.scroll_y = scroll_y;
        self.dispatch();
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.resize(height, None);
    }

    /// Applies a viewport change together with the region re-layout it
    /// caused. Listeners are notified once, against the final layout.
    pub fn resize(&mut self, viewport_height: f32, relayout: Option<(RegionKey, ScrollRegion)>) {
        if !viewport_height.is_finite() {
            return;
        }
        self.viewport_height = viewport_height.max(0.0);
        if let Some((key, region)) = relayout {
            if let Some(slot) = self.regions.get_mut(key) {
                *slot = region;
            }
        }
        self.refresh_bounds();
        self.dispatch();
    }

    fn refresh_bounds(&mut self) {
        for listener in self.listeners.values_mut() {
            if let Some(region) = self.regions.get(listener.region) {
                listener.bounds = ScrollBounds::compute(
                    region,
                    &listener.config.start,
                    &listener.config.end,
                    self.viewport_height,
                );
            }
        }
    }

    fn dispatch(&mut self) {
        let scroll_y = self.scroll_y;
        for listener in self.listeners.values_mut() {
            let progress = listener.bounds.progress(scroll_y);
            if (progress - listener.last_progress).abs() <= f32::EPSILON {
                continue;
            }
            let direction = if progress > listener.last_progress {
                ScrollDirection::Forward
            } else {
                ScrollDirection::Backward
            };
            listener.last_progress = progress;
            (listener.callback)(&ScrollUpdate {
                progress,
                direction,
                scroll_y,
            });
        }
    }
}
