//! Scroll Triggers
//!
//! Turns page scroll offsets into normalized progress values:
//!
//! - [`ScrollRegion`]: a block of the page in document pixels
//! - [`TriggerEdge`]: `"<element> <viewport>"` boundary such as `"top top"`
//! - [`ScrollBounds`]: the scroll offsets where progress is 0 and 1
//! - [`ScrollTriggers`]: registry that calls listeners on progress changes
//!
//! ```rust,ignore
//! use scrollstage::scroll::{ScrollRegion, ScrollTriggers, TriggerConfig};
//!
//! let mut triggers = ScrollTriggers::new(800.0);
//! let region = triggers.mount_region(ScrollRegion::new("page", 0.0, 3200.0));
//! let listener = triggers.create(region, TriggerConfig::default(), Box::new(|update| {
//!     log::info!("progress {:.2}", update.progress);
//! }))?;
//! triggers.set_scroll(1200.0); // progress 0.5
//! triggers.kill(listener);
//! ```

pub mod region;
pub mod trigger;

pub use region::{EdgeOffset, ScrollBounds, ScrollRegion, TriggerEdge};
pub use trigger::{
    ListenerHandle, ProgressCallback, RegionKey, ScrollDirection, ScrollTriggers, ScrollUpdate,
    TriggerConfig,
};
