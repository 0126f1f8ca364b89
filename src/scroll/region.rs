use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StageError;

/// A scrollable block of the page, in document pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRegion {
    pub label: String,
    /// Distance from the top of the document to the top of the region.
    pub top: f32,
    pub height: f32,
}

impl ScrollRegion {
    #[must_use]
    pub fn new(label: impl Into<String>, top: f32, height: f32) -> Self {
        Self {
            label: label.into(),
            top,
            height: height.max(0.0),
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Position along an element or the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeOffset {
    Top,
    Center,
    Bottom,
    /// Pixels from the top.
    Pixels(f32),
    /// Percentage of the extent, from the top.
    Percent(f32),
}

impl EdgeOffset {
    /// Distance from the top for an element or viewport of `extent` pixels.
    #[must_use]
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            EdgeOffset::Top => 0.0,
            EdgeOffset::Center => extent * 0.5,
            EdgeOffset::Bottom => extent,
            EdgeOffset::Pixels(px) => px,
            EdgeOffset::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl FromStr for EdgeOffset {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |num: &str| {
            num.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| StageError::Config(format!("invalid edge offset '{s}'")))
        };

        match s {
            "top" => Ok(EdgeOffset::Top),
            "center" => Ok(EdgeOffset::Center),
            "bottom" => Ok(EdgeOffset::Bottom),
            _ => {
                if let Some(pct) = s.strip_suffix('%') {
                    parse(pct).map(EdgeOffset::Percent)
                } else {
                    parse(s.strip_suffix("px").unwrap_or(s)).map(EdgeOffset::Pixels)
                }
            }
        }
    }
}

impl fmt::Display for EdgeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOffset::Top => f.write_str("top"),
            EdgeOffset::Center => f.write_str("center"),
            EdgeOffset::Bottom => f.write_str("bottom"),
            EdgeOffset::Pixels(px) => write!(f, "{px}px"),
            EdgeOffset::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Where a trigger boundary sits: the scroll offset at which `element`'s edge
/// lines up with `viewport`'s edge. Written as `"<element> <viewport>"`,
/// e.g. `"top top"` or `"bottom 80%"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerEdge {
    pub element: EdgeOffset,
    pub viewport: EdgeOffset,
}

impl TriggerEdge {
    pub const TOP_TOP: Self = Self {
        element: EdgeOffset::Top,
        viewport: EdgeOffset::Top,
    };

    pub const BOTTOM_BOTTOM: Self = Self {
        element: EdgeOffset::Bottom,
        viewport: EdgeOffset::Bottom,
    };

    /// Scroll offset at which this edge is reached.
    #[must_use]
    pub fn scroll_position(&self, region: &ScrollRegion, viewport_height: f32) -> f32 {
        region.top + self.element.resolve(region.height) - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for TriggerEdge {
    type Err = StageError;

    /// A single token pins the element edge to the top of the viewport.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let element = parts
            .next()
            .ok_or_else(|| StageError::Config("empty trigger edge".into()))?
            .parse::<EdgeOffset>()?;
        let viewport = match parts.next() {
            Some(token) => token.parse::<EdgeOffset>()?,
            None => EdgeOffset::Top,
        };
        if parts.next().is_some() {
            return Err(StageError::Config(format!("trigger edge '{s}' has extra tokens")));
        }
        Ok(Self { element, viewport })
    }
}

impl TryFrom<String> for TriggerEdge {
    type Error = StageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerEdge> for String {
    fn from(edge: TriggerEdge) -> Self {
        edge.to_string()
    }
}

impl fmt::Display for TriggerEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// Scroll offsets where progress is 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBounds {
    pub start: f32,
    pub end: f32,
}

impl ScrollBounds {
    #[must_use]
    pub fn compute(
        region: &ScrollRegion,
        start: &TriggerEdge,
        end: &TriggerEdge,
        viewport_height: f32,
    ) -> Self {
        Self {
            start: start.scroll_position(region, viewport_height),
            end: end.scroll_position(region, viewport_height),
        }
    }

    /// Normalized position of `scroll_y` between the bounds, in `[0, 1]`.
    ///
    /// A collapsed or inverted range acts as a step at `end`.
    #[must_use]
    pub fn progress(&self, scroll_y: f32) -> f32 {
        let span = self.end - self.start;
        if span <= f32::EPSILON {
            return if scroll_y >= self.end { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / span).clamp(0.0, 1.0)
    }
}
