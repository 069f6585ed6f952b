//! ============================================================================
//! Viewport Tracker - "More content above/below" hints for scrollable lists
//! ============================================================================
//! Pull model: the presentation layer feeds measurements through the setters
//! and re-reads `can_scroll_up` / `can_scroll_down` after each update.
//! One tracker per scrollable list.
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Hysteresis so sub-pixel jitter at an edge doesn't flicker the hints
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 2.0;

/// Which scroll hints to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Affordances {
    pub up: bool,
    pub down: bool,
}

/// Measurements of one scrollable region
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportTracker {
    container_height: f64,
    content_height: f64,
    scroll_offset: f64,
    threshold: f64,
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_SCROLL_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            container_height: 0.0,
            content_height: 0.0,
            scroll_offset: 0.0,
            threshold: non_negative(threshold),
        }
    }

    pub fn set_container_height(&mut self, height: f64) {
        self.container_height = non_negative(height);
    }

    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = non_negative(height);
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = non_negative(offset);
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn can_scroll_up(&self) -> bool {
        self.scroll_offset > self.threshold
    }

    pub fn can_scroll_down(&self) -> bool {
        self.content_height - self.scroll_offset - self.container_height > self.threshold
    }

    pub fn affordances(&self) -> Affordances {
        Affordances {
            up: self.can_scroll_up(),
            down: self.can_scroll_down(),
        }
    }

    /// Content extent hidden below the visible region
    pub fn remaining_below(&self) -> f64 {
        (self.content_height - self.scroll_offset - self.container_height).max(0.0)
    }

    /// Largest offset at which the content still fills the container
    pub fn max_offset(&self) -> f64 {
        (self.content_height - self.container_height).max(0.0)
    }

    /// Move the offset by `delta`, staying within the scrollable range
    pub fn scroll_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_offset());
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
