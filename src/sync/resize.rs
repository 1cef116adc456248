//! Collects size observations and republishes them as [`ViewportMetrics`].
//!
//! Viewport size and content size arrive from different observers; the
//! bridge combines them and marks itself dirty until the next frame takes
//! the result.

use serde::Serialize;

use crate::types::{same_offset, ViewportMetrics};

/// Which axes currently scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrollActivity {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeBridge {
    viewport: Option<(f64, f64)>,
    content: Option<(f64, f64)>,
    scrollbar_width: f64,
    dirty: bool,
}

fn size(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn replace(slot: &mut Option<(f64, f64)>, next: (f64, f64)) -> bool {
    let changed = match *slot {
        Some((w, h)) => !same_offset(w, next.0) || !same_offset(h, next.1),
        None => true,
    };
    if changed {
        *slot = Some(next);
    }
    changed
}

impl ResizeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client size of the scroll owner changed.
    pub fn observe_viewport(&mut self, client_width: f64, client_height: f64) -> bool {
        let changed = replace(&mut self.viewport, (size(client_width), size(client_height)));
        self.dirty |= changed;
        changed
    }

    /// Scroll size of the content changed.
    pub fn observe_content(&mut self, scroll_width: f64, scroll_height: f64) -> bool {
        let changed = replace(&mut self.content, (size(scroll_width), size(scroll_height)));
        self.dirty |= changed;
        changed
    }

    /// Record the vertical scrollbar gutter of the body
    /// (`offsetWidth - clientWidth`).
    pub fn observe_scrollbar(&mut self, offset_width: f64, client_width: f64) -> bool {
        let gutter = size(offset_width - client_width);
        if same_offset(gutter, self.scrollbar_width) {
            return false;
        }
        self.scrollbar_width = gutter;
        self.dirty = true;
        true
    }

    pub fn scrollbar_width(&self) -> f64 {
        self.scrollbar_width
    }

    /// Combined metrics, once the viewport size is known.
    ///
    /// Content smaller than the viewport reports the viewport size, as the
    /// DOM does for `scrollWidth`/`scrollHeight`.
    pub fn metrics(&self) -> Option<ViewportMetrics> {
        let (client_width, client_height) = self.viewport?;
        let (content_width, content_height) = self.content.unwrap_or((0.0, 0.0));
        Some(ViewportMetrics::new(
            client_width,
            client_height,
            content_width.max(client_width),
            content_height.max(client_height),
        ))
    }

    pub fn activity(&self) -> ScrollActivity {
        self.metrics().map_or_else(ScrollActivity::default, |m| ScrollActivity {
            horizontal: m.horizontal_active(),
            vertical: m.vertical_active(),
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Metrics to publish this frame, if anything changed since the last one.
    pub fn take_dirty(&mut self) -> Option<ViewportMetrics> {
        if !self.dirty {
            return None;
        }
        let metrics = self.metrics()?;
        self.dirty = false;
        Some(metrics)
    }
}
