//! Wheel input over panes that do not scroll natively.
//!
//! The fixed header and footer hide their overflow, so the platform never
//! scrolls them. Their wheel deltas are turned into scroll writes here.

use serde::{Deserialize, Serialize};

use super::synchronizer::{ScrollOrigin, ViewportSynchronizer};
use crate::types::{PaneId, ScrollPosition, ViewportMetrics, WheelPolicy};

/// Pixels per line for line-mode wheel deltas.
pub const WHEEL_LINE_HEIGHT: f64 = 16.0;

/// Unit of a wheel delta (`WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl WheelDeltaMode {
    /// Map the DOM `deltaMode` constant.
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => WheelDeltaMode::Line,
            2 => WheelDeltaMode::Page,
            _ => WheelDeltaMode::Pixel,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    #[serde(default)]
    pub mode: WheelDeltaMode,
}

impl WheelInput {
    pub fn pixels(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            mode: WheelDeltaMode::Pixel,
        }
    }
}

/// Whether the caller should suppress the platform default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WheelOutcome {
    /// Something moved; call `preventDefault`
    Consumed,
    /// Nothing moved; let the page scroll
    PassThrough,
}

impl WheelOutcome {
    pub fn is_consumed(self) -> bool {
        self == WheelOutcome::Consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEventAdapter {
    line_height: f64,
}

impl Default for WheelEventAdapter {
    fn default() -> Self {
        Self {
            line_height: WHEEL_LINE_HEIGHT,
        }
    }
}

impl WheelEventAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        if line_height.is_finite() && line_height > 0.0 {
            self.line_height = line_height;
        }
        self
    }

    /// Convert deltas to pixels.
    pub fn to_pixels(&self, input: WheelInput, metrics: Option<&ViewportMetrics>) -> (f64, f64) {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let (dx, dy) = (finite(input.delta_x), finite(input.delta_y));
        match input.mode {
            WheelDeltaMode::Pixel => (dx, dy),
            WheelDeltaMode::Line => (dx * self.line_height, dy * self.line_height),
            WheelDeltaMode::Page => match metrics {
                Some(m) => (dx * m.client_width, dy * m.client_height),
                None => (dx * self.line_height, dy * self.line_height),
            },
        }
    }

    /// Apply wheel input received over `pane`.
    pub fn handle(
        &self,
        sync: &mut ViewportSynchronizer,
        pane: PaneId,
        input: WheelInput,
    ) -> WheelOutcome {
        if sync.is_torn_down() {
            return WheelOutcome::PassThrough;
        }
        let Some(role) = sync.role(pane) else {
            return WheelOutcome::PassThrough;
        };
        if role.wheel == WheelPolicy::Native {
            return WheelOutcome::PassThrough;
        }

        let (dx, dy) = self.to_pixels(input, sync.metrics());
        let current = sync.position();
        let mut target = current;
        target.left += dx;
        if role.wheel == WheelPolicy::Both {
            target.top += dy;
        }
        let target: ScrollPosition = target.clamped(sync.bounds());
        if target.same_as(&current) {
            log::trace!("wheel over {pane} at boundary, passing through");
            return WheelOutcome::PassThrough;
        }

        if sync.commit(target, ScrollOrigin::Wheel(pane)) {
            WheelOutcome::Consumed
        } else {
            WheelOutcome::PassThrough
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::sync::pane::MemoryPane;
    use crate::sync::scheduler::ManualScheduler;
    use crate::types::PaneRole;

    fn sync_with_header(metrics: ViewportMetrics) -> (ViewportSynchronizer, MemoryPane) {
        let mut sync = ViewportSynchronizer::new(Box::new(ManualScheduler::new()));
        sync.set_metrics(metrics);
        let header = MemoryPane::new();
        sync.register_pane(
            PaneId::Header,
            Box::new(header.clone()),
            PaneRole::HORIZONTAL_MIRROR,
        );
        sync.register_pane(
            PaneId::Body,
            Box::new(MemoryPane::new()),
            PaneRole::SCROLL_OWNER,
        );
        sync.run_frame();
        (sync, header)
    }

    #[test]
    fn test_line_and_page_modes() {
        let adapter = WheelEventAdapter::new();
        let metrics = ViewportMetrics::new(300.0, 200.0, 900.0, 900.0);
        let line = WheelInput {
            delta_x: 3.0,
            delta_y: -1.0,
            mode: WheelDeltaMode::Line,
        };
        assert_eq!(adapter.to_pixels(line, None), (48.0, -16.0));
        let page = WheelInput {
            delta_x: 1.0,
            delta_y: 0.5,
            mode: WheelDeltaMode::Page,
        };
        assert_eq!(adapter.to_pixels(page, Some(&metrics)), (300.0, 100.0));
    }

    #[test]
    fn test_horizontal_wheel_over_header_is_consumed() {
        let (mut sync, header) = sync_with_header(ViewportMetrics::new(100.0, 100.0, 200.0, 100.0));
        let outcome =
            WheelEventAdapter::new().handle(&mut sync, PaneId::Header, WheelInput::pixels(10.0, 0.0));
        assert_eq!(outcome, WheelOutcome::Consumed);
        sync.run_frame();
        // The header did not move natively, so it is written too
        assert_eq!(header.left_writes(), vec![10.0]);
    }

    #[test]
    fn test_boundary_passes_through() {
        let (mut sync, _) = sync_with_header(ViewportMetrics::new(100.0, 100.0, 200.0, 100.0));
        let adapter = WheelEventAdapter::new();
        assert_eq!(
            adapter.handle(&mut sync, PaneId::Header, WheelInput::pixels(-10.0, 0.0)),
            WheelOutcome::PassThrough
        );
        // Vertical deltas are not forwarded by the header
        assert_eq!(
            adapter.handle(&mut sync, PaneId::Header, WheelInput::pixels(0.0, 50.0)),
            WheelOutcome::PassThrough
        );
    }

    #[test]
    fn test_native_panes_do_not_intercept() {
        let (mut sync, _) = sync_with_header(ViewportMetrics::new(100.0, 100.0, 200.0, 300.0));
        let outcome =
            WheelEventAdapter::new().handle(&mut sync, PaneId::Body, WheelInput::pixels(10.0, 10.0));
        assert_eq!(outcome, WheelOutcome::PassThrough);
        assert_eq!(sync.position(), ScrollPosition::ORIGIN);
    }
}
