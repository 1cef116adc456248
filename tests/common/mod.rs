//! Common test utilities.
//!
//! Mounts a grid on in-memory panes driven by a manual frame scheduler, so
//! tests can play the host: report native scrolls, wheel input and sizes,
//! then fire frames explicitly.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gridscroll::{
    ColumnDescriptor, FixedSide, GridConfig, GridScroll, ManualScheduler, MemoryPane, PaneId,
    ScrollConfig, ScrollEvent, ScrollHandle, ViewportMetrics,
};

/// Columns used by most scroll tests: one fixed on each side.
pub fn fixed_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("a")
            .with_width(100.0)
            .fixed(FixedSide::Left),
        ColumnDescriptor::new("b"),
        ColumnDescriptor::new("c"),
        ColumnDescriptor::new("d")
            .with_width(100.0)
            .fixed(FixedSide::Right),
    ]
}

pub struct Harness {
    pub grid: GridScroll,
    pub handle: ScrollHandle,
    pub scheduler: ManualScheduler,
    pub panes: BTreeMap<PaneId, MemoryPane>,
    pub events: Rc<RefCell<Vec<ScrollEvent>>>,
}

impl Harness {
    /// Mount and register every pane of the arrangement.
    pub fn mount(columns: Vec<ColumnDescriptor>, scroll: ScrollConfig) -> Self {
        let scheduler = ManualScheduler::new();
        let (grid, handle) =
            GridScroll::mount(GridConfig::new(columns, scroll), Box::new(scheduler.clone()))
                .expect("mount");

        let mut panes = BTreeMap::new();
        for (id, _) in grid.arrangement().panes() {
            let pane = MemoryPane::new();
            grid.register_pane(id, pane.clone());
            panes.insert(id, pane);
        }

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        grid.on_scroll(move |e| sink.borrow_mut().push(*e));

        let harness = Self {
            grid,
            handle,
            scheduler,
            panes,
            events,
        };
        harness.frame();
        harness
    }

    /// Report sizes and apply them.
    pub fn resize(&self, metrics: ViewportMetrics) -> &Self {
        self.grid
            .observe_viewport(metrics.client_width, metrics.client_height);
        self.grid
            .observe_content(metrics.scroll_width, metrics.scroll_height);
        self.frame();
        self
    }

    /// Fire the pending frame, if any.
    pub fn frame(&self) -> Option<ScrollEvent> {
        if self.scheduler.take_pending() {
            self.grid.run_frame()
        } else {
            None
        }
    }

    pub fn pane(&self, id: PaneId) -> &MemoryPane {
        self.panes.get(&id).expect("pane registered")
    }

    /// The user scrolls a pane natively.
    pub fn native_scroll(&self, id: PaneId, left: f64, top: f64) -> bool {
        self.pane(id).scroll_natively(left, top);
        self.grid.on_pane_scroll(id, left, top)
    }

    /// Let the scroll-target lock expire.
    pub fn settle(&self) {
        self.scheduler.advance(gridscroll::sync::SCROLL_LOCK_MS + 1.0);
    }

    pub fn clear_logs(&self) {
        for pane in self.panes.values() {
            pane.clear_log();
        }
        self.events.borrow_mut().clear();
    }

    pub fn events(&self) -> Vec<ScrollEvent> {
        self.events.borrow().clone()
    }
}
