//! The mounted grid: layout, synchronization and imperative control wired
//! together behind one shared state.
//!
//! Hosts forward platform input (native scroll offsets, wheel deltas, size
//! observations) into [`GridScroll`] and call [`GridScroll::run_frame`] when
//! the frame they were asked for fires.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::Result;
use crate::layout::{
    plan_body, plan_styles, BodyContent, ColumnLayoutEngine, LayoutResult, NoRows,
    PaneArrangement, PaneStyles, RowLocator,
};
use crate::sync::{
    apply_request, AxisState, FrameScheduler, ListenerId, PingState, RequestQueue, ResizeBridge,
    ScrollActivity, ScrollEvent, ScrollHandle, ScrollPane, ScrollResolution,
    ViewportSynchronizer, WheelEventAdapter, WheelInput, WheelOutcome,
};
use crate::types::{
    validate_columns, ColumnDescriptor, GridConfig, PaneId, PaneRole, ScrollAxis,
    ScrollPosition, ScrollRequest, ViewportMetrics,
};

/// State shared between the grid, its handle and platform callbacks.
pub(crate) struct GridState {
    config: GridConfig,
    arrangement: PaneArrangement,
    layout_engine: ColumnLayoutEngine,
    layout: LayoutResult,
    sync: ViewportSynchronizer,
    wheel: WheelEventAdapter,
    resize: ResizeBridge,
    rows: Box<dyn RowLocator>,
}

impl std::fmt::Debug for GridState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridState")
            .field("config", &self.config)
            .field("arrangement", &self.arrangement)
            .field("sync", &self.sync)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl GridState {
    pub(crate) fn is_torn_down(&self) -> bool {
        self.sync.is_torn_down()
    }

    pub(crate) fn scroll_to(&mut self, request: &ScrollRequest) -> ScrollResolution {
        let owner = self.arrangement.scroll_owner();
        apply_request(&mut self.sync, owner, self.rows.as_ref(), request)
    }

    fn recompute_layout(&mut self) {
        self.layout =
            self.layout_engine
                .compute(&self.config.columns, &self.config.scroll, self.sync.metrics());
    }

    fn run_frame(&mut self) -> Option<ScrollEvent> {
        self.sync.begin_frame();
        if let Some(metrics) = self.resize.take_dirty() {
            self.sync.set_metrics(metrics);
            self.recompute_layout();
            log::debug!(
                "viewport {}x{} content {}x{}",
                metrics.client_width,
                metrics.client_height,
                metrics.scroll_width,
                metrics.scroll_height
            );
        }
        self.sync.finish_frame()
    }

    fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// A mounted grid.
#[derive(Debug)]
pub struct GridScroll {
    state: Rc<RefCell<GridState>>,
    queue: RequestQueue,
}

impl GridScroll {
    /// Validate the configuration and mount. Returns the grid and its
    /// imperative handle.
    ///
    /// # Errors
    /// Returns an error if the column list is invalid.
    pub fn mount(
        config: GridConfig,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Result<(Self, ScrollHandle)> {
        config.validate()?;
        let arrangement = PaneArrangement::from_config(&config.scroll);
        let layout_engine = ColumnLayoutEngine::new();
        let layout = layout_engine.compute(&config.columns, &config.scroll, None);
        log::debug!(
            "mounting grid: {} column(s), {:?}, owner {}",
            config.columns.len(),
            arrangement,
            arrangement.scroll_owner()
        );

        let state = GridState {
            config,
            arrangement,
            layout_engine,
            layout,
            sync: ViewportSynchronizer::new(scheduler),
            wheel: WheelEventAdapter::new(),
            resize: ResizeBridge::new(),
            rows: Box::new(NoRows),
        };
        let grid = Self {
            state: Rc::new(RefCell::new(state)),
            queue: Rc::new(RefCell::new(VecDeque::new())),
        };
        let handle = grid.handle();
        Ok((grid, handle))
    }

    /// Another handle to this grid.
    pub fn handle(&self) -> ScrollHandle {
        ScrollHandle::new(Rc::downgrade(&self.state), Rc::clone(&self.queue))
    }

    pub fn arrangement(&self) -> PaneArrangement {
        self.state.borrow().arrangement
    }

    pub fn scroll_owner(&self) -> PaneId {
        self.state.borrow().arrangement.scroll_owner()
    }

    /// Register a pane with the default role for its id.
    pub fn register_pane(&self, id: PaneId, pane: impl ScrollPane + 'static) {
        self.register_pane_with_role(id, pane, PaneRole::for_pane(id));
    }

    pub fn register_pane_with_role(
        &self,
        id: PaneId,
        pane: impl ScrollPane + 'static,
        role: PaneRole,
    ) {
        let is_owner = {
            let mut s = self.state.borrow_mut();
            if !s.arrangement.panes().iter().any(|(pane_id, _)| *pane_id == id) {
                log::debug!("pane {id} is not part of the {:?} arrangement", s.arrangement);
            }
            s.sync.register_pane(id, Box::new(pane), role);
            id == s.arrangement.scroll_owner()
        };
        // scroll_to calls made before the owner existed
        if is_owner {
            self.drain_deferred();
        }
    }

    pub fn unregister_pane(&self, id: PaneId) -> bool {
        self.state.borrow_mut().sync.unregister_pane(id)
    }

    /// Native scroll event from a pane. Returns whether it was committed.
    pub fn on_pane_scroll(&self, id: PaneId, left: f64, top: f64) -> bool {
        self.state.borrow_mut().sync.on_pane_scroll(id, left, top)
    }

    /// Wheel event over a pane. The caller suppresses the default when
    /// the outcome is [`WheelOutcome::Consumed`].
    pub fn on_wheel(&self, id: PaneId, input: WheelInput) -> WheelOutcome {
        let mut s = self.state.borrow_mut();
        let GridState { wheel, sync, .. } = &mut *s;
        wheel.handle(sync, id, input)
    }

    pub fn observe_viewport(&self, client_width: f64, client_height: f64) {
        let mut s = self.state.borrow_mut();
        if s.resize.observe_viewport(client_width, client_height) {
            s.sync.request_frame();
        }
    }

    pub fn observe_content(&self, scroll_width: f64, scroll_height: f64) {
        let mut s = self.state.borrow_mut();
        if s.resize.observe_content(scroll_width, scroll_height) {
            s.sync.request_frame();
        }
    }

    pub fn observe_scrollbar(&self, offset_width: f64, client_width: f64) {
        let mut s = self.state.borrow_mut();
        if s.resize.observe_scrollbar(offset_width, client_width) {
            s.sync.request_frame();
        }
    }

    /// Run the frame the scheduler was asked for.
    ///
    /// Applies pending size changes, propagates the latest position to the
    /// panes, notifies listeners and then applies `scroll_to` calls that
    /// arrived while the frame was running.
    pub fn run_frame(&self) -> Option<ScrollEvent> {
        let event = self.state.borrow_mut().run_frame();
        self.drain_deferred();
        event
    }

    /// Retry queued `scroll_to` calls. Requests that defer again stay queued.
    fn drain_deferred(&self) {
        let pending: Vec<ScrollRequest> = self.queue.borrow_mut().drain(..).collect();
        if pending.is_empty() {
            return;
        }
        let handle = self.handle();
        for request in pending {
            let resolution = handle.scroll_to(&request);
            log::trace!("deferred scroll_to {request:?}: {resolution:?}");
        }
    }

    /// Same as [`ScrollHandle::scroll_to`].
    pub fn scroll_to(&self, request: &ScrollRequest) -> ScrollResolution {
        self.handle().scroll_to(request)
    }

    /// Replace the column list.
    ///
    /// # Errors
    /// Returns an error (and keeps the previous columns) if the list is invalid.
    pub fn set_columns(&self, columns: Vec<ColumnDescriptor>) -> Result<()> {
        validate_columns(&columns)?;
        let mut s = self.state.borrow_mut();
        s.layout_engine.retain_columns(&columns);
        s.config.columns = columns;
        s.recompute_layout();
        Ok(())
    }

    /// Width of a column read back from rendered geometry.
    pub fn report_column_width(&self, key: &str, width: f64) -> bool {
        let mut s = self.state.borrow_mut();
        let changed = s.layout_engine.record_width(key, width);
        if changed {
            s.recompute_layout();
        }
        changed
    }

    /// Replace the row locator used by key/index scrolling and the empty check.
    pub fn set_rows(&self, rows: impl RowLocator + 'static) {
        self.state.borrow_mut().rows = Box::new(rows);
    }

    pub fn config(&self) -> GridConfig {
        self.state.borrow().config.clone()
    }

    pub fn layout(&self) -> LayoutResult {
        self.state.borrow().layout.clone()
    }

    pub fn styles(&self) -> PaneStyles {
        let s = self.state.borrow();
        plan_styles(&s.config.scroll, &s.layout, &s.config.columns, s.has_data())
    }

    pub fn body(&self) -> BodyContent {
        let s = self.state.borrow();
        plan_body(
            s.rows.len(),
            s.config.columns.len(),
            &s.config.scroll,
            s.sync.metrics(),
            &s.config.empty_text,
        )
    }

    /// Width of the gutter cell appended to a fixed header so it lines up
    /// with a body showing a vertical scrollbar.
    pub fn header_gutter(&self) -> f64 {
        let s = self.state.borrow();
        if s.arrangement == PaneArrangement::FixedHeader && s.has_data() {
            s.resize.scrollbar_width()
        } else {
            0.0
        }
    }

    pub fn position(&self) -> ScrollPosition {
        self.state.borrow().sync.position()
    }

    pub fn metrics(&self) -> Option<ViewportMetrics> {
        self.state.borrow().sync.metrics().copied()
    }

    pub fn ping(&self) -> PingState {
        self.state.borrow().sync.ping()
    }

    pub fn activity(&self) -> ScrollActivity {
        self.state.borrow().resize.activity()
    }

    pub fn axis_state(&self, axis: ScrollAxis) -> AxisState {
        self.state.borrow().sync.axis_state(axis)
    }

    /// Register an `onScroll` listener.
    ///
    /// Listeners run inside the frame; use a [`ScrollHandle`] rather than the
    /// grid to scroll from one.
    pub fn on_scroll(&self, listener: impl FnMut(&ScrollEvent) + 'static) -> ListenerId {
        self.state.borrow_mut().sync.on_scroll(listener)
    }

    pub fn off_scroll(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().sync.off_scroll(id)
    }

    /// Listen to every committed position change (before propagation).
    pub fn subscribe(&self, listener: impl FnMut(ScrollPosition) + 'static) -> ListenerId {
        self.state.borrow_mut().sync.store_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().sync.store_mut().unsubscribe(id)
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.borrow().is_torn_down()
    }

    /// Release panes and listeners. Later input is ignored and handles
    /// report [`ScrollResolution::Detached`].
    pub fn teardown(&self) {
        self.queue.borrow_mut().clear();
        self.state.borrow_mut().sync.teardown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::layout::MeasuredRows;
    use crate::sync::{ManualScheduler, MemoryPane};
    use crate::types::{FixedSide, ScrollConfig, ScrollX};

    fn mount(scroll: ScrollConfig) -> (GridScroll, ScrollHandle, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let columns = vec![
            ColumnDescriptor::new("name")
                .with_width(100.0)
                .fixed(FixedSide::Left),
            ColumnDescriptor::new("a").with_width(300.0),
            ColumnDescriptor::new("op")
                .with_width(80.0)
                .fixed(FixedSide::Right),
        ];
        let (grid, handle) =
            GridScroll::mount(GridConfig::new(columns, scroll), Box::new(scheduler.clone()))
                .unwrap();
        (grid, handle, scheduler)
    }

    #[test]
    fn test_mount_rejects_duplicate_keys() {
        let config = GridConfig::new(
            vec![ColumnDescriptor::new("a"), ColumnDescriptor::new("a")],
            ScrollConfig::default(),
        );
        assert!(GridScroll::mount(config, Box::new(ManualScheduler::new())).is_err());
    }

    #[test]
    fn test_resize_recomputes_layout_on_frame() {
        let (grid, _, scheduler) = mount(ScrollConfig::new(Some(ScrollX::Auto), None));
        assert!(grid.layout().column("name").unwrap().sticky);

        grid.observe_viewport(1000.0, 300.0);
        grid.observe_content(480.0, 300.0);
        assert!(scheduler.is_pending());
        // Not applied until the frame runs
        assert!(grid.metrics().is_none());
        grid.run_frame();
        assert!(!grid.layout().column("name").unwrap().sticky);
        assert_eq!(grid.metrics().unwrap().scroll_width, 1000.0);
    }

    #[test]
    fn test_report_column_width() {
        let (grid, _, _) = mount(ScrollConfig::new(Some(ScrollX::Auto), None));
        grid.set_columns(vec![
            ColumnDescriptor::new("a").fixed(FixedSide::Left),
            ColumnDescriptor::new("b").fixed(FixedSide::Left),
        ])
        .unwrap();
        assert_eq!(grid.layout().column("b").unwrap().offset, 0.0);
        assert!(grid.report_column_width("a", 64.0));
        assert!(!grid.report_column_width("a", 64.0));
        assert_eq!(grid.layout().column("b").unwrap().offset, 64.0);
    }

    #[test]
    fn test_set_columns_keeps_previous_on_error() {
        let (grid, _, _) = mount(ScrollConfig::default());
        let err = grid.set_columns(vec![ColumnDescriptor::new("x"), ColumnDescriptor::new("x")]);
        assert!(err.is_err());
        assert_eq!(grid.config().columns.len(), 3);
    }

    #[test]
    fn test_deferred_scroll_from_listener() {
        let (grid, handle, _) = mount(ScrollConfig::new(Some(ScrollX::Auto), Some(200.0)));
        let body = MemoryPane::new();
        grid.register_pane(PaneId::Body, body.clone());
        grid.set_rows(MeasuredRows::uniform((0..50).map(|i| i.to_string()), 40.0));
        grid.observe_viewport(200.0, 200.0);
        grid.observe_content(480.0, 2000.0);
        grid.run_frame();

        let inner = handle.clone();
        let fired = Rc::new(RefCell::new(false));
        let seen = Rc::clone(&fired);
        grid.on_scroll(move |event| {
            if event.current_target.scroll_left > 0.0 && !*seen.borrow() {
                *seen.borrow_mut() = true;
                assert_eq!(
                    inner.scroll_to(&ScrollRequest::key("10")),
                    ScrollResolution::Deferred
                );
            }
        });

        body.scroll_natively(30.0, 0.0);
        grid.on_pane_scroll(PaneId::Body, 30.0, 0.0);
        grid.run_frame();
        assert!(*fired.borrow());
        assert_eq!(grid.position().top, 400.0);
    }

    #[test]
    fn test_header_gutter_only_with_data() {
        let (grid, _, _) = mount(ScrollConfig::new(None, Some(200.0)));
        grid.observe_scrollbar(217.0, 200.0);
        assert_eq!(grid.header_gutter(), 0.0);
        grid.set_rows(MeasuredRows::uniform(["a".to_string()], 40.0));
        assert_eq!(grid.header_gutter(), 17.0);
    }

    #[test]
    fn test_handle_detached_after_drop() {
        let (grid, handle, _) = mount(ScrollConfig::default());
        assert!(handle.is_attached());
        drop(grid);
        assert!(!handle.is_attached());
        assert_eq!(
            handle.scroll_to(&ScrollRequest::top(10.0)),
            ScrollResolution::Detached
        );
    }
}
