//! Keeps every registered pane at the shared scroll position.
//!
//! Inputs commit to the store immediately; writes to the other panes and the
//! `onScroll` notification happen once per frame, carrying the latest value.

use std::collections::BTreeMap;

use serde::Serialize;

use super::pane::{ScrollCommand, ScrollPane};
use super::scheduler::FrameScheduler;
use super::store::{ListenerId, ScrollStateStore};
use crate::types::{
    same_offset, PaneId, PaneRole, ScrollAxis, ScrollBounds, ScrollPosition, ViewportMetrics,
    SCROLL_EPSILON,
};

/// How long (ms) the pane that started a scroll owns it.
pub const SCROLL_LOCK_MS: f64 = 100.0;

/// What caused a committed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "pane", rename_all = "camelCase")]
pub enum ScrollOrigin {
    /// The pane scrolled natively and is already at the value
    Native(PaneId),
    /// Wheel input over a pane that does not scroll natively
    Wheel(PaneId),
    /// `scroll_to` already moved this pane through its primitive
    Imperative(PaneId),
    /// Metrics changed and the position was re-clamped
    Resize,
    /// A pane registered after mount needs the current position
    Attach,
}

impl ScrollOrigin {
    /// Pane skipped by the propagation write.
    fn excluded_pane(self) -> Option<PaneId> {
        match self {
            ScrollOrigin::Native(pane) | ScrollOrigin::Imperative(pane) => Some(pane),
            ScrollOrigin::Wheel(_) | ScrollOrigin::Resize | ScrollOrigin::Attach => None,
        }
    }

    pub fn pane(self) -> Option<PaneId> {
        match self {
            ScrollOrigin::Native(pane)
            | ScrollOrigin::Wheel(pane)
            | ScrollOrigin::Imperative(pane) => Some(pane),
            ScrollOrigin::Resize | ScrollOrigin::Attach => None,
        }
    }
}

/// Per-axis propagation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisState {
    #[default]
    Idle,
    /// A committed value is waiting for the next frame
    Propagating,
}

/// Whether content is hidden under the fixed regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PingState {
    /// Content scrolled under the left fixed columns
    pub left: bool,
    /// Content remains under the right fixed columns
    pub right: bool,
}

impl PingState {
    pub fn compute(position: ScrollPosition, metrics: Option<&ViewportMetrics>) -> Self {
        match metrics {
            Some(m) if m.horizontal_active() => PingState {
                left: position.left > SCROLL_EPSILON,
                right: position.left < m.max_scroll_left() - SCROLL_EPSILON,
            },
            _ => PingState::default(),
        }
    }
}

/// Geometry of the scroll owner at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollTarget {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub scroll_width: f64,
    pub client_width: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

/// Payload handed to `onScroll` listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEvent {
    pub current_target: ScrollTarget,
    pub source: Option<PaneId>,
    pub ping: PingState,
}

type EventListener = Box<dyn FnMut(&ScrollEvent)>;

struct PaneSlot {
    pane: Box<dyn ScrollPane>,
    role: PaneRole,
}

impl PaneSlot {
    /// Write the tracked axes that differ. Returns whether anything was written.
    fn sync_to(&mut self, position: ScrollPosition) -> bool {
        let mut wrote = false;
        if self.role.horizontal && !same_offset(self.pane.scroll_left(), position.left) {
            self.pane.set_scroll_left(position.left);
            wrote = true;
        }
        if self.role.vertical && !same_offset(self.pane.scroll_top(), position.top) {
            self.pane.set_scroll_top(position.top);
            wrote = true;
        }
        wrote
    }
}

#[derive(Debug, Clone, Copy)]
struct Propagation {
    origin: ScrollOrigin,
    /// Store changed since the last frame
    notify: bool,
}

#[derive(Debug, Clone, Copy)]
struct ScrollLock {
    pane: PaneId,
    until_ms: f64,
}

/// Single writer of the [`ScrollStateStore`].
pub struct ViewportSynchronizer {
    store: ScrollStateStore,
    panes: BTreeMap<PaneId, PaneSlot>,
    scheduler: Box<dyn FrameScheduler>,
    frame_requested: bool,
    in_frame: bool,
    pending: Option<Propagation>,
    scroll_lock: Option<ScrollLock>,
    metrics: Option<ViewportMetrics>,
    horizontal: AxisState,
    vertical: AxisState,
    listeners: Vec<(ListenerId, EventListener)>,
    next_listener: usize,
    torn_down: bool,
}

impl std::fmt::Debug for ViewportSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportSynchronizer")
            .field("store", &self.store)
            .field("panes", &self.panes.keys().collect::<Vec<_>>())
            .field("pending", &self.pending)
            .field("metrics", &self.metrics)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl ViewportSynchronizer {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            store: ScrollStateStore::new(),
            panes: BTreeMap::new(),
            scheduler,
            frame_requested: false,
            in_frame: false,
            pending: None,
            scroll_lock: None,
            metrics: None,
            horizontal: AxisState::Idle,
            vertical: AxisState::Idle,
            listeners: Vec::new(),
            next_listener: 0,
            torn_down: false,
        }
    }

    pub fn position(&self) -> ScrollPosition {
        self.store.get()
    }

    pub fn bounds(&self) -> ScrollBounds {
        self.store.bounds()
    }

    pub fn metrics(&self) -> Option<&ViewportMetrics> {
        self.metrics.as_ref()
    }

    pub fn store(&self) -> &ScrollStateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ScrollStateStore {
        &mut self.store
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn ping(&self) -> PingState {
        PingState::compute(self.store.get(), self.metrics.as_ref())
    }

    pub fn axis_state(&self, axis: ScrollAxis) -> AxisState {
        match axis {
            ScrollAxis::Horizontal => self.horizontal,
            ScrollAxis::Vertical => self.vertical,
        }
    }

    pub fn role(&self, pane: PaneId) -> Option<PaneRole> {
        self.panes.get(&pane).map(|slot| slot.role)
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes.keys().copied().collect()
    }

    /// Attach a pane. It is brought to the current position on the next frame.
    pub fn register_pane(&mut self, id: PaneId, pane: Box<dyn ScrollPane>, role: PaneRole) {
        if self.torn_down {
            return;
        }
        if self.panes.insert(id, PaneSlot { pane, role }).is_some() {
            log::debug!("replacing scroll pane {id}");
        }
        if self.pending.is_none() {
            self.pending = Some(Propagation {
                origin: ScrollOrigin::Attach,
                notify: false,
            });
        }
        self.request_frame();
    }

    pub fn unregister_pane(&mut self, id: PaneId) -> bool {
        if self.scroll_lock.is_some_and(|lock| lock.pane == id) {
            self.scroll_lock = None;
        }
        self.panes.remove(&id).is_some()
    }

    /// Register an `onScroll` listener, called once per committed change.
    pub fn on_scroll(&mut self, listener: impl FnMut(&ScrollEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn off_scroll(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// A pane reported a native scroll offset.
    ///
    /// Returns true if the value was committed.
    pub fn on_pane_scroll(&mut self, pane: PaneId, left: f64, top: f64) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(role) = self.role(pane) else {
            log::trace!("scroll from unregistered pane {pane}");
            return false;
        };

        let current = self.store.get();
        let target = ScrollPosition::new(
            if role.horizontal { left } else { current.left },
            if role.vertical { top } else { current.top },
        );
        if target.clamped(self.store.bounds()).same_as(&current) {
            return false;
        }

        if let Some(holder) = self.lock_holder() {
            if holder != pane {
                log::trace!("ignoring scroll from {pane}, {holder} holds the lock");
                return false;
            }
        }

        self.commit(target, ScrollOrigin::Native(pane))
    }

    /// Pane owning the current scroll, if its lock has not expired.
    fn lock_holder(&self) -> Option<PaneId> {
        let now = self.scheduler.now_ms();
        self.scroll_lock
            .filter(|lock| now < lock.until_ms)
            .map(|lock| lock.pane)
    }

    fn take_lock(&mut self, pane: PaneId) {
        self.scroll_lock = Some(ScrollLock {
            pane,
            until_ms: self.scheduler.now_ms() + SCROLL_LOCK_MS,
        });
    }

    /// Clamp, store and schedule propagation. Returns whether the store changed.
    ///
    /// Native, wheel and imperative commits make their pane the scroll
    /// target, so offsets other panes report in the next
    /// [`SCROLL_LOCK_MS`] are treated as echoes.
    pub(crate) fn commit(&mut self, position: ScrollPosition, origin: ScrollOrigin) -> bool {
        if self.torn_down {
            return false;
        }
        let before = self.store.get();
        if !self.store.set(position) {
            return false;
        }
        if let Some(pane) = origin.pane() {
            self.take_lock(pane);
        }
        self.mark_changed(before, origin);
        true
    }

    /// Publish new viewport metrics and re-clamp the stored position.
    pub fn set_metrics(&mut self, metrics: ViewportMetrics) {
        if self.torn_down {
            return;
        }
        self.metrics = Some(metrics);
        let before = self.store.get();
        if self.store.set_bounds(metrics.bounds()) {
            log::debug!(
                "viewport shrank, scroll position clamped to {:?}",
                self.store.get()
            );
            self.mark_changed(before, ScrollOrigin::Resize);
        }
    }

    /// Call the native scroll primitive of a pane.
    pub(crate) fn scroll_pane_to(&mut self, id: PaneId, command: ScrollCommand) -> bool {
        if self.torn_down {
            return false;
        }
        match self.panes.get_mut(&id) {
            Some(slot) => {
                slot.pane.scroll_to(command);
                true
            }
            None => {
                log::debug!("scroll owner {id} is not registered");
                false
            }
        }
    }

    fn mark_changed(&mut self, before: ScrollPosition, origin: ScrollOrigin) {
        let after = self.store.get();
        if !same_offset(before.left, after.left) {
            self.horizontal = AxisState::Propagating;
        }
        if !same_offset(before.top, after.top) {
            self.vertical = AxisState::Propagating;
        }
        self.pending = Some(Propagation {
            origin,
            notify: true,
        });
        self.request_frame();
    }

    pub(crate) fn request_frame(&mut self) {
        if self.torn_down || self.in_frame || self.frame_requested {
            return;
        }
        self.frame_requested = true;
        self.scheduler.request_frame();
    }

    /// Mark the start of a frame; requests made until it finishes are folded in.
    pub(crate) fn begin_frame(&mut self) {
        self.frame_requested = false;
        self.in_frame = true;
    }

    /// Write pending state to the panes and notify listeners.
    pub(crate) fn finish_frame(&mut self) -> Option<ScrollEvent> {
        self.in_frame = false;
        if self.torn_down {
            return None;
        }
        let propagation = self.pending.take()?;
        let position = self.store.get();
        let excluded = propagation.origin.excluded_pane();

        let mut written = 0;
        for (id, slot) in &mut self.panes {
            if Some(*id) == excluded {
                continue;
            }
            if slot.sync_to(position) {
                written += 1;
            }
        }
        self.horizontal = AxisState::Idle;
        self.vertical = AxisState::Idle;
        log::trace!(
            "frame: {:?} -> {written} pane(s) from {:?}",
            position,
            propagation.origin
        );

        if !propagation.notify {
            return None;
        }
        let event = self.scroll_event(propagation.origin);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        Some(event)
    }

    /// Run one frame: propagate the latest committed value.
    pub fn run_frame(&mut self) -> Option<ScrollEvent> {
        self.begin_frame();
        self.finish_frame()
    }

    pub fn scroll_event(&self, origin: ScrollOrigin) -> ScrollEvent {
        let position = self.store.get();
        let metrics = self.metrics.unwrap_or_default();
        ScrollEvent {
            current_target: ScrollTarget {
                scroll_left: position.left,
                scroll_top: position.top,
                scroll_width: metrics.scroll_width,
                client_width: metrics.client_width,
                scroll_height: metrics.scroll_height,
                client_height: metrics.client_height,
            },
            source: origin.pane(),
            ping: self.ping(),
        }
    }

    /// Stop all propagation and release panes and listeners.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if self.frame_requested {
            self.scheduler.cancel_frame();
        }
        self.frame_requested = false;
        self.pending = None;
        self.scroll_lock = None;
        self.panes.clear();
        self.listeners.clear();
        self.store.clear_listeners();
        self.horizontal = AxisState::Idle;
        self.vertical = AxisState::Idle;
        self.torn_down = true;
        log::debug!("scroll synchronizer torn down");
    }
}
