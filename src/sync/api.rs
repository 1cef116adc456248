//! Imperative scroll control.
//!
//! [`ScrollHandle`] is returned at mount. It holds a weak reference to the
//! grid, so it never keeps a torn-down grid alive and reports
//! [`ScrollResolution::Detached`] afterwards.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use serde::Serialize;

use super::pane::ScrollCommand;
use super::synchronizer::{ScrollOrigin, ViewportSynchronizer};
use crate::engine::GridState;
use crate::layout::RowLocator;
use crate::types::{PaneId, ScrollBehavior, ScrollPosition, ScrollRequest};

/// What happened to a `scroll_to` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "position", rename_all = "camelCase")]
pub enum ScrollResolution {
    /// The scroll primitive was invoked with this target
    Applied(ScrollPosition),
    /// Target equals the committed position
    Unchanged,
    /// Key or index did not resolve to a row
    Unresolved,
    /// Issued while the grid was busy or before the scroll owner was
    /// registered; retried after the current frame or on registration
    Deferred,
    /// The grid was unmounted
    Detached,
}

pub(crate) type RequestQueue = Rc<RefCell<VecDeque<ScrollRequest>>>;

/// Imperative handle to a mounted grid.
#[derive(Debug, Clone)]
pub struct ScrollHandle {
    state: Weak<RefCell<GridState>>,
    queue: RequestQueue,
}

impl ScrollHandle {
    pub(crate) fn new(state: Weak<RefCell<GridState>>, queue: RequestQueue) -> Self {
        Self { state, queue }
    }

    pub fn is_attached(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.try_borrow().map_or(true, |s| !s.is_torn_down()))
    }

    /// Scroll by pixel, row key or row index.
    pub fn scroll_to(&self, request: &ScrollRequest) -> ScrollResolution {
        let Some(state) = self.state.upgrade() else {
            return ScrollResolution::Detached;
        };
        let Ok(mut guard) = state.try_borrow_mut() else {
            // Called from inside a listener; the grid drains this after the frame
            self.queue.borrow_mut().push_back(request.clone());
            return ScrollResolution::Deferred;
        };
        let resolution = guard.scroll_to(request);
        if resolution == ScrollResolution::Deferred {
            self.queue.borrow_mut().push_back(request.clone());
        }
        resolution
    }
}

/// Concrete offsets a request asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedTarget {
    left: Option<f64>,
    top: Option<f64>,
}

fn resolve(request: &ScrollRequest, rows: &dyn RowLocator) -> Option<ResolvedTarget> {
    let left = request.pixel_left();
    if let Some(top) = request.pixel_top() {
        return Some(ResolvedTarget {
            left,
            top: Some(top),
        });
    }

    let key = match (&request.key, request.index) {
        (Some(key), _) => Some(key.clone()),
        (None, Some(index)) => match rows.key_at(index) {
            Some(key) => Some(key),
            None => {
                log::warn!("scroll_to: no row at index {index} ({} rows)", rows.len());
                return None;
            }
        },
        (None, None) => None,
    };

    let Some(key) = key else {
        return Some(ResolvedTarget { left, top: None });
    };
    let Some(row_top) = rows.row_top(&key) else {
        log::warn!("scroll_to: unknown row key {key:?}");
        return None;
    };
    let offset = request.offset.filter(|o| o.is_finite()).unwrap_or(0.0);
    Some(ResolvedTarget {
        left,
        top: Some(row_top + offset),
    })
}

/// Resolve `request` and drive the scroll owner to it.
pub(crate) fn apply_request(
    sync: &mut ViewportSynchronizer,
    owner: PaneId,
    rows: &dyn RowLocator,
    request: &ScrollRequest,
) -> ScrollResolution {
    if sync.is_torn_down() {
        return ScrollResolution::Detached;
    }
    let Some(target) = resolve(request, rows) else {
        return ScrollResolution::Unresolved;
    };
    if target.left.is_none() && target.top.is_none() {
        log::debug!("scroll_to without a target: {request:?}");
        return ScrollResolution::Unchanged;
    }

    let current = sync.position();
    let desired = ScrollPosition::new(
        target.left.unwrap_or(current.left),
        target.top.unwrap_or(current.top),
    )
    .clamped(sync.bounds());

    // Scrolling to the top always reaches the primitive, even when the
    // committed state already says 0
    let force = target.top.is_some_and(|top| top <= 0.0);
    if !force && desired.same_as(&current) {
        return ScrollResolution::Unchanged;
    }

    let command = ScrollCommand {
        left: target.left.map(|_| desired.left),
        top: target.top.map(|_| desired.top),
        behavior: request.behavior,
    };
    if !sync.scroll_pane_to(owner, command) {
        // Retried once the owner registers
        return ScrollResolution::Deferred;
    }
    // Smooth scrolls report their intermediate offsets natively
    if request.behavior != ScrollBehavior::Smooth {
        sync.commit(desired, ScrollOrigin::Imperative(owner));
    }
    ScrollResolution::Applied(desired)
}
