//! Authoritative scroll position with change notification.

use crate::types::{ScrollBounds, ScrollPosition};

/// Handle returned by [`ScrollStateStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) usize);

type Listener = Box<dyn FnMut(ScrollPosition)>;

/// Holds the shared `{left, top}`.
///
/// Writes are crate-private: the [`ViewportSynchronizer`](super::ViewportSynchronizer)
/// is the only writer. Until bounds are set only negative offsets are clamped.
pub struct ScrollStateStore {
    position: ScrollPosition,
    bounds: ScrollBounds,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: usize,
}

impl std::fmt::Debug for ScrollStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollStateStore")
            .field("position", &self.position)
            .field("bounds", &self.bounds)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ScrollStateStore {
    fn default() -> Self {
        Self {
            position: ScrollPosition::ORIGIN,
            bounds: ScrollBounds::UNBOUNDED,
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl ScrollStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ScrollPosition {
        self.position
    }

    pub fn bounds(&self) -> ScrollBounds {
        self.bounds
    }

    /// Register a listener called once per committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(ScrollPosition) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Clamp and store. Returns true (and notifies) only if the value changed.
    pub(crate) fn set(&mut self, position: ScrollPosition) -> bool {
        let next = position.clamped(self.bounds);
        if next.same_as(&self.position) {
            return false;
        }
        self.position = next;
        self.notify();
        true
    }

    /// Replace the bounds and re-clamp the current position.
    pub(crate) fn set_bounds(&mut self, bounds: ScrollBounds) -> bool {
        self.bounds = bounds;
        let current = self.position;
        self.set(current)
    }

    fn notify(&mut self) {
        let position = self.position;
        for (_, listener) in &mut self.listeners {
            listener(position);
        }
    }
}
