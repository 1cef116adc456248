//! Scroll pane abstraction.
//!
//! A pane is anything with a scroll offset the core can read and write: a DOM
//! element on the web, a widget in another toolkit, or [`MemoryPane`] in
//! headless hosts.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::{clamp_axis, ScrollBehavior, ScrollBounds, ScrollPosition};

/// Arguments of the native `scrollTo` primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollCommand {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub behavior: ScrollBehavior,
}

impl ScrollCommand {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none()
    }
}

pub trait ScrollPane {
    fn scroll_left(&self) -> f64;
    fn scroll_top(&self) -> f64;
    fn set_scroll_left(&mut self, left: f64);
    fn set_scroll_top(&mut self, top: f64);

    /// Invoke the platform scroll primitive.
    fn scroll_to(&mut self, command: ScrollCommand);
}

/// What a [`MemoryPane`] has been asked to do.
#[derive(Debug, Clone, Default)]
pub struct MemoryPaneLog {
    pub left_writes: Vec<f64>,
    pub top_writes: Vec<f64>,
    pub scroll_to_calls: Vec<ScrollCommand>,
}

#[derive(Debug, Default)]
struct MemoryPaneState {
    position: ScrollPosition,
    bounds: Option<ScrollBounds>,
    log: MemoryPaneLog,
}

impl MemoryPaneState {
    fn clamp_left(&self, left: f64) -> f64 {
        self.bounds.map_or(left, |b| clamp_axis(left, b.max_left))
    }

    fn clamp_top(&self, top: f64) -> f64 {
        self.bounds.map_or(top, |b| clamp_axis(top, b.max_top))
    }
}

/// In-memory pane that records every write.
///
/// Clones share state: hand one to the core and keep one to inspect.
#[derive(Debug, Clone, Default)]
pub struct MemoryPane {
    state: Rc<RefCell<MemoryPaneState>>,
}

impl MemoryPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp writes like a native scroller with these limits.
    pub fn with_bounds(bounds: ScrollBounds) -> Self {
        let pane = Self::default();
        pane.state.borrow_mut().bounds = Some(bounds);
        pane
    }

    pub fn position(&self) -> ScrollPosition {
        self.state.borrow().position
    }

    /// Move the pane as the user would, without logging a write.
    pub fn scroll_natively(&self, left: f64, top: f64) {
        let mut s = self.state.borrow_mut();
        let left = s.clamp_left(left);
        let top = s.clamp_top(top);
        s.position = ScrollPosition::new(left, top);
    }

    pub fn log(&self) -> MemoryPaneLog {
        self.state.borrow().log.clone()
    }

    pub fn left_writes(&self) -> Vec<f64> {
        self.state.borrow().log.left_writes.clone()
    }

    pub fn top_writes(&self) -> Vec<f64> {
        self.state.borrow().log.top_writes.clone()
    }

    pub fn scroll_to_calls(&self) -> Vec<ScrollCommand> {
        self.state.borrow().log.scroll_to_calls.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log = MemoryPaneLog::default();
    }
}

impl ScrollPane for MemoryPane {
    fn scroll_left(&self) -> f64 {
        self.state.borrow().position.left
    }

    fn scroll_top(&self) -> f64 {
        self.state.borrow().position.top
    }

    fn set_scroll_left(&mut self, left: f64) {
        let mut s = self.state.borrow_mut();
        s.log.left_writes.push(left);
        s.position.left = s.clamp_left(left);
    }

    fn set_scroll_top(&mut self, top: f64) {
        let mut s = self.state.borrow_mut();
        s.log.top_writes.push(top);
        s.position.top = s.clamp_top(top);
    }

    fn scroll_to(&mut self, command: ScrollCommand) {
        let mut s = self.state.borrow_mut();
        s.log.scroll_to_calls.push(command);
        if let Some(left) = command.left {
            s.position.left = s.clamp_left(left);
        }
        if let Some(top) = command.top {
            s.position.top = s.clamp_top(top);
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pane_records_writes() {
        let observer = MemoryPane::new();
        let mut pane = observer.clone();
        pane.set_scroll_left(10.0);
        pane.set_scroll_top(4.0);
        assert_eq!(observer.left_writes(), vec![10.0]);
        assert_eq!(observer.top_writes(), vec![4.0]);
        assert_eq!(observer.position(), ScrollPosition::new(10.0, 4.0));
    }

    #[test]
    fn test_memory_pane_clamps_like_native() {
        let mut pane = MemoryPane::with_bounds(ScrollBounds {
            max_left: 100.0,
            max_top: 0.0,
        });
        pane.set_scroll_left(150.0);
        assert_eq!(pane.scroll_left(), 100.0);
        pane.scroll_to(ScrollCommand {
            left: None,
            top: Some(30.0),
            behavior: ScrollBehavior::Auto,
        });
        assert_eq!(pane.scroll_top(), 0.0);
        assert_eq!(pane.scroll_to_calls().len(), 1);
    }
}
