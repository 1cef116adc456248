//! gridscroll - scroll and fixed-column synchronization for data grids
//!
//! Keeps the independently scrollable panes of a table (fixed header, body,
//! summary row, single content wrapper) in lockstep and lays out sticky
//! fixed columns:
//! - Sticky offsets and table width for left/right fixed columns
//! - The inline style contract of the table and its scroll panes
//! - One authoritative scroll position, propagated once per frame
//! - Wheel input over overflow-hidden panes, resize observation
//! - Imperative `scrollTo` by pixel, row key or row index
//!
//! The core is headless: hosts implement [`ScrollPane`] and
//! [`FrameScheduler`]. On `wasm32` the `GridScroller` binding drives real
//! DOM elements.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridScroller } from 'gridscroll';
//! await init();
//! const scroller = new GridScroller(root, { columns, scroll: { x: true, y: 300 } });
//! scroller.setOnScroll((e) => console.log(e.currentTarget.scrollLeft));
//! scroller.scrollTo({ key: 'row-42' });
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod sync;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use engine::GridScroll;
pub use error::{GridError, Result};
pub use layout::{
    BodyContent, ColumnLayoutEngine, LayoutResult, MeasuredRows, PaneArrangement, PaneStyles,
    RowLocator,
};
pub use sync::{
    FrameScheduler, ManualScheduler, MemoryPane, ScrollEvent, ScrollHandle, ScrollPane,
    ScrollResolution, WheelInput, WheelOutcome,
};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use viewer::GridScroller;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
