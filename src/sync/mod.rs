//! Scroll synchronization across the grid's panes.
//!
//! - [`ScrollStateStore`] holds the authoritative `{left, top}`
//! - [`ViewportSynchronizer`] is its only writer and mirrors it into every pane
//! - [`WheelEventAdapter`] turns wheel input over overflow-hidden panes into writes
//! - [`ResizeBridge`] republishes viewport and content sizes
//! - [`ScrollHandle`] is the imperative `scroll_to` surface

mod api;
mod pane;
mod resize;
mod scheduler;
mod store;
mod synchronizer;
mod wheel;

pub(crate) use api::{apply_request, RequestQueue};
pub use api::{ScrollHandle, ScrollResolution};
pub use pane::{MemoryPane, MemoryPaneLog, ScrollCommand, ScrollPane};
pub use resize::{ResizeBridge, ScrollActivity};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use store::{ListenerId, ScrollStateStore};
pub use synchronizer::{
    AxisState, PingState, ScrollEvent, ScrollOrigin, ScrollTarget, ViewportSynchronizer,
    SCROLL_LOCK_MS,
};
pub use wheel::{WheelDeltaMode, WheelEventAdapter, WheelInput, WheelOutcome, WHEEL_LINE_HEIGHT};
