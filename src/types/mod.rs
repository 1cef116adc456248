//! Plain data types shared by the layout and sync modules.

mod column;
mod config;
mod pane;
mod scroll;
mod style;

pub use column::*;
pub use config::*;
pub use pane::*;
pub use scroll::*;
pub use style::*;
