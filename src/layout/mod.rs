//! Layout engine for fixed columns, pane styles and row positions.
//!
//! This module handles:
//! - Sticky offsets for left/right fixed columns
//! - The inline style contract of the table, content wrapper, header and body
//! - The empty-data placeholder row
//! - Row position lookup for scrolling to a key or index

mod body;
mod column_layout;
mod rows;
mod style_plan;

pub use body::{plan_body, BodyContent, EmptyPlaceholder};
pub use column_layout::{ColumnLayoutEngine, ColumnLayoutEntry, LayoutResult};
pub use rows::{MeasuredRows, NoRows, RowLocator, DEFAULT_ROW_HEIGHT};
pub use style_plan::{plan_styles, PaneArrangement, PaneStyles};
