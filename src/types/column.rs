//! Column descriptor types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{GridError, Result};

/// Which viewport edge a column is pinned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    /// Pinned to the left edge
    Left,
    /// Pinned to the right edge
    Right,
    /// Scrolls with the content
    #[default]
    None,
}

impl FixedSide {
    pub fn is_fixed(self) -> bool {
        self != FixedSide::None
    }
}

/// One column as handed over by the column configuration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Unique key, also the join key with row data
    pub key: String,
    /// Declared width in pixels; `None` means natural flow (measured later)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, alias = "fixed")]
    pub fixed_side: FixedSide,
    /// Cell content is truncated with an ellipsis (forces a fixed table layout)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ellipsis: bool,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            width: None,
            fixed_side: FixedSide::None,
            ellipsis: false,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn fixed(mut self, side: FixedSide) -> Self {
        self.fixed_side = side;
        self
    }

    #[must_use]
    pub fn with_ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }
}

/// Check key uniqueness and declared widths.
///
/// # Errors
/// Returns [`GridError::DuplicateColumnKey`] for a repeated key and
/// [`GridError::InvalidColumnWidth`] for a negative or non-finite width.
pub fn validate_columns(columns: &[ColumnDescriptor]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            return Err(GridError::DuplicateColumnKey(column.key.clone()));
        }
        if let Some(width) = column.width {
            if !width.is_finite() || width < 0.0 {
                return Err(GridError::InvalidColumnWidth {
                    key: column.key.clone(),
                    width,
                });
            }
        }
    }
    Ok(())
}
