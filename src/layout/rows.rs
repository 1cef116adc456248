//! Row position lookup used to resolve `scroll_to` by key or index.
//!
//! The grid does not own row rendering; hosts either implement
//! [`RowLocator`] against their rendered rows or feed heights into
//! [`MeasuredRows`], which keeps cumulative positions for O(log n) lookup.

use std::collections::HashMap;

/// Resolves row locators to vertical offsets inside the body.
pub trait RowLocator {
    /// Number of rows in the data set
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key of the row at `index`
    fn key_at(&self, index: usize) -> Option<String>;

    /// Top edge of the row with `key`, in body content pixels
    fn row_top(&self, key: &str) -> Option<f64>;
}

/// Locator for a grid without data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRows;

impl RowLocator for NoRows {
    fn len(&self) -> usize {
        0
    }

    fn key_at(&self, _index: usize) -> Option<String> {
        None
    }

    fn row_top(&self, _key: &str) -> Option<f64> {
        None
    }
}

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;

/// Rows with known heights
#[derive(Debug, Clone, Default)]
pub struct MeasuredRows {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    /// Row heights (0 for collapsed rows)
    heights: Vec<f64>,
    /// Cumulative row positions (`positions[i]` = y of row i's top edge, plus a final edge)
    positions: Vec<f64>,
}

impl MeasuredRows {
    /// Create from `(key, height)` pairs in render order.
    pub fn new(rows: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut out = Self::default();
        for (i, (key, height)) in rows.into_iter().enumerate() {
            if out.index.contains_key(&key) {
                log::warn!("duplicate row key {key}; scroll_to will target its first occurrence");
            } else {
                out.index.insert(key.clone(), i);
            }
            out.keys.push(key);
            out.heights.push(sanitize_height(height));
        }
        out.rebuild_positions(0);
        out
    }

    /// Every row at the same height.
    pub fn uniform(keys: impl IntoIterator<Item = String>, row_height: f64) -> Self {
        Self::new(keys.into_iter().map(|k| (k, row_height)))
    }

    /// Update a row height after measurement. Returns true if it changed.
    pub fn set_height(&mut self, key: &str, height: f64) -> bool {
        let Some(&i) = self.index.get(key) else {
            return false;
        };
        let height = sanitize_height(height);
        let Some(slot) = self.heights.get_mut(i) else {
            return false;
        };
        if (*slot - height).abs() <= f64::EPSILON {
            return false;
        }
        *slot = height;
        self.rebuild_positions(i);
        true
    }

    /// Get total height of all rows
    pub fn total_height(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Find row at y position (binary search)
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        if self.keys.is_empty() {
            return None;
        }
        let i = match self
            .positions
            .binary_search_by(|pos| pos.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Some(i.min(self.keys.len() - 1))
    }

    fn rebuild_positions(&mut self, from: usize) {
        // Positions up to and including `from` only depend on earlier heights
        self.positions.truncate(from + 1);
        if self.positions.is_empty() {
            self.positions.push(0.0);
        }
        let mut y = self.positions.last().copied().unwrap_or(0.0);
        for h in self.heights.iter().skip(from) {
            y += h;
            self.positions.push(y); // Bottom edge of the row
        }
    }
}

fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() && height >= 0.0 {
        height
    } else {
        DEFAULT_ROW_HEIGHT
    }
}

impl RowLocator for MeasuredRows {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn key_at(&self, index: usize) -> Option<String> {
        self.keys.get(index).cloned()
    }

    fn row_top(&self, key: &str) -> Option<f64> {
        let i = *self.index.get(key)?;
        self.positions.get(i).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn rows() -> MeasuredRows {
        MeasuredRows::new(vec![
            ("a".to_string(), 20.0),
            ("b".to_string(), 30.0),
            ("c".to_string(), 50.0),
        ])
    }

    #[test]
    fn test_row_top() {
        let rows = rows();
        assert_eq!(rows.row_top("a"), Some(0.0));
        assert_eq!(rows.row_top("b"), Some(20.0));
        assert_eq!(rows.row_top("c"), Some(50.0));
        assert_eq!(rows.row_top("missing"), None);
        assert_eq!(rows.total_height(), 100.0);
    }

    #[test]
    fn test_key_at() {
        let rows = rows();
        assert_eq!(rows.key_at(1).as_deref(), Some("b"));
        assert_eq!(rows.key_at(3), None);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_set_height_shifts_following_rows() {
        let mut rows = rows();
        assert!(rows.set_height("b", 10.0));
        assert!(!rows.set_height("b", 10.0));
        assert_eq!(rows.row_top("c"), Some(30.0));
        assert_eq!(rows.total_height(), 80.0);
    }

    #[test]
    fn test_row_at_y() {
        let rows = rows();
        assert_eq!(rows.row_at_y(0.0), Some(0));
        assert_eq!(rows.row_at_y(25.0), Some(1));
        assert_eq!(rows.row_at_y(50.0), Some(2));
        assert_eq!(rows.row_at_y(500.0), Some(2));
        assert_eq!(MeasuredRows::default().row_at_y(0.0), None);
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let rows = MeasuredRows::uniform(vec!["x".to_string(), "x".to_string()], 10.0);
        assert_eq!(rows.row_top("x"), Some(0.0));
        assert_eq!(rows.len(), 2);
    }
}
