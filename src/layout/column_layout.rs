//! Sticky offsets for fixed columns.
//!
//! Computed from the descriptor list whenever columns, measured widths or
//! viewport metrics change. The result is always derivable and never kept as
//! authoritative state.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{
    ColumnDescriptor, CssSize, FixedSide, Position, ScrollConfig, ScrollX, StyleDecl,
    ViewportMetrics,
};

/// Resolved geometry of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayoutEntry {
    pub key: String,
    /// Distance from the pinned edge (left edge for left-fixed, right edge for right-fixed)
    pub offset: f64,
    pub width: f64,
    pub fixed_side: FixedSide,
    /// Rendered with `position: sticky`
    pub sticky: bool,
    /// Last column of the left-fixed group (draws the left shadow)
    pub last_fixed_left: bool,
    /// First column of the right-fixed group (draws the right shadow)
    pub first_fixed_right: bool,
}

/// Output of [`ColumnLayoutEngine::compute`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub columns: Vec<ColumnLayoutEntry>,
    /// Laid-out table width; pinned to the column sum once fixed columns exist
    pub total_width: CssSize,
    /// Sum of resolved column widths
    pub content_width: f64,
    pub left_fixed_width: f64,
    pub right_fixed_width: f64,
}

impl LayoutResult {
    pub fn column(&self, key: &str) -> Option<&ColumnLayoutEntry> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn has_fixed(&self) -> bool {
        self.columns.iter().any(|c| c.fixed_side.is_fixed())
    }

    /// Inline style for a sticky cell of the given column.
    pub fn sticky_style(&self, key: &str) -> Option<StyleDecl> {
        let entry = self.column(key).filter(|c| c.sticky)?;
        let mut decl = StyleDecl {
            position: Some(Position::Sticky),
            ..StyleDecl::default()
        };
        match entry.fixed_side {
            FixedSide::Left => decl.left = Some(CssSize::Px(entry.offset)),
            FixedSide::Right => decl.right = Some(CssSize::Px(entry.offset)),
            FixedSide::None => return None,
        }
        Some(decl)
    }
}

/// Keeps widths measured from rendered geometry and lays columns out.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayoutEngine {
    measured: HashMap<String, f64>,
}

impl ColumnLayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rendered width of a column. Returns true if it changed.
    pub fn record_width(&mut self, key: &str, width: f64) -> bool {
        if !width.is_finite() || width < 0.0 {
            log::warn!("ignoring measured width {width} for column {key}");
            return false;
        }
        match self.measured.get(key) {
            Some(prev) if (prev - width).abs() <= f64::EPSILON => false,
            _ => {
                self.measured.insert(key.to_string(), width);
                true
            }
        }
    }

    /// Drop measurements of columns that are no longer present.
    pub fn retain_columns(&mut self, columns: &[ColumnDescriptor]) {
        self.measured
            .retain(|key, _| columns.iter().any(|c| &c.key == key));
    }

    /// Declared width, else measured width, else 0 until measured.
    pub fn resolved_width(&self, column: &ColumnDescriptor) -> f64 {
        column
            .width
            .or_else(|| self.measured.get(&column.key).copied())
            .unwrap_or(0.0)
    }

    pub fn compute(
        &self,
        columns: &[ColumnDescriptor],
        scroll: &ScrollConfig,
        metrics: Option<&ViewportMetrics>,
    ) -> LayoutResult {
        let widths: Vec<f64> = columns.iter().map(|c| self.resolved_width(c)).collect();
        let has_fixed = columns.iter().any(|c| c.fixed_side.is_fixed());
        warn_on_fixed_order(columns);

        // Fixed columns only stick while there is something to scroll under them
        let sticky = scroll.horizontal() && metrics.map_or(true, ViewportMetrics::horizontal_active);

        let mut offsets = vec![0.0; columns.len()];

        let mut left = 0.0;
        for (offset, (column, width)) in offsets.iter_mut().zip(columns.iter().zip(&widths)) {
            if column.fixed_side == FixedSide::Left {
                *offset = left;
                left += width;
            }
        }

        let mut right = 0.0;
        for (offset, (column, width)) in offsets
            .iter_mut()
            .zip(columns.iter().zip(&widths))
            .rev()
        {
            if column.fixed_side == FixedSide::Right {
                *offset = right;
                right += width;
            }
        }

        let last_left = columns
            .iter()
            .rposition(|c| c.fixed_side == FixedSide::Left);
        let first_right = columns
            .iter()
            .position(|c| c.fixed_side == FixedSide::Right);

        let entries = columns
            .iter()
            .zip(widths.iter().zip(offsets))
            .enumerate()
            .map(|(i, (column, (&width, offset)))| ColumnLayoutEntry {
                key: column.key.clone(),
                offset,
                width,
                fixed_side: column.fixed_side,
                sticky: sticky && column.fixed_side.is_fixed(),
                last_fixed_left: last_left == Some(i),
                first_fixed_right: first_right == Some(i),
            })
            .collect();

        let content_width: f64 = widths.iter().sum();
        let total_width = match scroll.x {
            Some(ScrollX::Width(w)) => CssSize::Px(w),
            Some(ScrollX::MaxContent) => CssSize::MaxContent,
            Some(ScrollX::Auto) | None if !has_fixed => CssSize::Auto,
            Some(ScrollX::Auto) | None => CssSize::Px(content_width),
        };

        LayoutResult {
            columns: entries,
            total_width,
            content_width,
            left_fixed_width: left,
            right_fixed_width: right,
        }
    }
}

fn warn_on_fixed_order(columns: &[ColumnDescriptor]) {
    let is_left = |c: &&ColumnDescriptor| c.fixed_side == FixedSide::Left;
    let is_right = |c: &&ColumnDescriptor| c.fixed_side == FixedSide::Right;

    if let Some(stray) = columns.iter().skip_while(is_left).find(is_left) {
        log::warn!(
            "left-fixed column {} follows a scrolling column; it will stick from its group offset",
            stray.key
        );
    }
    if let Some(stray) = columns.iter().rev().skip_while(is_right).find(is_right) {
        log::warn!(
            "right-fixed column {} precedes a scrolling column; it will stick from its group offset",
            stray.key
        );
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("a").with_width(100.0).fixed(FixedSide::Left),
            ColumnDescriptor::new("b").with_width(80.0).fixed(FixedSide::Left),
            ColumnDescriptor::new("c").with_width(120.0),
            ColumnDescriptor::new("d").with_width(60.0).fixed(FixedSide::Right),
            ColumnDescriptor::new("e").with_width(40.0).fixed(FixedSide::Right),
        ]
    }

    #[test]
    fn test_left_offsets_accumulate() {
        let layout = ColumnLayoutEngine::new().compute(
            &columns(),
            &ScrollConfig::new(Some(ScrollX::Auto), None),
            None,
        );
        assert_eq!(layout.columns[0].offset, 0.0);
        assert_eq!(layout.columns[1].offset, 100.0);
        assert_eq!(layout.left_fixed_width, 180.0);
        assert!(layout.columns[1].last_fixed_left);
        assert!(!layout.columns[0].last_fixed_left);
    }

    #[test]
    fn test_right_offsets_from_right_edge() {
        let layout = ColumnLayoutEngine::new().compute(
            &columns(),
            &ScrollConfig::new(Some(ScrollX::Auto), None),
            None,
        );
        assert_eq!(layout.columns[4].offset, 0.0);
        assert_eq!(layout.columns[3].offset, 40.0);
        assert_eq!(layout.right_fixed_width, 100.0);
        assert!(layout.columns[3].first_fixed_right);
    }

    #[test]
    fn test_scrolling_column_not_sticky() {
        let layout = ColumnLayoutEngine::new().compute(
            &columns(),
            &ScrollConfig::new(Some(ScrollX::Auto), None),
            None,
        );
        let c = layout.column("c").unwrap();
        assert_eq!(c.offset, 0.0);
        assert!(!c.sticky);
        assert!(layout.sticky_style("c").is_none());
        let a = layout.sticky_style("a").unwrap();
        assert_eq!(a.left, Some(CssSize::Px(0.0)));
    }

    #[test]
    fn test_measured_width_used_for_auto_column() {
        let mut engine = ColumnLayoutEngine::new();
        let cols = vec![
            ColumnDescriptor::new("auto").fixed(FixedSide::Left),
            ColumnDescriptor::new("next").with_width(50.0).fixed(FixedSide::Left),
        ];
        let scroll = ScrollConfig::new(Some(ScrollX::Auto), None);
        assert_eq!(engine.compute(&cols, &scroll, None).columns[1].offset, 0.0);

        assert!(engine.record_width("auto", 70.0));
        assert!(!engine.record_width("auto", 70.0));
        assert_eq!(engine.compute(&cols, &scroll, None).columns[1].offset, 70.0);
    }

    #[test]
    fn test_retain_columns_drops_stale_measurements() {
        let mut engine = ColumnLayoutEngine::new();
        engine.record_width("gone", 30.0);
        engine.retain_columns(&[ColumnDescriptor::new("kept")]);
        assert_eq!(engine.resolved_width(&ColumnDescriptor::new("gone")), 0.0);
    }
}
