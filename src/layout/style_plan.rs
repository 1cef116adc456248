//! Inline styles for the table element and the scroll panes.
//!
//! This is the observable CSS contract of the grid. Horizontal and vertical
//! scroll responsibilities are split: without a fixed header the content
//! wrapper only ever scrolls horizontally; with one, the body owns both axes.

use serde::Serialize;

use super::LayoutResult;
use crate::types::{
    ColumnDescriptor, CssSize, Overflow, PaneId, PaneRole, ScrollConfig, ScrollX, StyleDecl,
    TableLayout,
};

/// Which panes exist for a scroll configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneArrangement {
    /// One table inside the content wrapper
    Single,
    /// Header and body rendered as separate tables
    FixedHeader,
}

impl PaneArrangement {
    pub fn from_config(scroll: &ScrollConfig) -> Self {
        if scroll.fixed_header() {
            PaneArrangement::FixedHeader
        } else {
            PaneArrangement::Single
        }
    }

    /// Pane that scrolls natively and receives imperative scroll calls.
    pub fn scroll_owner(self) -> PaneId {
        match self {
            PaneArrangement::Single => PaneId::Content,
            PaneArrangement::FixedHeader => PaneId::Body,
        }
    }

    /// Panes in this arrangement with their default roles.
    pub fn panes(self) -> Vec<(PaneId, PaneRole)> {
        let ids: &[PaneId] = match self {
            PaneArrangement::Single => &[PaneId::Content],
            PaneArrangement::FixedHeader => &[PaneId::Header, PaneId::Body, PaneId::Footer],
        };
        ids.iter().map(|&id| (id, PaneRole::for_pane(id))).collect()
    }
}

/// Styles for every element the core is responsible for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneStyles {
    pub table: StyleDecl,
    pub content: StyleDecl,
    pub header: StyleDecl,
    pub body: StyleDecl,
}

impl PaneStyles {
    pub fn for_pane(&self, pane: PaneId) -> &StyleDecl {
        match pane {
            PaneId::Content => &self.content,
            PaneId::Header | PaneId::Footer => &self.header,
            PaneId::Body => &self.body,
        }
    }
}

/// Derive pane styles from the scroll config and current layout.
pub fn plan_styles(
    scroll: &ScrollConfig,
    layout: &LayoutResult,
    columns: &[ColumnDescriptor],
    has_data: bool,
) -> PaneStyles {
    let mut styles = PaneStyles::default();

    styles.table.table_layout = Some(table_layout(scroll, layout, columns));

    if let Some(x) = scroll.x {
        styles.table.width = Some(match x {
            ScrollX::Auto => CssSize::Auto,
            ScrollX::Width(w) => CssSize::Px(w),
            ScrollX::MaxContent => CssSize::MaxContent,
        });
        styles.table.min_width = Some(CssSize::Full);
    }

    match (scroll.x.is_some(), scroll.y) {
        (true, None) => {
            styles.content.overflow_x = Some(Overflow::Auto);
            styles.content.overflow_y = Some(Overflow::Hidden);
        }
        (horizontal, Some(height)) => {
            styles.header.overflow = Some(Overflow::Hidden);
            styles.body.max_height = Some(CssSize::Px(height));
            // Scrollbar gutter stays reserved whenever rows exist
            styles.body.overflow_y = Some(if has_data {
                Overflow::Scroll
            } else {
                Overflow::Auto
            });
            if horizontal {
                styles.body.overflow_x = Some(Overflow::Auto);
            }
        }
        (false, None) => {}
    }

    styles
}

fn table_layout(
    scroll: &ScrollConfig,
    layout: &LayoutResult,
    columns: &[ColumnDescriptor],
) -> TableLayout {
    if scroll.horizontal() && layout.has_fixed() {
        if scroll.x == Some(ScrollX::MaxContent) {
            TableLayout::Auto
        } else {
            TableLayout::Fixed
        }
    } else if scroll.fixed_header() || columns.iter().any(|c| c.ellipsis) {
        TableLayout::Fixed
    } else {
        TableLayout::Auto
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::layout::ColumnLayoutEngine;
    use crate::types::FixedSide;

    fn plan(scroll: ScrollConfig, columns: &[ColumnDescriptor], has_data: bool) -> PaneStyles {
        let layout = ColumnLayoutEngine::new().compute(columns, &scroll, None);
        plan_styles(&scroll, &layout, columns, has_data)
    }

    #[test]
    fn test_no_scroll_leaves_panes_alone() {
        let styles = plan(ScrollConfig::default(), &[ColumnDescriptor::new("a")], true);
        assert!(styles.content.is_empty());
        assert!(styles.body.is_empty());
        assert_eq!(styles.table.width, None);
        assert_eq!(styles.table.table_layout, Some(TableLayout::Auto));
    }

    #[test]
    fn test_empty_body_does_not_reserve_scrollbar() {
        let styles = plan(ScrollConfig::new(None, Some(300.0)), &[], false);
        assert_eq!(styles.body.overflow_y, Some(Overflow::Auto));
        assert_eq!(styles.body.max_height, Some(CssSize::Px(300.0)));
    }

    #[test]
    fn test_fixed_columns_force_fixed_table_layout() {
        let columns = vec![
            ColumnDescriptor::new("a").with_width(50.0).fixed(FixedSide::Left),
            ColumnDescriptor::new("b"),
        ];
        let styles = plan(ScrollConfig::new(Some(ScrollX::Auto), None), &columns, true);
        assert_eq!(styles.table.table_layout, Some(TableLayout::Fixed));

        let styles = plan(
            ScrollConfig::new(Some(ScrollX::MaxContent), None),
            &columns,
            true,
        );
        assert_eq!(styles.table.table_layout, Some(TableLayout::Auto));
        assert_eq!(styles.table.width, Some(CssSize::MaxContent));
    }

    #[test]
    fn test_ellipsis_forces_fixed_table_layout() {
        let columns = vec![ColumnDescriptor::new("a").with_ellipsis()];
        let styles = plan(ScrollConfig::default(), &columns, true);
        assert_eq!(styles.table.table_layout, Some(TableLayout::Fixed));
    }

    #[test]
    fn test_arrangement_scroll_owner() {
        assert_eq!(
            PaneArrangement::from_config(&ScrollConfig::new(Some(ScrollX::Auto), None))
                .scroll_owner(),
            PaneId::Content
        );
        assert_eq!(
            PaneArrangement::from_config(&ScrollConfig::new(None, Some(100.0))).scroll_owner(),
            PaneId::Body
        );
    }
}
