//! Body content plan: data rows or the empty placeholder row.

use serde::Serialize;

use crate::types::{CssSize, Overflow, Position, ScrollConfig, StyleDecl, ViewportMetrics};

/// Placeholder row rendered when there is no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyPlaceholder {
    pub text: String,
    /// The placeholder cell spans every column
    pub col_span: usize,
    /// Pinned to the viewport instead of scrolling with wide content
    pub sticky: bool,
    pub style: StyleDecl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BodyContent {
    Rows { count: usize },
    Placeholder(EmptyPlaceholder),
}

impl BodyContent {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, BodyContent::Placeholder(_))
    }
}

/// Decide what the body renders.
///
/// With horizontal scroll enabled the placeholder is sized to the viewport
/// and made sticky so "No Data" stays visible however wide the columns are.
pub fn plan_body(
    row_count: usize,
    column_count: usize,
    scroll: &ScrollConfig,
    metrics: Option<&ViewportMetrics>,
    empty_text: &str,
) -> BodyContent {
    if row_count > 0 {
        return BodyContent::Rows { count: row_count };
    }

    let sticky = scroll.horizontal();
    let style = if sticky {
        StyleDecl {
            position: Some(Position::Sticky),
            left: Some(CssSize::Px(0.0)),
            width: metrics.map(|m| CssSize::Px(m.client_width)),
            overflow: Some(Overflow::Hidden),
            ..StyleDecl::default()
        }
    } else {
        StyleDecl::default()
    };

    BodyContent::Placeholder(EmptyPlaceholder {
        text: empty_text.to_string(),
        col_span: column_count.max(1),
        sticky,
        style,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::ScrollX;

    #[test]
    fn test_rows_when_data_present() {
        let body = plan_body(3, 2, &ScrollConfig::default(), None, "No Data");
        assert_eq!(body, BodyContent::Rows { count: 3 });
    }

    #[test]
    fn test_plain_placeholder_without_horizontal_scroll() {
        let BodyContent::Placeholder(p) = plan_body(0, 0, &ScrollConfig::default(), None, "Empty")
        else {
            panic!("expected placeholder");
        };
        assert_eq!(p.text, "Empty");
        assert_eq!(p.col_span, 1);
        assert!(!p.sticky);
        assert!(p.style.is_empty());
    }

    #[test]
    fn test_sticky_placeholder_uses_viewport_width() {
        let metrics = ViewportMetrics::new(320.0, 200.0, 900.0, 200.0);
        let BodyContent::Placeholder(p) = plan_body(
            0,
            4,
            &ScrollConfig::new(Some(ScrollX::Auto), None),
            Some(&metrics),
            "No Data",
        ) else {
            panic!("expected placeholder");
        };
        assert!(p.sticky);
        assert_eq!(p.col_span, 4);
        assert_eq!(p.style.width, Some(CssSize::Px(320.0)));
        assert_eq!(p.style.position, Some(Position::Sticky));
    }
}
