//! CSS values emitted for the grid's panes.
//!
//! Lengths serialize the way the rendering layer consumes them: pixel values
//! stay numbers (`200`), keywords stay strings (`"auto"`).

use serde::{Serialize, Serializer};

/// A CSS length or sizing keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssSize {
    Auto,
    MaxContent,
    /// `100%`
    Full,
    Px(f64),
}

impl CssSize {
    /// Value as written into a style declaration.
    pub fn to_css(self) -> String {
        match self {
            CssSize::Auto => "auto".to_string(),
            CssSize::MaxContent => "max-content".to_string(),
            CssSize::Full => "100%".to_string(),
            CssSize::Px(px) => format!("{px}px"),
        }
    }
}

impl Serialize for CssSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CssSize::Px(px) => serializer.serialize_f64(*px),
            CssSize::Auto => serializer.serialize_str("auto"),
            CssSize::MaxContent => serializer.serialize_str("max-content"),
            CssSize::Full => serializer.serialize_str("100%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Auto,
    Hidden,
    Scroll,
    Visible,
}

impl Overflow {
    pub fn as_str(self) -> &'static str {
        match self {
            Overflow::Auto => "auto",
            Overflow::Hidden => "hidden",
            Overflow::Scroll => "scroll",
            Overflow::Visible => "visible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    Auto,
    Fixed,
}

impl TableLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            TableLayout::Auto => "auto",
            TableLayout::Fixed => "fixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Sticky,
}

/// Inline style of one element. Unset properties are left to the stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<CssSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<CssSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<CssSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_x: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_y: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_layout: Option<TableLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<CssSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<CssSize>,
}

impl StyleDecl {
    pub fn is_empty(&self) -> bool {
        *self == StyleDecl::default()
    }

    /// Kebab-case property/value pairs for `CSSStyleDeclaration.setProperty`.
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let mut props = Vec::new();
        if let Some(v) = self.width {
            props.push(("width", v.to_css()));
        }
        if let Some(v) = self.min_width {
            props.push(("min-width", v.to_css()));
        }
        if let Some(v) = self.max_height {
            props.push(("max-height", v.to_css()));
        }
        if let Some(v) = self.overflow {
            props.push(("overflow", v.as_str().to_string()));
        }
        if let Some(v) = self.overflow_x {
            props.push(("overflow-x", v.as_str().to_string()));
        }
        if let Some(v) = self.overflow_y {
            props.push(("overflow-y", v.as_str().to_string()));
        }
        if let Some(v) = self.table_layout {
            props.push(("table-layout", v.as_str().to_string()));
        }
        if self.position == Some(Position::Sticky) {
            props.push(("position", "sticky".to_string()));
        }
        if let Some(v) = self.left {
            props.push(("left", v.to_css()));
        }
        if let Some(v) = self.right {
            props.push(("right", v.to_css()));
        }
        props
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_px_serializes_as_number() {
        assert_eq!(
            serde_json::to_value(CssSize::Px(200.0)).unwrap(),
            serde_json::json!(200.0)
        );
        assert_eq!(
            serde_json::to_value(CssSize::Auto).unwrap(),
            serde_json::json!("auto")
        );
    }

    #[test]
    fn test_decl_skips_unset() {
        let decl = StyleDecl {
            overflow_x: Some(Overflow::Auto),
            overflow_y: Some(Overflow::Hidden),
            ..StyleDecl::default()
        };
        assert_eq!(
            serde_json::to_value(&decl).unwrap(),
            serde_json::json!({"overflowX": "auto", "overflowY": "hidden"})
        );
        assert_eq!(
            decl.css_properties(),
            vec![
                ("overflow-x", "auto".to_string()),
                ("overflow-y", "hidden".to_string())
            ]
        );
    }
}
