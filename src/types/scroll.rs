//! Scroll position, viewport metrics and scroll request types

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GridError, Result};

/// Offsets closer than this are considered equal (sub-pixel noise from the DOM).
pub const SCROLL_EPSILON: f64 = 0.01;

/// Clamp one scroll axis to `[0, max]`. NaN collapses to 0.
pub fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max.max(0.0))
}

/// True when two offsets are the same for scrolling purposes.
pub fn same_offset(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCROLL_EPSILON
}

/// A scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

/// Shared scroll offset of the grid in content pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub left: f64,
    pub top: f64,
}

impl ScrollPosition {
    pub const ORIGIN: ScrollPosition = ScrollPosition {
        left: 0.0,
        top: 0.0,
    };

    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Clamp both axes into `bounds`.
    #[must_use]
    pub fn clamped(self, bounds: ScrollBounds) -> Self {
        Self {
            left: clamp_axis(self.left, bounds.max_left),
            top: clamp_axis(self.top, bounds.max_top),
        }
    }

    /// Compare with [`SCROLL_EPSILON`] tolerance.
    pub fn same_as(&self, other: &ScrollPosition) -> bool {
        same_offset(self.left, other.left) && same_offset(self.top, other.top)
    }
}

/// Upper scroll limits per axis (lower limits are always 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollBounds {
    pub max_left: f64,
    pub max_top: f64,
}

impl ScrollBounds {
    /// Limits before any metrics are known: only the lower bound applies.
    pub const UNBOUNDED: ScrollBounds = ScrollBounds {
        max_left: f64::INFINITY,
        max_top: f64::INFINITY,
    };
}

/// Geometry of the scroll owner as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportMetrics {
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

impl ViewportMetrics {
    pub fn new(client_width: f64, client_height: f64, scroll_width: f64, scroll_height: f64) -> Self {
        Self {
            client_width,
            client_height,
            scroll_width,
            scroll_height,
        }
    }

    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn bounds(&self) -> ScrollBounds {
        ScrollBounds {
            max_left: self.max_scroll_left(),
            max_top: self.max_scroll_top(),
        }
    }

    /// Content is wider than the viewport.
    pub fn horizontal_active(&self) -> bool {
        self.max_scroll_left() > SCROLL_EPSILON
    }

    /// Content is taller than the viewport.
    pub fn vertical_active(&self) -> bool {
        self.max_scroll_top() > SCROLL_EPSILON
    }
}

/// How the native scroll primitive should animate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
    Instant,
}

/// Caller intent for `scroll_to`.
///
/// A pixel `top` wins over `key`/`index`; `key` wins over `index`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Added to the resolved row top when scrolling to a key or index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default)]
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    pub fn top(top: f64) -> Self {
        Self {
            top: Some(top),
            ..Self::default()
        }
    }

    pub fn left(left: f64) -> Self {
        Self {
            left: Some(left),
            ..Self::default()
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn index(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Pixel `top`, ignoring NaN.
    pub fn pixel_top(&self) -> Option<f64> {
        self.top.filter(|t| !t.is_nan())
    }

    /// Pixel `left`, ignoring NaN.
    pub fn pixel_left(&self) -> Option<f64> {
        self.left.filter(|l| !l.is_nan())
    }
}

/// Horizontal scroll mode (`scroll.x`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollX {
    /// `x: true` - CSS-driven horizontal scroll, table width `auto`
    Auto,
    /// `x: N` - table width pinned to `N` pixels
    Width(f64),
    /// `x: "max-content"` - table as wide as its widest content
    MaxContent,
}

impl ScrollX {
    pub fn pixel_width(self) -> Option<f64> {
        match self {
            ScrollX::Width(w) => Some(w),
            ScrollX::Auto | ScrollX::MaxContent => None,
        }
    }
}

impl Serialize for ScrollX {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ScrollX::Auto => serializer.serialize_bool(true),
            ScrollX::Width(w) => serializer.serialize_f64(*w),
            ScrollX::MaxContent => serializer.serialize_str("max-content"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScrollX {
    Flag(bool),
    Width(f64),
    Keyword(String),
}

fn deserialize_scroll_x<'de, D>(deserializer: D) -> std::result::Result<Option<ScrollX>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawScrollX>::deserialize(deserializer)? {
        None | Some(RawScrollX::Flag(false)) => Ok(None),
        Some(RawScrollX::Flag(true)) => Ok(Some(ScrollX::Auto)),
        Some(RawScrollX::Width(w)) if w.is_finite() && w >= 0.0 => Ok(Some(ScrollX::Width(w))),
        Some(RawScrollX::Width(w)) => Err(D::Error::custom(format!(
            "scroll.x must be a finite, non-negative width, got {w}"
        ))),
        Some(RawScrollX::Keyword(k)) if k == "max-content" => Ok(Some(ScrollX::MaxContent)),
        Some(RawScrollX::Keyword(k)) => Err(D::Error::custom(format!(
            "unsupported scroll.x keyword {k:?}"
        ))),
    }
}

fn deserialize_scroll_y<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(h) if !h.is_finite() || h < 0.0 => Err(D::Error::custom(format!(
            "scroll.y must be a finite, non-negative height, got {h}"
        ))),
        other => Ok(other),
    }
}

/// The `scroll` prop of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(
        default,
        deserialize_with = "deserialize_scroll_x",
        skip_serializing_if = "Option::is_none"
    )]
    pub x: Option<ScrollX>,
    #[serde(
        default,
        deserialize_with = "deserialize_scroll_y",
        skip_serializing_if = "Option::is_none"
    )]
    pub y: Option<f64>,
}

impl ScrollConfig {
    pub fn new(x: Option<ScrollX>, y: Option<f64>) -> Self {
        Self { x, y }
    }

    /// Horizontal scrolling is configured.
    pub fn horizontal(&self) -> bool {
        self.x.is_some()
    }

    /// The header is split from the body and the body scrolls vertically.
    pub fn fixed_header(&self) -> bool {
        self.y.is_some()
    }

    /// Check values set in code; deserialization already rejects these.
    ///
    /// # Errors
    /// Returns [`GridError::ScrollConfig`] for a negative or non-finite size.
    pub fn validate(&self) -> Result<()> {
        if let Some(w) = self.x.and_then(ScrollX::pixel_width) {
            if !w.is_finite() || w < 0.0 {
                return Err(GridError::ScrollConfig(format!("x = {w}")));
            }
        }
        if let Some(h) = self.y {
            if !h.is_finite() || h < 0.0 {
                return Err(GridError::ScrollConfig(format!("y = {h}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(-5.0, 100.0), 0.0);
        assert_eq!(clamp_axis(150.0, 100.0), 100.0);
        assert_eq!(clamp_axis(f64::NAN, 100.0), 0.0);
        assert_eq!(clamp_axis(f64::INFINITY, 100.0), 100.0);
        // Negative max (content smaller than viewport) pins to zero
        assert_eq!(clamp_axis(10.0, -20.0), 0.0);
    }

    #[test]
    fn test_metrics_bounds() {
        let metrics = ViewportMetrics::new(100.0, 50.0, 200.0, 40.0);
        assert_eq!(metrics.max_scroll_left(), 100.0);
        assert_eq!(metrics.max_scroll_top(), 0.0);
        assert!(metrics.horizontal_active());
        assert!(!metrics.vertical_active());
    }

    #[test]
    fn test_scroll_config_deserialize() {
        let config: ScrollConfig = serde_json::from_str(r#"{"x":true,"y":200}"#).unwrap();
        assert_eq!(config.x, Some(ScrollX::Auto));
        assert_eq!(config.y, Some(200.0));

        let config: ScrollConfig = serde_json::from_str(r#"{"x":320}"#).unwrap();
        assert_eq!(config.x, Some(ScrollX::Width(320.0)));
        assert_eq!(config.y, None);

        let config: ScrollConfig = serde_json::from_str(r#"{"x":"max-content"}"#).unwrap();
        assert_eq!(config.x, Some(ScrollX::MaxContent));

        let config: ScrollConfig = serde_json::from_str(r#"{"x":false}"#).unwrap();
        assert_eq!(config.x, None);
    }

    #[test]
    fn test_scroll_config_rejects_bad_values() {
        assert!(serde_json::from_str::<ScrollConfig>(r#"{"x":-10}"#).is_err());
        assert!(serde_json::from_str::<ScrollConfig>(r#"{"x":"wide"}"#).is_err());
        assert!(serde_json::from_str::<ScrollConfig>(r#"{"y":-1}"#).is_err());
    }

    #[test]
    fn test_validate_programmatic_config() {
        assert!(ScrollConfig::new(Some(ScrollX::Width(200.0)), Some(300.0))
            .validate()
            .is_ok());
        assert!(ScrollConfig::new(Some(ScrollX::Width(f64::NAN)), None)
            .validate()
            .is_err());
        assert!(matches!(
            ScrollConfig::new(None, Some(-5.0)).validate(),
            Err(GridError::ScrollConfig(_))
        ));
    }

    #[test]
    fn test_scroll_x_serializes_like_prop() {
        let config = ScrollConfig::new(Some(ScrollX::Auto), Some(200.0));
        assert_eq!(
            serde_json::to_value(config).unwrap(),
            serde_json::json!({"x": true, "y": 200.0})
        );
    }

    #[test]
    fn test_request_from_json() {
        let request: ScrollRequest =
            serde_json::from_str(r#"{"key":"row-3","offset":-8,"behavior":"smooth"}"#).unwrap();
        assert_eq!(request.key.as_deref(), Some("row-3"));
        assert_eq!(request.offset, Some(-8.0));
        assert_eq!(request.behavior, ScrollBehavior::Smooth);
        assert_eq!(request.pixel_top(), None);
    }
}
