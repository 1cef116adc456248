//! Structured error types for gridscroll.
//!
//! Only configuration and serialization boundaries are fallible. The scroll
//! path itself clamps and logs instead of returning errors.

/// All errors that can occur while configuring or driving the grid core.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two columns share the same key.
    #[error("Duplicate column key: {0}")]
    DuplicateColumnKey(String),

    /// A declared column width is negative or not finite.
    #[error("Invalid width {width} for column {key}")]
    InvalidColumnWidth {
        /// Key of the offending column.
        key: String,
        /// The rejected width.
        width: f64,
    },

    /// A `scroll.x` / `scroll.y` value that cannot be honored.
    #[error("Invalid scroll config: {0}")]
    ScrollConfig(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JS value conversion failure on the wasm side.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for GridError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Other(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
