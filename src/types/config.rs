//! Grid configuration consumed by the scroll core.

use serde::{Deserialize, Serialize};

use super::column::{validate_columns, ColumnDescriptor};
use super::scroll::ScrollConfig;
use crate::error::Result;

/// Text of the placeholder row shown when there is no data.
pub const DEFAULT_EMPTY_TEXT: &str = "No Data";

fn default_empty_text() -> String {
    DEFAULT_EMPTY_TEXT.to_string()
}

/// Everything the core needs from the column/prop layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default = "default_empty_text")]
    pub empty_text: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            scroll: ScrollConfig::default(),
            empty_text: default_empty_text(),
        }
    }
}

impl GridConfig {
    pub fn new(columns: Vec<ColumnDescriptor>, scroll: ScrollConfig) -> Self {
        Self {
            columns,
            scroll,
            empty_text: default_empty_text(),
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or an invalid column list.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns an error if column keys repeat, a width is invalid or the
    /// scroll sizes are out of range.
    pub fn validate(&self) -> Result<()> {
        validate_columns(&self.columns)?;
        self.scroll.validate()
    }
}
