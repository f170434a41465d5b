//! Pipeline configuration
//!
//! Input paths are configuration, never hard-coded. A JSON config file can
//! supply everything; CLI flags override individual fields.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Headerless delimited product catalog file
    pub product_path: PathBuf,

    /// Headerless delimited order file
    pub orders_path: PathBuf,

    /// Field separator used by both input files
    #[serde(default = "default_separator")]
    pub separator: char,

    /// When set, reports are written as CSV files into this directory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_separator() -> char {
    ','
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            product_path: PathBuf::from("data/product.txt"),
            orders_path: PathBuf::from("data/order.txt"),
            separator: default_separator(),
            output_dir: None,
        }
    }
}

impl PipelineConfig {
    pub fn new(product_path: impl Into<PathBuf>, orders_path: impl Into<PathBuf>) -> Self {
        Self {
            product_path: product_path.into(),
            orders_path: orders_path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            AnalyticsError::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The separator as a single byte. The CSV readers only accept ASCII.
    pub fn separator_byte(&self) -> Result<u8> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(AnalyticsError::Config(format!(
                "separator must be a single ASCII character, got {:?}",
                self.separator
            )))
        }
    }
}
