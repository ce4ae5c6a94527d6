//! Runtime settings and saved filter criteria.

use anyhow::{Context, Result};
use std::path::Path;

use crate::filter::FilterCriteria;

pub const DEFAULT_API_URL: &str = "https://labdados.com/produtos";
pub const DEFAULT_LOG_FILE: &str = "logs/sales_dashboard.log";

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub log_file_path: String,
}

impl Settings {
    /// Reads `SALES_API_URL` and `LOG_FILE_PATH`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("SALES_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            log_file_path: non_empty("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }
}

impl FilterCriteria {
    /// Loads criteria from a JSON file. Omitted fields leave that criterion unset:
    /// ```json
    /// {
    ///   "sellers": ["Ana Costa", "Pedro Gomes"],
    ///   "price": { "min": 0, "max": 5000 },
    ///   "purchase_date": { "min": "2021-01-01", "max": "2021-12-31" }
    /// }
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read filter file {}", path.display()))?;
        let criteria = serde_json::from_str(&content)
            .with_context(|| format!("invalid filter file {}", path.display()))?;
        Ok(criteria)
    }
}
