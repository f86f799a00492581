//! Configuration loader and validator for the blog audit tool.
//!
//! Every field has a default matching the Blogger export format and the
//! review ledger layout, so a config file is only needed to override them.
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::sheet;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub blog: BlogConfig,
    pub ledger: LedgerConfig,
}

/// Feed-side settings: the host reviews live on and the Atom category
/// schemes the classifier keys on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BlogConfig {
    pub host: String,
    pub kind_scheme: String,
    pub kind_term_prefix: String,
    pub label_scheme: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            host: "www.rocketstackrank.com".to_string(),
            kind_scheme: "http://schemas.google.com/g/2005#kind".to_string(),
            kind_term_prefix: "http://schemas.google.com/blogger/2008/kind".to_string(),
            label_scheme: "http://www.blogger.com/atom/ns#".to_string(),
        }
    }
}

/// Spreadsheet-side settings: where data rows start, which columns hold
/// which fields, and the year before which a story counts as a reprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    pub reprint_cutoff: i32,
    pub first_data_row: usize,
    pub columns: ColumnMap,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            // First year the blog covered; earlier years in the sheet are
            // the reprint encoding, not real publication years.
            reprint_cutoff: 2015,
            first_data_row: 3,
            columns: ColumnMap::default(),
        }
    }
}

/// Spreadsheet column letters for each ledger field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMap {
    pub title: String,
    pub year: String,
    pub blog_title: String,
    pub blog_labels: String,
    pub blogger_link: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            title: "A".to_string(),
            year: "H".to_string(),
            blog_title: "AE".to_string(),
            blog_labels: "AF".to_string(),
            blogger_link: "AT".to_string(),
        }
    }
}

/// Load configuration from a YAML file and validate it.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.blog.host.trim().is_empty() {
        return Err(ConfigError::Invalid("blog.host must be non-empty"));
    }
    if cfg.blog.kind_scheme.trim().is_empty() {
        return Err(ConfigError::Invalid("blog.kind_scheme must be non-empty"));
    }
    if cfg.blog.kind_term_prefix.trim().is_empty() {
        return Err(ConfigError::Invalid("blog.kind_term_prefix must be non-empty"));
    }
    if cfg.blog.label_scheme.trim().is_empty() {
        return Err(ConfigError::Invalid("blog.label_scheme must be non-empty"));
    }

    if !(1000..=9999).contains(&cfg.ledger.reprint_cutoff) {
        return Err(ConfigError::Invalid("ledger.reprint_cutoff must be a four-digit year"));
    }
    if cfg.ledger.reprint_cutoff > Utc::now().year() {
        return Err(ConfigError::Invalid("ledger.reprint_cutoff must not be in the future"));
    }
    if cfg.ledger.first_data_row == 0 {
        return Err(ConfigError::Invalid("ledger.first_data_row must be >= 1"));
    }

    let cols = &cfg.ledger.columns;
    if sheet::column_index(&cols.title).is_none() {
        return Err(ConfigError::Invalid("ledger.columns.title must be a column letter"));
    }
    if sheet::column_index(&cols.year).is_none() {
        return Err(ConfigError::Invalid("ledger.columns.year must be a column letter"));
    }
    if sheet::column_index(&cols.blog_title).is_none() {
        return Err(ConfigError::Invalid("ledger.columns.blog_title must be a column letter"));
    }
    if sheet::column_index(&cols.blog_labels).is_none() {
        return Err(ConfigError::Invalid("ledger.columns.blog_labels must be a column letter"));
    }
    if sheet::column_index(&cols.blogger_link).is_none() {
        return Err(ConfigError::Invalid("ledger.columns.blogger_link must be a column letter"));
    }

    Ok(())
}

/// Returns an example YAML config spelling out every default.
pub fn example() -> &'static str {
    r#"blog:
  host: "www.rocketstackrank.com"
  kind_scheme: "http://schemas.google.com/g/2005#kind"
  kind_term_prefix: "http://schemas.google.com/blogger/2008/kind"
  label_scheme: "http://www.blogger.com/atom/ns#"

ledger:
  # Stories first published before this year are reprints and are not
  # expected to have a blog review.
  reprint_cutoff: 2015
  first_data_row: 3
  columns:
    title: "A"
    year: "H"
    blog_title: "AE"
    blog_labels: "AF"
    blogger_link: "AT"
"#
}
