//! Reader settings loadable from JSON.
//!
//! ```
//! use ironframe::ReaderConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ReaderConfig::from_json_str(
//!     r#"{ "has_header": true, "split_pattern": ",", "skip_columns": [0] }"#,
//! )?;
//! let reader = config.build()?;
//! let table = reader.read_str("id,a,b\n1,2,x\n", "inline")?;
//! assert_eq!(table.registry().names(), ["a", "b"]);
//! # Ok(())
//! # }
//! ```

use super::{ReaderOption, TableReader};
use crate::error::Result;
use crate::types::ColumnType;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable form of the reader options. Every field is optional; an
/// absent field leaves the reader default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub has_header: bool,
    pub skip_blank_lines: bool,
    pub permissive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_types: Option<Vec<ColumnType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_columns: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_errors: Option<usize>,
}

impl ReaderConfig {
    /// Parse a config from JSON text.
    ///
    /// # Errors
    /// Fails on malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parse reader config")
    }

    /// The equivalent option list, in a fixed order.
    #[must_use]
    pub fn into_options(self) -> Vec<ReaderOption> {
        let mut options = Vec::new();
        if self.has_header {
            options.push(ReaderOption::HasHeader);
        }
        if self.skip_blank_lines {
            options.push(ReaderOption::SkipBlankLines);
        }
        if self.permissive {
            options.push(ReaderOption::Permissive);
        }
        options.extend(self.column_names.map(ReaderOption::ColumnNames));
        options.extend(self.column_types.map(ReaderOption::ColumnTypes));
        options.extend(self.comment_pattern.map(ReaderOption::CommentPattern));
        options.extend(self.split_pattern.map(ReaderOption::SplitPattern));
        options.extend(self.skip_lines.map(ReaderOption::SkipLines));
        options.extend(self.sample_lines.map(ReaderOption::SampleLines));
        options.extend(self.skip_columns.map(ReaderOption::SkipColumns));
        options.extend(self.max_errors.map(ReaderOption::MaxErrors));
        options
    }

    /// Build a reader from this config.
    ///
    /// # Errors
    /// Any configuration error [`TableReader::new`] reports.
    pub fn build(self) -> Result<TableReader> {
        TableReader::new(self.into_options())
    }
}
