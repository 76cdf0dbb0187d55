//! Extraction entries, as written in the JSON configuration file and as
//! validated for the extractor.
//!
//! ```json
//! [
//!     {
//!         "fileName": "wording.xlsx",
//!         "sheet": 0,
//!         "rowStart": 2,
//!         "rowEnd": -1,
//!         "columnKey": "A",
//!         "columnValue": "C",
//!         "groupBy": "B"
//!     }
//! ]
//! ```

use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{cell::column_index, error::Error};

/// `rowEnd` value meaning "through the last populated row".
pub const ALL_ROWS: i64 = -1;

fn default_row_start() -> i64 {
    1
}

fn default_row_end() -> i64 {
    ALL_ROWS
}

fn default_column_key() -> String {
    "A".to_string()
}

fn default_column_value() -> String {
    "B".to_string()
}

/// One entry of the configuration file, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryConfig {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub sheet: i64,
    #[serde(default = "default_row_start")]
    pub row_start: i64,
    #[serde(default = "default_row_end")]
    pub row_end: i64,
    #[serde(default = "default_column_key")]
    pub column_key: String,
    #[serde(default = "default_column_value")]
    pub column_value: String,
    #[serde(default)]
    pub group_by: Option<String>,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            file_name: None,
            sheet: 0,
            row_start: default_row_start(),
            row_end: default_row_end(),
            column_key: default_column_key(),
            column_value: default_column_value(),
            group_by: None,
        }
    }
}

/// Last row of an entry's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEnd {
    /// Read through the sheet's last populated row.
    All,
    /// 1-based inclusive last row.
    Through(u32),
}

/// A key, value or group column, keeping the reference as written for log messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub reference: String,
    pub index: u32,
}

impl Column {
    pub fn parse(reference: &str) -> Result<Self, Error> {
        Ok(Self {
            reference: reference.to_string(),
            index: column_index(reference)?,
        })
    }
}

/// A validated extraction job.
///
/// The sheet index is only checked for sign here; the upper bound needs the
/// opened workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
    pub source_file: PathBuf,
    pub sheet_index: usize,
    /// 1-based first row. Values below 1 are kept; those rows never exist and
    /// are skipped without being visited.
    pub row_start: i64,
    pub row_end: RowEnd,
    pub column_key: Column,
    pub column_value: Column,
    pub group_by: Option<Column>,
}

impl TryFrom<&EntryConfig> for EntrySpec {
    type Error = Error;

    fn try_from(config: &EntryConfig) -> Result<Self, Self::Error> {
        let source_file = match config.file_name.as_deref() {
            Some(name) if !name.trim().is_empty() => PathBuf::from(name),
            _ => return Err(Error::MissingSourceFile),
        };

        let sheet_index =
            usize::try_from(config.sheet).map_err(|_| Error::NegativeSheetIndex(config.sheet))?;

        let row_end = if config.row_end == ALL_ROWS {
            RowEnd::All
        } else if config.row_end < 0 || config.row_end < config.row_start {
            return Err(Error::InvalidRowRange {
                row_start: config.row_start,
                row_end: config.row_end,
            });
        } else {
            let row_end = u32::try_from(config.row_end).map_err(|_| Error::InvalidRowRange {
                row_start: config.row_start,
                row_end: config.row_end,
            })?;
            RowEnd::Through(row_end)
        };

        Ok(EntrySpec {
            source_file,
            sheet_index,
            row_start: config.row_start,
            row_end,
            column_key: Column::parse(&config.column_key)?,
            column_value: Column::parse(&config.column_value)?,
            group_by: config.group_by.as_deref().map(Column::parse).transpose()?,
        })
    }
}

/// Parse the configuration (a JSON array of entries) from any reader.
pub fn parse_config<R: BufRead>(reader: R) -> Result<Vec<EntryConfig>, Error> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    if !value.is_array() {
        return Err(Error::config_error(
            "expected a JSON array of entries at the top level",
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Load the configuration file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Vec<EntryConfig>, Error> {
    let file = std::fs::File::open(path)?;
    parse_config(std::io::BufReader::new(file))
}
