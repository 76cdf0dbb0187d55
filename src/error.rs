//! All error types for the sheetres crate.
//!
//! Entry-level variants are returned by the extraction pipeline so the caller
//! can log them and move on to the next entry; only configuration errors are
//! meant to stop a run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no spreadsheet file name given")]
    MissingSourceFile,

    #[error("invalid cell address `{0}`")]
    InvalidAddress(String),

    #[error("sheet index {0} not valid")]
    NegativeSheetIndex(i64),

    #[error("sheet index {index} not valid (workbook has {count} sheet(s))")]
    SheetIndexOutOfRange { index: i64, count: usize },

    #[error("sheet {0} does not exist")]
    SheetNotFound(usize),

    #[error("invalid row range: rowStart={row_start}, rowEnd={row_end}")]
    InvalidRowRange { row_start: i64, row_end: i64 },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
