#![forbid(unsafe_code)]
//! Extract localized strings from spreadsheets into platform string resources.
//!
//! A run is described by a list of entries, each pointing at a sheet and at the
//! columns holding keys, values and an optional group. Rows from all entries are
//! gathered into one [`AggregationStore`], which is then rendered as an Android
//! `strings.xml` and/or an Apple `.strings` file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetres::{ExportFormat, RunOptions, run};
//!
//! let options = RunOptions::default()
//!     .with_expand_group_by(true)
//!     .with_target(ExportFormat::AndroidStrings, "res/values/strings.xml")
//!     .with_target(ExportFormat::Strings, "en.lproj/Localizable.strings");
//! let summary = run("wording.json", &options)?;
//! println!("{} string(s) exported", summary.store.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Inputs
//!
//! Anything calamine reads: `.xls`, `.xlsx`, `.xlsm`, `.xlsb` and `.ods`.
//! Formula cells contribute their computed value; formulas saved without one
//! are evaluated.

pub mod cell;
pub mod config;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod formula;
pub mod pipeline;
pub mod traits;
pub mod types;
pub mod workbook;

// Re-export most used types for easy consumption
pub use crate::{
    cell::{CellReference, column_index, format_number, resolve_cell_value},
    config::{EntryConfig, EntrySpec, RowEnd, load_config, parse_config},
    error::Error,
    extractor::{ExtractionReport, RowExtractor},
    formats::ExportFormat,
    pipeline::{ExportTarget, RunOptions, RunSummary, aggregate, export_all, process_entry, run},
    traits::{Exporter, SheetSource},
    types::{AggregationStore, DEFAULT_GROUP, Group, KeyValuePair},
};
