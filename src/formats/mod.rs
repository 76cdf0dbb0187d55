//! Output formats for the aggregated strings.
//!
//! This module re-exports the exporter of each format and provides the
//! [`ExportFormat`] enum for picking one at runtime.

pub mod android_strings;
pub mod strings;

use std::{
    fmt::{Display, Formatter},
    path::Path,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use strings::Format as StringsFormat;

use crate::{Error, traits::Exporter, types::AggregationStore};

/// The resource formats an [`AggregationStore`] can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Android `strings.xml`.
    AndroidStrings,
    /// Apple `.strings`.
    Strings,
}

/// Implements [`std::fmt::Display`] for [`ExportFormat`].
///
/// ```rust
/// use sheetres::formats::ExportFormat;
/// assert_eq!(ExportFormat::AndroidStrings.to_string(), "android");
/// assert_eq!(ExportFormat::Strings.to_string(), "ios");
/// ```
impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::AndroidStrings => write!(f, "android"),
            ExportFormat::Strings => write!(f, "ios"),
        }
    }
}

impl ExportFormat {
    /// Renders `store` with this format's exporter into any writer.
    pub fn process<W: std::io::Write>(
        &self,
        writer: W,
        store: &AggregationStore,
    ) -> Result<(), Error> {
        match self {
            ExportFormat::AndroidStrings => AndroidStringsFormat.process(writer, store),
            ExportFormat::Strings => StringsFormat.process(writer, store),
        }
    }

    /// Renders `store` with this format's exporter into the file at `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, store: &AggregationStore) -> Result<(), Error> {
        match self {
            ExportFormat::AndroidStrings => AndroidStringsFormat.write_to(path, store),
            ExportFormat::Strings => StringsFormat.write_to(path, store),
        }
    }
}
