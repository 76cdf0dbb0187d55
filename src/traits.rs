use calamine::{Data, DataType, Range};

use crate::{error::Error, types::AggregationStore};

/// Random access to the cells of one worksheet.
///
/// Indices are zero-based and absolute, i.e. row 0 is the first row of the
/// sheet regardless of where the used area starts.
pub trait SheetSource {
    /// Index of the last row holding any content, `None` for an empty sheet.
    fn last_row(&self) -> Option<u32>;

    /// Whether the row exists, i.e. holds at least one non-empty cell.
    fn has_row(&self, row: u32) -> bool;

    fn cell(&self, row: u32, column: u32) -> Option<&Data>;
}

impl SheetSource for Range<Data> {
    fn last_row(&self) -> Option<u32> {
        self.end().map(|(row, _)| row)
    }

    fn has_row(&self, row: u32) -> bool {
        let (Some((first_row, first_col)), Some((last_row, last_col))) =
            (self.start(), self.end())
        else {
            return false;
        };
        if row < first_row || row > last_row {
            return false;
        }
        (first_col..=last_col).any(|col| {
            self.get_value((row, col))
                .is_some_and(|cell| !cell.is_empty())
        })
    }

    fn cell(&self, row: u32, column: u32) -> Option<&Data> {
        self.get_value((row, column))
    }
}

/// Renders an [`AggregationStore`] into a platform resource file.
pub trait Exporter {
    /// Write the whole store to any writer (file, memory, etc.).
    fn process<W: std::io::Write>(&self, writer: W, store: &AggregationStore)
    -> Result<(), Error>;

    /// Write the whole store to a file path, replacing its content.
    fn write_to<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        store: &AggregationStore,
    ) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.process(&mut writer, store)?;
        std::io::Write::flush(&mut writer)?;
        Ok(())
    }
}
