//! Spreadsheet access through calamine (xls, xlsx, xlsb and ods).
//!
//! Formula cells come back with their stored results; formulas stored without
//! a computed result are evaluated in [`crate::formula`].

use std::{fs::File, io::BufReader, path::Path};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use tracing::{debug, warn};

use crate::{error::Error, formula::evaluate_formulas};

/// An open workbook. Dropping it releases the file handle.
pub struct Workbook {
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.sheet_names().len()
    }

    /// Reads the sheet at zero-based `index`.
    ///
    /// The bound check admits `index == sheet_count()`, matching the historical
    /// behaviour of the tool; such an index then fails with
    /// [`Error::SheetNotFound`].
    pub fn sheet(&mut self, index: usize) -> Result<Range<Data>, Error> {
        let count = self.sheet_count();
        if !sheet_index_admitted(index, count) {
            return Err(Error::SheetIndexOutOfRange {
                index: index as i64,
                count,
            });
        }
        let mut values = match self.sheets.worksheet_range_at(index) {
            Some(range) => range?,
            None => return Err(Error::SheetNotFound(index)),
        };
        let Some(name) = self.sheets.sheet_names().get(index).cloned() else {
            return Err(Error::SheetNotFound(index));
        };

        match self.sheets.worksheet_formula(&name) {
            Ok(formulas) => {
                let evaluated = evaluate_formulas(&mut values, &formulas);
                if evaluated > 0 {
                    debug!(sheet = %name, "Evaluated {} formula cell(s)", evaluated);
                }
            }
            Err(e) => warn!(sheet = %name, "Cannot read formulas: {}", e),
        }
        Ok(values)
    }
}

pub fn sheet_index_admitted(index: usize, count: usize) -> bool {
    index <= count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_index_bound_admits_one_past_last() {
        assert!(sheet_index_admitted(0, 2));
        assert!(sheet_index_admitted(1, 2));
        assert!(sheet_index_admitted(2, 2));
        assert!(!sheet_index_admitted(3, 2));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workbook::open(dir.path().join("missing.xlsx"));
        assert!(matches!(result, Err(Error::Workbook(_))));
    }

    #[test]
    fn test_open_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wording.txt");
        std::fs::write(&path, "not a spreadsheet").unwrap();
        assert!(Workbook::open(path).is_err());
    }
}
