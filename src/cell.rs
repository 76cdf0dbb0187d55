//! Cell addressing and cell value normalization.
//!
//! Every downstream consumer reads spreadsheet content through
//! [`resolve_cell_value`]; nothing else looks at raw cell types.

use calamine::Data;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

lazy_static! {
    static ref CELL_REFERENCE_REGEX: Regex =
        Regex::new(r"^\$?([A-Za-z]+)(?:\$?([0-9]+))?$").unwrap();
}

/// A parsed A1-style reference such as `B`, `B12` or `$B$12`.
///
/// Both indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellReference {
    pub column: u32,
    pub row: Option<u32>,
}

impl CellReference {
    pub fn parse(reference: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAddress(reference.to_string());

        let captures = CELL_REFERENCE_REGEX
            .captures(reference.trim())
            .ok_or_else(invalid)?;

        let column = letters_to_index(&captures[1]).ok_or_else(invalid)?;
        let row = match captures.get(2) {
            Some(digits) => {
                let row = digits.as_str().parse::<u32>().map_err(|_| invalid())?;
                // Rows are 1-based in A1 notation.
                Some(row.checked_sub(1).ok_or_else(invalid)?)
            }
            None => None,
        };

        Ok(CellReference { column, row })
    }
}

/// Converts a column reference (`A`, `z`, `AA`, `C7`) into a zero-based column index.
pub fn column_index(reference: &str) -> Result<u32, Error> {
    CellReference::parse(reference).map(|r| r.column)
}

/// A=1, Z=26, AA=27, then shifted to zero-based.
fn letters_to_index(letters: &str) -> Option<u32> {
    let mut result: u32 = 0;
    for ch in letters.chars() {
        let value = (ch.to_ascii_uppercase() as u32).checked_sub('A' as u32)? + 1;
        result = result.checked_mul(26)?.checked_add(value)?;
    }
    result.checked_sub(1)
}

/// Normalizes a cell to the single string representation used everywhere else.
///
/// Formula cells arrive here already evaluated (see [`crate::formula`]); an
/// error result yields an empty string, as does an absent or blank cell.
pub fn resolve_cell_value(cell: Option<&Data>) -> String {
    match cell {
        None => String::new(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::Int(i)) => format_number(*i as f64),
        Some(Data::Float(f)) => format_number(*f),
        Some(Data::DateTime(dt)) => format_number(dt.as_f64()),
        Some(Data::String(s)) | Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => {
            s.clone()
        }
        // Error results, blanks and anything calamine adds later.
        Some(_) => String::new(),
    }
}

/// Renders a number the way spreadsheet tooling on the JVM does: a fraction is
/// always present, and magnitudes outside `[1e-3, 1e7)` switch to `d.dddE±n`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let magnitude = value.abs();
    if (1e-3..1e7).contains(&magnitude) {
        // Debug keeps the trailing `.0` on integral values.
        return format!("{:?}", value);
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{}E{}", mantissa, exponent)
    } else {
        format!("{}.0E{}", mantissa, exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_single_letter_columns() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("B").unwrap(), 1);
        assert_eq!(column_index("Z").unwrap(), 25);
    }

    #[test]
    fn test_multi_letter_columns() {
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index("AZ").unwrap(), 51);
        assert_eq!(column_index("BA").unwrap(), 52);
        assert_eq!(column_index("XFD").unwrap(), 16383);
    }

    #[test]
    fn test_lowercase_column() {
        assert_eq!(column_index("c").unwrap(), 2);
    }

    #[test]
    fn test_reference_with_row() {
        let reference = CellReference::parse("B12").unwrap();
        assert_eq!(reference.column, 1);
        assert_eq!(reference.row, Some(11));

        let absolute = CellReference::parse("$D$3").unwrap();
        assert_eq!(absolute.column, 3);
        assert_eq!(absolute.row, Some(2));
    }

    #[test]
    fn test_invalid_references() {
        for bad in ["", "12", "A-1", "Ä", "A B", "B0"] {
            assert!(
                matches!(column_index(bad), Err(Error::InvalidAddress(_))),
                "`{}` should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_overflowing_column_is_invalid() {
        assert!(column_index("ZZZZZZZZZZ").is_err());
    }

    #[test]
    fn test_absent_cell_is_empty() {
        assert_eq!(resolve_cell_value(None), "");
    }

    #[test]
    fn test_bool_cells() {
        assert_eq!(resolve_cell_value(Some(&Data::Bool(true))), "true");
        assert_eq!(resolve_cell_value(Some(&Data::Bool(false))), "false");
    }

    #[test]
    fn test_numeric_cells_keep_fraction() {
        assert_eq!(resolve_cell_value(Some(&Data::Float(42.0))), "42.0");
        assert_eq!(resolve_cell_value(Some(&Data::Int(42))), "42.0");
        assert_eq!(resolve_cell_value(Some(&Data::Float(3.25))), "3.25");
        assert_eq!(resolve_cell_value(Some(&Data::Float(-7.0))), "-7.0");
    }

    #[test]
    fn test_string_and_blank_cells() {
        assert_eq!(
            resolve_cell_value(Some(&Data::String("Hello".to_string()))),
            "Hello"
        );
        assert_eq!(resolve_cell_value(Some(&Data::String(String::new()))), "");
        assert_eq!(resolve_cell_value(Some(&Data::Empty)), "");
    }

    #[test]
    fn test_error_cells_are_empty() {
        assert_eq!(
            resolve_cell_value(Some(&Data::Error(CellErrorType::Div0))),
            ""
        );
        assert_eq!(resolve_cell_value(Some(&Data::Error(CellErrorType::NA))), "");
    }

    #[test]
    fn test_iso_cells_keep_text() {
        assert_eq!(
            resolve_cell_value(Some(&Data::DateTimeIso("2024-01-02".to_string()))),
            "2024-01-02"
        );
    }

    #[test]
    fn test_format_number_scientific_range() {
        assert_eq!(format_number(1e7), "1.0E7");
        assert_eq!(format_number(12_345_678.0), "1.2345678E7");
        assert_eq!(format_number(0.0001), "1.0E-4");
        assert_eq!(format_number(0.001), "0.001");
        assert_eq!(format_number(9_999_999.0), "9999999.0");
    }

    #[test]
    fn test_format_number_special_values() {
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(-0.0), "-0.0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
