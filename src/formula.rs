//! Evaluation of formula cells whose result was never computed.
//!
//! Spreadsheet generators usually write formulas with a placeholder result
//! (`0` or nothing); only a spreadsheet application fills in the real one.
//! Such cells are evaluated here with `xlformula_engine` before the extractor
//! reads them. Cells carrying a computed result keep it.

use calamine::{CellErrorType, Data, Range};
use tracing::debug;
use xlformula_engine::{NoCustomFunction, calculate, parse_formula, types};

use crate::cell::CellReference;

/// Longest chain of formula cells referencing formula cells that is followed.
const MAX_DEPTH: usize = 32;

/// Whether a stored formula result is missing or a generator placeholder.
pub fn needs_evaluation(cached: Option<&Data>) -> bool {
    match cached {
        None | Some(Data::Empty) => true,
        Some(Data::Int(i)) => *i == 0,
        Some(Data::Float(f)) => *f == 0.0,
        Some(Data::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Replaces the placeholder results of `values` by evaluating `formulas`.
///
/// Both ranges use absolute positions. Formulas that cannot be evaluated
/// become error cells, which resolve to empty text. Returns the number of
/// evaluated cells.
pub fn evaluate_formulas(values: &mut Range<Data>, formulas: &Range<String>) -> usize {
    let Some((first_row, first_column)) = formulas.start() else {
        return 0;
    };

    let results: Vec<((u32, u32), Data)> = {
        let snapshot: &Range<Data> = values;
        let evaluator = Evaluator {
            values: snapshot,
            formulas,
        };
        formulas
            .used_cells()
            .filter(|(_, _, formula)| !formula.trim().is_empty())
            .map(|(row, column, _)| (first_row + row as u32, first_column + column as u32))
            .filter(|position| needs_evaluation(snapshot.get_value(*position)))
            .map(|position| (position, evaluator.evaluate(position, 0)))
            .collect()
    };

    let count = results.len();
    for (position, data) in results {
        place(values, position, data);
    }
    count
}

struct Evaluator<'a> {
    values: &'a Range<Data>,
    formulas: &'a Range<String>,
}

impl Evaluator<'_> {
    fn evaluate(&self, position: (u32, u32), depth: usize) -> Data {
        let Some(text) = self.formulas.get_value(position) else {
            return Data::Empty;
        };
        let formula = format!("={}", text.trim().trim_start_matches('='));

        let resolver = |name: String| -> types::Value { self.reference(&name, depth + 1) };
        let parsed = parse_formula::parse_string_to_formula(&formula, None::<NoCustomFunction>);
        let result = calculate::calculate_formula(parsed, Some(&resolver));

        match result {
            types::Value::Number(n) => {
                let value = widen(n);
                if value.is_finite() {
                    Data::Float(value)
                } else {
                    Data::Error(CellErrorType::Num)
                }
            }
            types::Value::Text(text) => Data::String(text),
            types::Value::Boolean(types::Boolean::True) => Data::Bool(true),
            types::Value::Boolean(types::Boolean::False) => Data::Bool(false),
            types::Value::Blank => Data::Empty,
            other => {
                debug!(
                    row = position.0 + 1,
                    column = position.1 + 1,
                    "Formula {} evaluated to {:?}",
                    formula,
                    other
                );
                Data::Error(CellErrorType::Value)
            }
        }
    }

    /// Value of a cell referenced by a formula, evaluating it first when it is
    /// itself an uncomputed formula.
    fn reference(&self, name: &str, depth: usize) -> types::Value {
        let position = match CellReference::parse(name) {
            Ok(CellReference {
                column,
                row: Some(row),
            }) => (row, column),
            _ => return types::Value::Error(types::Error::Value),
        };
        if depth > MAX_DEPTH {
            return types::Value::Error(types::Error::Value);
        }

        let cached = self.values.get_value(position);
        let has_formula = self
            .formulas
            .get_value(position)
            .is_some_and(|formula| !formula.trim().is_empty());
        if has_formula && needs_evaluation(cached) {
            to_value(&self.evaluate(position, depth))
        } else {
            cached.map_or(types::Value::Blank, to_value)
        }
    }
}

fn to_value(data: &Data) -> types::Value {
    match data {
        Data::Empty => types::Value::Blank,
        Data::Int(i) => types::Value::Number(*i as f32),
        Data::Float(f) => types::Value::Number(*f as f32),
        Data::DateTime(d) => types::Value::Number(d.as_f64() as f32),
        Data::Bool(true) => types::Value::Boolean(types::Boolean::True),
        Data::Bool(false) => types::Value::Boolean(types::Boolean::False),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            types::Value::Text(s.clone())
        }
        Data::Error(_) => types::Value::Error(types::Error::Value),
    }
}

/// The engine computes in `f32`; go through its shortest decimal form so that
/// `0.1` stays `0.1` once widened.
fn widen(n: f32) -> f64 {
    n.to_string().parse().unwrap_or(f64::from(n))
}

/// Writes `data` at an absolute position, growing the range as needed.
fn place(values: &mut Range<Data>, position: (u32, u32), data: Data) {
    match (values.start(), values.end()) {
        (Some(start), Some(_)) if start.0 <= position.0 && start.1 <= position.1 => {
            values.set_value(position, data);
        }
        (Some(start), Some(end)) => {
            let new_start = (start.0.min(position.0), start.1.min(position.1));
            let new_end = (end.0.max(position.0), end.1.max(position.1));
            let mut grown = Range::new(new_start, new_end);
            for (row, column, cell) in values.used_cells() {
                grown.set_value(
                    (start.0 + row as u32, start.1 + column as u32),
                    cell.clone(),
                );
            }
            grown.set_value(position, data);
            *values = grown;
        }
        _ => {
            let mut grown = Range::new(position, position);
            grown.set_value(position, data);
            *values = grown;
        }
    }
}
