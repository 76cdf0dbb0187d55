//! Row extraction and grouping.
//!
//! [`RowExtractor`] walks the row window of one entry, resolves the key, value
//! and group cells of each row and appends the resulting pairs to the shared
//! [`AggregationStore`]. Row-level problems are logged and the row is skipped;
//! the pass always covers the whole window.

use tracing::{trace, warn};

use crate::{
    cell::resolve_cell_value,
    config::{EntrySpec, RowEnd},
    traits::SheetSource,
    types::{AggregationStore, DEFAULT_GROUP, KeyValuePair},
};

/// Inclusive range of zero-based row indices to visit.
///
/// `rowStart` may be below 1; the rows before the first one never exist, so
/// the window starts at 0 and only counts them in `nonexistent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub first: i64,
    pub last: i64,
    pub nonexistent: u64,
}

impl RowWindow {
    /// `None` when the sheet has no populated row at all.
    pub fn new(spec: &EntrySpec, sheet_last_row: Option<u32>) -> Option<Self> {
        let last_row = i64::from(sheet_last_row?);
        let last = match spec.row_end {
            RowEnd::All => last_row,
            RowEnd::Through(row_end) => last_row.min(i64::from(row_end) - 1),
        };
        let first = spec.row_start.saturating_sub(1);
        let nonexistent = last.min(-1).saturating_sub(first).saturating_add(1).max(0);
        Some(Self {
            first: first.max(0),
            last,
            nonexistent: nonexistent as u64,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = i64> {
        self.first..=self.last
    }
}

/// Outcome of a group cell lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupResolution {
    /// The row's own group cell.
    Found(String),
    /// Inherited from an earlier row of the same entry.
    CarriedForward(String),
    /// Nothing usable; the row goes to the default group.
    Missing,
}

/// Carry-forward state for a single entry pass.
#[derive(Debug, Default)]
pub struct GroupTracker {
    expand_group_by: bool,
    last_group: Option<String>,
}

impl GroupTracker {
    pub fn new(expand_group_by: bool) -> Self {
        Self {
            expand_group_by,
            last_group: None,
        }
    }

    /// Resolves the group for a row from its resolved group cell text.
    pub fn resolve(&mut self, cell_value: String) -> GroupResolution {
        if !cell_value.is_empty() {
            self.last_group = Some(cell_value.clone());
            return GroupResolution::Found(cell_value);
        }
        match &self.last_group {
            Some(last) if self.expand_group_by => GroupResolution::CarriedForward(last.clone()),
            _ => GroupResolution::Missing,
        }
    }
}

/// Counters for one entry pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub rows_visited: usize,
    pub rows_skipped: usize,
    pub pairs_added: usize,
    pub default_groups: usize,
}

/// Extracts the pairs of one entry from one sheet.
#[derive(Debug, Clone)]
pub struct RowExtractor<'a> {
    spec: &'a EntrySpec,
    expand_group_by: bool,
    entry_number: usize,
}

impl<'a> RowExtractor<'a> {
    /// `entry_number` is the 1-based position of the entry in the
    /// configuration, used in log messages.
    pub fn new(spec: &'a EntrySpec, entry_number: usize, expand_group_by: bool) -> Self {
        Self {
            spec,
            expand_group_by,
            entry_number,
        }
    }

    pub fn extract<S: SheetSource>(
        &self,
        sheet: &S,
        store: &mut AggregationStore,
    ) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        let Some(window) = RowWindow::new(self.spec, sheet.last_row()) else {
            warn!(entry = self.entry_number, "Sheet is empty. Nothing to extract.");
            return report;
        };
        if window.nonexistent > 0 {
            warn!(
                entry = self.entry_number,
                "{} row(s) before row 1 do not exist. Skipping them.",
                window.nonexistent
            );
        }

        let mut groups = GroupTracker::new(self.expand_group_by);
        for index in window.rows() {
            report.rows_visited += 1;
            trace!(entry = self.entry_number, row = index + 1, "processing row");

            match self.extract_row(sheet, index, &mut groups) {
                Some((group, pair, defaulted)) => {
                    store.add(&group, pair);
                    report.pairs_added += 1;
                    if defaulted {
                        report.default_groups += 1;
                    }
                }
                None => report.rows_skipped += 1,
            }
        }
        report
    }

    /// Returns the group, the pair and whether the group fell back to the default.
    fn extract_row<S: SheetSource>(
        &self,
        sheet: &S,
        index: i64,
        groups: &mut GroupTracker,
    ) -> Option<(String, KeyValuePair, bool)> {
        let row_number = index + 1;

        let row = match u32::try_from(index) {
            Ok(row) if sheet.has_row(row) => row,
            _ => {
                warn!(
                    entry = self.entry_number,
                    row = row_number,
                    "Row {} is empty. Skipping row.",
                    row_number
                );
                return None;
            }
        };

        let key_column = &self.spec.column_key;
        let key = resolve_cell_value(sheet.cell(row, key_column.index));
        if key.is_empty() {
            warn!(
                entry = self.entry_number,
                row = row_number,
                column = %key_column.reference,
                "Key column {} (row {}) is empty. Skipping row.",
                key_column.reference,
                row_number
            );
            return None;
        }

        let value_column = &self.spec.column_value;
        let value = resolve_cell_value(sheet.cell(row, value_column.index));
        if value.is_empty() {
            warn!(
                entry = self.entry_number,
                row = row_number,
                column = %value_column.reference,
                "Value column {} (row {}) is empty. Skipping row.",
                value_column.reference,
                row_number
            );
            return None;
        }

        let Some(group_column) = &self.spec.group_by else {
            return Some((DEFAULT_GROUP.to_string(), KeyValuePair::new(key, value), false));
        };

        let cell_value = resolve_cell_value(sheet.cell(row, group_column.index));
        let (group, defaulted) = match groups.resolve(cell_value) {
            GroupResolution::Found(group) | GroupResolution::CarriedForward(group) => {
                (group, false)
            }
            GroupResolution::Missing => {
                warn!(
                    entry = self.entry_number,
                    row = row_number,
                    column = %group_column.reference,
                    "GroupBy column {} (row {}) is empty. GroupBy set to default.",
                    group_column.reference,
                    row_number
                );
                (DEFAULT_GROUP.to_string(), true)
            }
        };

        Some((group, KeyValuePair::new(key, value), defaulted))
    }
}
