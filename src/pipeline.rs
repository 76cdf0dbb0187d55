//! The end-to-end run: configuration entries → [`AggregationStore`] → export targets.
//!
//! Only configuration errors stop a run. A failing entry is logged and
//! skipped, a failing export target is logged and the remaining targets are
//! still written.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::{
    config::{EntryConfig, EntrySpec, load_config},
    error::Error,
    extractor::{ExtractionReport, RowExtractor},
    formats::ExportFormat,
    types::AggregationStore,
    workbook::Workbook,
};

/// One output file to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub format: ExportFormat,
    pub path: PathBuf,
}

impl ExportTarget {
    pub fn new(format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
        }
    }
}

/// Options applying to every entry of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Let a blank group cell inherit the previous group of the same entry.
    pub expand_group_by: bool,
    pub targets: Vec<ExportTarget>,
}

impl RunOptions {
    pub fn with_expand_group_by(mut self, expand_group_by: bool) -> Self {
        self.expand_group_by = expand_group_by;
        self
    }

    pub fn with_target(mut self, format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        self.targets.push(ExportTarget::new(format, path));
        self
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub store: AggregationStore,
    pub failed_entries: usize,
    pub failed_exports: Vec<(ExportTarget, Error)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed_exports.is_empty()
    }
}

/// Extracts one entry into `store`.
///
/// Errors are entry-level: the store is left untouched by a failing entry
/// because every check runs before the first row is read. The workbook is
/// released when this returns, on success or failure.
pub fn process_entry(
    entry_number: usize,
    config: &EntryConfig,
    expand_group_by: bool,
    store: &mut AggregationStore,
) -> Result<ExtractionReport, Error> {
    let spec = EntrySpec::try_from(config)?;
    let sheet = {
        let mut workbook = Workbook::open(&spec.source_file)?;
        workbook.sheet(spec.sheet_index)?
    };

    Ok(RowExtractor::new(&spec, entry_number, expand_group_by).extract(&sheet, store))
}

/// Runs every entry in order and returns the accumulated store.
pub fn aggregate(entries: &[EntryConfig], expand_group_by: bool) -> (AggregationStore, usize) {
    info!("{} entry(ies) found in the configuration file.", entries.len());

    let mut store = AggregationStore::new();
    let mut failed = 0;
    for (index, config) in entries.iter().enumerate() {
        let entry_number = index + 1;
        info!(
            "Entry #{}: Reading {} ...",
            entry_number,
            config.file_name.as_deref().unwrap_or("<no file name>")
        );

        match process_entry(entry_number, config, expand_group_by, &mut store) {
            Ok(report) => info!(
                entry = entry_number,
                pairs = report.pairs_added,
                skipped = report.rows_skipped,
                "Entry #{}: Parsed with success.",
                entry_number
            ),
            Err(e) => {
                failed += 1;
                error!(
                    entry = entry_number,
                    "Entry #{}: {}. Ignoring the entry.", entry_number, e
                );
            }
        }
    }
    (store, failed)
}

/// Writes `store` to every target, in order, and returns the ones that failed.
pub fn export_all(
    store: &AggregationStore,
    targets: &[ExportTarget],
) -> Vec<(ExportTarget, Error)> {
    let mut failures = Vec::new();
    for target in targets {
        info!(
            "Exporting as {} resource: {}",
            target.format,
            target.path.display()
        );
        match target.format.write_to(&target.path, store) {
            Ok(()) => info!("Exported with success"),
            Err(e) => {
                error!("Export failed: {}", e);
                failures.push((target.clone(), e));
            }
        }
    }
    failures
}

/// Loads the configuration at `config_path`, aggregates all entries and writes
/// every export target.
pub fn run<P: AsRef<Path>>(config_path: P, options: &RunOptions) -> Result<RunSummary, Error> {
    let config_path = config_path.as_ref();
    info!("Reading configuration file {}", config_path.display());
    let entries = load_config(config_path)?;

    let (store, failed_entries) = aggregate(&entries, options.expand_group_by);
    let failed_exports = export_all(&store, &options.targets);

    info!("End of execution");
    Ok(RunSummary {
        store,
        failed_entries,
        failed_exports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_entry(dir: &Path) -> EntryConfig {
        EntryConfig {
            file_name: Some(dir.join("missing.xlsx").to_string_lossy().to_string()),
            ..EntryConfig::default()
        }
    }

    #[test]
    fn test_entry_without_file_name_is_rejected() {
        let mut store = AggregationStore::new();
        let result = process_entry(1, &EntryConfig::default(), false, &mut store);
        assert!(matches!(result, Err(Error::MissingSourceFile)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unreadable_workbook_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = AggregationStore::new();
        let result = process_entry(1, &missing_entry(dir.path()), false, &mut store);
        assert!(matches!(result, Err(Error::Workbook(_))));
    }

    #[test]
    fn test_aggregate_continues_after_failures() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![EntryConfig::default(), missing_entry(dir.path())];
        let (store, failed) = aggregate(&entries, false);
        assert!(store.is_empty());
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_run_options_builder() {
        let options = RunOptions::default()
            .with_expand_group_by(true)
            .with_target(ExportFormat::AndroidStrings, "strings.xml")
            .with_target(ExportFormat::Strings, "Localizable.strings");
        assert!(options.expand_group_by);
        assert_eq!(
            options.targets,
            vec![
                ExportTarget::new(ExportFormat::AndroidStrings, "strings.xml"),
                ExportTarget::new(ExportFormat::Strings, "Localizable.strings"),
            ]
        );
    }

    #[test]
    fn test_run_with_missing_configuration_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path().join("config.json"), &RunOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_export_failure_does_not_stop_other_targets() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Localizable.strings");
        let targets = vec![
            ExportTarget::new(ExportFormat::AndroidStrings, dir.path().join("no/such/strings.xml")),
            ExportTarget::new(ExportFormat::Strings, &good),
        ];

        let failures = export_all(&AggregationStore::new(), &targets);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.format, ExportFormat::AndroidStrings);
        assert!(good.exists());
    }
}
