use std::{io::IsTerminal, path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use sheetres::{ExportFormat, RunOptions, run};
use tracing::error;
use tracing_subscriber::EnvFilter;

const CONFIG_FORMAT: &str = r#"Format of the configuration file:
[
    {
        "fileName": (string) xls/xlsx/ods file containing the wording. Mandatory.
        "sheet": (int) index of the sheet concerned. 0=first sheet. Default=0
        "rowStart": (int) index of the starting row. 1=first row. Default=1
        "rowEnd": (int) index of the last row. 1=first row. -1=all rows. Default=-1
        "columnKey": (string) letter of the column containing the key. Default="A"
        "columnValue": (string) letter of the column containing the value. Default="B"
        "groupBy": (string) letter of the column containing the group. null=do not group. Default=null
    }, ...
]

Example:
    sheetres -c config.json -a strings.xml -i Localizable.strings"#;

#[derive(Parser, Debug)]
#[command(
    name = "sheetres",
    author,
    version,
    about,
    long_about = None,
    disable_version_flag = true,
    after_help = CONFIG_FORMAT
)]
struct Args {
    /// The configuration file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// The Android resource file to export
    #[arg(short, long, value_name = "FILE")]
    android: Option<PathBuf>,

    /// The iOS resource file to export
    #[arg(short, long, value_name = "FILE")]
    ios: Option<PathBuf>,

    /// If a groupBy column exists and its cell is empty, reuse the group of the previous rows
    #[arg(long, alias = "expandgroupby")]
    expand_group_by: bool,

    /// Print the current version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

impl Args {
    fn run_options(&self) -> RunOptions {
        let mut options = RunOptions::default().with_expand_group_by(self.expand_group_by);
        if let Some(path) = &self.android {
            options = options.with_target(ExportFormat::AndroidStrings, path);
        }
        if let Some(path) = &self.ios {
            options = options.with_target(ExportFormat::Strings, path);
        }
        options
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    match run(&args.config, &args.run_options()) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("Cannot use the configuration file {}: {}", args.config.display(), e);
            ExitCode::FAILURE
        }
    }
}
