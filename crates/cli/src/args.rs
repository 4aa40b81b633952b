//! Command line arguments.

use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;

use syncpics_core::sync::{SyncOptions, DEFAULT_INCLUDE};

#[derive(Debug, Parser)]
#[command(
    name = "syncpics",
    version,
    about = "Mirror a photo library, converting JPEGs to HEIC and copying videos"
)]
pub struct Cli {
    /// Configuration file (defaults to ~/.syncpics)
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Glob, relative to the source root, selecting files to sync
    #[arg(long, value_name = "GLOB", default_value = DEFAULT_INCLUDE)]
    pub include: String,

    /// Only sync files from the event on this date (reserved, currently ignored)
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_event_date)]
    pub include_event: Option<NaiveDate>,

    /// Print what would be done without writing anything
    #[arg(long)]
    pub dryrun: bool,

    /// Maximum number of concurrent conversions
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_concurrency: Option<u64>,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn sync_options(&self) -> SyncOptions {
        let mut options = SyncOptions::default()
            .with_include(self.include.clone())
            .with_dry_run(self.dryrun);
        if let Some(date) = self.include_event {
            options = options.with_include_event(date.format("%Y-%m-%d").to_string());
        }
        options
    }

    /// Whether to draw the progress bar: not disabled and stderr is a terminal.
    pub fn show_progress(&self) -> bool {
        !self.no_progress && std::io::stderr().is_terminal()
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn parse_event_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected a date as YYYY-MM-DD: {}", e))
}
