// Bufalo CLI - submit spreadsheets to the processing server

mod calendar;
mod exit_codes;
mod upload;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use bufalo_config::Settings;
use bufalo_core::parse_wire_date;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "bufalo")]
#[command(about = "Upload .xlsx/.xls files with a date range and fetch the processed result")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a file is an Excel workbook the server accepts
    #[command(after_help = "\
Examples:
  bufalo check 'Datos Semana 10.xlsx'
  bufalo check export.csv           # exit 3

Only the file name is inspected (.xlsx or .xls, case-sensitive).")]
    Check {
        /// File to classify
        file: PathBuf,

        /// No output, exit code only
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Upload a workbook with a date range and save or preview the result
    #[command(after_help = "\
Examples:
  bufalo upload semana.xlsx --from 2024-03-04 --to 2024-03-10
  bufalo upload semana.xlsx --from 2024-03-04 --to 2024-03-10 --out-dir ./out
  bufalo upload semana.xlsx --from 2024-03-04 --to 2024-03-10 --json
  bufalo upload semana.xlsx     # prompts for dates on a terminal

The server answers with a processed workbook (saved to the download folder)
or a row preview (printed as a table; --html writes it as an HTML table).

Exit codes:
  0   Processed file saved or preview shown
  3   Not an .xlsx/.xls file
  4   Start or end date missing
  5   Input file unreadable
  10  Server unreachable
  11  Server reported an error
  12  Unexpected server reply
  13  Processed file could not be saved")]
    Upload {
        /// Workbook to upload
        file: PathBuf,

        /// Start of the date range (yyyy-MM-dd)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// End of the date range (yyyy-MM-dd)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,

        /// Processing server base URL (overrides BUFALO_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// Folder for the processed workbook
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Write a row preview as an HTML table to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the outcome as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress progress messages
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Show a month with weekends, holidays and a selected range
    #[command(after_help = "\
Examples:
  bufalo calendar
  bufalo calendar --year 2024 --month 3
  bufalo calendar --from 2024-03-20 --to 2024-03-26")]
    Calendar {
        /// Year to show, 1-9999 (default: from --from, else today)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: Option<i32>,

        /// Month to show, 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Range start to highlight (yyyy-MM-dd)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// Range end to highlight (yyyy-MM-dd)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
    },

    /// Show or change settings
    #[command(after_help = "\
Examples:
  bufalo config
  bufalo config --path
  bufalo config --set-endpoint http://localhost:8000")]
    Config {
        /// Print only the settings file path
        #[arg(long)]
        path: bool,

        /// Persist a new processing server URL
        #[arg(long)]
        set_endpoint: Option<String>,

        /// Persist a new download folder
        #[arg(long)]
        set_download_dir: Option<PathBuf>,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_wire_date(s).ok_or_else(|| format!("invalid date '{}' (expected yyyy-MM-dd)", s))
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: bufalo <command> [options]");
            eprintln!("       bufalo --help for more information");
            Ok(())
        }
        Some(Commands::Check { file, quiet }) => upload::cmd_check(file, quiet),
        Some(Commands::Upload { file, from, to, endpoint, out_dir, html, json, quiet }) => {
            upload::cmd_upload(upload::UploadArgs { file, from, to, endpoint, out_dir, html, json, quiet })
        }
        Some(Commands::Calendar { year, month, from, to }) => {
            calendar::cmd_calendar(year, month, from, to)
        }
        Some(Commands::Config { path, set_endpoint, set_download_dir }) => {
            cmd_config(path, set_endpoint, set_download_dir)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// What `bufalo config` prints: the file contents plus what a run would use.
#[derive(Serialize)]
struct ConfigReport {
    path: String,
    settings: Settings,
    effective: EffectiveSettings,
}

#[derive(Serialize)]
struct EffectiveSettings {
    endpoint: String,
    upload_url: String,
    download_dir: PathBuf,
}

fn cmd_config(
    path_only: bool,
    set_endpoint: Option<String>,
    set_download_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    if path_only {
        println!("{}", Settings::config_path_display());
        return Ok(());
    }

    let set_endpoint = set_endpoint
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .map(|url| {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url)
            } else {
                Err(CliError::args(format!("invalid endpoint: {}", url))
                    .with_hint("use an http:// or https:// URL"))
            }
        })
        .transpose()?;

    let mut settings = Settings::load();

    if set_endpoint.is_some() || set_download_dir.is_some() {
        if let Some(url) = set_endpoint {
            settings.endpoint = url;
        }
        if let Some(dir) = set_download_dir {
            settings.download_dir = Some(dir);
        }
        settings
            .save()
            .map_err(|e| CliError::io(format!("cannot write {}: {}", Settings::config_path_display(), e)))?;
        log::info!("Saved settings to {}", Settings::config_path_display());
    }

    let endpoint = settings.effective_endpoint(None);
    let report = ConfigReport {
        path: Settings::config_path_display(),
        effective: EffectiveSettings {
            upload_url: format!("{}/upload/", endpoint),
            endpoint,
            download_dir: settings.effective_download_dir(None),
        },
        settings,
    };
    let json = serde_json::to_string_pretty(&report).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
