//! Upload commands: check, upload.
//!
//! `bufalo check FILE`   checks the file name is one the server accepts
//! `bufalo upload FILE`  submits file and date range, saves or previews the result

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use bufalo_client::{submit_detailed, Downloads, UploadClient, UploadError};
use bufalo_config::Settings;
use bufalo_core::{
    parse_wire_date, Outcome, SelectedFile, SheetPreview, UploadState, ValidationError, Validity,
};

use crate::exit_codes::*;
use crate::util;
use crate::CliError;

/// Widest a preview column may render in the terminal.
const MAX_PREVIEW_COL_WIDTH: usize = 24;

/// Rows of each returned sheet echoed after a download.
const SHEET_PREVIEW_ROWS: usize = 5;

// ── Check ───────────────────────────────────────────────────────────

pub fn cmd_check(file: PathBuf, quiet: bool) -> Result<(), CliError> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string_lossy().into_owned());

    match Validity::of(&name) {
        Validity::Valid => {
            if !quiet {
                println!("{}: valid Excel file", name);
            }
            Ok(())
        }
        _ => Err(CliError {
            code: EXIT_NOT_SPREADSHEET,
            message: format!("{}: not an Excel file", name),
            hint: Some("only .xlsx and .xls files can be processed".into()),
        }),
    }
}

// ── Upload ──────────────────────────────────────────────────────────

pub struct UploadArgs {
    pub file: PathBuf,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub endpoint: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn cmd_upload(args: UploadArgs) -> Result<(), CliError> {
    let settings = Settings::load();
    let mut state = UploadState::new();

    let file = SelectedFile::from_path(&args.file).map_err(|e| CliError {
        code: EXIT_FILE_UNREADABLE,
        message: format!("cannot read {}: {}", args.file.display(), e),
        hint: None,
    })?;

    let name = file.name.clone();
    if !state.select_file(file).is_valid() {
        let err = ValidationError::NotSpreadsheet(name);
        return Err(CliError {
            code: validation_exit_code(&err),
            message: err.to_string(),
            hint: Some("only .xlsx and .xls files can be processed".into()),
        });
    }

    state.set_start(args.from);
    state.set_end(args.to);

    // The date prompt is only offered for a valid spreadsheet, and only on a TTY
    if !state.range().is_complete() && state.is_date_prompt_open() && atty::is(atty::Stream::Stdin) {
        prompt_dates(&mut state)?;
    }

    let client = UploadClient::from_settings(&settings, args.endpoint.as_deref())
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    let downloads = Downloads::new(
        settings.effective_download_dir(args.out_dir.as_deref()),
        settings.download_name.clone(),
    );

    if !args.quiet && state.can_submit() {
        eprintln!(
            "Uploading {} ({}) to {}",
            state.file().map(|f| f.name.as_str()).unwrap_or_default(),
            state.range().display(),
            client.upload_url(),
        );
    }

    let (outcome, cause) = submit_detailed(&mut state, &client, &downloads).map_err(|e| CliError {
        code: validation_exit_code(&e),
        message: e.to_string(),
        hint: Some("pass --from and --to as yyyy-MM-dd".into()),
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
        println!("{}", json);
    }

    match &outcome {
        Outcome::Downloaded { path, bytes, message, sheets } => {
            if !args.json && !args.quiet {
                if let Some(msg) = message {
                    eprintln!("{}", msg);
                }
                println!("Saved processed file to {} ({} bytes)", path.display(), bytes);
                print_sheets(sheets);
            }
            if args.html.is_some() && !args.quiet {
                eprintln!("note: server returned a file, not a preview; --html ignored");
            }
            Ok(())
        }
        Outcome::PreviewReady { table } => {
            if !args.json {
                print!("{}", util::render_table(&table.columns, &table.rows, MAX_PREVIEW_COL_WIDTH));
            }
            if let Some(html_path) = &args.html {
                write_html(html_path, &table.to_html())?;
                if !args.quiet {
                    eprintln!("Wrote preview to {}", html_path.display());
                }
            }
            Ok(())
        }
        Outcome::Failed { error } => Err(failure(error, cause.as_ref())),
    }
}

fn failure(banner: &str, cause: Option<&UploadError>) -> CliError {
    let code = cause.map(upload_exit_code).unwrap_or(EXIT_ERROR);
    let hint = match cause {
        Some(UploadError::Network(_)) => {
            Some("check the endpoint (--endpoint, BUFALO_ENDPOINT or settings.json)".to_string())
        }
        Some(UploadError::Io(_)) => Some("choose another folder with --out-dir".to_string()),
        _ => None,
    };
    CliError { code, message: banner.to_string(), hint }
}

fn print_sheets(sheets: &[SheetPreview]) {
    for sheet in sheets {
        println!();
        println!("{} ({} rows)", sheet.name, sheet.rows.len());
        let width = sheet.rows.iter().map(Vec::len).max().unwrap_or(0);
        let shown: Vec<Vec<String>> = sheet.rows.iter().take(SHEET_PREVIEW_ROWS).cloned().collect();
        print!("{}", util::render_table(&util::letter_header(width), &shown, MAX_PREVIEW_COL_WIDTH));
        if sheet.rows.len() > SHEET_PREVIEW_ROWS {
            println!("... {} more rows", sheet.rows.len() - SHEET_PREVIEW_ROWS);
        }
    }
}

fn write_html(path: &Path, html: &str) -> Result<(), CliError> {
    std::fs::write(path, html).map_err(|e| CliError {
        code: EXIT_DOWNLOAD_WRITE,
        message: format!("cannot write {}: {}", path.display(), e),
        hint: None,
    })
}

/// Ask for whichever end of the range is missing. Blank input leaves it unset.
fn prompt_dates(state: &mut UploadState) -> Result<(), CliError> {
    eprintln!("Select the date range:");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if state.range().start.is_none() {
        state.set_start(prompt_date("Start date (yyyy-MM-dd): ", &mut lines)?);
    }
    if state.range().end.is_none() {
        state.set_end(prompt_date("End date (yyyy-MM-dd): ", &mut lines)?);
    }
    eprintln!("Selected range: {}", state.range().display());
    Ok(())
}

fn prompt_date(
    label: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<NaiveDate>, CliError> {
    eprint!("{}", label);
    io::stderr().flush().ok();

    let line = match lines.next() {
        Some(line) => line.map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?,
        None => return Ok(None),
    };
    if line.trim().is_empty() {
        return Ok(None);
    }
    parse_wire_date(&line)
        .map(Some)
        .ok_or_else(|| CliError::args(format!("invalid date '{}'", line.trim())).with_hint("use yyyy-MM-dd"))
}
