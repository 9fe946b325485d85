//! Upload state machine.
//!
//! ```text
//!   empty ──select_file──▶ file chosen ──(valid)──▶ date prompt open
//!                                                     │ set dates
//!                                                     ▼
//!                              begin_submit ──▶ submitting ──finish──▶ empty
//! ```
//!
//! `reset` returns to empty from anywhere except mid-submission.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::file::{SelectedFile, Validity};
use crate::preview::{PreviewTable, SheetPreview};
use crate::range::{wire_date, DateRange};

/// Why a submission was refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file and a date range.")]
    MissingFile,
    #[error("Please select a file and a date range.")]
    IncompleteRange,
    #[error("{0} is not an Excel file (.xlsx or .xls)")]
    NotSpreadsheet(String),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

/// Everything needed to build the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub file: SelectedFile,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SubmissionRequest {
    /// `start_date` form value (`yyyy-MM-dd`).
    pub fn start_field(&self) -> String {
        wire_date(self.start)
    }

    /// `end_date` form value (`yyyy-MM-dd`).
    pub fn end_field(&self) -> String {
        wire_date(self.end)
    }
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The processed file was written to disk.
    Downloaded {
        path: PathBuf,
        bytes: usize,
        message: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        sheets: Vec<SheetPreview>,
    },
    /// The server answered with rows to show instead of a file.
    PreviewReady { table: PreviewTable },
    /// Server or transport failure; the text is what the banner shows.
    Failed { error: String },
}

impl Outcome {
    pub fn failed(msg: impl Into<String>) -> Self {
        Outcome::Failed { error: msg.into() }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// In-memory state of the upload widget.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    file: Option<SelectedFile>,
    validity: Validity,
    range: DateRange,
    submitting: bool,
    error: Option<String>,
    date_prompt_open: bool,
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a dropped or picked file. The date prompt opens only for spreadsheets.
    pub fn select_file(&mut self, file: SelectedFile) -> Validity {
        let validity = Validity::of(&file.name);
        self.file = Some(file);
        self.validity = validity;
        if validity.is_valid() {
            self.date_prompt_open = true;
        }
        validity
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn set_start(&mut self, date: Option<NaiveDate>) {
        self.range.set_start(date);
    }

    pub fn set_end(&mut self, date: Option<NaiveDate>) {
        self.range.set_end(date);
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_date_prompt_open(&self) -> bool {
        self.date_prompt_open
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting
            && self.file.is_some()
            && self.validity.is_valid()
            && self.range.is_complete()
    }

    /// Validate and enter the submitting state.
    ///
    /// A missing file or incomplete range also sets the inline error message.
    pub fn begin_submit(&mut self) -> Result<SubmissionRequest, ValidationError> {
        if self.submitting {
            return Err(ValidationError::AlreadySubmitting);
        }
        let Some(file) = self.file.clone() else {
            return Err(self.refuse(ValidationError::MissingFile));
        };
        if !self.validity.is_valid() {
            return Err(ValidationError::NotSpreadsheet(file.name));
        }
        let Some((start, end)) = self.range.bounds() else {
            return Err(self.refuse(ValidationError::IncompleteRange));
        };

        self.submitting = true;
        self.error = None;
        Ok(SubmissionRequest { file, start, end })
    }

    /// Leave the submitting state. The prompt closes and inputs clear either
    /// way; a failure leaves its message in the error banner.
    pub fn finish(&mut self, outcome: &Outcome) {
        let error = match outcome {
            Outcome::Failed { error } => Some(error.clone()),
            _ => None,
        };
        *self = Self { error, ..Self::default() };
    }

    /// Clear everything. Ignored while a submission is outstanding.
    pub fn reset(&mut self) {
        if !self.submitting {
            *self = Self::default();
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn refuse(&mut self, err: ValidationError) -> ValidationError {
        self.error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn xlsx() -> SelectedFile {
        SelectedFile::new("semana.xlsx", b"PK\x03\x04".to_vec())
    }

    fn ready_state() -> UploadState {
        let mut state = UploadState::new();
        state.select_file(xlsx());
        state.set_range(DateRange::pick(d(2024, 3, 4), d(2024, 3, 10)));
        state
    }

    #[test]
    fn test_initial_state() {
        let state = UploadState::new();
        assert!(state.file().is_none());
        assert_eq!(state.validity(), Validity::Unknown);
        assert!(!state.range().is_complete());
        assert!(!state.is_submitting());
        assert!(state.error().is_none());
        assert!(!state.is_date_prompt_open());
        assert!(!state.can_submit());
    }

    #[test]
    fn test_valid_file_opens_prompt() {
        let mut state = UploadState::new();
        assert_eq!(state.select_file(xlsx()), Validity::Valid);
        assert!(state.is_date_prompt_open());
    }

    #[test]
    fn test_invalid_file_never_offers_submit() {
        let mut state = UploadState::new();
        assert_eq!(state.select_file(SelectedFile::new("notes.txt", vec![])), Validity::Invalid);
        assert!(!state.is_date_prompt_open());
        state.set_range(DateRange::pick(d(2024, 3, 4), d(2024, 3, 10)));
        assert!(!state.can_submit());
        assert_eq!(
            state.begin_submit(),
            Err(ValidationError::NotSpreadsheet("notes.txt".into()))
        );
        assert!(!state.is_submitting());
    }

    #[test]
    fn test_submit_disabled_until_both_dates() {
        let mut state = UploadState::new();
        state.select_file(xlsx());
        assert!(!state.can_submit());
        state.set_start(Some(d(2024, 3, 4)));
        assert!(!state.can_submit());
        state.set_start(None);
        state.set_end(Some(d(2024, 3, 10)));
        assert!(!state.can_submit());
        state.set_start(Some(d(2024, 3, 4)));
        assert!(state.can_submit());
    }

    #[test]
    fn test_incomplete_range_sets_inline_error() {
        let mut state = UploadState::new();
        state.select_file(xlsx());
        state.set_start(Some(d(2024, 3, 4)));
        let err = state.begin_submit().unwrap_err();
        assert_eq!(err, ValidationError::IncompleteRange);
        assert_eq!(state.error(), Some("Please select a file and a date range."));
        assert!(!state.is_submitting());
    }

    #[test]
    fn test_missing_file_sets_inline_error() {
        let mut state = UploadState::new();
        state.set_range(DateRange::pick(d(2024, 3, 4), d(2024, 3, 10)));
        assert_eq!(state.begin_submit(), Err(ValidationError::MissingFile));
        assert!(state.error().is_some());
    }

    #[test]
    fn test_begin_submit_builds_request() {
        let mut state = ready_state();
        let req = state.begin_submit().unwrap();
        assert_eq!(req.file.name, "semana.xlsx");
        assert_eq!(req.start_field(), "2024-03-04");
        assert_eq!(req.end_field(), "2024-03-10");
        assert!(state.is_submitting());
        assert!(!state.can_submit());
    }

    #[test]
    fn test_no_second_submission_in_flight() {
        let mut state = ready_state();
        state.begin_submit().unwrap();
        assert_eq!(state.begin_submit(), Err(ValidationError::AlreadySubmitting));
        // Reset is ignored while submitting
        state.reset();
        assert!(state.is_submitting());
        assert!(state.file().is_some());
    }

    #[test]
    fn test_finish_success_clears_everything() {
        let mut state = ready_state();
        state.begin_submit().unwrap();
        state.finish(&Outcome::Downloaded {
            path: PathBuf::from("archivo_procesado.xlsx"),
            bytes: 4,
            message: None,
            sheets: vec![],
        });
        assert!(!state.is_submitting());
        assert!(!state.is_date_prompt_open());
        assert!(state.file().is_none());
        assert!(!state.range().is_complete());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_finish_failure_keeps_banner_text() {
        let mut state = ready_state();
        state.begin_submit().unwrap();
        state.finish(&Outcome::failed("X"));
        assert_eq!(state.error(), Some("X"));
        assert!(!state.is_submitting());
        assert!(!state.is_date_prompt_open());
        assert!(state.file().is_none());

        state.dismiss_error();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_reset_after_submission() {
        let mut state = ready_state();
        state.begin_submit().unwrap();
        state.finish(&Outcome::failed("boom"));
        state.select_file(xlsx());
        state.set_start(Some(d(2024, 3, 4)));

        state.reset();
        assert!(state.file().is_none());
        assert_eq!(state.validity(), Validity::Unknown);
        assert_eq!(*state.range(), DateRange::default());
        assert!(state.error().is_none());
        assert!(!state.is_date_prompt_open());
    }

    #[test]
    fn test_next_submission_clears_previous_error() {
        let mut state = ready_state();
        state.begin_submit().unwrap();
        state.finish(&Outcome::failed("first"));

        state.select_file(xlsx());
        state.set_range(DateRange::pick(d(2024, 3, 4), d(2024, 3, 5)));
        state.begin_submit().unwrap();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_outcome_json_tag() {
        let json = serde_json::to_value(Outcome::failed("X")).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error"], "X");
    }
}
