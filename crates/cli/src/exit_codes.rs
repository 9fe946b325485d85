//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, bad date)     |
//! | 3-9     | intake           | File selection and date range            |
//! | 10-19   | upload           | Submission to the processing server      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use bufalo_client::UploadError;
use bufalo_core::ValidationError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Intake (3-9)
// =============================================================================

/// File name does not end in .xlsx or .xls.
pub const EXIT_NOT_SPREADSHEET: u8 = 3;

/// Start or end date missing.
pub const EXIT_INCOMPLETE_RANGE: u8 = 4;

/// Selected file could not be read.
pub const EXIT_FILE_UNREADABLE: u8 = 5;

// =============================================================================
// Upload (10-19)
// =============================================================================

/// Could not reach the processing server (refused, DNS, timeout).
pub const EXIT_UPLOAD_NETWORK: u8 = 10;

/// Server answered with a non-2xx status or an `error` field.
pub const EXIT_UPLOAD_SERVER: u8 = 11;

/// Server answered 2xx in a shape we cannot handle (content type, bad base64).
pub const EXIT_UPLOAD_UNEXPECTED: u8 = 12;

/// Processed file could not be written to the download folder.
pub const EXIT_DOWNLOAD_WRITE: u8 = 13;

// =============================================================================
// Error mapping
// =============================================================================

/// Map an UploadError to its exit code.
pub fn upload_exit_code(err: &UploadError) -> u8 {
    match err {
        UploadError::Request(_) => EXIT_ERROR,
        UploadError::Network(_) => EXIT_UPLOAD_NETWORK,
        UploadError::Server { .. } => EXIT_UPLOAD_SERVER,
        UploadError::UnexpectedResponse(_) | UploadError::Decode(_) => EXIT_UPLOAD_UNEXPECTED,
        UploadError::Io(_) => EXIT_DOWNLOAD_WRITE,
    }
}

/// Map a ValidationError to its exit code.
pub fn validation_exit_code(err: &ValidationError) -> u8 {
    match err {
        ValidationError::NotSpreadsheet(_) => EXIT_NOT_SPREADSHEET,
        ValidationError::MissingFile | ValidationError::IncompleteRange => EXIT_INCOMPLETE_RANGE,
        ValidationError::AlreadySubmitting => EXIT_ERROR,
    }
}
