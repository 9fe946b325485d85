//! File intake: the chosen file and its spreadsheet classification.

use std::io;
use std::path::Path;

/// MIME type sent for `.xlsx` uploads and expected for binary replies.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// MIME type sent for legacy `.xls` uploads.
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// A file the user picked, held in memory until it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read a file from disk. The name is the final path component.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }

    pub fn is_spreadsheet(&self) -> bool {
        is_spreadsheet(&self.name)
    }

    pub fn mime(&self) -> &'static str {
        spreadsheet_mime(&self.name)
    }
}

/// Tri-state classification of the selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// Nothing selected yet.
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl Validity {
    pub fn of(name: &str) -> Self {
        if is_spreadsheet(name) {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }

    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

/// True if the name ends in `.xlsx` or `.xls`.
///
/// Case-sensitive, by suffix only. `REPORT.XLSX` is not a spreadsheet here.
pub fn is_spreadsheet(name: &str) -> bool {
    name.ends_with(".xlsx") || name.ends_with(".xls")
}

/// Content type for the multipart file part.
pub fn spreadsheet_mime(name: &str) -> &'static str {
    if name.ends_with(".xlsx") {
        XLSX_MIME
    } else if name.ends_with(".xls") {
        XLS_MIME
    } else {
        "application/octet-stream"
    }
}
