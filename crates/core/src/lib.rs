//! Core types for the Bufalo upload client.
//!
//! Everything here is pure state: no I/O beyond reading a chosen file, no
//! HTTP. The client crate drives these types through a submission.

pub mod calendar;
pub mod file;
pub mod preview;
pub mod range;
pub mod state;

pub use calendar::{
    day_mark, is_holiday, is_weekend, month_view, CalendarDay, DayMark, MonthView,
    COLOMBIAN_HOLIDAYS_2024,
};
pub use file::{is_spreadsheet, spreadsheet_mime, SelectedFile, Validity, XLSX_MIME, XLS_MIME};
pub use preview::{cell_text, PreviewTable, SheetPreview};
pub use range::{parse_wire_date, wire_date, DateRange, DATE_FORMAT_DISPLAY, DATE_FORMAT_WIRE};
pub use state::{Outcome, SubmissionRequest, UploadState, ValidationError};
