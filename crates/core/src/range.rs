//! Start/end date pair submitted alongside the file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of `start_date` / `end_date` on the wire (`yyyy-MM-dd`).
pub const DATE_FORMAT_WIRE: &str = "%Y-%m-%d";

/// Format shown to the user (`dd/MM/yyyy`).
pub const DATE_FORMAT_DISPLAY: &str = "%d/%m/%Y";

const UNSET: &str = "___";

/// A possibly incomplete date range.
///
/// The only rule enforced before submission is that both ends are set.
/// Ordering is not checked; the server decides what a reversed range means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Range from two picked days, in either order.
    pub fn pick(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self { start: Some(start), end: Some(end) }
    }

    pub fn set_start(&mut self, date: Option<NaiveDate>) {
        self.start = date;
    }

    pub fn set_end(&mut self, date: Option<NaiveDate>) {
        self.end = date;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both ends, if set.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start?, self.end?))
    }

    /// True if `date` falls within a complete range (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.bounds() {
            Some((start, end)) => date >= start && date <= end,
            None => false,
        }
    }

    /// Number of days covered, inclusive. `None` for incomplete or reversed ranges.
    pub fn days(&self) -> Option<i64> {
        let (start, end) = self.bounds()?;
        let n = (end - start).num_days() + 1;
        (n > 0).then_some(n)
    }

    /// `dd/MM/yyyy - dd/MM/yyyy`, with `___` for unset ends.
    pub fn display(&self) -> String {
        let fmt = |d: Option<NaiveDate>| {
            d.map(|d| d.format(DATE_FORMAT_DISPLAY).to_string())
                .unwrap_or_else(|| UNSET.to_string())
        };
        format!("{} - {}", fmt(self.start), fmt(self.end))
    }
}

/// Format a date for the multipart form.
pub fn wire_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_WIRE).to_string()
}

/// Parse a `yyyy-MM-dd` date.
pub fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT_WIRE).ok()
}
