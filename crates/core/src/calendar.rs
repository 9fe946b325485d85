//! Calendar marks for the date picker.
//!
//! Weekends and a fixed list of 2024 Colombian public holidays are flagged
//! for display. Nothing in the submission path reads these marks.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::range::DateRange;

/// Fixed public holidays shown on the picker, as (year, month, day).
pub const COLOMBIAN_HOLIDAYS_2024: [(i32, u32, u32); 17] = [
    (2024, 1, 1),
    (2024, 1, 8),
    (2024, 3, 25),
    (2024, 3, 28),
    (2024, 3, 29),
    (2024, 5, 1),
    (2024, 6, 3),
    (2024, 6, 24),
    (2024, 7, 1),
    (2024, 7, 20),
    (2024, 8, 7),
    (2024, 8, 19),
    (2024, 10, 14),
    (2024, 11, 4),
    (2024, 11, 11),
    (2024, 12, 8),
    (2024, 12, 25),
];

/// How a day is highlighted. A holiday on a weekend shows as a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMark {
    Workday,
    Weekend,
    Holiday,
}

pub fn is_holiday(date: NaiveDate) -> bool {
    COLOMBIAN_HOLIDAYS_2024
        .iter()
        .any(|&(y, m, d)| date.year() == y && date.month() == m && date.day() == d)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn day_mark(date: NaiveDate) -> DayMark {
    if is_holiday(date) {
        DayMark::Holiday
    } else if is_weekend(date) {
        DayMark::Weekend
    } else {
        DayMark::Workday
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days of neighbouring months.
    pub in_month: bool,
    pub mark: DayMark,
    pub selected: bool,
}

/// A month laid out as Monday-first weeks.
#[derive(Debug, Clone)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[CalendarDay; 7]>,
}

/// Lay out `year`/`month`, marking days inside `selection`.
///
/// Returns `None` for an invalid month, or when the grid would run past the
/// representable date range.
pub fn month_view(year: i32, month: u32, selection: &DateRange) -> Option<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = Duration::days(first.weekday().num_days_from_monday() as i64);
    let mut cursor = first.checked_sub_signed(lead)?;

    let mut weeks = Vec::new();
    loop {
        let mut days = Vec::with_capacity(7);
        for offset in 0..7 {
            let date = cursor.checked_add_signed(Duration::days(offset))?;
            days.push(CalendarDay {
                date,
                in_month: date.month() == month && date.year() == year,
                mark: day_mark(date),
                selected: selection.contains(date),
            });
        }
        weeks.push(<[CalendarDay; 7]>::try_from(days).ok()?);

        // The last week ends on a representable Sunday, so a missing next
        // Monday also means the month is done
        match cursor.checked_add_signed(Duration::days(7)) {
            Some(next) if next.month() == month && next.year() == year => cursor = next,
            _ => break,
        }
    }

    Some(MonthView { year, month, weeks })
}

impl MonthView {
    pub fn days_in_month(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten().filter(|d| d.in_month)
    }
}
