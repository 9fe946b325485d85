//! `bufalo calendar`: month view with weekend, holiday and range marks.

use chrono::{Datelike, NaiveDate};

use bufalo_core::{month_view, DateRange, DayMark, MonthView};

use crate::CliError;

const LEGEND: &str = "* holiday  + weekend  [ ] selected  ( ) other month";

pub fn cmd_calendar(
    year: Option<i32>,
    month: Option<u32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), CliError> {
    let selection = DateRange::new(from, to);

    // Default to the month holding the range start, then today
    let anchor = from.unwrap_or_else(|| chrono::Local::now().date_naive());
    let year = year.unwrap_or(anchor.year());
    let month = month.unwrap_or(anchor.month());

    let view = month_view(year, month, &selection)
        .ok_or_else(|| CliError::args(format!("invalid month: {}-{:02}", year, month)))?;

    print!("{}", render_month(&view));
    println!();
    println!("Selected range: {}", selection.display());
    println!("{}", LEGEND);
    Ok(())
}

/// Render the grid. Each day is a 5-column cell: open mark, day, kind, close mark.
pub fn render_month(view: &MonthView) -> String {
    let title = format!("{} {}", month_name(view.month), view.year);
    let width = 7 * 5;
    let mut out = format!("{:^width$}\n", title, width = width);
    out.push_str(" Mo   Tu   We   Th   Fr   Sa   Su\n");

    for week in &view.weeks {
        let line: String = week
            .iter()
            .map(|day| {
                let (open, close) = if !day.in_month {
                    ('(', ')')
                } else if day.selected {
                    ('[', ']')
                } else {
                    (' ', ' ')
                };
                let kind = match day.mark {
                    DayMark::Holiday => '*',
                    DayMark::Weekend => '+',
                    DayMark::Workday => ' ',
                };
                format!("{}{:>2}{}{}", open, day.date.day(), kind, close)
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}
