use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit a cell into exactly `width` display columns.
///
/// Short text is right-padded. Long text is cut on a char boundary and ends
/// in "..", so CJK and emoji cells keep the columns aligned.
fn fit_cell(s: &str, width: usize) -> String {
    let sw = s.width();
    if sw <= width {
        return format!("{}{}", s, " ".repeat(width - sw));
    }

    let marker = if width >= 3 { ".." } else { "" };
    let budget = width - marker.len();
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str(marker);
    used += marker.len();
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Render a plain-text table: header, dashed rule, rows.
/// Column widths fit the widest cell, capped at `max_width`.
pub(crate) fn render_table(columns: &[String], rows: &[Vec<String>], max_width: usize) -> String {
    let ncols = rows.iter().map(Vec::len).chain([columns.len()]).max().unwrap_or(0);
    let mut widths = vec![0usize; ncols];
    for row in std::iter::once(columns).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }
    for w in &mut widths {
        *w = (*w).clamp(1, max_width.max(1));
    }

    let line = |cells: &[String]| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(i, &w)| fit_cell(cells.get(i).map(String::as_str).unwrap_or(""), w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(columns));
    out.push('\n');
    out.push_str(&widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Spreadsheet column letters for `n` columns: A..Z, AA, AB, ...
pub(crate) fn letter_header(n: usize) -> Vec<String> {
    (1..=n)
        .map(|mut k| {
            let mut letters = Vec::new();
            while k > 0 {
                k -= 1;
                letters.push((b'A' + (k % 26) as u8) as char);
                k /= 26;
            }
            letters.iter().rev().collect()
        })
        .collect()
}
