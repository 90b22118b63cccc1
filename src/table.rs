//! Plain-text rendering of mapping pages and lineage listings.

use std::{borrow::Cow, fmt::Write as _};

use itertools::Itertools;

use crate::paginate::{PageSlot, PageWindow};

/// Cells longer than this are cut and end in `…` unless a caller picks another limit.
pub const DEFAULT_MAX_CELL_WIDTH: usize = 40;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    render_table_with_limit(headers, rows, None)
}

/// Renders an aligned table, truncating cells wider than `max_cell_width`.
pub fn render_table_with_limit(
    headers: &[String],
    rows: &[Vec<String>],
    max_cell_width: Option<usize>,
) -> String {
    let fit = |value: &str| -> String {
        let cleaned = sanitize_cell(value);
        match max_cell_width {
            Some(limit) => truncate(cleaned.as_ref(), limit),
            None => cleaned.into_owned(),
        }
    };
    let headers = headers.iter().map(|h| fit(h.as_str())).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| row.iter().take(headers.len()).map(|c| fit(c.as_str())).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths = headers.iter().map(|h| display_width(h).max(1)).collect::<Vec<_>>();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let rule_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<_>>();
    let rule = rule_widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Footer under a page of rows: the visible range and the page strip, with the
/// current page bracketed. Empty when everything fits on one page.
pub fn render_pager(window: &PageWindow, slots: &[PageSlot]) -> String {
    if window.total_items <= window.page_size {
        return String::new();
    }
    let strip = slots
        .iter()
        .map(|slot| match slot {
            PageSlot::Page(page) if *page == window.page => format!("[{page}]"),
            other => other.to_string(),
        })
        .join(" ");
    let previous = if window.has_previous() { "<" } else { " " };
    let next = if window.has_next() { ">" } else { " " };
    format!(
        "{previous} {strip} {next}\nShowing {} to {} of {} entries\n",
        window.start_index + 1,
        window.end_index,
        window.total_items
    )
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(display_width(value));
            format!("{value}{}", " ".repeat(padding))
        })
        .join("  ");
    line.trim_end_matches(' ').to_string()
}

fn truncate(value: &str, limit: usize) -> String {
    if limit == 0 || display_width(value) <= limit {
        return value.to_string();
    }
    let mut cut = value.chars().take(limit.saturating_sub(1)).collect::<String>();
    cut.push('…');
    cut
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI colour sequences end at 'm'
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
