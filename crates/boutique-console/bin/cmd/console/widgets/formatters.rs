use boutique_console::notify::status_family;
use boutique_console::{page_window, PageEntry};
use chrono::{DateTime, Local, Utc};
use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Cell,
};

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let keep: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", keep)
    }
}

pub(crate) fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

pub(crate) fn format_datetime(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(v) => v.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub(crate) fn format_flag(active: Option<bool>) -> String {
    match active {
        Some(true) => "active".to_string(),
        Some(false) => "inactive".to_string(),
        None => "-".to_string(),
    }
}

/// Status cell colored by family: settled green, in-flight yellow,
/// cancelled red.
pub(crate) fn status_cell(status: &str) -> Cell<'static> {
    let color = match status_family(status) {
        "delivered" | "confirmed" => Color::Green,
        "cancelled" => Color::Red,
        "pending" | "preparing" | "shipped" => Color::Yellow,
        _ => Color::Gray,
    };
    Cell::from(status.to_string()).style(Style::default().fg(color))
}

/// Pager line under the orders table: ` 1 2 [3] 4 ... 10 `. Empty when a
/// single page exists so the caller can skip rendering it.
pub(crate) fn page_line(current: u64, total: u64) -> Line<'static> {
    let entries = page_window(current, total);
    if entries.is_empty() {
        return Line::default();
    }

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for entry in entries {
        match entry {
            PageEntry::Page(n) if n == current => {
                spans.push(format!("[{}]", n).bold().yellow());
            }
            PageEntry::Page(n) => spans.push(Span::raw(n.to_string())),
            PageEntry::Gap => spans.push("...".dark_gray()),
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}
