//! Small UI helpers: truncation and axis labels.

use mibtop::types::Timestamp;
use ratatui::text::Span;

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

// First, middle and last label as HH:MM:SS
pub fn time_axis_labels(labels: &[Timestamp]) -> Vec<Span<'static>> {
    let fmt = |t: &Timestamp| Span::raw(t.format("%H:%M:%S").to_string());
    match labels {
        [] => vec![],
        [only] => vec![fmt(only)],
        [first, .., last] => vec![fmt(first), fmt(&labels[labels.len() / 2]), fmt(last)],
    }
}
