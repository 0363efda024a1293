//! Top header with host, sample span and status.

use mibtop::Dataset;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, data: &Dataset, status: Option<&str>) {
    let host = data.host.as_deref().unwrap_or("unknown host");
    let span = match (data.cpu_total.first(), data.cpu_total.last()) {
        (Some(a), Some(b)) => format!("{} → {}", a.time, b.time),
        _ => "no samples".into(),
    };
    let mut parts = vec![Span::raw(format!(
        "mibtop @ {host} | {} samples | {} cores | {} processes | {span} | q quit",
        data.cpu_total.len(),
        data.cpu_cores.len(),
        data.cpu_processes.len(),
    ))];
    if let Some(msg) = status {
        parts.push(Span::styled(
            format!(" | {msg}"),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(parts)), area);
}
