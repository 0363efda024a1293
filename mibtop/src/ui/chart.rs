//! Percentage line chart shared by the CPU and process panels.

use mibtop::types::Timestamp;
use mibtop::views::LabeledSeries;
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::ui::theme::series_color;
use crate::ui::util::{time_axis_labels, truncate_middle};

/// Gaps (`None`) are left out rather than drawn as zero.
pub fn draw_rate_chart(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: String,
    labels: &[Timestamp],
    series: &[LabeledSeries],
) {
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (s, pts))| {
            Dataset::default()
                .name(truncate_middle(&s.label, 24))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(pts)
        })
        .collect();

    let x_max = labels.len().saturating_sub(1).max(1) as f64;
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Time")
                .bounds([0.0, x_max])
                .labels(time_axis_labels(labels)),
        )
        .y_axis(
            Axis::default()
                .title("% CPU")
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    f.render_widget(chart, area);
}
