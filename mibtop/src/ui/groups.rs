//! Per-group average utilization bars.

use mibtop::aggregate::GroupUsage;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
};

use crate::ui::theme::series_color;

pub fn draw_group_usage(f: &mut ratatui::Frame<'_>, area: Rect, usage: &GroupUsage) {
    // Bars carry tenths of a percent so small groups still show up
    let bars: Vec<Bar> = usage
        .iter()
        .enumerate()
        .map(|(i, (group, v))| {
            Bar::default()
                .label(Line::from(group.to_string()))
                .value((v.max(0.0) * 10.0).round() as u64)
                .text_value(format!("{v:.1}"))
                .style(Style::default().fg(series_color(i)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Average CPU usage by process group (sum of per-process means)"),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(16)
        .bar_gap(2);
    f.render_widget(chart, area);
}
