//! Total and per-core CPU utilization over the total-CPU timeline.

use mibtop::views::CpuView;
use ratatui::layout::Rect;

use crate::ui::chart::draw_rate_chart;

pub fn draw_cpu_chart(f: &mut ratatui::Frame<'_>, area: Rect, view: &CpuView) {
    let cores = view.series.len().saturating_sub(1);
    let title = format!("CPU usage (total + {cores} cores)");
    draw_rate_chart(f, area, title, &view.labels, &view.series);
}
