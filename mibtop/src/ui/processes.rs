//! Selected-process utilization chart and the ranked, toggleable process list.

use mibtop::views::ProcessView;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::ui::chart::draw_rate_chart;
use crate::ui::theme::{series_color, CURSOR_BG};
use crate::ui::util::truncate_middle;

pub fn draw_process_chart(f: &mut ratatui::Frame<'_>, area: Rect, view: &ProcessView) {
    let title = format!("Process CPU usage ({} selected)", view.selected.len());
    draw_rate_chart(f, area, title, &view.labels, &view.series);
}

pub fn draw_process_list(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &ProcessView,
    state: &mut ListState,
) {
    // name column width: borders (2) + mark (4) + growth column (10)
    let name_w = area.width.saturating_sub(16).max(8) as usize;
    let items: Vec<ListItem> = view
        .ranking
        .iter()
        .map(|r| {
            let slot = view.selected.iter().position(|n| *n == r.name);
            let (mark, style) = match slot {
                Some(i) => (
                    "[x] ",
                    Style::default()
                        .fg(series_color(i))
                        .add_modifier(Modifier::BOLD),
                ),
                None => ("[ ] ", Style::default()),
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(
                    format!("{:<name_w$}", truncate_middle(&r.name, name_w)),
                    style,
                ),
                Span::raw(format!("{:>10}", r.growth)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Processes by CPU ticks ({} ranked) [space] toggle [r] top [c] clear",
                    view.ranking.len()
                )),
        )
        .highlight_style(Style::default().bg(CURSOR_BG));
    f.render_stateful_widget(list, area, state);
}
