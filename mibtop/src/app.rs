//! App state and main loop: input handling, process selection, and drawing.
//!
//! The pipeline stays pure; this layer only turns key presses into a new selection
//! and asks the process view to re-derive itself.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
    Terminal,
};

use mibtop::rank::top_k;
use mibtop::{Dataset, PipelineOptions, Views};

use crate::ui::{
    cpu::draw_cpu_chart,
    groups::draw_group_usage,
    header::draw_header,
    processes::{draw_process_chart, draw_process_list},
};

const PAGE: usize = 10;

fn unpaired_status(views: &Views) -> Option<String> {
    let n = views
        .processes
        .unpaired
        .len()
        .max(views.groups.unpaired().len());
    (n > 0).then(|| format!("{n} processes left out: no matching total-CPU sample"))
}

pub struct App {
    data: Dataset,
    views: Views,
    opts: PipelineOptions,

    // Cursor into the ranking list
    cursor: usize,
    list_state: ListState,

    // Unpaired-process notice, shown in the header
    status: Option<String>,

    // Quit flag
    should_quit: bool,
}

impl App {
    pub fn new(data: Dataset, views: Views, opts: PipelineOptions) -> Self {
        let status = unpaired_status(&views);
        Self {
            data,
            views,
            opts,
            cursor: 0,
            list_state: ListState::default().with_selected(Some(0)),
            status,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal);

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        let last = self.views.processes.ranking.len().saturating_sub(1);
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1).min(last),
            KeyCode::PageUp => self.cursor = self.cursor.saturating_sub(PAGE),
            KeyCode::PageDown => self.cursor = (self.cursor + PAGE).min(last),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = last,
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_under_cursor(),
            KeyCode::Char('r') => {
                let names = top_k(&self.views.processes.ranking, self.opts.top_k);
                self.apply_selection(names);
            }
            KeyCode::Char('c') => self.apply_selection(Vec::new()),
            _ => {}
        }
        self.list_state.select(Some(self.cursor));
    }

    fn toggle_under_cursor(&mut self) {
        let Some(name) = self
            .views
            .processes
            .ranking
            .get(self.cursor)
            .map(|r| r.name.clone())
        else {
            return;
        };
        let mut names = self.views.processes.selected.clone();
        match names.iter().position(|n| *n == name) {
            Some(i) => {
                names.remove(i);
            }
            None => names.push(name),
        }
        self.apply_selection(names);
    }

    fn apply_selection(&mut self, names: Vec<String>) {
        self.views
            .processes
            .reselect(&self.data, names, self.opts.pairing);
        self.status = unpaired_status(&self.views);
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, cpu chart, processes, group usage
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Percentage(35),
                Constraint::Min(10),
                Constraint::Length(9),
            ])
            .split(area);

        draw_header(f, rows[0], &self.data, self.status.as_deref());
        draw_cpu_chart(f, rows[1], &self.views.cpu);

        let procs_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[2]);
        draw_process_chart(f, procs_lr[0], &self.views.processes);
        draw_process_list(f, procs_lr[1], &self.views.processes, &mut self.list_state);

        draw_group_usage(f, rows[3], &self.views.groups);
    }
}
