//! Interactive pager main loop.
//!
//! The loop thread is the only writer of [`RenderedView`]. Content and mode
//! changes are submitted to the [`RenderScheduler`]; each tick polls for the
//! latest finished pass. Query edits only re-run the search highlighter.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use crate::cache::RenderCache;
use crate::error::{Result, ViewError};
use crate::render::{Document, Renderer};
use crate::scheduler::{RenderOutcome, RenderScheduler, RenderedView};

use super::{color, number_width, to_lines};

const TICK: Duration = Duration::from_millis(50);

/// Initial pager settings.
#[derive(Debug, Clone, Default)]
pub struct PagerOptions {
    /// Title shown on the border.
    pub title: String,
    /// Start in diff mode.
    pub diff_mode: bool,
    /// Start with wrapping on.
    pub wrap: bool,
    /// Initial search query.
    pub search: String,
    /// Font size passed through to the renderer.
    pub font_size: f32,
}

struct Pager {
    text: Arc<str>,
    options: PagerOptions,
    scheduler: RenderScheduler,
    view: RenderedView,
    lines: Vec<Line<'static>>,
    scroll: usize,
    columns: usize,
    searching: bool,
    quit: bool,
}

impl Pager {
    fn new(text: Arc<str>, options: PagerOptions, renderer: Renderer, cache: RenderCache) -> Self {
        Self {
            text,
            options,
            scheduler: RenderScheduler::new(renderer, cache),
            view: RenderedView::new(),
            lines: Vec::new(),
            scroll: 0,
            columns: 80,
            searching: false,
            quit: false,
        }
    }

    fn submit(&self) {
        let doc = Document::new(Arc::clone(&self.text))
            .with_diff_mode(self.options.diff_mode)
            .with_wrap(self.options.wrap)
            .with_font_size(self.options.font_size)
            .with_search(self.options.search.clone());
        self.scheduler.submit(doc);
    }

    /// Install any finished pass. Returns whether the display changed.
    fn refresh(&mut self) -> bool {
        match self.scheduler.try_next() {
            Some(outcome) => self.install(outcome),
            None => false,
        }
    }

    fn install(&mut self, outcome: RenderOutcome) -> bool {
        if !self
            .view
            .apply(outcome, self.scheduler.latest_generation())
        {
            return false;
        }
        // The pass may have been submitted before the latest query edit.
        let stale = self
            .view
            .document()
            .is_some_and(|doc| doc.search_query != self.options.search);
        if stale {
            self.update_query();
        } else {
            self.rebuild_lines();
        }
        true
    }

    fn rebuild_lines(&mut self) {
        let (Some(doc), Some(result)) = (self.view.document(), self.view.result()) else {
            return;
        };
        let text_columns = self.columns.saturating_sub(number_width(result) + 2);
        self.lines = to_lines(
            &doc.text,
            result,
            self.scheduler.renderer().theme(),
            self.options.wrap,
            text_columns,
        );
        self.scroll = self.scroll.min(self.lines.len().saturating_sub(1));
    }

    fn set_columns(&mut self, columns: usize) {
        if columns != self.columns {
            self.columns = columns;
            self.rebuild_lines();
        }
    }

    fn update_query(&mut self) {
        let matches = self
            .view
            .set_query(self.scheduler.renderer(), &self.options.search);
        debug!(query = %self.options.search, matches, "query updated");
        self.rebuild_lines();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.searching {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.searching = false,
                KeyCode::Backspace => {
                    self.options.search.pop();
                    self.update_query();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.options.search.push(c);
                    self.update_query();
                }
                _ => {}
            }
            return;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Char('q') | KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                self.quit = true;
            }
            (_, KeyCode::Char('j') | KeyCode::Down) => self.scroll_by(1),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.scroll_by(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(20),
            (_, KeyCode::PageUp) => self.scroll_by(-20),
            (_, KeyCode::Char('g') | KeyCode::Home) => self.scroll = 0,
            (_, KeyCode::Char('G') | KeyCode::End) => {
                self.scroll = self.lines.len().saturating_sub(1);
            }
            (_, KeyCode::Char('/')) => {
                self.searching = true;
                self.options.search.clear();
                self.update_query();
            }
            (_, KeyCode::Char('w')) => {
                self.options.wrap = !self.options.wrap;
                self.submit();
            }
            (_, KeyCode::Char('d')) => {
                self.options.diff_mode = !self.options.diff_mode;
                self.submit();
            }
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    fn status_line(&self) -> Line<'static> {
        let theme = self.scheduler.renderer().theme();
        let matches = self.view.result().map_or(0, |r| r.search_matches);
        let mode = if self.options.diff_mode { "diff" } else { "plain" };
        let wrap = if self.options.wrap { "wrap" } else { "nowrap" };
        let pending = if self.view.applied_generation() == self.scheduler.latest_generation() {
            ""
        } else {
            " rendering…"
        };
        let search = if self.searching {
            format!(" /{}", self.options.search)
        } else if self.options.search.trim().is_empty() {
            String::new()
        } else {
            format!(" \"{}\" ({matches})", self.options.search.trim())
        };

        Line::from(vec![
            Span::styled(
                format!(" {mode} | {wrap} | {}/{}", self.scroll + 1, self.lines.len().max(1)),
                Style::default().fg(color(theme.gutter)),
            ),
            Span::styled(search, Style::default().fg(color(theme.search_bg))),
            Span::styled(
                pending.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
            Span::styled(
                "  q quit · / search · w wrap · d diff",
                Style::default().fg(color(theme.comment)),
            ),
        ])
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        self.set_columns(chunks[0].width.saturating_sub(2) as usize);

        let body = Paragraph::new(self.lines.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.options.title.clone()),
            )
            .scroll((self.scroll.min(u16::MAX as usize) as u16, 0));
        frame.render_widget(body, chunks[0]);
        frame.render_widget(Paragraph::new(self.status_line()), chunks[1]);
    }
}

/// Run the pager over `text` until the user quits.
pub fn run(text: String, options: PagerOptions, renderer: Renderer, cache: RenderCache) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        ViewError::io(
            "Cannot launch pager - no interactive terminal available",
            e,
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| ViewError::io("Failed to enter alternate screen", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| ViewError::io("Failed to create terminal", e))?;

    let mut pager = Pager::new(Arc::from(text), options, renderer, cache);
    pager.submit();
    let result = run_loop(&mut terminal, &mut pager);

    disable_raw_mode().map_err(|e| ViewError::io("Failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| ViewError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| ViewError::io("Failed to show cursor", e))?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    pager: &mut Pager,
) -> Result<()> {
    while !pager.quit {
        pager.refresh();

        terminal
            .draw(|f| pager.draw(f))
            .map_err(|e| ViewError::io("Failed to draw pager", e))?;

        if event::poll(TICK).map_err(|e| ViewError::io("Failed to poll events", e))? {
            match event::read().map_err(|e| ViewError::io("Failed to read event", e))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => pager.handle_key(key),
                _ => {}
            }
        }
    }
    Ok(())
}
