use std::io;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use fncs_terminal::cards::{NO_STATS_TEXT, StatCard, StatsView};
use fncs_terminal::config::{Config, SourceKind};
use fncs_terminal::demo::DemoStatsApi;
use fncs_terminal::error::DashboardError;
use fncs_terminal::logging;
use fncs_terminal::provider;
use fncs_terminal::refresh::{RefreshOutcome, RefreshState};
use fncs_terminal::selection::{Selector, SelectorLevel};
use fncs_terminal::state::{AppState, Delta, ProviderCommand, Theme, apply_delta};
use fncs_terminal::stats_api::{HttpStatsApi, StatsApi};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    source_label: String,
}

impl App {
    fn new(
        state: AppState,
        cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
        source_label: String,
    ) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            source_label,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.state.focus_next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.state.focus_prev(),
            KeyCode::Char('j') | KeyCode::Down => self.state.step_focused(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.step_focused(-1),
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('t') | KeyCode::Char('T') => self.state.toggle_theme(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        if !self.state.begin_refresh() {
            self.state.push_log("[INFO] Refresh already in progress");
            return;
        }
        let sent = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(ProviderCommand::Refresh).is_ok());
        if !sent {
            let error = DashboardError::RefreshRequest("refresh worker unavailable".to_string());
            self.state
                .finish_refresh(RefreshOutcome::failed(error), Instant::now());
        }
    }

    fn request_reload(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Stats reload unavailable");
            return;
        };
        if tx.send(ProviderCommand::Reload).is_err() {
            self.state.push_log("[WARN] Stats reload request failed");
        } else {
            self.state.push_log("[INFO] Stats reload requested");
        }
    }

    /// Applies pending worker deltas. A dead worker can never answer, so an
    /// in-flight refresh is closed out as failed.
    fn drain_deltas(&mut self, rx: &mpsc::Receiver<Delta>) {
        loop {
            match rx.try_recv() {
                Ok(delta) => apply_delta(&mut self.state, delta, Instant::now()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.state.refresh == RefreshState::Refreshing {
                        let error =
                            DashboardError::RefreshRequest("refresh worker stopped".to_string());
                        self.state
                            .finish_refresh(RefreshOutcome::failed(error), Instant::now());
                    }
                    self.cmd_tx = None;
                    break;
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let config = Config::load();
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: file logging disabled: {err:#}");
            None
        }
    };

    let api: Box<dyn StatsApi + Send> = match config.source {
        SourceKind::Http => Box::new(HttpStatsApi::new(&config.base_url)),
        SourceKind::Demo => Box::new(DemoStatsApi::new()),
    };
    let source_label = match config.source {
        SourceKind::Http => config.base_url.clone(),
        SourceKind::Demo => "demo data".to_string(),
    };
    tracing::info!(source = %source_label, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(api, tx, cmd_rx);

    let state = AppState::with_roster(config.players.clone());
    let mut app = App::new(state, Some(cmd_tx), source_label);
    let res = run_app(&mut terminal, &mut app, rx, config.tick_rate);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(%err, "terminal loop failed");
    }
    res.map_err(Into::into)
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        app.drain_deltas(&rx);
        app.state.expire_notification(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

struct Palette {
    base: Style,
    accent: Color,
    dim: Color,
    error: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            base: Style::default().fg(Color::Black).bg(Color::White),
            accent: Color::Blue,
            dim: Color::Gray,
            error: Color::Red,
        },
        Theme::Dark => Palette {
            base: Style::default().fg(Color::White).bg(Color::Black),
            accent: Color::Cyan,
            dim: Color::DarkGray,
            error: Color::LightRed,
        },
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let colors = palette(app.state.theme);
    frame.render_widget(Block::default().style(colors.base), frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(colors.base)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_selectors(frame, chunks[1], &app.state, &colors);
    render_stats(frame, chunks[2], &app.state.view, &colors);
    render_notification(frame, chunks[3], &app.state, &colors);

    let console = Paragraph::new(console_text(&app.state))
        .style(colors.base)
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[4]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(colors.dim))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[5]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size(), &colors);
    }
}

fn header_text(app: &App) -> String {
    let state = &app.state;
    let updated = state.last_update.as_deref().unwrap_or("never");
    let records = if state.loaded {
        format!("{} records", state.store.len())
    } else {
        "loading...".to_string()
    };
    let refresh = match state.refresh {
        RefreshState::Idle => format!("[{}] (r)", state.refresh.label()),
        RefreshState::Refreshing => format!("[{}]", state.refresh.label()),
    };
    format!(
        "FNCS STATS | {} | {records} | Last update: {updated}\n{refresh}",
        app.source_label
    )
}

fn render_selectors(frame: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(area);

    let levels = [
        SelectorLevel::Player,
        SelectorLevel::Tournament,
        SelectorLevel::Window,
    ];
    for (level, col) in levels.into_iter().zip(cols.iter()) {
        let selector = state.selection.selector(level);
        let focused = state.focus == level;
        render_selector(frame, *col, level, selector, focused, colors);
    }
}

fn render_selector(
    frame: &mut Frame,
    area: Rect,
    level: SelectorLevel,
    selector: &Selector,
    focused: bool,
    colors: &Palette,
) {
    let border_style = if !selector.is_enabled() {
        Style::default().fg(colors.dim)
    } else if focused {
        Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let text_style = if selector.is_enabled() {
        colors.base
    } else {
        colors.base.fg(colors.dim)
    };

    let total = selector.options.options.len();
    let title = if selector.is_enabled() {
        format!("{} {}/{}", level.label(), selector.cursor, total)
    } else {
        format!("{} (disabled)", level.label())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let paragraph = Paragraph::new(selector_text(level, selector))
        .style(text_style)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn selector_text(level: SelectorLevel, selector: &Selector) -> String {
    let Some(idx) = selector.cursor.checked_sub(1) else {
        return level.placeholder().to_string();
    };
    selector
        .options
        .options
        .get(idx)
        .cloned()
        .unwrap_or_else(|| level.placeholder().to_string())
}

fn render_stats(frame: &mut Frame, area: Rect, view: &StatsView, colors: &Palette) {
    match view {
        StatsView::Cleared => {
            let empty = Paragraph::new("Select a player to view stats")
                .style(colors.base.fg(colors.dim));
            frame.render_widget(empty, area);
        }
        StatsView::NoStats => {
            let empty = Paragraph::new(NO_STATS_TEXT).style(colors.base);
            frame.render_widget(empty, area);
        }
        StatsView::Cards(cards) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 4); 4])
                .split(area);
            for (card, col) in cards.iter().zip(cols.iter()) {
                render_card(frame, *col, card, colors);
            }
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &StatCard, colors: &Palette) {
    let mut lines: Vec<Line> = card
        .lines
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), colors.base.add_modifier(Modifier::BOLD))))
        .collect();
    if let Some(subtext) = &card.subtext {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            subtext.clone(),
            colors.base.fg(colors.dim),
        )));
    }
    let block = Block::default()
        .title(card.title.as_str())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent));
    let paragraph = Paragraph::new(lines)
        .style(colors.base)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_notification(frame: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let Some(notice) = &state.notification else {
        return;
    };
    let paragraph = Paragraph::new(notice.message.as_str())
        .style(colors.base.fg(colors.error).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(state: &AppState) -> String {
    format!(
        "Tab/←/→ Focus | j/k/↑/↓ Change | r Refresh | R Reload | t {} | ? Help | q Quit",
        state.theme.toggle_label()
    )
}

fn render_help_overlay(frame: &mut Frame, area: Rect, colors: &Palette) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FNCS Stats - Help",
        "",
        "Selectors:",
        "  Tab / → / l      Next selector",
        "  Shift-Tab / ← / h  Previous selector",
        "  j / ↓            Next option",
        "  k / ↑            Previous option",
        "",
        "Data:",
        "  r                Refresh",
        "  R                Reload stats",
        "",
        "  t                Toggle theme",
        "  ?                Toggle help",
        "  q / Esc          Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(colors.base);
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
