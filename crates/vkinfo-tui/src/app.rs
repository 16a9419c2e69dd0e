//! Interactive viewer.
//!
//! Key events are translated into [`SessionEvent`]s; the session decides what is highlighted
//! and the viewer only scrolls, renders and shows notices.

use crate::config::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::{Duration, Instant};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vkinfo_core::{
    DecoratedLine, DiagnosticProvider, Notice, SearchSession, SessionEvent, SessionState,
};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(3500);

/// Distance between tab stops, in cells.
const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// A transient notification drawn over the text.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub alert: bool,
    pub created_at: Instant,
}

impl Toast {
    fn new(message: String, alert: bool) -> Self {
        Self {
            message,
            alert,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= TOAST_DURATION
    }
}

/// Cells taken by `ch` drawn at cell offset `x` of its line.
///
/// Tabs advance to the next tab stop; everything else follows UAX #11.
fn cell_width_at(ch: char, x: usize) -> usize {
    if ch == '\t' {
        TAB_WIDTH - x % TAB_WIDTH
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(1)
    }
}

/// Cell offset of character `column` in `line`.
fn visual_x(line: &str, column: usize) -> usize {
    line.chars()
        .take(column)
        .fold(0, |x, ch| x + cell_width_at(ch, x))
}

/// Largest character boundary of `line` at or before cell `target`.
fn snap_to_boundary(line: &str, target: usize) -> usize {
    let mut x = 0;
    for ch in line.chars() {
        let next = x + cell_width_at(ch, x);
        if next > target {
            break;
        }
        x = next;
    }
    x
}

/// Replace tabs in `text`, drawn from cell offset `x`, with spaces up to their tab stops.
///
/// Returns the expanded text and the cell offset after it.
fn expand_tabs(text: &str, mut x: usize) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let width = cell_width_at(ch, x);
        if ch == '\t' {
            out.extend(std::iter::repeat_n(' ', width));
        } else {
            out.push(ch);
        }
        x += width;
    }
    (out, x)
}

/// Application state
pub struct App<P> {
    session: SearchSession<P>,
    /// Display lines of the session's decorated text, rebuilt after every session event.
    lines: Vec<DecoratedLine>,
    palette: Palette,
    title: String,
    input_mode: InputMode,
    /// Contents of the search field.
    input: String,
    status_message: String,
    toast: Option<Toast>,
    scroll_top: usize,
    scroll_left: usize,
    viewport_height: usize,
    viewport_width: usize,
    should_quit: bool,
}

impl<P: DiagnosticProvider> App<P> {
    pub fn new(session: SearchSession<P>, palette: Palette) -> Self {
        let title = session.provider().describe();
        let lines = session.decorated().lines();
        Self {
            session,
            lines,
            palette,
            title,
            input_mode: InputMode::Normal,
            input: String::new(),
            status_message: String::new(),
            toast: None,
            scroll_top: 0,
            scroll_left: 0,
            viewport_height: 0,
            viewport_width: 0,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Submit `query` as if typed into the search field.
    pub fn submit(&mut self, query: &str) {
        self.input = query.to_string();
        self.dispatch(SessionEvent::Submit(query.to_string()));
    }

    fn dispatch(&mut self, event: SessionEvent) {
        log::debug!("session event {event:?}");
        let notice = self.session.handle(event);
        self.lines = self.session.decorated().lines();
        if let Some(notice) = notice {
            self.apply_notice(notice);
        }
    }

    /// "Matches found N | Match i/N" for the focused match.
    fn match_status(&self) -> String {
        let count = self.session.match_count();
        match self.session.current_match() {
            Some((index, _)) => format!(
                "{} | {}",
                Notice::MatchesFound(count),
                Notice::Focus { index, count }
            ),
            None => Notice::MatchesFound(count).to_string(),
        }
    }

    /// Reflect a session notice in the status line / toast.
    pub fn apply_notice(&mut self, notice: Notice) {
        match &notice {
            Notice::MatchesFound(_) | Notice::Focus { .. } => {
                self.status_message = self.match_status();
                self.scroll_to_current_match();
            }
            Notice::Cleared => {
                self.status_message.clear();
            }
            Notice::Refreshed { .. } => {
                self.status_message = notice.to_string();
                self.scroll_top = 0;
                self.scroll_left = 0;
            }
            Notice::NoMatch { .. } | Notice::ProviderFailed(_) => {
                self.status_message.clear();
                self.toast = Some(Toast::new(notice.to_string(), notice.is_alert()));
            }
        }
    }

    /// Drop expired toasts.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.toast = None;
        }
    }

    /// Handle keyboard input
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match self.input_mode {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.input.clear();
                self.input_mode = InputMode::Normal;
                self.dispatch(SessionEvent::Close);
            }
            (_, KeyCode::Enter) => {
                self.input_mode = InputMode::Normal;
                self.dispatch(SessionEvent::Submit(self.input.clone()));
            }
            (_, KeyCode::Backspace) => {
                if self.input.pop().is_some() {
                    self.dispatch(SessionEvent::QueryChanged(self.input.clone()));
                }
            }
            (mods, KeyCode::Char(c)) if !mods.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.dispatch(SessionEvent::QueryChanged(self.input.clone()));
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            // Ctrl+X / Ctrl+C / q: quit
            (KeyModifiers::CONTROL, KeyCode::Char('x' | 'c')) | (_, KeyCode::Char('q')) => {
                self.should_quit = true;
            }

            // Ctrl+F or '/': open the search field
            (KeyModifiers::CONTROL, KeyCode::Char('f')) | (_, KeyCode::Char('/')) => {
                self.input_mode = InputMode::Search;
            }

            // Ctrl+R: reload the diagnostic text
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
                self.dispatch(SessionEvent::Refresh);
            }

            // F3 / n, Shift+F3 / N: next / previous match
            (KeyModifiers::NONE, KeyCode::F(3)) | (_, KeyCode::Char('n')) => {
                self.dispatch(SessionEvent::NextMatch);
            }
            (KeyModifiers::SHIFT, KeyCode::F(3)) | (_, KeyCode::Char('N')) => {
                self.dispatch(SessionEvent::PreviousMatch);
            }

            (_, KeyCode::Esc) => {
                self.input.clear();
                self.dispatch(SessionEvent::Close);
            }

            (_, KeyCode::Up) => self.scroll_by(-1),
            (_, KeyCode::Down) => self.scroll_by(1),
            (_, KeyCode::PageUp) => self.scroll_by(-(self.page_size() as isize)),
            (_, KeyCode::PageDown) => self.scroll_by(self.page_size() as isize),
            (_, KeyCode::Home) => {
                self.scroll_top = 0;
                self.scroll_left = 0;
            }
            (_, KeyCode::End) => self.scroll_top = self.max_scroll_top(),
            (_, KeyCode::Left) => self.scroll_left = self.scroll_left.saturating_sub(TAB_WIDTH),
            (_, KeyCode::Right) => self.scroll_left += TAB_WIDTH,

            _ => {}
        }
    }

    fn page_size(&self) -> usize {
        self.viewport_height.max(1)
    }

    fn max_scroll_top(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_height.max(1))
    }

    fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_top.saturating_add_signed(delta);
        self.scroll_top = target.min(self.max_scroll_top());
    }

    /// Scroll so the focused match is visible.
    ///
    /// Does nothing before the first render, when the viewport size is still unknown.
    fn scroll_to_current_match(&mut self) {
        if self.viewport_height == 0 || self.viewport_width == 0 {
            return;
        }
        let Some((_, span)) = self.session.current_match() else {
            return;
        };
        let (line, column) = self.session.decorated().position_of(span.start);
        let line_text = self
            .lines
            .get(line)
            .map(DecoratedLine::text)
            .unwrap_or_default();
        let x = visual_x(&line_text, column);
        let end_x = visual_x(&line_text, column + span.len());

        let height = self.viewport_height;
        if line < self.scroll_top || line >= self.scroll_top + height {
            self.scroll_top = line.saturating_sub(height / 3).min(self.max_scroll_top());
        }

        let width = self.viewport_width;
        if x < self.scroll_left || end_x > self.scroll_left + width {
            self.scroll_left = snap_to_boundary(&line_text, x.saturating_sub(width / 3));
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // text
                Constraint::Length(1), // status line
                Constraint::Length(1), // shortcuts
            ])
            .split(size);

        let text_area = chunks[0];
        self.viewport_height = text_area.height.saturating_sub(2) as usize;
        self.viewport_width = text_area.width.saturating_sub(2) as usize;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());

        self.render_text(frame, text_area);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
        self.render_toast(frame, text_area);
    }

    fn render_text(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll_top)
            .take(self.viewport_height)
            .map(|line| {
                let mut x = 0;
                let spans: Vec<Span> = line
                    .runs
                    .iter()
                    .map(|run| {
                        let style = self
                            .palette
                            .style_for(run.emphasis.depth, run.emphasis.current);
                        let (text, next_x) = expand_tabs(&run.text, x);
                        x = next_x;
                        Span::styled(text, style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .scroll((0, self.scroll_left.min(u16::MAX as usize) as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title)),
            );

        frame.render_widget(paragraph, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let status_text = match self.input_mode {
            InputMode::Search => format!(
                "Search > {}  (Enter=Submit, Esc=Close)",
                self.input
            ),
            InputMode::Normal if !self.status_message.is_empty() => self.status_message.clone(),
            InputMode::Normal => {
                let state = match self.session.state() {
                    SessionState::Idle => "",
                    SessionState::Highlighted => " | highlighted",
                    SessionState::NoMatch => " | no match",
                };
                format!(
                    "Line {}/{}{}",
                    self.scroll_top + 1,
                    self.lines.len(),
                    state
                )
            }
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        frame.render_widget(status_line, area);
        if self.input_mode == InputMode::Search {
            let x = area.x + ("Search > ".width() + self.input.width()) as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "/:Search  Enter:Submit  Esc:Close  F3/n:Next  Shift-F3/N:Prev  Ctrl-R:Refresh  q:Quit";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }

    fn render_toast(&self, frame: &mut Frame, area: Rect) {
        let Some(toast) = &self.toast else {
            return;
        };

        let width = (toast.message.width() as u16 + 4).min(area.width);
        let height = 3.min(area.height);
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height - height,
            width,
            height,
        };

        let color = if toast.alert { Color::LightRed } else { Color::Green };
        let paragraph = Paragraph::new(toast.message.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }
}

#[cfg(test)]
impl<P> App<P> {
    pub fn session(&self) -> &SearchSession<P> {
        &self.session
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_left(&self) -> usize {
        self.scroll_left
    }

    pub fn session_mut(&mut self) -> &mut SearchSession<P> {
        &mut self.session
    }
}
