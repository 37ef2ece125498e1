//! Ratatui-based terminal UI.
//!
//! The TUI shows the four form fields on the left and the result region on
//! the right. Submissions run on a worker thread; while one is in flight the
//! form is locked and the footer shows a spinner.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use tracing::info;

use crate::api::DecisionClient;
use crate::controller::{FormController, ResultView, SubmitStart};
use crate::error::{AppError, EXIT_REMOTE};
use crate::form::Field;
use crate::render::escape;
use crate::render::{ERROR_HINT, ERROR_TITLE, ErrorCard, RESULT_TITLE, ResultCard};

mod keys;
mod worker;

use keys::{Action, HELP, map_key};
use worker::Pending;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const CURSOR: &str = "▏";

/// Start the TUI.
pub fn run(client: DecisionClient) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_REMOTE,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    client: DecisionClient,
    controller: FormController,
    pending: Option<Pending>,
    status: String,
    tick: usize,
}

impl App {
    fn new(client: DecisionClient) -> Self {
        info!("decision form ready");
        Self {
            client,
            controller: FormController::default(),
            pending: None,
            status: "Ready.".to_string(),
            tick: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_pending() {
                needs_redraw = true;
            }
            if self.controller.is_submitting() {
                self.tick = self.tick.wrapping_add(1);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_REMOTE, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_REMOTE, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_REMOTE, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let action = map_key(key, self.controller.form().focus);
                    if self.apply(action) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Hand a finished submission to the controller. Returns true if one arrived.
    fn poll_pending(&mut self) -> bool {
        let Some(outcome) = self.pending.as_ref().and_then(Pending::poll) else {
            return false;
        };
        self.pending = None;
        self.status = match &outcome {
            Ok(_) => "Decision received.".to_string(),
            Err(_) => "Request failed. Edit and resubmit.".to_string(),
        };
        self.controller.finish_submit(outcome);
        true
    }

    /// Apply an action; returns true to quit.
    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Submit => self.submit(),
            Action::Reset => {
                if self.controller.is_submitting() {
                    self.status = "Wait for the current request to finish.".to_string();
                } else {
                    self.controller.reset();
                    self.status = "Form reset.".to_string();
                }
            }
            Action::Dismiss => self.controller.dismiss(),
            Action::DebugBundle => {
                match crate::debug::write_debug_bundle(self.client.config(), &self.controller) {
                    Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
                    Err(err) => self.status = format!("Debug write failed: {err}"),
                }
            }
            Action::NextField | Action::PrevField | Action::Insert(_) | Action::Backspace => {
                let Some(form) = self.controller.form_mut() else {
                    return false;
                };
                match action {
                    Action::NextField => form.focus = form.focus.next(),
                    Action::PrevField => form.focus = form.focus.prev(),
                    Action::Insert(c) => form.insert_char(c),
                    Action::Backspace => form.backspace(),
                    _ => {}
                }
            }
            Action::None => {}
        }
        false
    }

    fn submit(&mut self) {
        match self.controller.begin_submit() {
            SubmitStart::Busy => {
                self.status = "Already submitting.".to_string();
            }
            SubmitStart::Invalid(err) => {
                self.status = format!("{} problem(s) in the form.", err.violations.len());
                if let (Some(first), Some(form)) = (err.violations.first(), self.controller.form_mut()) {
                    form.focus = Field::for_violation(*first);
                }
            }
            SubmitStart::Ready(request) => {
                self.pending = Some(Pending::spawn(self.client.clone(), request));
                self.status = "Submitting...".to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("clarity", Style::default().fg(Color::Cyan)),
            Span::raw(" — decision form | "),
            Span::styled(
                self.client.config().decision_endpoint(),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_form(frame, columns[0]);
        self.draw_result(frame, columns[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Min(4),
            ])
            .split(area);

        for (field, rect) in Field::ALL.iter().zip(rows.iter()) {
            self.draw_field(frame, *field, *rect);
        }
    }

    fn draw_field(&self, frame: &mut ratatui::Frame<'_>, field: Field, area: Rect) {
        let form = self.controller.form();
        let locked = self.controller.is_submitting();
        let focused = form.focus == field && !locked;

        let mut lines: Vec<Line> = form
            .value(field)
            .split('\n')
            .map(|line| Line::from(escape::terminal(line, false)))
            .collect();
        if focused {
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::styled(CURSOR, Style::default().fg(Color::Yellow)));
            }
        }

        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else if locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        // Keep the end of long multi-line fields in view.
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible.max(1)) as u16;

        let p = Paragraph::new(Text::from(lines))
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .title(field.label())
                    .borders(Borders::ALL)
                    .border_style(border),
            );
        frame.render_widget(p, area);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.controller.view() {
            ResultView::Empty => {
                let msg = if self.controller.is_submitting() {
                    format!("{} Waiting for the decision service...", self.spinner())
                } else {
                    "Fill in the form and press Ctrl+S.".to_string()
                };
                let p = Paragraph::new(msg)
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().title("Result").borders(Borders::ALL));
                frame.render_widget(p, area);
            }
            ResultView::Result(card) => draw_result_card(frame, card, area),
            ResultView::Error(card) => draw_error_card(frame, card, area),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        if self.controller.is_submitting() {
            spans.push(Span::styled(
                format!("{} ", self.spinner()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(HELP, Style::default().fg(Color::Gray)));
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)));

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn spinner(&self) -> char {
        SPINNER[self.tick % SPINNER.len()]
    }
}

fn draw_result_card(frame: &mut ratatui::Frame<'_>, card: &ResultCard, area: Rect) {
    let block = Block::default().title(RESULT_TITLE).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Recommendation", heading)),
        Line::from(escape::terminal(&card.recommendation, false)),
        Line::from(""),
        Line::from(Span::styled("Reasoning", heading)),
    ];
    for (idx, reason) in card.reasoning.iter().enumerate() {
        lines.push(Line::from(format!("{}. {}", idx + 1, escape::terminal(reason, false))));
    }
    if let Some(alt) = &card.alternative {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Alternative Option", heading)));
        lines.push(Line::from(escape::terminal(alt, false)));
    }

    let p = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    frame.render_widget(p, parts[0]);

    let gauge = Gauge::default()
        .block(Block::default().title("Confidence Score").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(card.confidence)
        .label(card.confidence_label.clone());
    frame.render_widget(gauge, parts[1]);
}

fn draw_error_card(frame: &mut ratatui::Frame<'_>, card: &ErrorCard, area: Rect) {
    let mut lines: Vec<Line> = card
        .message
        .split('\n')
        .map(|line| Line::from(escape::terminal(line, false)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(ERROR_HINT, Style::default().fg(Color::Gray))));
    lines.push(Line::from(Span::styled("Esc to dismiss", Style::default().fg(Color::Gray))));

    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .title(ERROR_TITLE)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::ApiConfig;
    use crate::domain::DecisionResponse;

    fn app() -> App {
        let config = ApiConfig::new("http://127.0.0.1:9", 1).unwrap();
        App::new(DecisionClient::new(config).unwrap())
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut app = app();
        for c in "pick_db".chars() {
            app.apply(Action::Insert(c));
        }
        app.apply(Action::NextField);
        app.apply(Action::Insert('x'));
        app.apply(Action::Backspace);
        assert_eq!(app.controller.form().decision_type, "pick_db");
        assert_eq!(app.controller.form().context, "");
        assert_eq!(app.controller.form().focus, Field::Context);
    }

    #[test]
    fn invalid_submit_shows_error_card() {
        let mut app = app();
        app.apply(Action::Submit);
        assert!(app.pending.is_none());
        assert!(!app.controller.is_submitting());
        let out = screen(&mut app);
        assert!(out.contains(ERROR_TITLE));
        assert!(out.contains("Decision type is required"));
        assert!(out.contains("Context is required"));
        assert_eq!(app.controller.form().focus, Field::DecisionType);

        for c in "pick_db".chars() {
            app.apply(Action::Insert(c));
        }
        app.apply(Action::Submit);
        assert_eq!(app.controller.form().focus, Field::Context);
    }

    #[test]
    fn result_card_shows_percentage() {
        let mut app = app();
        app.controller.render_result(&DecisionResponse {
            recommendation: "Postgres".to_string(),
            reasoning: vec!["ACID support".to_string()],
            confidence_score: 0.9,
            alternative_option: Some("SQLite".to_string()),
        });
        let out = screen(&mut app);
        assert!(out.contains("Postgres"));
        assert!(out.contains("1. ACID support"));
        assert!(out.contains("90.0%"));
        assert!(out.contains("SQLite"));

        app.apply(Action::Dismiss);
        assert_eq!(app.controller.view(), &ResultView::Empty);
    }

    #[test]
    fn quit_action_stops_the_loop() {
        let mut app = app();
        assert!(app.apply(Action::Quit));
        assert!(!app.apply(Action::None));
    }
}
