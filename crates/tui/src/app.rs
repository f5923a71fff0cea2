//! Main application struct and run loop.
//!
//! [`App`] wires the session controller, the UI state, and the backend
//! client together. Messages from the input handler mutate state
//! synchronously in [`App::update`]; side effects (backend calls) are
//! queued as [`Command`]s, dispatched onto tokio tasks by the run loop,
//! and their results come back as [`AppEvent`]s through a channel. All
//! store and board mutation therefore happens on the UI task, which
//! preserves the user-turn-then-reply ordering of the session.

use crossterm::event::Event;
use nebula_client::ChatClient;
use nebula_protocol::{LaneKind, Message, ScrumCard, ViewKind};
use nebula_store::MessageStore;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tokio::sync::mpsc;

use crate::{
    event::{InputMode, key_to_message, poll_event},
    export,
    layout::{HEADER_HEIGHT, INPUT_HEIGHT, MIN_HEIGHT, MIN_WIDTH, STATUS_HEIGHT},
    session::{ChatSession, ReplyOutcome, SubmitDisposition},
    state::AppState,
    terminal::AppTerminal,
    widgets::{
        render_board_overlay, render_help_overlay, render_input, render_status_bar,
        render_transcript,
    },
};

/// Lines scrolled per page-up/page-down press.
const SCROLL_STEP: u16 = 3;

/// Deferred side effects, queued by `update` and dispatched by the run
/// loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Issue one chat request carrying this text.
    SendMessage(String),
    /// Ask the backend to clear its history.
    ClearBackendHistory,
    /// Fetch the current credit balance.
    FetchCredits,
}

/// Results of dispatched commands, delivered back to the UI task.
#[derive(Debug)]
pub enum AppEvent {
    /// Outcome of a chat request.
    Reply(ReplyOutcome),
    /// Outcome of the backend history clear.
    ClearResult(Result<(), String>),
    /// Outcome of a credit fetch.
    Credits(Result<u64, String>),
}

/// The main application struct.
///
/// Manages the application state and provides the main event loop.
pub struct App {
    state: AppState,
    session: ChatSession,
    client: ChatClient,
    should_quit: bool,
    outbox: Vec<Command>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Creates a new application around a message store and a backend
    /// client.
    #[must_use]
    pub fn new(store: MessageStore, client: ChatClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            session: ChatSession::new(store),
            client,
            should_quit: false,
            outbox: Vec::new(),
            events_tx,
            events_rx,
        }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns a reference to the chat session.
    #[must_use]
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Returns the commands queued since the last dispatch.
    #[must_use]
    pub fn pending_commands(&self) -> &[Command] {
        &self.outbox
    }

    /// Updates the application state based on a message.
    ///
    /// While the board overlay is open it captures all input; while help
    /// is visible most keys dismiss it instead of performing their
    /// normal action.
    pub fn update(&mut self, msg: Message) {
        if self.state.help_visible {
            match msg {
                Message::Quit => self.should_quit = true,
                Message::ToggleHelp | Message::Escape => self.state.toggle_help(),
                // Any other key dismisses help
                _ => {
                    let _ = self.state.dismiss_help();
                }
            }
            return;
        }

        if self.state.board_visible {
            match msg {
                Message::Quit => self.should_quit = true,
                Message::Escape | Message::ToggleBoard => self.state.toggle_board(),
                Message::ToggleHelp => self.state.toggle_help(),
                Message::BoardLeft => self.state.board_navigate_left(),
                Message::BoardRight => self.state.board_navigate_right(),
                Message::BoardUp => self.state.board_navigate_up(),
                Message::BoardDown => self.state.board_navigate_down(),
                Message::BoardMoveLeft => {
                    let _ = self.state.move_selected_card_left();
                }
                Message::BoardMoveRight => {
                    let _ = self.state.move_selected_card_right();
                }
                _ => {}
            }
            return;
        }

        match msg {
            Message::Quit => self.should_quit = true,
            Message::Escape => self.handle_escape(),
            Message::CycleView => self.state.cycle_view(),
            Message::InputChar { ch } => self.handle_input_char(ch),
            Message::InputBackspace => self.handle_input_backspace(),
            Message::Submit => self.handle_submit(),
            Message::ScrollUp => {
                self.state.scroll = self.state.scroll.saturating_add(SCROLL_STEP);
            }
            Message::ScrollDown => {
                self.state.scroll = self.state.scroll.saturating_sub(SCROLL_STEP);
            }
            Message::ToggleBoard => self.state.toggle_board(),
            Message::ToggleHelp => self.state.toggle_help(),
            Message::ClearHistory => self.handle_clear_history(),
            Message::ExportTranscript => self.handle_export(),
            // Board messages are handled above when the overlay is open
            _ => {}
        }
    }

    /// Applies the result of a dispatched command.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Reply(outcome) => {
                let resolution = self.session.resolve(outcome);
                let succeeded = resolution.card_title.is_some();

                if let Some(credits) = resolution.credits {
                    self.state.credits = Some(credits);
                } else if succeeded {
                    // Reply carried no balance: ask the backend.
                    self.outbox.push(Command::FetchCredits);
                }

                if let Some(title) = resolution.card_title {
                    self.state
                        .board
                        .add_card(ScrumCard::with_lane(title, LaneKind::Done));
                }

                self.state.scroll = 0;
            }
            AppEvent::ClearResult(Err(detail)) => {
                self.state
                    .set_notice(format!("Backend history not cleared: {detail}"));
            }
            AppEvent::ClearResult(Ok(())) => {}
            AppEvent::Credits(Ok(credits)) => self.state.credits = Some(credits),
            AppEvent::Credits(Err(_)) => self.state.credits = None,
        }
    }

    fn handle_escape(&mut self) {
        if self.state.notice.take().is_some() {
            return;
        }
        if let Some(input) = self.state.active_input_mut() {
            input.clear();
        }
    }

    fn handle_input_char(&mut self, ch: char) {
        // The input surface is locked for the duration of one round trip.
        if self.state.view == ViewKind::Chat && !self.session.input_enabled() {
            return;
        }
        if let Some(input) = self.state.active_input_mut() {
            input.push(ch);
        }
    }

    fn handle_input_backspace(&mut self) {
        if self.state.view == ViewKind::Chat && !self.session.input_enabled() {
            return;
        }
        if let Some(input) = self.state.active_input_mut() {
            input.pop();
        }
    }

    fn handle_submit(&mut self) {
        if self.state.view != ViewKind::Chat {
            // Search filters as you type; library has nothing to submit.
            return;
        }

        let raw = self.state.input.clone();
        if let SubmitDisposition::Dispatched(text) = self.session.submit(&raw) {
            self.state.input.clear();
            self.state.scroll = 0;
            self.outbox.push(Command::SendMessage(text));
        }
    }

    fn handle_clear_history(&mut self) {
        self.session.clear();
        self.state.scroll = 0;
        self.state.set_notice("History cleared.");
        self.outbox.push(Command::ClearBackendHistory);
    }

    fn handle_export(&mut self) {
        match export::write_transcript(self.session.store().all()) {
            Ok(path) => {
                // Opening the browser is best-effort.
                let _ = open::that(&path);
                self.state
                    .set_notice(format!("Transcript exported to {}", path.display()));
            }
            Err(err) => self.state.set_notice(format!("Export failed: {err}")),
        }
    }

    fn input_mode(&self) -> InputMode {
        if self.state.board_visible {
            InputMode::Board
        } else if self.state.view.has_text_input() {
            InputMode::Text
        } else {
            InputMode::Browse
        }
    }

    /// Spawns a task for every queued command.
    fn dispatch_commands(&mut self) {
        for command in self.outbox.drain(..) {
            let client = self.client.clone();
            let tx = self.events_tx.clone();
            match command {
                Command::SendMessage(text) => {
                    tokio::spawn(async move {
                        let outcome = match client.send_message(&text).await {
                            Ok(reply) => ReplyOutcome::Reply(reply),
                            Err(err) => ReplyOutcome::Failed {
                                detail: err.to_string(),
                            },
                        };
                        let _ = tx.send(AppEvent::Reply(outcome));
                    });
                }
                Command::ClearBackendHistory => {
                    tokio::spawn(async move {
                        let result = client.clear_history().await.map_err(|e| e.to_string());
                        let _ = tx.send(AppEvent::ClearResult(result));
                    });
                }
                Command::FetchCredits => {
                    tokio::spawn(async move {
                        let result = client.billing_status().await.map_err(|e| e.to_string());
                        let _ = tx.send(AppEvent::Credits(result));
                    });
                }
            }
        }
    }

    /// Runs the main application loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        self.outbox.push(Command::FetchCredits);

        loop {
            self.dispatch_commands();

            terminal.draw(|frame| self.view(frame))?;

            if let Some(Event::Key(key)) = poll_event()? {
                if let Some(msg) = key_to_message(key, self.input_mode()) {
                    self.update(msg);
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.apply_event(event);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Renders the application UI to the given frame.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.render_terminal_too_small(frame, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);

        match self.state.view {
            ViewKind::Chat => self.render_chat(frame, chunks[1]),
            ViewKind::Search => self.render_search(frame, chunks[1]),
            ViewKind::Library => self.render_library(frame, chunks[1]),
        }

        let buf = frame.buffer_mut();
        render_status_bar(self.state.credits, self.state.notice.as_deref(), chunks[2], buf);

        if self.state.board_visible {
            render_board_overlay(
                &self.state.board,
                self.state.selected_lane,
                self.state.selected_card,
                area,
                buf,
            );
        }

        if self.state.help_visible {
            render_help_overlay(area, buf);
        }
    }

    fn render_terminal_too_small(&self, frame: &mut Frame, area: Rect) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        frame.render_widget(paragraph, centered);
    }

    /// Renders the header bar: title on the left, view tabs on the right.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [title_area, tabs_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(30)]).areas(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "nebula",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled("Scenario Agent", Style::default().fg(Color::White)),
        ]));
        frame.render_widget(title, title_area);

        let mut spans = Vec::new();
        for view in ViewKind::all() {
            let style = if view == self.state.view {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", view.display_name()), style));
        }
        let tabs = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
        frame.render_widget(tabs, tabs_area);
    }

    fn render_chat(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
            .split(area);

        let buf = frame.buffer_mut();
        render_transcript(
            self.session.store().all(),
            self.session.is_in_flight(),
            self.state.scroll,
            chunks[0],
            buf,
        );
        render_input(
            &self.state.input,
            self.session.input_enabled(),
            chunks[1],
            buf,
        );
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)])
            .split(area);

        let query = Paragraph::new(Line::from(vec![
            Span::styled(self.state.search_query.clone(), Style::default().fg(Color::White)),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
        ]))
        .block(
            Block::default()
                .title(" Search history ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(query, chunks[0]);

        let matches = self.session.search(&self.state.search_query);
        let mut lines = Vec::new();
        for turn in &matches {
            lines.push(Line::from(vec![
                Span::styled(
                    if turn.role.is_user() { "You    " } else { "Nebula " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    turn.text.replace('\n', " "),
                    Style::default().fg(Color::White),
                ),
            ]));
        }
        if matches.is_empty() && !self.state.search_query.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                "No matching turns.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let results = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" Results ({}) ", matches.len()))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(results, chunks[1]);
    }

    fn render_library(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for entry in &self.state.library {
            lines.push(Line::from(Span::styled(
                entry.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                entry.description.clone(),
                Style::default().fg(Color::White),
            )));
            lines.push(Line::from(""));
        }

        let library = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Library ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(library, area);
    }
}
