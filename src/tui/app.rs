use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::sync::{mpsc, Arc};
use std::thread;

use crate::audio::{AzanToggle, PlayerFactory, Playback, ProcessPlayer};
use crate::config::AppConfig;
use crate::db::repository::SyncRepo;
use crate::models::{DelayTimes, PrayerName, Timetable};
use crate::prayer_times::{AladhanClient, FetchError, SyncPolicy, TimingsSource};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{header, notice, prayers, statusbar, sun};
use crate::utils::format::parse_delay;

/// What the widget is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Ready,
    /// Terminal until the widget is mounted again.
    Error(String),
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub timetable: Option<Timetable>,
    pub delays: DelayTimes,
    pub focus_idx: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub azan: AzanToggle,

    // Sync bookkeeping
    pub watermark: Option<DateTime<Utc>>,
    policy: SyncPolicy,
    next_check: Option<DateTime<Utc>>,
    source: Arc<dyn TimingsSource>,
    outbox: mpsc::Sender<Event>,
    pending_fetch: Option<u64>,
    last_ticket: u64,
}

impl App {
    pub fn new(
        config: AppConfig,
        source: Arc<dyn TimingsSource>,
        outbox: mpsc::Sender<Event>,
        player_factory: PlayerFactory,
    ) -> Self {
        let policy = SyncPolicy::from_config(&config.sync);
        App {
            view: View::Loading,
            config,
            timetable: None,
            delays: DelayTimes::default(),
            focus_idx: 0,
            show_help: false,
            should_quit: false,
            azan: AzanToggle::new(player_factory),
            watermark: None,
            policy,
            next_check: None,
            source,
            outbox,
            pending_fetch: None,
            last_ticket: 0,
        }
    }

    /// Restore the last sync from the store, then run the first staleness check.
    pub fn mount(&mut self, conn: &Connection, now: DateTime<Utc>) {
        match (SyncRepo::last_sync(conn), SyncRepo::load_timetable(conn)) {
            (Ok(Some(at)), Ok(Some(timetable))) => {
                log::debug!("Restored prayer times synced at {}", at);
                self.watermark = Some(at);
                self.timetable = Some(timetable);
                self.view = View::Ready;
            }
            (Ok(_), Ok(_)) => log::debug!("No previous sync on record"),
            (Err(e), _) | (_, Err(e)) => log::warn!("Ignoring unreadable sync store: {:#}", e),
        }

        self.sync_if_stale(now);
        self.next_check = Some(now + self.policy.check_every);
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Start a fetch if the watermark is missing or too old. Returns whether
    /// one was started.
    pub fn sync_if_stale(&mut self, now: DateTime<Utc>) -> bool {
        if matches!(self.view, View::Error(_)) || self.pending_fetch.is_some() {
            return false;
        }
        if !self.policy.is_stale(self.watermark, now) {
            log::debug!("Prayer times are fresh (synced {:?})", self.watermark);
            return false;
        }
        self.start_fetch();
        true
    }

    fn start_fetch(&mut self) {
        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.pending_fetch = Some(ticket);

        let source = Arc::clone(&self.source);
        let outbox = self.outbox.clone();
        thread::spawn(move || {
            let result = source.fetch();
            // The receiver is gone once the widget unmounts; drop the result.
            let _ = outbox.send(Event::Fetched { ticket, result });
        });
    }

    pub fn apply_fetch(
        &mut self,
        conn: &Connection,
        ticket: u64,
        result: Result<Timetable, FetchError>,
        now: DateTime<Utc>,
    ) {
        if self.pending_fetch != Some(ticket) {
            log::debug!("Discarding result of superseded fetch #{}", ticket);
            return;
        }
        self.pending_fetch = None;

        match result {
            Ok(timetable) => {
                log::info!("Prayer times loaded for {}", timetable.date.readable);
                if let Err(e) = SyncRepo::store(conn, &timetable, now) {
                    log::warn!("Could not persist prayer times: {:#}", e);
                }
                self.watermark = Some(now);
                self.timetable = Some(timetable);
                if self.view == View::Loading {
                    self.view = View::Ready;
                }
            }
            Err(e) => {
                log::error!("Error fetching prayer times: {}", e);
                self.view = View::Error(e.user_message());
            }
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.azan.poll();

        if let Some(due) = self.next_check {
            if now >= due {
                self.sync_if_stale(now);
                self.next_check = Some(now + self.policy.check_every);
            }
        }
    }

    pub fn handle_event(&mut self, event: Event, conn: &Connection, now: DateTime<Utc>) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => self.tick(now),
            Event::Fetched { ticket, result } => self.apply_fetch(conn, ticket, result, now),
        }
    }

    pub fn focused_prayer(&self) -> PrayerName {
        let all = PrayerName::all();
        all[self.focus_idx.min(all.len() - 1)]
    }

    /// Store whatever the delay field now contains; non-numeric means zero.
    pub fn set_delay_input(&mut self, prayer: PrayerName, raw: &str) {
        self.delays.set(prayer, parse_delay(raw));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses — ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        if self.view != View::Ready {
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus_idx + 1 < PrayerName::all().len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char('a') => self.azan.toggle(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let prayer = self.focused_prayer();
                let mut field = self.delays.get(prayer).to_string();
                field.push(c);
                self.set_delay_input(prayer, &field);
            }
            KeyCode::Backspace => {
                let prayer = self.focused_prayer();
                let mut field = self.delays.get(prayer).to_string();
                field.pop();
                self.set_delay_input(prayer, &field);
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        match (&self.view, &self.timetable) {
            (View::Error(message), _) => notice::render_error(frame, area, message),
            (View::Ready, Some(timetable)) => self.draw_ready(frame, area, timetable),
            _ => notice::render_loading(frame, area),
        }

        if self.show_help {
            self.draw_help_overlay(frame, area);
        }
    }

    fn draw_ready(&self, frame: &mut Frame, area: Rect, timetable: &Timetable) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // date + azan
                Constraint::Length(3), // sunrise / sunset
                Constraint::Length(9), // main prayers
                Constraint::Min(0),
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            chunks[0],
            &self.config.location.city,
            &timetable.date,
            self.azan.is_playing(),
        );
        sun::render(frame, chunks[1], &timetable.timings);
        prayers::render(
            frame,
            chunks[2],
            &timetable.timings,
            &self.delays,
            self.focus_idx,
        );
        statusbar::render(frame, chunks[4], self.is_fetching());
    }

    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let height = (area.height / 2).max(10).min(area.height);
        let popup_area = Rect {
            x: area.x + area.width / 4,
            y: area.y + (area.height - height) / 2,
            width: area.width / 2,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [↑ ↓]        ", "Select prayer"),
            ("  [0-9]        ", "Type delay in minutes"),
            ("  [Backspace]  ", "Delete last digit"),
            ("  [a]          ", "Play / stop azan"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc] / [q]  ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (keys, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(keys, theme::gold()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

fn process_player_factory(config: &AppConfig) -> PlayerFactory {
    let command = config.audio.player.clone();
    let url = config.audio.url.clone();
    Box::new(move || match ProcessPlayer::new(&command, &url) {
        Ok(player) => Some(Box::new(player) as Box<dyn Playback>),
        Err(e) => {
            log::error!("Error preparing azan player: {:#}", e);
            None
        }
    })
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let source: Arc<dyn TimingsSource> =
        Arc::new(AladhanClient::new(&config.api, &config.location)?);
    let events = EventHandler::new(500);
    let factory = process_player_factory(&config);

    let mut app = App::new(config, source, events.sender(), factory);
    app.mount(&conn, Utc::now());

    let mut terminal = ratatui::init();

    let outcome = loop {
        if let Err(e) = terminal.draw(|frame| crate::tui::shell::draw(frame, &app)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(event) => {
                app.handle_event(event, &conn, Utc::now());
                if app.should_quit {
                    break Ok(());
                }
            }
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    outcome
}
