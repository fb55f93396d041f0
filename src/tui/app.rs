use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::KvStore;
use crate::models::{EventKind, GoalKind, LedgerKind, TrackerCategory};
use crate::store::{LedgerStore, SavingsStore, TrackerStore, ZakatStore};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::overview::FinanceSnapshot;
use crate::tui::widgets::{counters, header, history, overview, statusbar};
use crate::utils::hijri::today_hijri_string;

/// Ticks a status message stays visible.
const FLASH_TICKS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Help,
}

pub struct App<'a> {
    pub view: View,
    pub config: AppConfig,
    pub active: TrackerCategory,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub hijri_str: String,
    pub flash: Option<(String, Style)>,
    flash_ttl: u8,
    prayers: TrackerStore<'a>,
    fasts: TrackerStore<'a>,
    finance: FinanceSnapshot,
}

impl<'a> App<'a> {
    pub fn new(kv: &'a dyn KvStore, config: AppConfig) -> Self {
        let options = config.tracker.options();
        let hijri_str = today_hijri_string(config.display.hijri_offset);
        let finance = load_finance(kv, &config);

        App {
            view: View::Dashboard,
            active: TrackerCategory::Prayers,
            focus_idx: 0,
            should_quit: false,
            hijri_str,
            flash: None,
            flash_ttl: 0,
            prayers: TrackerStore::load(kv, TrackerCategory::Prayers, options),
            fasts: TrackerStore::load(kv, TrackerCategory::Fasts, options),
            finance,
            config,
        }
    }

    pub fn tracker(&self) -> &TrackerStore<'a> {
        match self.active {
            TrackerCategory::Prayers => &self.prayers,
            TrackerCategory::Fasts => &self.fasts,
        }
    }

    fn tracker_mut(&mut self) -> &mut TrackerStore<'a> {
        match self.active {
            TrackerCategory::Prayers => &mut self.prayers,
            TrackerCategory::Fasts => &mut self.fasts,
        }
    }

    fn focused_id(&self) -> Option<String> {
        self.tracker()
            .counters()
            .get(self.focus_idx)
            .map(|c| c.id.clone())
    }

    pub fn tick(&mut self) {
        if self.flash_ttl > 0 {
            self.flash_ttl -= 1;
            if self.flash_ttl == 0 {
                self.flash = None;
            }
        }
    }

    fn set_flash(&mut self, message: String, style: Style) {
        self.flash = Some((message, style));
        self.flash_ttl = FLASH_TICKS;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Some terminals report release/repeat as well
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.active = match self.active {
                    TrackerCategory::Prayers => TrackerCategory::Fasts,
                    TrackerCategory::Fasts => TrackerCategory::Prayers,
                };
                self.focus_idx = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.tracker().counters().len().saturating_sub(1);
                if self.focus_idx < max {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char('m') => self.record_focused(EventKind::Missed),
            KeyCode::Char('c') | KeyCode::Enter => self.record_focused(EventKind::Completed),
            KeyCode::Char('x') => self.clear_focused(),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            self.view = View::Dashboard;
        }
    }

    fn record_focused(&mut self, kind: EventKind) {
        let Some(id) = self.focused_id() else {
            return;
        };
        let category = self.active;
        let Some(outcome) = self.tracker_mut().record_event(&id, kind) else {
            return;
        };
        let label = category.label(&id);
        if outcome.applied {
            let style = match kind {
                EventKind::Missed => theme::red(),
                EventKind::Completed => theme::green(),
            };
            self.set_flash(format!("{} marked {}", label, kind), style);
        } else {
            self.set_flash(format!("No {} owed for {}", category.noun(), label), theme::dim());
        }
    }

    fn clear_focused(&mut self) {
        let Some(id) = self.focused_id() else {
            return;
        };
        let category = self.active;
        if self.tracker_mut().clear(&id).is_some() {
            self.set_flash(format!("{} cleared", category.label(&id)), theme::gold());
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], &self.hijri_str, self.active);
        statusbar::render(frame, outer_chunks[2], self.flash.as_ref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(outer_chunks[1]);

        let store = self.tracker();
        let counters_height = store.counters().len() as u16 + 5;
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(counters_height), Constraint::Min(0)])
            .split(columns[0]);

        counters::render(frame, left_chunks[0], store, self.focus_idx);

        let limit = self.config.tracker.history_limit;
        history::render(
            frame,
            left_chunks[1],
            store.category(),
            &store.history(limit),
            limit,
            store.history_len(),
        );

        overview::render(
            frame,
            columns[1],
            &self.finance,
            self.prayers.total_outstanding(),
            self.fasts.total_outstanding(),
            &self.config.finance.currency,
        );
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = (area.height / 2).max(12).min(area.height);
        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height - height) / 2,
            width: area.width / 2,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[m]", "Record a missed one"),
            ("[c] / Enter", "Record one made up"),
            ("[x]", "Reset the focused counter"),
            ("[Tab] / [← →]", "Switch prayers / fasts"),
            ("[↑ ↓]", "Navigate counters"),
            ("[?]", "Toggle help"),
            ("[Esc] / [q]", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (keys, action) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<16}", keys), theme::gold()),
                Span::styled(action, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }
}

fn load_finance(kv: &dyn KvStore, config: &AppConfig) -> FinanceSnapshot {
    let zakat = ZakatStore::load(kv);
    FinanceSnapshot {
        assets: LedgerStore::load(kv, LedgerKind::Asset).total(),
        liabilities: LedgerStore::load(kv, LedgerKind::Liability).total(),
        zakat_due: zakat.form().result,
        goals: GoalKind::all()
            .into_iter()
            .map(|kind| {
                let store = SavingsStore::load(kv, kind, config.savings.default_target(kind));
                (kind, store.goal().clone())
            })
            .collect(),
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(&conn, config);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_millis(500));

    let outcome = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            Ok(Event::Tick) => app.tick(),
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    outcome
}
