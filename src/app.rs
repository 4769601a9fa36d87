use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::action::{Action, Scroll};
use crate::config::{Config, parse_key};
use crate::recorder::Recorder;
use crate::store::{Sample, SampleStore};
use crate::system::collector::Collector;
use crate::system::snapshot::UsageSnapshot;
use crate::ui::theme::{BorderStyle, Theme, resolve_color_support};

/// Rows a PageUp/PageDown jump moves the history selection by.
const PAGE_JUMP: usize = 10;

/// Lower bound for the poll interval; the CPU sampling window makes anything
/// faster meaningless.
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Interval,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub record: KeyCode,
    pub history: KeyCode,
    pub interval: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            record: parse_key(&kb.record).unwrap_or(KeyCode::Char('r')),
            history: parse_key(&kb.history).unwrap_or(KeyCode::Char('h')),
            interval: parse_key(&kb.interval).unwrap_or(KeyCode::Char('i')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.record), "Start/stop recording"),
            (key_label(self.history), "Open history"),
            (key_label(self.interval), "Edit poll interval"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓".to_string(), "Scroll history"));
        entries.push(("Esc".to_string(), "Close history/overlay"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// State for the open history screen: one bulk read of the store, discarded
/// again when the screen closes.
pub struct HistoryView {
    pub rows: Vec<Sample>,
    pub table: TableState,
}

impl HistoryView {
    fn new(rows: Vec<Sample>) -> Self {
        let mut table = TableState::default();
        if !rows.is_empty() {
            table.select(Some(0));
        }
        HistoryView { rows, table }
    }

    fn scroll(&mut self, scroll: Scroll) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.table.selected().unwrap_or(0);
        let next = match scroll {
            Scroll::Up => current.saturating_sub(1),
            Scroll::Down => (current + 1).min(last),
            Scroll::PageUp => current.saturating_sub(PAGE_JUMP),
            Scroll::PageDown => (current + PAGE_JUMP).min(last),
            Scroll::Home => 0,
            Scroll::End => last,
        };
        self.table.select(Some(next));
    }
}

pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub store: SampleStore,
    pub recorder: Recorder,
    pub snapshot: UsageSnapshot,
    pub input_mode: InputMode,
    pub history: Option<HistoryView>,
    pub interval_secs: u64,
    pub interval_input: String,
    pub status_message: Option<(String, Instant)>,
    pub theme: Theme,
    pub border_style: BorderStyle,
    pub keybinds: ResolvedKeybinds,
    pending_tick_rate: Option<Duration>,
}

impl App {
    pub fn new(config: Config, store: SampleStore) -> Self {
        let mut collector = Collector::new();
        let snapshot = collector.refresh();

        let color_support = resolve_color_support(&config.general.color_support);
        let theme = Theme::from_config(&config.general.theme, color_support);
        let border_style = BorderStyle::from_config_str(&config.general.border_style);
        let interval_secs = config.general.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS);
        let keybinds = ResolvedKeybinds::from_config(&config.keybinds);

        App {
            running: true,
            collector,
            store,
            recorder: Recorder::default(),
            snapshot,
            input_mode: InputMode::Normal,
            history: None,
            interval_secs,
            interval_input: String::new(),
            status_message: None,
            theme,
            border_style,
            keybinds,
            pending_tick_rate: None,
        }
    }

    /// Metrics tick: refresh the snapshot and, while recording, append one
    /// row. Append failures surface in the status bar; the tick goes on.
    pub fn on_tick(&mut self) {
        self.snapshot = self.collector.refresh();

        if self.recorder.is_recording()
            && let Err(e) = self.store.append(
                f64::from(self.snapshot.cpu_percent),
                f64::from(self.snapshot.memory_percent),
                f64::from(self.snapshot.disk_percent),
            )
        {
            self.set_status(format!("Append failed: {e}"));
        }

        self.expire_status();
    }

    /// Elapsed-display tick. The render pass reads the recorder directly;
    /// this only ages out stale status messages.
    pub fn on_second(&mut self) {
        self.expire_status();
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal if self.history.is_some() => self.map_key_history(key),
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Interval => self.map_key_interval(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.record {
            return Action::ToggleRecording;
        }
        if code == kb.history {
            return Action::OpenHistory;
        }
        if code == kb.interval {
            return Action::EnterIntervalMode;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn map_key_history(&self, key: KeyEvent) -> Action {
        let code = key.code;

        // Scroll keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Scroll(Scroll::Up),
            KeyCode::Down => return Action::Scroll(Scroll::Down),
            KeyCode::PageUp => return Action::Scroll(Scroll::PageUp),
            KeyCode::PageDown => return Action::Scroll(Scroll::PageDown),
            KeyCode::Home => return Action::Scroll(Scroll::Home),
            KeyCode::End => return Action::Scroll(Scroll::End),
            KeyCode::Esc => return Action::CloseHistory,
            _ => {}
        }

        if code == self.keybinds.history {
            return Action::CloseHistory;
        }
        if code == self.keybinds.quit {
            return Action::Quit;
        }
        if code == self.keybinds.record {
            return Action::ToggleRecording;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_interval(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelIntervalMode,
            KeyCode::Enter => Action::ApplyInterval,
            KeyCode::Backspace => {
                let mut text = self.interval_input.clone();
                text.pop();
                Action::UpdateIntervalInput(text)
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let mut text = self.interval_input.clone();
                text.push(c);
                Action::UpdateIntervalInput(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleRecording => self.recorder.toggle(),
            Action::OpenHistory => self.open_history(),
            Action::CloseHistory => self.history = None,
            Action::Scroll(scroll) => {
                if let Some(history) = self.history.as_mut() {
                    history.scroll(scroll);
                }
            }
            Action::EnterIntervalMode => {
                self.input_mode = InputMode::Interval;
                self.interval_input = self.interval_secs.to_string();
            }
            Action::ApplyInterval => self.apply_interval(),
            Action::CancelIntervalMode => {
                self.interval_input.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::UpdateIntervalInput(text) => {
                self.interval_input = text;
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn open_history(&mut self) {
        match self.store.list_all() {
            Ok(rows) => self.history = Some(HistoryView::new(rows)),
            Err(e) => self.set_status(format!("History unavailable: {e}")),
        }
    }

    fn apply_interval(&mut self) {
        let input = std::mem::take(&mut self.interval_input);
        self.input_mode = InputMode::Normal;

        if input.is_empty() {
            return;
        }
        match input.parse::<u64>() {
            Ok(secs) => {
                let secs = secs.max(MIN_POLL_INTERVAL_SECS);
                self.interval_secs = secs;
                self.pending_tick_rate = Some(Duration::from_secs(secs));
                self.set_status(format!("Poll interval set to {secs} s"));
            }
            Err(_) => self.set_status(format!("Invalid interval: {input}")),
        }
    }

    /// Tick-rate change requested by the last dispatch, if any. The run loop
    /// drains this into the event handler.
    pub fn take_pending_tick_rate(&mut self) -> Option<Duration> {
        self.pending_tick_rate.take()
    }

    /// Consume the app and release the store connection.
    pub fn close(self) -> Result<(), crate::store::StoreError> {
        self.store.close()
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    // Status messages older than 3 seconds are cleared
    fn expire_status(&mut self) {
        if let Some((_, created)) = &self.status_message
            && created.elapsed().as_secs() >= 3
        {
            self.status_message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_app() -> App {
        let store = SampleStore::open_in_memory().unwrap();
        App::new(Config::default(), store)
    }

    #[test]
    fn default_keybinds_map_to_actions() {
        let app = make_test_app();

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleRecording);

        let key = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::OpenHistory);

        let key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::EnterIntervalMode);

        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        // Ctrl+C always quits
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);
    }

    #[test]
    fn tick_appends_only_while_recording() {
        let mut app = make_test_app();

        app.on_tick();
        assert!(app.store.list_all().unwrap().is_empty());

        app.dispatch(Action::ToggleRecording);
        assert!(app.recorder.is_recording());
        app.on_tick();
        app.on_tick();
        assert_eq!(app.store.list_all().unwrap().len(), 2);

        app.dispatch(Action::ToggleRecording);
        assert!(!app.recorder.is_recording());
        assert_eq!(app.recorder.elapsed_secs(), 0);
        app.on_tick();
        assert_eq!(app.store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn open_history_loads_all_rows_and_close_discards_them() {
        let mut app = make_test_app();
        for i in 0..3 {
            app.store.append(i as f64, 50.0, 75.0).unwrap();
        }

        app.dispatch(Action::OpenHistory);
        let history = app.history.as_ref().expect("history should be open");
        assert_eq!(history.rows.len(), 3);
        assert_eq!(history.table.selected(), Some(0));

        app.dispatch(Action::CloseHistory);
        assert!(app.history.is_none());
    }

    #[test]
    fn history_keys_scroll_and_close() {
        let mut app = make_test_app();
        for _ in 0..5 {
            app.store.append(1.0, 2.0, 3.0).unwrap();
        }
        app.dispatch(Action::OpenHistory);

        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Scroll(Scroll::Down));

        app.dispatch(Action::Scroll(Scroll::End));
        assert_eq!(app.history.as_ref().unwrap().table.selected(), Some(4));
        app.dispatch(Action::Scroll(Scroll::Down));
        assert_eq!(app.history.as_ref().unwrap().table.selected(), Some(4));
        app.dispatch(Action::Scroll(Scroll::Home));
        assert_eq!(app.history.as_ref().unwrap().table.selected(), Some(0));
        app.dispatch(Action::Scroll(Scroll::Up));
        assert_eq!(app.history.as_ref().unwrap().table.selected(), Some(0));

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::CloseHistory);
    }

    #[test]
    fn interval_input_applies_and_requests_new_tick_rate() {
        let mut app = make_test_app();

        app.dispatch(Action::EnterIntervalMode);
        assert_eq!(app.input_mode, InputMode::Interval);
        assert_eq!(app.interval_input, "1");

        // Digits append, other characters are ignored
        let key = KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::UpdateIntervalInput("15".to_string()));
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        app.dispatch(Action::UpdateIntervalInput("5".to_string()));
        app.dispatch(Action::ApplyInterval);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.interval_secs, 5);
        assert_eq!(app.take_pending_tick_rate(), Some(Duration::from_secs(5)));
        assert_eq!(app.take_pending_tick_rate(), None);
    }

    #[test]
    fn interval_is_clamped_to_minimum() {
        let mut app = make_test_app();
        app.dispatch(Action::EnterIntervalMode);
        app.dispatch(Action::UpdateIntervalInput("0".to_string()));
        app.dispatch(Action::ApplyInterval);
        assert_eq!(app.interval_secs, 1);
        assert_eq!(app.take_pending_tick_rate(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn cancel_leaves_interval_unchanged() {
        let mut app = make_test_app();
        app.dispatch(Action::EnterIntervalMode);
        app.dispatch(Action::UpdateIntervalInput("30".to_string()));
        app.dispatch(Action::CancelIntervalMode);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.interval_secs, 1);
        assert!(app.take_pending_tick_rate().is_none());
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = make_test_app();

        app.dispatch(Action::ToggleHelp);
        assert_eq!(app.input_mode, InputMode::Help);
        assert!(app.show_help());

        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        // Ctrl+C still works (safety)
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        app.dispatch(Action::ToggleHelp);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn recording_survives_history_screen() {
        let mut app = make_test_app();
        app.dispatch(Action::ToggleRecording);
        app.dispatch(Action::OpenHistory);

        // Polling and recording continue while the history screen is open
        app.on_tick();
        assert!(app.recorder.is_recording());
        assert_eq!(app.store.list_all().unwrap().len(), 1);

        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleRecording);
    }
}
