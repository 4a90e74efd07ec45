use crate::audio::{AmbiencePlayer, Cue, Cues};
use crate::clock::{ClockListener, ClockState, SessionClock};
use crate::domain::{AmbienceSelection, FlashColor, Mode, Status, Theme, UiMode};
use crate::persistence::{keys, KvStore, Settings};
use crate::stats::StatsStore;
use crate::ticker::poll_duration;
use anyhow::Result;
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Focus lengths offered by the settings pane, in minutes
pub const FOCUS_PRESETS: &[u32] = &[15, 20, 25, 30, 45, 50, 60, 90];
/// Break lengths offered by the settings pane, in minutes
pub const BREAK_PRESETS: &[u32] = &[5, 10, 15, 20, 30];

/// How long the completion flash stays on screen
pub const FLASH_MS: u64 = 300;

/// Everything the presentation layer draws from
#[derive(Debug, Clone)]
pub struct ViewState {
    pub status: Status,
    pub display: String,
    pub title: String,
    pub progress: f64,
    pub mode: Mode,
    pub running: bool,
    pub session_count: u32,
    pub flash: Option<(FlashColor, Instant)>,
}

impl ViewState {
    fn new(state: &ClockState, session_count: u32) -> Self {
        let mut view = Self {
            status: Status::Ready,
            display: String::new(),
            title: String::new(),
            progress: 0.0,
            mode: state.mode,
            running: state.running,
            session_count,
            flash: None,
        };
        view.show(state);
        view
    }

    fn show(&mut self, state: &ClockState) {
        self.display = state.display();
        self.title = crate::clock::format_title(state.seconds_remaining);
        self.progress = state.progress();
        self.mode = state.mode;
    }

    /// Color to paint the screen with, while a flash is still showing
    pub fn active_flash(&self, now: Instant) -> Option<FlashColor> {
        match self.flash {
            Some((color, since)) if now.duration_since(since) < Duration::from_millis(FLASH_MS) => Some(color),
            _ => None,
        }
    }
}

/// Clock listener wiring notifications to stats, audio and the view
struct Collaborators<'a> {
    store: &'a mut KvStore,
    stats: &'a StatsStore,
    ambience: &'a mut AmbiencePlayer,
    cues: &'a mut Cues,
    view: &'a mut ViewState,
    selection: AmbienceSelection,
}

impl ClockListener for Collaborators<'_> {
    fn on_tick(&mut self, state: &ClockState) {
        self.view.show(state);
    }

    fn on_start(&mut self, state: &ClockState) {
        self.cues.play(Cue::Click);
        self.ambience.play_selected(self.selection);
        self.view.status = Status::Running(state.mode);
    }

    fn on_pause(&mut self, _state: &ClockState) {
        self.ambience.stop();
        self.view.status = Status::Paused;
    }

    fn on_reset(&mut self, state: &ClockState) {
        self.ambience.stop();
        self.view.status = Status::Ready;
        self.view.show(state);
    }

    fn on_session_complete(&mut self, _finished: Mode) {
        self.cues.play(Cue::Gong);
    }

    fn on_focus_completed(&mut self) {
        match self.stats.increment_focus_completed(self.store) {
            Ok(count) => self.view.session_count = count,
            Err(e) => error!(error = %e, "failed to record completed session"),
        }
    }

    fn on_mode_changed(&mut self, mode: Mode, flash: FlashColor, state: &ClockState) {
        debug!(mode = mode.name(), flash = flash.hex(), "mode changed");
        self.view.flash = Some((flash, Instant::now()));
        self.view.status = match mode {
            Mode::Break => Status::BreakDue,
            Mode::Focus => Status::FocusDue,
        };
        self.view.show(state);
    }

    fn on_run_state_changed(&mut self, running: bool) {
        self.view.running = running;
    }
}

/// Main application state
pub struct AppState {
    pub clock: SessionClock,
    pub store: KvStore,
    pub stats: StatsStore,
    pub ambience: AmbiencePlayer,
    pub cues: Cues,
    pub view: ViewState,
    pub selection: AmbienceSelection,
    pub theme: Theme,
    pub ui_mode: UiMode,
    pub main_task: String,
    pub notepad: String,
    /// Day the displayed session count belongs to
    pub stats_date: NaiveDate,
}

impl AppState {
    pub fn new(settings: &Settings, store: KvStore, ambience: AmbiencePlayer, cues: Cues) -> Result<Self> {
        Self::new_on(settings, store, ambience, cues, chrono::Local::now().date_naive())
    }

    /// Build the app as of `today`. Stats are loaded here, before any session
    /// can complete.
    pub fn new_on(
        settings: &Settings,
        mut store: KvStore,
        ambience: AmbiencePlayer,
        cues: Cues,
        today: NaiveDate,
    ) -> Result<Self> {
        let stats = StatsStore::new();
        let session_count = stats.load_on(&mut store, today)?;

        let clock = SessionClock::new(settings.focus_minutes, settings.break_minutes);
        let view = ViewState::new(clock.state(), session_count);
        let theme = Theme::from_stored(store.get(keys::THEME));
        let main_task = store.get(keys::MAIN_TASK).unwrap_or_default().to_string();
        let notepad = store.get(keys::NOTEPAD).unwrap_or_default().to_string();

        Ok(Self {
            clock,
            store,
            stats,
            ambience,
            cues,
            view,
            selection: settings.ambience,
            theme,
            ui_mode: UiMode::Normal,
            main_task,
            notepad,
            stats_date: today,
        })
    }

    /// Run a clock operation with the collaborators attached as listener
    fn with_clock<R>(&mut self, op: impl FnOnce(&mut SessionClock, &mut dyn ClockListener) -> R) -> R {
        let mut hooks = Collaborators {
            store: &mut self.store,
            stats: &self.stats,
            ambience: &mut self.ambience,
            cues: &mut self.cues,
            view: &mut self.view,
            selection: self.selection,
        };
        op(&mut self.clock, &mut hooks)
    }

    /// Start/pause button
    pub fn toggle_timer(&mut self) {
        if self.clock.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn start(&mut self) {
        self.with_clock(|clock, hooks| clock.start(hooks));
    }

    pub fn pause(&mut self) {
        self.with_clock(|clock, hooks| clock.pause(hooks));
    }

    pub fn reset(&mut self) {
        self.with_clock(|clock, hooks| clock.reset(hooks));
    }

    pub fn quick_start(&mut self) {
        self.with_clock(|clock, hooks| clock.quick_start(hooks));
    }

    /// Change a configured duration; the countdown follows only when allowed
    pub fn set_minutes(&mut self, mode: Mode, minutes: u32) -> bool {
        let applied = self.with_clock(|clock, hooks| clock.set_duration(mode, minutes, hooks));
        debug!(mode = mode.name(), active = self.clock.mode().name(), minutes, applied, "duration changed");
        applied
    }

    pub fn cycle_focus_minutes(&mut self) {
        let next = next_preset(FOCUS_PRESETS, self.clock.focus_minutes());
        self.set_minutes(Mode::Focus, next);
    }

    pub fn cycle_break_minutes(&mut self) {
        let next = next_preset(BREAK_PRESETS, self.clock.break_minutes());
        self.set_minutes(Mode::Break, next);
    }

    /// Change the ambience. While running the new sound replaces the old one
    /// right away; otherwise it is picked up by the next start.
    pub fn select_ambience(&mut self, selection: AmbienceSelection) {
        self.selection = selection;
        if self.clock.is_running() {
            self.ambience.play_selected(selection);
        }
    }

    pub fn cycle_ambience(&mut self) {
        self.select_ambience(self.selection.cycle());
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.theme = self.theme.toggled();
        self.store.set(keys::THEME, self.theme.as_stored())
    }

    /// Start editing a text field
    pub fn begin_edit(&mut self, mode: UiMode) {
        self.ui_mode = mode;
    }

    pub fn end_edit(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    fn edited_field(&mut self) -> Option<(&'static str, &mut String)> {
        match self.ui_mode {
            UiMode::EditingTask => Some((keys::MAIN_TASK, &mut self.main_task)),
            UiMode::EditingNotepad => Some((keys::NOTEPAD, &mut self.notepad)),
            UiMode::Normal => None,
        }
    }

    /// Append a character to the field being edited and save it
    pub fn input_char(&mut self, c: char) -> Result<()> {
        // The main task is a single line
        if c == '\n' && self.ui_mode == UiMode::EditingTask {
            return Ok(());
        }
        let Some((key, field)) = self.edited_field() else {
            return Ok(());
        };
        field.push(c);
        let value = field.clone();
        self.store.set(key, &value)
    }

    /// Remove the last character of the field being edited and save it
    pub fn backspace(&mut self) -> Result<()> {
        let Some((key, field)) = self.edited_field() else {
            return Ok(());
        };
        if field.pop().is_none() {
            return Ok(());
        }
        let value = field.clone();
        self.store.set(key, &value)
    }

    /// Drive the clock and reap audio outcomes. Called on every loop iteration.
    /// The day rolls over first so a catch-up completion lands on `today`.
    pub fn update(&mut self, now: Instant, today: NaiveDate) {
        self.refresh_day(today);
        self.with_clock(|clock, hooks| clock.advance(now, hooks));
        self.ambience.poll();
        self.cues.poll();

        if let Some((_, since)) = self.view.flash {
            if now.duration_since(since) >= Duration::from_millis(FLASH_MS) {
                self.view.flash = None;
            }
        }
    }

    /// Re-read the session count when the calendar day has moved on
    pub fn refresh_day(&mut self, today: NaiveDate) {
        if today == self.stats_date {
            return;
        }
        match self.stats.load_on(&mut self.store, today) {
            Ok(count) => {
                self.view.session_count = count;
                self.stats_date = today;
            }
            Err(e) => error!(error = %e, "failed to roll over daily stats"),
        }
    }

    /// How long the main loop may wait for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = poll_duration();
        if let Some(next_tick) = self.clock.until_next_tick(now) {
            timeout = timeout.min(next_tick);
        }
        if let Some((_, since)) = self.view.flash {
            let flash_end = since + Duration::from_millis(FLASH_MS);
            timeout = timeout.min(flash_end.saturating_duration_since(now));
        }
        timeout
    }
}

/// Smallest preset above `current`, wrapping to the first
fn next_preset(presets: &[u32], current: u32) -> u32 {
    presets
        .iter()
        .copied()
        .find(|&p| p > current)
        .or_else(|| presets.first().copied())
        .unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Call, CallLog, FakeHandle};
    use crate::domain::RunState;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn create_test_app(log: &CallLog) -> AppState {
        create_test_app_with(log, KvStore::in_memory(), Settings::default())
    }

    fn create_test_app_with(log: &CallLog, store: KvStore, settings: Settings) -> AppState {
        let mut ambience = AmbiencePlayer::new();
        ambience.register(AmbienceSelection::Rain, Box::new(FakeHandle::new("rain", log)), false);
        ambience.register(AmbienceSelection::White, Box::new(FakeHandle::new("white", log)), false);
        ambience.register(AmbienceSelection::Cafe, Box::new(FakeHandle::new("cafe", log)), true);
        let cues = Cues::new(
            Some(Box::new(FakeHandle::new("click", log))),
            Some(Box::new(FakeHandle::new("gong", log))),
        );
        AppState::new_on(&settings, store, ambience, cues, today()).unwrap()
    }

    fn plays(log: &CallLog, name: &str) -> usize {
        log.borrow()
            .iter()
            .filter(|c| **c == Call::Play(name.to_string()))
            .count()
    }

    fn tick_times(app: &mut AppState, n: u32) {
        for _ in 0..n {
            app.with_clock(|clock, hooks| clock.tick(hooks));
        }
    }

    #[test]
    fn test_app_state_new() {
        let log = CallLog::default();
        let app = create_test_app(&log);
        assert_eq!(app.view.display, "25:00");
        assert_eq!(app.view.title, "(25:00) Pomora");
        assert_eq!(app.view.status, Status::Ready);
        assert_eq!(app.view.session_count, 0);
        assert_eq!(app.theme, Theme::Light);
        // Loading stats wrote the day record
        assert!(app.store.get(keys::STATS).is_some());
    }

    #[test]
    fn test_start_plays_click_and_ambience() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.selection = AmbienceSelection::Rain;

        app.toggle_timer();
        assert!(app.clock.is_running());
        assert_eq!(app.view.status, Status::Running(Mode::Focus));
        assert_eq!(plays(&log, "click"), 1);
        assert_eq!(plays(&log, "rain"), 1);
        assert_eq!(app.ambience.active(), Some(AmbienceSelection::Rain));

        app.toggle_timer();
        assert!(!app.clock.is_running());
        assert_eq!(app.view.status, Status::Paused);
        assert_eq!(app.view.status.button_label(), "Resume");
        assert_eq!(app.ambience.active(), None);
    }

    #[test]
    fn test_full_focus_session_counts_once() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.start();
        tick_times(&mut app, 1500);

        assert_eq!(app.view.session_count, 1);
        assert_eq!(app.stats.read(&app.store).unwrap().unwrap().count, 1);
        assert_eq!(app.clock.mode(), Mode::Break);
        assert_eq!(app.clock.run_state(), RunState::Paused);
        assert_eq!(app.view.status, Status::BreakDue);
        assert_eq!(app.view.status.button_label(), "Start break");
        assert_eq!(app.view.display, "05:00");
        assert_eq!(plays(&log, "gong"), 1);
        assert!(matches!(app.view.flash, Some((FlashColor::Green, _))));
    }

    #[test]
    fn test_break_completion_does_not_count() {
        let log = CallLog::default();
        let mut settings = Settings::default();
        settings.focus_minutes = 1;
        settings.break_minutes = 1;
        let mut app = create_test_app_with(&log, KvStore::in_memory(), settings);

        app.start();
        tick_times(&mut app, 60);
        app.start();
        tick_times(&mut app, 60);

        assert_eq!(app.view.session_count, 1);
        assert_eq!(app.view.status, Status::FocusDue);
        assert!(matches!(app.view.flash, Some((FlashColor::Blue, _))));
        assert_eq!(plays(&log, "gong"), 2);
    }

    #[test]
    fn test_completion_stops_ambience() {
        let log = CallLog::default();
        let mut settings = Settings::default();
        settings.focus_minutes = 1;
        let mut app = create_test_app_with(&log, KvStore::in_memory(), settings);
        app.selection = AmbienceSelection::White;

        app.start();
        tick_times(&mut app, 60);
        assert_eq!(app.ambience.active(), None);
        assert!(log.borrow().contains(&Call::Rewind("white".into())));
    }

    #[test]
    fn test_changing_ambience_while_running() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.select_ambience(AmbienceSelection::Rain);
        app.start();
        log.borrow_mut().clear();

        app.select_ambience(AmbienceSelection::White);
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Pause("rain".into()),
                Call::Rewind("rain".into()),
                Call::Volume("white".into(), 0.05),
                Call::Play("white".into()),
            ]
        );

        app.select_ambience(AmbienceSelection::None);
        assert_eq!(app.ambience.active(), None);
    }

    #[test]
    fn test_changing_ambience_while_stopped_waits_for_start() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.select_ambience(AmbienceSelection::Cafe);
        assert!(log.borrow().is_empty());
        assert_eq!(app.ambience.active(), None);

        app.start();
        assert_eq!(app.ambience.active(), Some(AmbienceSelection::Cafe));
    }

    #[test]
    fn test_reset_returns_to_focus() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.select_ambience(AmbienceSelection::Rain);
        app.start();
        tick_times(&mut app, 10);

        app.reset();
        assert_eq!(app.clock.run_state(), RunState::Idle);
        assert_eq!(app.clock.state().seconds_remaining, 1500);
        assert_eq!(app.view.status, Status::Ready);
        assert_eq!(app.view.display, "25:00");
        assert_eq!(app.ambience.active(), None);
        assert!(!app.view.running);
    }

    #[test]
    fn test_quick_start() {
        let log = CallLog::default();
        let mut settings = Settings::default();
        settings.focus_minutes = 50;
        settings.break_minutes = 10;
        let mut app = create_test_app_with(&log, KvStore::in_memory(), settings);

        app.quick_start();
        assert_eq!(app.clock.run_state(), RunState::Running);
        assert_eq!(app.clock.mode(), Mode::Focus);
        assert_eq!(app.clock.state().total_seconds, 1500);
        assert_eq!(app.clock.break_minutes(), 5);
        assert_eq!(app.view.status, Status::Running(Mode::Focus));
    }

    #[test]
    fn test_cycle_focus_minutes_when_idle() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);

        app.cycle_focus_minutes();
        assert_eq!(app.clock.focus_minutes(), 30);
        assert_eq!(app.view.display, "30:00");

        app.cycle_break_minutes();
        assert_eq!(app.clock.break_minutes(), 10);
        assert_eq!(app.view.display, "30:00");
    }

    #[test]
    fn test_cycle_minutes_while_running_keeps_countdown() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.start();
        tick_times(&mut app, 5);

        app.cycle_focus_minutes();
        assert_eq!(app.clock.state().seconds_remaining, 1495);
        assert_eq!(app.clock.focus_minutes(), 30);
    }

    #[test]
    fn test_next_preset_wraps() {
        assert_eq!(next_preset(FOCUS_PRESETS, 25), 30);
        assert_eq!(next_preset(FOCUS_PRESETS, 90), 15);
        assert_eq!(next_preset(BREAK_PRESETS, 7), 10);
        assert_eq!(next_preset(&[], 7), 7);
    }

    #[test]
    fn test_theme_and_notes_persist() {
        let log = CallLog::default();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("store.json");
        let mut app = create_test_app_with(&log, KvStore::open(&path).unwrap(), Settings::default());

        app.toggle_theme().unwrap();
        app.begin_edit(UiMode::EditingTask);
        for c in "ship it\n".chars() {
            app.input_char(c).unwrap();
        }
        app.end_edit();
        app.begin_edit(UiMode::EditingNotepad);
        for c in "a\nbc".chars() {
            app.input_char(c).unwrap();
        }
        app.backspace().unwrap();
        app.end_edit();

        let store = KvStore::open(&path).unwrap();
        assert_eq!(store.get(keys::THEME), Some("dark"));
        assert_eq!(store.get(keys::MAIN_TASK), Some("ship it"));
        assert_eq!(store.get(keys::NOTEPAD), Some("a\nb"));

        let reloaded = create_test_app_with(&log, store, Settings::default());
        assert_eq!(reloaded.theme, Theme::Dark);
        assert_eq!(reloaded.main_task, "ship it");
    }

    #[test]
    fn test_typing_outside_edit_mode_is_ignored() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        app.input_char('x').unwrap();
        app.backspace().unwrap();
        assert_eq!(app.store.get(keys::NOTEPAD), None);
    }

    #[test]
    fn test_refresh_day_rolls_over_count() {
        let log = CallLog::default();
        let mut settings = Settings::default();
        settings.focus_minutes = 1;
        let mut app = create_test_app_with(&log, KvStore::in_memory(), settings);
        app.start();
        tick_times(&mut app, 60);
        assert_eq!(app.view.session_count, 1);

        app.refresh_day(today());
        assert_eq!(app.view.session_count, 1);

        let tomorrow = today().succ_opt().unwrap();
        app.refresh_day(tomorrow);
        assert_eq!(app.view.session_count, 0);
        assert_eq!(app.stats_date, tomorrow);
    }

    #[test]
    fn test_session_completed_after_midnight_counts_for_new_day() {
        let log = CallLog::default();
        let mut settings = Settings::default();
        settings.focus_minutes = 1;
        let mut app = create_test_app_with(&log, KvStore::in_memory(), settings);
        let start = Instant::now();
        app.with_clock(|clock, hooks| clock.start_at(start, hooks));

        let tomorrow = today().succ_opt().unwrap();
        app.update(start + Duration::from_secs(120), tomorrow);

        assert_eq!(app.stats_date, tomorrow);
        assert_eq!(app.view.session_count, 1);
        let stored = app.stats.read(&app.store).unwrap().unwrap();
        assert_eq!(stored.date, "2024-03-02");
        assert_eq!(stored.count, 1);
    }

    #[test]
    fn test_update_advances_clock_and_clears_flash() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        let start = Instant::now();
        app.with_clock(|clock, hooks| clock.start_at(start, hooks));

        app.update(start + Duration::from_millis(2500), today());
        assert_eq!(app.clock.state().seconds_remaining, 1498);
        assert_eq!(app.view.display, "24:58");

        app.view.flash = Some((FlashColor::Green, start));
        assert_eq!(app.view.active_flash(start), Some(FlashColor::Green));
        app.update(start + Duration::from_millis(2600), today());
        assert_eq!(app.view.flash, None);
    }

    #[test]
    fn test_poll_timeout_bounded_by_next_tick() {
        let log = CallLog::default();
        let mut app = create_test_app(&log);
        let start = Instant::now();
        assert_eq!(app.poll_timeout(start), poll_duration());

        app.with_clock(|clock, hooks| clock.start_at(start, hooks));
        let almost = start + Duration::from_millis(950);
        assert_eq!(app.poll_timeout(almost), Duration::from_millis(50));
    }
}
