//! Session clock: the focus/break countdown state machine.
//!
//! The clock owns its [`ClockState`] and a single [`Ticker`]. Every operation
//! takes a [`ClockListener`] that receives the resulting notifications, so the
//! clock never reaches into the stats store, audio or UI directly.

use crate::domain::{FlashColor, Mode, RunState};
use crate::ticker::Ticker;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default focus length in minutes
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
/// Default break length in minutes
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Durations forced by quick start
pub const QUICK_FOCUS_MINUTES: u32 = 25;
pub const QUICK_BREAK_MINUTES: u32 = 5;

/// Snapshot of the countdown.
///
/// Invariant: `seconds_remaining <= total_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub seconds_remaining: u32,
    pub total_seconds: u32,
    pub mode: Mode,
    pub running: bool,
}

impl ClockState {
    fn fresh(mode: Mode, seconds: u32) -> Self {
        Self {
            seconds_remaining: seconds,
            total_seconds: seconds,
            mode,
            running: false,
        }
    }

    /// Fraction of the interval already elapsed, clamped to 0.0..=1.0
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.total_seconds.saturating_sub(self.seconds_remaining) as f64;
        (elapsed / self.total_seconds as f64).clamp(0.0, 1.0)
    }

    /// Remaining time as MM:SS
    pub fn display(&self) -> String {
        format_mmss(self.seconds_remaining)
    }
}

/// Format seconds as zero-padded MM:SS. Minutes are not capped, so 100
/// minutes renders as "100:00".
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Window title, e.g. "(4:05) Pomora"
pub fn format_title(seconds: u32) -> String {
    format!("({}:{:02}) Pomora", seconds / 60, seconds % 60)
}

fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Receives clock notifications. All methods default to no-ops.
pub trait ClockListener {
    /// Countdown changed while the mode stayed the same
    fn on_tick(&mut self, _state: &ClockState) {}
    /// The clock began (or resumed) counting
    fn on_start(&mut self, _state: &ClockState) {}
    /// The clock stopped counting, either by request or because a session ended
    fn on_pause(&mut self, _state: &ClockState) {}
    fn on_reset(&mut self, _state: &ClockState) {}
    /// A session of `finished` ran down to zero
    fn on_session_complete(&mut self, _finished: Mode) {}
    /// A focus session ran down to zero; the completed-session counter must grow
    fn on_focus_completed(&mut self) {}
    fn on_mode_changed(&mut self, _mode: Mode, _flash: FlashColor, _state: &ClockState) {}
    fn on_run_state_changed(&mut self, _running: bool) {}
}

impl ClockListener for () {}

/// Focus/break countdown.
///
/// States: `Idle` after construction or reset, `Running` while the ticker is
/// armed, `Paused` after a pause or a completed session. A completed session
/// never restarts on its own.
#[derive(Debug, Clone)]
pub struct SessionClock {
    state: ClockState,
    run_state: RunState,
    focus_minutes: u32,
    break_minutes: u32,
    ticker: Ticker,
}

impl SessionClock {
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        let focus_minutes = focus_minutes.max(1);
        let break_minutes = break_minutes.max(1);
        Self {
            state: ClockState::fresh(Mode::Focus, minutes_to_seconds(focus_minutes)),
            run_state: RunState::Idle,
            focus_minutes,
            break_minutes,
            ticker: Ticker::new(),
        }
    }

    pub fn state(&self) -> &ClockState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Configured length of `mode`, in seconds
    pub fn configured_seconds(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => minutes_to_seconds(self.focus_minutes),
            Mode::Break => minutes_to_seconds(self.break_minutes),
        }
    }

    /// Start or resume counting. Returns false if already running.
    pub fn start(&mut self, listener: &mut dyn ClockListener) -> bool {
        self.start_at(Instant::now(), listener)
    }

    /// Start counting with the first tick due one period after `now`
    pub fn start_at(&mut self, now: Instant, listener: &mut dyn ClockListener) -> bool {
        if self.state.running || self.state.seconds_remaining == 0 {
            return false;
        }

        self.state.running = true;
        self.run_state = RunState::Running;
        self.ticker.arm(now);
        debug!(mode = self.state.mode.name(), remaining = self.state.seconds_remaining, "clock started");

        listener.on_run_state_changed(true);
        listener.on_tick(&self.state);
        listener.on_start(&self.state);
        true
    }

    /// Pause a running clock. Returns false if it was not running.
    pub fn pause(&mut self, listener: &mut dyn ClockListener) -> bool {
        if !self.state.running {
            return false;
        }
        self.halt(listener);
        debug!(remaining = self.state.seconds_remaining, "clock paused");
        true
    }

    /// Stop the ticker before anything else so no queued tick can follow
    fn halt(&mut self, listener: &mut dyn ClockListener) {
        self.ticker.cancel();
        self.state.running = false;
        self.run_state = RunState::Paused;
        listener.on_run_state_changed(false);
        listener.on_pause(&self.state);
    }

    /// Back to an idle focus interval of the configured focus length
    pub fn reset(&mut self, listener: &mut dyn ClockListener) {
        let was_running = self.state.running;
        self.ticker.cancel();
        self.state = ClockState::fresh(Mode::Focus, self.configured_seconds(Mode::Focus));
        self.run_state = RunState::Idle;
        debug!(total = self.state.total_seconds, "clock reset");

        if was_running {
            listener.on_run_state_changed(false);
        }
        listener.on_reset(&self.state);
        listener.on_tick(&self.state);
    }

    /// Handle one elapsed second. Ignored unless running, so a tick that was
    /// already pending when the clock stopped has no effect.
    pub fn tick(&mut self, listener: &mut dyn ClockListener) {
        if !self.state.running {
            return;
        }

        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining == 0 {
            self.complete_session(listener);
        } else {
            listener.on_tick(&self.state);
        }
    }

    /// Fire every tick that has come due by `now`. Returns how many fired.
    pub fn advance(&mut self, now: Instant, listener: &mut dyn ClockListener) -> u32 {
        let mut fired = 0;
        while self.state.running && self.ticker.take_due(now) {
            self.tick(listener);
            fired += 1;
        }
        fired
    }

    /// Time until the next tick, if the clock is running
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.until_next(now)
    }

    fn complete_session(&mut self, listener: &mut dyn ClockListener) {
        self.halt(listener);

        let finished = self.state.mode;
        listener.on_session_complete(finished);
        if finished == Mode::Focus {
            listener.on_focus_completed();
        }

        let next = finished.next();
        self.state = ClockState::fresh(next, self.configured_seconds(next));
        debug!(finished = finished.name(), next = next.name(), "session complete");
        listener.on_mode_changed(next, finished.completion_flash(), &self.state);
    }

    /// Change the configured length of `mode`.
    ///
    /// The stored setting always follows a positive value. The countdown only
    /// picks it up when the clock is stopped and `mode` is the active mode.
    /// Returns whether the countdown changed.
    pub fn set_duration(&mut self, mode: Mode, minutes: u32, listener: &mut dyn ClockListener) -> bool {
        if minutes == 0 {
            debug!(mode = mode.name(), "ignoring zero-length duration");
            return false;
        }

        match mode {
            Mode::Focus => self.focus_minutes = minutes,
            Mode::Break => self.break_minutes = minutes,
        }

        if self.state.running || self.state.mode != mode {
            return false;
        }

        let seconds = minutes_to_seconds(minutes);
        self.state.seconds_remaining = seconds;
        self.state.total_seconds = seconds;
        listener.on_tick(&self.state);
        true
    }

    /// Force 25/5 minute durations, reset, and start
    pub fn quick_start(&mut self, listener: &mut dyn ClockListener) {
        self.focus_minutes = QUICK_FOCUS_MINUTES;
        self.break_minutes = QUICK_BREAK_MINUTES;
        self.reset(listener);
        self.start(listener);
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}
