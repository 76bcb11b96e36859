//! Countdown timer state machine
//!
//! The [`Timer`] owns all countdown bookkeeping. It never sleeps or spawns;
//! a host calls [`Timer::tick`] periodically while [`Timer::is_ticking`] is
//! true and reacts to the notifications delivered to its [`TimerObserver`].

pub mod format;
pub mod snapshot;

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, trace};

pub use format::{format_time, progress_color, DisplayFrame, DisplayOptions, Hsl, TimerStatus};
pub use snapshot::{SavedState, Snapshot};

/// Countdown length used until something configures another one
pub const DEFAULT_DURATION_MS: u64 = 300_000;

/// Receiver for timer notifications, registered when the timer is built.
///
/// `on_update` fires on every tick and on every change worth redrawing.
/// `on_state_change` fires only when the timer changes mode, so it is the
/// hook to persist from.
pub trait TimerObserver: Send {
    fn on_update(&mut self, _snapshot: &Snapshot) {}
    fn on_state_change(&mut self, _snapshot: &Snapshot) {}
    fn on_complete(&mut self) {}
}

impl TimerObserver for () {}

/// Monotonic reference point: `elapsed_ms` had already elapsed at `at`
#[derive(Debug, Clone, Copy)]
struct Anchor {
    at: Instant,
    elapsed_ms: u64,
}

impl Anchor {
    fn elapsed(&self, now: Instant) -> u64 {
        self.elapsed_ms
            .saturating_add(as_millis(now.saturating_duration_since(self.at)))
    }
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn offset(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

/// Single countdown timer
#[derive(Debug)]
pub struct Timer<O = ()> {
    duration: u64,
    time_remaining: u64,
    anchor: Option<Anchor>,
    is_running: bool,
    is_paused: bool,
    is_completed: bool,
    observer: O,
}

impl<O: TimerObserver> Timer<O> {
    /// Create a stopped timer with the default five minute duration
    pub fn new(observer: O) -> Self {
        Self::with_duration(DEFAULT_DURATION_MS, observer)
    }

    /// Create a stopped timer with the given duration in milliseconds
    pub fn with_duration(duration: u64, observer: O) -> Self {
        Self {
            duration,
            time_remaining: duration,
            anchor: None,
            is_running: false,
            is_paused: false,
            is_completed: false,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// True while the countdown is live and needs periodic ticks
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused
    }

    pub fn status(&self) -> TimerStatus {
        self.snapshot().status()
    }

    /// Fraction of the duration already consumed; a zero duration counts as done
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        1.0 - self.time_remaining as f64 / self.duration as f64
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            duration: self.duration,
            time_remaining: self.time_remaining,
            is_running: self.is_running,
            is_paused: self.is_paused,
            is_completed: self.is_completed,
            progress: self.progress(),
        }
    }

    /// Remaining time rendered as `m:ss`
    pub fn format_time(&self) -> String {
        format_time(self.time_remaining)
    }

    /// Start counting down, optionally replacing the duration first.
    ///
    /// Without a duration the countdown continues from the current remaining
    /// time, which is what makes `restart` and restoration work.
    pub fn start(&mut self, duration: Option<u64>) {
        if let Some(duration) = duration {
            self.duration = duration;
            self.time_remaining = duration;
        }

        self.anchor = Some(self.anchor_now());
        self.is_paused = false;
        self.is_running = true;
        self.is_completed = false;

        info!("Timer started: {}ms of {}ms remaining", self.time_remaining, self.duration);
        self.notify_state_change();
    }

    /// Stop and rewind to the full duration
    pub fn stop(&mut self) {
        self.is_running = false;
        self.is_paused = false;
        self.is_completed = false;
        self.time_remaining = self.duration;
        self.anchor = None;

        info!("Timer stopped");
        self.notify_update();
        self.notify_state_change();
    }

    pub fn pause(&mut self) {
        if !self.is_ticking() {
            debug!("Ignoring pause: timer is not actively running");
            return;
        }

        self.time_remaining = self.remaining_at(Instant::now());
        self.is_paused = true;
        self.anchor = None;

        info!("Timer paused with {}ms remaining", self.time_remaining);
        self.notify_update();
        self.notify_state_change();
    }

    pub fn resume(&mut self) {
        if !self.is_running || !self.is_paused {
            debug!("Ignoring resume: timer is not paused");
            return;
        }

        self.anchor = Some(self.anchor_now());
        self.is_paused = false;

        info!("Timer resumed with {}ms remaining", self.time_remaining);
        self.notify_update();
        self.notify_state_change();
    }

    /// Stop, then start again with the current duration
    pub fn restart(&mut self) {
        self.stop();
        self.start(None);
    }

    /// Extend (or with a negative delta, shorten) the countdown
    pub fn add_time(&mut self, delta_ms: i64) {
        self.duration = offset(self.duration, delta_ms);

        if self.is_ticking() {
            self.time_remaining = self.remaining_at(Instant::now());
        } else {
            self.time_remaining = offset(self.time_remaining, delta_ms).min(self.duration);
        }

        debug!("Added {}ms: {}ms of {}ms remaining", delta_ms, self.time_remaining, self.duration);
        self.reopen_if_completed();
        self.notify_update();
    }

    /// Replace both the duration and the remaining time
    pub fn set_time(&mut self, ms: u64) {
        self.duration = ms;
        self.time_remaining = ms;

        if self.is_ticking() {
            self.anchor = Some(Anchor {
                at: Instant::now(),
                elapsed_ms: 0,
            });
        }

        debug!("Time set to {}ms", ms);
        self.reopen_if_completed();
        self.notify_update();
    }

    /// Recompute the remaining time; completes the countdown when it hits zero.
    /// Does nothing unless the timer is actively running.
    pub fn tick(&mut self) {
        if !self.is_ticking() {
            return;
        }

        self.time_remaining = self.remaining_at(Instant::now());
        trace!("Tick: {}ms remaining", self.time_remaining);
        self.notify_update();

        if self.time_remaining == 0 {
            self.is_running = false;
            self.is_completed = true;
            self.anchor = None;

            info!("Timer completed");
            self.notify_update();
            self.notify_state_change();
            self.observer.on_complete();
        }
    }

    /// Rebuild the timer from a stored snapshot.
    ///
    /// A running snapshot continues from where it left off as if the process
    /// had never stopped. Missing fields fall back to their defaults.
    pub fn restore(&mut self, saved: &SavedState) {
        self.duration = saved.duration.unwrap_or(DEFAULT_DURATION_MS);
        self.time_remaining = saved
            .time_remaining
            .unwrap_or(self.duration)
            .min(self.duration);
        self.anchor = None;
        self.is_running = false;
        self.is_paused = false;
        self.is_completed = false;

        let running = saved.is_running.unwrap_or(false);
        let paused = saved.is_paused.unwrap_or(false);
        let completed = saved.is_completed.unwrap_or(false);

        if running && !paused {
            info!("Restoring running timer with {}ms remaining", self.time_remaining);
            self.start(None);
        } else if running {
            info!("Restoring paused timer with {}ms remaining", self.time_remaining);
            self.is_running = true;
            self.is_paused = true;
            self.notify_update();
            self.notify_state_change();
        } else if completed {
            info!("Restoring completed timer");
            self.is_completed = true;
            self.time_remaining = 0;
            self.notify_update();
            self.notify_state_change();
        } else {
            debug!("Restored stopped timer with {}ms remaining", self.time_remaining);
        }
    }

    fn anchor_now(&self) -> Anchor {
        Anchor {
            at: Instant::now(),
            elapsed_ms: self.duration.saturating_sub(self.time_remaining),
        }
    }

    fn remaining_at(&self, now: Instant) -> u64 {
        match self.anchor {
            Some(anchor) => self.duration.saturating_sub(anchor.elapsed(now)),
            None => self.time_remaining,
        }
    }

    // Added time on a finished countdown turns it back into a stopped one
    fn reopen_if_completed(&mut self) {
        if self.is_completed && self.time_remaining > 0 {
            self.is_completed = false;
            self.notify_state_change();
        }
    }

    fn notify_update(&mut self) {
        let snapshot = self.snapshot();
        self.observer.on_update(&snapshot);
    }

    fn notify_state_change(&mut self) {
        let snapshot = self.snapshot();
        self.observer.on_state_change(&snapshot);
    }
}

impl Default for Timer<()> {
    fn default() -> Self {
        Self::new(())
    }
}
