//! Elapsed-time tracking for trip segments.
//!
//! A [`Stopwatch`] keeps one authoritative start reference. Periodic samples
//! only refresh an advisory "elapsed so far" value for display; the final
//! duration is always recomputed from the reference at [`Stopwatch::stop`],
//! so time spent while sampling was suspended (process stopped, terminal in
//! the background, state persisted between invocations) is still counted.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a live display should call [`Stopwatch::sample`].
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

const MS_PER_MINUTE: f64 = 60_000.0;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and pass
/// another to the component under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward (or backward, for a negative delta).
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stopwatch state.
///
/// A stopped stopwatch is `Idle` again; the caller keeps the returned
/// [`DurationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        /// Authoritative start reference.
        started_at: DateTime<Utc>,
    },
}

/// The measurement produced by [`Stopwatch::stop`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationRecord {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    /// Milliseconds between start and end, never negative.
    pub duration_ms: i64,
    /// `duration_ms` in minutes, rounded to one decimal.
    pub duration_minutes: f64,
}

impl DurationRecord {
    /// Builds a record spanning `start_time..end_time`.
    ///
    /// A clock that stepped backwards yields a zero duration.
    pub fn between(start_time: Option<DateTime<Utc>>, end_time: DateTime<Utc>) -> Self {
        let duration_ms = start_time
            .map_or(0, |start| (end_time - start).num_milliseconds())
            .max(0);
        Self {
            start_time,
            end_time,
            duration_ms,
            duration_minutes: ms_to_minutes(duration_ms),
        }
    }
}

/// Converts milliseconds to minutes rounded to one decimal place.
#[expect(
    clippy::cast_precision_loss,
    reason = "trip durations are far below 2^52 ms"
)]
pub fn ms_to_minutes(ms: i64) -> f64 {
    round_to_tenth(ms as f64 / MS_PER_MINUTE)
}

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Start/stop/reset timer over an injected [`Clock`].
#[derive(Debug, Clone)]
pub struct Stopwatch<C: Clock = SystemClock> {
    clock: C,
    state: TimerState,
    elapsed_ms: i64,
}

impl<C: Clock> Stopwatch<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            elapsed_ms: 0,
        }
    }

    /// Rebuilds a stopwatch from a persisted state.
    ///
    /// A running stopwatch comes back as if the host had just been resumed:
    /// the elapsed value is recomputed from the stored start reference.
    pub fn restore(clock: C, state: TimerState) -> Self {
        let mut stopwatch = Self {
            clock,
            state,
            elapsed_ms: 0,
        };
        stopwatch.resume();
        stopwatch
    }

    pub const fn state(&self) -> TimerState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            TimerState::Running { started_at } => Some(started_at),
            TimerState::Idle => None,
        }
    }

    /// The last sampled elapsed time. Advisory; for display only.
    pub const fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    /// Starts timing from the current instant.
    ///
    /// Returns `true` when the stopwatch transitioned to running and the
    /// caller should begin sampling every [`SAMPLE_INTERVAL`]. Starting a
    /// running stopwatch returns `false` and leaves the reference untouched.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            tracing::debug!("start ignored: stopwatch already running");
            return false;
        }
        let started_at = self.clock.now();
        self.state = TimerState::Running { started_at };
        self.elapsed_ms = 0;
        tracing::debug!(%started_at, "stopwatch started");
        true
    }

    /// Refreshes the advisory elapsed value.
    ///
    /// Returns the new value, or `None` when idle.
    pub fn sample(&mut self) -> Option<i64> {
        let TimerState::Running { started_at } = self.state else {
            return None;
        };
        self.elapsed_ms = (self.clock.now() - started_at).num_milliseconds().max(0);
        Some(self.elapsed_ms)
    }

    /// Recomputes the elapsed value after the host was suspended.
    ///
    /// Samples may not have fired for a while; the value shown after a
    /// resume must not be left stale.
    pub fn resume(&mut self) -> Option<i64> {
        let elapsed = self.sample()?;
        tracing::debug!(elapsed_ms = elapsed, "stopwatch resumed");
        Some(elapsed)
    }

    /// Stops timing and returns the measurement.
    ///
    /// The duration is measured from the start reference, not from the last
    /// sample. Stopping an idle stopwatch returns `None` and changes nothing.
    pub fn stop(&mut self) -> Option<DurationRecord> {
        let TimerState::Running { started_at } = self.state else {
            tracing::debug!("stop ignored: stopwatch not running");
            return None;
        };
        let record = DurationRecord::between(Some(started_at), self.clock.now());
        self.state = TimerState::Idle;
        self.elapsed_ms = record.duration_ms;
        tracing::debug!(duration_ms = record.duration_ms, "stopwatch stopped");
        Some(record)
    }

    /// Returns to idle and clears the elapsed value.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.elapsed_ms = 0;
    }
}

/// Formats milliseconds as `H:MM:SS`, or `M:SS` under an hour.
///
/// Negative input formats as `0:00`.
pub fn format_time(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
