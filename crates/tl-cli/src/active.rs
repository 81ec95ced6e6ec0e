//! The trip in progress.
//!
//! A stopwatch trip spans several CLI invocations, so its state lives in
//! `active_trip.json` in the data directory. Only the start reference of the
//! running segment is stored; elapsed time is always recomputed from it, which
//! keeps the measurement right across suspends and between commands.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use tl_core::{
    Clock, DurationRecord, SegmentType, Stopwatch, TimeSegment, TimerState, Trip,
};

/// One finished leg of the trip in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSegment {
    pub segment_type: SegmentType,
    pub record: DurationRecord,
}

/// A stopwatch trip that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTrip {
    pub trip_id: String,
    pub direction: String,
    /// Segment being timed; `None` once the last one is done.
    pub current: Option<SegmentType>,
    pub timer: TimerState,
    pub completed: Vec<CompletedSegment>,
    /// Save progress of `tl trip finish`, so a retry after a failed append
    /// writes only the rows the store does not have yet.
    #[serde(default)]
    pub saved: SaveProgress,
}

/// Rows of a finished trip already appended to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProgress {
    pub trip_row: bool,
    pub segment_rows: usize,
}

impl ActiveTrip {
    /// Starts a trip and the timer of its first segment.
    pub fn start<C: Clock>(clock: C, trip_id: String, direction: String) -> Self {
        let mut stopwatch = Stopwatch::new(clock);
        stopwatch.start();
        Self {
            trip_id,
            direction,
            current: Some(SegmentType::ALL[0]),
            timer: stopwatch.state(),
            completed: Vec::new(),
            saved: SaveProgress::default(),
        }
    }

    /// The running segment's stopwatch, resumed against `clock`.
    pub fn stopwatch<C: Clock>(&self, clock: C) -> Stopwatch<C> {
        Stopwatch::restore(clock, self.timer)
    }

    /// Stops the current segment, records it and starts the next one.
    ///
    /// Returns the finished segment, or `None` when every segment is already
    /// done.
    pub fn advance<C: Clock + Clone>(&mut self, clock: C) -> Option<&CompletedSegment> {
        let segment_type = self.current?;
        let mut stopwatch = self.stopwatch(clock.clone());
        let record = stopwatch.stop()?;
        self.completed.push(CompletedSegment {
            segment_type,
            record,
        });

        self.current = segment_type.next();
        self.timer = if self.current.is_some() {
            let mut next = Stopwatch::new(clock);
            next.start();
            next.state()
        } else {
            TimerState::Idle
        };
        self.completed.last()
    }

    pub const fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    /// Sum of the completed segments' minutes.
    pub fn total_minutes(&self) -> f64 {
        self.completed
            .iter()
            .map(|s| s.record.duration_minutes)
            .sum()
    }

    /// The rows written when the trip is saved on `date`.
    pub fn to_rows(&self, date: NaiveDate) -> (Trip, Vec<TimeSegment>) {
        let trip = Trip::logged(
            self.trip_id.clone(),
            date,
            self.direction.clone(),
            self.total_minutes(),
        );
        let segments = self
            .completed
            .iter()
            .map(|s| {
                TimeSegment::from_duration(
                    String::new(),
                    self.trip_id.clone(),
                    s.segment_type,
                    &s.record,
                )
            })
            .collect();
        (trip, segments)
    }
}

/// Location of the persisted trip in progress.
#[derive(Debug, Clone)]
pub struct ActiveTripFile {
    path: PathBuf,
}

impl ActiveTripFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Takes the exclusive lock guarding read-modify-write of the file.
    /// Released when the returned handle is dropped.
    pub fn lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let lock_file = File::create(self.lock_path()).context("failed to create lock file")?;
        lock_file
            .lock_exclusive()
            .context("failed to acquire lock")?;
        Ok(lock_file)
    }

    /// Loads the trip in progress, `None` when there is none.
    pub fn load(&self) -> Result<Option<ActiveTrip>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trip = serde_json::from_str(&contents)
                    .with_context(|| format!("failed to parse {}", self.path.display()))?;
                Ok(Some(trip))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", self.path.display())),
        }
    }

    pub fn save(&self, trip: &ActiveTrip) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(trip).context("failed to encode active trip")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::debug!(trip_id = %trip.trip_id, "active trip saved");
        Ok(())
    }

    /// Removes the trip in progress. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }
}
