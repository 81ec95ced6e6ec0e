//! Live stopwatch display for the trip in progress.
//!
//! Redraws the current segment's elapsed time every sample interval. Enter
//! finishes the segment and starts the next; `q` leaves without changing the
//! trip. A tick that arrives much later than scheduled means the process was
//! suspended, so the display is recomputed from the start reference instead
//! of waiting for the next regular sample.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};

use tl_core::timer::SAMPLE_INTERVAL;
use tl_core::{Clock, SegmentType, format_time};

use crate::active::{ActiveTrip, ActiveTripFile};
use crate::commands::trip::write_next_step;

/// A gap this many sample intervals long is treated as a resume.
const LATE_TICK_FACTOR: u32 = 5;

/// Whether the time since the previous tick indicates a suspension.
pub fn is_late_tick(gap: Duration) -> bool {
    gap >= SAMPLE_INTERVAL * LATE_TICK_FACTOR
}

/// Real time between redraws, read when each tick is handled.
///
/// `Interval::tick` yields the scheduled deadline, which after a suspension
/// is only one interval past the previous one, so it cannot reveal the gap.
#[derive(Debug)]
struct TickGap {
    last: Instant,
}

impl TickGap {
    const fn new(now: Instant) -> Self {
        Self { last: now }
    }

    /// Time since the previous observation.
    fn observe(&mut self, now: Instant) -> Duration {
        let gap = now.saturating_duration_since(self.last);
        self.last = now;
        gap
    }
}

/// The single status line redrawn on every tick.
pub fn render_line(segment: SegmentType, elapsed_ms: i64) -> String {
    format!(
        "\r{:<20} {:>8}  [Enter] next  [q] quit ",
        segment.label(),
        format_time(elapsed_ms)
    )
}

pub async fn run<W: Write, C: Clock + Clone>(
    writer: &mut W,
    file: &ActiveTripFile,
    clock: C,
) -> Result<()> {
    let Some(mut trip) = file.load()? else {
        writeln!(writer, "No trip in progress. Start one with `tl trip start --direction MCI`.")?;
        return Ok(());
    };
    if trip.is_complete() {
        write_next_step(writer, &trip)?;
        return Ok(());
    }

    let mut stopwatch = trip.stopwatch(clock.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(SAMPLE_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick_gap = TickGap::new(Instant::now());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let gap = tick_gap.observe(Instant::now());
                let elapsed = if is_late_tick(gap) {
                    tracing::debug!(gap_ms = gap.as_millis(), "late tick, resuming");
                    stopwatch.resume()
                } else {
                    stopwatch.sample()
                };
                if let (Some(segment), Some(elapsed)) = (trip.current, elapsed) {
                    write!(writer, "{}", render_line(segment, elapsed))?;
                    writer.flush()?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    writeln!(writer)?;
                    return Ok(());
                };
                if line.trim().eq_ignore_ascii_case("q") {
                    writeln!(writer, "Trip still running. `tl trip live` picks it up again.")?;
                    return Ok(());
                }

                trip = advance_persisted(file, clock.clone())?;
                writeln!(writer)?;
                if let Some(done) = trip.completed.last() {
                    writeln!(
                        writer,
                        "  {:<20} {:.1}m",
                        done.segment_type.label(),
                        done.record.duration_minutes
                    )?;
                }
                write_next_step(writer, &trip)?;
                if trip.is_complete() {
                    return Ok(());
                }
                stopwatch = trip.stopwatch(clock.clone());
            }
        }
    }
}

/// Advances the stored trip under the file lock, reloading it first so a
/// `tl trip next` run from another terminal is not lost.
fn advance_persisted<C: Clock + Clone>(file: &ActiveTripFile, clock: C) -> Result<ActiveTrip> {
    let _lock = file.lock()?;
    let mut trip = file
        .load()?
        .context("the trip was discarded from another terminal")?;
    if trip.advance(clock).is_some() {
        file.save(&trip)?;
    }
    Ok(trip)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tl_core::ManualClock;

    use super::*;

    #[test]
    fn regular_ticks_are_not_late() {
        assert!(!is_late_tick(SAMPLE_INTERVAL));
        assert!(!is_late_tick(SAMPLE_INTERVAL * 2));
    }

    #[test]
    fn long_gaps_are_late() {
        assert!(is_late_tick(SAMPLE_INTERVAL * 5));
        assert!(is_late_tick(Duration::from_secs(600)));
    }

    #[test]
    fn tick_gap_measures_observed_time() {
        let start = Instant::now();
        let mut gap = TickGap::new(start);
        assert!(!is_late_tick(gap.observe(start + SAMPLE_INTERVAL)));

        let resumed = start + SAMPLE_INTERVAL + Duration::from_secs(90);
        let observed = gap.observe(resumed);
        assert_eq!(observed, Duration::from_secs(90));
        assert!(is_late_tick(observed));

        assert!(!is_late_tick(gap.observe(resumed + SAMPLE_INTERVAL)));
    }

    #[test]
    fn line_shows_segment_and_time() {
        assert_eq!(
            render_line(SegmentType::ParkingToSecurity, 754_000),
            "\rParking to Security     12:34  [Enter] next  [q] quit "
        );
    }

    #[test]
    fn advance_persisted_saves_the_next_segment() {
        let temp = tempfile::tempdir().unwrap();
        let file = ActiveTripFile::new(temp.path().join("active_trip.json"));
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 7, 5, 30, 0).unwrap());
        file.save(&ActiveTrip::start(
            clock.clone(),
            "t1".to_string(),
            "MCI".to_string(),
        ))
        .unwrap();

        clock.advance(chrono::Duration::minutes(28));
        let trip = advance_persisted(&file, clock).unwrap();
        assert_eq!(trip.current, Some(SegmentType::TerminalToParking));
        assert_eq!(file.load().unwrap(), Some(trip));
    }

    #[test]
    fn advance_persisted_fails_without_a_trip() {
        let temp = tempfile::tempdir().unwrap();
        let file = ActiveTripFile::new(temp.path().join("active_trip.json"));
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 7, 5, 30, 0).unwrap());
        assert!(advance_persisted(&file, clock).is_err());
    }
}
