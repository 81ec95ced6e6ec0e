//! Trip commands: stopwatch trips across invocations, manual logging, and
//! listing or deleting logged trips.

use std::collections::HashSet;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use tl_core::vocab::normalize_direction;
use tl_core::{Clock, RowId, SegmentType, TimeSegment, Trip, format_time};
use tl_store::{Repository, RowStore, generate_id};

use crate::active::{ActiveTrip, ActiveTripFile, CompletedSegment};
use crate::commands::util::{SegmentEntry, parse_segment_entry};

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Departure airport (MCI or PDX).
    #[arg(short, long)]
    pub direction: String,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Departure airport (MCI or PDX).
    #[arg(short, long)]
    pub direction: String,

    /// Segment duration as TYPE=DURATION, e.g. `house_to_airport=35m`.
    /// Repeat for each segment; zero durations are skipped.
    #[arg(long = "segment", value_name = "TYPE=DURATION", value_parser = parse_segment_entry, required = true)]
    pub segments: Vec<SegmentEntry>,
}

const NO_TRIP: &str = "No trip in progress. Start one with `tl trip start --direction MCI`.";

// ========== Stopwatch trip ==========

pub fn start<W: Write, C: Clock>(
    writer: &mut W,
    file: &ActiveTripFile,
    clock: C,
    args: &StartArgs,
) -> Result<()> {
    let direction = normalize_direction(&args.direction)?;
    let _lock = file.lock()?;

    if let Some(existing) = file.load()? {
        writeln!(
            writer,
            "A {} trip is already in progress. Use `tl trip status`, or `tl trip discard` to start over.",
            existing.direction
        )?;
        return Ok(());
    }

    let trip = ActiveTrip::start(clock, generate_id(), direction);
    file.save(&trip)?;
    tracing::info!(trip_id = %trip.trip_id, "trip started");

    writeln!(writer, "Started {} trip.", trip.direction)?;
    if let Some(current) = trip.current {
        writeln!(writer, "Timing: {}", current.label())?;
    }
    Ok(())
}

pub fn next<W: Write, C: Clock + Clone>(
    writer: &mut W,
    file: &ActiveTripFile,
    clock: C,
) -> Result<()> {
    let _lock = file.lock()?;
    let Some(mut trip) = file.load()? else {
        writeln!(writer, "{NO_TRIP}")?;
        return Ok(());
    };

    let Some(done) = trip.advance(clock).cloned() else {
        writeln!(writer, "All segments are done. Run `tl trip finish` to save.")?;
        return Ok(());
    };
    file.save(&trip)?;

    write_completed(writer, &done)?;
    write_next_step(writer, &trip)?;
    Ok(())
}

pub fn status<W: Write, C: Clock>(writer: &mut W, file: &ActiveTripFile, clock: C) -> Result<()> {
    let Some(trip) = file.load()? else {
        writeln!(writer, "{NO_TRIP}")?;
        return Ok(());
    };

    writeln!(writer, "{} trip", trip.direction)?;
    for done in &trip.completed {
        write_completed(writer, done)?;
    }
    if let Some(current) = trip.current {
        let elapsed = trip.stopwatch(clock).elapsed_ms();
        writeln!(writer, "> {:<20} {}", current.label(), format_time(elapsed))?;
    }
    writeln!(writer, "Total: {:.1} min", trip.total_minutes())?;
    Ok(())
}

pub fn discard<W: Write>(writer: &mut W, file: &ActiveTripFile) -> Result<()> {
    let _lock = file.lock()?;
    if file.clear()? {
        tracing::info!("active trip discarded");
        writeln!(writer, "Trip discarded.")?;
    } else {
        writeln!(writer, "{NO_TRIP}")?;
    }
    Ok(())
}

/// Saves the completed trip and its segments, then forgets it locally.
pub async fn finish<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    file: &ActiveTripFile,
    repo: &Repository<S, C>,
    today: NaiveDate,
) -> Result<()> {
    let _lock = file.lock()?;
    let Some(mut trip) = file.load()? else {
        writeln!(writer, "{NO_TRIP}")?;
        return Ok(());
    };
    if let Some(current) = trip.current {
        writeln!(
            writer,
            "Trip still in progress (timing {}). Run `tl trip next` until every segment is done.",
            current.label()
        )?;
        return Ok(());
    }

    // Progress is saved after every append; a retry skips rows already written.
    let (row, segments) = trip.to_rows(today);
    if trip.saved.trip_row {
        tracing::info!(trip_id = %trip.trip_id, "trip row already saved, resuming");
    } else {
        repo.add_trip(row.clone())
            .await
            .context("failed to save trip")?;
        trip.saved.trip_row = true;
        file.save(&trip)?;
    }
    for segment in segments.into_iter().skip(trip.saved.segment_rows) {
        repo.add_time_segment(segment)
            .await
            .context("failed to save time segment; run `tl trip finish` again to retry")?;
        trip.saved.segment_rows += 1;
        file.save(&trip)?;
    }
    file.clear()?;
    tracing::info!(trip_id = %trip.trip_id, "trip saved");

    writeln!(
        writer,
        "Trip saved: {} min over {} segments.",
        row.total_time,
        trip.completed.len()
    )?;
    Ok(())
}

fn write_completed<W: Write>(writer: &mut W, done: &CompletedSegment) -> Result<()> {
    writeln!(
        writer,
        "  {:<20} {:.1}m",
        done.segment_type.label(),
        done.record.duration_minutes
    )?;
    Ok(())
}

pub(crate) fn write_next_step<W: Write>(writer: &mut W, trip: &ActiveTrip) -> Result<()> {
    match trip.current {
        Some(current) => writeln!(writer, "Timing: {}", current.label())?,
        None => {
            writeln!(
                writer,
                "Trip complete! Total time: {:.1} min",
                trip.total_minutes()
            )?;
            writeln!(
                writer,
                "Run `tl trip finish` to save or `tl trip discard` to throw it away."
            )?;
        }
    }
    Ok(())
}

// ========== Manual trip ==========

/// Logs a trip from manually entered segment durations.
pub async fn log<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
    args: &LogArgs,
    today: NaiveDate,
) -> Result<()> {
    let direction = normalize_direction(&args.direction)?;

    let mut seen = HashSet::new();
    for entry in &args.segments {
        if !seen.insert(entry.segment_type) {
            anyhow::bail!("segment {} given more than once", entry.segment_type);
        }
    }

    let mut entries: Vec<&SegmentEntry> = args.segments.iter().filter(|e| e.minutes > 0.0).collect();
    if entries.is_empty() {
        anyhow::bail!("no segment has a duration above zero");
    }
    entries.sort_by_key(|e| journey_position(e.segment_type));

    let total: f64 = entries.iter().map(|e| e.minutes).sum();
    let trip_id = generate_id();
    let row = Trip::logged(trip_id.clone(), today, direction, total);
    let segments = entries
        .iter()
        .map(|e| TimeSegment::manual(String::new(), trip_id.clone(), e.segment_type, e.minutes))
        .collect();

    let saved = save_trip(repo, row, segments).await?;
    writeln!(
        writer,
        "Logged {} trip on {}: {} min over {} segments.",
        saved.direction,
        saved.date,
        saved.total_time,
        entries.len()
    )?;
    Ok(())
}

fn journey_position(segment_type: SegmentType) -> usize {
    SegmentType::ALL
        .iter()
        .position(|s| *s == segment_type)
        .unwrap_or(usize::MAX)
}

async fn save_trip<S: RowStore, C: Clock>(
    repo: &Repository<S, C>,
    row: Trip,
    segments: Vec<TimeSegment>,
) -> Result<Trip> {
    let saved = repo.add_trip(row).await.context("failed to save trip")?;
    for segment in segments {
        repo.add_time_segment(segment)
            .await
            .context("failed to save time segment")?;
    }
    tracing::info!(trip_id = %saved.id, "trip saved");
    Ok(saved)
}

// ========== Logged trips ==========

pub async fn list<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
    refresh: bool,
) -> Result<()> {
    let trips = repo.list_trips(refresh).await.context("failed to load trips")?;
    if trips.is_empty() {
        writeln!(writer, "No trips logged.")?;
        return Ok(());
    }

    writeln!(writer, "{:<12} {:<10} {:<4} {:>8}  ID", "DATE", "DAY", "DIR", "MIN")?;
    for trip in &trips {
        writeln!(
            writer,
            "{:<12} {:<10} {:<4} {:>8}  {}",
            trip.date, trip.day_of_week, trip.direction, trip.total_time, trip.id
        )?;
    }
    Ok(())
}

pub async fn delete<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
    id: &str,
) -> Result<()> {
    let id = RowId::new(id)?;
    repo.delete_trip(&id)
        .await
        .with_context(|| format!("failed to delete trip {id}"))?;
    writeln!(writer, "Deleted trip {id}.")?;
    Ok(())
}
