//! Trip time and flight price statistics.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use tl_core::stats::{
    ByDirection, FlightPriceStats, flight_price_stats, segment_stats_by_direction,
    trip_time_stats,
};
use tl_core::vocab::segment_label;
use tl_core::{Clock, Flight, NumericStats, SegmentStats, TimeSegment, Trip};
use tl_store::{Repository, RowStore, StoreError};

use crate::commands::util::dollars;

pub const NO_TRIPS: &str = "No trip data yet. Start logging trips!";
pub const NO_FLIGHTS: &str = "No flight data yet. Start adding flights!";

/// Everything the analytics view shows.
#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub trip_times: ByDirection<Option<NumericStats>>,
    pub segments: ByDirection<Vec<SegmentStats>>,
    pub flights: FlightPriceStats,
}

impl AnalyticsReport {
    pub fn build(trips: &[Trip], segments: &[TimeSegment], flights: &[Flight]) -> Self {
        Self {
            trip_times: trip_time_stats(trips),
            segments: segment_stats_by_direction(trips, segments),
            flights: flight_price_stats(flights),
        }
    }

    pub fn render<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "Time")?;
        let mut any_trips = false;
        for (direction, stats) in self.trip_times.iter() {
            let Some(stats) = stats else { continue };
            any_trips = true;
            writeln!(
                writer,
                "  {direction}  avg {:.0} min  best {:.0}  worst {:.0}  ({} trips)",
                stats.avg, stats.min, stats.max, stats.count
            )?;
        }
        if !any_trips {
            writeln!(writer, "  {NO_TRIPS}")?;
        }

        for (direction, segments) in self.segments.iter() {
            if segments.is_empty() {
                continue;
            }
            writeln!(writer)?;
            writeln!(writer, "{direction} Segments")?;
            for stat in segments {
                writeln!(
                    writer,
                    "  {:<20} {:>3} samples  avg {:.1}  min {:.1}  max {:.1}",
                    segment_label(&stat.segment_type),
                    stat.count,
                    stat.avg,
                    stat.min,
                    stat.max
                )?;
            }
        }

        let flights = &self.flights;
        writeln!(writer)?;
        writeln!(writer, "Flights")?;
        writeln!(
            writer,
            "  Total {}  Cash {}  Miles {}",
            flights.total_flights, flights.cash_flights, flights.miles_flights
        )?;
        if flights.avg_cash > 0.0 {
            writeln!(writer, "  Average    {}", dollars(flights.avg_cash))?;
            writeln!(writer, "  25th %ile  {}", dollars(flights.p25))?;
            writeln!(writer, "  Median     {}", dollars(flights.p50))?;
            writeln!(
                writer,
                "  Flights under {} are a good deal.",
                dollars(flights.p25)
            )?;
        }
        if flights.total_flights == 0 {
            writeln!(writer, "  {NO_FLIGHTS}")?;
        }
        Ok(())
    }
}

/// A failed read shows as no data, the way the analytics screen degrades.
pub(crate) fn or_empty<T>(result: Result<Vec<T>, StoreError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load {what}, showing none");
        Vec::new()
    })
}

pub async fn run<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
    json: bool,
) -> Result<()> {
    let trips = or_empty(repo.list_trips(false).await, "trips");
    let segments = or_empty(repo.list_time_segments(None, false).await, "time segments");
    let flights = or_empty(repo.list_flights(false).await, "flights");

    let report = AnalyticsReport::build(&trips, &segments, &flights);
    if json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to encode analytics")?;
        writeln!(writer, "{json}")?;
    } else {
        report.render(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use tl_store::MemoryRowStore;

    use super::*;

    fn trip(id: &str, direction: &str, total: &str) -> Trip {
        Trip {
            id: id.to_string(),
            direction: direction.to_string(),
            total_time: total.to_string(),
            ..Trip::default()
        }
    }

    fn segment(trip_id: &str, tag: &str, minutes: &str) -> TimeSegment {
        TimeSegment {
            trip_id: trip_id.to_string(),
            segment_type: tag.to_string(),
            duration_minutes: minutes.to_string(),
            ..TimeSegment::default()
        }
    }

    fn cash_flight(price: &str) -> Flight {
        Flight {
            airline: "Alaska".to_string(),
            cash_price: price.to_string(),
            ..Flight::default()
        }
    }

    fn render(report: &AnalyticsReport) -> String {
        let mut out = Vec::new();
        report.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_data_shows_prompts_not_zeroes() {
        let report = AnalyticsReport::build(&[], &[], &[]);
        assert_snapshot!(render(&report), @r"
        Time
          No trip data yet. Start logging trips!

        Flights
          Total 0  Cash 0  Miles 0
          No flight data yet. Start adding flights!
        ");
    }

    #[test]
    fn full_report() {
        let trips = [
            trip("t1", "MCI", "90"),
            trip("t2", "MCI", "110.4"),
            trip("t3", "PDX", "75"),
            trip("t4", "SEA", "60"),
        ];
        let segments = [
            segment("t1", "house_to_airport", "30"),
            segment("t2", "house_to_airport", "35"),
            segment("t2", "security_to_gate", "18.5"),
            segment("t3", "rental_car_return", "12"),
            segment("t4", "house_to_airport", "99"),
        ];
        let flights = [
            cash_flight("100"),
            cash_flight("200"),
            cash_flight("300"),
            cash_flight("400"),
            Flight {
                miles_used: "25000".to_string(),
                ..Flight::default()
            },
        ];

        let report = AnalyticsReport::build(&trips, &segments, &flights);
        assert_snapshot!(render(&report), @r"
        Time
          MCI  avg 100 min  best 90  worst 110  (2 trips)
          PDX  avg 75 min  best 75  worst 75  (1 trips)

        MCI Segments
          House to Airport       2 samples  avg 32.5  min 30.0  max 35.0
          Security to Gate       1 samples  avg 18.5  min 18.5  max 18.5

        PDX Segments
          rental car return      1 samples  avg 12.0  min 12.0  max 12.0

        Flights
          Total 5  Cash 4  Miles 1
          Average    $250
          25th %ile  $200
          Median     $300
          Flights under $200 are a good deal.
        ");
    }

    #[test]
    fn price_card_hidden_without_cash_prices() {
        let flights = [Flight {
            miles_used: "12500".to_string(),
            ..Flight::default()
        }];
        let text = render(&AnalyticsReport::build(&[], &[], &flights));
        assert!(text.contains("Total 1  Cash 0  Miles 1"));
        assert!(!text.contains("good deal"));
        assert!(!text.contains(NO_FLIGHTS));
    }

    #[tokio::test]
    async fn json_output_uses_direction_keys() {
        let repo = Repository::new(MemoryRowStore::new());
        repo.add_trip(trip("t1", "PDX", "80")).await.unwrap();

        let mut out = Vec::new();
        run(&mut out, &repo, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["trip_times"]["PDX"]["count"], 1);
        assert!(value["trip_times"]["MCI"].is_null());
        assert_eq!(value["flights"]["total_flights"], 0);
    }
}
