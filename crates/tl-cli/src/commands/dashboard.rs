//! Headline numbers.

use std::io::Write;

use anyhow::Result;

use tl_core::Clock;
use tl_core::stats::{DashboardSummary, dashboard_summary};
use tl_store::{Repository, RowStore};

use crate::commands::analytics::or_empty;

pub fn render<W: Write>(writer: &mut W, summary: &DashboardSummary) -> Result<()> {
    writeln!(writer, "MCI <-> PDX")?;
    writeln!(writer, "  Trips logged        {}", summary.total_trips)?;
    writeln!(
        writer,
        "  Avg door-to-gate    {:.0} min",
        summary.avg_total_minutes
    )?;
    for (direction, minutes) in summary.avg_minutes_by_direction.iter() {
        writeln!(writer, "  Avg from {direction}        {minutes:.0} min")?;
    }
    match summary.avg_miles_value {
        Some(cents) => writeln!(writer, "  Avg miles value     {cents:.2} cents/mile")?,
        None => writeln!(writer, "  Avg miles value     -")?,
    }
    if let Some(last) = &summary.last_trip {
        writeln!(
            writer,
            "  Last trip           {} {} from {}, {} min",
            last.day_of_week, last.date, last.direction, last.total_time
        )?;
    }
    Ok(())
}

pub async fn run<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
) -> Result<()> {
    let trips = or_empty(repo.list_trips(false).await, "trips");
    let flights = or_empty(repo.list_flights(false).await, "flights");
    render(writer, &dashboard_summary(&trips, &flights))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use tl_core::{Flight, Trip};
    use tl_store::MemoryRowStore;

    use super::*;

    #[tokio::test]
    async fn summary_of_trips_and_flights() {
        let repo = Repository::new(MemoryRowStore::new());
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        for (id, direction, total) in [("t1", "MCI", 88.0), ("t2", "MCI", 97.0), ("t3", "PDX", 71.6)] {
            repo.add_trip(Trip::logged(id.to_string(), date, direction.to_string(), total))
                .await
                .unwrap();
        }
        repo.add_flight(Flight {
            airline: "Alaska".to_string(),
            cash_price: "305.60".to_string(),
            miles_used: "15000".to_string(),
            fees: "5.60".to_string(),
            ..Flight::default()
        })
        .await
        .unwrap();

        let mut out = Vec::new();
        run(&mut out, &repo).await.unwrap();
        assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        MCI <-> PDX
          Trips logged        3
          Avg door-to-gate    86 min
          Avg from MCI        93 min
          Avg from PDX        72 min
          Avg miles value     2.00 cents/mile
          Last trip           Friday 2025-03-07 from PDX, 71.6 min
        ");
    }

    #[tokio::test]
    async fn empty_store_shows_zeroes() {
        let repo = Repository::new(MemoryRowStore::new());
        let mut out = Vec::new();
        run(&mut out, &repo).await.unwrap();
        assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        MCI <-> PDX
          Trips logged        0
          Avg door-to-gate    0 min
          Avg from MCI        0 min
          Avg from PDX        0 min
          Avg miles value     -
        ");
    }
}
