//! Descriptive statistics over logged trips, segments and flights.
//!
//! All functions are pure and take borrowed snapshots. Field values that do
//! not parse as finite numbers are skipped, never treated as zero.
//!
//! Two policies for "no data" coexist:
//! - [`numeric_stats`] and everything built on it return `None`, so callers
//!   can show "no data yet" instead of an average of zero.
//! - [`flight_price_stats`] reports zeroes, because the price card always
//!   shows a number.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::miles::cents_per_mile;
use crate::records::{Flight, TimeSegment, Trip};
use crate::vocab::Direction;

/// Parses a stored field as a finite number.
///
/// Surrounding whitespace is ignored. Empty, textual and non-finite values
/// yield `None`, and so does a number with trailing text such as `95 min`:
/// the whole cell must be numeric.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Mean, extremes and sample count of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Summarizes finite values; `None` when there are none.
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts are far below 2^52"
)]
pub fn numeric_stats(values: impl IntoIterator<Item = f64>) -> Option<NumericStats> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();
    let avg = sorted.iter().sum::<f64>() / count as f64;
    Some(NumericStats {
        avg,
        min: sorted[0],
        max: sorted[count - 1],
        count,
    })
}

/// One value per primary direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ByDirection<T> {
    #[serde(rename = "MCI")]
    pub mci: T,
    #[serde(rename = "PDX")]
    pub pdx: T,
}

impl<T> ByDirection<T> {
    /// Builds both entries from a function of the direction.
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self {
            mci: f(Direction::Mci),
            pdx: f(Direction::Pdx),
        }
    }

    pub const fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::Mci => &self.mci,
            Direction::Pdx => &self.pdx,
        }
    }

    /// Entries paired with their direction, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Trips whose direction is exactly `direction`'s code.
pub fn trips_in(trips: &[Trip], direction: Direction) -> Vec<&Trip> {
    trips
        .iter()
        .filter(|t| t.direction == direction.code())
        .collect()
}

/// Total-time statistics for each primary direction.
pub fn trip_time_stats(trips: &[Trip]) -> ByDirection<Option<NumericStats>> {
    ByDirection::from_fn(|direction| {
        numeric_stats(
            trips_in(trips, direction)
                .into_iter()
                .filter_map(|t| parse_number(&t.total_time)),
        )
    })
}

/// Duration statistics for one segment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    #[serde(rename = "type")]
    pub segment_type: String,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Groups the segments owned by `partition` by type and summarizes each.
///
/// Types appear in the order they are first seen. A type whose durations
/// all fail to parse produces no entry.
pub fn segment_stats(partition: &[&Trip], segments: &[TimeSegment]) -> Vec<SegmentStats> {
    let trip_ids: HashSet<&str> = partition.iter().map(|t| t.id.as_str()).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut by_type: HashMap<&str, Vec<f64>> = HashMap::new();
    for segment in segments
        .iter()
        .filter(|s| trip_ids.contains(s.trip_id.as_str()))
    {
        let Some(minutes) = parse_number(&segment.duration_minutes) else {
            continue;
        };
        let tag = segment.segment_type.as_str();
        by_type
            .entry(tag)
            .or_insert_with(|| {
                order.push(tag);
                Vec::new()
            })
            .push(minutes);
    }

    order
        .into_iter()
        .filter_map(|tag| {
            let stats = numeric_stats(by_type.remove(tag)?)?;
            Some(SegmentStats {
                segment_type: tag.to_string(),
                avg: stats.avg,
                min: stats.min,
                max: stats.max,
                count: stats.count,
            })
        })
        .collect()
}

/// [`segment_stats`] for each primary direction.
pub fn segment_stats_by_direction(
    trips: &[Trip],
    segments: &[TimeSegment],
) -> ByDirection<Vec<SegmentStats>> {
    ByDirection::from_fn(|direction| segment_stats(&trips_in(trips, direction), segments))
}

/// Cash-price summary of a set of flights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlightPriceStats {
    pub total_flights: usize,
    /// Flights with a non-empty cash price.
    pub cash_flights: usize,
    /// Flights with a non-empty miles amount.
    pub miles_flights: usize,
    pub avg_cash: f64,
    pub p25: f64,
    pub p50: f64,
}

/// Lower-index percentile of ascending `sorted`: the value at
/// `floor(len * pct / 100)`, or 0 when empty.
pub fn percentile(sorted: &[f64], pct: usize) -> f64 {
    sorted
        .get(sorted.len() * pct / 100)
        .copied()
        .unwrap_or(0.0)
}

/// Average and 25th/50th percentiles of cash prices.
///
/// With no parseable prices every figure is zero.
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts are far below 2^52"
)]
pub fn flight_price_stats(flights: &[Flight]) -> FlightPriceStats {
    let cash: Vec<&Flight> = flights
        .iter()
        .filter(|f| !f.cash_price.is_empty())
        .collect();
    let mut prices: Vec<f64> = cash
        .iter()
        .filter_map(|f| parse_number(&f.cash_price))
        .collect();
    prices.sort_by(f64::total_cmp);

    let avg_cash = if prices.is_empty() {
        0.0
    } else {
        prices.iter().sum::<f64>() / prices.len() as f64
    };

    FlightPriceStats {
        total_flights: flights.len(),
        cash_flights: cash.len(),
        miles_flights: flights.iter().filter(|f| !f.miles_used.is_empty()).count(),
        avg_cash,
        p25: percentile(&prices, 25),
        p50: percentile(&prices, 50),
    }
}

/// Cents-per-mile of one flight booked with miles, when its fields allow it.
///
/// Requires a cash price and a non-zero miles amount. Missing or unparseable
/// fees count as zero.
pub fn flight_miles_value(flight: &Flight) -> Option<f64> {
    if flight.cash_price.is_empty() || flight.miles_used.is_empty() {
        return None;
    }
    let cash = parse_number(&flight.cash_price)?;
    let miles = parse_number(&flight.miles_used)?;
    let fees = parse_number(&flight.fees).unwrap_or(0.0);
    cents_per_mile(cash, miles, fees)
}

/// Mean cents-per-mile across qualifying flights.
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts are far below 2^52"
)]
pub fn average_miles_value(flights: &[Flight]) -> Option<f64> {
    let values: Vec<f64> = flights.iter().filter_map(flight_miles_value).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_trips: usize,
    /// Mean total time in whole minutes, 0 without data.
    pub avg_total_minutes: f64,
    /// Mean total time per direction in whole minutes, 0 without data.
    pub avg_minutes_by_direction: ByDirection<f64>,
    pub avg_miles_value: Option<f64>,
    pub last_trip: Option<Trip>,
}

/// Builds the dashboard figures from trips and flights.
pub fn dashboard_summary(trips: &[Trip], flights: &[Flight]) -> DashboardSummary {
    let rounded_avg = |trips: &[&Trip]| {
        numeric_stats(trips.iter().filter_map(|t| parse_number(&t.total_time)))
            .map_or(0.0, |s| s.avg.round())
    };
    let all: Vec<&Trip> = trips.iter().collect();

    DashboardSummary {
        total_trips: trips.len(),
        avg_total_minutes: rounded_avg(&all),
        avg_minutes_by_direction: ByDirection::from_fn(|d| rounded_avg(&trips_in(trips, d))),
        avg_miles_value: average_miles_value(flights),
        last_trip: trips.last().cloned(),
    }
}
