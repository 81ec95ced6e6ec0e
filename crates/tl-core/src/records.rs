//! Row shapes of the three row-store collections.
//!
//! Every field is kept as the string the store returned. Numeric meaning is
//! assigned only by the aggregator, which skips anything that does not parse.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timer::DurationRecord;
use crate::vocab::SegmentType;

/// Column order of the `trips` collection.
pub const TRIP_FIELDS: [&str; 7] = [
    "id",
    "date",
    "direction",
    "flight_time",
    "day_of_week",
    "notes",
    "total_time",
];

/// Column order of the `time_segments` collection.
pub const TIME_SEGMENT_FIELDS: [&str; 7] = [
    "id",
    "trip_id",
    "segment_type",
    "start_time",
    "end_time",
    "duration_minutes",
    "notes",
];

/// Column order of the `flights` collection.
pub const FLIGHT_FIELDS: [&str; 15] = [
    "id",
    "trip_id",
    "airline",
    "flight_number",
    "route",
    "departure_time",
    "scheduled_arrival",
    "actual_arrival",
    "cash_price",
    "miles_used",
    "fees",
    "booking_lead_days",
    "status",
    "delay_minutes",
    "notes",
];

/// Status written for flights that do not carry one.
pub const DEFAULT_FLIGHT_STATUS: &str = "scheduled";

/// A named collection (sheet tab) in the row store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Trips,
    TimeSegments,
    Flights,
}

impl Collection {
    pub const ALL: [Self; 3] = [Self::Trips, Self::TimeSegments, Self::Flights];

    /// Name used as the `tab` parameter on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trips => "trips",
            Self::TimeSegments => "time_segments",
            Self::Flights => "flights",
        }
    }

    /// Field names in positional order.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Trips => &TRIP_FIELDS,
            Self::TimeSegments => &TIME_SEGMENT_FIELDS,
            Self::Flights => &FLIGHT_FIELDS,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed row of one collection.
///
/// Rows map positionally onto [`Collection::fields`]: missing trailing cells
/// become empty strings and extra cells are ignored.
pub trait Record: Sized {
    /// The collection this record lives in.
    const COLLECTION: Collection;

    /// Builds a record from cells in field order.
    fn from_cells(cells: Vec<String>) -> Self;

    /// Cells in field order, ready to append or update.
    fn to_cells(&self) -> Vec<String>;

    /// The record's row identifier.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// One logged door-to-gate trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub date: String,
    pub direction: String,
    pub flight_time: String,
    pub day_of_week: String,
    pub notes: String,
    /// Total elapsed minutes across all segments.
    pub total_time: String,
}

impl Trip {
    /// A trip logged on `date`, with the weekday label filled in.
    pub fn logged(id: String, date: NaiveDate, direction: String, total_minutes: f64) -> Self {
        Self {
            id,
            date: date.format("%Y-%m-%d").to_string(),
            direction,
            flight_time: String::new(),
            day_of_week: date.format("%A").to_string(),
            notes: String::new(),
            total_time: format!("{total_minutes:.1}"),
        }
    }
}

impl Record for Trip {
    const COLLECTION: Collection = Collection::Trips;

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            id: next(),
            date: next(),
            direction: next(),
            flight_time: next(),
            day_of_week: next(),
            notes: next(),
            total_time: next(),
        }
    }

    fn to_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.clone(),
            self.direction.clone(),
            self.flight_time.clone(),
            self.day_of_week.clone(),
            self.notes.clone(),
            self.total_time.clone(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// One timed leg of a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    pub id: String,
    pub trip_id: String,
    pub segment_type: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: String,
    pub notes: String,
}

impl TimeSegment {
    /// Wraps a stopwatch reading as a segment row of `trip_id`.
    ///
    /// The minutes are written with one decimal, which is exactly the
    /// precision of [`DurationRecord::duration_minutes`].
    pub fn from_duration(
        id: String,
        trip_id: String,
        segment_type: SegmentType,
        record: &DurationRecord,
    ) -> Self {
        Self {
            id,
            trip_id,
            segment_type: segment_type.as_str().to_string(),
            start_time: record
                .start_time
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            end_time: record.end_time.to_rfc3339(),
            duration_minutes: format!("{:.1}", record.duration_minutes),
            notes: String::new(),
        }
    }

    /// A manually entered segment without timestamps.
    pub fn manual(id: String, trip_id: String, segment_type: SegmentType, minutes: f64) -> Self {
        Self {
            id,
            trip_id,
            segment_type: segment_type.as_str().to_string(),
            duration_minutes: format!("{minutes:.1}"),
            ..Self::default()
        }
    }
}

impl Record for TimeSegment {
    const COLLECTION: Collection = Collection::TimeSegments;

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            id: next(),
            trip_id: next(),
            segment_type: next(),
            start_time: next(),
            end_time: next(),
            duration_minutes: next(),
            notes: next(),
        }
    }

    fn to_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.trip_id.clone(),
            self.segment_type.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.duration_minutes.clone(),
            self.notes.clone(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A flight booking paid with cash or miles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub trip_id: String,
    pub airline: String,
    pub flight_number: String,
    pub route: String,
    pub departure_time: String,
    pub scheduled_arrival: String,
    pub actual_arrival: String,
    pub cash_price: String,
    pub miles_used: String,
    pub fees: String,
    pub booking_lead_days: String,
    pub status: String,
    pub delay_minutes: String,
    pub notes: String,
}

impl Record for Flight {
    const COLLECTION: Collection = Collection::Flights;

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            id: next(),
            trip_id: next(),
            airline: next(),
            flight_number: next(),
            route: next(),
            departure_time: next(),
            scheduled_arrival: next(),
            actual_arrival: next(),
            cash_price: next(),
            miles_used: next(),
            fees: next(),
            booking_lead_days: next(),
            status: next(),
            delay_minutes: next(),
            notes: next(),
        }
    }

    fn to_cells(&self) -> Vec<String> {
        let status = if self.status.is_empty() {
            DEFAULT_FLIGHT_STATUS.to_string()
        } else {
            self.status.clone()
        };
        vec![
            self.id.clone(),
            self.trip_id.clone(),
            self.airline.clone(),
            self.flight_number.clone(),
            self.route.clone(),
            self.departure_time.clone(),
            self.scheduled_arrival.clone(),
            self.actual_arrival.clone(),
            self.cash_price.clone(),
            self.miles_used.clone(),
            self.fees.clone(),
            self.booking_lead_days.clone(),
            status,
            self.delay_minutes.clone(),
            self.notes.clone(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn field_lists_match_record_widths() {
        let trip = Trip::default();
        assert_eq!(trip.to_cells().len(), Collection::Trips.fields().len());
        let segment = TimeSegment::default();
        assert_eq!(
            segment.to_cells().len(),
            Collection::TimeSegments.fields().len()
        );
        let flight = Flight::default();
        assert_eq!(flight.to_cells().len(), Collection::Flights.fields().len());
    }

    #[test]
    fn short_rows_pad_with_empty_strings() {
        let trip = Trip::from_cells(cells(&["t1", "2025-03-01", "MCI"]));
        assert_eq!(trip.id, "t1");
        assert_eq!(trip.direction, "MCI");
        assert_eq!(trip.day_of_week, "");
        assert_eq!(trip.total_time, "");
    }

    #[test]
    fn extra_cells_are_ignored() {
        let segment = TimeSegment::from_cells(cells(&[
            "s1",
            "t1",
            "house_to_airport",
            "",
            "",
            "32.5",
            "",
            "stray",
        ]));
        assert_eq!(segment.duration_minutes, "32.5");
        assert_eq!(segment.notes, "");
    }

    #[test]
    fn flight_without_status_is_written_as_scheduled() {
        let flight = Flight {
            id: "f1".to_string(),
            airline: "Alaska".to_string(),
            ..Flight::default()
        };
        let row = flight.to_cells();
        assert_eq!(row[12], "scheduled");
    }

    #[test]
    fn logged_trip_fills_weekday_and_one_decimal_total() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let trip = Trip::logged("t1".to_string(), date, "PDX".to_string(), 84.24);
        assert_eq!(trip.date, "2025-03-07");
        assert_eq!(trip.day_of_week, "Friday");
        assert_eq!(trip.total_time, "84.2");
    }

    #[test]
    fn collections_display_as_tab_names() {
        let names: Vec<String> = Collection::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["trips", "time_segments", "flights"]);
    }
}
