//! Core domain logic for the trip logger.
//!
//! This crate contains the fundamental types and logic for:
//! - Timing: a drift-free stopwatch for door-to-gate segments
//! - Statistics: averages, extremes and percentiles over logged rows
//! - Miles: cents-per-mile value of loyalty redemptions
//! - Records: typed rows of the `trips`, `time_segments` and `flights` collections

pub mod miles;
pub mod records;
pub mod stats;
pub mod timer;
mod types;
pub mod vocab;

pub use miles::{RedemptionRating, RedemptionValue, redemption_value};
pub use records::{Collection, Flight, Record, TimeSegment, Trip};
pub use stats::{NumericStats, SegmentStats, numeric_stats};
pub use timer::{
    Clock, DurationRecord, ManualClock, Stopwatch, SystemClock, TimerState, format_time,
};
pub use types::{RowId, ValidationError};
pub use vocab::{Direction, SegmentType};
