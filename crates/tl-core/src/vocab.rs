//! Fixed vocabularies: travel directions, journey segments, routes.
//!
//! These enums are the single source of truth for the strings written to the
//! row store. Stored rows keep the raw strings; aggregation groups on them
//! verbatim so rows written by older clients still count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// A primary direction of travel, named by the departure airport.
///
/// Trips may carry other airport codes; only these two form statistics
/// partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "MCI")]
    Mci,
    #[serde(rename = "PDX")]
    Pdx,
}

impl Direction {
    /// Both primary directions, in display order.
    pub const ALL: [Self; 2] = [Self::Mci, Self::Pdx];

    /// The airport code stored in the `direction` column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Mci => "MCI",
            Self::Pdx => "PDX",
        }
    }

    /// Matches a stored direction code exactly.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    /// The route flown when departing from this airport.
    #[must_use]
    pub const fn route(self) -> Route {
        match self {
            Self::Mci => Route::MciToPdx,
            Self::Pdx => Route::PdxToMci,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalizes a user-entered direction code.
///
/// Any non-empty code is accepted (secondary airports are allowed); it is
/// trimmed and upper-cased so that `mci` lands in the MCI partition.
pub fn normalize_direction(input: &str) -> Result<String, ValidationError> {
    let code = input.trim().to_uppercase();
    if code.is_empty() {
        return Err(ValidationError::Empty { field: "direction" });
    }
    Ok(code)
}

/// One leg of a door-to-gate journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    HouseToAirport,
    TerminalToParking,
    ParkingToSecurity,
    SecurityToGate,
    BoardingBuffer,
}

impl SegmentType {
    /// All segments in the order a trip walks through them.
    pub const ALL: [Self; 5] = [
        Self::HouseToAirport,
        Self::TerminalToParking,
        Self::ParkingToSecurity,
        Self::SecurityToGate,
        Self::BoardingBuffer,
    ];

    /// Tag stored in the `segment_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HouseToAirport => "house_to_airport",
            Self::TerminalToParking => "terminal_to_parking",
            Self::ParkingToSecurity => "parking_to_security",
            Self::SecurityToGate => "security_to_gate",
            Self::BoardingBuffer => "boarding_buffer",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HouseToAirport => "House to Airport",
            Self::TerminalToParking => "Terminal to Parking",
            Self::ParkingToSecurity => "Parking to Security",
            Self::SecurityToGate => "Security to Gate",
            Self::BoardingBuffer => "Boarding Buffer",
        }
    }

    /// The segment after this one, or `None` for the last leg.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let index = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|segment| segment.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSegmentType {
                value: s.to_string(),
            })
    }
}

/// Display label for a raw `segment_type` tag.
///
/// Unknown tags fall back to the tag with underscores turned into spaces.
pub fn segment_label(tag: &str) -> String {
    tag.parse::<SegmentType>()
        .map_or_else(|_| tag.replace('_', " "), |s| s.label().to_string())
}

/// A flown route between the two home airports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    MciToPdx,
    PdxToMci,
}

impl Route {
    /// Value stored in the flight `route` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MciToPdx => "MCI to PDX",
            Self::PdxToMci => "PDX to MCI",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Airlines offered by the flight form. Free text is accepted as well.
pub const AIRLINES: [&str; 7] = [
    "Alaska",
    "Southwest",
    "Delta",
    "United",
    "American",
    "Frontier",
    "Spirit",
];

/// The listed spelling of a known airline, matched case-insensitively;
/// other names are kept as typed.
pub fn canonical_airline(input: &str) -> String {
    let name = input.trim();
    AIRLINES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .map_or_else(|| name.to_string(), |known| (*known).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_type_roundtrip_all_variants() {
        for segment in SegmentType::ALL {
            let parsed: SegmentType = segment.to_string().parse().expect("should parse");
            assert_eq!(parsed, segment);
        }
    }

    #[test]
    fn segment_type_serializes_as_stored_tag() {
        for segment in SegmentType::ALL {
            let json = serde_json::to_string(&segment).unwrap();
            assert_eq!(json, format!("\"{}\"", segment.as_str()));
        }
    }

    #[test]
    fn unknown_segment_type_errors() {
        let err = "taxi_line".parse::<SegmentType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown segment type: taxi_line");
    }

    #[test]
    fn segment_next_walks_journey_order() {
        assert_eq!(
            SegmentType::HouseToAirport.next(),
            Some(SegmentType::TerminalToParking)
        );
        assert_eq!(SegmentType::BoardingBuffer.next(), None);
    }

    #[test]
    fn labels_name_the_tagged_leg() {
        let labels: Vec<&str> = SegmentType::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            [
                "House to Airport",
                "Terminal to Parking",
                "Parking to Security",
                "Security to Gate",
                "Boarding Buffer",
            ]
        );
    }

    #[test]
    fn segment_label_falls_back_for_unknown_tags() {
        assert_eq!(segment_label("security_to_gate"), "Security to Gate");
        assert_eq!(segment_label("rental_car_return"), "rental car return");
    }

    #[test]
    fn direction_codes_match_exactly() {
        assert_eq!(Direction::from_code("MCI"), Some(Direction::Mci));
        assert_eq!(Direction::from_code("PDX"), Some(Direction::Pdx));
        assert_eq!(Direction::from_code("mci"), None);
        assert_eq!(Direction::from_code("SEA"), None);
    }

    #[test]
    fn normalize_direction_uppercases_and_rejects_empty() {
        assert_eq!(normalize_direction(" pdx ").unwrap(), "PDX");
        assert_eq!(normalize_direction("sea").unwrap(), "SEA");
        assert!(normalize_direction("  ").is_err());
    }

    #[test]
    fn known_airlines_take_the_listed_spelling() {
        assert_eq!(canonical_airline(" alaska "), "Alaska");
        assert_eq!(canonical_airline("SOUTHWEST"), "Southwest");
        assert_eq!(canonical_airline("Sun Country"), "Sun Country");
    }

    #[test]
    fn direction_route_departs_from_its_airport() {
        assert_eq!(Direction::Mci.route().as_str(), "MCI to PDX");
        assert_eq!(Direction::Pdx.route().as_str(), "PDX to MCI");
    }
}
