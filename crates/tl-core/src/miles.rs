//! Value of loyalty-mile redemptions.

use std::fmt;

use serde::Serialize;

use crate::stats::parse_number;

/// Quality band of a cents-per-mile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RedemptionRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RedemptionRating {
    /// All bands, best first.
    pub const ALL: [Self; 4] = [Self::Excellent, Self::Good, Self::Fair, Self::Poor];

    /// Classifies a cents-per-mile value. Each band includes its lower bound.
    pub fn classify(cents_per_mile: f64) -> Self {
        if cents_per_mile >= 2.0 {
            Self::Excellent
        } else if cents_per_mile >= 1.5 {
            Self::Good
        } else if cents_per_mile >= 1.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// The band's range as shown in the thresholds legend.
    #[must_use]
    pub const fn range_label(self) -> &'static str {
        match self {
            Self::Excellent => "2.0+",
            Self::Good => "1.5-2.0",
            Self::Fair => "1.0-1.5",
            Self::Poor => "Under 1.0",
        }
    }
}

impl fmt::Display for RedemptionRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(cash - fees) / miles * 100`, or `None` when `miles` is zero or the
/// result is not finite.
pub fn cents_per_mile(cash: f64, miles: f64, fees: f64) -> Option<f64> {
    if miles == 0.0 {
        return None;
    }
    Some((cash - fees) / miles * 100.0).filter(|v| v.is_finite())
}

/// Breakdown shown by the miles calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RedemptionValue {
    pub cents_per_mile: f64,
    pub dollars_per_thousand: f64,
    pub net_cash_value: f64,
    pub rating: RedemptionRating,
}

/// Evaluates a redemption; `None` when no miles are involved.
pub fn redemption_value(cash: f64, miles: f64, fees: f64) -> Option<RedemptionValue> {
    let cents = cents_per_mile(cash, miles, fees)?;
    let net_cash_value = cash - fees;
    Some(RedemptionValue {
        cents_per_mile: cents,
        dollars_per_thousand: net_cash_value / (miles / 1000.0),
        net_cash_value,
        rating: RedemptionRating::classify(cents),
    })
}

/// Calculator input: blank or unparseable text counts as zero.
pub fn parse_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

/// Splits a booking amount evenly across tickets. Zero tickets count as one.
pub fn per_ticket(amount: f64, tickets: u32) -> f64 {
    amount / f64::from(tickets.max(1))
}
