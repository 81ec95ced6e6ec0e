//! Miles calculator.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use tl_core::miles::parse_or_zero;
use tl_core::{RedemptionRating, redemption_value};

#[derive(Debug, Args)]
pub struct MilesArgs {
    /// Cash price of the same flight.
    pub cash: String,

    /// Miles required.
    pub miles: String,

    /// Taxes and fees paid with the miles.
    pub fees: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &MilesArgs) -> Result<()> {
    let cash = parse_or_zero(&args.cash);
    let miles = parse_or_zero(&args.miles);
    let fees = args.fees.as_deref().map_or(0.0, parse_or_zero);

    let Some(value) = redemption_value(cash, miles, fees) else {
        writeln!(writer, "Enter a non-zero miles amount to calculate your miles value.")?;
        return Ok(());
    };

    writeln!(writer, "{} Redemption", value.rating)?;
    writeln!(writer, "{:.2} cents/mile", value.cents_per_mile)?;
    writeln!(writer)?;
    writeln!(writer, "Per 1,000 miles   ${:.2}", value.dollars_per_thousand)?;
    writeln!(writer, "Net cash value    ${:.2}", value.net_cash_value)?;
    writeln!(writer)?;
    for rating in RedemptionRating::ALL {
        let marker = if rating == value.rating { '>' } else { ' ' };
        writeln!(writer, "{marker} {:<10} {rating}", rating.range_label())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn calculate(cash: &str, miles: &str, fees: Option<&str>) -> String {
        let args = MilesArgs {
            cash: cash.to_string(),
            miles: miles.to_string(),
            fees: fees.map(str::to_string),
        };
        let mut out = Vec::new();
        run(&mut out, &args).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn good_redemption() {
        assert_snapshot!(calculate("250", "15000", Some("5.60")), @r"
        Good Redemption
        1.63 cents/mile

        Per 1,000 miles   $16.29
        Net cash value    $244.40

          2.0+       Excellent
        > 1.5-2.0    Good
          1.0-1.5    Fair
          Under 1.0  Poor
        ");
    }

    #[test]
    fn zero_miles_has_no_result() {
        assert_snapshot!(
            calculate("250", "0", None),
            @"Enter a non-zero miles amount to calculate your miles value."
        );
    }

    #[test]
    fn unparseable_fees_count_as_zero() {
        let text = calculate("300", "15000", Some("n/a"));
        assert!(text.starts_with("Excellent Redemption\n2.00 cents/mile"));
    }
}
