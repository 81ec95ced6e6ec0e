//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::flight::FlightArgs;
use crate::commands::miles::MilesArgs;
use crate::commands::trip::{LogArgs, StartArgs};

/// Door-to-gate trip logger.
///
/// Times each leg of the trip to the airport, records flight bookings in a
/// spreadsheet and summarizes how long trips take and what flights cost.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Time a trip segment by segment, or log one by hand.
    #[command(subcommand)]
    Trip(TripAction),

    /// Record and review flight bookings.
    #[command(subcommand)]
    Flight(FlightAction),

    /// Evaluate the cents-per-mile value of a redemption.
    Miles(MilesArgs),

    /// Trip time and flight price statistics.
    Analytics {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Headline numbers.
    Dashboard,

    /// Inspect the configuration.
    #[command(subcommand)]
    Settings(SettingsAction),
}

#[derive(Debug, Subcommand)]
pub enum TripAction {
    /// Start a trip and begin timing the first segment.
    Start(StartArgs),
    /// Finish the current segment and start the next one.
    Next,
    /// Show the trip in progress.
    Status,
    /// Show a live stopwatch; Enter advances to the next segment.
    Live,
    /// Save the completed trip to the store.
    Finish,
    /// Throw away the trip in progress.
    Discard,
    /// Log a trip from manually entered durations.
    Log(LogArgs),
    /// List logged trips.
    List {
        /// Bypass the cache.
        #[arg(long)]
        refresh: bool,
    },
    /// Delete a logged trip.
    Delete {
        /// Trip id.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FlightAction {
    /// Record a flight booking.
    Add(FlightArgs),
    /// List recorded flights.
    List {
        /// Bypass the cache.
        #[arg(long)]
        refresh: bool,
    },
    /// Delete a recorded flight.
    Delete {
        /// Flight id.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the effective configuration.
    Show,
    /// Check that the store answers.
    Test,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_manual_trip_log() {
        let cli = Cli::try_parse_from([
            "tl",
            "trip",
            "log",
            "--direction",
            "pdx",
            "--segment",
            "house_to_airport=35",
            "--segment",
            "security_to_gate=1h 5m",
        ])
        .unwrap();
        let Some(Commands::Trip(TripAction::Log(args))) = cli.command else {
            panic!("expected trip log");
        };
        assert_eq!(args.direction, "pdx");
        assert_eq!(args.segments.len(), 2);
    }

    #[test]
    fn miles_fees_are_optional() {
        let cli = Cli::try_parse_from(["tl", "miles", "300", "15000"]).unwrap();
        let Some(Commands::Miles(args)) = cli.command else {
            panic!("expected miles");
        };
        assert_eq!(args.fees, None);
    }
}
