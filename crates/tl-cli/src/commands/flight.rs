//! Flight booking commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use tl_core::miles::per_ticket;
use tl_core::vocab::canonical_airline;
use tl_core::{Clock, Direction, Flight, RowId};
use tl_store::{Repository, RowStore};

use crate::commands::util::parse_time_of_day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl TripType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::OneWay => "one-way",
            Self::RoundTrip => "round-trip",
        }
    }
}

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("payment").required(true).args(["cash", "miles"])))]
pub struct FlightArgs {
    /// Airline: Alaska, Southwest, Delta, United, American, Frontier or
    /// Spirit. Other names are recorded as typed.
    #[arg(long)]
    pub airline: String,

    /// Departure airport; the route is flown to the other one.
    #[arg(long, default_value = "MCI")]
    pub from: String,

    /// Departure date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,

    /// Departure time (HH:MM).
    #[arg(long, value_parser = parse_time_of_day)]
    pub time: Option<String>,

    #[arg(long)]
    pub flight_number: Option<String>,

    /// Total cash paid for the booking.
    #[arg(long)]
    pub cash: Option<f64>,

    /// Total miles redeemed for the booking.
    #[arg(long)]
    pub miles: Option<f64>,

    /// Taxes and fees paid on top.
    #[arg(long)]
    pub fees: Option<f64>,

    /// Number of tickets the booking covers.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub tickets: u32,

    /// Days between booking and departure.
    #[arg(long)]
    pub lead_days: Option<u32>,

    #[arg(long, value_enum, default_value_t = TripType::OneWay)]
    pub trip_type: TripType,

    /// What the same flight would have cost in miles (cash bookings).
    #[arg(long, conflicts_with = "miles")]
    pub miles_equivalent: Option<String>,

    /// What the same flight would have cost in cash (miles bookings).
    #[arg(long, conflicts_with = "cash")]
    pub cash_equivalent: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl FlightArgs {
    /// The flight row described by these arguments.
    pub fn to_flight(&self) -> Result<Flight> {
        let direction = Direction::from_code(&self.from.trim().to_uppercase())
            .with_context(|| format!("unknown departure airport: {}. Use MCI or PDX", self.from))?;

        let date = self.date.format("%Y-%m-%d");
        let departure_time = match &self.time {
            Some(time) => format!("{date}T{time}"),
            None => date.to_string(),
        };

        Ok(Flight {
            airline: canonical_airline(&self.airline),
            flight_number: self.flight_number.clone().unwrap_or_default(),
            route: direction.route().to_string(),
            departure_time,
            cash_price: self.cash.map(|v| v.to_string()).unwrap_or_default(),
            miles_used: self.miles.map(|v| v.to_string()).unwrap_or_default(),
            fees: self.fees.map(|v| v.to_string()).unwrap_or_default(),
            booking_lead_days: self.lead_days.map(|v| v.to_string()).unwrap_or_default(),
            notes: self.compose_notes(),
            ..Flight::default()
        })
    }

    /// Notes column: trip type, ticket count, per-ticket amount, the
    /// equivalent in the other currency and free text, joined by ` | `.
    fn compose_notes(&self) -> String {
        let mut parts = vec![self.trip_type.as_str().to_string()];
        if self.tickets > 1 {
            parts.push(format!("{} tickets", self.tickets));
            if let Some(cash) = self.cash {
                parts.push(format!("${:.2}/ticket", per_ticket(cash, self.tickets)));
            } else if let Some(miles) = self.miles {
                parts.push(format!("{:.0} miles/ticket", per_ticket(miles, self.tickets).round()));
            }
        }
        if self.cash.is_some() {
            if let Some(miles) = non_empty(self.miles_equivalent.as_deref()) {
                parts.push(format!("Miles equivalent: {miles}"));
            }
        } else if let Some(cash) = non_empty(self.cash_equivalent.as_deref()) {
            parts.push(format!("Cash equivalent: ${cash}"));
        }
        if let Some(notes) = non_empty(self.notes.as_deref()) {
            parts.push(notes.to_string());
        }
        parts.join(" | ")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn add<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
    args: &FlightArgs,
) -> Result<()> {
    let flight = args.to_flight()?;
    let saved = repo
        .add_flight(flight)
        .await
        .context("failed to save flight")?;
    tracing::info!(flight_id = %saved.id, "flight saved");

    let paid = if saved.cash_price.is_empty() {
        format!("{} miles", saved.miles_used)
    } else {
        format!("${}", saved.cash_price)
    };
    writeln!(
        writer,
        "Flight saved: {}, {}, {} ({paid}).",
        saved.airline, saved.route, saved.departure_time
    )?;
    Ok(())
}

pub async fn list<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
    refresh: bool,
) -> Result<()> {
    let flights = repo
        .list_flights(refresh)
        .await
        .context("failed to load flights")?;
    if flights.is_empty() {
        writeln!(writer, "No flights recorded.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<17} {:<10} {:<11} {:>8} {:>8} {:>7}  ID",
        "DEPARTURE", "AIRLINE", "ROUTE", "CASH", "MILES", "FEES"
    )?;
    for flight in &flights {
        writeln!(
            writer,
            "{:<17} {:<10} {:<11} {:>8} {:>8} {:>7}  {}",
            flight.departure_time,
            flight.airline,
            flight.route,
            flight.cash_price,
            flight.miles_used,
            flight.fees,
            flight.id
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
    repo.delete_flight(&id)
        .await
        .with_context(|| format!("failed to delete flight {id}"))?;
    writeln!(writer, "Deleted flight {id}.")?;
    Ok(())
}
