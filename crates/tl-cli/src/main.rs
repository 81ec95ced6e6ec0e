use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tl_cli::active::ActiveTripFile;
use tl_cli::commands::util::{block_on, open_repository};
use tl_cli::commands::{analytics, dashboard, flight, live, miles, settings, trip};
use tl_cli::{Cli, Commands, Config, FlightAction, SettingsAction, TripAction};
use tl_core::SystemClock;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut out = std::io::stdout().lock();
    match cli.command {
        Some(Commands::Trip(action)) => run_trip(&mut out, action, &config)?,
        Some(Commands::Flight(action)) => {
            let repo = open_repository(&config)?;
            match action {
                FlightAction::Add(args) => block_on(flight::add(&mut out, &repo, &args))??,
                FlightAction::List { refresh } => {
                    block_on(flight::list(&mut out, &repo, refresh))??;
                }
                FlightAction::Delete { id } => block_on(flight::delete(&mut out, &repo, &id))??,
            }
        }
        Some(Commands::Miles(args)) => miles::run(&mut out, &args)?,
        Some(Commands::Analytics { json }) => {
            let repo = open_repository(&config)?;
            block_on(analytics::run(&mut out, &repo, json))??;
        }
        Some(Commands::Dashboard) => {
            let repo = open_repository(&config)?;
            block_on(dashboard::run(&mut out, &repo))??;
        }
        Some(Commands::Settings(SettingsAction::Show)) => settings::show(&mut out, &config)?,
        Some(Commands::Settings(SettingsAction::Test)) => {
            let repo = open_repository(&config)?;
            block_on(settings::test_connection(&mut out, &repo))??;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

fn run_trip<W: Write>(out: &mut W, action: TripAction, config: &Config) -> Result<()> {
    let file = ActiveTripFile::new(config.active_trip_path());
    match action {
        TripAction::Start(args) => trip::start(out, &file, SystemClock, &args)?,
        TripAction::Next => trip::next(out, &file, SystemClock)?,
        TripAction::Status => trip::status(out, &file, SystemClock)?,
        TripAction::Live => block_on(live::run(out, &file, SystemClock))??,
        TripAction::Discard => trip::discard(out, &file)?,
        TripAction::Finish => {
            let repo = open_repository(config)?;
            block_on(trip::finish(out, &file, &repo, today()))??;
        }
        TripAction::Log(args) => {
            let repo = open_repository(config)?;
            block_on(trip::log(out, &repo, &args, today()))??;
        }
        TripAction::List { refresh } => {
            let repo = open_repository(config)?;
            block_on(trip::list(out, &repo, refresh))??;
        }
        TripAction::Delete { id } => {
            let repo = open_repository(config)?;
            block_on(trip::delete(out, &repo, &id))??;
        }
    }
    Ok(())
}
