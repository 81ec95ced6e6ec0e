//! Trip logger CLI library.
//!
//! This crate provides the CLI interface for the trip logger.

pub mod active;
mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, FlightAction, SettingsAction, TripAction};
pub use config::Config;
