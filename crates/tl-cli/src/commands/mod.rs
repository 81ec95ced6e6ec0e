//! CLI subcommand implementations.

pub mod analytics;
pub mod dashboard;
pub mod flight;
pub mod live;
pub mod miles;
pub mod settings;
pub mod trip;
pub mod util;
