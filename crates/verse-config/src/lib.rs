//! Configuration for the verse star-map engine.
//!
//! Settings persist to disk as a RON file. CLI flags parsed with clap override
//! the loaded values, and a reload check reports edits made while running.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AppConfig, AtlasConfig, ClockConfig, Config, DebugConfig};
pub use error::ConfigError;
