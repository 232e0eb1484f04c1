//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// verse command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "verse", about = "Real-time star-map clock and atlas declutter")]
pub struct CliArgs {
    /// Location to report (e.g. "Orison", "New Babbage").
    #[arg(long)]
    pub location: Option<String>,

    /// Universe seconds per real second.
    #[arg(long)]
    pub acceleration: Option<f64>,

    /// Ticks per second.
    #[arg(long)]
    pub tick_rate: Option<f64>,

    /// Stop after this many seconds (0 = run until interrupted).
    #[arg(long)]
    pub run_seconds: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Base directory replacing the OS config dir; `config.ron` is kept in
    /// `<DIR>/verse/config` and logs in `<DIR>/verse/logs`.
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref location) = args.location {
            self.app.active_location = location.clone();
        }
        if let Some(factor) = args.acceleration {
            self.clock.acceleration_factor = factor;
        }
        if let Some(rate) = args.tick_rate {
            self.clock.tick_rate_hz = rate;
        }
        if let Some(seconds) = args.run_seconds {
            self.app.run_seconds = seconds;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
