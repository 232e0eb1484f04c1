//! The binary entry point: a headless star-map clock for one location.

use std::time::{Duration, Instant};

use clap::Parser;
use verse_app::{AppError, PlatformDirs, Session, TickLoop};
use verse_astro::{ClockSource, LocationCard, demo};
use verse_config::{CliArgs, Config};

/// Seconds between location card reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Seconds between config reload checks.
const RELOAD_INTERVAL: Duration = Duration::from_secs(5);

fn main() {
    if let Err(e) = run() {
        eprintln!("verse: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => PlatformDirs::resolve_with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);
    config.validate()?;

    verse_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!(config = %dirs.config_dir.display(), "verse starting");

    let catalogue = demo::stanton()?;
    let clock = ClockSource::new(config.clock.acceleration_factor);
    let mut session = Session::new(catalogue, clock, &config)?;
    let mut tick_loop = TickLoop::new(config.clock.tick_rate_hz);

    let started = Instant::now();
    let mut last_report: Option<Instant> = None;
    let mut last_reload = Instant::now();

    loop {
        let mut ticks = 0u32;
        let mut frame_index = 0u64;
        tick_loop.tick(|_, _| ticks += 1, |frame, _| frame_index = frame);

        if ticks > 0 {
            session.update();
        }
        session.frame(frame_index);

        if last_report.is_none_or(|at| at.elapsed() >= REPORT_INTERVAL) {
            match session.card() {
                Some(card) => print_card(&card),
                None => tracing::warn!("active location has no direction to its star"),
            }
            last_report = Some(Instant::now());
        }

        if last_reload.elapsed() >= RELOAD_INTERVAL {
            last_reload = Instant::now();
            if let Some(reloaded) = reload_config(&config, &dirs, &args, &mut session) {
                if reloaded.clock.tick_rate_hz != config.clock.tick_rate_hz {
                    tick_loop = TickLoop::new(reloaded.clock.tick_rate_hz);
                }
                config = reloaded;
            }
        }

        let run_seconds = config.app.run_seconds;
        if run_seconds > 0 && started.elapsed() >= Duration::from_secs(run_seconds) {
            tracing::info!(
                ticks = tick_loop.tick_count(),
                frames = tick_loop.frame_count(),
                "run time elapsed, stopping"
            );
            return Ok(());
        }

        std::thread::sleep(tick_loop.until_next_tick());
    }
}

/// Pick up edits to `config.ron`. Invalid edits are logged and ignored.
fn reload_config(
    current: &Config,
    dirs: &PlatformDirs,
    args: &CliArgs,
    session: &mut Session,
) -> Option<Config> {
    let mut reloaded = match current.reload(&dirs.config_dir) {
        Ok(Some(reloaded)) => reloaded,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("config reload failed: {e}");
            return None;
        }
    };
    reloaded.apply_cli_overrides(args);
    if reloaded == *current {
        return None;
    }
    if let Err(e) = reloaded.validate() {
        tracing::warn!("ignoring reloaded config: {e}");
        return None;
    }
    if let Err(e) = session.apply_config(&reloaded) {
        tracing::warn!("ignoring reloaded config: {e}");
        return None;
    }
    tracing::info!("config change applied");
    Some(reloaded)
}

fn print_card(card: &LocationCard) {
    println!(
        "{} ({}) | local {} | rise {} | noon {} | set {} | star alt {:.1} az {:.1} | {}",
        card.name,
        card.body,
        card.local_time,
        card.next_rise_countdown,
        card.next_noon_countdown,
        card.next_set_countdown,
        card.star_altitude,
        card.star_azimuth,
        card.universe_time.as_deref().unwrap_or("--"),
    );
}
