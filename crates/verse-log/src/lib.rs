//! Structured logging for verse.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The level comes from `RUST_LOG` when set, otherwise
//! from the config's `debug.log_level`.

use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use verse_config::Config;

/// Filter used when neither `RUST_LOG` nor the config name a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file inside the log directory.
pub const LOG_FILE_NAME: &str = "verse.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file
/// * `debug_build` - file logging only happens in debug builds
/// * `config` - supplies the level and the `log_to_file` switch
///
/// Returns the path of the log file when one was opened.
///
/// # Examples
///
/// ```no_run
/// use verse_config::Config;
/// use verse_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(path) = file_log_path(log_dir, debug_build, config)
        && let Some(parent) = path.parent()
        && std::fs::create_dir_all(parent).is_ok()
        && let Ok(log_file) = std::fs::File::create(&path)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::info!(file = %path.display(), "logging initialised");
        return Some(path);
    }

    subscriber.init();
    tracing::info!("logging initialised");
    None
}

/// The filter directive taken from the config, or [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Where the JSON log would go, if file logging is enabled.
pub fn file_log_path(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let enabled = config.is_none_or(|c| c.debug.log_to_file);
    if !debug_build || !enabled {
        return None;
    }
    log_dir.map(|dir| dir.join(LOG_FILE_NAME))
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_config_level_wins_over_default() {
        let mut config = Config::default();
        config.debug.log_level = "debug,verse_atlas=trace".to_string();
        assert_eq!(filter_directive(Some(&config)), "debug,verse_atlas=trace");
    }

    #[test]
    fn test_blank_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_subsystem_filter() {
        let filter = EnvFilter::new("info,verse_astro=debug");
        assert!(format!("{filter}").contains("verse_astro=debug"));
    }

    #[test]
    fn test_env_filter_parsing() {
        for filter_str in ["info", "debug,verse_atlas=trace", "warn,verse_app=debug", "error"] {
            assert!(
                EnvFilter::try_from(filter_str).is_ok(),
                "Failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_file_logging_only_in_debug_builds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        assert_eq!(
            file_log_path(Some(dir), true, None),
            Some(dir.join(LOG_FILE_NAME))
        );
        assert_eq!(file_log_path(Some(dir), false, None), None);
        assert_eq!(file_log_path(None, true, None), None);
    }

    #[test]
    fn test_file_logging_switch_in_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.debug.log_to_file = false;
        assert_eq!(file_log_path(Some(temp_dir.path()), true, Some(&config)), None);
    }
}
