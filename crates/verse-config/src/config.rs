//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Universe clock settings.
    pub clock: ClockConfig,
    /// Atlas label declutter settings.
    pub atlas: AtlasConfig,
    /// Application shell settings.
    pub app: AppConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Universe clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// Universe seconds per real second.
    pub acceleration_factor: f64,
    /// Astronomical state updates per second.
    pub tick_rate_hz: f64,
}

/// Label declutter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Run the declutter pass on every n-th render frame.
    pub declutter_every_n_frames: u64,
    /// Camera distance at which the map switches to galaxy scale.
    pub galaxy_scale_distance: f64,
    /// Star, planet, jump point and Lagrange point labels show below this.
    pub body_window: f64,
    pub moon_window: f64,
    pub location_window: f64,
    /// Hide the weaker of two overlapping labels.
    pub resolve_overlaps: bool,
}

/// Application shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Location whose card is reported.
    pub active_location: String,
    /// Stop after this many seconds (0 = run until interrupted).
    pub run_seconds: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write JSON logs to the log directory in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            acceleration_factor: 6.0,
            tick_rate_hz: 24.0,
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            declutter_every_n_frames: 5,
            galaxy_scale_distance: 25.0,
            body_window: 25.0,
            moon_window: 1.0,
            location_window: 0.5,
            resolve_overlaps: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active_location: "Orison".to_string(),
            run_seconds: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

// --- Validation ---

impl Config {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{value} is not a positive number"),
                })
            }
        };
        positive("clock.acceleration_factor", self.clock.acceleration_factor)?;
        positive("clock.tick_rate_hz", self.clock.tick_rate_hz)?;
        if self.atlas.declutter_every_n_frames == 0 {
            return Err(ConfigError::InvalidValue {
                field: "atlas.declutter_every_n_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        positive("atlas.galaxy_scale_distance", self.atlas.galaxy_scale_distance)?;
        positive("atlas.body_window", self.atlas.body_window)?;
        positive("atlas.moon_window", self.atlas.moon_window)?;
        positive("atlas.location_window", self.atlas.location_window)?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
