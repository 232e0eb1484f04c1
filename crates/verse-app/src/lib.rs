//! verse application shell: platform directories, the fixed-rate tick loop and the running session.

pub mod platform;
pub mod session;
pub mod tick_loop;

use thiserror::Error;
use verse_astro::CatalogueError;
use verse_config::ConfigError;

pub use platform::{PlatformDirs, PlatformError};
pub use session::Session;
pub use tick_loop::TickLoop;

/// Anything that stops the application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("catalogue rejected: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("unknown location: {0}")]
    UnknownLocation(String),
}
