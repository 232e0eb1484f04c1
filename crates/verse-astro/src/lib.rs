//! Astronomical state engine: universe clock, body rotation, solar geometry and event prediction over an immutable catalogue.

pub mod angle;
pub mod catalogue;
pub mod clock;
pub mod demo;
pub mod ephemeris;
pub mod events;
pub mod format;
pub mod orbit;
pub mod rotation;
pub mod solar;

pub use catalogue::{
    BodyId, BodyKind, BodyRecord, Catalogue, CatalogueBuilder, CatalogueError, CelestialBody,
    Location, LocationId, LocationRecord, Ring, SolarSystem, SystemId, SystemRecord, ThemeColor,
    Wormhole, WormholeRecord,
};
pub use clock::{ClockSource, FixedWallClock, SimTime, SystemWallClock, WallClock};
pub use ephemeris::{BodyState, Ephemeris, LocationCard, LocationState};
pub use events::EventForecast;
pub use orbit::{CircularRevolution, EpochSnapshot, OrbitalModel};
pub use rotation::RotationState;
pub use solar::{RiseSet, SolarGeometry, SurfacePoint};
