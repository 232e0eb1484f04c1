//! Immutable entity store: solar systems, celestial bodies, surface locations
//! and wormholes, built once from ingested records.
//!
//! Records reference each other by name. [`CatalogueBuilder::build`] resolves
//! those names into typed ids, validates the hierarchy and returns a
//! [`Catalogue`] that is never mutated afterwards. Every resolver takes the
//! catalogue by reference.

use std::collections::HashMap;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Index of a [`CelestialBody`] inside its [`Catalogue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Index of a [`Location`] inside its [`Catalogue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u32);

/// Index of a [`SolarSystem`] inside its [`Catalogue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u32);

// ---------------------------------------------------------------------------
// BodyKind
// ---------------------------------------------------------------------------

/// Closed set of body classifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    LagrangePoint,
    JumpPoint,
}

impl BodyKind {
    /// Whether bodies of this kind spin. Stars, Lagrange points and jump
    /// points always carry a rotation rate of zero.
    pub fn rotates(self) -> bool {
        match self {
            BodyKind::Planet | BodyKind::Moon => true,
            BodyKind::Star | BodyKind::LagrangePoint | BodyKind::JumpPoint => false,
        }
    }

    /// Display name as it appears in the catalogue tables.
    pub fn label(self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::Moon => "Moon",
            BodyKind::LagrangePoint => "Lagrange Point",
            BodyKind::JumpPoint => "Jump Point",
        }
    }

    /// Parse a catalogue table type string.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Star" => Some(BodyKind::Star),
            "Planet" => Some(BodyKind::Planet),
            "Moon" => Some(BodyKind::Moon),
            "Lagrange Point" => Some(BodyKind::LagrangePoint),
            "Jump Point" => Some(BodyKind::JumpPoint),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Records (ingestion input)
// ---------------------------------------------------------------------------

/// 8-bit RGB theme colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ThemeColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The darker variant used for panel backgrounds (20% brightness).
    pub fn dimmed(self) -> Self {
        let dim = |c: u8| (c as f32 * 0.2) as u8;
        Self::new(dim(self.r), dim(self.g), dim(self.b))
    }
}

/// Planetary ring extents in km.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub radius_inner: f64,
    pub radius_outer: f64,
}

/// A solar system as delivered by the ingestion layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub name: String,
    /// Galactic map coordinates.
    pub coordinates: DVec3,
    pub affiliation: String,
}

/// A celestial body as delivered by the ingestion layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub name: String,
    pub kind: BodyKind,
    pub parent_body: Option<String>,
    pub parent_star: Option<String>,
    /// Epoch position in km, system frame.
    pub coordinates: DVec3,
    /// Epoch orientation.
    pub orientation: DQuat,
    /// Body radius in km.
    pub radius: f64,
    /// Sidereal day length in hours; 0 for bodies that do not rotate.
    pub rotation_rate: f64,
    /// Rotation phase correction at the epoch, degrees.
    pub rotation_correction: f64,
    /// Orbit angle at the epoch, degrees from the system +X axis.
    pub orbit_angle: f64,
    /// Orbit radius in km.
    pub orbit_radius: f64,
    #[serde(default)]
    pub theme_color: Option<ThemeColor>,
    #[serde(default)]
    pub theme_image: Option<String>,
    #[serde(default)]
    pub ring: Option<Ring>,
}

/// A surface location as delivered by the ingestion layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    /// Free-form type, e.g. "Landing Zone".
    pub kind: String,
    pub parent_body: String,
    /// Light source; falls back to the parent body's star when absent.
    #[serde(default)]
    pub parent_star: Option<String>,
    /// Body-fixed offset from the parent body centre, km.
    pub coordinates: DVec3,
    #[serde(default)]
    pub theme_image: Option<String>,
}

/// A wormhole link between two systems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WormholeRecord {
    pub size: String,
    pub system1: String,
    pub system2: String,
    #[serde(default)]
    pub position1: Option<DVec3>,
    #[serde(default)]
    pub position2: Option<DVec3>,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    pub name: String,
    pub coordinates: DVec3,
    pub affiliation: String,
}

/// A resolved celestial body. Immutable once the catalogue is built.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub kind: BodyKind,
    pub parent_body: Option<BodyId>,
    pub parent_star: Option<BodyId>,
    pub position: DVec3,
    pub orientation: DQuat,
    pub radius: f64,
    pub rotation_rate: f64,
    pub rotation_correction: f64,
    pub orbit_angle: f64,
    pub orbit_radius: f64,
    pub theme_color: ThemeColor,
    pub theme_image: Option<String>,
    pub ring: Option<Ring>,
}

impl CelestialBody {
    /// Whether the meridian advances with time.
    pub fn is_rotating(&self) -> bool {
        self.kind.rotates() && self.rotation_rate > 0.0
    }

    /// Rotations completed per day; 0 for non-rotating bodies.
    pub fn cycles_per_day(&self) -> f64 {
        if self.is_rotating() {
            24.0 / self.rotation_rate
        } else {
            0.0
        }
    }

    /// Rotation axis in the system frame.
    pub fn polar_axis(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }
}

/// A resolved surface location.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub name: String,
    pub kind: String,
    pub parent_body: BodyId,
    /// The star lighting this location.
    pub star: BodyId,
    pub offset: DVec3,
    pub theme_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wormhole {
    pub size: String,
    pub system1: SystemId,
    pub system2: SystemId,
    pub position1: Option<DVec3>,
    pub position2: Option<DVec3>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a set of records cannot form a catalogue.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogueError {
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// Parents must be added before their children.
    #[error("{entity} references unknown body {parent}")]
    UnknownBody { entity: String, parent: String },

    #[error("{entity} references unknown system {system}")]
    UnknownSystem { entity: String, system: String },

    #[error("{entity} names {star} as its star, but it is a {kind:?}")]
    NotAStar {
        entity: String,
        star: String,
        kind: BodyKind,
    },

    #[error("{name} is nested deeper than moon -> planet -> star")]
    HierarchyTooDeep { name: String },

    #[error("{name} has invalid radius {radius}")]
    InvalidRadius { name: String, radius: f64 },

    #[error("{name} has invalid rotation rate {rate}")]
    InvalidRotationRate { name: String, rate: f64 },

    #[error("{name} is a {kind:?} and cannot rotate (rate {rate})")]
    RotatingNonRotator {
        name: String,
        kind: BodyKind,
        rate: f64,
    },

    #[error("location {location} sits on {body}, which has no radius")]
    ZeroRadiusParent { location: String, body: String },

    #[error("location {location} has no star to be lit by")]
    MissingStar { location: String },

    #[error("location {location} sits at the centre of its body")]
    DegenerateOffset { location: String },

    /// The parent body is the light source, or shares its epoch position.
    #[error("location {location} sits on {star}, the star that lights it")]
    SiteOnStar { location: String, star: String },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects ingested records and validates them into a [`Catalogue`].
#[derive(Debug, Default)]
pub struct CatalogueBuilder {
    systems: Vec<SystemRecord>,
    bodies: Vec<BodyRecord>,
    locations: Vec<LocationRecord>,
    wormholes: Vec<WormholeRecord>,
}

/// Maximum number of parent links (moon -> planet -> star).
const MAX_DEPTH: usize = 2;

impl CatalogueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(mut self, record: SystemRecord) -> Self {
        self.systems.push(record);
        self
    }

    pub fn body(mut self, record: BodyRecord) -> Self {
        self.bodies.push(record);
        self
    }

    pub fn location(mut self, record: LocationRecord) -> Self {
        self.locations.push(record);
        self
    }

    pub fn wormhole(mut self, record: WormholeRecord) -> Self {
        self.wormholes.push(record);
        self
    }

    /// Resolve names and validate every record.
    ///
    /// Bodies are resolved in insertion order, so a parent must be added
    /// before its children. This also rules out cycles.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogueError`] encountered.
    pub fn build(self) -> Result<Catalogue, CatalogueError> {
        let mut catalogue = Catalogue::default();

        for record in self.systems {
            if catalogue.system_names.contains_key(&record.name) {
                return Err(CatalogueError::DuplicateName {
                    kind: "system",
                    name: record.name,
                });
            }
            let id = SystemId(catalogue.systems.len() as u32);
            catalogue.system_names.insert(record.name.clone(), id);
            catalogue.systems.push(SolarSystem {
                name: record.name,
                coordinates: record.coordinates,
                affiliation: record.affiliation,
            });
        }

        for record in self.bodies {
            let body = catalogue.resolve_body(record)?;
            let id = BodyId(catalogue.bodies.len() as u32);
            catalogue.body_names.insert(body.name.clone(), id);
            catalogue.bodies.push(body);
        }

        for record in self.locations {
            let location = catalogue.resolve_location(record)?;
            let id = LocationId(catalogue.locations.len() as u32);
            catalogue.location_names.insert(location.name.clone(), id);
            catalogue.locations.push(location);
        }

        for record in self.wormholes {
            let label = format!("wormhole {}-{}", record.system1, record.system2);
            let system1 = catalogue.require_system(&label, &record.system1)?;
            let system2 = catalogue.require_system(&label, &record.system2)?;
            catalogue.wormholes.push(Wormhole {
                size: record.size,
                system1,
                system2,
                position1: record.position1,
                position2: record.position2,
            });
        }

        tracing::info!(
            systems = catalogue.systems.len(),
            bodies = catalogue.bodies.len(),
            locations = catalogue.locations.len(),
            wormholes = catalogue.wormholes.len(),
            "catalogue built"
        );
        Ok(catalogue)
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// The immutable entity store.
///
/// Ids handed out by one catalogue index only that catalogue; passing an id
/// from another catalogue to the indexing accessors panics.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    systems: Vec<SolarSystem>,
    bodies: Vec<CelestialBody>,
    locations: Vec<Location>,
    wormholes: Vec<Wormhole>,
    system_names: HashMap<String, SystemId>,
    body_names: HashMap<String, BodyId>,
    location_names: HashMap<String, LocationId>,
}

impl Catalogue {
    pub fn builder() -> CatalogueBuilder {
        CatalogueBuilder::new()
    }

    pub fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.0 as usize]
    }

    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0 as usize]
    }

    pub fn system(&self, id: SystemId) -> &SolarSystem {
        &self.systems[id.0 as usize]
    }

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.body_names.get(name).copied()
    }

    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.location_names.get(name).copied()
    }

    pub fn system_id(&self, name: &str) -> Option<SystemId> {
        self.system_names.get(name).copied()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyId(i as u32), b))
    }

    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, l)| (LocationId(i as u32), l))
    }

    pub fn systems(&self) -> impl Iterator<Item = (SystemId, &SolarSystem)> {
        self.systems
            .iter()
            .enumerate()
            .map(|(i, s)| (SystemId(i as u32), s))
    }

    pub fn wormholes(&self) -> &[Wormhole] {
        &self.wormholes
    }

    /// The star a body belongs to: itself for stars, otherwise its parent star.
    pub fn star_of(&self, id: BodyId) -> Option<BodyId> {
        match self.body(id).kind {
            BodyKind::Star => Some(id),
            _ => self.body(id).parent_star,
        }
    }

    /// The system a body belongs to. Systems are matched to stars by name.
    pub fn system_of(&self, id: BodyId) -> Option<SystemId> {
        let star = self.star_of(id)?;
        self.system_id(&self.body(star).name)
    }

    /// All bodies whose star is named like `system`.
    pub fn bodies_in_system<'a>(
        &'a self,
        system: &'a str,
    ) -> impl Iterator<Item = (BodyId, &'a CelestialBody)> + 'a {
        self.bodies().filter(move |(id, _)| {
            self.star_of(*id)
                .is_some_and(|star| self.body(star).name == system)
        })
    }

    /// All locations lit by the star named like `system`.
    pub fn locations_in_system<'a>(
        &'a self,
        system: &'a str,
    ) -> impl Iterator<Item = (LocationId, &'a Location)> + 'a {
        self.locations()
            .filter(move |(_, l)| self.body(l.star).name == system)
    }

    /// All locations on the surface of `body`.
    pub fn locations_on(&self, body: BodyId) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations().filter(move |(_, l)| l.parent_body == body)
    }

    pub fn len_bodies(&self) -> usize {
        self.bodies.len()
    }

    pub fn len_locations(&self) -> usize {
        self.locations.len()
    }

    fn require_body(&self, entity: &str, name: &str) -> Result<BodyId, CatalogueError> {
        self.body_id(name).ok_or_else(|| CatalogueError::UnknownBody {
            entity: entity.to_string(),
            parent: name.to_string(),
        })
    }

    fn require_star(&self, entity: &str, name: &str) -> Result<BodyId, CatalogueError> {
        let id = self.require_body(entity, name)?;
        match self.body(id).kind {
            BodyKind::Star => Ok(id),
            kind => Err(CatalogueError::NotAStar {
                entity: entity.to_string(),
                star: name.to_string(),
                kind,
            }),
        }
    }

    fn require_system(&self, entity: &str, name: &str) -> Result<SystemId, CatalogueError> {
        self.system_id(name)
            .ok_or_else(|| CatalogueError::UnknownSystem {
                entity: entity.to_string(),
                system: name.to_string(),
            })
    }

    fn depth(&self, mut id: BodyId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.body(id).parent_body {
            depth += 1;
            id = parent;
        }
        depth
    }

    fn resolve_body(&self, record: BodyRecord) -> Result<CelestialBody, CatalogueError> {
        if self.body_names.contains_key(&record.name) {
            return Err(CatalogueError::DuplicateName {
                kind: "body",
                name: record.name,
            });
        }
        if !record.radius.is_finite() || record.radius < 0.0 {
            return Err(CatalogueError::InvalidRadius {
                name: record.name,
                radius: record.radius,
            });
        }
        if !record.rotation_rate.is_finite() || record.rotation_rate < 0.0 {
            return Err(CatalogueError::InvalidRotationRate {
                name: record.name,
                rate: record.rotation_rate,
            });
        }
        if !record.kind.rotates() && record.rotation_rate != 0.0 {
            return Err(CatalogueError::RotatingNonRotator {
                name: record.name,
                kind: record.kind,
                rate: record.rotation_rate,
            });
        }

        let parent_body = record
            .parent_body
            .as_deref()
            .map(|name| self.require_body(&record.name, name))
            .transpose()?;
        let parent_star = record
            .parent_star
            .as_deref()
            .map(|name| self.require_star(&record.name, name))
            .transpose()?;

        if let Some(parent) = parent_body
            && self.depth(parent) + 1 > MAX_DEPTH
        {
            return Err(CatalogueError::HierarchyTooDeep { name: record.name });
        }

        // Lagrange points take their look from the body they belong to.
        let (theme_color, theme_image) = match (record.kind, parent_body) {
            (BodyKind::LagrangePoint, Some(parent)) => {
                let parent = self.body(parent);
                (parent.theme_color, parent.theme_image.clone())
            }
            _ => (record.theme_color.unwrap_or_default(), record.theme_image),
        };

        let orientation = if record.orientation.length_squared() > 0.0 {
            record.orientation.normalize()
        } else {
            DQuat::IDENTITY
        };

        Ok(CelestialBody {
            name: record.name,
            kind: record.kind,
            parent_body,
            parent_star,
            position: record.coordinates,
            orientation,
            radius: record.radius,
            rotation_rate: record.rotation_rate,
            rotation_correction: record.rotation_correction,
            orbit_angle: record.orbit_angle,
            orbit_radius: record.orbit_radius,
            theme_color,
            theme_image,
            ring: record.ring,
        })
    }

    fn resolve_location(&self, record: LocationRecord) -> Result<Location, CatalogueError> {
        if self.location_names.contains_key(&record.name) {
            return Err(CatalogueError::DuplicateName {
                kind: "location",
                name: record.name,
            });
        }
        let parent_body = self.require_body(&record.name, &record.parent_body)?;
        let body = self.body(parent_body);
        if body.radius <= 0.0 {
            return Err(CatalogueError::ZeroRadiusParent {
                location: record.name,
                body: body.name.clone(),
            });
        }
        if record.coordinates.length_squared() == 0.0 || !record.coordinates.is_finite() {
            return Err(CatalogueError::DegenerateOffset {
                location: record.name,
            });
        }

        let star = match record.parent_star.as_deref() {
            Some(name) => self.require_star(&record.name, name)?,
            None => match self.star_of(parent_body) {
                Some(star) => star,
                None => {
                    return Err(CatalogueError::MissingStar {
                        location: record.name,
                    });
                }
            },
        };
        let light = self.body(star);
        if star == parent_body || body.kind == BodyKind::Star || light.position == body.position {
            return Err(CatalogueError::SiteOnStar {
                location: record.name,
                star: light.name.clone(),
            });
        }

        Ok(Location {
            name: record.name,
            kind: record.kind,
            parent_body,
            star,
            offset: record.coordinates,
            theme_image: record.theme_image,
        })
    }
}
