//! Building the label list for a catalogue in map space.
//!
//! Catalogue positions are kilometres in each system's frame. The atlas
//! scales them down by [`MAP_SCALE`] and places every system at its galactic
//! map coordinates.

use glam::DVec3;
use verse_astro::orbit::{self, OrbitalModel};
use verse_astro::{BodyId, Catalogue, SimTime};

use crate::label::{Label, LabelId, LabelKind, ScreenRect};

/// Kilometres per map unit inside a system.
pub const MAP_SCALE: f64 = 7_000_000.0;

/// Projects map-space anchors onto the screen. Supplied by the renderer.
pub trait LabelProjector {
    /// Screen bounds of a label reading `text` anchored at `world`, or `None`
    /// when the anchor is off screen or behind the camera.
    fn project(&self, world: DVec3, text: &str) -> Option<ScreenRect>;
}

/// Straight-down orthographic view of the map XY plane.
///
/// Label width grows with the text length. Useful headless and in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarProjector {
    /// Map-space point at the centre of the viewport.
    pub centre: DVec3,
    pub pixels_per_unit: f64,
    pub viewport: (f32, f32),
    pub glyph_width: f32,
    pub line_height: f32,
}

impl PlanarProjector {
    pub fn new(centre: DVec3, pixels_per_unit: f64, viewport: (f32, f32)) -> Self {
        Self {
            centre,
            pixels_per_unit,
            viewport,
            glyph_width: 7.0,
            line_height: 14.0,
        }
    }
}

impl LabelProjector for PlanarProjector {
    fn project(&self, world: DVec3, text: &str) -> Option<ScreenRect> {
        let (width, height) = self.viewport;
        let offset = (world - self.centre) * self.pixels_per_unit;
        let x = width * 0.5 + offset.x as f32;
        let y = height * 0.5 - offset.y as f32;
        if !(0.0..=width).contains(&x) || !(0.0..=height).contains(&y) {
            return None;
        }
        let label_width = text.chars().count() as f32 * self.glyph_width;
        Some(ScreenRect::above((x, y), label_width, self.line_height))
    }
}

/// Map-space position of a body: its system's galactic coordinates plus the
/// scaled-down system-frame position.
pub fn body_map_position(
    catalogue: &Catalogue,
    model: &impl OrbitalModel,
    body: BodyId,
    time: &SimTime,
) -> DVec3 {
    system_origin(catalogue, body) + model.position(catalogue, body, time) / MAP_SCALE
}

fn system_origin(catalogue: &Catalogue, body: BodyId) -> DVec3 {
    catalogue
        .system_of(body)
        .map(|system| catalogue.system(system).coordinates)
        .unwrap_or(DVec3::ZERO)
}

/// Every label of the catalogue: systems first, then bodies, then locations,
/// each in catalogue order.
pub fn catalogue_labels(
    catalogue: &Catalogue,
    model: &impl OrbitalModel,
    time: &SimTime,
    projector: &impl LabelProjector,
) -> Vec<Label> {
    let mut labels =
        Vec::with_capacity(catalogue.systems().count() + catalogue.len_bodies() + catalogue.len_locations());

    for (id, system) in catalogue.systems() {
        labels.push(Label {
            id: LabelId::System(id),
            kind: LabelKind::System,
            world_position: system.coordinates,
            rect: projector.project(system.coordinates, &system.name),
            owner: None,
        });
    }

    for (id, body) in catalogue.bodies() {
        let world = body_map_position(catalogue, model, id, time);
        labels.push(Label {
            id: LabelId::Body(id),
            kind: body.kind.into(),
            world_position: world,
            rect: projector.project(world, &body.name),
            owner: body.parent_body,
        });
    }

    for (id, location) in catalogue.locations() {
        let world = system_origin(catalogue, location.parent_body)
            + orbit::location_position(catalogue, model, id, time) / MAP_SCALE;
        labels.push(Label {
            id: LabelId::Location(id),
            kind: LabelKind::Location,
            world_position: world,
            rect: projector.project(world, &location.name),
            owner: Some(location.parent_body),
        });
    }

    labels
}
