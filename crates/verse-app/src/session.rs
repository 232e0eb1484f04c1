//! One running star-map session: the catalogue, the universe clock, the
//! active location and the atlas declutter state.

use glam::DVec3;
use verse_astro::{
    Catalogue, ClockSource, EpochSnapshot, Ephemeris, LocationCard, LocationId, LocationState,
    SystemWallClock, WallClock,
};
use verse_atlas::{
    CameraPose, DeclutterReport, DeclutterSettings, DeclutterThresholds, LabelDeclutter,
    PlanarProjector, body_map_position, catalogue_labels,
};
use verse_config::{AtlasConfig, Config};

use crate::AppError;

/// Camera orbit distance used while looking at the active location.
const SURFACE_VIEW_DISTANCE: f64 = 0.3;

/// Pixels per map unit of the headless projector.
const PIXELS_PER_UNIT: f64 = 2000.0;

const VIEWPORT: (f32, f32) = (1920.0, 1080.0);

/// Convert the atlas config section into declutter settings.
pub fn declutter_settings(atlas: &AtlasConfig) -> DeclutterSettings {
    DeclutterSettings {
        every_n_frames: atlas.declutter_every_n_frames,
        thresholds: DeclutterThresholds {
            galaxy_scale_distance: atlas.galaxy_scale_distance,
            body_window: atlas.body_window,
            moon_window: atlas.moon_window,
            location_window: atlas.location_window,
        },
        resolve_overlaps: atlas.resolve_overlaps,
    }
}

pub struct Session<W: WallClock = SystemWallClock> {
    catalogue: Catalogue,
    clock: ClockSource<W>,
    location: LocationId,
    declutter: LabelDeclutter,
    camera: CameraPose,
    state: Option<LocationState>,
    last_report: Option<DeclutterReport>,
}

impl<W: WallClock> Session<W> {
    /// # Errors
    ///
    /// [`AppError::UnknownLocation`] if the configured location is not in the
    /// catalogue.
    pub fn new(
        catalogue: Catalogue,
        clock: ClockSource<W>,
        config: &Config,
    ) -> Result<Self, AppError> {
        let location = resolve_location(&catalogue, &config.app.active_location)?;
        let mut session = Self {
            catalogue,
            clock,
            location,
            declutter: LabelDeclutter::new(declutter_settings(&config.atlas)),
            camera: CameraPose {
                position: DVec3::ZERO,
                distance: SURFACE_VIEW_DISTANCE,
            },
            state: None,
            last_report: None,
        };
        session.focus_active_location();
        tracing::info!(
            location = %config.app.active_location,
            acceleration = session.clock.acceleration(),
            "session started"
        );
        Ok(session)
    }

    /// Take over edited settings from a reloaded config.
    ///
    /// # Errors
    ///
    /// [`AppError::UnknownLocation`] if the new location does not exist; the
    /// session keeps its previous settings in that case.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), AppError> {
        let location = resolve_location(&self.catalogue, &config.app.active_location)?;
        self.clock.set_acceleration(config.clock.acceleration_factor);
        self.declutter.set_settings(declutter_settings(&config.atlas));
        if location != self.location {
            self.location = location;
            self.state = None;
            self.focus_active_location();
        }
        Ok(())
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn location(&self) -> LocationId {
        self.location
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn declutter(&self) -> &LabelDeclutter {
        &self.declutter
    }

    /// State computed by the latest tick.
    pub fn state(&self) -> Option<&LocationState> {
        self.state.as_ref()
    }

    pub fn last_report(&self) -> Option<&DeclutterReport> {
        self.last_report.as_ref()
    }

    /// Fixed-rate update: recompute the active location's solar state.
    pub fn update(&mut self) -> Option<&LocationState> {
        let now = self.clock.now();
        self.state = Ephemeris::new(&self.catalogue).location_state(self.location, &now);
        self.state.as_ref()
    }

    /// Per-frame work: declutter the atlas labels when a pass is due.
    pub fn frame(&mut self, index: u64) -> Option<DeclutterReport> {
        if !self.declutter.should_run(index) {
            return None;
        }
        let now = self.clock.now();
        let target = self.camera.position - DVec3::Z * self.camera.distance;
        let projector = PlanarProjector::new(target, PIXELS_PER_UNIT, VIEWPORT);
        let labels = catalogue_labels(&self.catalogue, &EpochSnapshot, &now, &projector);
        let report = self.declutter.on_frame(index, &self.camera, &labels);
        if report.is_some() {
            self.last_report = report;
        }
        report
    }

    /// Display card for the active location at the current instant.
    pub fn card(&self) -> Option<LocationCard> {
        Ephemeris::new(&self.catalogue).location_card(self.location, &self.clock.now())
    }

    fn focus_active_location(&mut self) {
        let body = self.catalogue.location(self.location).parent_body;
        let target = body_map_position(&self.catalogue, &EpochSnapshot, body, &self.clock.now());
        self.camera.position = target + DVec3::Z * self.camera.distance;
        self.declutter.set_focus(Some(body));
    }
}

fn resolve_location(catalogue: &Catalogue, name: &str) -> Result<LocationId, AppError> {
    catalogue
        .location_id(name)
        .ok_or_else(|| AppError::UnknownLocation(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verse_astro::FixedWallClock;
    use verse_astro::clock::EPOCH_2020_MS;
    use verse_astro::demo;
    use verse_atlas::LabelId;

    fn session(location: &str) -> Result<Session<FixedWallClock>, AppError> {
        let mut config = Config::default();
        config.app.active_location = location.to_string();
        let clock = ClockSource::with_wall_clock(FixedWallClock(EPOCH_2020_MS + 86_400_000), 6.0);
        Session::new(demo::stanton().unwrap(), clock, &config)
    }

    #[test]
    fn test_unknown_location_is_rejected() {
        assert!(matches!(
            session("Atlantis"),
            Err(AppError::UnknownLocation(name)) if name == "Atlantis"
        ));
    }

    #[test]
    fn test_update_is_reproducible_with_fixed_clock() {
        let mut a = session("Orison").unwrap();
        let mut b = session("Orison").unwrap();
        let state = a.update().copied();
        assert!(state.is_some());
        assert_eq!(state.as_ref(), b.update());
        assert_eq!(a.state(), state.as_ref());
    }

    #[test]
    fn test_frame_declutters_every_fifth_frame() {
        let mut s = session("Lorville").unwrap();
        let reports: Vec<u64> = (0..11).filter(|i| s.frame(*i).is_some()).collect();
        assert_eq!(reports, vec![0, 5, 10]);
        let report = s.last_report().unwrap();
        assert_eq!(report.total, 1 + 5 + 4);
        assert!(report.decorations.bodies);
    }

    /// From orbit the landing zone label sits on top of its planet's label
    /// and loses to it; locations on other bodies are gated out by focus.
    #[test]
    fn test_surface_view_labels() {
        let mut s = session("Lorville").unwrap();
        s.frame(0);
        let catalogue = s.catalogue();
        let hurston = catalogue.body_id("Hurston").unwrap();
        let lorville = catalogue.location_id("Lorville").unwrap();
        let orison = catalogue.location_id("Orison").unwrap();
        let table = s.declutter().table();
        assert!(table.is_visible(LabelId::Body(hurston)));
        assert!(!table.is_visible(LabelId::Location(lorville)));
        assert!(!table.is_visible(LabelId::Location(orison)));
    }

    #[test]
    fn test_apply_config_switches_location_and_settings() {
        let mut s = session("Orison").unwrap();
        let mut config = Config::default();
        config.app.active_location = "Area18".to_string();
        config.atlas.declutter_every_n_frames = 2;
        s.apply_config(&config).unwrap();

        let area18 = s.catalogue().location_id("Area18").unwrap();
        assert_eq!(s.location(), area18);
        assert!(s.declutter().should_run(4));
        let arccorp = s.catalogue().body_id("ArcCorp").unwrap();
        assert_eq!(s.declutter().focus(), Some(arccorp));

        config.app.active_location = "Nowhere".to_string();
        assert!(s.apply_config(&config).is_err());
        assert_eq!(s.location(), area18);
    }

    #[test]
    fn test_card_names_active_location() {
        let s = session("New Babbage").unwrap();
        let card = s.card().unwrap();
        assert_eq!(card.name, "New Babbage");
        assert_eq!(card.body, "microTech");
    }
}
