//! Label declutter: distance-window gating followed by rank-based overlap
//! resolution.
//!
//! The pass is throttled to every n-th render frame. Each pass rewrites the
//! [`LabelStateTable`] from scratch, so the result depends only on the
//! camera pose, the focus and the label list handed in.

use std::time::{Duration, Instant};

use glam::DVec3;
use verse_astro::BodyId;

use crate::label::{Label, LabelKind};
use crate::table::LabelStateTable;

/// Camera state relevant to decluttering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Map-space camera position.
    pub position: DVec3,
    /// Orbit-control distance from the camera to its target.
    pub distance: f64,
}

/// Half-open range `[min, max)` of camera distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceWindow {
    pub min: f64,
    pub max: f64,
}

impl DistanceWindow {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.min && distance < self.max
    }
}

/// Camera distances at which each label kind may be shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeclutterThresholds {
    /// At or beyond this distance the map switches to galaxy scale.
    pub galaxy_scale_distance: f64,
    /// Upper bound for star, planet, jump point and Lagrange point labels.
    pub body_window: f64,
    pub moon_window: f64,
    pub location_window: f64,
}

impl Default for DeclutterThresholds {
    fn default() -> Self {
        Self {
            galaxy_scale_distance: 25.0,
            body_window: 25.0,
            moon_window: 1.0,
            location_window: 0.5,
        }
    }
}

impl DeclutterThresholds {
    pub fn window(&self, kind: LabelKind) -> DistanceWindow {
        match kind {
            LabelKind::System => DistanceWindow::new(self.galaxy_scale_distance, f64::INFINITY),
            LabelKind::Star | LabelKind::Planet | LabelKind::JumpPoint | LabelKind::LagrangePoint => {
                DistanceWindow::new(0.0, self.body_window)
            }
            LabelKind::Moon => DistanceWindow::new(0.0, self.moon_window),
            LabelKind::Location => DistanceWindow::new(0.0, self.location_window),
        }
    }
}

/// Which scene decorations the renderer should draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecorationVisibility {
    /// System lollipops, galaxy grid and wormhole lines.
    pub galaxy: bool,
    /// Orbit lines and other body-scale decorations.
    pub bodies: bool,
}

impl DecorationVisibility {
    pub fn for_distance(distance: f64, galaxy_scale_distance: f64) -> Self {
        let galaxy = distance >= galaxy_scale_distance;
        Self {
            galaxy,
            bodies: !galaxy,
        }
    }
}

/// Tunables for [`LabelDeclutter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeclutterSettings {
    pub every_n_frames: u64,
    pub thresholds: DeclutterThresholds,
    pub resolve_overlaps: bool,
}

impl Default for DeclutterSettings {
    fn default() -> Self {
        Self {
            every_n_frames: 5,
            thresholds: DeclutterThresholds::default(),
            resolve_overlaps: true,
        }
    }
}

/// Summary of one declutter pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeclutterReport {
    pub visible: usize,
    pub total: usize,
    pub decorations: DecorationVisibility,
    pub elapsed: Duration,
}

/// Decides label visibility for the atlas view.
pub struct LabelDeclutter {
    settings: DeclutterSettings,
    focus: Option<BodyId>,
    table: LabelStateTable,
    decorations: DecorationVisibility,
}

impl LabelDeclutter {
    pub fn new(settings: DeclutterSettings) -> Self {
        Self {
            settings,
            focus: None,
            table: LabelStateTable::new(),
            decorations: DecorationVisibility {
                galaxy: false,
                bodies: true,
            },
        }
    }

    pub fn settings(&self) -> &DeclutterSettings {
        &self.settings
    }

    /// Takes effect on the next pass.
    pub fn set_settings(&mut self, settings: DeclutterSettings) {
        self.settings = settings;
    }

    /// Restrict location labels to those on `body`. `None` lifts the
    /// restriction.
    pub fn set_focus(&mut self, body: Option<BodyId>) {
        self.focus = body;
    }

    pub fn focus(&self) -> Option<BodyId> {
        self.focus
    }

    /// Result of the most recent pass.
    pub fn table(&self) -> &LabelStateTable {
        &self.table
    }

    pub fn decorations(&self) -> DecorationVisibility {
        self.decorations
    }

    /// Whether a pass is due on render frame `frame`.
    pub fn should_run(&self, frame: u64) -> bool {
        frame % self.settings.every_n_frames.max(1) == 0
    }

    /// Run a pass if one is due on `frame`.
    pub fn on_frame(
        &mut self,
        frame: u64,
        camera: &CameraPose,
        labels: &[Label],
    ) -> Option<DeclutterReport> {
        self.should_run(frame)
            .then(|| self.declutter(camera, labels))
    }

    /// Recompute visibility for `labels` unconditionally.
    pub fn declutter(&mut self, camera: &CameraPose, labels: &[Label]) -> DeclutterReport {
        let start = Instant::now();
        let thresholds = &self.settings.thresholds;

        self.decorations =
            DecorationVisibility::for_distance(camera.distance, thresholds.galaxy_scale_distance);

        let mut visible: Vec<bool> = labels
            .iter()
            .map(|label| self.passes_gates(label, camera.distance))
            .collect();

        if self.settings.resolve_overlaps {
            resolve_overlaps(labels, &mut visible, camera.position);
        }

        self.table.clear();
        for (label, shown) in labels.iter().zip(&visible) {
            self.table.set(label.id, *shown);
        }

        let report = DeclutterReport {
            visible: visible.iter().filter(|v| **v).count(),
            total: labels.len(),
            decorations: self.decorations,
            elapsed: start.elapsed(),
        };
        tracing::debug!(
            visible = report.visible,
            total = report.total,
            galaxy = report.decorations.galaxy,
            elapsed_us = report.elapsed.as_micros() as u64,
            "label declutter pass"
        );
        report
    }

    fn passes_gates(&self, label: &Label, distance: f64) -> bool {
        if label.rect.is_none() {
            return false;
        }
        if !self.settings.thresholds.window(label.kind).contains(distance) {
            return false;
        }
        match (label.kind, self.focus) {
            (LabelKind::Location, Some(focus)) => label.owner == Some(focus),
            _ => true,
        }
    }
}

/// Greedy pairwise sweep in index order. Labels already hidden are skipped.
fn resolve_overlaps(labels: &[Label], visible: &mut [bool], camera: DVec3) {
    for i in 0..labels.len() {
        if !visible[i] {
            continue;
        }
        for j in (i + 1)..labels.len() {
            if !visible[j] {
                continue;
            }
            let (Some(a), Some(b)) = (labels[i].rect, labels[j].rect) else {
                continue;
            };
            if !a.intersects(&b) {
                continue;
            }
            if keeps_first(&labels[i], &labels[j], camera) {
                visible[j] = false;
            } else {
                visible[i] = false;
                break;
            }
        }
    }
}

/// Whether `first` wins against the later `second`: higher rank, then the
/// label closer to the camera, then the earlier one.
fn keeps_first(first: &Label, second: &Label, camera: DVec3) -> bool {
    let (rank_a, rank_b) = (first.kind.rank(), second.kind.rank());
    if rank_a != rank_b {
        return rank_a > rank_b;
    }
    let da = first.world_position.distance_squared(camera);
    let db = second.world_position.distance_squared(camera);
    da <= db
}
