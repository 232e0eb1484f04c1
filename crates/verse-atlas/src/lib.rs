//! Atlas label declutter: distance-window gating, rank-based overlap resolution and decoration switching.

mod declutter;
mod label;
mod scene;
mod table;

pub use declutter::{
    CameraPose, DeclutterReport, DeclutterSettings, DeclutterThresholds, DecorationVisibility,
    DistanceWindow, LabelDeclutter,
};
pub use label::{Label, LabelId, LabelKind, ScreenRect};
pub use scene::{LabelProjector, MAP_SCALE, PlanarProjector, body_map_position, catalogue_labels};
pub use table::LabelStateTable;
