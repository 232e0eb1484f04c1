//! Label descriptors handed to the declutter pass each frame.

use glam::DVec3;
use verse_astro::{BodyId, BodyKind, LocationId, SystemId};

/// What a label names. Ranks decide which of two overlapping labels stays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    System,
    Star,
    Planet,
    JumpPoint,
    LagrangePoint,
    Moon,
    Location,
}

impl LabelKind {
    /// Overlap priority; higher wins.
    pub fn rank(self) -> u8 {
        match self {
            LabelKind::System => 6,
            LabelKind::Star => 5,
            LabelKind::Planet => 4,
            LabelKind::JumpPoint => 3,
            LabelKind::LagrangePoint => 2,
            LabelKind::Moon => 1,
            LabelKind::Location => 0,
        }
    }
}

impl From<BodyKind> for LabelKind {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Star => LabelKind::Star,
            BodyKind::Planet => LabelKind::Planet,
            BodyKind::Moon => LabelKind::Moon,
            BodyKind::LagrangePoint => LabelKind::LagrangePoint,
            BodyKind::JumpPoint => LabelKind::JumpPoint,
        }
    }
}

/// The catalogue entity a label belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelId {
    System(SystemId),
    Body(BodyId),
    Location(LocationId),
}

/// Projected label bounds in screen pixels, y growing downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Rectangle of `width` x `height` with its bottom edge centred on
    /// `anchor`, the way labels sit above their marker.
    pub fn above(anchor: (f32, f32), width: f32, height: f32) -> Self {
        let (x, y) = anchor;
        Self::new(x - width * 0.5, y - height, x + width * 0.5, y)
    }

    /// Overlap test; touching edges count as overlapping.
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// One label as the renderer sees it this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub id: LabelId,
    pub kind: LabelKind,
    /// Map-space position, used for camera distance ties.
    pub world_position: DVec3,
    /// `None` when the anchor does not project onto the screen.
    pub rect: Option<ScreenRect>,
    /// Body whose surface a location label sits on.
    pub owner: Option<BodyId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_strictly_ordered() {
        let order = [
            LabelKind::System,
            LabelKind::Star,
            LabelKind::Planet,
            LabelKind::JumpPoint,
            LabelKind::LagrangePoint,
            LabelKind::Moon,
            LabelKind::Location,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].rank() > pair[1].rank(), "{:?} vs {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_body_kind_maps_one_to_one() {
        assert_eq!(LabelKind::from(BodyKind::JumpPoint), LabelKind::JumpPoint);
        assert_eq!(LabelKind::from(BodyKind::Moon), LabelKind::Moon);
    }

    #[test]
    fn test_touching_rects_overlap() {
        let a = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        let b = ScreenRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_separate_rects_do_not_overlap() {
        let a = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&ScreenRect::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!a.intersects(&ScreenRect::new(0.0, 11.0, 10.0, 20.0)));
    }

    #[test]
    fn test_new_sorts_corners() {
        let r = ScreenRect::new(10.0, 8.0, 2.0, 4.0);
        assert_eq!(r, ScreenRect::new(2.0, 4.0, 10.0, 8.0));
    }

    #[test]
    fn test_above_anchors_bottom_centre() {
        let r = ScreenRect::above((100.0, 50.0), 40.0, 12.0);
        assert_eq!(r, ScreenRect::new(80.0, 38.0, 120.0, 50.0));
    }
}
