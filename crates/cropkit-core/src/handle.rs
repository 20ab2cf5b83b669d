// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
#[cfg(feature = "clap")]
use clap::ValueEnum;

use crate::error::CropError;
use crate::rect::{Point, Rect};

bitflags! {
    /// Axes a handle may change under direct drag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementMask: u8 {
        const VERTICAL = 1 << 0;
        const HORIZONTAL = 1 << 1;
        const BOTH = Self::VERTICAL.bits() | Self::HORIZONTAL.bits();
    }
}

/// Stable slot of a handle in the manager's arena.
///
/// Corners come first in clockwise order from the top-left, then the edges
/// clockwise from the top. The discriminant is the arena index.
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
    Top = 4,
    Right = 5,
    Bottom = 6,
    Left = 7,
}

/// How a handle is tied into the rest of the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// `link_x` mirrors this corner's x, `link_y` mirrors its y.
    Corner { link_x: HandleId, link_y: HandleId },
    /// Always sits on the midpoint of the two corners.
    Edge { between: (HandleId, HandleId) },
}

impl HandleId {
    pub const CORNERS: [HandleId; 4] = [
        HandleId::TopLeft,
        HandleId::TopRight,
        HandleId::BottomRight,
        HandleId::BottomLeft,
    ];

    pub const EDGES: [HandleId; 4] = [
        HandleId::Top,
        HandleId::Right,
        HandleId::Bottom,
        HandleId::Left,
    ];

    pub const ALL: [HandleId; 8] = [
        HandleId::TopLeft,
        HandleId::TopRight,
        HandleId::BottomRight,
        HandleId::BottomLeft,
        HandleId::Top,
        HandleId::Right,
        HandleId::Bottom,
        HandleId::Left,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn kind(self) -> HandleKind {
        use HandleId::*;
        match self {
            TopLeft => HandleKind::Corner {
                link_x: BottomLeft,
                link_y: TopRight,
            },
            TopRight => HandleKind::Corner {
                link_x: BottomRight,
                link_y: TopLeft,
            },
            BottomRight => HandleKind::Corner {
                link_x: TopRight,
                link_y: BottomLeft,
            },
            BottomLeft => HandleKind::Corner {
                link_x: TopLeft,
                link_y: BottomRight,
            },
            Top => HandleKind::Edge {
                between: (TopLeft, TopRight),
            },
            Right => HandleKind::Edge {
                between: (TopRight, BottomRight),
            },
            Bottom => HandleKind::Edge {
                between: (BottomLeft, BottomRight),
            },
            Left => HandleKind::Edge {
                between: (TopLeft, BottomLeft),
            },
        }
    }

    pub const fn mask(self) -> MovementMask {
        use HandleId::*;
        match self {
            TopLeft | TopRight | BottomRight | BottomLeft => MovementMask::BOTH,
            Left | Right => MovementMask::HORIZONTAL,
            Top | Bottom => MovementMask::VERTICAL,
        }
    }

    pub const fn is_corner(self) -> bool {
        matches!(self.kind(), HandleKind::Corner { .. })
    }

    /// Where this handle sits on `rect`.
    pub fn anchor_on(self, rect: &Rect) -> Point {
        use HandleId::*;
        let c = rect.center();
        match self {
            TopLeft => rect.top_left(),
            TopRight => rect.top_right(),
            BottomRight => rect.bottom_right(),
            BottomLeft => rect.bottom_left(),
            Top => Point::new(c.x, rect.min_y()),
            Right => Point::new(rect.max_x(), c.y),
            Bottom => Point::new(c.x, rect.max_y()),
            Left => Point::new(rect.min_x(), c.y),
        }
    }

    pub const fn name(self) -> &'static str {
        use HandleId::*;
        match self {
            TopLeft => "top-left",
            TopRight => "top-right",
            BottomRight => "bottom-right",
            BottomLeft => "bottom-left",
            Top => "top",
            Right => "right",
            Bottom => "bottom",
            Left => "left",
        }
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HandleId {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        HandleId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| CropError::UnknownHandle(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { origin: Point },
}

/// A single draggable point. Only the manager writes `center`; a handle
/// on its own just turns a gesture translation into a candidate position.
#[derive(Debug, Clone)]
pub struct Handle {
    id: HandleId,
    center: Point,
    state: DragState,
}

impl Handle {
    pub fn new(id: HandleId, center: Point) -> Self {
        Self {
            id,
            center,
            state: DragState::Idle,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn kind(&self) -> HandleKind {
        self.id.kind()
    }

    pub fn mask(&self) -> MovementMask {
        self.id.mask()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Square touch target of side `size` centred on the handle.
    pub fn touch_target(&self, size: f64) -> Rect {
        let half = size / 2.0;
        Rect::new(self.center.x - half, self.center.y - half, size, size)
    }

    pub(crate) fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub(crate) fn set_x(&mut self, x: f64) {
        self.center.x = x;
    }

    pub(crate) fn set_y(&mut self, y: f64) {
        self.center.y = y;
    }

    pub fn begin_drag(&mut self) {
        self.state = DragState::Dragging {
            origin: self.center,
        };
    }

    /// Candidate center for a gesture that has moved `translation` since
    /// `begin_drag`. Masked-out axes keep the current value, the rest are
    /// clamped into `surface`. `None` while idle.
    pub fn update_drag(&self, translation: Point, surface: &Rect) -> Option<Point> {
        let DragState::Dragging { origin } = self.state else {
            return None;
        };

        let translated = origin.offset(translation);
        let mask = self.mask();
        let mut candidate = self.center;

        if mask.contains(MovementMask::HORIZONTAL) && translated.x.is_finite() {
            candidate.x = clamp_axis(translated.x, surface.min_x(), surface.max_x());
        }
        if mask.contains(MovementMask::VERTICAL) && translated.y.is_finite() {
            candidate.y = clamp_axis(translated.y, surface.min_y(), surface.max_y());
        }

        Some(candidate)
    }

    pub fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }
}

fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 200.0)
    }

    #[test]
    fn test_indices_match_arena_order() {
        for (i, id) in HandleId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert!(HandleId::CORNERS.iter().all(|id| id.is_corner()));
        assert!(HandleId::EDGES.iter().all(|id| !id.is_corner()));
    }

    #[test]
    fn test_corner_links_are_adjacent_corners() {
        for id in HandleId::CORNERS {
            let HandleKind::Corner { link_x, link_y } = id.kind() else {
                panic!("{id} should be a corner");
            };
            let r = Rect::new(10.0, 20.0, 100.0, 50.0);
            // The x-link shares x, the y-link shares y.
            assert_eq!(link_x.anchor_on(&r).x, id.anchor_on(&r).x);
            assert_eq!(link_y.anchor_on(&r).y, id.anchor_on(&r).y);
            assert_ne!(link_x, link_y);
        }
    }

    #[test]
    fn test_edges_sit_between_their_corners() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        for id in HandleId::EDGES {
            let HandleKind::Edge { between: (a, b) } = id.kind() else {
                panic!("{id} should be an edge");
            };
            let mid = a.anchor_on(&r).midpoint(b.anchor_on(&r));
            assert_eq!(mid, Some(id.anchor_on(&r)));
        }
    }

    #[test]
    fn test_masks() {
        assert_eq!(HandleId::TopLeft.mask(), MovementMask::BOTH);
        assert_eq!(HandleId::Left.mask(), MovementMask::HORIZONTAL);
        assert_eq!(HandleId::Right.mask(), MovementMask::HORIZONTAL);
        assert_eq!(HandleId::Top.mask(), MovementMask::VERTICAL);
        assert_eq!(HandleId::Bottom.mask(), MovementMask::VERTICAL);
    }

    #[test]
    fn test_update_drag_while_idle_is_none() {
        let h = Handle::new(HandleId::TopLeft, Point::new(30.0, 30.0));
        assert_eq!(h.update_drag(Point::new(5.0, 5.0), &surface()), None);
    }

    #[test]
    fn test_update_drag_is_relative_to_origin() {
        let mut h = Handle::new(HandleId::TopLeft, Point::new(30.0, 30.0));
        h.begin_drag();
        h.set_center(Point::new(99.0, 99.0));
        let c = h.update_drag(Point::new(5.0, -10.0), &surface());
        assert_eq!(c, Some(Point::new(35.0, 20.0)));
    }

    #[test]
    fn test_update_drag_respects_mask() {
        let mut h = Handle::new(HandleId::Right, Point::new(170.0, 100.0));
        h.begin_drag();
        let c = h.update_drag(Point::new(10.0, 40.0), &surface());
        assert_eq!(c, Some(Point::new(180.0, 100.0)));

        let mut h = Handle::new(HandleId::Top, Point::new(100.0, 30.0));
        h.begin_drag();
        let c = h.update_drag(Point::new(10.0, 40.0), &surface());
        assert_eq!(c, Some(Point::new(100.0, 70.0)));
    }

    #[test]
    fn test_update_drag_clamps_to_surface() {
        let mut h = Handle::new(HandleId::BottomRight, Point::new(170.0, 170.0));
        h.begin_drag();
        assert_eq!(
            h.update_drag(Point::new(500.0, -500.0), &surface()),
            Some(Point::new(200.0, 0.0))
        );
    }

    #[test]
    fn test_update_drag_ignores_non_finite_translation() {
        let mut h = Handle::new(HandleId::TopLeft, Point::new(30.0, 30.0));
        h.begin_drag();
        let c = h.update_drag(Point::new(f64::NAN, 10.0), &surface());
        assert_eq!(c, Some(Point::new(30.0, 40.0)));
    }

    #[test]
    fn test_end_drag_returns_to_idle() {
        let mut h = Handle::new(HandleId::Left, Point::new(30.0, 100.0));
        h.begin_drag();
        assert!(h.is_dragging());
        h.end_drag();
        assert_eq!(h.state(), DragState::Idle);
    }

    #[test]
    fn test_parse_handle_names() {
        assert_eq!("top-left".parse::<HandleId>(), Ok(HandleId::TopLeft));
        assert_eq!("Bottom_Right".parse::<HandleId>(), Ok(HandleId::BottomRight));
        assert_eq!("left".parse::<HandleId>(), Ok(HandleId::Left));
        assert!("middle".parse::<HandleId>().is_err());
    }

    #[test]
    fn test_touch_target_is_centered() {
        let h = Handle::new(HandleId::Top, Point::new(100.0, 30.0));
        assert_eq!(h.touch_target(44.0), Rect::new(78.0, 8.0, 44.0, 44.0));
    }
}
