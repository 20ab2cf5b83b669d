// Author: Dustin Pilgrim
// License: MIT

use std::cell::RefCell;
use std::rc::Weak;

use crate::handle::{Handle, HandleId, HandleKind, MovementMask};
use crate::rect::{Point, Rect, Size};
use crate::settings::CropSettings;

/// Receives the normalized crop rectangle after every drag update.
pub trait RectObserver {
    fn rect_updated(&mut self, rect: Rect);
}

impl<F: FnMut(Rect)> RectObserver for F {
    fn rect_updated(&mut self, rect: Rect) {
        self(rect)
    }
}

/// Min/max corners exactly as the corner handles hold them. Rebuilding
/// corners from `x + w` can land an ulp outside the original edge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min: Point,
    max: Point,
}

impl Extent {
    fn spanning(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    fn rect(&self) -> Rect {
        Rect::from_corners(self.min, self.max)
    }
}

/// Owns the eight handles and keeps them a consistent rectangle.
///
/// Handles live in a fixed arena indexed by [`HandleId`]; the links between
/// them are the compile-time table in [`HandleId::kind`]. Every write to a
/// handle center goes through this type.
pub struct ConstraintManager {
    handles: [Handle; 8],
    surface: Rect,
    minimum_size: Size,
    last_stable: Option<Extent>,
    active: Option<HandleId>,
    observer: Option<Weak<RefCell<dyn RectObserver>>>,
}

impl ConstraintManager {
    /// Lay the handles out on `surface` inset by `settings.inset`.
    pub fn new(surface: Rect, settings: &CropSettings) -> Self {
        let surface = surface.normalized();
        let initial = surface.inset(settings.inset.max(0.0));
        let handles = HandleId::ALL.map(|id| Handle::new(id, id.anchor_on(&initial)));

        let mut manager = Self {
            handles,
            surface,
            minimum_size: settings.minimum_size,
            last_stable: None,
            active: None,
            observer: None,
        };
        manager.set_rectangle(initial);
        manager
    }

    /// Non-owning; once the observer is dropped notifications are skipped.
    pub fn set_observer(&mut self, observer: Weak<RefCell<dyn RectObserver>>) {
        self.observer = Some(observer);
    }

    pub fn surface(&self) -> Rect {
        self.surface
    }

    pub fn minimum_size(&self) -> Size {
        self.minimum_size
    }

    pub fn handles(&self) -> &[Handle; 8] {
        &self.handles
    }

    pub fn handle(&self, id: HandleId) -> &Handle {
        &self.handles[id.index()]
    }

    pub fn center(&self, id: HandleId) -> Point {
        self.handle(id).center()
    }

    pub fn active_drag(&self) -> Option<HandleId> {
        self.active
    }

    /// Normalized bounds of the top-left/bottom-right diagonal.
    pub fn current_rect(&self) -> Rect {
        self.corner_extent().rect()
    }

    /// Place all eight handles on `rect` at once. No minimum-size check.
    pub fn set_rectangle(&mut self, rect: Rect) {
        let far = Point::new(rect.x + rect.w, rect.y + rect.h);
        self.place_corners(Extent::spanning(Point::new(rect.x, rect.y), far));
    }

    /// Start a single-pointer drag. Refused while another handle is dragging.
    pub fn begin_drag(&mut self, id: HandleId) -> bool {
        match self.active {
            Some(other) if other != id => false,
            _ => {
                self.handles[id.index()].begin_drag();
                self.active = Some(id);
                true
            }
        }
    }

    /// Feed the gesture's total translation since `begin_drag`. Returns the
    /// rectangle reported to the observer, or `None` if `id` isn't dragging.
    pub fn update_drag(&mut self, id: HandleId, translation: Point) -> Option<Rect> {
        if self.active != Some(id) {
            return None;
        }

        let candidate = self.handles[id.index()].update_drag(translation, &self.surface)?;
        self.propagate(id, candidate);
        self.handles[id.index()].set_center(candidate);

        let rect = self.settle();
        self.notify(rect);
        Some(rect)
    }

    /// Release or cancel. Positions already applied stay where they are.
    pub fn end_drag(&mut self, id: HandleId) {
        if self.active == Some(id) {
            self.handles[id.index()].end_drag();
            self.active = None;
        }
    }

    fn propagate(&mut self, id: HandleId, candidate: Point) {
        match id.kind() {
            HandleKind::Corner { link_x, link_y } => {
                self.handles[link_x.index()].set_x(candidate.x);
                self.handles[link_y.index()].set_y(candidate.y);
            }
            HandleKind::Edge { between: (a, b) } => {
                let mask = id.mask();
                if mask == MovementMask::VERTICAL {
                    self.handles[a.index()].set_y(candidate.y);
                    self.handles[b.index()].set_y(candidate.y);
                } else if mask == MovementMask::HORIZONTAL {
                    self.handles[a.index()].set_x(candidate.x);
                    self.handles[b.index()].set_x(candidate.x);
                }
            }
        }
    }

    /// Fold a moved handle into the rectangle: per-axis minimum-size
    /// rollback, then resync every edge handle.
    fn settle(&mut self) -> Rect {
        let moved = self.corner_extent();
        let mut next = moved;

        if let Some(stable) = self.last_stable {
            if next.width() < self.minimum_size.w {
                next.min.x = stable.min.x;
                next.max.x = stable.max.x;
            }
            if next.height() < self.minimum_size.h {
                next.min.y = stable.min.y;
                next.max.y = stable.max.y;
            }
        }

        if next != moved {
            self.place_corners(next);
        } else {
            self.update_edges();
            self.last_stable = Some(next);
        }
        next.rect()
    }

    fn corner_extent(&self) -> Extent {
        Extent::spanning(
            self.center(HandleId::TopLeft),
            self.center(HandleId::BottomRight),
        )
    }

    fn place_corners(&mut self, extent: Extent) {
        let Extent { min, max } = extent;
        self.handles[HandleId::TopLeft.index()].set_center(min);
        self.handles[HandleId::TopRight.index()].set_center(Point::new(max.x, min.y));
        self.handles[HandleId::BottomRight.index()].set_center(max);
        self.handles[HandleId::BottomLeft.index()].set_center(Point::new(min.x, max.y));
        self.update_edges();
        self.last_stable = Some(extent);
    }

    fn update_edges(&mut self) {
        for id in HandleId::EDGES {
            let HandleKind::Edge { between: (a, b) } = id.kind() else {
                continue;
            };
            // Degenerate corners can produce a non-finite midpoint; keep the
            // last good position.
            if let Some(mid) = self.center(a).midpoint(self.center(b)) {
                self.handles[id.index()].set_center(mid);
            }
        }
    }

    fn notify(&self, rect: Rect) {
        let Some(observer) = self.observer.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        // Re-entrant notification (observer already borrowed) is dropped.
        if let Ok(mut observer) = observer.try_borrow_mut() {
            observer.rect_updated(rect);
        }
    }
}
