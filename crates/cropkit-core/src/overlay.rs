// Author: Dustin Pilgrim
// License: MIT

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::CropError;
use crate::handle::HandleId;
use crate::manager::{ConstraintManager, RectObserver};
use crate::rect::{Point, Rect, Size};
use crate::settings::CropSettings;

/// Sits between the manager and the host: remembers the last reported
/// rectangle and passes it on.
#[derive(Default)]
struct Relay {
    last: Option<Rect>,
    host: Option<Weak<RefCell<dyn RectObserver>>>,
}

impl RectObserver for Relay {
    fn rect_updated(&mut self, rect: Rect) {
        self.last = Some(rect);

        let Some(host) = self.host.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        if let Ok(mut host) = host.try_borrow_mut() {
            host.rect_updated(rect);
        }
    }
}

/// The crop overlay laid over the image: owns the constraint manager,
/// routes pointer input to the handle under the pointer and guards
/// programmatic frame changes against its own bounds.
pub struct CropOverlay {
    bounds: Rect,
    settings: CropSettings,
    manager: ConstraintManager,
    relay: Rc<RefCell<Relay>>,
}

impl CropOverlay {
    pub fn new(size: Size, settings: CropSettings) -> Self {
        let bounds = Rect::from_size(size);
        let mut manager = ConstraintManager::new(bounds, &settings);

        let relay = Rc::new(RefCell::new(Relay::default()));
        let weak: Weak<RefCell<dyn RectObserver>> = Rc::downgrade(&relay) as _;
        manager.set_observer(weak);

        Self {
            bounds,
            settings,
            manager,
            relay,
        }
    }

    pub fn set_observer(&mut self, host: Weak<RefCell<dyn RectObserver>>) {
        self.relay.borrow_mut().host = Some(host);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn manager(&self) -> &ConstraintManager {
        &self.manager
    }

    /// The crop rectangle as the handles currently describe it.
    pub fn point_rectangle(&self) -> Rect {
        self.manager.current_rect()
    }

    /// Most recent rectangle reported by a drag, if any drag has happened.
    pub fn last_reported(&self) -> Option<Rect> {
        self.relay.borrow().last
    }

    /// Handle whose touch target contains `p`. Overlapping targets resolve
    /// to the nearest center, corners winning ties.
    pub fn handle_at(&self, p: Point) -> Option<HandleId> {
        let size = self.settings.touch_target;
        self.manager
            .handles()
            .iter()
            .filter(|h| h.touch_target(size).contains(p))
            .map(|h| {
                let c = h.center();
                let d2 = (c.x - p.x).powi(2) + (c.y - p.y).powi(2);
                (d2, h.id())
            })
            .fold(None, |best: Option<(f64, HandleId)>, (d2, id)| match best {
                Some((bd, _)) if bd <= d2 => best,
                _ => Some((d2, id)),
            })
            .map(|(_, id)| id)
    }

    /// True iff `p` lands on some handle. The rectangle's interior alone
    /// doesn't count.
    pub fn hit_test(&self, p: Point) -> bool {
        self.handle_at(p).is_some()
    }

    /// Pointer went down at `p`; starts a drag on the handle there.
    pub fn pointer_down(&mut self, p: Point) -> Option<HandleId> {
        let id = self.handle_at(p)?;
        self.manager.begin_drag(id).then_some(id)
    }

    /// `translation` is the pointer's total travel since `pointer_down`.
    pub fn pointer_moved(&mut self, translation: Point) -> Option<Rect> {
        let id = self.manager.active_drag()?;
        self.manager.update_drag(id, translation)
    }

    /// Pointer released or gesture cancelled.
    pub fn pointer_up(&mut self) {
        if let Some(id) = self.manager.active_drag() {
            self.manager.end_drag(id);
        }
    }

    pub fn begin_drag(&mut self, id: HandleId) -> bool {
        self.manager.begin_drag(id)
    }

    pub fn update_drag(&mut self, id: HandleId, translation: Point) -> Option<Rect> {
        self.manager.update_drag(id, translation)
    }

    pub fn end_drag(&mut self, id: HandleId) {
        self.manager.end_drag(id);
    }

    /// Replace the crop rectangle from outside (zoom, pan, reset). Rejected
    /// unless `rect` lies fully inside the overlay. Animation is left to the
    /// host; geometry is applied immediately either way.
    pub fn set_point_frame(&mut self, rect: Rect, _animated: bool) -> Result<(), CropError> {
        let rect = rect.normalized();

        if !rect.is_finite() || !self.bounds.contains_rect(&rect) {
            return Err(CropError::OutOfBounds {
                rect,
                bounds: self.bounds,
            });
        }

        self.manager.set_rectangle(rect);
        Ok(())
    }
}
