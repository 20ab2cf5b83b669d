// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::str::FromStr;

use crate::error::CropError;

/// A point in the hosting surface's logical coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Midpoint of `self` and `other`, or `None` when either axis is not finite.
    pub fn midpoint(self, other: Point) -> Option<Point> {
        let x = (self.x - other.x) / 2.0 + other.x;
        let y = (self.y - other.y) / 2.0 + other.y;
        (x.is_finite() && y.is_finite()).then_some(Point::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned rectangle. Every constructor normalizes, so `w` and `h`
/// are never negative and `(x, y)` is always the minimum corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }.normalized()
    }

    /// Bounding rectangle of two opposite corners, in either order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        let max_x = a.x.max(b.x);
        let max_y = a.y.max(b.y);
        Self {
            x: min_x,
            y: min_y,
            w: max_x - min_x,
            h: max_y - min_y,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.w, size.h)
    }

    /// Flip negative extents so the origin is the minimum corner.
    pub fn normalized(self) -> Self {
        Self::from_corners(
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y + self.h),
        )
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.min_x(), self.min_y())
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.max_x(), self.min_y())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.max_x(), self.max_y())
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.min_x(), self.max_y())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by `amount` on every side. Collapses onto the center rather
    /// than going negative.
    pub fn inset(&self, amount: f64) -> Self {
        let dx = amount.min(self.w / 2.0);
        let dy = amount.min(self.h / 2.0);
        Self {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w - 2.0 * dx,
            h: self.h - 2.0 * dy,
        }
    }

    /// Inclusive on every edge, so a point sitting on the border counts.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.top_left()) && self.contains(other.bottom_right())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.w, self.h)
    }
}

fn parse_numbers<const N: usize>(s: &str, seps: &[char]) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = s.split(|c| seps.contains(&c));
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}

/// `X,Y`
impl FromStr for Point {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y] = parse_numbers::<2>(s, &[','])
            .ok_or_else(|| CropError::InvalidRect(format!("expected X,Y, got \"{s}\"")))?;
        Ok(Point::new(x, y))
    }
}

/// `WxH`
impl FromStr for Size {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [w, h] = parse_numbers::<2>(s, &['x', 'X'])
            .ok_or_else(|| CropError::InvalidRect(format!("expected WxH, got \"{s}\"")))?;
        Ok(Size::new(w, h))
    }
}

/// `X,Y,W,H`
impl FromStr for Rect {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, w, h] = parse_numbers::<4>(s, &[','])
            .ok_or_else(|| CropError::InvalidRect(format!("expected X,Y,W,H, got \"{s}\"")))?;
        Ok(Rect::new(x, y, w, h))
    }
}
