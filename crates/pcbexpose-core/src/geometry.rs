//! Board-space geometry primitives.
//!
//! Board space is Y-up and measured in inches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Running extent of everything drawn on a board.
///
/// A `Bounds` starts empty and only ever grows. It is owned by the caller and
/// threaded through interpretation, so several layers of one board (copper and
/// drills, for example) can share a single frame. Start a fresh value to reset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    extent: Option<(Point, Point)>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Grow to include `p`.
    pub fn include_point(&mut self, p: Point) {
        self.include_rect(p, p);
    }

    /// Grow to include the axis-aligned rectangle spanned by `min` and `max`.
    ///
    /// Non-finite corners are ignored.
    pub fn include_rect(&mut self, min: Point, max: Point) {
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            tracing::warn!("ignoring non-finite extent {:?}..{:?}", min, max);
            return;
        }
        let (lo, hi) = (
            Point::new(min.x.min(max.x), min.y.min(max.y)),
            Point::new(min.x.max(max.x), min.y.max(max.y)),
        );
        self.extent = Some(match self.extent {
            None => (lo, hi),
            Some((cur_lo, cur_hi)) => (
                Point::new(cur_lo.x.min(lo.x), cur_lo.y.min(lo.y)),
                Point::new(cur_hi.x.max(hi.x), cur_hi.y.max(hi.y)),
            ),
        });
    }

    /// Merge another accumulator into this one.
    pub fn union(&mut self, other: &Bounds) {
        if let Some((lo, hi)) = other.extent {
            self.include_rect(lo, hi);
        }
    }

    pub fn min(&self) -> Option<Point> {
        self.extent.map(|(lo, _)| lo)
    }

    pub fn max(&self) -> Option<Point> {
        self.extent.map(|(_, hi)| hi)
    }

    pub fn min_x(&self) -> f64 {
        self.min().map_or(0.0, |p| p.x)
    }

    pub fn min_y(&self) -> f64 {
        self.min().map_or(0.0, |p| p.y)
    }

    pub fn max_x(&self) -> f64 {
        self.max().map_or(0.0, |p| p.x)
    }

    pub fn max_y(&self) -> f64 {
        self.max().map_or(0.0, |p| p.y)
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// True when `other` lies entirely inside this extent.
    pub fn contains(&self, other: &Bounds) -> bool {
        match (self.extent, other.extent) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some((lo, hi)), Some((olo, ohi))) => {
                lo.x <= olo.x && lo.y <= olo.y && hi.x >= ohi.x && hi.y >= ohi.y
            }
        }
    }
}
