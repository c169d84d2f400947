//! Segment/line intersection primitive
//!
//! One parameterized routine covers segment-segment, segment-line and
//! line-line intersection. The hot per-tick paths (sensor casts, box
//! collision) all funnel through here, so the boolean variant skips the
//! point division entirely.
//!
//! Degenerate inputs are defined results, not errors: parallel or
//! coincident lines (zero denominator) report no intersection, and
//! coincident overlapping segments are deliberately treated as
//! non-intersecting.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A pair of endpoints; bounded or infinite depending on [`IntersectKind`]
///
/// The flat `[x1, y1, x2, y2]` layout only appears at serialization
/// boundaries via [`Segment::from_coords`] / [`Segment::coords`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Build from the flat 4-scalar layout `[x1, y1, x2, y2]`
    pub fn from_coords(coords: [f64; 4]) -> Self {
        Self {
            start: DVec2::new(coords[0], coords[1]),
            end: DVec2::new(coords[2], coords[3]),
        }
    }

    /// Ray-style constructor: `length` along `angle` from `start`
    /// (0 = north/+y, clockwise positive)
    pub fn from_ray(start: DVec2, angle: f64, length: f64) -> Self {
        Self {
            start,
            end: start + length * DVec2::new(angle.sin(), angle.cos()),
        }
    }

    /// Flat 4-scalar layout `[x1, y1, x2, y2]`
    pub fn coords(&self) -> [f64; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// Endpoint difference `end - start`
    #[inline]
    pub fn delta(&self) -> DVec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) * 0.5
    }

    /// Same segment shifted by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Which sides of an intersection query are bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectKind {
    /// Both inputs bounded
    SegmentSegment,
    /// First input bounded, second treated as an infinite line
    SegmentLine,
    /// Both inputs treated as infinite lines
    LineLine,
}

/// Intermediate determinant terms shared by both query variants
struct Crossing {
    dx1: f64,
    dy1: f64,
    dx2: f64,
    dy2: f64,
    /// Moment of the first line (`x1*y2 - y1*x2`)
    moment_a: f64,
    /// Moment of the second line (`x3*y4 - y3*x4`)
    moment_b: f64,
    denom: f64,
}

/// Core of the determinant test. Returns the terms needed to compute the
/// intersection point, or `None` when the inputs do not meet.
fn crossing(a: &Segment, b: &Segment, kind: IntersectKind) -> Option<Crossing> {
    let [x1, y1, x2, y2] = a.coords();
    let [x3, y3, x4, y4] = b.coords();

    let dx1 = x1 - x2;
    let dx2 = x3 - x4;
    let dy1 = y1 - y2;
    let dy2 = y3 - y4;

    // Common denominator of the determinant. Zero means parallel or
    // coincident; overlapping collinear segments count as no intersection.
    let denom = dx1 * dy2 - dy1 * dx2;
    if denom == 0.0 {
        return None;
    }

    // Bounded sides must have their endpoints on opposite sides of the
    // other infinite line. A strictly positive product means both
    // endpoints sit on the same side; zero means touching, which counts.
    let moment_b = x3 * y4 - y3 * x4;
    if kind != IntersectKind::LineLine {
        let d1a = dy2 * x1 - dx2 * y1 + moment_b;
        let d1b = dy2 * x2 - dx2 * y2 + moment_b;
        if d1a * d1b > 0.0 {
            return None;
        }
    }

    let moment_a = x1 * y2 - y1 * x2;
    if kind == IntersectKind::SegmentSegment {
        let d2a = dy1 * x3 - dx1 * y3 + moment_a;
        let d2b = dy1 * x4 - dx1 * y4 + moment_a;
        if d2a * d2b > 0.0 {
            return None;
        }
    }

    Some(Crossing {
        dx1,
        dy1,
        dx2,
        dy2,
        moment_a,
        moment_b,
        denom,
    })
}

/// Find the intersection point of two segments/lines
///
/// `kind` selects which sides are bounded. Returns `None` for parallel,
/// coincident or non-straddling inputs.
pub fn intersection(a: &Segment, b: &Segment, kind: IntersectKind) -> Option<DVec2> {
    crossing(a, b, kind).map(|c| {
        DVec2::new(
            (c.moment_a * c.dx2 - c.dx1 * c.moment_b) / c.denom,
            (c.moment_a * c.dy2 - c.dy1 * c.moment_b) / c.denom,
        )
    })
}

/// Existence-only variant of [`intersection`]; skips the point division
#[inline]
pub fn intersects(a: &Segment, b: &Segment, kind: IntersectKind) -> bool {
    crossing(a, b, kind).is_some()
}
