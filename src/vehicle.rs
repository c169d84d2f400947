//! Vehicle pose and rectangular footprint geometry
//!
//! `VehicleGeometry` is an explicit immutable value built once by
//! configuration; the derived corner distance/angle pair is computed at
//! construction and reused by every box and kinematics query.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::KernelError;
use crate::geometry::Segment;

/// A vehicle's world-space position and heading
///
/// Heading 0 points north (+y) and increases clockwise; the forward
/// unit vector is `(sin heading, cos heading)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec2,
    pub heading: f64,
}

impl Pose {
    pub fn new(position: DVec2, heading: f64) -> Self {
        Self { position, heading }
    }
}

/// Host-shaped `(x, y, heading)` triples convert directly
impl From<(f64, f64, f64)> for Pose {
    fn from((x, y, heading): (f64, f64, f64)) -> Self {
        Self {
            position: DVec2::new(x, y),
            heading,
        }
    }
}

/// Rectangular vehicle footprint with precomputed derived constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleGeometry {
    length: f64,
    width: f64,
    half_wheelbase: f64,
    half_track: f64,
    /// Center-to-corner distance
    corner_distance: f64,
    /// Angle between the heading and a front corner
    corner_angle: f64,
}

impl VehicleGeometry {
    pub fn new(length: f64, width: f64) -> Result<Self, KernelError> {
        if !(length > 0.0 && width > 0.0) {
            return Err(KernelError::InvalidGeometry);
        }
        Ok(Self {
            length,
            width,
            half_wheelbase: length / 2.0,
            half_track: width / 2.0,
            corner_distance: (width / 2.0).hypot(length / 2.0),
            corner_angle: (width / length).atan(),
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn half_wheelbase(&self) -> f64 {
        self.half_wheelbase
    }

    #[inline]
    pub fn half_track(&self) -> f64 {
        self.half_track
    }

    #[inline]
    pub fn corner_distance(&self) -> f64 {
        self.corner_distance
    }

    #[inline]
    pub fn corner_angle(&self) -> f64 {
        self.corner_angle
    }

    /// Oriented box corners in fixed winding: front-left, front-right,
    /// back-right, back-left. The back corners are the front corners
    /// mirrored through the center.
    pub fn corners(&self, pose: &Pose) -> [DVec2; 4] {
        let d = self.corner_distance;
        let minus = pose.heading - self.corner_angle;
        let plus = pose.heading + self.corner_angle;
        let front_left = d * DVec2::new(minus.sin(), minus.cos());
        let front_right = d * DVec2::new(plus.sin(), plus.cos());
        [
            pose.position + front_left,
            pose.position + front_right,
            pose.position - front_left,
            pose.position - front_right,
        ]
    }

    /// Box edges connecting adjacent corners: front, right, back, left
    pub fn edges(&self, pose: &Pose) -> [Segment; 4] {
        let c = self.corners(pose);
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(VehicleGeometry::new(0.0, 10.0).is_err());
        assert!(VehicleGeometry::new(30.0, -1.0).is_err());
        assert!(VehicleGeometry::new(f64::NAN, 10.0).is_err());
        assert!(VehicleGeometry::new(30.0, 10.0).is_ok());
    }

    #[test]
    fn test_derived_constants() {
        let geom = VehicleGeometry::new(30.0, 10.0).unwrap();
        assert_eq!(geom.half_wheelbase(), 15.0);
        assert_eq!(geom.half_track(), 5.0);
        assert!((geom.corner_distance() - (5.0f64.powi(2) + 15.0f64.powi(2)).sqrt()).abs() < 1e-12);
        assert!((geom.corner_angle() - (10.0f64 / 30.0).atan()).abs() < 1e-12);
    }

    #[test]
    fn test_corners_axis_aligned_at_zero_heading() {
        let geom = VehicleGeometry::new(30.0, 10.0).unwrap();
        let pose = Pose::new(DVec2::new(100.0, 200.0), 0.0);
        let [fl, fr, br, bl] = geom.corners(&pose);

        // corner_distance * sin(corner_angle) == width/2,
        // corner_distance * cos(corner_angle) == length/2
        assert!((fl.x - 95.0).abs() < 1e-9);
        assert!((fl.y - 215.0).abs() < 1e-9);
        assert!((fr.x - 105.0).abs() < 1e-9);
        assert!((fr.y - 215.0).abs() < 1e-9);
        assert!((br.x - 105.0).abs() < 1e-9);
        assert!((br.y - 185.0).abs() < 1e-9);
        assert!((bl.x - 95.0).abs() < 1e-9);
        assert!((bl.y - 185.0).abs() < 1e-9);
    }

    #[test]
    fn test_corners_rotate_with_heading() {
        let geom = VehicleGeometry::new(30.0, 10.0).unwrap();
        let pose = Pose::new(DVec2::ZERO, PI / 2.0);
        // Facing east (+x): the front-left corner ends up east-north
        let [fl, _, _, _] = geom.corners(&pose);
        assert!((fl.x - 15.0).abs() < 1e-9);
        assert!((fl.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_edges_close_the_loop() {
        let geom = VehicleGeometry::new(30.0, 10.0).unwrap();
        let pose = Pose::new(DVec2::new(3.0, -4.0), 1.2);
        let edges = geom.edges(&pose);
        for i in 0..4 {
            let next = &edges[(i + 1) % 4];
            assert!((edges[i].end - next.start).length() < 1e-12);
        }
        // Front and back edges span the width, sides span the length
        assert!((edges[0].length() - 10.0).abs() < 1e-9);
        assert!((edges[1].length() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_pose_from_triple() {
        let pose = Pose::from((1.0, 2.0, 0.5));
        assert_eq!(pose.position, DVec2::new(1.0, 2.0));
        assert_eq!(pose.heading, 0.5);
    }
}
