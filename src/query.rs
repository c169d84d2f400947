//! Per-tick measurement layer: sensor casts, box collision, batch edges
//!
//! Everything here is a pure query over a `&Track` plus per-vehicle
//! inputs; the only state is the reusable batch edge buffer.

use glam::DVec2;

use crate::geometry::Segment;
use crate::rig::SensorRig;
use crate::track::Track;
use crate::vehicle::{Pose, VehicleGeometry};

/// Measure every sensor of `rig`, in rig order
///
/// Each sensor casts its maximum-range segment from the vehicle position
/// and reads the distance to the first boundary crossing. A ray that
/// exits its range without touching the track reports the sensor's
/// configured maximum distance; that is a normal in-range miss, not an
/// error.
pub fn measure_sensors(
    track: &Track,
    rig: &SensorRig,
    pose: &Pose,
    section_index: usize,
) -> Vec<f64> {
    rig.sensors()
        .iter()
        .map(|sensor| {
            let ray = sensor.ray(pose.position, pose.heading);
            match track.find_boundary_crossing(&ray, section_index) {
                Some(point) => pose.position.distance(point),
                None => sensor.distance,
            }
        })
        .collect()
}

/// Test an oriented box against the circuit boundary
///
/// `corners` in winding order front-left, front-right, back-right,
/// back-left. Returns 0 when clear, else the 1-based index of the first
/// colliding edge (1 front, 2 right, 3 back, 4 left). Uses the boolean
/// search; no intersection point is computed.
pub fn check_box_collision(track: &Track, corners: &[DVec2; 4], section_index: usize) -> usize {
    for i in 0..4 {
        let edge = Segment::new(corners[i], corners[(i + 1) % 4]);
        if track.crosses_boundary(&edge, section_index) {
            return i + 1;
        }
    }
    0
}

/// [`check_box_collision`] with the box derived from the vehicle footprint
pub fn check_vehicle_collision(
    track: &Track,
    geometry: &VehicleGeometry,
    pose: &Pose,
    section_index: usize,
) -> usize {
    check_box_collision(track, &geometry.corners(pose), section_index)
}

/// Reusable batch buffer of oriented-box edges for rendering
///
/// Each vehicle contributes 16 `f32` values: four `(x1, y1, x2, y2)`
/// edge quadruples in the same winding as [`check_box_collision`]. The
/// buffer grows to the largest batch seen and stays allocated across
/// calls; every call fully overwrites the slots it returns.
#[derive(Debug, Default)]
pub struct EdgeBuffer {
    data: Vec<f32>,
}

/// Floats written per vehicle (4 edges x 4 coordinates)
pub const FLOATS_PER_VEHICLE: usize = 16;

impl EdgeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the box edges for every pose and return the filled slice
    /// (`16 * count` values)
    pub fn fill<I>(&mut self, geometry: &VehicleGeometry, poses: I) -> &[f32]
    where
        I: IntoIterator,
        I::Item: Into<Pose>,
    {
        let mut count = 0;
        for pose in poses {
            let pose = pose.into();
            let needed = (count + 1) * FLOATS_PER_VEHICLE;
            if self.data.len() < needed {
                self.data.resize(needed, 0.0);
            }

            let corners = geometry.corners(&pose);
            let base = count * FLOATS_PER_VEHICLE;
            for i in 0..4 {
                let a = corners[i];
                let b = corners[(i + 1) % 4];
                let o = base + i * 4;
                self.data[o] = a.x as f32;
                self.data[o + 1] = a.y as f32;
                self.data[o + 2] = b.x as f32;
                self.data[o + 3] = b.y as f32;
            }
            count += 1;
        }
        &self.data[..count * FLOATS_PER_VEHICLE]
    }

    /// Total allocated capacity in floats (grows monotonically)
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Zero-copy byte view of the whole buffer for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}
