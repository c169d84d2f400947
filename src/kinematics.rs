//! Bicycle-model kinematic step
//!
//! The steered vehicle pivots around a center of rotation (COR) found by
//! intersecting two construction lines in the vehicle-local frame: one
//! through the front axle at the steering angle, one through the rear
//! axle perpendicular to the heading. Over one tick the vehicle sweeps a
//! constant-radius arc around that point.

use glam::DVec2;
use std::f64::consts::FRAC_PI_2;

use crate::geometry::{IntersectKind, Segment, intersection};
use crate::vehicle::{Pose, VehicleGeometry};
use crate::{heading_vec, normalize_angle};

/// Advance `pose` by `dt` seconds at `speed` with `steering_angle`
///
/// Zero speed leaves the pose untouched. Zero steering is an exact
/// straight-line translation with no trigonometry beyond the heading
/// vector. Otherwise the position arcs around the COR and the heading
/// turns by the swept angle (wrapped into `[0, 2π)`); a degenerate COR
/// (parallel construction lines) falls back to the straight-line update.
pub fn step(
    pose: &Pose,
    speed: f64,
    steering_angle: f64,
    dt: f64,
    geometry: &VehicleGeometry,
) -> Pose {
    if speed == 0.0 {
        return *pose;
    }

    let distance = speed * dt;
    if steering_angle == 0.0 {
        return translate(pose, distance);
    }

    let Some(cor) = center_of_rotation(pose.heading, steering_angle, geometry) else {
        return translate(pose, distance);
    };

    let radius = cor.length();
    let mut arc = distance / radius;
    if steering_angle < 0.0 {
        arc = -arc;
    }

    // Rotate the vehicle-local origin around the COR by `arc` (clockwise
    // for positive angles, matching the heading convention) and apply
    // the resulting delta in world coordinates.
    let (sin_a, cos_a) = arc.sin_cos();
    let delta = DVec2::new(
        cor.x - cor.x * cos_a - cor.y * sin_a,
        cor.y + cor.x * sin_a - cor.y * cos_a,
    );

    Pose {
        position: pose.position + delta,
        heading: normalize_angle(pose.heading + arc),
    }
}

/// COR in the vehicle-local frame (vehicle center at the origin, world
/// axis orientation). `None` when the construction lines are parallel.
fn center_of_rotation(
    heading: f64,
    steering_angle: f64,
    geometry: &VehicleGeometry,
) -> Option<DVec2> {
    let front_axle = geometry.half_wheelbase() * heading_vec(heading);
    let steer_line = Segment::new(
        front_axle,
        front_axle + heading_vec(heading + steering_angle + FRAC_PI_2),
    );

    let rear_axle = -front_axle;
    let back_line = Segment::new(rear_axle, rear_axle + heading_vec(heading + FRAC_PI_2));

    intersection(&steer_line, &back_line, IntersectKind::LineLine)
}

fn translate(pose: &Pose, distance: f64) -> Pose {
    Pose {
        position: pose.position + distance * heading_vec(pose.heading),
        heading: pose.heading,
    }
}
