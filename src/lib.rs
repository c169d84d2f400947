//! Raceline - geometry and physics kernel for a 2D racing simulation
//!
//! Core modules:
//! - `geometry`: segment/line intersection primitive
//! - `track`: circular ring of track sections, boundary ray search
//! - `rig`: distance-sensor rigs with generation-checked handles
//! - `vehicle`: pose and rectangular footprint geometry
//! - `kinematics`: bicycle-model step via the center of rotation
//! - `query`: per-tick measurements (sensor casts, collisions, batch edges)
//! - `world`: host-facing facade bundling the owned state
//!
//! The kernel is pure and deterministic: no rendering, no I/O, no
//! concurrency. The host owns the game loop, drivers and training and
//! calls in once per tick per vehicle.
//!
//! Coordinate convention: heading 0 points "north" (+y) and increases
//! clockwise, so a heading `h` maps to the unit vector `(sin h, cos h)`.

pub mod geometry;
pub mod kinematics;
pub mod query;
pub mod rig;
pub mod track;
pub mod vehicle;
pub mod world;

pub use geometry::{IntersectKind, Segment, intersection, intersects};
pub use kinematics::step;
pub use query::{EdgeBuffer, check_box_collision, check_vehicle_collision, measure_sensors};
pub use rig::{RigArena, RigHandle, Sensor, SensorRig};
pub use track::{SectionTransition, Track, TrackSection};
pub use vehicle::{Pose, VehicleGeometry};
pub use world::World;

use glam::DVec2;
use std::f64::consts::TAU;
use std::fmt;

/// Wrap an angle into `[0, 2π)`
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Unit vector for a heading (0 = north/+y, clockwise positive)
#[inline]
pub fn heading_vec(heading: f64) -> DVec2 {
    DVec2::new(heading.sin(), heading.cos())
}

/// Errors reported at the kernel boundary
///
/// Geometric degeneracy (parallel lines, zero-length segments) is never
/// an error; those cases are ordinary "no intersection" results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Sensor angle and distance lists differ in length
    RigLengthMismatch { angles: usize, distances: usize },
    /// A rig must carry at least one sensor
    EmptyRig,
    /// The rig handle was deleted or never issued
    StaleRigHandle,
    /// Vehicle footprint dimensions must be positive
    InvalidGeometry,
    /// A vehicle-box query was made before geometry was configured
    GeometryNotConfigured,
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::RigLengthMismatch { angles, distances } => write!(
                f,
                "sensor rig lists differ in length: {angles} angles vs {distances} distances"
            ),
            KernelError::EmptyRig => write!(f, "sensor rig has no sensors"),
            KernelError::StaleRigHandle => write!(f, "sensor rig handle is stale or unknown"),
            KernelError::InvalidGeometry => {
                write!(f, "vehicle length and width must be positive")
            }
            KernelError::GeometryNotConfigured => {
                write!(f, "vehicle geometry has not been configured")
            }
        }
    }
}

impl std::error::Error for KernelError {}
