//! Host-facing facade over the kernel's owned state
//!
//! `World` bundles the long-lived state - track, vehicle geometry,
//! sensor rigs, batch edge buffer - into one owned value: the host
//! builds it, feeds it track/rig/geometry data up front and calls the
//! per-tick queries with explicit poses and section indices.
//! Single-threaded; a host wanting parallel per-vehicle queries can use
//! the module-level functions over a shared `&Track` instead.

use glam::DVec2;

use crate::geometry::{IntersectKind, Segment, intersection};
use crate::kinematics;
use crate::query::{self, EdgeBuffer};
use crate::rig::{RigArena, RigHandle};
use crate::track::{SectionTransition, Track, TrackSection};
use crate::vehicle::{Pose, VehicleGeometry};
use crate::KernelError;

#[derive(Debug, Default)]
pub struct World {
    track: Track,
    rigs: RigArena,
    geometry: Option<VehicleGeometry>,
    edges: EdgeBuffer,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vehicle footprint and recompute the derived constants
    pub fn configure_vehicle_geometry(
        &mut self,
        length: f64,
        width: f64,
    ) -> Result<(), KernelError> {
        self.geometry = Some(VehicleGeometry::new(length, width)?);
        Ok(())
    }

    /// Replace the whole track; any previous track is discarded
    pub fn load_track(&mut self, sections: Vec<TrackSection>) {
        self.track = Track::new(sections);
        log::info!("track loaded: {} sections", self.track.len());
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn vehicle_geometry(&self) -> Option<&VehicleGeometry> {
        self.geometry.as_ref()
    }

    /// Store a sensor rig and return its handle
    pub fn create_sensor_rig(
        &mut self,
        angles: &[f64],
        distances: &[f64],
    ) -> Result<RigHandle, KernelError> {
        self.rigs.create(angles, distances)
    }

    /// Invalidate a rig handle
    pub fn delete_sensor_rig(&mut self, handle: RigHandle) -> Result<(), KernelError> {
        self.rigs.delete(handle)
    }

    /// One reading per sensor, in rig order
    pub fn measure_sensors(
        &self,
        handle: RigHandle,
        pose: &Pose,
        section_index: usize,
    ) -> Result<Vec<f64>, KernelError> {
        let rig = self.rigs.get(handle)?;
        Ok(query::measure_sensors(&self.track, rig, pose, section_index))
    }

    /// 0 when clear, else the 1-based first colliding edge
    pub fn check_box_collision(&self, corners: &[DVec2; 4], section_index: usize) -> usize {
        query::check_box_collision(&self.track, corners, section_index)
    }

    /// [`Self::check_box_collision`] with the box derived from the
    /// configured vehicle geometry
    pub fn check_vehicle_collision(
        &self,
        pose: &Pose,
        section_index: usize,
    ) -> Result<usize, KernelError> {
        let geometry = self.geometry.ok_or(KernelError::GeometryNotConfigured)?;
        Ok(query::check_vehicle_collision(
            &self.track,
            &geometry,
            pose,
            section_index,
        ))
    }

    pub fn check_section_transition(
        &self,
        position: DVec2,
        section_index: usize,
    ) -> SectionTransition {
        self.track.transition(position, section_index)
    }

    /// Advance a pose under the bicycle steering model
    pub fn step(
        &self,
        pose: &Pose,
        speed: f64,
        steering_angle: f64,
        dt: f64,
    ) -> Result<Pose, KernelError> {
        let geometry = self.geometry.ok_or(KernelError::GeometryNotConfigured)?;
        Ok(kinematics::step(pose, speed, steering_angle, dt, &geometry))
    }

    /// Box edges for every pose, 16 floats per vehicle, in a buffer
    /// reused across calls
    pub fn batch_box_edges<I>(&mut self, poses: I) -> Result<&[f32], KernelError>
    where
        I: IntoIterator,
        I::Item: Into<Pose>,
    {
        let geometry = self.geometry.ok_or(KernelError::GeometryNotConfigured)?;
        Ok(self.edges.fill(&geometry, poses))
    }

    /// Standalone intersection query for host-side tooling (editors,
    /// debug overlays)
    pub fn intersect(
        &self,
        a: &Segment,
        b: &Segment,
        kind: IntersectKind,
    ) -> Option<DVec2> {
        intersection(a, b, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::straight_track;
    use std::f64::consts::FRAC_PI_2;

    fn corridor_world() -> World {
        let mut world = World::new();
        world.load_track(straight_track(4, 10.0, 10.0).sections().to_vec());
        world.configure_vehicle_geometry(4.0, 2.0).unwrap();
        world
    }

    #[test]
    fn test_queries_before_configuration() {
        let world = World::new();
        let pose = Pose::new(DVec2::ZERO, 0.0);
        assert_eq!(
            world.check_vehicle_collision(&pose, 0).unwrap_err(),
            KernelError::GeometryNotConfigured
        );
        assert_eq!(
            world.step(&pose, 1.0, 0.0, 0.1).unwrap_err(),
            KernelError::GeometryNotConfigured
        );
        // Empty track: transitions and box queries degrade gracefully
        assert_eq!(
            world.check_section_transition(DVec2::ZERO, 0),
            SectionTransition::Stay
        );
    }

    #[test]
    fn test_load_track_replaces_wholesale() {
        let mut world = corridor_world();
        assert_eq!(world.track().len(), 4);
        world.load_track(straight_track(2, 10.0, 10.0).sections().to_vec());
        assert_eq!(world.track().len(), 2);
    }

    #[test]
    fn test_rig_lifecycle_through_world() {
        let mut world = corridor_world();
        let rig = world
            .create_sensor_rig(&[0.0, FRAC_PI_2, -FRAC_PI_2], &[100.0, 100.0, 100.0])
            .unwrap();

        let pose = Pose::new(DVec2::new(0.0, 5.0), 0.0);
        let readings = world.measure_sensors(rig, &pose, 0).unwrap();
        assert_eq!(readings.len(), 3);
        // Side sensors see the walls 5 units out
        assert!((readings[1] - 5.0).abs() < 1e-9);
        assert!((readings[2] - 5.0).abs() < 1e-9);

        world.delete_sensor_rig(rig).unwrap();
        assert_eq!(
            world.measure_sensors(rig, &pose, 0).unwrap_err(),
            KernelError::StaleRigHandle
        );
    }

    /// Drive a vehicle up the corridor: it should advance a section,
    /// stay clear of the walls, and keep sensible sensor readings.
    #[test]
    fn test_drive_up_the_corridor() {
        let mut world = corridor_world();
        let rig = world.create_sensor_rig(&[0.0], &[100.0]).unwrap();

        let mut pose = Pose::new(DVec2::new(0.0, 2.0), 0.0);
        let mut section = 0usize;
        for _ in 0..100 {
            pose = world.step(&pose, 20.0, 0.0, 0.01).unwrap();
            assert_eq!(world.check_vehicle_collision(&pose, section).unwrap(), 0);
            let change = world.check_section_transition(pose.position, section);
            section = world.track().wrap_index(section as i64 + change.delta());
        }

        // 20 units of travel from y=2: now in section 2
        assert!((pose.position.y - 22.0).abs() < 1e-9);
        assert_eq!(section, 2);

        // Forward sensor up the open corridor never meets a side wall:
        // full max-distance reading
        let readings = world.measure_sensors(rig, &pose, section).unwrap();
        assert_eq!(readings, vec![100.0]);
    }

    #[test]
    fn test_batch_edges_through_world() {
        let mut world = corridor_world();
        let out = world
            .batch_box_edges([(0.0, 5.0, 0.0), (0.0, 15.0, 0.0)])
            .unwrap();
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_standalone_intersect() {
        let world = World::new();
        let a = Segment::from_coords([-1.0, 0.0, 1.0, 0.0]);
        let b = Segment::from_coords([0.0, -1.0, 0.0, 1.0]);
        let p = world.intersect(&a, &b, IntersectKind::SegmentSegment).unwrap();
        assert!(p.length() < 1e-12);
    }
}
