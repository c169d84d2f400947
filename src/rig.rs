//! Sensor rigs: fixed, ordered lists of distance sensors per vehicle archetype
//!
//! Rigs live in an arena and are addressed through generation-checked
//! handles, so a stale handle is a reported error instead of a read of
//! freed memory. Multiple rigs coexist (one per vehicle type); the host
//! passes the handle explicitly on every query.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Segment;
use crate::{KernelError, heading_vec};

/// One distance sensor: mount angle relative to the vehicle heading and
/// maximum ray length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Radians, relative to vehicle heading
    pub angle: f64,
    /// Maximum ray length; also the reading reported on a miss
    pub distance: f64,
}

impl Sensor {
    /// World-space ray endpoint for a vehicle at `position` facing `heading`
    #[inline]
    pub fn endpoint(&self, position: DVec2, heading: f64) -> DVec2 {
        position + self.distance * heading_vec(heading + self.angle)
    }

    /// Bounded probe segment from the vehicle position to the endpoint
    #[inline]
    pub fn ray(&self, position: DVec2, heading: f64) -> Segment {
        Segment::new(position, self.endpoint(position, heading))
    }
}

/// An ordered list of sensors; size and order are fixed after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRig {
    sensors: Vec<Sensor>,
}

impl SensorRig {
    pub fn new(sensors: Vec<Sensor>) -> Result<Self, KernelError> {
        if sensors.is_empty() {
            return Err(KernelError::EmptyRig);
        }
        Ok(Self { sensors })
    }

    /// Build from parallel angle/distance lists, the shape hosts supply.
    /// Mismatched lengths are rejected before anything is stored.
    pub fn from_lists(angles: &[f64], distances: &[f64]) -> Result<Self, KernelError> {
        if angles.len() != distances.len() {
            return Err(KernelError::RigLengthMismatch {
                angles: angles.len(),
                distances: distances.len(),
            });
        }
        Self::new(
            angles
                .iter()
                .zip(distances)
                .map(|(&angle, &distance)| Sensor { angle, distance })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }
}

/// Opaque, generation-checked reference to a rig in a [`RigArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RigHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    rig: Option<SensorRig>,
}

/// Owns every live sensor rig behind explicit create/delete pairs
#[derive(Debug, Default)]
pub struct RigArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl RigArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a rig built from parallel angle/distance lists
    pub fn create(&mut self, angles: &[f64], distances: &[f64]) -> Result<RigHandle, KernelError> {
        let rig = SensorRig::from_lists(angles, distances)?;
        Ok(self.insert(rig))
    }

    pub fn insert(&mut self, rig: SensorRig) -> RigHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.rig = Some(rig);
                RigHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    rig: Some(rig),
                });
                RigHandle {
                    index,
                    generation: 0,
                }
            }
        };
        log::debug!(
            "sensor rig created: handle {}/{}, {} sensors",
            handle.index,
            handle.generation,
            self.slots[handle.index as usize].rig.as_ref().map_or(0, SensorRig::len)
        );
        handle
    }

    /// Invalidate `handle`. The slot's generation bumps so any copy of
    /// the handle held by the caller turns stale.
    pub fn delete(&mut self, handle: RigHandle) -> Result<(), KernelError> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .ok_or(KernelError::StaleRigHandle)?;
        if slot.generation != handle.generation || slot.rig.is_none() {
            return Err(KernelError::StaleRigHandle);
        }
        slot.rig = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        log::debug!("sensor rig deleted: handle {}/{}", handle.index, handle.generation);
        Ok(())
    }

    pub fn get(&self, handle: RigHandle) -> Result<&SensorRig, KernelError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.rig.as_ref())
            .ok_or(KernelError::StaleRigHandle)
    }

    /// Number of live rigs
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.rig.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
