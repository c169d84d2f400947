//! Track model: an ordered, circular ring of quadrilateral sections
//!
//! Owns the wrap-around boundary search used by sensor casts and
//! collision checks, and the section-transition test. The track is an
//! owned value passed by reference into every query; it is built
//! wholesale and never mutated incrementally.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{IntersectKind, Segment, intersection, intersects};

/// One quadrilateral slice of the circuit
///
/// Section `i`'s `front` is expected to coincide with section `i+1`'s
/// `back` (mod N). `left` runs from the section's back end to its front
/// end; the transition test relies on that orientation. `centerline`
/// and `angle` (banking) are stored for the host's route-progress
/// logic; the kernel only reads the four boundary edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSection {
    pub front: Segment,
    pub back: Segment,
    pub left: Segment,
    pub right: Segment,
    pub centerline: Segment,
    pub angle: f64,
}

/// Verdict of the section-transition test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionTransition {
    /// Crossed the section's front edge into the next section
    Advance,
    /// Crossed the section's back edge into the previous section
    Regress,
    /// Still within the section
    Stay,
}

impl SectionTransition {
    /// Signed index delta: +1 advance, -1 regress, 0 stay
    #[inline]
    pub fn delta(&self) -> i64 {
        match self {
            SectionTransition::Advance => 1,
            SectionTransition::Regress => -1,
            SectionTransition::Stay => 0,
        }
    }
}

/// Which edge the walk last stepped through, to keep it from bouncing
/// between two sections across the same shared edge.
#[derive(PartialEq, Clone, Copy)]
enum LastCrossed {
    None,
    Front,
    Back,
}

/// A closed circuit of track sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    sections: Vec<TrackSection>,
}

impl Track {
    pub fn new(sections: Vec<TrackSection>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[TrackSection] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&TrackSection> {
        self.sections.get(index)
    }

    /// True mathematical modulo into `[0, len)`; negative walk indices
    /// wrap to the high end of the ring. Empty tracks have no valid
    /// index, so callers guard before wrapping.
    pub fn wrap_index(&self, index: i64) -> usize {
        index.rem_euclid(self.sections.len() as i64) as usize
    }

    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        self.wrap_index(index as i64 + 1)
    }

    #[inline]
    pub fn prev_index(&self, index: usize) -> usize {
        self.wrap_index(index as i64 - 1)
    }

    /// Find the first point where `ray` crosses the circuit boundary,
    /// walking outward from `start_index`.
    ///
    /// At each section the side walls are tested first (`left` then
    /// `right`); a hit there is the answer. Otherwise the walk steps
    /// forward through `front` or backward through `back` - front takes
    /// priority when both are crossable - never re-crossing the edge it
    /// just entered through. `ray` must be a bounded segment: sensor
    /// casts pass their maximum-range segment, which also guarantees the
    /// walk terminates.
    pub fn find_boundary_crossing(&self, ray: &Segment, start_index: usize) -> Option<DVec2> {
        if self.sections.is_empty() {
            return None;
        }
        let mut index = self.wrap_index(start_index as i64);
        let mut last = LastCrossed::None;
        // Bounded rays cannot legitimately revisit a section more than
        // once per direction; exceeding the cap means inconsistent data.
        let cap = 2 * self.sections.len();
        for _ in 0..=cap {
            let section = &self.sections[index];
            let hit = intersection(ray, &section.left, IntersectKind::SegmentSegment)
                .or_else(|| intersection(ray, &section.right, IntersectKind::SegmentSegment));
            if hit.is_some() {
                return hit;
            }
            match self.step_walk(ray, section, index, last) {
                Some((next, crossed)) => {
                    index = next;
                    last = crossed;
                }
                None => return None,
            }
        }
        log::error!(
            "boundary search exceeded {cap} steps from section {start_index}; track data is inconsistent"
        );
        None
    }

    /// Existence-only twin of [`find_boundary_crossing`]; stays on the
    /// cheap boolean intersection path throughout.
    pub fn crosses_boundary(&self, ray: &Segment, start_index: usize) -> bool {
        if self.sections.is_empty() {
            return false;
        }
        let mut index = self.wrap_index(start_index as i64);
        let mut last = LastCrossed::None;
        let cap = 2 * self.sections.len();
        for _ in 0..=cap {
            let section = &self.sections[index];
            if intersects(ray, &section.left, IntersectKind::SegmentSegment)
                || intersects(ray, &section.right, IntersectKind::SegmentSegment)
            {
                return true;
            }
            match self.step_walk(ray, section, index, last) {
                Some((next, crossed)) => {
                    index = next;
                    last = crossed;
                }
                None => return false,
            }
        }
        log::error!(
            "boundary search exceeded {cap} steps from section {start_index}; track data is inconsistent"
        );
        false
    }

    /// One walk step: pick the next section through `front` or `back`,
    /// or `None` when the ray leaves the circuit unhit.
    fn step_walk(
        &self,
        ray: &Segment,
        section: &TrackSection,
        index: usize,
        last: LastCrossed,
    ) -> Option<(usize, LastCrossed)> {
        if last != LastCrossed::Back
            && intersects(ray, &section.front, IntersectKind::SegmentSegment)
        {
            Some((self.next_index(index), LastCrossed::Front))
        } else if last != LastCrossed::Front
            && intersects(ray, &section.back, IntersectKind::SegmentSegment)
        {
            Some((self.prev_index(index), LastCrossed::Back))
        } else {
            None
        }
    }

    /// Decide whether `position` has left the section at `index`.
    ///
    /// Two helper rays extend the section's `left` edge direction from
    /// the position, one past the front, one past the back. A position
    /// still inside the section has both rays crossing the respective
    /// boundary line; a missing crossing means the position has passed
    /// that boundary. Front is tested first. A point exactly on an edge
    /// still belongs to the current section.
    pub fn transition(&self, position: DVec2, index: usize) -> SectionTransition {
        if self.sections.is_empty() {
            return SectionTransition::Stay;
        }
        let section = &self.sections[self.wrap_index(index as i64)];
        let dir = section.left.delta();

        let forward = Segment::new(position, section.left.end + dir);
        if !intersects(&forward, &section.front, IntersectKind::SegmentLine) {
            return SectionTransition::Advance;
        }

        let backward = Segment::new(position, section.left.start - dir);
        if !intersects(&backward, &section.back, IntersectKind::SegmentLine) {
            return SectionTransition::Regress;
        }

        SectionTransition::Stay
    }
}

/// Straight corridor along +y: section `i` spans `y in [i*length, (i+1)*length]`,
/// `x in [-width/2, width/2]`. Not closed into a ring, which is fine for
/// walk tests - the walk simply runs out of crossable edges at the ends.
#[cfg(test)]
pub(crate) fn straight_track(sections: usize, width: f64, length: f64) -> Track {
    let hw = width / 2.0;
    let make = |i: usize| {
        let y0 = i as f64 * length;
        let y1 = y0 + length;
        TrackSection {
            front: Segment::from_coords([-hw, y1, hw, y1]),
            back: Segment::from_coords([hw, y0, -hw, y0]),
            left: Segment::from_coords([-hw, y0, -hw, y1]),
            right: Segment::from_coords([hw, y0, hw, y1]),
            centerline: Segment::from_coords([0.0, y0, 0.0, y1]),
            angle: 0.0,
        }
    };
    Track::new((0..sections).map(make).collect())
}
