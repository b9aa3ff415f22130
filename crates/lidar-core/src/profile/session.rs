//! Cut identity and the profile session that owns a binner for one cut.
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::debug;

use crate::config::ProfileConfig;
use crate::point::Point3;

use super::binner::{ProfileBinner, ProfilePoint};
use super::segment::Segment;

/// Identity of a cut, derived from its control points at millimetre precision.
pub type CutKey = u64;

#[inline]
fn millimetres(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// Hash of the control points rounded to 3 decimals, in order.
///
/// Sub-millimetre jitter of a control point keeps the key stable.
pub fn cut_key(control_points: &[Point3]) -> CutKey {
    let mut hasher = DefaultHasher::new();
    control_points.len().hash(&mut hasher);
    for p in control_points {
        millimetres(p.x).hash(&mut hasher);
        millimetres(p.y).hash(&mut hasher);
        millimetres(p.z).hash(&mut hasher);
    }
    hasher.finish()
}

/// Outcome of [`ProfileSession::observe_cut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutStatus {
    /// Same cut as before; keep ingesting.
    Unchanged,
    /// New cut; accumulated buckets were dropped.
    Reset,
    /// Fewer than two control points. Nothing should be ingested.
    Invalid,
}

/// Profile state for one cut, owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct ProfileSession {
    binner: ProfileBinner,
    key: Option<CutKey>,
}

impl ProfileSession {
    pub fn new(config: &ProfileConfig) -> Self {
        Self {
            binner: ProfileBinner::new(config),
            key: None,
        }
    }

    pub fn binner(&self) -> &ProfileBinner {
        &self.binner
    }

    pub fn key(&self) -> Option<CutKey> {
        self.key
    }

    /// Compare the cut against the one being accumulated and reset if it changed.
    pub fn observe_cut(&mut self, control_points: &[Point3]) -> CutStatus {
        if control_points.len() < 2 {
            self.remove();
            return CutStatus::Invalid;
        }
        let key = cut_key(control_points);
        if self.key == Some(key) {
            return CutStatus::Unchanged;
        }
        debug!(
            "profile cut changed ({} control points), dropping {} buckets",
            control_points.len(),
            self.binner.bucket_count()
        );
        self.binner.clear();
        self.key = Some(key);
        CutStatus::Reset
    }

    /// Ingest a segment of the current cut. Ignored while no valid cut is set.
    pub fn ingest(&mut self, segment: &Segment) {
        if self.key.is_none() {
            return;
        }
        self.binner.ingest(segment);
    }

    /// The profile was removed from the scene.
    pub fn remove(&mut self) {
        self.binner.clear();
        self.key = None;
    }

    pub fn snapshot(&self) -> Vec<ProfilePoint> {
        self.binner.snapshot()
    }

    pub fn raw_snapshot(&self) -> Vec<ProfilePoint> {
        self.binner.raw_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cut() -> Vec<Point3> {
        vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)]
    }

    fn segment() -> Segment {
        Segment::new(Point3::default(), 10.0, vec![Point3::new(1.0, 0.0, 3.0)])
    }

    #[test]
    fn key_ignores_sub_millimetre_jitter() {
        let a = cut();
        let mut b = cut();
        b[1].x += 0.0001;
        assert_eq!(cut_key(&a), cut_key(&b));

        b[1].x += 0.01;
        assert_ne!(cut_key(&a), cut_key(&b));
    }

    #[test]
    fn key_depends_on_point_order() {
        let a = cut();
        let b: Vec<Point3> = a.iter().rev().copied().collect();
        assert_ne!(cut_key(&a), cut_key(&b));
    }

    #[test]
    fn same_cut_keeps_buckets() {
        let mut session = ProfileSession::default();
        assert_eq!(session.observe_cut(&cut()), CutStatus::Reset);
        session.ingest(&segment());
        assert_eq!(session.observe_cut(&cut()), CutStatus::Unchanged);
        assert_eq!(session.snapshot().len(), 1);
    }

    #[test]
    fn moved_cut_clears_buckets() {
        let mut session = ProfileSession::default();
        session.observe_cut(&cut());
        session.ingest(&segment());

        let mut moved = cut();
        moved[0].y = 1.0;
        assert_eq!(session.observe_cut(&moved), CutStatus::Reset);
        assert!(session.snapshot().is_empty());
        assert_eq!(session.binner().segment_start_distance(), 0.0);
    }

    #[test]
    fn short_cut_is_invalid_and_blocks_ingest() {
        let mut session = ProfileSession::default();
        session.observe_cut(&cut());
        session.ingest(&segment());

        assert_eq!(session.observe_cut(&cut()[..1]), CutStatus::Invalid);
        assert!(session.key().is_none());
        session.ingest(&segment());
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn remove_forgets_cut() {
        let mut session = ProfileSession::default();
        session.observe_cut(&cut());
        session.ingest(&segment());
        session.remove();
        assert!(session.snapshot().is_empty());
        assert_eq!(session.observe_cut(&cut()), CutStatus::Reset);
    }
}
