//! Streaming min/max binning of profile points by distance along the cut.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ProfileConfig;
use crate::point::Point3;

use super::segment::Segment;
use super::smoothing::smooth_profile;

/// Running elevation extremes of one distance bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub min: f64,
    pub max: f64,
    pub min_point: Point3,
    pub max_point: Point3,
}

impl Bucket {
    fn new(p: Point3) -> Self {
        Self {
            min: p.z,
            max: p.z,
            min_point: p,
            max_point: p,
        }
    }

    fn update(&mut self, p: Point3) {
        if p.z < self.min {
            self.min = p.z;
            self.min_point = p;
        }
        if p.z > self.max {
            self.max = p.z;
            self.max_point = p;
        }
    }
}

/// One displayable sample of a line profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePoint {
    pub distance: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub min_point: Option<Point3>,
    pub max_point: Option<Point3>,
}

/// Accumulates segments of a single cut into fixed-width distance buckets.
///
/// Segments must arrive in cut order; each segment's point distances are
/// offset by the summed lengths of the segments before it.
#[derive(Debug, Clone)]
pub struct ProfileBinner {
    bin_size: f64,
    smoothing_weights: [f64; 3],
    buckets: BTreeMap<i64, Bucket>,
    segment_start_distance: f64,
}

impl Default for ProfileBinner {
    fn default() -> Self {
        Self::new(&ProfileConfig::default())
    }
}

impl ProfileBinner {
    pub fn new(config: &ProfileConfig) -> Self {
        Self {
            bin_size: config.bin_size,
            smoothing_weights: config.smoothing_weights,
            buckets: BTreeMap::new(),
            segment_start_distance: 0.0,
        }
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Distance along the cut already consumed by ingested segments.
    pub fn segment_start_distance(&self) -> f64 {
        self.segment_start_distance
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, index: i64) -> Option<&Bucket> {
        self.buckets.get(&index)
    }

    #[inline]
    fn bucket_index(&self, distance: f64) -> i64 {
        (distance / self.bin_size).floor() as i64
    }

    /// Bin every point of `segment`, then advance the distance offset by the
    /// segment's length.
    pub fn ingest(&mut self, segment: &Segment) {
        let start = segment.start;
        for &p in &segment.points {
            let distance = self.segment_start_distance + start.horizontal_distance(p);
            let index = self.bucket_index(distance);
            self.buckets
                .entry(index)
                .and_modify(|b| b.update(p))
                .or_insert_with(|| Bucket::new(p));
        }
        self.segment_start_distance += segment.length;
    }

    /// Drop every bucket and rewind to the start of the cut.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.segment_start_distance = 0.0;
    }

    /// Buckets as profile points in ascending distance, unsmoothed.
    pub fn raw_snapshot(&self) -> Vec<ProfilePoint> {
        // BTreeMap iteration is already in ascending index order.
        self.buckets
            .iter()
            .map(|(&index, b)| ProfilePoint {
                distance: index as f64 * self.bin_size,
                min_elevation: b.min,
                max_elevation: b.max,
                min_point: Some(b.min_point),
                max_point: Some(b.max_point),
            })
            .collect()
    }

    /// Smoothed profile for display and export. Does not modify the binner.
    pub fn snapshot(&self) -> Vec<ProfilePoint> {
        smooth_profile(&self.raw_snapshot(), self.smoothing_weights)
    }
}
