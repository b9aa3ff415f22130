//! Profile segments: one batch of points covering one edge of a cut.
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::point::Point3;

/// Points returned for one edge of a profile cut.
///
/// Point distances are measured from `start`; `length` is the horizontal
/// length of the edge and is what the binner advances by once the segment is
/// consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3,
    pub length: f64,
    pub points: Vec<Point3>,
}

impl Segment {
    pub fn new(start: Point3, length: f64, points: Vec<Point3>) -> Self {
        Self { start, length, points }
    }

    /// Build a segment from an interleaved `x, y, z, x, y, z, …` buffer holding
    /// `count` points. Trailing values beyond `count * 3` are ignored.
    pub fn from_interleaved(
        start: Point3,
        length: f64,
        positions: &[f64],
        count: usize,
    ) -> Result<Self, ProfileError> {
        let needed = count * 3;
        if positions.len() < needed {
            return Err(ProfileError::PositionBufferTooShort {
                len: positions.len(),
                count,
                needed,
            });
        }
        let points = positions[..needed]
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self::new(start, length, points))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Split `points` into one segment per edge of `polyline`.
///
/// A point belongs to an edge when its horizontal projection falls within the
/// edge (parameter `t` in `[0, 1)`, the last edge also takes `t == 1`) and it
/// lies no further than `width / 2` from the edge line. Degenerate edges
/// yield an empty segment of zero length.
pub fn extract_segments(
    polyline: &[Point3],
    points: &[Point3],
    width: f64,
) -> Result<Vec<Segment>, ProfileError> {
    if polyline.len() < 2 {
        return Err(ProfileError::TooFewControlPoints(polyline.len()));
    }
    if !(width.is_finite() && width > 0.0) {
        return Err(ProfileError::InvalidWidth(width));
    }
    let half_width = width / 2.0;
    let last_edge = polyline.len() - 2;

    let segments = polyline
        .windows(2)
        .enumerate()
        .map(|(edge, pair)| {
            let (a, b) = (pair[0], pair[1]);
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let len2 = dx * dx + dy * dy;
            if len2 == 0.0 {
                return Segment::new(a, 0.0, Vec::new());
            }
            let length = len2.sqrt();

            let members = points
                .iter()
                .filter(|p| {
                    let px = p.x - a.x;
                    let py = p.y - a.y;
                    let t = (px * dx + py * dy) / len2;
                    let within = if edge == last_edge {
                        (0.0..=1.0).contains(&t)
                    } else {
                        (0.0..1.0).contains(&t)
                    };
                    within && (px * dy - py * dx).abs() / length <= half_width
                })
                .copied()
                .collect();

            Segment::new(a, length, members)
        })
        .collect();

    Ok(segments)
}
