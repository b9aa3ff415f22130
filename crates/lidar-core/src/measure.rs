//! Geometry behind the viewer's measuring tools: distances, areas, angles,
//! circles and bearings. Angles are radians throughout.
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::point::Point3;

/// Circle through three points in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point3,
    pub radius: f64,
    /// Unit normal of the circle's plane.
    pub normal: Point3,
}

/// Sum of 3D edge lengths.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Sum of edge lengths on the horizontal plane.
pub fn horizontal_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].horizontal_distance(w[1])).sum()
}

/// Area of the closed polygon projected onto the horizontal plane (shoelace).
/// Returns 0 for fewer than three vertices.
pub fn polygon_area(points: &[Point3]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Angle at `vertex` between the arms towards `prev` and `next`.
/// `None` if either arm has zero length.
pub fn angle_at(prev: Point3, vertex: Point3, next: Point3) -> Option<f64> {
    let u = prev - vertex;
    let v = next - vertex;
    let denom = u.length() * v.length();
    if denom == 0.0 {
        return None;
    }
    Some((u.dot(v) / denom).clamp(-1.0, 1.0).acos())
}

/// Circumscribed circle of `a`, `b`, `c`. `None` when the points are collinear.
///
///   n = (b − a) × (c − a)
///   center = a + (|c − a|² (n × (b − a)) + |b − a|² ((c − a) × n)) / (2 |n|²)
pub fn circle_through(a: Point3, b: Point3, c: Point3) -> Option<Circle> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(ac);
    let n_len = n.length();
    if n_len <= f64::EPSILON * ab.length() * ac.length() {
        return None;
    }
    let n2 = n_len * n_len;
    let offset = (n.cross(ab) * ac.dot(ac) + ac.cross(n) * ab.dot(ab)) * (1.0 / (2.0 * n2));
    let center = a + offset;
    Some(Circle {
        center,
        radius: offset.length(),
        normal: n * (1.0 / n_len),
    })
}

/// Horizontal bearing from `from` to `to`, clockwise from +y (north), in [0, 2π).
/// `None` when both points share a horizontal position.
pub fn azimuth(from: Point3, to: Point3) -> Option<f64> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let a = dx.atan2(dy).rem_euclid(TAU);
    Some(if a >= TAU { 0.0 } else { a })
}

pub fn height_difference(a: Point3, b: Point3) -> f64 {
    b.z - a.z
}

/// Everything the measuring tools display for a set of picked points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub length: f64,
    pub horizontal_length: f64,
    pub height_difference: f64,
    pub area: f64,
    /// Angle at each interior vertex; `None` for degenerate arms.
    pub angles: Vec<Option<f64>>,
    /// Bearing of each edge.
    pub azimuths: Vec<Option<f64>>,
    /// Only present for exactly three points.
    pub circle: Option<Circle>,
}

pub fn measure(points: &[Point3]) -> Measurement {
    let height_difference = match (points.first(), points.last()) {
        (Some(&a), Some(&b)) => height_difference(a, b),
        _ => 0.0,
    };
    let circle = match points {
        [a, b, c] => circle_through(*a, *b, *c),
        _ => None,
    };
    Measurement {
        length: polyline_length(points),
        horizontal_length: horizontal_length(points),
        height_difference,
        area: polygon_area(points),
        angles: points.windows(3).map(|w| angle_at(w[0], w[1], w[2])).collect(),
        azimuths: points.windows(2).map(|w| azimuth(w[0], w[1])).collect(),
        circle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_area_ignores_elevation() {
        let square = [p(0.0, 0.0, 0.0), p(2.0, 0.0, 5.0), p(2.0, 2.0, 1.0), p(0.0, 2.0, 9.0)];
        assert_abs_diff_eq!(polygon_area(&square), 4.0, epsilon = 1e-12);
        // Orientation does not matter.
        let reversed: Vec<Point3> = square.iter().rev().copied().collect();
        assert_abs_diff_eq!(polygon_area(&reversed), 4.0, epsilon = 1e-12);
        assert_eq!(polygon_area(&square[..2]), 0.0);
    }

    #[test]
    fn right_angle() {
        let a = angle_at(p(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(0.0, 0.0, 3.0)).unwrap();
        assert_abs_diff_eq!(a, FRAC_PI_2, epsilon = 1e-12);
        assert!(angle_at(p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn circle_through_unit_circle_points() {
        let c = circle_through(p(1.0, 0.0, 4.0), p(0.0, 1.0, 4.0), p(-1.0, 0.0, 4.0)).unwrap();
        assert_abs_diff_eq!(c.radius, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.center.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.center.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.center.z, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.normal.z.abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_have_no_circle() {
        assert!(circle_through(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)).is_none());
        assert!(circle_through(p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn azimuth_compass_points() {
        let o = p(0.0, 0.0, 0.0);
        assert_abs_diff_eq!(azimuth(o, p(0.0, 1.0, 0.0)).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(azimuth(o, p(1.0, 0.0, 0.0)).unwrap(), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(azimuth(o, p(0.0, -1.0, 0.0)).unwrap(), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(azimuth(o, p(-1.0, 0.0, 0.0)).unwrap(), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert!(azimuth(o, p(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn measure_summary_of_triangle() {
        let pts = [p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(3.0, 4.0, 2.0)];
        let m = measure(&pts);
        assert_abs_diff_eq!(m.horizontal_length, 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.area, 6.0, epsilon = 1e-12);
        assert_eq!(m.height_difference, 2.0);
        assert_eq!(m.angles.len(), 1);
        assert_eq!(m.azimuths.len(), 2);
        assert!(m.circle.is_some());
    }

    #[test]
    fn measure_empty_input() {
        let m = measure(&[]);
        assert_eq!(m.length, 0.0);
        assert!(m.angles.is_empty());
        assert!(m.azimuths.is_empty());
        assert!(m.circle.is_none());
    }
}
