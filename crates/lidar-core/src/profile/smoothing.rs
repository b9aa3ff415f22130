use super::binner::ProfilePoint;

/// Three-point weighted moving average over min and max elevation.
///
/// Interior points become `w0·prev + w1·cur + w2·next`, computed from the
/// unsmoothed neighbours. The first and last points, and all source
/// coordinates, pass through unchanged. Fewer than three points are returned
/// as-is.
pub fn smooth_profile(points: &[ProfilePoint], weights: [f64; 3]) -> Vec<ProfilePoint> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let [w_prev, w_cur, w_next] = weights;

    let mut out = points.to_vec();
    for (i, window) in points.windows(3).enumerate() {
        let (prev, cur, next) = (&window[0], &window[1], &window[2]);
        let target = &mut out[i + 1];
        target.min_elevation =
            w_prev * prev.min_elevation + w_cur * cur.min_elevation + w_next * next.min_elevation;
        target.max_elevation =
            w_prev * prev.max_elevation + w_cur * cur.max_elevation + w_next * next.max_elevation;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point3;

    const WEIGHTS: [f64; 3] = [0.25, 0.5, 0.25];

    fn profile(mins: &[f64]) -> Vec<ProfilePoint> {
        mins.iter()
            .enumerate()
            .map(|(i, &z)| ProfilePoint {
                distance: i as f64 * 0.2,
                min_elevation: z,
                max_elevation: z + 1.0,
                min_point: Some(Point3::new(i as f64, 0.0, z)),
                max_point: None,
            })
            .collect()
    }

    #[test]
    fn fewer_than_three_points_pass_through() {
        let raw = profile(&[10.0, 30.0]);
        assert_eq!(smooth_profile(&raw, WEIGHTS), raw);
        assert!(smooth_profile(&[], WEIGHTS).is_empty());
    }

    #[test]
    fn peak_is_blended_with_neighbours() {
        let raw = profile(&[10.0, 30.0, 10.0]);
        let smoothed = smooth_profile(&raw, WEIGHTS);
        assert_eq!(smoothed[0].min_elevation, 10.0);
        assert_eq!(smoothed[1].min_elevation, 20.0);
        assert_eq!(smoothed[1].max_elevation, 21.0);
        assert_eq!(smoothed[2].min_elevation, 10.0);
    }

    #[test]
    fn linear_ramp_unchanged() {
        let raw = profile(&[10.0, 20.0, 30.0, 40.0]);
        let smoothed = smooth_profile(&raw, WEIGHTS);
        for (a, b) in raw.iter().zip(&smoothed) {
            assert!((a.min_elevation - b.min_elevation).abs() < 1e-12);
        }
    }

    #[test]
    fn uses_raw_neighbours_and_keeps_coordinates() {
        let raw = profile(&[0.0, 8.0, 0.0, 8.0]);
        let smoothed = smooth_profile(&raw, WEIGHTS);
        // Index 2 blends raw 8, 0, 8, not the already smoothed index 1.
        assert_eq!(smoothed[1].min_elevation, 4.0);
        assert_eq!(smoothed[2].min_elevation, 4.0);
        assert_eq!(smoothed[3].min_elevation, 8.0);
        for (a, b) in raw.iter().zip(&smoothed) {
            assert_eq!(a.min_point, b.min_point);
            assert_eq!(a.distance, b.distance);
        }
    }
}
