use crate::point::Point3;

/// Smallest stride that keeps at most `max_samples` of `total` items.
/// Always at least 1; `max_samples == 0` means "no limit".
pub fn sample_stride(total: usize, max_samples: usize) -> usize {
    if max_samples == 0 {
        return 1;
    }
    total.div_ceil(max_samples).max(1)
}

/// Elevations of every `stride`-th point, starting with the first.
pub fn sample_elevations(points: &[Point3], max_samples: usize) -> Vec<f64> {
    let stride = sample_stride(points.len(), max_samples);
    points.iter().step_by(stride).map(|p| p.z).collect()
}
