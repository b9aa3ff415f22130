//! Elevation statistics used to drive height-based colouring.
pub mod range;
pub mod sampling;

pub use range::{compute_robust_range, raw_extent, ElevationHistogram, ElevationRange, RobustRangeEstimator};
pub use sampling::{sample_elevations, sample_stride};
