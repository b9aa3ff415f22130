//! Numeric core of the LiDAR viewer.
//!
//! - [`elevation`]: histogram-trimmed elevation range for height colouring.
//! - [`profile`]: line-profile binning, smoothing and CSV export.
//! - [`measure`]: distances, areas, angles, circles and bearings.
//!
//! Everything here is synchronous and owns no global state; callers hold the
//! [`profile::ProfileSession`] for each cut they display.
pub mod config;
pub mod elevation;
pub mod error;
pub mod measure;
pub mod point;
pub mod profile;

pub use config::{AnalysisConfig, ProfileConfig, RangeConfig};
pub use elevation::{compute_robust_range, ElevationRange, RobustRangeEstimator};
pub use error::ProfileError;
pub use point::Point3;
pub use profile::{CutStatus, ProfileBinner, ProfilePoint, ProfileSession, Segment};
