//! Line profiles: vertical cross-sections of a point cloud along a polyline.
//!
//! Points arrive in per-edge [`Segment`]s, are binned every `bin_size` metres
//! of horizontal distance along the cut, and are read back as a smoothed
//! min/max elevation sequence.
pub mod binner;
pub mod export;
pub mod segment;
pub mod session;
pub mod smoothing;

pub use binner::{Bucket, ProfileBinner, ProfilePoint};
pub use export::{profile_csv_string, write_profile_csv};
pub use segment::{extract_segments, Segment};
pub use session::{cut_key, CutKey, CutStatus, ProfileSession};
pub use smoothing::smooth_profile;
