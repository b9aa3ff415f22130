//! Tunables for range estimation and line profiles, loaded from JSON.
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Parameters of the robust elevation range estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Histogram resolution over [min, max].
    pub bins: usize,
    /// Cumulative fraction trimmed from the low end (0.01 = 1st percentile).
    pub lower_fraction: f64,
    /// Cumulative fraction kept from the low end (0.99 = 99th percentile).
    pub upper_fraction: f64,
    /// Below this raw extent (metres) the raw range is returned untrimmed.
    pub flat_threshold: f64,
    /// Most elevations fed to the histogram when sampling points; 0 disables sampling.
    pub max_samples: usize,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            bins: 256,
            lower_fraction: 0.01,
            upper_fraction: 0.99,
            flat_threshold: 0.1,
            max_samples: 100_000,
        }
    }
}

impl RangeConfig {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.bins == 0 {
            return Err(ProfileError::InvalidConfig("range.bins must be at least 1".into()));
        }
        let ordered = 0.0 <= self.lower_fraction
            && self.lower_fraction < self.upper_fraction
            && self.upper_fraction <= 1.0;
        if !ordered {
            return Err(ProfileError::InvalidConfig(format!(
                "range fractions must satisfy 0 <= lower ({}) < upper ({}) <= 1",
                self.lower_fraction, self.upper_fraction
            )));
        }
        if !(self.flat_threshold >= 0.0) {
            return Err(ProfileError::InvalidConfig(format!(
                "range.flat_threshold must be >= 0, got {}",
                self.flat_threshold
            )));
        }
        Ok(())
    }
}

/// Parameters of the line-profile binner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Bucket width along the cut, metres.
    pub bin_size: f64,
    /// Previous / current / next weights of the moving average.
    pub smoothing_weights: [f64; 3],
    /// Corridor width used when extracting segments from a raw point set.
    pub default_width: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            bin_size: 0.2,
            smoothing_weights: [0.25, 0.5, 0.25],
            default_width: 1.0,
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(self.bin_size.is_finite() && self.bin_size > 0.0) {
            return Err(ProfileError::InvalidConfig(format!(
                "profile.bin_size must be finite and positive, got {}",
                self.bin_size
            )));
        }
        if self.smoothing_weights.iter().any(|w| !w.is_finite()) {
            return Err(ProfileError::InvalidConfig(
                "profile.smoothing_weights must be finite".into(),
            ));
        }
        if !(self.default_width.is_finite() && self.default_width > 0.0) {
            return Err(ProfileError::InvalidWidth(self.default_width));
        }
        Ok(())
    }
}

/// Top-level configuration, as read from a JSON file or a JS object.
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub range: RangeConfig,
    pub profile: ProfileConfig,
}

impl AnalysisConfig {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        self.range.validate()?;
        self.profile.validate()
    }
}
