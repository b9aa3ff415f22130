//! Browser bindings for the viewer's numeric core.
//!
//! The viewer polls its point-cloud library on a timer and hands the raw
//! `Float64Array` buffers it gets back to these functions. State lives in
//! [`LineProfile`] instances owned by the JS side, one per displayed cut.
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

use lidar_core::profile::profile_csv_string;
use lidar_core::{
    compute_robust_range, AnalysisConfig, CutStatus, Point3, ProfilePoint, ProfileSession, Segment,
};

fn to_js_error<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Interleaved `x, y, z` values as points; a trailing partial triple is dropped.
fn points_from_interleaved(values: &[f64]) -> Vec<Point3> {
    values
        .chunks_exact(3)
        .map(|c| Point3::from([c[0], c[1], c[2]]))
        .collect()
}

fn point_from_slice(values: &[f64]) -> Result<Point3, String> {
    match values {
        &[x, y, z] => Ok(Point3::from([x, y, z])),
        _ => Err(format!("expected 3 coordinates, got {}", values.len())),
    }
}

fn status_name(status: CutStatus) -> &'static str {
    match status {
        CutStatus::Unchanged => "unchanged",
        CutStatus::Reset => "reset",
        CutStatus::Invalid => "invalid",
    }
}

/// `distance, min, max` triples for charting.
fn chart_triples(points: &[ProfilePoint]) -> Vec<f64> {
    points
        .iter()
        .flat_map(|p| [p.distance, p.min_elevation, p.max_elevation])
        .collect()
}

/// Trimmed `{ min, max }` of sampled elevations, or `undefined` when there is
/// nothing to estimate from (keep the previous gradient range).
#[wasm_bindgen(js_name = robustRange)]
pub fn robust_range(values: &[f64]) -> Result<JsValue, JsValue> {
    match compute_robust_range(values) {
        Some(range) => serde_wasm_bindgen::to_value(&range).map_err(to_js_error),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Accumulated line profile for a single cut.
#[wasm_bindgen]
pub struct LineProfile {
    session: ProfileSession,
}

#[wasm_bindgen]
impl LineProfile {
    /// `config_json` is an optional `AnalysisConfig` JSON document.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<LineProfile, JsValue> {
        let config = match config_json {
            Some(json) => AnalysisConfig::from_json_str(&json).map_err(to_js_error)?,
            None => AnalysisConfig::default(),
        };
        Ok(Self {
            session: ProfileSession::new(&config.profile),
        })
    }

    /// Returns `"unchanged"`, `"reset"` or `"invalid"`.
    #[wasm_bindgen(js_name = observeCut)]
    pub fn observe_cut(&mut self, control_points: &[f64]) -> String {
        let points = points_from_interleaved(control_points);
        status_name(self.session.observe_cut(&points)).to_string()
    }

    pub fn ingest(
        &mut self,
        start: &[f64],
        length: f64,
        positions: &[f64],
        count: usize,
    ) -> Result<(), JsValue> {
        let start = point_from_slice(start).map_err(to_js_error)?;
        let segment =
            Segment::from_interleaved(start, length, positions, count).map_err(to_js_error)?;
        self.session.ingest(&segment);
        Ok(())
    }

    /// Smoothed profile points, ascending by distance.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.snapshot()).map_err(to_js_error)
    }

    /// Smoothed profile flattened to `distance, min, max` triples.
    #[wasm_bindgen(js_name = chartSeries)]
    pub fn chart_series(&self) -> Float64Array {
        let triples = chart_triples(&self.session.snapshot());
        Float64Array::from(triples.as_slice())
    }

    #[wasm_bindgen(js_name = toCsv)]
    pub fn to_csv(&self) -> Result<String, JsValue> {
        profile_csv_string(&self.session.snapshot()).map_err(to_js_error)
    }

    pub fn remove(&mut self) {
        self.session.remove();
    }
}
