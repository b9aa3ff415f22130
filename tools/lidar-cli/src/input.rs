//! Point input for the CLI: headered CSV files and inline coordinate lists.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;

use lidar_core::Point3;

fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 3]> {
    let mapping: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect();
    let find = |name: &str| {
        mapping
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("missing '{name}' column"))
    };
    Ok([find("x")?, find("y")?, find("z")?])
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str, line: u64) -> Result<f64> {
    let raw = record
        .get(index)
        .ok_or_else(|| anyhow!("line {line}: missing '{name}' value"))?;
    raw.trim()
        .parse()
        .with_context(|| format!("line {line}: failed to parse '{name}' from {raw:?}"))
}

/// Read points from a headered CSV with `x`, `y`, `z` columns in any order.
/// Other columns are ignored.
pub fn read_points_csv(path: &Path) -> Result<Vec<Point3>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let [xi, yi, zi] = column_indices(reader.headers()?)
        .with_context(|| format!("bad header in {}", path.display()))?;

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        points.push(Point3::new(
            parse_field(&record, xi, "x", line)?,
            parse_field(&record, yi, "y", line)?,
            parse_field(&record, zi, "z", line)?,
        ));
    }
    log::debug!("read {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Parse `"x,y,z;x,y,z;…"`. A missing z defaults to 0.
pub fn parse_points(spec: &str) -> Result<Vec<Point3>> {
    spec.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| -> Result<Point3> {
            let coords = item
                .split(',')
                .map(|c| c.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("invalid coordinate in {item:?}"))?;
            match coords.as_slice() {
                [x, y] => Ok(Point3::new(*x, *y, 0.0)),
                [x, y, z] => Ok(Point3::new(*x, *y, *z)),
                _ => bail!("expected 2 or 3 coordinates in {item:?}"),
            }
        })
        .collect()
}
