use std::io::Write;

use crate::error::ProfileError;
use crate::point::Point3;

use super::binner::ProfilePoint;

pub const CSV_HEADER: [&str; 9] = [
    "distance",
    "min_elevation",
    "max_elevation",
    "min_x",
    "min_y",
    "min_z",
    "max_x",
    "max_y",
    "max_z",
];

fn coords(p: Option<Point3>) -> [String; 3] {
    match p {
        Some(p) => [p.x.to_string(), p.y.to_string(), p.z.to_string()],
        None => [String::new(), String::new(), String::new()],
    }
}

/// Write a profile as CSV, one row per point. Absent source points leave
/// their coordinate cells empty.
pub fn write_profile_csv<W: Write>(writer: W, points: &[ProfilePoint]) -> Result<(), ProfileError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for point in points {
        let [min_x, min_y, min_z] = coords(point.min_point);
        let [max_x, max_y, max_z] = coords(point.max_point);
        wtr.write_record([
            point.distance.to_string(),
            point.min_elevation.to_string(),
            point.max_elevation.to_string(),
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Convenience wrapper returning the CSV as a string.
pub fn profile_csv_string(points: &[ProfilePoint]) -> Result<String, ProfileError> {
    let mut buf = Vec::new();
    write_profile_csv(&mut buf, points)?;
    // csv only emits the UTF-8 we hand it.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
