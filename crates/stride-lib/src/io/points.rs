use crate::activity::ActivityPoint;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PointRow {
    #[serde(alias = "seconds", alias = "seconds_since_start")]
    time: f64,
    #[serde(default, alias = "heartrate", alias = "hr")]
    heart_rate: Option<f64>,
    #[serde(default, alias = "watts")]
    power: Option<f64>,
    #[serde(default)]
    cadence: Option<f64>,
    #[serde(default, alias = "altitude")]
    elevation: Option<f64>,
    #[serde(default, alias = "cumulative_distance")]
    distance: Option<f64>,
}

impl From<PointRow> for ActivityPoint {
    fn from(row: PointRow) -> Self {
        ActivityPoint {
            seconds_since_start: row.time,
            heart_rate: row.heart_rate,
            power: row.power,
            cadence: row.cadence,
            elevation: row.elevation,
            cumulative_distance: row.distance,
        }
    }
}

/// Read activity points from CSV with a header row.
///
/// `time` is required; `heart_rate`, `power`, `cadence`, `elevation` and `distance` are
/// optional columns and empty cells are treated as missing readings.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<ActivityPoint>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut points = Vec::new();
    for (idx, row) in reader.deserialize::<PointRow>().enumerate() {
        let row = row.with_context(|| format!("reading point {}", idx + 1))?;
        points.push(row.into());
    }
    Ok(points)
}

pub fn read_points_csv(path: &Path) -> Result<Vec<ActivityPoint>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_points(file).with_context(|| format!("parsing {}", path.display()))
}
