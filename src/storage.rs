//! Reading and writing point sets.
//!
//! CSV input is read by header name, so any table with at least four numeric columns
//! can feed the chart. JSON uses an array of `{ "x", "y", "size", "color" }` rows.

use crate::models::{PointRow, PointSet};
use anyhow::{Context, Result, anyhow, bail};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Which CSV columns feed which channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub x: String,
    pub y: String,
    pub size: String,
    pub color: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            x: "x".into(),
            y: "y".into(),
            size: "size".into(),
            color: "color".into(),
        }
    }
}

/// Load four columns of a headed CSV file. Rows with an empty or non-numeric cell in
/// any of the four columns are an error, reported with their line number.
pub fn load_csv<P: AsRef<Path>>(path: P, columns: &ColumnMap) -> Result<PointSet> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("column `{name}` not found in {}", path.display()))
    };
    let idx = [
        position(&columns.x)?,
        position(&columns.y)?,
        position(&columns.size)?,
        position(&columns.color)?,
    ];

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let mut vals = [0.0f64; 4];
        for (slot, &col) in idx.iter().enumerate() {
            let cell = record.get(col).unwrap_or("");
            vals[slot] = cell.parse::<f64>().map_err(|_| {
                anyhow!(
                    "line {}: `{}` is not a number (column `{}`)",
                    line + 2,
                    cell,
                    &headers[col]
                )
            })?;
        }
        rows.push(PointRow {
            x: vals[0],
            y: vals[1],
            size: vals[2],
            color: vals[3],
        });
    }
    Ok(PointSet::from_rows(&rows))
}

/// Load a JSON array of point rows.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows: Vec<PointRow> = serde_json::from_reader(f)?;
    Ok(PointSet::from_rows(&rows))
}

/// Dispatch on the file extension (`.csv` or `.json`).
pub fn load<P: AsRef<Path>>(path: P, columns: &ColumnMap) -> Result<PointSet> {
    let path = path.as_ref();
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => load_csv(path, columns),
        Some("json") => load_json(path),
        other => bail!("unsupported input format: {:?}", other.unwrap_or("")),
    }
}

/// Save a point set as a pretty JSON array of rows.
pub fn save_json<P: AsRef<Path>>(points: &PointSet, path: P) -> Result<()> {
    points.len()?;
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&points.rows())?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn csv_by_column_name() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("cars.csv");
        std::fs::write(
            &p,
            "Model,Acceleration,Range,Price,Seats\nA, 4.1,400,50000,5\nB,6.0,310,32000,4\n",
        )
        .unwrap();
        let cols = ColumnMap {
            x: "Acceleration".into(),
            y: "Range".into(),
            size: "Seats".into(),
            color: "Price".into(),
        };
        let set = load(&p, &cols).unwrap();
        assert_eq!(set.x, vec![4.1, 6.0]);
        assert_eq!(set.color, vec![50000.0, 32000.0]);
        assert_eq!(set.size, vec![5.0, 4.0]);
    }

    #[test]
    fn csv_reports_bad_cell() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("bad.csv");
        std::fs::write(&p, "x,y,size,color\n1,2,3,4\n1,n/a,3,4\n").unwrap();
        let err = load_csv(&p, &ColumnMap::default()).unwrap_err().to_string();
        assert!(err.contains("line 3"), "{err}");
    }

    #[test]
    fn json_round_trip() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("pts.json");
        let set = PointSet {
            x: vec![0.0, 1.0],
            y: vec![2.0, 3.0],
            size: vec![1.0, 9.0],
            color: vec![-1.0, 1.0],
        };
        save_json(&set, &p).unwrap();
        assert_eq!(load(&p, &ColumnMap::default()).unwrap(), set);
    }
}
