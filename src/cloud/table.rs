//! Headerless numeric table parsing.
//!
//! One point per row, coordinates as columns. Cells are separated by commas
//! or semicolons; rows without either fall back to whitespace. Blank lines
//! are skipped. Every cell must be a finite number and every row must have
//! the same width, which must be 2 or 3.

use super::point_cloud::{PointCloud, SUPPORTED_DIMENSIONS};
use crate::error::CloudError;

/// Parse a raw table into a point cloud.
///
/// Any defect rejects the whole table; no partial cloud is ever returned.
pub fn parse(raw: &str) -> Result<PointCloud, CloudError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = parse_row(line, line_no)?;
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(CloudError::malformed(
                    line_no,
                    format!("expected {} columns, found {}", w, row.len()),
                ));
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    let width = width.ok_or_else(|| CloudError::malformed(1, "no data rows"))?;
    if !SUPPORTED_DIMENSIONS.contains(&width) {
        return Err(CloudError::malformed(
            1,
            format!("{} columns per row; points must be 2D or 3D", width),
        ));
    }

    PointCloud::from_rows(&rows)
}

fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>, CloudError> {
    let cells: Vec<&str> = if line.contains([',', ';']) {
        line.split([',', ';']).map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };

    cells
        .into_iter()
        .enumerate()
        .map(|(col, cell)| parse_cell(cell, line_no, col + 1))
        .collect()
}

fn parse_cell(cell: &str, line_no: usize, col: usize) -> Result<f64, CloudError> {
    if cell.is_empty() {
        return Err(CloudError::malformed(line_no, format!("column {} is empty", col)));
    }
    let value: f64 = cell.parse().map_err(|_| {
        CloudError::malformed(line_no, format!("column {}: '{}' is not a number", col, cell))
    })?;
    if !value.is_finite() {
        return Err(CloudError::malformed(
            line_no,
            format!("column {}: '{}' is not finite", col, cell),
        ));
    }
    Ok(value)
}
