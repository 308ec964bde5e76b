/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Two-column measured diffraction data (`.xy`, `.dat`, `.txt`)

use std::fs;
use std::path::Path;

use super::errors::{InputError, Result};
use crate::xrd::ExperimentalSeries;

/// Height of the strongest measured point after normalization
pub const NORMALIZED_MAXIMUM: f64 = 100.0;

/// Read a measured pattern; the series is named after the file stem
pub fn parse<P: AsRef<Path>>(path: P) -> Result<ExperimentalSeries> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_str(&fs::read_to_string(path)?, &name)
}

/// Parse whitespace separated (2θ, intensity) rows.
///
/// Blank lines, comments starting with `#` or `*` and any row whose first two
/// fields are not numbers (column headers) are skipped. Intensities are
/// rescaled so the maximum is 100.
pub fn parse_str(text: &str, name: &str) -> Result<ExperimentalSeries> {
    let mut points = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('*') {
            continue;
        }

        let mut fields = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty());
        if let (Some(x), Some(y)) = (fields.next(), fields.next()) {
            if let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) {
                points.push((x, y));
            }
        }
    }

    if points.is_empty() {
        return Err(InputError::InvalidFormat(format!(
            "no data points in {}",
            if name.is_empty() { "input" } else { name }
        )));
    }

    let max = points.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    if max > 0.0 {
        for (_, y) in &mut points {
            *y = *y / max * NORMALIZED_MAXIMUM;
        }
    }

    log::debug!("Read {} measured points from {}", points.len(), name);
    Ok(ExperimentalSeries::new(name, points))
}
