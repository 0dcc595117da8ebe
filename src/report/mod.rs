//! HTML reports: a lines-of-code bar chart and a similarity heatmap.
//!
//! Both are self-contained files built from embedded templates. The
//! heatmap needs the matrix augmented first: every cell gets a normalized
//! similarity ratio, a color and a size derived from the versions' line
//! counts.

mod barchart;
mod heatmap;
mod html;

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::color::color_for;
use crate::loc::LineCountMap;
use crate::matrix::ComparisonMatrix;
use crate::normalize::{DEFAULT_PLACES, find_mean, find_min_max, minmax, raw_ratio, round};

pub use barchart::{BarRow, chart_rows, render_barchart};
pub use heatmap::render_heatmap;

pub const BARCHART_FILE: &str = "barchart.html";
pub const HEATMAP_FILE: &str = "heatmap.html";

/// Smallest and largest rendered cell edge, in pixels.
pub const MIN_CELL_PX: f64 = 10.0;
pub const MAX_CELL_PX: f64 = 30.0;

/// Matrix-wide figures computed while augmenting the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapSummary {
    /// Mean of the raw (un-normalized) ratios, if any pair was compared.
    pub mean_ratio: Option<f64>,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

fn scale_px(unit: f64) -> f64 {
    round(unit * (MAX_CELL_PX - MIN_CELL_PX) + MIN_CELL_PX, DEFAULT_PLACES)
}

/// Fill `ratio`, `color`, `width` and `height` for every populated cell.
///
/// The stored ratio is relative to the observed range of raw ratios, so the
/// most similar pair is always 1 and the least similar always 0.
pub fn augment(matrix: &mut ComparisonMatrix) -> HeatmapSummary {
    for cell in matrix.cells_mut() {
        cell.ratio = Some(raw_ratio(
            cell.matches.unwrap_or(0),
            cell.loc_left,
            cell.loc_right,
        ));
    }

    let ratio_range = find_min_max(matrix, |c| c.ratio.unwrap_or(0.0));
    let left_range = find_min_max(matrix, |c| c.loc_left as f64);
    let right_range = find_min_max(matrix, |c| c.loc_right as f64);
    let mean_ratio = find_mean(matrix, |c| c.ratio.unwrap_or(0.0));

    for cell in matrix.cells_mut() {
        let ratio = minmax(
            cell.ratio.unwrap_or(0.0),
            ratio_range.min,
            ratio_range.max,
            DEFAULT_PLACES,
        );
        cell.ratio = Some(ratio);
        cell.color = Some(color_for(ratio).to_string());

        let width = minmax(
            cell.loc_right as f64,
            right_range.min,
            right_range.max,
            DEFAULT_PLACES,
        );
        let height = minmax(
            cell.loc_left as f64,
            left_range.min,
            left_range.max,
            DEFAULT_PLACES,
        );
        cell.width = Some(scale_px(width));
        cell.height = Some(scale_px(height));
    }

    HeatmapSummary {
        mean_ratio,
        min_ratio: ratio_range.min,
        max_ratio: ratio_range.max,
    }
}

/// Render and write `barchart.html` into `output_dir`.
pub fn write_barchart(
    output_dir: &Path,
    versions: &[String],
    loc: &LineCountMap,
) -> Result<(), Box<dyn Error>> {
    let html = render_barchart(&chart_rows(versions, loc));
    fs::write(output_dir.join(BARCHART_FILE), html)?;
    Ok(())
}

/// Render and write `heatmap.html` into `output_dir`. The matrix must
/// already be augmented.
pub fn write_heatmap(
    output_dir: &Path,
    versions: &[String],
    matrix: &ComparisonMatrix,
    summary: &HeatmapSummary,
) -> Result<(), Box<dyn Error>> {
    let html = render_heatmap(versions, matrix, summary);
    fs::write(output_dir.join(HEATMAP_FILE), html)?;
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
