//! Matrix-wide statistics and min-max scaling.

use crate::matrix::{ComparisonCell, ComparisonMatrix};

/// Decimal places kept by [`minmax`] unless told otherwise.
pub const DEFAULT_PLACES: u32 = 3;

/// Observed range of a metric. `min == max == 0` also stands for "no data".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

/// Round half away from zero to `places` decimals.
pub fn round(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Scale `value` into [0, 1] relative to `min..=max`, rounded to `places`.
/// A flat range (`max == min`) has no variation and yields 0.
pub fn minmax(value: f64, min: f64, max: f64, places: u32) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    round((value - min) / span, places)
}

/// Duplicated lines relative to the combined size of both versions.
pub fn raw_ratio(matches: u64, loc_left: u64, loc_right: u64) -> f64 {
    let total = loc_left + loc_right;
    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

/// Smallest and largest `selector(cell)` over the populated cells.
pub fn find_min_max<F>(matrix: &ComparisonMatrix, selector: F) -> MinMax
where
    F: Fn(&ComparisonCell) -> f64,
{
    matrix
        .cells()
        .map(selector)
        .fold(None, |acc: Option<MinMax>, v| {
            Some(match acc {
                None => MinMax { min: v, max: v },
                Some(mm) => MinMax {
                    min: mm.min.min(v),
                    max: mm.max.max(v),
                },
            })
        })
        .unwrap_or_default()
}

/// Mean of `selector(cell)` over the populated cells, or `None` when there
/// are none.
pub fn find_mean<F>(matrix: &ComparisonMatrix, selector: F) -> Option<f64>
where
    F: Fn(&ComparisonCell) -> f64,
{
    let (sum, count) = matrix
        .cells()
        .map(selector)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
