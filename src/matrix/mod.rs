//! Lower-triangular comparison matrix over an ordered version list.
//!
//! Cell (i, j) exists only when j < i: row `i` is the left version, column
//! `j` the right one. Every unordered pair is compared exactly once and the
//! diagonal stays empty.
//!
//! The matrix serializes as an array of rows holding cells or `null`, which
//! is also the on-disk heatmap cache format.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::loc::LineCountMap;

/// One compared pair of versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCell {
    pub left: String,
    pub right: String,
    pub loc_left: u64,
    pub loc_right: u64,
    /// Duplicated lines reported by the similarity tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ComparisonCell {
    pub fn new(left: &str, right: &str, loc_left: u64, loc_right: u64) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            loc_left,
            loc_right,
            matches: None,
            ratio: None,
            color: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonMatrix {
    rows: Vec<Vec<Option<ComparisonCell>>>,
}

/// Number of distinct unordered pairs among `n` versions.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

impl ComparisonMatrix {
    /// Build the skeleton for `versions`, copying line counts from `loc`.
    /// Versions without a line count get 0.
    pub fn build(versions: &[String], loc: &LineCountMap) -> Self {
        let lines_of = |v: &String| -> u64 {
            loc.get(v).copied().unwrap_or_else(|| {
                warn!("no line count for version {v}, using 0");
                0
            })
        };
        let totals: Vec<u64> = versions.iter().map(lines_of).collect();

        let rows = versions
            .iter()
            .enumerate()
            .map(|(i, left)| {
                versions
                    .iter()
                    .enumerate()
                    .map(|(j, right)| {
                        (j < i).then(|| ComparisonCell::new(left, right, totals[i], totals[j]))
                    })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Option<ComparisonCell>>] {
        &self.rows
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Populated cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &ComparisonCell> {
        self.rows.iter().flat_map(|row| row.iter().flatten())
    }

    /// Populated cells in row-major order, mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut ComparisonCell> {
        self.rows.iter_mut().flat_map(|row| row.iter_mut().flatten())
    }

    pub fn populated(&self) -> usize {
        self.cells().count()
    }

    /// Load a matrix previously written by [`ComparisonMatrix::save`].
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read heatmap cache {}: {e}", path.display()))?;
        let matrix: Self = serde_json::from_str(&content)
            .map_err(|e| format!("invalid heatmap cache {}: {e}", path.display()))?;
        Ok(matrix)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
