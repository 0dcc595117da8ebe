//! Runs the comparator over every populated matrix cell, a batch at a time.
//!
//! Up to `batch_size` comparisons run at once. The next batch is issued
//! only after every comparison in the current one has finished, so a slow
//! comparison holds back the slots freed by fast ones. This keeps the
//! number of live child processes and open report files bounded.

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::compare::{CompareError, Comparator};
use crate::matrix::{ComparisonCell, ComparisonMatrix};
use crate::version::VersionDirs;

/// Tally of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
}

impl BatchStats {
    fn record(&mut self, ok: bool) {
        self.processed += 1;
        if !ok {
            self.failed += 1;
        }
    }
}

fn compare_cell<C: Comparator + ?Sized>(
    cell: &ComparisonCell,
    dirs: &VersionDirs,
    comparator: &C,
) -> Result<u64, CompareError> {
    let left = dirs
        .get(&cell.left)
        .ok_or_else(|| CompareError::UnknownVersion(cell.left.clone()))?;
    let right = dirs
        .get(&cell.right)
        .ok_or_else(|| CompareError::UnknownVersion(cell.right.clone()))?;
    comparator.compare(left, right)
}

/// Fill `matches` for every populated cell. A failed comparison is logged
/// and recorded as 0 matches; it never aborts the run.
pub fn compare_all<C: Comparator + ?Sized>(
    matrix: &mut ComparisonMatrix,
    dirs: &VersionDirs,
    comparator: &C,
    batch_size: usize,
    progress: &ProgressBar,
) -> Result<BatchStats, Box<dyn Error>> {
    let batch_size = batch_size.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(batch_size)
        .thread_name(|i| format!("versus-compare-{i}"))
        .build()?;

    let mut cells: Vec<&mut ComparisonCell> = matrix.cells_mut().collect();
    let mut stats = BatchStats {
        total: cells.len(),
        ..BatchStats::default()
    };
    let total = stats.total;
    let done = AtomicUsize::new(0);
    progress.set_length(total as u64);

    for batch in cells.chunks_mut(batch_size) {
        let outcomes: Vec<bool> = pool.install(|| {
            batch
                .par_iter_mut()
                .map(|cell| {
                    let result = compare_cell(&**cell, dirs, comparator);
                    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                    progress.inc(1);
                    debug!("Processed: {n}/{total}");
                    match result {
                        Ok(count) => {
                            cell.matches = Some(count);
                            true
                        }
                        Err(err) => {
                            match err.raw_output() {
                                Some(raw) => warn!(
                                    "{} vs {}: {} {err}; raw output:\n{raw}",
                                    cell.left,
                                    cell.right,
                                    comparator.name()
                                ),
                                None => warn!(
                                    "{} vs {}: {} {err}",
                                    cell.left,
                                    cell.right,
                                    comparator.name()
                                ),
                            }
                            cell.matches = Some(0);
                            false
                        }
                    }
                })
                .collect()
        });

        for ok in outcomes {
            stats.record(ok);
        }
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
