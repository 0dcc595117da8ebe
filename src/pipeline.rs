//! The `compare` run: line counts, bar chart, pairwise comparisons,
//! heatmap, then a terminal summary.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::batch::{BatchStats, compare_all};
use crate::cli::CompareArgs;
use crate::compare::{Comparator, ExternalComparator, Tool};
use crate::config::Config;
use crate::loc::{self, LineCountMap};
use crate::matrix::{ComparisonMatrix, pair_count};
use crate::report::{self, BarRow, HeatmapSummary, chart_rows};
use crate::report_helpers;
use crate::version::{VersionDirs, list_versions, version_dirs};

/// File name of the matrix cache written into the output directory.
pub const HEATMAP_CACHE: &str = "heatmap.json";

/// Everything printed at the end of a run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub versions: Vec<BarRow>,
    pub comparisons: BatchStats,
    pub matrix_from_cache: bool,
    pub heatmap: HeatmapSummary,
    pub reports: Vec<PathBuf>,
}

fn line_counts(
    args: &CompareArgs,
    config: &Config,
    dirs: &VersionDirs,
) -> Result<LineCountMap, Box<dyn Error>> {
    if args.use_cloc_cache {
        info!("reading line counts from {}", args.cloc_cache_file.display());
        return loc::parse_cloc_csv(&args.cloc_cache_file);
    }
    info!("counting lines of {} versions", dirs.len());
    loc::count_lines(&config.cloc, args.language, dirs, &args.output_dir)
}

fn progress_bar(total: usize) -> Result<ProgressBar, Box<dyn Error>> {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} comparisons",
    )?);
    Ok(bar)
}

/// Load the cached matrix, or build and fill a fresh one and cache it.
/// The cache is written before augmentation, so it only holds raw counts.
fn comparison_matrix<C: Comparator + ?Sized>(
    args: &CompareArgs,
    versions: &[String],
    loc: &LineCountMap,
    dirs: &VersionDirs,
    comparator: &C,
    batch_size: usize,
) -> Result<(ComparisonMatrix, BatchStats, bool), Box<dyn Error>> {
    if args.use_heatmap_cache {
        info!("reading comparisons from {}", args.heatmap_cache_file.display());
        let matrix = ComparisonMatrix::load(&args.heatmap_cache_file)?;
        if matrix.size() != versions.len() {
            warn!(
                "heatmap cache has {} versions, input has {}",
                matrix.size(),
                versions.len()
            );
        }
        let populated = matrix.populated();
        let stats = BatchStats {
            total: populated,
            processed: populated,
            failed: 0,
        };
        return Ok((matrix, stats, true));
    }

    let mut matrix = ComparisonMatrix::build(versions, loc);
    info!(
        "running {} comparisons with {} in batches of {batch_size}",
        matrix.populated(),
        comparator.name()
    );
    let progress = progress_bar(matrix.populated())?;
    let stats = compare_all(&mut matrix, dirs, comparator, batch_size, &progress)?;
    progress.finish_and_clear();

    matrix.save(&args.output_dir.join(HEATMAP_CACHE))?;
    Ok((matrix, stats, false))
}

/// Run the whole comparison with `comparator` standing in for the
/// language's similarity tool.
pub fn run_with<C: Comparator + ?Sized>(
    args: &CompareArgs,
    config: &Config,
    comparator: &C,
) -> Result<RunSummary, Box<dyn Error>> {
    let batch_size = args.batch_size.unwrap_or(config.batch_size);
    if batch_size == 0 {
        return Err("--batch-size must be at least 1".into());
    }
    check_caches(args)?;

    fs::create_dir_all(&args.output_dir).map_err(|e| {
        format!(
            "cannot create output directory {}: {e}",
            args.output_dir.display()
        )
    })?;

    let versions = list_versions(&args.input_dir)?;
    let dirs = version_dirs(&args.input_dir, args.input_sub_dir.as_deref(), &versions);
    info!(
        "{} versions found, {} comparisons planned",
        versions.len(),
        pair_count(versions.len())
    );

    let loc = line_counts(args, config, &dirs)?;
    report::write_barchart(&args.output_dir, &versions, &loc)?;

    let (mut matrix, comparisons, matrix_from_cache) =
        comparison_matrix(args, &versions, &loc, &dirs, comparator, batch_size)?;
    let heatmap = report::augment(&mut matrix);
    report::write_heatmap(&args.output_dir, &versions, &matrix, &heatmap)?;

    let mut reports = vec![args.output_dir.join(report::BARCHART_FILE)];
    if !matrix_from_cache {
        reports.push(args.output_dir.join(HEATMAP_CACHE));
    }
    reports.push(args.output_dir.join(report::HEATMAP_FILE));

    Ok(RunSummary {
        versions: chart_rows(&versions, &loc),
        comparisons,
        matrix_from_cache,
        heatmap,
        reports,
    })
}

fn print_summary(summary: &RunSummary) {
    let width = report_helpers::max_name_width(
        summary.versions.iter().map(|r| r.version.as_str()),
        "Version".len(),
    );
    let separator = report_helpers::separator(width + 18);

    println!("{separator}");
    println!(
        " {} {:>15}",
        report_helpers::pad_right("Version", width),
        "Lines of Code"
    );
    println!("{separator}");
    for row in &summary.versions {
        println!(
            " {} {:>15}",
            report_helpers::pad_right(&row.version, width),
            row.lines
        );
    }
    println!("{separator}");

    let stats = &summary.comparisons;
    let source = if summary.matrix_from_cache {
        " (cached)"
    } else {
        ""
    };
    println!(
        " Comparisons: {} planned, {} processed, {} failed{source}",
        stats.total, stats.processed, stats.failed
    );
    match summary.heatmap.mean_ratio {
        Some(mean) => println!(" Mean duplicated ratio: {:.1}%", mean * 100.0),
        None => println!(" Mean duplicated ratio: n/a"),
    }
    for path in &summary.reports {
        println!(" Wrote {}", path.display());
    }
}

fn output(summary: &RunSummary, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        report_helpers::print_json_stdout(summary)
    } else {
        print_summary(summary);
        Ok(())
    }
}

pub fn run(args: &CompareArgs, config: &Config) -> Result<(), Box<dyn Error>> {
    let comparator = ExternalComparator::new(Tool::for_language(args.language, config));
    let summary = run_with(args, config, &comparator)?;
    output(&summary, args.json)
}

/// Fail before any work when a requested cache file is missing.
fn check_caches(args: &CompareArgs) -> Result<(), Box<dyn Error>> {
    let required: [(bool, &Path); 2] = [
        (args.use_cloc_cache, &args.cloc_cache_file),
        (args.use_heatmap_cache, &args.heatmap_cache_file),
    ];
    for (enabled, path) in required {
        if enabled && !path.is_file() {
            return Err(format!("cache file {} not found", path.display()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
