//! Lines of code per version, via `cloc`.
//!
//! `cloc` runs once over every version directory and writes a by-file CSV
//! report. The report is then folded into a version → total lines map. A
//! previously written report can be read back as a cache.

mod cloc;
mod parse;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

use crate::cli::Language;
use crate::config::ClocConfig;
use crate::version::VersionDirs;

use parse::parse_cloc_for_dirs;

pub use parse::parse_cloc_csv;

/// Total lines (code + comment + blank) per version.
pub type LineCountMap = BTreeMap<String, u64>;

/// File name of the report written into the output directory.
pub const CLOC_REPORT: &str = "cloc.csv";

/// Run `cloc` over all version directories, write its report to
/// `<output_dir>/cloc.csv` and parse it.
pub fn count_lines(
    config: &ClocConfig,
    language: Language,
    dirs: &VersionDirs,
    output_dir: &Path,
) -> Result<LineCountMap, Box<dyn Error>> {
    if dirs.is_empty() {
        return Ok(LineCountMap::new());
    }
    let report = output_dir.join(CLOC_REPORT);
    cloc::run(config, language, dirs.values(), &report)?;
    parse_cloc_for_dirs(&report, dirs)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
