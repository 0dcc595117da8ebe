use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{MAIN_SEPARATOR, Path};

use serde::Deserialize;
use tracing::warn;

use super::LineCountMap;
use crate::version::VersionDirs;

/// The columns we need from a `cloc --by-file --csv` row. Other columns
/// (language, the trailing tool banner) are ignored.
#[derive(Debug, Deserialize)]
struct ClocRow {
    filename: String,
    blank: u64,
    comment: u64,
    code: u64,
}

/// Extract the version from a reported file name: the first path segment
/// enclosed by two `separator` characters. For `input/1.2/src/a.js` that
/// is `1.2`.
pub fn version_from_filename(filename: &str, separator: char) -> Option<&str> {
    let mut rest = filename;
    while let Some(start) = rest.find(separator) {
        rest = &rest[start + separator.len_utf8()..];
        match rest.find(separator) {
            Some(0) => continue,
            Some(end) => return Some(&rest[..end]),
            None => return None,
        }
    }
    None
}

/// Fold a cloc CSV report into per-version totals, attributing each file
/// with `version_of`. Files it cannot place are left out.
fn fold_report<R, F>(reader: R, version_of: F) -> Result<LineCountMap, Box<dyn Error>>
where
    R: Read,
    F: Fn(&str) -> Option<String>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut map = LineCountMap::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        // cloc's header carries a trailing banner column that data rows
        // lack, so pair the fields with as many header names as they have.
        let width = record.len().min(headers.len());
        let names: csv::StringRecord = headers.iter().take(width).collect();
        let fields: csv::StringRecord = record.iter().take(width).collect();
        // The SUM row has no file name and no version in it.
        let row: ClocRow = match fields.deserialize(Some(&names)) {
            Ok(row) => row,
            Err(err) => {
                warn!("skipping cloc row {}: {err}", i + 2);
                continue;
            }
        };
        if let Some(version) = version_of(&row.filename) {
            *map.entry(version).or_insert(0) += row.code + row.comment + row.blank;
        }
    }

    Ok(map)
}

/// Fold a cloc CSV report into per-version totals, splitting file names on
/// `separator`.
pub fn parse_cloc_reader<R: Read>(
    reader: R,
    separator: char,
) -> Result<LineCountMap, Box<dyn Error>> {
    fold_report(reader, |f| version_from_filename(f, separator).map(String::from))
}

/// Read a cloc CSV report from disk using the platform path separator.
pub fn parse_cloc_csv(path: &Path) -> Result<LineCountMap, Box<dyn Error>> {
    let file = File::open(path)
        .map_err(|e| format!("cannot read cloc report {}: {e}", path.display()))?;
    parse_cloc_reader(file, MAIN_SEPARATOR)
}

/// Read a report that cloc wrote for `dirs`. Each file goes to the version
/// whose directory contains it, which also works for absolute or nested
/// input directories. Unmatched files fall back to the separator rule.
pub fn parse_cloc_for_dirs(
    path: &Path,
    dirs: &VersionDirs,
) -> Result<LineCountMap, Box<dyn Error>> {
    let file = File::open(path)
        .map_err(|e| format!("cannot read cloc report {}: {e}", path.display()))?;
    fold_report(file, |f| {
        let file_path = Path::new(f);
        dirs.iter()
            .filter(|(_, dir)| file_path.starts_with(dir))
            .max_by_key(|(_, dir)| dir.components().count())
            .map(|(version, _)| version.clone())
            .or_else(|| version_from_filename(f, MAIN_SEPARATOR).map(String::from))
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
