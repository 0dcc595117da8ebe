//! Version discovery and numeric-aware ordering.
//!
//! A version is the name of a directory under the input directory. Versions
//! sort "naturally": runs of digits compare by numeric value, so `1.2`
//! comes before `1.10`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Maps each version to the directory holding its sources.
pub type VersionDirs = BTreeMap<String, PathBuf>;

/// A maximal run of either ASCII digits or non-digits.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> impl Iterator<Item = Chunk<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_digit = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != is_digit)
            .map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(if is_digit {
            Chunk::Digits(head)
        } else {
            Chunk::Text(head)
        })
    })
}

/// Compare two digit runs by value without parsing (no overflow on long runs).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Numeric-aware comparison of two version strings.
///
/// Digit runs compare by numeric value and everything else compares
/// case-insensitively. Strings that are equal under those rules fall back
/// to plain byte order so the ordering stays total.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => cmp_digits(x, y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => cmp_text(x, y),
            // Digits sort before letters and punctuation.
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

/// Sort versions in place using [`compare_versions`].
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// List the versions under `input_dir`: every non-hidden subdirectory,
/// in natural order.
pub fn list_versions(input_dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let entries = fs::read_dir(input_dir)
        .map_err(|e| format!("cannot read input directory {}: {e}", input_dir.display()))?;

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        versions.push(name);
    }

    sort_versions(&mut versions);
    Ok(versions)
}

/// Map every version to `<input_dir>/<version>[/<sub_dir>]`.
pub fn version_dirs(input_dir: &Path, sub_dir: Option<&Path>, versions: &[String]) -> VersionDirs {
    versions
        .iter()
        .map(|v| {
            let mut dir = input_dir.join(v);
            if let Some(sub) = sub_dir {
                dir.push(sub);
            }
            (v.clone(), dir)
        })
        .collect()
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
