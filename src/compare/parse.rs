//! Duplicate-line counts from the similarity tools' reports.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::CompareError;

/// A jsinspect match: the same structure found at several places.
#[derive(Debug, Deserialize)]
struct MatchGroup {
    instances: Vec<Instance>,
}

#[derive(Debug, Deserialize)]
struct Instance {
    /// Inclusive `[start, end]` line range.
    lines: (u64, u64),
}

/// Sum the line spans of every instance of every match in a jsinspect
/// JSON report.
pub fn jsinspect_duplicated_lines(output: &str) -> Result<u64, CompareError> {
    let groups: Vec<MatchGroup> =
        serde_json::from_str(output).map_err(|source| CompareError::InvalidJson {
            source,
            output: output.to_string(),
        })?;

    Ok(groups
        .iter()
        .flat_map(|g| &g.instances)
        .map(|i| i.lines.1.saturating_sub(i.lines.0) + 1)
        .sum())
}

static DUPLICATED_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.*?)% duplicated lines.*?(\d+)").expect("valid duplicated-lines pattern")
});

/// Derive the duplicated line count from phpcpd's summary line, e.g.
/// `2.50% duplicated lines out of 4000 total lines of code.`
///
/// The percentage must be a plain decimal number; anything else (a
/// locale-specific comma, a changed wording) counts as unparseable.
pub fn phpcpd_duplicated_lines(output: &str) -> Result<u64, CompareError> {
    let unrecognized = || CompareError::UnrecognizedOutput {
        output: output.to_string(),
    };

    let caps = DUPLICATED_LINES.captures(output).ok_or_else(unrecognized)?;
    let percentage: f64 = caps[1].trim().parse().map_err(|_| unrecognized())?;
    let total: f64 = caps[2].parse().map_err(|_| unrecognized())?;
    if !percentage.is_finite() || percentage < 0.0 {
        return Err(unrecognized());
    }

    Ok((total / 100.0 * percentage).round() as u64)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
