use serde::Serialize;

use super::html::{escape_html, format_number, script_json, timestamp_utc};
use crate::loc::LineCountMap;

/// One bar: a version and its total lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow {
    pub version: String,
    pub lines: u64,
}

/// Bar chart dataset in version order. Versions without a count show 0.
pub fn chart_rows(versions: &[String], loc: &LineCountMap) -> Vec<BarRow> {
    versions
        .iter()
        .map(|v| BarRow {
            version: v.clone(),
            lines: loc.get(v).copied().unwrap_or(0),
        })
        .collect()
}

/// The dataset as a table with a header row, the shape charting libraries
/// take directly.
fn chart_table(rows: &[BarRow]) -> Vec<serde_json::Value> {
    std::iter::once(serde_json::json!(["Version", "Lines of Code"]))
        .chain(rows.iter().map(|r| serde_json::json!([r.version, r.lines])))
        .collect()
}

fn build_bars(rows: &[BarRow]) -> String {
    let max = rows.iter().map(|r| r.lines).max().unwrap_or(0);
    let mut bars = String::new();
    for row in rows {
        let pct = if max == 0 {
            0.0
        } else {
            row.lines as f64 / max as f64 * 100.0
        };
        bars.push_str(&format!(
            r#"<div class="bar-row"><span class="label">{version}</span><div class="track"><div class="bar" style="width:{pct:.2}%"></div></div><span class="value" data-lines="{lines}">{lines_fmt}</span></div>"#,
            version = escape_html(&row.version),
            lines = row.lines,
            lines_fmt = format_number(row.lines),
        ));
        bars.push('\n');
    }
    bars
}

pub fn render_barchart(rows: &[BarRow]) -> String {
    const TEMPLATE: &str = include_str!("templates/barchart.html");

    TEMPLATE
        .replace("{{TIMESTAMP}}", &timestamp_utc())
        .replace("{{VERSION_COUNT}}", &rows.len().to_string())
        .replace("{{BARS}}", &build_bars(rows))
        .replace("{{CHART_JSON}}", &script_json(&chart_table(rows)))
}
