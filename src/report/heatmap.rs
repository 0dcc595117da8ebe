use super::HeatmapSummary;
use super::html::{escape_html, script_json, timestamp_utc};
use crate::color::STOPS;
use crate::matrix::{ComparisonCell, ComparisonMatrix};

fn build_legend() -> String {
    STOPS
        .iter()
        .map(|stop| {
            format!(
                r#"<span class="swatch" style="background:{}"></span><span>{:.0}%</span>"#,
                stop.color,
                stop.pct * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn build_header(versions: &[String]) -> String {
    versions
        .iter()
        .map(|v| format!("<th>{}</th>", escape_html(v)))
        .collect()
}

fn build_cell(cell: &ComparisonCell) -> String {
    let title = format!(
        "{} vs {}: {} matching lines ({} / {} LOC), relative similarity {:.3}",
        cell.left,
        cell.right,
        cell.matches.unwrap_or(0),
        cell.loc_left,
        cell.loc_right,
        cell.ratio.unwrap_or(0.0),
    );
    format!(
        r#"<td><div class="cell" style="background:{color};width:{width}px;height:{height}px" title="{title}"></div></td>"#,
        color = escape_html(cell.color.as_deref().unwrap_or("transparent")),
        width = cell.width.unwrap_or(super::MIN_CELL_PX),
        height = cell.height.unwrap_or(super::MIN_CELL_PX),
        title = escape_html(&title),
    )
}

fn build_rows(versions: &[String], matrix: &ComparisonMatrix) -> String {
    let mut rows = String::new();
    for (version, row) in versions.iter().zip(matrix.rows()) {
        rows.push_str(&format!("<tr><th>{}</th>", escape_html(version)));
        for cell in row {
            match cell {
                Some(cell) => rows.push_str(&build_cell(cell)),
                None => rows.push_str("<td></td>"),
            }
        }
        rows.push_str("</tr>\n");
    }
    rows
}

pub fn render_heatmap(
    versions: &[String],
    matrix: &ComparisonMatrix,
    summary: &HeatmapSummary,
) -> String {
    const TEMPLATE: &str = include_str!("templates/heatmap.html");

    let mean = summary
        .mean_ratio
        .map_or_else(|| "n/a".to_string(), |m| format!("{:.1}%", m * 100.0));
    let data = serde_json::json!({
        "versions": versions,
        "matrix": matrix,
        "summary": summary,
    });

    TEMPLATE
        .replace("{{TIMESTAMP}}", &timestamp_utc())
        .replace("{{VERSION_COUNT}}", &versions.len().to_string())
        .replace("{{PAIR_COUNT}}", &matrix.populated().to_string())
        .replace("{{MEAN_RATIO}}", &mean)
        .replace("{{LEGEND}}", &build_legend())
        .replace("{{HEADER_CELLS}}", &build_header(versions))
        .replace("{{ROWS}}", &build_rows(versions, matrix))
        .replace("{{MATRIX_JSON}}", &script_json(&data))
}
