use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Compute the max terminal width of `names`, with a minimum of `min`.
pub fn max_name_width<'a>(names: impl Iterator<Item = &'a str>, min: usize) -> usize {
    names
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(min)
        .max(min)
}

/// Left-align `s` in a column `width` terminal cells wide.
pub fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(s));
    format!("{s}{}", " ".repeat(fill))
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Serialize to pretty JSON and print to stdout.
pub fn print_json_stdout(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "report_helpers_test.rs"]
mod tests;
