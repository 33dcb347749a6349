use crate::page_range::{group_runs, parse_page_ranges};

pub const NO_VALID_PAGES: &str = "No valid pages to extract";

/// Describe what extracting `expressions` would produce, without touching any files.
///
/// Consecutive pages are folded into runs: `["1", "2", "3", "7"]` renders as
/// `Pages to extract: 1-3, 7 (Total: 4 pages)`.
pub fn preview<S: AsRef<str>>(expressions: &[S], total_pages: u32) -> String {
    let resolved = parse_page_ranges(expressions, total_pages);
    if resolved.is_empty() {
        return NO_VALID_PAGES.to_string();
    }

    let groups: Vec<String> = group_runs(&resolved.pages)
        .into_iter()
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .collect();

    format!(
        "Pages to extract: {} (Total: {} pages)",
        groups.join(", "),
        resolved.pages.len()
    )
}
