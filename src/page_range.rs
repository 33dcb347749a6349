use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

/// A single user-entered page expression, either `"12"` or `"5-9"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRange {
    Single(u32),
    Span(u32, u32),
}

/// Why an expression was skipped. Skips never abort the rest of the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeIssue {
    #[error("Invalid page number: {token}")]
    InvalidNumber { token: String },
    #[error("Page {page} out of range (1-{total})")]
    PageOutOfRange { page: i64, total: u32 },
    #[error("Invalid range format: {token}")]
    MalformedRange { token: String },
    #[error("Invalid range: {token} (PDF has {total} pages)")]
    InvalidRange { token: String, total: u32 },
}

/// Sorted, deduplicated page numbers plus everything that was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPages {
    pub pages: Vec<u32>,
    pub issues: Vec<RangeIssue>,
}

impl ResolvedPages {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageRange {
    /// Parse and bounds-check one expression against `total_pages`.
    ///
    /// Negative numbers parse fine but never satisfy the lower bound, so they
    /// are reported as out of range rather than as malformed.
    pub fn parse(s: &str, total_pages: u32) -> Result<Self, RangeIssue> {
        let s = s.trim();

        if s.contains('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() != 2 {
                return Err(RangeIssue::MalformedRange {
                    token: s.to_string(),
                });
            }

            let (start, end) = match (parse_number(parts[0]), parse_number(parts[1])) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    return Err(RangeIssue::MalformedRange {
                        token: s.to_string(),
                    })
                }
            };

            if start > 0 && end <= i64::from(total_pages) && start <= end {
                // both bounds now fit in 1..=total_pages
                Ok(PageRange::Span(start as u32, end as u32))
            } else {
                Err(RangeIssue::InvalidRange {
                    token: s.to_string(),
                    total: total_pages,
                })
            }
        } else {
            let page = parse_number(s).ok_or_else(|| RangeIssue::InvalidNumber {
                token: s.to_string(),
            })?;

            if page >= 1 && page <= i64::from(total_pages) {
                Ok(PageRange::Single(page as u32))
            } else {
                Err(RangeIssue::PageOutOfRange {
                    page,
                    total: total_pages,
                })
            }
        }
    }

    /// Iterate the 1-based page numbers this expression covers.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        let (start, end) = match *self {
            PageRange::Single(page) => (page, page),
            PageRange::Span(start, end) => (start, end),
        };
        start..=end
    }
}

fn parse_number(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Split a comma-separated list like "1-5, 10, 15-20" into trimmed expressions.
pub fn split_expressions(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Resolve a list of expressions into an ascending, duplicate-free page list.
///
/// Invalid expressions are skipped with a warning and recorded in
/// [`ResolvedPages::issues`]; blank expressions are ignored silently.
pub fn parse_page_ranges<S: AsRef<str>>(expressions: &[S], total_pages: u32) -> ResolvedPages {
    let mut pages = BTreeSet::new();
    let mut issues = Vec::new();

    for expression in expressions {
        let expression = expression.as_ref().trim();
        if expression.is_empty() {
            continue;
        }

        match PageRange::parse(expression, total_pages) {
            Ok(range) => pages.extend(range.pages()),
            Err(issue) => {
                warn!(expression, total_pages, "{}", issue);
                issues.push(issue);
            }
        }
    }

    ResolvedPages {
        pages: pages.into_iter().collect(),
        issues,
    }
}

/// Group an ascending page list into maximal runs of consecutive pages.
pub fn group_runs(pages: &[u32]) -> Vec<(u32, u32)> {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &page in pages {
        match runs.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(page) => *end = page,
            _ => runs.push((page, page)),
        }
    }
    runs
}
