//! Split a source document into one file per requested page.
//!
//! Setup problems (an uncreatable destination) are returned as errors. Everything
//! that only affects some of the input, such as a malformed range or a page that
//! cannot be copied or written, ends up in the [`ExtractionOutcome`] instead.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::naming::{
    count_pdf_files, existing_page_indices, page_file_name, sanitize_filename,
    DEFAULT_MAX_NAME_LEN,
};
use crate::page_range::{parse_page_ranges, RangeIssue};
use crate::pdf::{PageSource, PdfDocument};

pub const NO_VALID_PAGES: &str = "No valid pages specified";

/// How sequential indices relate to files already in the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberingMode {
    /// Start at 1 on every call, overwriting files with the same index.
    #[default]
    Restart,
    /// Start after the highest `{base}_Page_{n}.pdf` already present.
    Continue,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub numbering: NumberingMode,
    /// Refuse the whole request if any expression is invalid.
    pub strict: bool,
    pub max_name_len: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            numbering: NumberingMode::default(),
            strict: false,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub expressions: Vec<String>,
    pub destination: PathBuf,
    pub naming_base: String,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPage {
    /// Page number in the source document, not the sequential index.
    pub page: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Complete,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionOutcome {
    /// Written files, in sequential order.
    pub files: Vec<PathBuf>,
    pub failed: Vec<FailedPage>,
    /// Expressions skipped while resolving pages.
    pub issues: Vec<RangeIssue>,
    /// Why nothing was produced, when that is the case.
    pub message: Option<String>,
}

impl ExtractionOutcome {
    fn failure(message: impl Into<String>, issues: Vec<RangeIssue>) -> Self {
        ExtractionOutcome {
            message: Some(message.into()),
            issues,
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn status(&self) -> ExtractionStatus {
        match (self.files.is_empty(), self.failed.is_empty()) {
            (true, _) => ExtractionStatus::Failed,
            (false, true) => ExtractionStatus::Complete,
            (false, false) => ExtractionStatus::Partial,
        }
    }

    pub fn failed_pages(&self) -> Vec<u32> {
        self.failed.iter().map(|f| f.page).collect()
    }

    /// Human-readable note listing the pages that could not be extracted.
    pub fn failure_warning(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        let pages: Vec<String> = self.failed.iter().map(|f| f.page.to_string()).collect();
        Some(format!("Failed to extract pages: {}", pages.join(", ")))
    }
}

/// Extract every page `request.expressions` resolves to into its own file under
/// `request.destination`, named `{base}_Page_{n}.pdf` with `n` counting from 1.
pub fn extract_to_folder<S: PageSource + ?Sized>(
    source: &S,
    request: &ExtractionRequest,
    options: &ExtractOptions,
) -> Result<ExtractionOutcome> {
    let resolved = parse_page_ranges(&request.expressions, request.total_pages);

    if options.strict {
        if let Some(issue) = resolved.issues.first() {
            return Ok(ExtractionOutcome::failure(
                issue.to_string(),
                resolved.issues.clone(),
            ));
        }
    }

    if resolved.is_empty() {
        return Ok(ExtractionOutcome::failure(NO_VALID_PAGES, resolved.issues));
    }

    let source_pages = source.page_count();
    if source_pages != request.total_pages {
        warn!(
            source_pages,
            total_pages = request.total_pages,
            "page count does not match the source document"
        );
    }

    let destination = request.destination.as_path();
    let existing = count_pdf_files(destination);
    if existing > 0 {
        warn!(
            destination = %destination.display(),
            existing,
            "destination already contains PDF files; new files will be added alongside"
        );
    }

    std::fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create directory: {}", destination.display()))?;

    let base = sanitize_filename(&request.naming_base, options.max_name_len);
    let first_index = match options.numbering {
        NumberingMode::Restart => Some(1),
        NumberingMode::Continue => match existing_page_indices(destination, &base)?.last() {
            Some(last) => last.checked_add(1),
            None => Some(1),
        },
    };
    // every index handed out below must fit in a u32
    let span = u32::try_from(resolved.pages.len() - 1).ok();
    let Some(first_index) = first_index.filter(|first| {
        span.and_then(|span| first.checked_add(span)).is_some()
    }) else {
        anyhow::bail!("page index overflow in {}", destination.display());
    };

    info!(
        pages = resolved.pages.len(),
        destination = %destination.display(),
        base = %base,
        first_index,
        "extracting pages"
    );

    let mut outcome = ExtractionOutcome {
        issues: resolved.issues,
        ..Default::default()
    };

    for (offset, &page) in resolved.pages.iter().enumerate() {
        let index = first_index + offset as u32;
        let path = destination.join(page_file_name(&base, index));

        match extract_single_page(source, page, request.total_pages, &path) {
            Ok(()) => {
                debug!(page, index, path = %path.display(), "wrote page");
                outcome.files.push(path);
            }
            Err(err) => {
                warn!(page, error = %format!("{:#}", err), "failed to extract page");
                outcome.failed.push(FailedPage {
                    page,
                    reason: format!("{:#}", err),
                });
            }
        }
    }

    if let Some(warning) = outcome.failure_warning() {
        warn!("{}", warning);
    }
    if !outcome.success() {
        outcome.message = Some(String::from("No pages could be extracted"));
    }

    Ok(outcome)
}

fn extract_single_page<S: PageSource + ?Sized>(
    source: &S,
    page: u32,
    total_pages: u32,
    path: &Path,
) -> Result<()> {
    if page == 0 || page > total_pages {
        anyhow::bail!("Page {} out of range (1-{})", page, total_pages);
    }

    let mut doc = source.single_page(page)?;
    PdfDocument::save(&mut doc, path)
}
