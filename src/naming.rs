use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

pub const DEFAULT_MAX_NAME_LEN: usize = 200;

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const FALLBACK_BASE: &str = "page";

/// Make a naming base safe to use as a filename prefix on any platform.
pub fn sanitize_filename(base: &str, max_len: usize) -> String {
    let replaced: String = base
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let joined = replaced.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(max_len).collect();

    if truncated.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        truncated
    }
}

/// Output filename for the page at `index` (1-based) within one extraction.
pub fn page_file_name(sanitized_base: &str, index: u32) -> String {
    format!("{}_Page_{}.pdf", sanitized_base, index)
}

/// Compose a naming base from hierarchy names, e.g. project code, book, part, chapter.
pub fn join_hierarchy<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Sequential indices of `{base}_Page_{n}.pdf` files directly inside `dir`, ascending.
///
/// A missing directory has no pages.
pub fn existing_page_indices(dir: &Path, sanitized_base: &str) -> Result<Vec<u32>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(r"^{}_Page_(\d+)\.pdf$", regex::escape(sanitized_base));
    let re = Regex::new(&pattern).context("Failed to build page filename pattern")?;

    let mut indices = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(index) = re
            .captures(&name)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        {
            indices.push(index);
        }
    }

    indices.sort_unstable();
    Ok(indices)
}

/// Number of `.pdf` files directly inside `dir`, whatever their names.
pub fn count_pdf_files(dir: &Path) -> usize {
    if !dir.is_dir() {
        return 0;
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sanitize_replaces_invalid_chars() {
        assert_eq!(
            sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#, DEFAULT_MAX_NAME_LEN),
            "a_b_c_d_e_f_g_h_i_j"
        );
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(
            sanitize_filename("  My   Book\tPart 1 ", DEFAULT_MAX_NAME_LEN),
            "My_Book_Part_1"
        );
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_filename(&long, DEFAULT_MAX_NAME_LEN).len(), 200);
        assert_eq!(sanitize_filename("Ångström", 3), "Ång");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename("   ", DEFAULT_MAX_NAME_LEN), "page");
    }

    #[test]
    fn test_page_file_name() {
        assert_eq!(page_file_name("ABC_Book", 3), "ABC_Book_Page_3.pdf");
    }

    #[test]
    fn test_join_hierarchy() {
        assert_eq!(
            join_hierarchy(&["ABC", " My Book ", "", "part_1"]),
            "ABC_My Book_part_1"
        );
    }

    #[test]
    fn test_existing_page_indices() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "Book_Page_2.pdf",
            "Book_Page_10.pdf",
            "Book_Page_x.pdf",
            "Other_Page_40.pdf",
            "Book_Page_3.pdf.bak",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("Book_Page_99.pdf")).unwrap();

        assert_eq!(existing_page_indices(dir.path(), "Book").unwrap(), vec![2, 10]);
        assert_eq!(count_pdf_files(dir.path()), 4);
    }

    #[test]
    fn test_existing_page_indices_escapes_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.b_Page_1.pdf"), b"").unwrap();
        fs::write(dir.path().join("axb_Page_2.pdf"), b"").unwrap();

        assert_eq!(existing_page_indices(dir.path(), "a.b").unwrap(), vec![1]);
    }

    #[test]
    fn test_missing_directory_has_no_pages() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(existing_page_indices(&missing, "Book").unwrap().is_empty());
        assert_eq!(count_pdf_files(&missing), 0);
    }
}
