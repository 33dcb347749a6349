use crate::extractor::{extract_to_folder, ExtractOptions, ExtractionRequest, ExtractionStatus};
use crate::naming::join_hierarchy;
use crate::page_range::split_expressions;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub struct ExtractArgs<'a> {
    pub pages: &'a str,
    pub destination: &'a Path,
    pub names: &'a [String],
    pub options: ExtractOptions,
    pub json: bool,
}

pub fn run<P: AsRef<Path>>(input: P, args: ExtractArgs<'_>) -> Result<()> {
    let input = input.as_ref();
    let doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let request = ExtractionRequest {
        expressions: split_expressions(args.pages),
        destination: args.destination.to_path_buf(),
        naming_base: naming_base(input, args.names),
        total_pages,
    };

    let outcome = extract_to_folder(&doc, &request, &args.options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    // partial failures were already logged by the extractor
    if outcome.status() == ExtractionStatus::Failed {
        let reason = outcome
            .message
            .unwrap_or_else(|| String::from("Nothing was extracted"));
        anyhow::bail!(reason);
    }

    if !args.json {
        for file in &outcome.files {
            println!("{}", file.display());
        }
        println!(
            "Extracted {} page(s) to {}",
            outcome.files.len(),
            request.destination.display()
        );
    }

    Ok(())
}

/// Hierarchy names when given, otherwise the source file's stem.
fn naming_base(input: &Path, names: &[String]) -> String {
    let joined = join_hierarchy(names);
    if !joined.is_empty() {
        return joined;
    }
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::write_sample;

    #[test]
    fn test_naming_base_prefers_hierarchy() {
        let names = vec![String::from("XY1"), String::from("Atlas")];
        assert_eq!(naming_base(Path::new("in/book.pdf"), &names), "XY1_Atlas");
        assert_eq!(naming_base(Path::new("in/book.pdf"), &[]), "book");
    }

    #[test]
    fn test_run_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("atlas.pdf");
        write_sample(&input, 6);
        let dest = dir.path().join("out");

        run(
            &input,
            ExtractArgs {
                pages: "5-6, 1",
                destination: &dest,
                names: &[],
                options: ExtractOptions::default(),
                json: false,
            },
        )
        .unwrap();

        for index in 1..=3 {
            assert!(dest.join(format!("atlas_Page_{}.pdf", index)).exists());
        }
    }

    #[test]
    fn test_run_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");

        let err = run(
            dir.path().join("missing.pdf"),
            ExtractArgs {
                pages: "1-3",
                destination: &dest,
                names: &[],
                options: ExtractOptions::default(),
                json: false,
            },
        )
        .err()
        .unwrap();

        assert!(err.to_string().starts_with("Failed to open PDF"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_run_fails_without_valid_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("atlas.pdf");
        write_sample(&input, 2);

        let err = run(
            &input,
            ExtractArgs {
                pages: "7, x",
                destination: &dir.path().join("out"),
                names: &[],
                options: ExtractOptions::default(),
                json: false,
            },
        )
        .err()
        .unwrap();

        assert_eq!(err.to_string(), "No valid pages specified");
    }
}
