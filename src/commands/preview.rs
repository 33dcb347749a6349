use crate::page_range::split_expressions;
use crate::pdf::PdfDocument;
use crate::preview::preview;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P, pages: &str) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let expressions = split_expressions(pages);

    println!("{}", preview(&expressions, doc.page_count()));

    Ok(())
}
