pub mod document;

pub use document::PdfDocument;

use anyhow::Result;
use lopdf::Document;

/// Anything that can hand out single pages of a source document.
pub trait PageSource {
    fn page_count(&self) -> u32;

    /// A standalone document holding only `page` (1-based).
    fn single_page(&self, page: u32) -> Result<Document>;
}
