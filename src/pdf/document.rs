use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

use super::PageSource;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument {
            doc,
            path: path.display().to_string(),
        })
    }

    #[cfg(test)]
    pub fn from_document(doc: Document) -> Self {
        PdfDocument {
            doc,
            path: String::from("<memory>"),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// The document info dictionary, whether referenced or stored inline in the trailer.
    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn get_info(&self) -> PdfInfo {
        let page_count = self.page_count();
        let Some(dict) = self.info_dictionary() else {
            return PdfInfo {
                page_count,
                ..Default::default()
            };
        };

        let text = |key: &[u8]| get_string_from_dict(dict, key);
        PdfInfo {
            title: text(b"Title"),
            author: text(b"Author"),
            creator: text(b"Creator"),
            producer: text(b"Producer"),
            creation_date: text(b"CreationDate"),
            mod_date: text(b"ModDate"),
            subject: text(b"Subject"),
            keywords: text(b"Keywords"),
            page_count,
        }
    }

    /// Copy of the document holding only `keep` (1-based), with objects that
    /// only the removed pages referenced pruned away.
    pub fn extract_pages(&self, keep: &[u32]) -> Result<Document> {
        let total = self.page_count();
        if let Some(&bad) = keep.iter().find(|&&page| page == 0 || page > total) {
            anyhow::bail!("Page {} is out of range (1-{})", bad, total);
        }

        let doomed: Vec<u32> = self
            .doc
            .get_pages()
            .into_keys()
            .filter(|page| !keep.contains(page))
            .collect();

        let mut new_doc = self.doc.clone();
        if !doomed.is_empty() {
            new_doc.delete_pages(&doomed);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Write a (usually single-page) document produced by [`Self::extract_pages`].
    pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
        doc.save(path)
            .map(drop)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        PdfDocument::page_count(self)
    }

    fn single_page(&self, page: u32) -> Result<Document> {
        self.extract_pages(&[page])
            .with_context(|| format!("Failed to copy page {} from {}", page, self.path))
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub page_count: u32,
}

impl PdfInfo {
    /// A document without pages has nothing to extract.
    pub fn is_valid(&self) -> bool {
        self.page_count > 0
    }
}

fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        // PDFDocEncoding, approximated as Latin-1
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{sample_document, sample_document_with_title};

    #[test]
    fn test_page_count() {
        let doc = PdfDocument::from_document(sample_document(4));
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn test_single_page_keeps_only_that_page() {
        let doc = PdfDocument::from_document(sample_document(5));
        let page = doc.single_page(3).unwrap();
        assert_eq!(page.get_pages().len(), 1);
    }

    #[test]
    fn test_single_page_out_of_range() {
        let doc = PdfDocument::from_document(sample_document(2));
        assert!(doc.single_page(0).is_err());
        assert!(doc.single_page(3).is_err());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.pdf");
        let doc = PdfDocument::from_document(sample_document(3));

        let mut page = doc.single_page(2).unwrap();
        PdfDocument::save(&mut page, &path).unwrap();

        let reopened = PdfDocument::open(&path).unwrap();
        assert_eq!(reopened.page_count(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfDocument::open(dir.path().join("missing.pdf"))
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("Failed to open PDF"));
    }

    #[test]
    fn test_info() {
        let doc = PdfDocument::from_document(sample_document_with_title(2, "Field Guide"));
        let info = doc.get_info();
        assert_eq!(info.title.as_deref(), Some("Field Guide"));
        assert_eq!(info.page_count, 2);
        assert!(info.is_valid());
    }

    #[test]
    fn test_info_without_dictionary() {
        let doc = PdfDocument::from_document(sample_document(3));
        let info = doc.get_info();
        assert_eq!(info.title, None);
        assert_eq!(info.page_count, 3);
    }

    #[test]
    fn test_extract_several_pages() {
        let doc = PdfDocument::from_document(sample_document(6));
        let kept = doc.extract_pages(&[2, 5]).unwrap();
        assert_eq!(kept.get_pages().len(), 2);
    }

    #[test]
    fn test_decode_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_pdf_string(&bytes).as_deref(), Some("AB"));
    }
}
