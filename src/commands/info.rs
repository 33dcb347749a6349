use crate::pdf::document::PdfInfo;
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub path: String,
    pub page_count: u32,
    pub valid: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl InfoReport {
    pub fn new(path: &str, info: PdfInfo) -> Self {
        InfoReport {
            path: path.to_string(),
            page_count: info.page_count,
            valid: info.is_valid(),
            title: info.title,
            author: info.author,
            subject: info.subject,
            keywords: info.keywords,
            creator: info.creator,
            producer: info.producer,
            created: info.creation_date.as_deref().map(format_pdf_date),
            modified: info.mod_date.as_deref().map(format_pdf_date),
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("File: {}", self.path),
            format!("Pages: {}", self.page_count),
        ];
        if !self.valid {
            lines.push(String::from("Valid: no (document has no pages)"));
        }

        let optional = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
            ("Created", &self.created),
            ("Modified", &self.modified),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("{}: {}", label, value));
            }
        }
        lines
    }
}

pub fn run<P: AsRef<Path>>(path: P, json: bool) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let report = InfoReport::new(&path.as_ref().display().to_string(), doc.get_info());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.lines() {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Render a PDF date (`D:YYYYMMDDHHmmSS...`) as `YYYY-MM-DD HH:MM:SS`.
pub fn format_pdf_date(date: &str) -> String {
    let Some(d) = date.strip_prefix("D:") else {
        return date.to_string();
    };
    if d.len() < 8 || !d.bytes().take(8).all(|b| b.is_ascii_digit()) {
        return date.to_string();
    }

    let mut out = format!("{}-{}-{}", &d[0..4], &d[4..6], &d[6..8]);
    if d.len() >= 14 && d.bytes().take(14).all(|b| b.is_ascii_digit()) {
        out.push_str(&format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14]));
    }
    out
}
