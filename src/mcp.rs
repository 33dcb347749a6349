use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::extractor::{
    extract_to_folder, ExtractOptions, ExtractionOutcome, ExtractionRequest, ExtractionStatus,
    NumberingMode,
};
use crate::naming::join_hierarchy;
use crate::page_range::{parse_page_ranges, split_expressions};
use crate::pdf::PdfDocument;
use crate::preview::preview;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5, 10, 15-20')")]
    pub pages: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractToFolderRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5, 10, 15-20')")]
    pub pages: String,
    #[schemars(description = "Destination folder, created if missing")]
    pub destination: String,
    #[schemars(
        description = "Naming segments in hierarchy order (project code, book, part, chapter)"
    )]
    #[serde(default)]
    pub names: Vec<String>,
    #[schemars(description = "Reject the request if any range is invalid (default: false)")]
    #[serde(default)]
    pub strict: bool,
    #[schemars(
        description = "Continue numbering after existing page files instead of restarting at 1 (default: false)"
    )]
    #[serde(default)]
    pub continue_numbering: bool,
}

#[derive(Debug, Clone)]
pub struct BookcutServer {
    tool_router: ToolRouter<Self>,
}

impl BookcutServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for BookcutServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl BookcutServer {
    #[tool(description = "Get PDF metadata and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    valid: info.is_valid(),
                    title: info.title,
                    author: info.author,
                };
                to_json(&result)
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Describe which pages a range list resolves to, without writing any files")]
    fn pdf_preview_extraction(&self, Parameters(req): Parameters<PreviewRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {:#}", e),
        };
        let total = doc.page_count();
        let expressions = split_expressions(&req.pages);
        let resolved = parse_page_ranges(&expressions, total);

        let result = PreviewResult {
            summary: preview(&expressions, total),
            pages: resolved.pages,
            skipped: resolved.issues.iter().map(|i| i.to_string()).collect(),
        };
        to_json(&result)
    }

    #[tool(description = "Extract each selected page into its own PDF named '{naming base}_Page_{n}.pdf' in the destination folder")]
    fn pdf_extract_to_folder(&self, Parameters(req): Parameters<ExtractToFolderRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {:#}", e),
        };

        let request = ExtractionRequest {
            expressions: split_expressions(&req.pages),
            destination: PathBuf::from(&req.destination),
            naming_base: join_hierarchy(&req.names),
            total_pages: doc.page_count(),
        };
        let options = ExtractOptions {
            numbering: if req.continue_numbering {
                NumberingMode::Continue
            } else {
                NumberingMode::Restart
            },
            strict: req.strict,
            ..Default::default()
        };

        match extract_to_folder(&doc, &request, &options) {
            Ok(outcome) => to_json(&ExtractResult::from(outcome)),
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub valid: bool,
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PreviewResult {
    pub summary: String,
    pub pages: Vec<u32>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractResult {
    pub status: String,
    pub files: Vec<String>,
    pub failed_pages: Vec<u32>,
    pub warning: Option<String>,
    pub message: Option<String>,
}

impl From<ExtractionOutcome> for ExtractResult {
    fn from(outcome: ExtractionOutcome) -> Self {
        let status = match outcome.status() {
            ExtractionStatus::Complete => "complete",
            ExtractionStatus::Partial => "partial",
            ExtractionStatus::Failed => "failed",
        };
        ExtractResult {
            status: status.to_string(),
            failed_pages: outcome.failed_pages(),
            warning: outcome.failure_warning(),
            files: outcome
                .files
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            message: outcome.message,
        }
    }
}

#[tool_handler]
impl ServerHandler for BookcutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Book page extraction tools. Use pdf_info to check a document and its page count, \
                 pdf_preview_extraction to see which pages a range list selects, and \
                 pdf_extract_to_folder to write one PDF per selected page into a folder."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    info!("starting MCP server on stdio");
    let server = BookcutServer::new();

    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
