use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::commands::read_input;
use crate::commands::split::deliver;
use crate::pdf::inspect;
use crate::pipeline::{split_pdf, RunOutcome, SplitOptions};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[serde(flatten)]
    pub options: SplitOptions,
    #[schemars(description = "Directory to save the zip archive in (default: next to the input)")]
    pub output_dir: Option<String>,
    #[schemars(description = "File name used to name the archive (default: the input's file name)")]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the page count, title, and author of a PDF")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let result = read_input(&path).and_then(|(name, bytes)| -> Result<PdfInfoResult> {
            let info = inspect(&bytes)?;
            Ok(PdfInfoResult {
                name,
                page_count: info.page_count,
                title: info.title,
                author: info.author,
            })
        });

        match result {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Split a PDF into one file per page and save them as a zip archive. \
                          Use mode 'all' for every page, or mode 'range' with ranges like '1-5, 8, 11-13'.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        match split_to_archive(&req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

fn split_to_archive(req: &PdfSplitRequest) -> Result<SplitResult> {
    let (display_name, bytes) = read_input(&req.path)?;
    let file_name = req.name.as_deref().unwrap_or(&display_name);

    let output_dir = match &req.output_dir {
        Some(dir) => Path::new(dir).to_path_buf(),
        None => Path::new(&req.path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let result = match split_pdf(file_name, &bytes, &req.options, |_| {})? {
        RunOutcome::Delivered(artifact) => {
            let path = deliver(&artifact, &output_dir)?;
            SplitResult {
                output_path: Some(path.display().to_string()),
                folder: Some(artifact.folder),
                entries: artifact.entries,
            }
        }
        RunOutcome::NothingSelected => SplitResult {
            output_path: None,
            folder: None,
            entries: Vec::new(),
        },
    };

    Ok(result)
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub name: String,
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    /// Absent when the selection matched no pages
    pub output_path: Option<String>,
    pub folder: Option<String>,
    pub entries: Vec<String>,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use pdf_info to check a document's page count before \
                 splitting, and pdf_split to save every page, or a page range, as separate PDFs \
                 inside a zip archive."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
