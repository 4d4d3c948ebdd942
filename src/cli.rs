use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfsplit")]
#[command(about = "Split a PDF into one file per page, packed into a zip archive")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Show page count, title, and author
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Split a PDF into single-page PDFs inside <name>_split.zip
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Only split these pages (e.g., "1-5, 8, 11-13"); all pages if omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Directory to save the archive in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// File name to derive the archive name from, instead of the input's
        #[arg(long)]
        name: Option<String>,
    },
}
