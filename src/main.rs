mod archive;
mod cli;
mod commands;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Split {
            path,
            pages,
            output_dir,
            name,
        } => {
            commands::split::run(&path, pages.as_deref(), &output_dir, name.as_deref())?;
        }
    }

    Ok(())
}

// Logs go to stderr; stdout carries command output and MCP traffic.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "pdfsplit=debug",
        _ => "pdfsplit=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
