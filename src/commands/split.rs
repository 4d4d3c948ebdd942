use crate::commands::read_input;
use crate::error::SplitError;
use crate::pipeline::{ArchiveArtifact, RunContext, RunOutcome, SplitOptions};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    output_dir: Q,
    name: Option<&str>,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let (display_name, bytes) = read_input(&input)?;
    let file_name = name.unwrap_or(&display_name);

    let options = match pages {
        Some(ranges) => SplitOptions::range(ranges),
        None => SplitOptions::all(),
    };

    let mut stderr = std::io::stderr();
    let mut context = RunContext::new(file_name, options);
    let outcome = context
        .run(&bytes, |progress| {
            let _ = write!(stderr, "\rProcessing... {}%", progress);
            let _ = stderr.flush();
        })
        .with_context(|| format!("Error splitting {}", display_name));
    eprintln!();
    tracing::debug!(state = ?context.state(), "run finished");
    let outcome = outcome?;

    match outcome {
        RunOutcome::Delivered(artifact) => {
            let path = deliver(&artifact, output_dir)?;
            println!(
                "Split {} page(s) into {}",
                artifact.entries.len(),
                path.display()
            );
        }
        RunOutcome::NothingSelected => {
            println!("No pages selected; nothing written");
        }
    }

    Ok(())
}

/// Save the archive into `output_dir` under its own file name
pub fn deliver(artifact: &ArchiveArtifact, output_dir: &Path) -> Result<PathBuf, SplitError> {
    let delivery_error = |source| SplitError::Delivery {
        name: artifact.file_name.clone(),
        source,
    };

    std::fs::create_dir_all(output_dir).map_err(delivery_error)?;
    let path = output_dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes).map_err(delivery_error)?;

    tracing::debug!(path = %path.display(), bytes = artifact.bytes.len(), "archive saved");
    Ok(path)
}
