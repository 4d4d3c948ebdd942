pub mod info;
pub mod split;

use crate::pdf::accept_pdf;
use anyhow::{Context, Result};
use std::path::Path;

/// Read one input file and return its display name with its bytes.
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<(String, Vec<u8>)> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    accept_pdf(&name, &bytes)?;

    Ok((name, bytes))
}
