use crate::error::Result;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Strip a trailing `.pdf` (any case) from a file name
pub fn base_name(file_name: &str) -> &str {
    let split = file_name.len().saturating_sub(4);
    match (file_name.get(..split), file_name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".pdf") => stem,
        _ => file_name,
    }
}

/// Name of the folder holding every page inside the archive
pub fn folder_name(file_name: &str) -> String {
    format!("{}_split", base_name(file_name))
}

/// File name the finished archive is delivered under
pub fn archive_file_name(file_name: &str) -> String {
    format!("{}.zip", folder_name(file_name))
}

/// `page_<N>.pdf` for zero-based `index`, padded so names sort in page order.
pub fn page_file_name(index: usize, total_pages: usize) -> String {
    let width = match total_pages {
        0..=9 => 1,
        10..=99 => 2,
        _ => 3,
    };
    format!("page_{:0width$}.pdf", index + 1, width = width)
}

/// Streams named entries into a zip archive under a single folder.
pub struct ArchiveBuilder {
    folder: String,
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new(folder: impl Into<String>) -> Result<Self> {
        let folder = folder.into();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.add_directory(folder.as_str(), Self::options())?;
        Ok(ArchiveBuilder {
            folder,
            zip,
            entries: 0,
        })
    }

    // Fixed timestamps keep archives byte-identical across runs
    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn entry_count(&self) -> usize {
        self.entries
    }

    pub fn add_entry(&mut self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = format!("{}/{}", self.folder, file_name);
        self.zip.start_file(path.as_str(), Self::options())?;
        self.zip.write_all(bytes).map_err(zip::result::ZipError::from)?;
        self.entries += 1;
        Ok(())
    }

    /// Write the central directory and hand back the archive bytes
    pub fn finalize(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}
