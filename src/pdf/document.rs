use crate::error::{Result, SplitError};
use crate::pdf::page_copy::copy_page;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::path::Path;

/// A parsed PDF held in memory for the duration of one split run.
///
/// Never mutated: extraction only reads from it.
pub struct SourceDocument {
    doc: Document,
    pages: Vec<(u32, ObjectId)>,
}

impl SourceDocument {
    /// Parse `bytes` as a PDF. The buffer is only borrowed.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| SplitError::Load(e.to_string()))?;

        let mut pages: Vec<_> = doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        if pages.is_empty() {
            return Err(SplitError::Load("document has no pages".into()));
        }

        tracing::debug!(pages = pages.len(), version = %doc.version, "loaded document");
        Ok(SourceDocument { doc, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get title and author from the document info dictionary
    pub fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo {
            page_count: self.page_count(),
            ..Default::default()
        };

        if let Some(dict) = self.info_dictionary() {
            info.title = get_string_from_dict(dict, b"Title");
            info.author = get_string_from_dict(dict, b"Author");
        }

        info
    }

    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Copy the page at zero-based `index` into a standalone one-page PDF.
    ///
    /// Only the page and the objects it references are carried over; document
    /// level data such as outlines, attachments and the info dictionary is not.
    /// `index` must come from a resolved selection, so it is always in range.
    pub fn extract_page(&self, index: usize) -> Result<Vec<u8>> {
        debug_assert!(index < self.page_count(), "page index {index} out of range");
        let Some(&(number, page_id)) = self.pages.get(index) else {
            return Err(SplitError::extract(
                index,
                format!("out of range (1-{})", self.page_count()),
            ));
        };

        let mut new_doc = copy_page(&self.doc, number, page_id)?;

        let mut buffer = Vec::new();
        new_doc
            .save_to(&mut buffer)
            .map_err(|e| SplitError::extract(index, e))?;

        tracing::trace!(page = number, bytes = buffer.len(), "extracted page");
        Ok(buffer)
    }
}

/// Accept only PDF files: a `.pdf` name or a `%PDF-` header.
pub fn accept_pdf(file_name: &str, bytes: &[u8]) -> Result<()> {
    let has_pdf_name = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if has_pdf_name || bytes.starts_with(b"%PDF-") {
        Ok(())
    } else {
        Err(SplitError::Load(format!("{} is not a PDF file", file_name)))
    }
}

/// Inspect a PDF without extracting anything
pub fn inspect(bytes: &[u8]) -> Result<DocumentInfo> {
    SourceDocument::load(bytes).map(|doc| doc.info())
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    // UTF-16BE with BOM, otherwise PDFDocEncoding treated as Latin-1
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&units).ok()
    } else {
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}
