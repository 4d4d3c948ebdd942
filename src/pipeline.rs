//! Split orchestration: inspect, resolve the selection, extract page by page,
//! then finalize the archive.
//!
//! Runs are strictly sequential. Each page is extracted and added to the
//! archive before the next one starts, and progress is reported after every
//! page. A run either delivers a complete archive or fails without output.

use crate::archive::{archive_file_name, folder_name, page_file_name, ArchiveBuilder};
use crate::error::{Result, SplitError};
use crate::page_range::{PageSelection, SelectionMode};
use crate::pdf::SourceDocument;
use rmcp::schemars;
use serde::Deserialize;

/// How the caller wants the document split
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
pub struct SplitOptions {
    #[schemars(description = "'all' for every page, 'range' for the pages listed in ranges")]
    #[serde(default)]
    pub mode: SelectionMode,
    /// Range string such as "1-5, 8, 11-13"; only read in range mode
    #[schemars(description = "Page ranges (e.g., '1-5, 8, 11-13'), 1-based and inclusive")]
    #[serde(default)]
    pub ranges: Option<String>,
}

impl SplitOptions {
    pub fn all() -> Self {
        SplitOptions::default()
    }

    pub fn range(ranges: impl Into<String>) -> Self {
        SplitOptions {
            mode: SelectionMode::Range,
            ranges: Some(ranges.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Inspecting,
    ResolvingSelection,
    Extracting { done: usize, total: usize },
    Finalizing,
    Delivered,
    Failed,
}

/// The finished archive, ready to be saved by the host
#[derive(Debug, Clone)]
pub struct ArchiveArtifact {
    /// `<base>_split.zip`
    pub file_name: String,
    /// Folder inside the archive holding every page
    pub folder: String,
    /// Page file names in the order they were added
    pub entries: Vec<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Delivered(ArchiveArtifact),
    /// The selection resolved to zero pages; no archive is produced.
    NothingSelected,
}

/// State of one split run. Owned by the caller, never shared between runs.
#[derive(Debug)]
pub struct RunContext {
    file_name: String,
    options: SplitOptions,
    state: RunState,
    last_progress: Option<u8>,
}

impl RunContext {
    /// `file_name` is the declared name of the input, used to name the output.
    pub fn new(file_name: impl Into<String>, options: SplitOptions) -> Self {
        RunContext {
            file_name: file_name.into(),
            options,
            state: RunState::Idle,
            last_progress: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run over `bytes`, calling `on_progress` with a percentage
    /// after every extracted page.
    #[tracing::instrument(skip_all, fields(file = %self.file_name, mode = ?self.options.mode))]
    pub fn run<F>(&mut self, bytes: &[u8], mut on_progress: F) -> Result<RunOutcome>
    where
        F: FnMut(u8),
    {
        debug_assert_eq!(self.state, RunState::Idle, "run contexts are single use");

        self.transition(RunState::Inspecting);
        let source = SourceDocument::load(bytes).map_err(|e| self.fail(e))?;

        self.transition(RunState::ResolvingSelection);
        let selection = PageSelection::resolve(
            self.options.mode,
            self.options.ranges.as_deref(),
            source.page_count(),
        );

        if selection.is_empty() {
            self.transition(RunState::Finalizing);
            self.report(100, &mut on_progress);
            self.transition(RunState::Delivered);
            tracing::info!("no pages selected");
            return Ok(RunOutcome::NothingSelected);
        }

        let artifact = self
            .extract_all(&source, &selection, &mut on_progress)
            .map_err(|e| self.fail(e))?;

        self.transition(RunState::Delivered);
        tracing::info!(
            archive = %artifact.file_name,
            pages = artifact.entries.len(),
            bytes = artifact.bytes.len(),
            "split complete"
        );
        Ok(RunOutcome::Delivered(artifact))
    }

    fn extract_all<F>(
        &mut self,
        source: &SourceDocument,
        selection: &PageSelection,
        on_progress: &mut F,
    ) -> Result<ArchiveArtifact>
    where
        F: FnMut(u8),
    {
        let total_pages = source.page_count();
        let indices = selection.indices();
        let total = indices.len();

        let mut builder = ArchiveBuilder::new(folder_name(&self.file_name))?;
        let mut entries = Vec::with_capacity(total);

        self.transition(RunState::Extracting { done: 0, total });
        for (done, &index) in indices.iter().enumerate() {
            let page = source.extract_page(index)?;
            let name = page_file_name(index, total_pages);
            builder.add_entry(&name, &page)?;
            entries.push(name);

            let done = done + 1;
            self.state = RunState::Extracting { done, total };
            self.report(percent(done, total), on_progress);
        }

        self.transition(RunState::Finalizing);
        let folder = builder.folder().to_string();
        debug_assert_eq!(builder.entry_count(), total);
        let bytes = builder.finalize()?;

        Ok(ArchiveArtifact {
            file_name: archive_file_name(&self.file_name),
            folder,
            entries,
            bytes,
        })
    }

    fn report<F: FnMut(u8)>(&mut self, progress: u8, on_progress: &mut F) {
        debug_assert!(self.last_progress.map_or(true, |last| last <= progress));
        self.last_progress = Some(progress);
        on_progress(progress);
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }

    fn fail(&mut self, err: SplitError) -> SplitError {
        tracing::warn!(state = ?self.state, error = %err, "split failed");
        self.state = RunState::Failed;
        err
    }
}

/// `round(100 * done / total)`, rounding halves up
fn percent(done: usize, total: usize) -> u8 {
    ((done * 100 + total / 2) / total) as u8
}

/// Run a split over an in-memory PDF in one call.
pub fn split_pdf<F>(
    file_name: &str,
    bytes: &[u8],
    options: &SplitOptions,
    on_progress: F,
) -> Result<RunOutcome>
where
    F: FnMut(u8),
{
    RunContext::new(file_name, options.clone()).run(bytes, on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{page_marker, sample_pdf, sample_pdf_with_missing_contents};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn delivered(outcome: RunOutcome) -> ArchiveArtifact {
        match outcome {
            RunOutcome::Delivered(artifact) => artifact,
            RunOutcome::NothingSelected => panic!("expected an archive"),
        }
    }

    fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = Vec::new();
        archive.by_name(name).unwrap().read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_split_all_ten_pages() {
        let pdf = sample_pdf(10);
        let artifact = delivered(split_pdf("book.pdf", &pdf, &SplitOptions::all(), |_| {}).unwrap());

        assert_eq!(artifact.file_name, "book_split.zip");
        assert_eq!(artifact.folder, "book_split");
        let expected: Vec<_> = (1..=10).map(|n| format!("page_{:02}.pdf", n)).collect();
        assert_eq!(artifact.entries, expected);

        let archive = ZipArchive::new(Cursor::new(&artifact.bytes)).unwrap();
        let files: Vec<_> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .collect();
        assert_eq!(files.len(), 10);
        assert!(files.iter().all(|name| name.starts_with("book_split/page_")));
    }

    #[test]
    fn test_entries_hold_the_right_page() {
        let pdf = sample_pdf(5);
        let artifact =
            delivered(split_pdf("a.PDF", &pdf, &SplitOptions::range("4, 2"), |_| {}).unwrap());
        assert_eq!(artifact.entries, vec!["page_2.pdf", "page_4.pdf"]);

        let page = read_entry(&artifact.bytes, "a_split/page_4.pdf");
        let doc = lopdf::Document::load_mem(&page).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(String::from_utf8_lossy(&page).contains(&page_marker(4)));
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        let pdf = sample_pdf(3);
        let mut seen = Vec::new();
        split_pdf("p.pdf", &pdf, &SplitOptions::all(), |p| seen.push(p)).unwrap();
        assert_eq!(seen, vec![33, 67, 100]);
    }

    #[test]
    fn test_progress_once_per_page() {
        let pdf = sample_pdf(12);
        let mut seen = Vec::new();
        split_pdf("p.pdf", &pdf, &SplitOptions::range("1-7"), |p| seen.push(p)).unwrap();
        assert_eq!(seen.len(), 7);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100));
    }

    #[test]
    fn test_empty_selection_produces_no_archive() {
        let pdf = sample_pdf(4);
        let mut seen = Vec::new();
        let mut run = RunContext::new("p.pdf", SplitOptions::range("9-12, nope"));
        let outcome = run.run(&pdf, |p| seen.push(p)).unwrap();

        assert!(matches!(outcome, RunOutcome::NothingSelected));
        assert_eq!(seen, vec![100]);
        assert_eq!(run.state(), RunState::Delivered);
    }

    #[test]
    fn test_invalid_input_fails_without_archive() {
        let mut progress_calls = 0;
        let mut run = RunContext::new("fake.pdf", SplitOptions::all());
        let err = run
            .run(b"GIF89a not a pdf", |_| progress_calls += 1)
            .unwrap_err();

        assert!(matches!(err, SplitError::Load(_)));
        assert_eq!(run.state(), RunState::Failed);
        assert_eq!(progress_calls, 0);
    }

    #[test]
    fn test_extract_failure_aborts_run() {
        let pdf = sample_pdf_with_missing_contents(4, 2);
        let mut seen = Vec::new();
        let mut run = RunContext::new("broken.pdf", SplitOptions::all());
        let err = run.run(&pdf, |p| seen.push(p)).unwrap_err();

        assert!(matches!(err, SplitError::Extract { page: 2, .. }), "{err}");
        assert_eq!(run.state(), RunState::Failed);
        // Page 1 completed, nothing after the broken page was attempted
        assert_eq!(seen, vec![25]);
    }

    #[test]
    fn test_extract_failure_skipped_when_not_selected() {
        let pdf = sample_pdf_with_missing_contents(4, 2);
        let artifact = delivered(
            split_pdf("broken.pdf", &pdf, &SplitOptions::range("1, 3-4"), |_| {}).unwrap(),
        );
        assert_eq!(artifact.entries, vec!["page_1.pdf", "page_3.pdf", "page_4.pdf"]);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let pdf = sample_pdf(6);
        let options = SplitOptions::range("2-4");
        let first = delivered(split_pdf("same.pdf", &pdf, &options, |_| {}).unwrap());
        let second = delivered(split_pdf("same.pdf", &pdf, &options, |_| {}).unwrap());

        assert_eq!(first.entries, second.entries);
        for name in &first.entries {
            let path = format!("same_split/{}", name);
            assert_eq!(
                read_entry(&first.bytes, &path),
                read_entry(&second.bytes, &path)
            );
        }
    }

    #[test]
    fn test_naming_uses_document_length() {
        let pdf = sample_pdf(150);
        let artifact =
            delivered(split_pdf("big.pdf", &pdf, &SplitOptions::range("1"), |_| {}).unwrap());
        assert_eq!(artifact.entries, vec!["page_001.pdf"]);
    }

    #[test]
    fn test_options_from_json() {
        let options: SplitOptions =
            serde_json::from_str(r#"{"mode":"range","ranges":"1-3"}"#).unwrap();
        assert_eq!(options, SplitOptions::range("1-3"));
        let options: SplitOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SplitOptions::all());
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(5, 5), 100);
    }
}
