use rmcp::schemars;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Whether every page or a typed subset is split out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    All,
    Range,
}

/// Resolved set of zero-based page indices, always ascending and unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    All(usize),
    Explicit(Vec<usize>),
}

impl PageSelection {
    /// Resolve a selection request against a document of `page_count` pages.
    ///
    /// Range mode without a range string selects nothing.
    pub fn resolve(mode: SelectionMode, ranges: Option<&str>, page_count: usize) -> Self {
        match mode {
            SelectionMode::All => PageSelection::All(page_count),
            SelectionMode::Range => {
                PageSelection::Explicit(parse_page_ranges(ranges.unwrap_or(""), page_count))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PageSelection::All(count) => *count,
            PageSelection::Explicit(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> Vec<usize> {
        match self {
            PageSelection::All(count) => (0..*count).collect(),
            PageSelection::Explicit(indices) => indices.clone(),
        }
    }
}

/// Parse a comma-separated list like "1-5, 8, 11-13" into zero-based page indices.
///
/// Lenient: a token with a hyphen is read as `start-end` from its first two
/// hyphen-separated fields, where an empty field counts as 0 (so "-3" is 0-3
/// and "1-2-3" is 1-2). Tokens that don't parse as numbers are skipped,
/// reversed ranges select nothing, and pages outside `1..=page_count` are
/// dropped. The result is sorted and free of duplicates.
pub fn parse_page_ranges(s: &str, page_count: usize) -> Vec<usize> {
    let mut pages = BTreeSet::new();

    for token in s.split(',').map(str::trim) {
        if token.contains('-') {
            let mut fields = token.split('-').map(parse_range_bound);
            let (Some(Some(start)), Some(Some(end))) = (fields.next(), fields.next()) else {
                continue;
            };
            // Clamp first so "1-4000000000" doesn't walk billions of pages
            let start = start.max(1);
            let end = end.min(page_count);
            pages.extend((start..=end).map(|page| page - 1));
        } else if let Some(page) = parse_page_number(token) {
            if (1..=page_count).contains(&page) {
                pages.insert(page - 1);
            }
        }
    }

    pages.into_iter().collect()
}

fn parse_page_number(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok()
}

fn parse_range_bound(s: &str) -> Option<usize> {
    if s.trim().is_empty() {
        Some(0)
    } else {
        parse_page_number(s)
    }
}
