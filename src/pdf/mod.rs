pub mod document;
mod page_copy;

#[cfg(test)]
pub mod fixtures;

pub use document::{accept_pdf, inspect, SourceDocument};
