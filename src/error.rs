use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

/// Terminal failures of a split run. Malformed range tokens are never errors.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The input is not a readable PDF document.
    #[error("Invalid PDF file: {0}")]
    Load(String),

    /// A single page could not be copied into its own document.
    #[error("Failed to extract page {page}: {reason}")]
    Extract { page: u32, reason: String },

    /// The archive could not be assembled or serialized.
    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The host could not save the finished artifact.
    #[error("Failed to deliver {name}: {source}")]
    Delivery {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub(crate) fn extract(page_index: usize, reason: impl ToString) -> Self {
        SplitError::Extract {
            page: page_index as u32 + 1,
            reason: reason.to_string(),
        }
    }
}

