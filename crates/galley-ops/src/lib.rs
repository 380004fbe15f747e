//! # galley-ops
//!
//! Document composition and decomposition: merging several documents into
//! one, and splitting one document into several at paragraph granularity
//! (explicit ranges, equal chunks, or heading boundaries).
//!
//! Every output is a complete, valid document in its own right.

pub mod merge;
pub mod split;

use thiserror::Error;

pub use merge::{merge_documents, merge_files, merge_info, MergeInfo, MergeOptions};
pub use split::{
    parse_page_ranges, split_by_count, split_by_headings, split_by_ranges, split_file_by_count,
    split_file_by_headings, split_file_by_ranges, ParagraphRange, SplitOptions,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that can occur during merge and split operations
#[derive(Error, Debug)]
pub enum OpsError {
    /// Underlying document error
    #[error(transparent)]
    Ooxml(#[from] galley_ooxml::OoxmlError),

    /// No inputs supplied to a merge
    #[error("no input documents provided")]
    NoInput,

    /// A split source with nothing to split
    #[error("document has no paragraphs")]
    EmptyDocument,

    /// An inverted or out-of-bounds paragraph range
    #[error("invalid range [{start}:{end}], document has {total} paragraphs")]
    InvalidRange {
        start: usize,
        end: usize,
        total: usize,
    },

    /// A split count that is not positive
    #[error("count must be positive")]
    InvalidCount,

    /// A heading level outside 1..=9
    #[error("invalid heading level: {0}")]
    InvalidHeadingLevel(usize),

    /// No paragraph styled at the requested heading level
    #[error("no headings found at level {0}")]
    NoHeadings(usize),

    /// A page-range string that does not parse
    #[error("invalid page range: {0}")]
    BadRangeSyntax(String),

    /// A 1-indexed page reference outside the document
    #[error("page {page} out of range, document has {total} pages")]
    PageOutOfRange { page: usize, total: usize },
}

/// Result type for merge and split operations
pub type Result<T> = std::result::Result<T, OpsError>;
