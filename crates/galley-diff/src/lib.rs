//! # galley-diff
//!
//! Paragraph-level comparison of two documents. Each document is reduced
//! to one string per body paragraph (tables are not compared), a classical
//! longest-common-subsequence matrix is built over the two sequences, and
//! the backtrack yields an ordered change list renderable as HTML,
//! Markdown, or plain text.
//!
//! ## Example
//!
//! ```no_run
//! use galley_diff::{DiffOptions, Differ, Render, TextRenderer};
//!
//! let differ = Differ::new(DiffOptions::default());
//! let result = differ.compare("old.docx", "new.docx")?;
//! let renderer = TextRenderer { show_stats: true, color: false };
//! println!("{}", renderer.render(&result));
//! # Ok::<(), galley_diff::DiffError>(())
//! ```

pub mod renderer;

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use galley_ooxml::Document;

pub use renderer::{HtmlRenderer, MarkdownRenderer, Render, TextRenderer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that can occur while comparing documents
#[derive(Error, Debug)]
pub enum DiffError {
    /// A document could not be opened or parsed
    #[error(transparent)]
    Ooxml(#[from] galley_ooxml::OoxmlError),
}

/// Result type for diff operations
pub type Result<T> = std::result::Result<T, DiffError>;

/// The kind of a change
///
/// The comparison emits `Added` and `Deleted` only; collocated edits
/// appear as a deletion/addition pair. `Modified` stays in the taxonomy
/// for renderers, and `Unchanged` lines are counted in the statistics but
/// not emitted as changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Unchanged,
    Added,
    Deleted,
    Modified,
}

impl ChangeKind {
    /// Stable lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
        }
    }
}

/// A single change in the comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub kind: ChangeKind,
    /// The old-document line, for deletions and modifications
    pub old: String,
    /// The new-document line, for additions and modifications
    pub new: String,
    /// Zero-based paragraph position in the owning document
    pub position: usize,
}

/// Aggregated change counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Added + deleted + modified
    pub total_changes: usize,
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
    /// Lines common to both documents; not part of the change list
    pub unchanged: usize,
}

/// The result of comparing two documents
#[derive(Debug, Clone, PartialEq)]
pub struct DiffResult {
    pub changes: Vec<Change>,
    pub stats: DiffStats,
    pub old_document: String,
    pub new_document: String,
}

/// Options for the comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Compare lines after trimming surrounding whitespace
    pub ignore_whitespace: bool,
    /// Compare lines case-insensitively
    pub ignore_case: bool,
    /// Context lines around changes; reserved for renderers
    pub context_lines: usize,
    /// Minimum length to consider a change; reserved
    pub min_change_length: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            ignore_case: false,
            context_lines: 3,
            min_change_length: 1,
        }
    }
}

/// Compares documents paragraph by paragraph
#[derive(Debug, Clone, Default)]
pub struct Differ {
    options: DiffOptions,
}

impl Differ {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Open and compare two documents from disk
    pub fn compare<P: AsRef<Path>>(&self, old_path: P, new_path: P) -> Result<DiffResult> {
        let old_path = old_path.as_ref();
        let new_path = new_path.as_ref();

        let old_doc = Document::open(old_path)?;
        let new_doc = Document::open(new_path)?;

        Ok(self.compare_documents(
            &old_doc,
            &new_doc,
            &old_path.display().to_string(),
            &new_path.display().to_string(),
        ))
    }

    /// Compare two in-memory documents
    pub fn compare_documents(
        &self,
        old_doc: &Document,
        new_doc: &Document,
        old_label: &str,
        new_label: &str,
    ) -> DiffResult {
        let old_lines = old_doc.paragraph_texts();
        let new_lines = new_doc.paragraph_texts();

        let (changes, unchanged) = self.diff_lines(&old_lines, &new_lines);
        let stats = aggregate(&changes, unchanged);
        debug!(
            changes = changes.len(),
            unchanged, "documents compared"
        );

        DiffResult {
            changes,
            stats,
            old_document: old_label.to_string(),
            new_document: new_label.to_string(),
        }
    }

    /// LCS matrix and backtrack over two line sequences
    fn diff_lines(&self, old: &[String], new: &[String]) -> (Vec<Change>, usize) {
        let m = old.len();
        let n = new.len();

        let mut matrix = vec![vec![0usize; n + 1]; m + 1];
        for i in 1..=m {
            for j in 1..=n {
                if self.lines_equal(&old[i - 1], &new[j - 1]) {
                    matrix[i][j] = matrix[i - 1][j - 1] + 1;
                } else {
                    matrix[i][j] = matrix[i - 1][j].max(matrix[i][j - 1]);
                }
            }
        }

        let mut changes = Vec::new();
        let mut unchanged = 0;
        let (mut i, mut j) = (m, n);
        while i > 0 || j > 0 {
            if i > 0 && j > 0 && self.lines_equal(&old[i - 1], &new[j - 1]) {
                unchanged += 1;
                i -= 1;
                j -= 1;
            } else if j > 0 && (i == 0 || matrix[i][j - 1] >= matrix[i - 1][j]) {
                // Ties prefer the addition step
                changes.push(Change {
                    kind: ChangeKind::Added,
                    old: String::new(),
                    new: new[j - 1].clone(),
                    position: j - 1,
                });
                j -= 1;
            } else {
                changes.push(Change {
                    kind: ChangeKind::Deleted,
                    old: old[i - 1].clone(),
                    new: String::new(),
                    position: i - 1,
                });
                i -= 1;
            }
        }
        changes.reverse();

        (changes, unchanged)
    }

    /// Line equality under the configured options
    fn lines_equal(&self, a: &str, b: &str) -> bool {
        let (mut a, mut b) = (a.to_string(), b.to_string());
        if self.options.ignore_whitespace {
            a = a.trim().to_string();
            b = b.trim().to_string();
        }
        if self.options.ignore_case {
            a = a.to_lowercase();
            b = b.to_lowercase();
        }
        a == b
    }
}

fn aggregate(changes: &[Change], unchanged: usize) -> DiffStats {
    let mut stats = DiffStats {
        unchanged,
        ..DiffStats::default()
    };
    for change in changes {
        stats.total_changes += 1;
        match change.kind {
            ChangeKind::Added => stats.added += 1,
            ChangeKind::Deleted => stats.deleted += 1,
            ChangeKind::Modified => stats.modified += 1,
            ChangeKind::Unchanged => {}
        }
    }
    stats
}
