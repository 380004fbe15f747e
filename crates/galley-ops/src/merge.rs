//! Document merging
//!
//! Merging concatenates the body blocks of the inputs into a fresh
//! document, optionally inserting a separator paragraph and a blank
//! page-break marker paragraph between inputs.

use std::path::Path;

use tracing::debug;

use galley_ooxml::Document;

use crate::{OpsError, Result};

/// Options for merging documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Insert a blank marker paragraph between inputs
    pub page_breaks: bool,
    /// Insert a separator text paragraph between inputs
    pub separator: bool,
    /// The separator text
    pub separator_text: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            page_breaks: true,
            separator: false,
            separator_text: "---".to_string(),
        }
    }
}

/// Merge documents into a new one, in input order
pub fn merge_documents(inputs: &[Document], options: &MergeOptions) -> Result<Document> {
    if inputs.is_empty() {
        return Err(OpsError::NoInput);
    }

    let mut result = Document::new();
    let last = inputs.len() - 1;

    for (i, doc) in inputs.iter().enumerate() {
        if i > 0 && options.separator {
            result.add_paragraph(options.separator_text.clone());
            result.add_paragraph("");
        }

        result.body.extend(doc.body.iter().cloned());

        if i < last && options.page_breaks {
            result.add_paragraph("");
        }
    }

    debug!(
        inputs = inputs.len(),
        paragraphs = result.paragraph_count(),
        "documents merged"
    );
    Ok(result)
}

/// Open, merge, and save documents by path
pub fn merge_files<P: AsRef<Path>>(
    inputs: &[P],
    output: P,
    options: &MergeOptions,
) -> Result<()> {
    if inputs.is_empty() {
        return Err(OpsError::NoInput);
    }

    let mut documents = Vec::with_capacity(inputs.len());
    for path in inputs {
        documents.push(Document::open(path)?);
    }

    let mut merged = merge_documents(&documents, options)?;
    merged.save(output)?;
    Ok(())
}

/// Totals describing what a merge would combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeInfo {
    pub documents: usize,
    pub paragraphs: usize,
    pub tables: usize,
}

/// Inspect inputs without merging them
pub fn merge_info<P: AsRef<Path>>(inputs: &[P]) -> Result<MergeInfo> {
    let mut info = MergeInfo {
        documents: inputs.len(),
        ..MergeInfo::default()
    };
    for path in inputs {
        let doc = Document::open(path)?;
        info.paragraphs += doc.paragraph_count();
        info.tables += doc.table_count();
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(texts: &[&str]) -> Document {
        let mut doc = Document::new();
        for text in texts {
            doc.add_paragraph(*text);
        }
        doc
    }

    #[test]
    fn test_no_inputs_rejected() {
        let err = merge_documents(&[], &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, OpsError::NoInput));
    }

    #[test]
    fn test_merge_without_markers() {
        let options = MergeOptions {
            page_breaks: false,
            separator: false,
            ..MergeOptions::default()
        };
        let merged = merge_documents(
            &[doc_with(&["a1", "a2"]), doc_with(&["b1"])],
            &options,
        )
        .unwrap();

        assert_eq!(merged.paragraph_texts(), vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_merge_with_page_break_markers() {
        let merged = merge_documents(
            &[doc_with(&["a"]), doc_with(&["b"]), doc_with(&["c"])],
            &MergeOptions::default(),
        )
        .unwrap();

        // A blank marker after every input but the last
        assert_eq!(merged.paragraph_texts(), vec!["a", "", "b", "", "c"]);
    }

    #[test]
    fn test_merge_with_separator() {
        let options = MergeOptions {
            page_breaks: false,
            separator: true,
            separator_text: "* * *".to_string(),
        };
        let merged =
            merge_documents(&[doc_with(&["a"]), doc_with(&["b"])], &options).unwrap();

        assert_eq!(merged.paragraph_texts(), vec!["a", "* * *", "", "b"]);
    }

    #[test]
    fn test_paragraph_count_is_sum_plus_markers() {
        let inputs = [doc_with(&["1", "2"]), doc_with(&["3"]), doc_with(&["4", "5"])];
        let sum: usize = inputs.iter().map(|d| d.paragraph_count()).sum();

        let plain = merge_documents(
            &inputs,
            &MergeOptions {
                page_breaks: false,
                separator: false,
                ..MergeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(plain.paragraph_count(), sum);

        let with_breaks = merge_documents(&inputs, &MergeOptions::default()).unwrap();
        assert_eq!(with_breaks.paragraph_count(), sum + 2);
    }

    #[test]
    fn test_tables_carried_over() {
        let mut a = doc_with(&["before"]);
        a.add_table(2, 2);
        let b = doc_with(&["after"]);

        let merged = merge_documents(
            &[a, b],
            &MergeOptions {
                page_breaks: false,
                ..MergeOptions::default()
            },
        )
        .unwrap();

        assert_eq!(merged.table_count(), 1);
        assert_eq!(merged.paragraph_count(), 2);
    }

    #[test]
    fn test_inputs_unchanged_by_merge() {
        let a = doc_with(&["original"]);
        let b = doc_with(&["other"]);
        let mut merged = merge_documents(&[a.clone(), b], &MergeOptions::default()).unwrap();
        merged.replace_text("original", "mutated");

        assert_eq!(a.paragraph_text(0).unwrap(), "original");
    }
}
