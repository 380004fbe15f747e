//! Document splitting
//!
//! Splits operate on the paragraph sequence of the source document:
//! explicit inclusive ranges, N nearly-equal chunks (the last chunk
//! absorbs any remainder), or segments starting at each heading of a given
//! level. File-oriented wrappers expand an output pattern with `{n}`,
//! `{base}`, and (for heading splits) `{title}`.

use std::path::{Path, PathBuf};

use tracing::debug;

use galley_ooxml::Document;

use crate::{OpsError, Result};

/// An inclusive, zero-based paragraph range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphRange {
    pub start: usize,
    pub end: usize,
}

/// Options for split output naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Output filename pattern; `{n}` is the 1-based piece number,
    /// `{base}` the input stem, `{title}` the sanitized heading text
    pub output_pattern: String,
    /// Directory the pieces are written to
    pub output_dir: PathBuf,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            output_pattern: "part_{n}".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Split into one document per range
pub fn split_by_ranges(doc: &Document, ranges: &[ParagraphRange]) -> Result<Vec<Document>> {
    let paragraphs: Vec<_> = doc.paragraphs().cloned().collect();
    let total = paragraphs.len();

    let mut pieces = Vec::with_capacity(ranges.len());
    for range in ranges {
        if range.start > range.end || range.end >= total {
            return Err(OpsError::InvalidRange {
                start: range.start,
                end: range.end,
                total,
            });
        }

        let mut piece = Document::new();
        for paragraph in &paragraphs[range.start..=range.end] {
            piece
                .body
                .push(galley_ooxml::Block::Paragraph(paragraph.clone()));
        }
        pieces.push(piece);
    }

    debug!(pieces = pieces.len(), "document split by ranges");
    Ok(pieces)
}

/// Split into `count` nearly-equal chunks
pub fn split_by_count(doc: &Document, count: usize) -> Result<Vec<Document>> {
    let ranges = count_ranges(doc.paragraph_count(), count)?;
    split_by_ranges(doc, &ranges)
}

fn count_ranges(total: usize, count: usize) -> Result<Vec<ParagraphRange>> {
    if count == 0 {
        return Err(OpsError::InvalidCount);
    }
    if total == 0 {
        return Err(OpsError::EmptyDocument);
    }

    let per_part = (total / count).max(1);
    let mut ranges = Vec::new();
    let mut start = 0;

    for i in 0..count {
        if start >= total {
            break;
        }
        let end = if i == count - 1 {
            total - 1
        } else {
            (start + per_part - 1).min(total - 1)
        };
        ranges.push(ParagraphRange { start, end });
        start = end + 1;
    }

    Ok(ranges)
}

/// Split at headings of the given level (style matching `heading{level}`)
///
/// Every heading begins a new piece that runs up to, but excluding, the
/// next heading of the same level (or the end of the document). Returns
/// the pieces together with each one's sanitized heading title.
pub fn split_by_headings(doc: &Document, level: usize) -> Result<Vec<(Document, String)>> {
    if !(1..=9).contains(&level) {
        return Err(OpsError::InvalidHeadingLevel(level));
    }

    let paragraphs: Vec<_> = doc.paragraphs().cloned().collect();
    let expected = format!("heading{level}");
    let heading_indices: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.style()
                .map(|style| style.to_lowercase().contains(&expected))
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .collect();

    if heading_indices.is_empty() {
        return Err(OpsError::NoHeadings(level));
    }

    let mut pieces = Vec::with_capacity(heading_indices.len());
    for (i, &start) in heading_indices.iter().enumerate() {
        let end = heading_indices
            .get(i + 1)
            .map(|&next| next - 1)
            .unwrap_or(paragraphs.len() - 1);

        let piece = split_by_ranges(doc, &[ParagraphRange { start, end }])?
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut title = sanitize_filename(&paragraphs[start].text());
        if title.chars().count() > 50 {
            title = title.chars().take(50).collect();
        }
        pieces.push((piece, title));
    }

    debug!(pieces = pieces.len(), level, "document split by headings");
    Ok(pieces)
}

/// Split a file by explicit ranges and save the pieces
pub fn split_file_by_ranges<P: AsRef<Path>>(
    input: P,
    ranges: &[ParagraphRange],
    options: &SplitOptions,
) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    let doc = Document::open(input)?;
    let pieces = split_by_ranges(&doc, ranges)?;
    save_pieces(pieces.into_iter().map(|p| (p, None)), input, options)
}

/// Split a file into `count` chunks and save the pieces
pub fn split_file_by_count<P: AsRef<Path>>(
    input: P,
    count: usize,
    options: &SplitOptions,
) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    let doc = Document::open(input)?;
    let pieces = split_by_count(&doc, count)?;
    save_pieces(pieces.into_iter().map(|p| (p, None)), input, options)
}

/// Split a file at headings and save the pieces
pub fn split_file_by_headings<P: AsRef<Path>>(
    input: P,
    level: usize,
    options: &SplitOptions,
) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    let doc = Document::open(input)?;
    let pieces = split_by_headings(&doc, level)?;
    save_pieces(
        pieces.into_iter().map(|(p, title)| (p, Some(title))),
        input,
        options,
    )
}

fn save_pieces<I>(pieces: I, input: &Path, options: &SplitOptions) -> Result<Vec<PathBuf>>
where
    I: Iterator<Item = (Document, Option<String>)>,
{
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("docx");
    let base = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    let mut outputs = Vec::new();
    for (i, (mut piece, title)) in pieces.enumerate() {
        let mut name = options
            .output_pattern
            .replace("{n}", &(i + 1).to_string())
            .replace("{base}", base);
        if let Some(title) = title {
            name = name.replace("{title}", &title);
        }
        if !name.ends_with(&format!(".{extension}")) {
            name.push('.');
            name.push_str(extension);
        }

        let path = options.output_dir.join(name);
        piece.save(&path)?;
        outputs.push(path);
    }

    Ok(outputs)
}

/// Strip filesystem-hostile characters and collapse whitespace
fn sanitize_filename(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a 1-indexed page-range string like "1-5,7,9-12"
///
/// Returns zero-based inclusive ranges. Inverted ranges and references
/// past `max_pages` are rejected.
pub fn parse_page_ranges(spec: &str, max_pages: usize) -> Result<Vec<ParagraphRange>> {
    let mut ranges = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_text, end_text)) = part.split_once('-') {
            let start: usize = start_text
                .trim()
                .parse()
                .map_err(|_| OpsError::BadRangeSyntax(part.to_string()))?;
            let end: usize = end_text
                .trim()
                .parse()
                .map_err(|_| OpsError::BadRangeSyntax(part.to_string()))?;

            if start == 0 || end == 0 || start > end {
                return Err(OpsError::BadRangeSyntax(part.to_string()));
            }
            if end > max_pages {
                return Err(OpsError::PageOutOfRange {
                    page: end,
                    total: max_pages,
                });
            }
            ranges.push(ParagraphRange {
                start: start - 1,
                end: end - 1,
            });
        } else {
            let page: usize = part
                .parse()
                .map_err(|_| OpsError::BadRangeSyntax(part.to_string()))?;
            if page == 0 {
                return Err(OpsError::BadRangeSyntax(part.to_string()));
            }
            if page > max_pages {
                return Err(OpsError::PageOutOfRange {
                    page,
                    total: max_pages,
                });
            }
            ranges.push(ParagraphRange {
                start: page - 1,
                end: page - 1,
            });
        }
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_ooxml::ParagraphOptions;

    fn doc_with(texts: &[&str]) -> Document {
        let mut doc = Document::new();
        for text in texts {
            doc.add_paragraph(*text);
        }
        doc
    }

    #[test]
    fn test_split_by_ranges() {
        let doc = doc_with(&["0", "1", "2", "3", "4"]);
        let pieces = split_by_ranges(
            &doc,
            &[
                ParagraphRange { start: 0, end: 1 },
                ParagraphRange { start: 3, end: 4 },
            ],
        )
        .unwrap();

        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].paragraph_texts(), vec!["0", "1"]);
        assert_eq!(pieces[1].paragraph_texts(), vec!["3", "4"]);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let doc = doc_with(&["0", "1"]);

        let err =
            split_by_ranges(&doc, &[ParagraphRange { start: 1, end: 0 }]).unwrap_err();
        assert!(matches!(err, OpsError::InvalidRange { start: 1, end: 0, total: 2 }));

        let err =
            split_by_ranges(&doc, &[ParagraphRange { start: 0, end: 5 }]).unwrap_err();
        assert!(matches!(err, OpsError::InvalidRange { end: 5, .. }));
    }

    #[test]
    fn test_split_by_count_even() {
        let doc = doc_with(&["a", "b", "c", "d"]);
        let pieces = split_by_count(&doc, 2).unwrap();

        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].paragraph_count(), 2);
        assert_eq!(pieces[1].paragraph_count(), 2);
    }

    #[test]
    fn test_split_by_count_remainder_goes_last() {
        let doc = doc_with(&["a", "b", "c", "d", "e", "f", "g"]);
        let pieces = split_by_count(&doc, 3).unwrap();

        let counts: Vec<usize> = pieces.iter().map(|p| p.paragraph_count()).collect();
        assert_eq!(counts, vec![2, 2, 3]);
    }

    #[test]
    fn test_split_by_count_more_parts_than_paragraphs() {
        let doc = doc_with(&["a", "b"]);
        let pieces = split_by_count(&doc, 5).unwrap();

        let total: usize = pieces.iter().map(|p| p.paragraph_count()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_split_count_reassembles_to_original() {
        let doc = doc_with(&["1", "2", "3", "4", "5", "6", "7"]);
        let pieces = split_by_count(&doc, 3).unwrap();

        let merged = crate::merge::merge_documents(
            &pieces,
            &crate::merge::MergeOptions {
                page_breaks: false,
                separator: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(merged.paragraph_count(), doc.paragraph_count());
        assert_eq!(merged.paragraph_texts(), doc.paragraph_texts());
    }

    #[test]
    fn test_split_count_errors() {
        assert!(matches!(
            split_by_count(&doc_with(&["a"]), 0).unwrap_err(),
            OpsError::InvalidCount
        ));
        assert!(matches!(
            split_by_count(&Document::new(), 2).unwrap_err(),
            OpsError::EmptyDocument
        ));
    }

    fn heading_doc() -> Document {
        let mut doc = Document::new();
        let heading = ParagraphOptions::new().style("Heading1");
        doc.add_paragraph_with("Intro", &heading);
        doc.add_paragraph("i1");
        doc.add_paragraph("i2");
        doc.add_paragraph_with("Middle", &heading);
        doc.add_paragraph("m1");
        doc.add_paragraph("m2");
        doc.add_paragraph_with("End", &heading);
        doc.add_paragraph("e1");
        doc.add_paragraph("e2");
        doc.add_paragraph("e3");
        doc
    }

    #[test]
    fn test_split_by_headings() {
        let pieces = split_by_headings(&heading_doc(), 1).unwrap();

        assert_eq!(pieces.len(), 3);
        let counts: Vec<usize> = pieces.iter().map(|(p, _)| p.paragraph_count()).collect();
        assert_eq!(counts, vec![3, 3, 4]);

        let titles: Vec<&str> = pieces.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Middle", "End"]);
    }

    #[test]
    fn test_heading_title_truncates_on_char_boundary() {
        let mut doc = Document::new();
        // 60 three-byte glyphs: a byte-indexed cut at 50 would split one
        let long_title = "文".repeat(60);
        doc.add_paragraph_with(&long_title, &ParagraphOptions::new().style("Heading1"));
        doc.add_paragraph("body");

        let pieces = split_by_headings(&doc, 1).unwrap();
        let (_, title) = &pieces[0];
        assert_eq!(title.chars().count(), 50);
        assert_eq!(title.as_str(), "文".repeat(50));
    }

    #[test]
    fn test_short_heading_title_kept_whole() {
        let mut doc = Document::new();
        doc.add_paragraph_with("Résumé", &ParagraphOptions::new().style("Heading1"));
        doc.add_paragraph("body");

        let pieces = split_by_headings(&doc, 1).unwrap();
        assert_eq!(pieces[0].1, "Résumé");
    }

    #[test]
    fn test_split_by_headings_errors() {
        assert!(matches!(
            split_by_headings(&heading_doc(), 0).unwrap_err(),
            OpsError::InvalidHeadingLevel(0)
        ));
        assert!(matches!(
            split_by_headings(&heading_doc(), 2).unwrap_err(),
            OpsError::NoHeadings(2)
        ));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("  spaced   out  "), "spaced out");
        assert_eq!(sanitize_filename("what?"), "what_");
    }

    #[test]
    fn test_parse_page_ranges() {
        let ranges = parse_page_ranges("1-3,5,7-9", 10).unwrap();
        assert_eq!(
            ranges,
            vec![
                ParagraphRange { start: 0, end: 2 },
                ParagraphRange { start: 4, end: 4 },
                ParagraphRange { start: 6, end: 8 },
            ]
        );
    }

    #[test]
    fn test_parse_page_ranges_rejects_bad_input() {
        assert!(matches!(
            parse_page_ranges("5-2", 10).unwrap_err(),
            OpsError::BadRangeSyntax(_)
        ));
        assert!(matches!(
            parse_page_ranges("1-20", 10).unwrap_err(),
            OpsError::PageOutOfRange { page: 20, total: 10 }
        ));
        assert!(matches!(
            parse_page_ranges("abc", 10).unwrap_err(),
            OpsError::BadRangeSyntax(_)
        ));
        assert!(matches!(
            parse_page_ranges("0", 10).unwrap_err(),
            OpsError::BadRangeSyntax(_)
        ));
    }

    #[test]
    fn test_parse_page_ranges_skips_empty_parts() {
        let ranges = parse_page_ranges("1,,2", 5).unwrap();
        assert_eq!(ranges.len(), 2);
    }
}
