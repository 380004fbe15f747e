//! Typed header and footer parts
//!
//! Headers and footers are keyed by kind: a scope (default, first page,
//! even pages) crossed with header or footer. Each populated entry is
//! serialized on save as its own package part (`word/header1.xml`,
//! `word/footer1.xml`, ...) with a relationship, a content-type override,
//! and a `w:sectPr` reference in the body.

use crate::content_types::{FOOTER_CONTENT_TYPE, HEADER_CONTENT_TYPE};
use crate::document::{
    Document, Justification, Paragraph, ParagraphProps, Run, RunProps, Text,
};
use crate::error::{OoxmlError, Result};
use crate::relationships::Relationships;
use crate::writer;

/// Header/footer slot: scope crossed with header or footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderFooterKind {
    HeaderDefault,
    HeaderFirst,
    HeaderEven,
    FooterDefault,
    FooterFirst,
    FooterEven,
}

impl HeaderFooterKind {
    /// Whether this kind names a footer slot
    pub fn is_footer(&self) -> bool {
        matches!(
            self,
            Self::FooterDefault | Self::FooterFirst | Self::FooterEven
        )
    }

    /// The `w:type` attribute of the section reference
    pub fn scope(&self) -> &'static str {
        match self {
            Self::HeaderDefault | Self::FooterDefault => "default",
            Self::HeaderFirst | Self::FooterFirst => "first",
            Self::HeaderEven | Self::FooterEven => "even",
        }
    }

    /// Stable display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeaderDefault => "header-default",
            Self::HeaderFirst => "header-first",
            Self::HeaderEven => "header-even",
            Self::FooterDefault => "footer-default",
            Self::FooterFirst => "footer-first",
            Self::FooterEven => "footer-even",
        }
    }
}

/// Formatting options for header/footer content
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFooterOptions {
    pub alignment: Justification,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points
    pub size: String,
    /// RRGGBB hex without '#'
    pub color: Option<String>,
    /// Font family for the ASCII range
    pub font: String,
}

impl Default for HeaderFooterOptions {
    fn default() -> Self {
        Self {
            alignment: Justification::Left,
            bold: false,
            italic: false,
            size: "22".to_string(),
            color: None,
            font: "Calibri".to_string(),
        }
    }
}

impl HeaderFooterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignment(mut self, justification: Justification) -> Self {
        self.alignment = justification;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Font size in half-points
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// RRGGBB hex color without '#'
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }
}

/// A header or footer part
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFooter {
    pub kind: HeaderFooterKind,
    pub paragraphs: Vec<Paragraph>,
    /// Archive part name, assigned on first save
    pub(crate) part_name: Option<String>,
    /// Relationship id into the document part, assigned on first save
    pub(crate) rel_id: Option<String>,
}

impl HeaderFooter {
    fn new(kind: HeaderFooterKind, content: &str, options: &HeaderFooterOptions) -> Self {
        Self {
            kind,
            paragraphs: vec![styled_paragraph(content, options)],
            part_name: None,
            rel_id: None,
        }
    }

    /// Concatenated text of the part
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn styled_paragraph(content: &str, options: &HeaderFooterOptions) -> Paragraph {
    let run = Run {
        props: Some(RunProps {
            bold: options.bold,
            italic: options.italic,
            size: Some(options.size.clone()),
            color: options.color.clone(),
            font: Some(options.font.clone()),
        }),
        texts: vec![Text::preserved(content)],
        ..Run::default()
    };

    let props = (options.alignment != Justification::Left).then(|| ParagraphProps {
        justification: Some(options.alignment),
        ..ParagraphProps::default()
    });

    Paragraph {
        props,
        runs: vec![run],
    }
}

impl Document {
    /// Set a header, replacing any existing one of the same kind
    pub fn set_header(
        &mut self,
        kind: HeaderFooterKind,
        content: &str,
        options: &HeaderFooterOptions,
    ) -> Result<()> {
        if kind.is_footer() {
            return Err(OoxmlError::InvalidHeaderFooterKind(
                kind.as_str().to_string(),
            ));
        }
        self.replace_header_footer(kind, content, options);
        Ok(())
    }

    /// Set a footer, replacing any existing one of the same kind
    pub fn set_footer(
        &mut self,
        kind: HeaderFooterKind,
        content: &str,
        options: &HeaderFooterOptions,
    ) -> Result<()> {
        if !kind.is_footer() {
            return Err(OoxmlError::InvalidHeaderFooterKind(
                kind.as_str().to_string(),
            ));
        }
        self.replace_header_footer(kind, content, options);
        Ok(())
    }

    fn replace_header_footer(
        &mut self,
        kind: HeaderFooterKind,
        content: &str,
        options: &HeaderFooterOptions,
    ) {
        let mut entry = HeaderFooter::new(kind, content, options);
        // Keep the part and relationship of a previously saved entry so a
        // replacement reuses its slot instead of leaking parts.
        if let Some(existing) = self.header_footers.get(&kind) {
            entry.part_name.clone_from(&existing.part_name);
            entry.rel_id.clone_from(&existing.rel_id);
        }
        self.header_footers.insert(kind, entry);
    }

    /// Get a header by kind
    pub fn header(&self, kind: HeaderFooterKind) -> Option<&HeaderFooter> {
        if kind.is_footer() {
            return None;
        }
        self.header_footers.get(&kind)
    }

    /// Get a footer by kind
    pub fn footer(&self, kind: HeaderFooterKind) -> Option<&HeaderFooter> {
        if !kind.is_footer() {
            return None;
        }
        self.header_footers.get(&kind)
    }

    /// Check whether a header of this kind exists
    pub fn has_header(&self, kind: HeaderFooterKind) -> bool {
        self.header(kind).is_some()
    }

    /// Check whether a footer of this kind exists
    pub fn has_footer(&self, kind: HeaderFooterKind) -> bool {
        self.footer(kind).is_some()
    }

    /// Remove a header; errors when none of this kind exists
    pub fn remove_header(&mut self, kind: HeaderFooterKind) -> Result<()> {
        if kind.is_footer() {
            return Err(OoxmlError::InvalidHeaderFooterKind(
                kind.as_str().to_string(),
            ));
        }
        self.remove_header_footer(kind)
    }

    /// Remove a footer; errors when none of this kind exists
    pub fn remove_footer(&mut self, kind: HeaderFooterKind) -> Result<()> {
        if !kind.is_footer() {
            return Err(OoxmlError::InvalidHeaderFooterKind(
                kind.as_str().to_string(),
            ));
        }
        self.remove_header_footer(kind)
    }

    fn remove_header_footer(&mut self, kind: HeaderFooterKind) -> Result<()> {
        let entry = self
            .header_footers
            .remove(&kind)
            .ok_or_else(|| OoxmlError::MissingFile(kind.as_str().to_string()))?;
        if let Some(part_name) = entry.part_name {
            self.archive.remove(&part_name);
            self.content_types.remove_override(&format!("/{part_name}"));
        }
        if let Some(rel_id) = entry.rel_id {
            self.relationships.remove(&rel_id);
        }
        Ok(())
    }

    /// Serialize header/footer parts and register their package wiring
    pub(crate) fn sync_header_footers(&mut self) {
        let kinds: Vec<HeaderFooterKind> = self.header_footers.keys().copied().collect();
        for kind in kinds {
            // Assign a part slot the first time this entry is saved.
            let needs_slot = self
                .header_footers
                .get(&kind)
                .map(|e| e.part_name.is_none())
                .unwrap_or(false);
            if needs_slot {
                let prefix = if kind.is_footer() { "footer" } else { "header" };
                let mut n = 1;
                while self.archive.contains(&format!("word/{prefix}{n}.xml")) {
                    n += 1;
                }
                let filename = format!("{prefix}{n}.xml");
                let rel_type = if kind.is_footer() {
                    Relationships::TYPE_FOOTER
                } else {
                    Relationships::TYPE_HEADER
                };
                let rel_id = self.relationships.add(filename.clone(), rel_type);
                if let Some(entry) = self.header_footers.get_mut(&kind) {
                    entry.part_name = Some(format!("word/{filename}"));
                    entry.rel_id = Some(rel_id);
                }
            }

            let Some(entry) = self.header_footers.get(&kind) else {
                continue;
            };
            let Some(part_name) = entry.part_name.clone() else {
                continue;
            };

            let content_type = if kind.is_footer() {
                FOOTER_CONTENT_TYPE
            } else {
                HEADER_CONTENT_TYPE
            };
            self.content_types
                .register_override(&format!("/{part_name}"), content_type);
            self.archive
                .set_string(part_name, writer::header_footer_xml(entry));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_header() {
        let mut doc = Document::new();
        doc.set_header(
            HeaderFooterKind::HeaderDefault,
            "Company Confidential",
            &HeaderFooterOptions::default(),
        )
        .unwrap();

        assert!(doc.has_header(HeaderFooterKind::HeaderDefault));
        assert!(!doc.has_header(HeaderFooterKind::HeaderFirst));
        let header = doc.header(HeaderFooterKind::HeaderDefault).unwrap();
        assert_eq!(header.text(), "Company Confidential");
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut doc = Document::new();
        let err = doc
            .set_header(
                HeaderFooterKind::FooterDefault,
                "oops",
                &HeaderFooterOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidHeaderFooterKind(_)));
        assert!(err.to_string().contains("invalid header/footer type"));

        let err = doc
            .set_footer(
                HeaderFooterKind::HeaderEven,
                "oops",
                &HeaderFooterOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidHeaderFooterKind(_)));
    }

    #[test]
    fn test_set_replaces_prior_value() {
        let mut doc = Document::new();
        doc.set_footer(
            HeaderFooterKind::FooterDefault,
            "v1",
            &HeaderFooterOptions::default(),
        )
        .unwrap();
        doc.set_footer(
            HeaderFooterKind::FooterDefault,
            "v2",
            &HeaderFooterOptions::default(),
        )
        .unwrap();

        assert_eq!(
            doc.footer(HeaderFooterKind::FooterDefault).unwrap().text(),
            "v2"
        );
    }

    #[test]
    fn test_remove_missing_errors() {
        let mut doc = Document::new();
        assert!(doc.remove_header(HeaderFooterKind::HeaderDefault).is_err());

        doc.set_header(
            HeaderFooterKind::HeaderDefault,
            "x",
            &HeaderFooterOptions::default(),
        )
        .unwrap();
        doc.remove_header(HeaderFooterKind::HeaderDefault).unwrap();
        assert!(!doc.has_header(HeaderFooterKind::HeaderDefault));
    }

    #[test]
    fn test_options_defaults() {
        let options = HeaderFooterOptions::default();
        assert_eq!(options.alignment, Justification::Left);
        assert_eq!(options.font, "Calibri");
        assert_eq!(options.size, "22");
        assert!(!options.bold);
    }

    #[test]
    fn test_styled_paragraph_formatting() {
        let options = HeaderFooterOptions::new()
            .bold()
            .alignment(Justification::Center)
            .color("FF0000")
            .size("24");
        let paragraph = styled_paragraph("Page header", &options);

        let run_props = paragraph.runs[0].props.as_ref().unwrap();
        assert!(run_props.bold);
        assert_eq!(run_props.color.as_deref(), Some("FF0000"));
        assert_eq!(run_props.size.as_deref(), Some("24"));
        assert_eq!(
            paragraph.props.as_ref().unwrap().justification,
            Some(Justification::Center)
        );
    }

    #[test]
    fn test_save_emits_parts_and_wiring() {
        let mut doc = Document::new();
        doc.set_header(
            HeaderFooterKind::HeaderDefault,
            "Top",
            &HeaderFooterOptions::default(),
        )
        .unwrap();
        doc.set_footer(
            HeaderFooterKind::FooterDefault,
            "Bottom",
            &HeaderFooterOptions::default(),
        )
        .unwrap();

        let bytes = doc.to_bytes().unwrap();
        let archive = crate::OoxmlArchive::from_reader(std::io::Cursor::new(bytes)).unwrap();

        assert!(archive.contains("word/header1.xml"));
        assert!(archive.contains("word/footer1.xml"));

        let header_xml = archive.get_string("word/header1.xml").unwrap();
        assert!(header_xml.contains("<w:hdr"));
        assert!(header_xml.contains("Top"));

        let rels = archive.get_string("word/_rels/document.xml.rels").unwrap();
        assert!(rels.contains("header1.xml"));
        assert!(rels.contains("footer1.xml"));

        let types = archive.get_string("[Content_Types].xml").unwrap();
        assert!(types.contains("/word/header1.xml"));
        assert!(types.contains("/word/footer1.xml"));

        let document = archive.get_string("word/document.xml").unwrap();
        assert!(document.contains("w:headerReference"));
        assert!(document.contains("w:footerReference"));
    }

    #[test]
    fn test_repeated_save_reuses_slots() {
        let mut doc = Document::new();
        doc.set_header(
            HeaderFooterKind::HeaderDefault,
            "One",
            &HeaderFooterOptions::default(),
        )
        .unwrap();

        let _ = doc.to_bytes().unwrap();
        let rel_count = doc.relationships().len();
        let _ = doc.to_bytes().unwrap();

        assert_eq!(doc.relationships().len(), rel_count);
        assert!(doc.archive().contains("word/header1.xml"));
        assert!(!doc.archive().contains("word/header2.xml"));
    }
}
