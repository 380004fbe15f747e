//! The document model and root aggregate
//!
//! A [`Document`] owns an ordered body of blocks (paragraphs and tables),
//! the backing archive with every package part, the content-type registry,
//! the relationship table of the document part, and the monotonic id
//! counters used by the image subsystem.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, ROOT_RELS_PART,
};
use crate::content_types::ContentTypes;
use crate::error::{OoxmlError, Result};
use crate::header_footer::{HeaderFooter, HeaderFooterKind};
use crate::image::Drawing;
use crate::parse;
use crate::properties::{CoreProperties, CORE_PROPS_PART};
use crate::relationships::Relationships;
use crate::table::Table;
use crate::writer;

/// Root relationship part naming the main document part
const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Paragraph justification values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Center,
    Right,
    /// Justified on both margins
    Both,
}

impl Justification {
    /// The `w:jc` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Both => "both",
        }
    }

    /// Parse a `w:jc` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "justify" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Paragraph spacing in twentieths of a point, kept as the raw attribute strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spacing {
    pub before: Option<String>,
    pub after: Option<String>,
    pub line: Option<String>,
}

/// Paragraph-level properties (`w:pPr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProps {
    /// Style id referencing the style sheet (e.g. "Heading1")
    pub style: Option<String>,
    pub justification: Option<Justification>,
    pub spacing: Option<Spacing>,
}

/// A text fragment inside a run (`w:t`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub content: String,
    /// Whether `xml:space="preserve"` was set
    pub preserve_space: bool,
}

impl Text {
    /// A fragment with whitespace preservation on
    pub fn preserved(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            preserve_space: true,
        }
    }
}

/// Run-level properties (`w:rPr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProps {
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points (e.g. "22" for 11pt)
    pub size: Option<String>,
    /// RRGGBB hex without '#'
    pub color: Option<String>,
    /// Font family for the ASCII range
    pub font: Option<String>,
}

/// A contiguous formatted span inside a paragraph (`w:r`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub props: Option<RunProps>,
    pub texts: Vec<Text>,
    /// Inline image reference
    pub drawing: Option<Drawing>,
    /// Tab marker (`w:tab`)
    pub tab: bool,
    /// Line break marker (`w:br`)
    pub line_break: bool,
}

impl Run {
    /// A run holding a single preserved text fragment
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            texts: vec![Text::preserved(content)],
            ..Self::default()
        }
    }

    /// Concatenated text of all fragments
    pub fn text(&self) -> String {
        self.texts.iter().map(|t| t.content.as_str()).collect()
    }
}

/// A paragraph (`w:p`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub props: Option<ParagraphProps>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// A paragraph holding one run with the given text
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            props: None,
            runs: vec![Run::from_text(content)],
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text()).collect()
    }

    /// Whether the concatenated text is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// The style id, if any
    pub fn style(&self) -> Option<&str> {
        self.props.as_ref().and_then(|p| p.style.as_deref())
    }
}

/// Block-level body items; insertion order is rendering order
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Formatting applied by [`Document::add_paragraph_with`]
#[derive(Debug, Clone, Default)]
pub struct ParagraphOptions {
    bold: bool,
    italic: bool,
    size: Option<String>,
    color: Option<String>,
    alignment: Option<Justification>,
    style: Option<String>,
}

impl ParagraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bold run text
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Italic run text
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Font size in half-points
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// RRGGBB hex color without '#'
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn alignment(mut self, justification: Justification) -> Self {
        self.alignment = Some(justification);
        self
    }

    /// Paragraph style id (e.g. "Heading1")
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    fn apply(&self, paragraph: &mut Paragraph) {
        if self.bold || self.italic || self.size.is_some() || self.color.is_some() {
            for run in &mut paragraph.runs {
                let props = run.props.get_or_insert_with(RunProps::default);
                props.bold |= self.bold;
                props.italic |= self.italic;
                if props.size.is_none() {
                    props.size.clone_from(&self.size);
                }
                if props.color.is_none() {
                    props.color.clone_from(&self.color);
                }
            }
        }
        if self.alignment.is_some() || self.style.is_some() {
            let props = paragraph.props.get_or_insert_with(ParagraphProps::default);
            if props.justification.is_none() {
                props.justification = self.alignment;
            }
            if props.style.is_none() {
                props.style.clone_from(&self.style);
            }
        }
    }
}

/// A word-processing document
///
/// Created empty with [`Document::new`] or loaded with [`Document::open`],
/// mutated in place, and re-serialized on save. Cloning produces a deep copy
/// that shares nothing with the original.
#[derive(Debug, Clone)]
pub struct Document {
    /// Ordered body blocks
    pub body: Vec<Block>,
    pub(crate) archive: OoxmlArchive,
    pub(crate) content_types: ContentTypes,
    pub(crate) relationships: Relationships,
    pub(crate) next_image_id: u32,
    pub(crate) header_footers: BTreeMap<HeaderFooterKind, HeaderFooter>,
    pub(crate) core_properties: Option<CoreProperties>,
    path: Option<PathBuf>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with the minimum set of valid parts
    pub fn new() -> Self {
        let mut doc = Self {
            body: Vec::new(),
            archive: OoxmlArchive::new(),
            content_types: ContentTypes::minimal(),
            relationships: Relationships::new(),
            next_image_id: 1,
            header_footers: BTreeMap::new(),
            core_properties: None,
            path: None,
        };
        doc.sync_parts();
        doc
    }

    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let archive = OoxmlArchive::open(path)?;
        let mut doc = Self::from_archive(archive)?;
        doc.path = Some(path.to_path_buf());
        debug!(path = %path.display(), blocks = doc.body.len(), "document opened");
        Ok(doc)
    }

    /// Read a document from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_reader(reader)?)
    }

    /// Read a document from an in-memory byte buffer
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let body = parse::parse_document(archive.document_xml()?)?;

        let relationships = match archive.document_rels_xml() {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };

        let content_types = match archive.content_types_xml() {
            Some(xml) => ContentTypes::parse(xml)?,
            None => ContentTypes::minimal(),
        };

        let drawing_count = body
            .iter()
            .flat_map(block_paragraphs)
            .flat_map(|p| p.runs.iter())
            .filter(|r| r.drawing.is_some())
            .count() as u32;

        let core_properties = match archive.get(CORE_PROPS_PART) {
            Some(xml) => Some(CoreProperties::parse(xml)?),
            None => None,
        };

        Ok(Self {
            body,
            archive,
            content_types,
            relationships,
            next_image_id: drawing_count + 1,
            header_footers: BTreeMap::new(),
            core_properties,
            path: None,
        })
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.sync_parts();
        self.archive.write_to_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "document saved");
        Ok(())
    }

    /// Write the document to any writer
    pub fn write_to<W: Write + Seek>(&mut self, writer: W) -> Result<()> {
        self.sync_parts();
        self.archive.write_to(writer)
    }

    /// Serialize the document to an in-memory DOCX package
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Re-serialize model state into the files map
    fn sync_parts(&mut self) {
        for block in &mut self.body {
            if let Block::Table(table) = block {
                table.normalize();
            }
        }

        self.sync_header_footers();

        if !self.archive.contains(ROOT_RELS_PART) {
            self.archive.set_string(ROOT_RELS_PART, ROOT_RELS_XML);
        }
        self.sync_core_properties();

        let document_xml = writer::document_xml(&self.body, &self.header_footers);
        self.archive.set_string(DOCUMENT_PART, document_xml);
        self.archive
            .set_string(DOCUMENT_RELS_PART, self.relationships.to_xml());
        self.archive
            .set_string(CONTENT_TYPES_PART, self.content_types.to_xml());
    }

    /// The path the document was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The backing archive
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// The content-type registry
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// The relationship table of the document part
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// The next image id the image subsystem will allocate
    pub fn next_image_id(&self) -> u32 {
        self.next_image_id
    }

    /// The next relationship id number that will be allocated
    pub fn next_relationship_id(&self) -> u32 {
        self.relationships.next_id_number()
    }

    // =========================================================================
    // Paragraph operations
    // =========================================================================

    /// Append a paragraph with the given text
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.body.push(Block::Paragraph(Paragraph::from_text(text)));
    }

    /// Append a paragraph with formatting options
    pub fn add_paragraph_with(&mut self, text: impl Into<String>, options: &ParagraphOptions) {
        let mut paragraph = Paragraph::from_text(text);
        options.apply(&mut paragraph);
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Insert a paragraph at a position in the paragraph sequence
    ///
    /// `index` may equal the paragraph count, which appends.
    pub fn insert_paragraph_at(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let block_index = self.insertion_block_index(index)?;
        self.body
            .insert(block_index, Block::Paragraph(Paragraph::from_text(text)));
        Ok(())
    }

    /// Delete the paragraph at `index`
    pub fn delete_paragraph(&mut self, index: usize) -> Result<()> {
        let block_index = self
            .paragraph_block_index(index)
            .ok_or(OoxmlError::ParagraphOutOfRange(index))?;
        self.body.remove(block_index);
        Ok(())
    }

    /// Delete paragraphs from `start` to `end` inclusive
    pub fn delete_paragraph_range(&mut self, start: usize, end: usize) -> Result<()> {
        let count = self.paragraph_count();
        if start > end || end >= count {
            return Err(OoxmlError::InvalidRange { start, end });
        }
        for index in (start..=end).rev() {
            self.delete_paragraph(index)?;
        }
        Ok(())
    }

    /// Replace text across all paragraphs, returning the number of fragments touched
    pub fn replace_text(&mut self, old: &str, new: &str) -> usize {
        let mut count = 0;
        for paragraph in self.paragraphs_mut() {
            for run in &mut paragraph.runs {
                for text in &mut run.texts {
                    if text.content.contains(old) {
                        text.content = text.content.replace(old, new);
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Replace text in one paragraph
    pub fn replace_text_in_paragraph(
        &mut self,
        index: usize,
        old: &str,
        new: &str,
    ) -> Result<()> {
        let paragraph = self
            .paragraphs_mut()
            .nth(index)
            .ok_or(OoxmlError::ParagraphOutOfRange(index))?;
        for run in &mut paragraph.runs {
            for text in &mut run.texts {
                text.content = text.content.replace(old, new);
            }
        }
        Ok(())
    }

    /// Text of the paragraph at `index`
    pub fn paragraph_text(&self, index: usize) -> Result<String> {
        self.paragraphs()
            .nth(index)
            .map(|p| p.text())
            .ok_or(OoxmlError::ParagraphOutOfRange(index))
    }

    /// Indices of paragraphs containing `needle`, case-insensitively
    pub fn find_text(&self, needle: &str) -> Vec<usize> {
        let needle = needle.to_lowercase();
        self.paragraphs()
            .enumerate()
            .filter(|(_, p)| p.text().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// All paragraph text, one line per paragraph
    pub fn text(&self) -> String {
        self.paragraph_texts().join("\n")
    }

    /// One string per top-level paragraph, in body order
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs().map(|p| p.text()).collect()
    }

    /// Remove all paragraphs and tables
    pub fn clear(&mut self) {
        self.body.clear();
    }

    /// Number of top-level paragraphs
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// Delete the table at `index` (counting tables only)
    pub fn delete_table(&mut self, index: usize) -> Result<()> {
        let block_index = self
            .body
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Table(_)))
            .map(|(i, _)| i)
            .nth(index)
            .ok_or(OoxmlError::TableOutOfRange(index))?;
        self.body.remove(block_index);
        Ok(())
    }

    /// Iterate over top-level paragraphs in body order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Iterate mutably over top-level paragraphs
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.iter_mut().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Iterate over tables in body order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Every paragraph in the document, including table cells
    pub(crate) fn all_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().flat_map(block_paragraphs)
    }

    /// Body index of the block holding the `index`-th paragraph
    pub(crate) fn paragraph_block_index(&self, index: usize) -> Option<usize> {
        self.body
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .map(|(i, _)| i)
            .nth(index)
    }

    /// Body index at which a paragraph inserted at paragraph-position `index` lands
    pub(crate) fn insertion_block_index(&self, index: usize) -> Result<usize> {
        let count = self.paragraph_count();
        if index > count {
            return Err(OoxmlError::ParagraphOutOfRange(index));
        }
        if index == count {
            return Ok(self.body.len());
        }
        self.paragraph_block_index(index)
            .ok_or(OoxmlError::ParagraphOutOfRange(index))
    }
}

/// Paragraphs held by a block, including table cell contents
fn block_paragraphs(block: &Block) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
    match block {
        Block::Paragraph(p) => Box::new(std::iter::once(p)),
        Block::Table(t) => Box::new(
            t.rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .flat_map(|cell| cell.paragraphs.iter()),
        ),
    }
}
