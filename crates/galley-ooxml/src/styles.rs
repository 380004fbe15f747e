//! Style definitions (word/styles.xml)
//!
//! The style part is preserved verbatim through the files map; this module
//! additionally parses it into a queryable sheet so callers can inspect
//! the style hierarchy, find heading styles, or check that a style id a
//! paragraph references actually exists.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::Document;
use crate::error::{OoxmlError, Result};

/// Archive path of the style part
pub const STYLES_PART: &str = "word/styles.xml";

/// Type of a style definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn parse(value: &str) -> Self {
        match value {
            "character" => Self::Character,
            "table" => Self::Table,
            "numbering" => Self::Numbering,
            _ => Self::Paragraph,
        }
    }
}

/// A single style definition
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Style id as referenced from paragraphs (e.g. "Heading1")
    pub id: String,
    /// Display name (e.g. "heading 1")
    pub name: String,
    pub style_type: StyleType,
    /// Parent style id
    pub based_on: Option<String>,
    /// Style applied to a following paragraph
    pub next: Option<String>,
    /// Outline level; 0 is the top heading level
    pub outline_level: Option<u8>,
}

impl Style {
    /// The 1-based heading level, when this is a heading style
    pub fn heading_level(&self) -> Option<u8> {
        self.outline_level.map(|level| level + 1)
    }
}

/// Parsed style sheet
///
/// Styles are keyed and iterated by id in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    styles: BTreeMap<String, Style>,
    /// Id of the default paragraph style
    pub default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Parse a style part from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut sheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"style" => {
                            let mut builder = StyleBuilder::default();
                            if let Some(style_type) = get_attr(e, b"w:type") {
                                builder.style_type = StyleType::parse(&style_type);
                            }
                            builder.id = get_attr(e, b"w:styleId");
                            builder.is_default = matches!(
                                get_attr(e, b"w:default").as_deref(),
                                Some("1") | Some("true")
                            );
                            current = Some(builder);
                        }
                        b"name" => {
                            if let Some(builder) = current.as_mut() {
                                builder.name = get_attr(e, b"w:val");
                            }
                        }
                        b"basedOn" => {
                            if let Some(builder) = current.as_mut() {
                                builder.based_on = get_attr(e, b"w:val");
                            }
                        }
                        b"next" => {
                            if let Some(builder) = current.as_mut() {
                                builder.next = get_attr(e, b"w:val");
                            }
                        }
                        b"outlineLvl" => {
                            if let Some(builder) = current.as_mut() {
                                builder.outline_level =
                                    get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(builder) = current.take() {
                            let is_default = builder.is_default;
                            if let Some(style) = builder.build() {
                                if is_default && style.style_type == StyleType::Paragraph {
                                    sheet.default_paragraph = Some(style.id.clone());
                                }
                                sheet.styles.insert(style.id.clone(), style);
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// Get a style by id
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Check whether a style id is defined
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// Iterate over all styles in id order
    pub fn all(&self) -> impl Iterator<Item = &Style> {
        self.styles.values()
    }

    /// Paragraph styles only
    pub fn paragraph_styles(&self) -> impl Iterator<Item = &Style> {
        self.all()
            .filter(|s| s.style_type == StyleType::Paragraph)
    }

    /// Styles carrying an outline level
    pub fn heading_styles(&self) -> impl Iterator<Item = &Style> {
        self.all().filter(|s| s.outline_level.is_some())
    }

    /// Table styles only
    pub fn table_styles(&self) -> impl Iterator<Item = &Style> {
        self.all().filter(|s| s.style_type == StyleType::Table)
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the sheet defines no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: StyleType,
    based_on: Option<String>,
    next: Option<String>,
    outline_level: Option<u8>,
    is_default: bool,
}

impl Default for StyleType {
    fn default() -> Self {
        Self::Paragraph
    }
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            style_type: self.style_type,
            based_on: self.based_on,
            next: self.next,
            outline_level: self.outline_level,
        })
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

impl Document {
    /// Parse the style sheet carried by the package, when present
    pub fn styles(&self) -> Result<Option<StyleSheet>> {
        match self.archive.get(STYLES_PART) {
            Some(xml) => StyleSheet::parse(xml).map(Some),
            None => Ok(None),
        }
    }
}
