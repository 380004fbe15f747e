//! Core document properties (docProps/core.xml)
//!
//! Title, creator, and friends live in their own package part under the
//! Dublin Core namespaces. The part is optional: documents without one
//! gain it the first time a property is set, together with its
//! content-type override and package-level relationship.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::archive::ROOT_RELS_PART;
use crate::document::Document;
use crate::error::{OoxmlError, Result};
use crate::writer::escape_xml;

/// Archive path of the core-properties part
pub const CORE_PROPS_PART: &str = "docProps/core.xml";

/// MIME type of the core-properties part
pub const CORE_PROPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";

/// Package relationship type of the core-properties part
pub const CORE_PROPS_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Core document metadata
///
/// Timestamps are kept as the raw W3C date strings the part carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl CoreProperties {
    /// Parse a docProps/core.xml part
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut props = CoreProperties::default();
        let mut buf = Vec::new();
        let mut current_field: Option<Field> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    current_field = Field::from_local_name(e.local_name().as_ref());
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(field) = current_field {
                        let value = e.unescape().unwrap_or_default().to_string();
                        *props.field_mut(field) = Some(value);
                    }
                }
                Ok(Event::End(_)) => current_field = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(props)
    }

    fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Creator => &mut self.creator,
            Field::Subject => &mut self.subject,
            Field::Description => &mut self.description,
            Field::Keywords => &mut self.keywords,
            Field::LastModifiedBy => &mut self.last_modified_by,
            Field::Revision => &mut self.revision,
            Field::Created => &mut self.created,
            Field::Modified => &mut self.modified,
        }
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Serialize to part XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        ));

        let mut element = |tag: &str, value: &Option<String>| {
            if let Some(value) = value {
                xml.push_str(&format!("<{tag}>{}</{tag}>", escape_xml(value)));
            }
        };
        element("dc:title", &self.title);
        element("dc:subject", &self.subject);
        element("dc:creator", &self.creator);
        element("cp:keywords", &self.keywords);
        element("dc:description", &self.description);
        element("cp:lastModifiedBy", &self.last_modified_by);
        element("cp:revision", &self.revision);

        let mut dated = |tag: &str, value: &Option<String>| {
            if let Some(value) = value {
                xml.push_str(&format!(
                    "<{tag} xsi:type=\"dcterms:W3CDTF\">{}</{tag}>",
                    escape_xml(value)
                ));
            }
        };
        dated("dcterms:created", &self.created);
        dated("dcterms:modified", &self.modified);

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

/// The properties the parser recognizes, by element local name
#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Creator,
    Subject,
    Description,
    Keywords,
    LastModifiedBy,
    Revision,
    Created,
    Modified,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"creator" => Some(Self::Creator),
            b"subject" => Some(Self::Subject),
            b"description" => Some(Self::Description),
            b"keywords" => Some(Self::Keywords),
            b"lastModifiedBy" => Some(Self::LastModifiedBy),
            b"revision" => Some(Self::Revision),
            b"created" => Some(Self::Created),
            b"modified" => Some(Self::Modified),
            _ => None,
        }
    }
}

impl Document {
    /// The core properties, when the document has any
    pub fn core_properties(&self) -> Option<&CoreProperties> {
        self.core_properties.as_ref()
    }

    /// Mutable access to the core properties, creating them when absent
    pub fn core_properties_mut(&mut self) -> &mut CoreProperties {
        self.core_properties.get_or_insert_with(CoreProperties::default)
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.core_properties_mut().title = Some(title.into());
    }

    /// Set the document creator
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.core_properties_mut().creator = Some(creator.into());
    }

    /// Emit the core-properties part and its package wiring
    pub(crate) fn sync_core_properties(&mut self) {
        let Some(props) = &self.core_properties else {
            return;
        };

        self.archive.set_string(CORE_PROPS_PART, props.to_xml());
        self.content_types
            .register_override(&format!("/{CORE_PROPS_PART}"), CORE_PROPS_CONTENT_TYPE);

        // Splice a core-properties relationship into the root part if the
        // package does not reference one yet.
        if let Some(root_rels) = self.archive.get_string(ROOT_RELS_PART) {
            if !root_rels.contains("metadata/core-properties") {
                let patched = root_rels.replace(
                    "</Relationships>",
                    &format!(
                        "  <Relationship Id=\"rIdCore\" Type=\"{CORE_PROPS_REL_TYPE}\" Target=\"{CORE_PROPS_PART}\"/>\n</Relationships>"
                    ),
                );
                self.archive.set_string(ROOT_RELS_PART, patched);
            }
        }
    }
}
