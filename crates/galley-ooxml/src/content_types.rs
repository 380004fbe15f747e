//! Content-type manifest for OOXML packages
//!
//! `[Content_Types].xml` declares a MIME type for every part in the package,
//! either by extension (`Default`) or by part name (`Override`). The main
//! document part and each registered image extension must appear here for
//! the package to be valid.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::writer::escape_xml;

/// OOXML namespace for content types
pub const CONTENT_TYPES_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

/// MIME type of relationship parts
pub const RELS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.relationships+xml";

/// MIME type of the main document part
pub const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// MIME type of header parts
pub const HEADER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";

/// MIME type of footer parts
pub const FOOTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

/// Parsed content-type registry
///
/// Both maps are ordered so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTypes {
    /// Extension (without dot) to MIME type
    defaults: BTreeMap<String, String>,
    /// Part name (with leading slash) to MIME type
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The minimum registry for a valid, empty document package
    pub fn minimal() -> Self {
        let mut types = Self::new();
        types.register_default("rels", RELS_CONTENT_TYPE);
        types.register_default("xml", "application/xml");
        types.register_override("/word/document.xml", DOCUMENT_CONTENT_TYPE);
        types
    }

    /// Parse a `[Content_Types].xml` manifest
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut types = Self::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            let mut extension = None;
                            let mut content_type = None;
                            for attr in e.attributes().filter_map(|a| a.ok()) {
                                match attr.key.as_ref() {
                                    b"Extension" => {
                                        extension =
                                            attr.unescape_value().ok().map(|s| s.to_string());
                                    }
                                    b"ContentType" => {
                                        content_type =
                                            attr.unescape_value().ok().map(|s| s.to_string());
                                    }
                                    _ => {}
                                }
                            }
                            if let (Some(ext), Some(ct)) = (extension, content_type) {
                                types.defaults.insert(ext.to_lowercase(), ct);
                            }
                        }
                        b"Override" => {
                            let mut part_name = None;
                            let mut content_type = None;
                            for attr in e.attributes().filter_map(|a| a.ok()) {
                                match attr.key.as_ref() {
                                    b"PartName" => {
                                        part_name =
                                            attr.unescape_value().ok().map(|s| s.to_string());
                                    }
                                    b"ContentType" => {
                                        content_type =
                                            attr.unescape_value().ok().map(|s| s.to_string());
                                    }
                                    _ => {}
                                }
                            }
                            if let (Some(part), Some(ct)) = (part_name, content_type) {
                                types.overrides.insert(part, ct);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Register a default extension mapping; keeps an existing entry
    pub fn register_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .entry(extension.to_lowercase())
            .or_insert_with(|| content_type.to_string());
    }

    /// Register an override for a specific part name, replacing any prior one
    pub fn register_override(&mut self, part_name: &str, content_type: &str) {
        self.overrides
            .insert(part_name.to_string(), content_type.to_string());
    }

    /// Remove the override for a part name, returning its MIME type
    pub fn remove_override(&mut self, part_name: &str) -> Option<String> {
        self.overrides.remove(part_name)
    }

    /// Check whether an extension has a default mapping
    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults.contains_key(&extension.to_lowercase())
    }

    /// Look up the MIME type registered for an extension
    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.defaults
            .get(&extension.to_lowercase())
            .map(|s| s.as_str())
    }

    /// Check whether a part name has an override
    pub fn has_override(&self, part_name: &str) -> bool {
        self.overrides.contains_key(part_name)
    }

    /// Serialize to manifest XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NS));
        xml.push('\n');

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
                escape_xml(ext),
                escape_xml(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
                escape_xml(part),
                escape_xml(ct)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}
