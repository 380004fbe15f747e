//! Relationship table for OOXML parts
//!
//! OOXML links parts together through relationship files (`_rels/*.rels`)
//! mapping ids like `rId7` to targets. The document part uses them for
//! images, headers, and footers; the package root uses one to name the main
//! document part.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::writer::escape_xml;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

impl Relationships {
    /// Office document relationship type (root part)
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Image relationship type
    pub const TYPE_IMAGE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    /// Header relationship type
    pub const TYPE_HEADER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    /// Footer relationship type
    pub const TYPE_FOOTER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
}

/// A single relationship entry
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// The target path, relative to the owning part (e.g. `media/image1.png`)
    pub target: String,
    /// The relationship type URI
    pub rel_type: String,
    /// Target mode: `External` for URLs, None for package-internal targets
    pub target_mode: Option<String>,
}

impl Relationship {
    /// Check whether this relationship carries the image role
    pub fn is_image(&self) -> bool {
        self.rel_type == Relationships::TYPE_IMAGE
    }
}

/// Parsed relationship table for one part
///
/// Maintains insertion order for deterministic XML serialization. New ids
/// continue from the maximum `rIdN` seen at parse time.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Ordered list of relationship ids
    order: Vec<String>,
    /// Map of relationship id to entry
    map: HashMap<String, Relationship>,
    /// Counter for generating unique ids (starts at 1)
    next_id: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
            next_id: 1,
        }
    }
}

impl Relationships {
    /// Create an empty relationship table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse relationships from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut order = Vec::new();
        let mut map = HashMap::new();
        let mut max_id: u32 = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut id = None;
                        let mut target = None;
                        let mut rel_type = None;
                        let mut target_mode = None;

                        for attr in e.attributes().filter_map(|a| a.ok()) {
                            match attr.key.as_ref() {
                                b"Id" => {
                                    id = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"Target" => {
                                    target = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"Type" => {
                                    rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"TargetMode" => {
                                    target_mode = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(id), Some(target)) = (id, target) {
                            if let Some(num) = extract_id_number(&id) {
                                max_id = max_id.max(num);
                            }

                            order.push(id.clone());
                            map.insert(
                                id,
                                Relationship {
                                    target,
                                    rel_type: rel_type.unwrap_or_default(),
                                    target_mode,
                                },
                            );
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            order,
            map,
            next_id: max_id + 1,
        })
    }

    /// Add a new relationship and return the generated id (e.g. "rId3")
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;

        self.order.push(id.clone());
        self.map.insert(
            id.clone(),
            Relationship {
                target: target.into(),
                rel_type: rel_type.into(),
                target_mode: None,
            },
        );

        id
    }

    /// Add an image relationship for an archive-relative media target
    pub fn add_image(&mut self, target: impl Into<String>) -> String {
        self.add(target, Self::TYPE_IMAGE)
    }

    /// Serialize the table to relationship-part XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');

        // Iterate in insertion order for deterministic output
        for id in &self.order {
            if let Some(rel) = self.map.get(id) {
                xml.push_str("  <Relationship");
                xml.push_str(&format!(r#" Id="{}""#, escape_xml(id)));
                xml.push_str(&format!(r#" Type="{}""#, escape_xml(&rel.rel_type)));
                xml.push_str(&format!(r#" Target="{}""#, escape_xml(&rel.target)));
                if let Some(mode) = &rel.target_mode {
                    xml.push_str(&format!(r#" TargetMode="{}""#, escape_xml(mode)));
                }
                xml.push_str("/>\n");
            }
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Get the target for a relationship id
    pub fn target(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(|r| r.target.as_str())
    }

    /// Get the full relationship entry for an id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.map.get(id)
    }

    /// Check if a relationship id exists
    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    /// Check if a relationship carries the image role
    pub fn is_image(&self, id: &str) -> bool {
        self.map.get(id).map(|r| r.is_image()).unwrap_or(false)
    }

    /// Remove a relationship by id
    ///
    /// Freed ids are never reused; the counter stays monotonic.
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        self.order.retain(|existing| existing != id);
        self.map.remove(id)
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.order
            .iter()
            .filter_map(|id| self.map.get(id).map(|rel| (id.as_str(), rel)))
    }

    /// Iterate over image relationships in insertion order
    pub fn images(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.iter().filter(|(_, rel)| rel.is_image())
    }

    /// The numeric value the next generated id will use
    pub fn next_id_number(&self) -> u32 {
        self.next_id
    }
}

/// Extract the numeric portion from a relationship id (e.g. "rId5" -> 5)
fn extract_id_number(id: &str) -> Option<u32> {
    id.strip_prefix("rId")
        .or_else(|| id.strip_prefix("RId"))
        .or_else(|| id.strip_prefix("rid"))
        .and_then(|num_str| num_str.parse().ok())
}
