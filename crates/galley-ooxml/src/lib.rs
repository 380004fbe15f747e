//! # galley-ooxml
//!
//! OOXML (Office Open XML) package engine and document model for galley.
//!
//! This crate provides functionality to:
//! - Read and write DOCX packages, preserving uninterpreted parts verbatim
//! - Build and mutate a document model of paragraphs, runs, and tables
//! - Embed images with relationship and content-type bookkeeping
//! - Manage typed header and footer parts
//!
//! ## Example: Creating a Document
//!
//! ```no_run
//! use galley_ooxml::Document;
//!
//! let mut doc = Document::new();
//! doc.add_paragraph("Hello, world!");
//! doc.save("hello.docx")?;
//! # Ok::<(), galley_ooxml::OoxmlError>(())
//! ```
//!
//! ## Example: Reading a Document
//!
//! ```no_run
//! use galley_ooxml::Document;
//!
//! let doc = Document::open("report.docx")?;
//! for text in doc.paragraph_texts() {
//!     println!("{text}");
//! }
//! # Ok::<(), galley_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod content_types;
pub mod document;
pub mod error;
pub mod header_footer;
pub mod image;
pub mod parse;
pub mod properties;
pub mod relationships;
pub mod styles;
pub mod table;
pub mod writer;

pub use archive::OoxmlArchive;
pub use content_types::ContentTypes;
pub use document::{
    Block, Document, Justification, Paragraph, ParagraphOptions, ParagraphProps, Run, RunProps,
    Spacing, Text,
};
pub use error::{OoxmlError, Result};
pub use header_footer::{HeaderFooter, HeaderFooterKind, HeaderFooterOptions};
pub use image::{Drawing, ImageOptions};
pub use properties::CoreProperties;
pub use relationships::Relationships;
pub use styles::{Style, StyleSheet, StyleType};
pub use table::{Table, TableCell, TableProps, TableRow, TableWidth};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
