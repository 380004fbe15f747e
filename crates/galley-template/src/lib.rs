//! # galley-template
//!
//! A mini-language for document templates: `{{.Var}}` substitution,
//! `{{if}}/{{else}}/{{end}}` conditionals, and `{{range}}/{{end}}`
//! iteration evaluated over the paragraph and table structure of a
//! document, without disturbing surrounding formatting runs.
//!
//! Directives live on their own paragraph; the engine classifies each
//! paragraph by the concatenation of its run text. Blocks do not nest: the
//! first `{{end}}` after an opener terminates it.
//!
//! ## Example
//!
//! ```no_run
//! use galley_template::{RenderOptions, Template, TemplateData, Value};
//!
//! let template = Template::load("invoice.docx")?;
//! let mut data = TemplateData::new();
//! data.insert("Customer", Value::from("ACME Corp"));
//! let rendered = template.render(&data, &RenderOptions::default())?;
//! # Ok::<(), galley_template::TemplateError>(())
//! ```

pub mod conditionals;
pub mod data;
pub mod engine;
pub mod error;
pub mod loops;
pub mod value;

pub use data::TemplateData;
pub use engine::{RenderOptions, Template};
pub use error::{Result, TemplateError};
pub use value::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
