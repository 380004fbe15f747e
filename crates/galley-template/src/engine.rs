//! Template rendering engine
//!
//! Rendering walks a cloned body in order, classifying each paragraph by
//! its concatenated run text: plain paragraphs get variable substitution
//! inside their text fragments (run boundaries and formatting preserved),
//! `{{range}}` and `{{if}}` paragraphs open blocks that are expanded in
//! place, and tables are scanned for a row-template loop.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use galley_ooxml::{Block, Document, Paragraph, Table};

use crate::conditionals;
use crate::data::TemplateData;
use crate::error::{Result, TemplateError};
use crate::loops;

/// Variable directive: `{{.Name}}` or `{{.A.B.C}}`
pub(crate) fn var_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\.([A-Za-z0-9_.]+)\}\}").unwrap())
}

/// Iteration opener: `{{range .Name}}`
pub(crate) fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{range\s+\.([A-Za-z0-9_.]+)\}\}").unwrap())
}

/// Conditional opener: `{{if .Name}}`
pub(crate) fn if_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{if\s+\.([A-Za-z0-9_.]+)\}\}").unwrap())
}

/// Rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Abort the render when a variable, field, or collection is missing
    pub strict: bool,
    /// Replacement for missing variables when not strict
    pub default_value: String,
    /// Drop paragraphs whose text is whitespace after substitution
    pub remove_empty: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            strict: false,
            default_value: String::new(),
            remove_empty: true,
        }
    }
}

/// A document template
///
/// The source document is never mutated: every render works on a deep
/// clone, so a template can be rendered any number of times. Rendering is
/// deterministic: identical input and options produce identical output.
///
/// Block directives do not nest. The scanner pairs an opener with the
/// first `{{end}}` that follows it, so an inner block would terminate the
/// outer one.
pub struct Template {
    doc: Document,
    path: Option<PathBuf>,
}

impl Template {
    /// Wrap an in-memory document
    pub fn new(doc: Document) -> Self {
        Self { doc, path: None }
    }

    /// Load a template document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::open(path)?;
        Ok(Self {
            doc,
            path: Some(path.to_path_buf()),
        })
    }

    /// The source document
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The path the template was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render the template against `data`, returning a new document
    pub fn render(&self, data: &TemplateData, options: &RenderOptions) -> Result<Document> {
        let mut doc = self.doc.clone();
        let mut paragraph_index = 0;

        let mut i = 0;
        while i < doc.body.len() {
            let paragraph_text = match &doc.body[i] {
                Block::Paragraph(paragraph) => Some(paragraph.text()),
                Block::Table(_) => None,
            };

            let Some(text) = paragraph_text else {
                if let Block::Table(table) = &mut doc.body[i] {
                    loops::process_table(table, data, options)?;
                }
                i += 1;
                continue;
            };

            if text.contains("{{range") {
                let produced =
                    loops::expand_range(&mut doc.body, i, data, options, paragraph_index)?;
                i += produced;
            } else if text.contains("{{if") {
                let produced = conditionals::expand_conditional(
                    &mut doc.body,
                    i,
                    data,
                    options,
                    paragraph_index,
                )?;
                i += produced;
            } else if let Block::Paragraph(paragraph) = &mut doc.body[i] {
                substitute_paragraph(paragraph, data, options, paragraph_index)?;
                if options.remove_empty && paragraph.is_blank() {
                    doc.body.remove(i);
                } else {
                    i += 1;
                }
            }
            paragraph_index += 1;
        }

        debug!(blocks = doc.body.len(), "template rendered");
        Ok(doc)
    }

    /// Render and save the result; on error nothing is written
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        data: &TemplateData,
        path: P,
        options: &RenderOptions,
    ) -> Result<()> {
        let mut rendered = self.render(data, options)?;
        rendered.save(path)?;
        Ok(())
    }

    /// Distinct `{{.Name}}` variable paths appearing in the template
    pub fn variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();

        let mut scan = |paragraph: &Paragraph| {
            for captures in var_re().captures_iter(&paragraph.text()) {
                names.insert(captures[1].to_string());
            }
        };

        for block in &self.doc.body {
            match block {
                Block::Paragraph(paragraph) => scan(paragraph),
                Block::Table(table) => {
                    for row in &table.rows {
                        for cell in &row.cells {
                            for paragraph in &cell.paragraphs {
                                scan(paragraph);
                            }
                        }
                    }
                }
            }
        }

        names.into_iter().collect()
    }
}

/// Substitute `{{.X}}` references inside each text fragment of a paragraph
///
/// Run boundaries and formatting are untouched; only fragment contents
/// change. A directive split across runs is not matched.
pub(crate) fn substitute_paragraph(
    paragraph: &mut Paragraph,
    scope: &TemplateData,
    options: &RenderOptions,
    paragraph_index: usize,
) -> Result<()> {
    for run in &mut paragraph.runs {
        for text in &mut run.texts {
            let matches: Vec<(String, String)> = var_re()
                .captures_iter(&text.content)
                .map(|captures| (captures[0].to_string(), captures[1].to_string()))
                .collect();

            for (placeholder, name) in matches {
                let replacement = match scope.lookup(&name) {
                    Some(value) => value.to_string(),
                    None if options.strict => {
                        return Err(TemplateError::MissingVariable {
                            name,
                            paragraph: paragraph_index,
                        });
                    }
                    None => options.default_value.clone(),
                };
                text.content = text.content.replace(&placeholder, &replacement);
            }
        }
    }
    Ok(())
}

/// Substitute variables in every cell paragraph of a table
pub(crate) fn substitute_table(
    table: &mut Table,
    scope: &TemplateData,
    options: &RenderOptions,
    paragraph_index: usize,
) -> Result<()> {
    for row in &mut table.rows {
        for cell in &mut row.cells {
            for paragraph in &mut cell.paragraphs {
                substitute_paragraph(paragraph, scope, options, paragraph_index)?;
            }
        }
    }
    Ok(())
}
