//! `{{range}}` iteration over paragraphs and table rows
//!
//! A paragraph-level range clones the template block once per element of
//! the collection. A table whose first cell opens a range treats its
//! second row as the row template: one deep row clone is appended per
//! element, then the directive and template rows are removed and any
//! remaining rows are preserved unchanged.
//!
//! Inside an iteration, `{{.Item}}` is the current element and
//! `{{.Index}}` the zero-based position; the outer scope stays visible
//! except for the collection's own name.

use galley_ooxml::{Block, Table};

use crate::data::TemplateData;
use crate::engine::{range_re, substitute_paragraph, substitute_table, RenderOptions};
use crate::error::{Result, TemplateError};
use crate::value::Value;

/// Expand a paragraph-level `{{range .X}}...{{end}}` block
///
/// Splices the produced blocks over `start..=end` and returns how many
/// blocks were emitted.
pub(crate) fn expand_range(
    body: &mut Vec<Block>,
    start: usize,
    data: &TemplateData,
    options: &RenderOptions,
    paragraph_index: usize,
) -> Result<usize> {
    let text = match &body[start] {
        Block::Paragraph(p) => p.text(),
        Block::Table(_) => String::new(),
    };

    let name = range_re()
        .captures(&text)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| TemplateError::MalformedDirective {
            kind: "range".to_string(),
            text: text.clone(),
        })?;

    let end = find_end(body, start).ok_or_else(|| {
        TemplateError::UnterminatedBlock("range".to_string())
    })?;

    let items = resolve_collection(data, &name, options)?;
    let template: Vec<Block> = body[start + 1..end].to_vec();

    let mut produced = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let scope = loop_scope(data, &name, index, item);
        for block in &template {
            let mut clone = block.clone();
            match &mut clone {
                Block::Paragraph(paragraph) => {
                    substitute_paragraph(paragraph, &scope, options, paragraph_index)?;
                }
                Block::Table(table) => {
                    substitute_table(table, &scope, options, paragraph_index)?;
                }
            }
            produced.push(clone);
        }
    }

    let count = produced.len();
    body.splice(start..=end, produced);
    Ok(count)
}

/// Process a top-level table: either a row-template loop or plain substitution
pub(crate) fn process_table(
    table: &mut Table,
    data: &TemplateData,
    options: &RenderOptions,
) -> Result<()> {
    let directive = table
        .rows
        .first()
        .and_then(|row| row.cells.first())
        .and_then(|cell| cell.paragraphs.first())
        .map(|paragraph| paragraph.text())
        .filter(|text| text.contains("{{range"));

    match directive {
        Some(text) => expand_table_loop(table, &text, data, options),
        None => substitute_table(table, data, options, 0),
    }
}

fn expand_table_loop(
    table: &mut Table,
    directive_text: &str,
    data: &TemplateData,
    options: &RenderOptions,
) -> Result<()> {
    if table.rows.len() < 2 {
        return Err(TemplateError::TableLoopRows);
    }

    let name = range_re()
        .captures(directive_text)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| TemplateError::MalformedDirective {
            kind: "range".to_string(),
            text: directive_text.to_string(),
        })?;

    let items = resolve_collection(data, &name, options)?;

    // Second row is the template; rows past it are preserved unchanged
    let template_row = table.rows[1].clone();
    let tail: Vec<_> = table.rows.drain(2..).collect();

    let mut rows = Vec::with_capacity(items.len() + tail.len());
    for (index, item) in items.iter().enumerate() {
        let scope = loop_scope(data, &name, index, item);
        let mut row = template_row.clone();
        for cell in &mut row.cells {
            for paragraph in &mut cell.paragraphs {
                substitute_paragraph(paragraph, &scope, options, 0)?;
            }
        }
        rows.push(row);
    }
    rows.extend(tail);
    table.rows = rows;

    Ok(())
}

/// First paragraph block at or after `start + 1` containing `{{end}}`
pub(crate) fn find_end(body: &[Block], start: usize) -> Option<usize> {
    body.iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, block)| match block {
            Block::Paragraph(p) => p.text().contains("{{end}}"),
            Block::Table(_) => false,
        })
        .map(|(i, _)| i)
}

/// Resolve a range target to its elements
///
/// A missing collection fails in strict mode and behaves as an empty
/// collection otherwise; a present value that is not a sequence always
/// fails.
fn resolve_collection(
    data: &TemplateData,
    name: &str,
    options: &RenderOptions,
) -> Result<Vec<Value>> {
    match data.lookup(name) {
        Some(value) => value
            .as_seq()
            .map(|items| items.to_vec())
            .ok_or_else(|| TemplateError::NotIterable(name.to_string())),
        None if options.strict => Err(TemplateError::MissingCollection(name.to_string())),
        None => Ok(Vec::new()),
    }
}

/// Iteration scope: outer variables minus the collection name, plus
/// `Item` and `Index`
fn loop_scope(data: &TemplateData, name: &str, index: usize, item: &Value) -> TemplateData {
    let mut scope = TemplateData::new();
    for (key, value) in data.iter() {
        if key != name {
            scope.insert(key, value.clone());
        }
    }
    scope.insert("Index", Value::Int(index as i64));
    scope.insert("Item", item.clone());
    scope
}
