//! `{{if}}/{{else}}/{{end}}` conditional blocks
//!
//! The then-branch runs from the opener to the `{{else}}` (or the
//! `{{end}}` when there is none); the else-branch from the `{{else}}` to
//! the `{{end}}`. The selected branch is cloned, substituted, and spliced
//! over the whole block.

use galley_ooxml::Block;

use crate::data::TemplateData;
use crate::engine::{if_re, substitute_paragraph, substitute_table, RenderOptions};
use crate::error::{Result, TemplateError};
use crate::loops::find_end;

/// Expand an `{{if .X}}...[{{else}}...]{{end}}` block
///
/// Splices the selected branch over `start..=end` and returns how many
/// blocks were emitted.
pub(crate) fn expand_conditional(
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

    let name = if_re()
        .captures(&text)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| TemplateError::MalformedDirective {
            kind: "if".to_string(),
            text: text.clone(),
        })?;

    let end = find_end(body, start)
        .ok_or_else(|| TemplateError::UnterminatedBlock("if".to_string()))?;
    let else_index = find_else(body, start, end);

    let condition = match data.lookup(&name) {
        Some(value) => value.is_truthy(),
        None if options.strict => {
            return Err(TemplateError::MissingVariable {
                name,
                paragraph: paragraph_index,
            });
        }
        None => false,
    };

    let branch = if condition {
        start + 1..else_index.unwrap_or(end)
    } else {
        match else_index {
            Some(else_index) => else_index + 1..end,
            None => start + 1..start + 1,
        }
    };

    let mut produced: Vec<Block> = body[branch].to_vec();
    for block in &mut produced {
        match block {
            Block::Paragraph(paragraph) => {
                substitute_paragraph(paragraph, data, options, paragraph_index)?;
            }
            Block::Table(table) => {
                substitute_table(table, data, options, paragraph_index)?;
            }
        }
    }

    let count = produced.len();
    body.splice(start..=end, produced);
    Ok(count)
}

/// First `{{else}}` paragraph strictly between the opener and its end
fn find_else(body: &[Block], start: usize, end: usize) -> Option<usize> {
    body[start + 1..end]
        .iter()
        .position(|block| match block {
            Block::Paragraph(p) => p.text().contains("{{else}}"),
            Block::Table(_) => false,
        })
        .map(|offset| start + 1 + offset)
}
