//! WordprocessingML body parser
//!
//! Parses the subset of `word/document.xml` the model represents:
//! paragraphs with styled runs, tab and break markers, inline drawings, and
//! single-level tables. Elements outside that subset are dropped; whole
//! parts the model does not interpret survive through the files map instead.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::{
    Block, Justification, Paragraph, ParagraphProps, Run, RunProps, Spacing, Text,
};
use crate::error::{OoxmlError, Result};
use crate::image::Drawing;
use crate::table::{CellProps, Table, TableCell, TableProps, TableRow, TableWidth};

/// Parse document XML bytes into body blocks
pub fn parse_document(xml: &[u8]) -> Result<Vec<Block>> {
    let mut reader = Reader::from_reader(xml);

    let mut blocks = Vec::new();
    let mut buf = Vec::new();

    let mut in_body = false;
    let mut current_para: Option<ParagraphBuilder> = None;
    let mut current_run: Option<RunBuilder> = None;
    let mut current_table: Option<TableBuilder> = None;
    // Set while between <w:t> and </w:t>; text events elsewhere are ignored
    let mut current_text: Option<Text> = None;

    loop {
        // While inside a <w:drawing>, structural elements (nested text-box
        // paragraphs and runs) must not disturb the builders; only the
        // drawing's own properties are read.
        let in_drawing = current_run
            .as_ref()
            .map(|r| r.drawing_depth > 0)
            .unwrap_or(false);

        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"body" => in_body = true,
                    b"p" if in_body && !in_drawing => {
                        current_para = Some(ParagraphBuilder::default());
                    }
                    b"r" if current_para.is_some() && !in_drawing => {
                        current_run = Some(RunBuilder::default());
                    }
                    b"t" if !in_drawing => {
                        if current_run.is_some() {
                            current_text = Some(Text {
                                content: String::new(),
                                preserve_space: has_preserve_space(e),
                            });
                        }
                    }
                    b"drawing" => {
                        if let Some(run) = current_run.as_mut() {
                            run.drawing_depth += 1;
                            if run.pending_drawing.is_none() {
                                run.pending_drawing = Some(DrawingBuilder::default());
                            }
                        }
                    }
                    b"tbl" if in_body && current_table.is_none() && !in_drawing => {
                        current_table = Some(TableBuilder::default());
                    }
                    b"tr" if !in_drawing => {
                        if let Some(table) = current_table.as_mut() {
                            table.current_row = Some(RowBuilder::default());
                        }
                    }
                    b"tc" if !in_drawing => {
                        if let Some(row) =
                            current_table.as_mut().and_then(|t| t.current_row.as_mut())
                        {
                            row.current_cell = Some(CellBuilder::default());
                        }
                    }
                    _ if in_drawing => handle_drawing_element(e, &mut current_run),
                    _ => handle_property_element(
                        e,
                        &mut current_para,
                        &mut current_run,
                        &mut current_table,
                    ),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"p" if in_body && !in_drawing => {
                        let paragraph = Paragraph::default();
                        let in_cell = current_table
                            .as_mut()
                            .and_then(|t| t.current_row.as_mut())
                            .and_then(|r| r.current_cell.as_mut());
                        if let Some(cell) = in_cell {
                            cell.paragraphs.push(paragraph);
                        } else if current_table.is_none() {
                            blocks.push(Block::Paragraph(paragraph));
                        }
                    }
                    b"t" if !in_drawing => {
                        if let Some(run) = current_run.as_mut() {
                            run.texts.push(Text {
                                content: String::new(),
                                preserve_space: has_preserve_space(e),
                            });
                        }
                    }
                    b"tab" if !in_drawing => {
                        if let Some(run) = current_run.as_mut() {
                            run.tab = true;
                        }
                    }
                    b"br" if !in_drawing => {
                        if let Some(run) = current_run.as_mut() {
                            run.line_break = true;
                        }
                    }
                    _ if in_drawing => handle_drawing_element(e, &mut current_run),
                    _ => handle_property_element(
                        e,
                        &mut current_para,
                        &mut current_run,
                        &mut current_table,
                    ),
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(text) = current_text.as_mut() {
                    let chunk = e.unescape().unwrap_or_default();
                    text.content.push_str(&chunk);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"body" => in_body = false,
                    b"drawing" => {
                        if let Some(run) = current_run.as_mut() {
                            run.drawing_depth = run.drawing_depth.saturating_sub(1);
                            if run.drawing_depth == 0 {
                                if let Some(pending) = run.pending_drawing.take() {
                                    run.drawing = pending.build();
                                }
                            }
                        }
                    }
                    _ if in_drawing => {}
                    b"t" => {
                        if let (Some(run), Some(text)) = (current_run.as_mut(), current_text.take())
                        {
                            run.texts.push(text);
                        }
                    }
                    b"r" => {
                        if let (Some(para), Some(run)) = (current_para.as_mut(), current_run.take())
                        {
                            if let Some(run) = run.build() {
                                para.runs.push(run);
                            }
                        }
                    }
                    b"p" => {
                        if let Some(para) = current_para.take() {
                            let paragraph = para.build();
                            let in_cell = current_table
                                .as_mut()
                                .and_then(|t| t.current_row.as_mut())
                                .and_then(|r| r.current_cell.as_mut());
                            if let Some(cell) = in_cell {
                                cell.paragraphs.push(paragraph);
                            } else if current_table.is_none() {
                                blocks.push(Block::Paragraph(paragraph));
                            }
                        }
                    }
                    b"tc" => {
                        if let Some(row) =
                            current_table.as_mut().and_then(|t| t.current_row.as_mut())
                        {
                            if let Some(cell) = row.current_cell.take() {
                                row.cells.push(cell.build());
                            }
                        }
                    }
                    b"tr" => {
                        if let Some(table) = current_table.as_mut() {
                            if let Some(row) = table.current_row.take() {
                                table.rows.push(row.build());
                            }
                        }
                    }
                    b"tbl" => {
                        if let Some(table) = current_table.take() {
                            blocks.push(Block::Table(table.build()));
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

    Ok(blocks)
}

/// Properties read while inside a `w:drawing` subtree
fn handle_drawing_element(e: &BytesStart, current_run: &mut Option<RunBuilder>) {
    let Some(drawing) = pending_drawing(current_run) else {
        return;
    };
    match e.local_name().as_ref() {
        b"extent" => {
            drawing.width_emu = get_attr(e, b"cx").and_then(|v| v.parse().ok());
            drawing.height_emu = get_attr(e, b"cy").and_then(|v| v.parse().ok());
        }
        b"docPr" => {
            drawing.name = get_attr(e, b"name");
        }
        b"blip" => {
            drawing.rel_id = get_attr_ns(e, b"r:embed");
        }
        _ => {}
    }
}

/// Property elements can arrive as Start or Empty events; both routes land here
fn handle_property_element(
    e: &BytesStart,
    current_para: &mut Option<ParagraphBuilder>,
    current_run: &mut Option<RunBuilder>,
    current_table: &mut Option<TableBuilder>,
) {
    let name = e.local_name();
    match name.as_ref() {
        b"pStyle" => {
            if let Some(para) = current_para.as_mut() {
                if let Some(style) = get_attr(e, b"w:val") {
                    para.props_mut().style = Some(style);
                }
            }
        }
        b"jc" => {
            if current_run.is_none() {
                if let Some(para) = current_para.as_mut() {
                    if let Some(value) = get_attr(e, b"w:val") {
                        para.props_mut().justification = Justification::parse(&value);
                    }
                }
            }
        }
        b"spacing" => {
            // w:spacing also appears inside rPr with different semantics
            if current_run.is_none() {
                if let Some(para) = current_para.as_mut() {
                    let spacing = Spacing {
                        before: get_attr(e, b"w:before"),
                        after: get_attr(e, b"w:after"),
                        line: get_attr(e, b"w:line"),
                    };
                    if spacing != Spacing::default() {
                        para.props_mut().spacing = Some(spacing);
                    }
                }
            }
        }
        b"b" => {
            if let Some(run) = current_run.as_mut() {
                if !is_toggle_off(e) {
                    run.props_mut().bold = true;
                }
            }
        }
        b"i" => {
            if let Some(run) = current_run.as_mut() {
                if !is_toggle_off(e) {
                    run.props_mut().italic = true;
                }
            }
        }
        b"sz" => {
            if let Some(run) = current_run.as_mut() {
                run.props_mut().size = get_attr(e, b"w:val");
            }
        }
        b"color" => {
            if let Some(run) = current_run.as_mut() {
                run.props_mut().color = get_attr(e, b"w:val");
            }
        }
        b"rFonts" => {
            if let Some(run) = current_run.as_mut() {
                if let Some(font) = get_attr(e, b"w:ascii") {
                    run.props_mut().font = Some(font);
                }
            }
        }
        b"tblStyle" => {
            if let Some(table) = current_table.as_mut() {
                table.props_mut().style = get_attr(e, b"w:val");
            }
        }
        b"tblW" => {
            if let Some(table) = current_table.as_mut() {
                table.props_mut().width = table_width(e);
            }
        }
        b"gridCol" => {
            if let Some(table) = current_table.as_mut() {
                table.grid.push(get_attr(e, b"w:w").unwrap_or_default());
            }
        }
        b"tcW" => {
            if let Some(cell) = current_table
                .as_mut()
                .and_then(|t| t.current_row.as_mut())
                .and_then(|r| r.current_cell.as_mut())
            {
                cell.props = Some(CellProps {
                    width: table_width(e),
                });
            }
        }
        _ => {}
    }
}

fn table_width(e: &BytesStart) -> Option<TableWidth> {
    let width = get_attr(e, b"w:w")?;
    let width_type = get_attr(e, b"w:type").unwrap_or_else(|| "auto".to_string());
    Some(TableWidth { width_type, width })
}

fn has_preserve_space(e: &BytesStart) -> bool {
    get_attr(e, b"xml:space").as_deref() == Some("preserve")
}

fn is_toggle_off(e: &BytesStart) -> bool {
    get_attr(e, b"w:val")
        .map(|v| v == "0" || v == "false")
        .unwrap_or(false)
}

fn pending_drawing(current_run: &mut Option<RunBuilder>) -> Option<&mut DrawingBuilder> {
    current_run.as_mut().and_then(|r| r.pending_drawing.as_mut())
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// Match an attribute by prefixed name or by its local suffix
fn get_attr_ns(e: &BytesStart, name: &[u8]) -> Option<String> {
    let local_start = name
        .iter()
        .position(|&b| b == b':')
        .map(|i| i + 1)
        .unwrap_or(0);
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| {
            let key = a.key.as_ref();
            key == name || key.ends_with(&name[local_start..])
        })
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

// Builder types for constructing elements during parsing

#[derive(Default)]
struct ParagraphBuilder {
    props: Option<ParagraphProps>,
    runs: Vec<Run>,
}

impl ParagraphBuilder {
    fn props_mut(&mut self) -> &mut ParagraphProps {
        self.props.get_or_insert_with(ParagraphProps::default)
    }

    fn build(self) -> Paragraph {
        Paragraph {
            props: self.props,
            runs: self.runs,
        }
    }
}

#[derive(Default)]
struct RunBuilder {
    props: Option<RunProps>,
    texts: Vec<Text>,
    drawing: Option<Drawing>,
    tab: bool,
    line_break: bool,
    pending_drawing: Option<DrawingBuilder>,
    drawing_depth: usize,
}

impl RunBuilder {
    fn props_mut(&mut self) -> &mut RunProps {
        self.props.get_or_insert_with(RunProps::default)
    }

    /// Discard runs that carry no content at all
    fn build(self) -> Option<Run> {
        if self.texts.is_empty() && self.drawing.is_none() && !self.tab && !self.line_break {
            return None;
        }
        Some(Run {
            props: self.props,
            texts: self.texts,
            drawing: self.drawing,
            tab: self.tab,
            line_break: self.line_break,
        })
    }
}

#[derive(Default)]
struct DrawingBuilder {
    rel_id: Option<String>,
    name: Option<String>,
    width_emu: Option<i64>,
    height_emu: Option<i64>,
}

impl DrawingBuilder {
    fn build(self) -> Option<Drawing> {
        let rel_id = self.rel_id?;
        Some(Drawing {
            name: self.name.unwrap_or_else(|| "Picture".to_string()),
            rel_id,
            width_emu: self.width_emu.unwrap_or(0),
            height_emu: self.height_emu.unwrap_or(0),
        })
    }
}

#[derive(Default)]
struct TableBuilder {
    props: Option<TableProps>,
    grid: Vec<String>,
    rows: Vec<TableRow>,
    current_row: Option<RowBuilder>,
}

impl TableBuilder {
    fn props_mut(&mut self) -> &mut TableProps {
        self.props.get_or_insert_with(TableProps::default)
    }

    fn build(self) -> Table {
        Table {
            props: self.props,
            grid: self.grid,
            rows: self.rows,
        }
    }
}

#[derive(Default)]
struct RowBuilder {
    cells: Vec<TableCell>,
    current_cell: Option<CellBuilder>,
}

impl RowBuilder {
    fn build(self) -> TableRow {
        TableRow { cells: self.cells }
    }
}

#[derive(Default)]
struct CellBuilder {
    props: Option<CellProps>,
    paragraphs: Vec<Paragraph>,
}

impl CellBuilder {
    fn build(self) -> TableCell {
        TableCell {
            props: self.props,
            paragraphs: self.paragraphs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_paragraph() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
        <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p>
                    <w:r>
                        <w:t>Hello, world!</w:t>
                    </w:r>
                </w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        assert_eq!(blocks.len(), 1);
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.text(), "Hello, world!");
    }

    #[test]
    fn test_parse_preserved_whitespace() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t xml:space="preserve">  padded  </w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.text(), "  padded  ");
        assert!(p.runs[0].texts[0].preserve_space);
    }

    #[test]
    fn test_parse_styled_paragraph() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p>
                    <w:pPr>
                        <w:pStyle w:val="Heading1"/>
                        <w:jc w:val="center"/>
                        <w:spacing w:before="240" w:after="120"/>
                    </w:pPr>
                    <w:r>
                        <w:rPr><w:b/><w:i/><w:sz w:val="28"/><w:color w:val="FF0000"/><w:rFonts w:ascii="Arial"/></w:rPr>
                        <w:t>Section Title</w:t>
                    </w:r>
                </w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        let props = p.props.as_ref().unwrap();
        assert_eq!(props.style.as_deref(), Some("Heading1"));
        assert_eq!(props.justification, Some(Justification::Center));
        let spacing = props.spacing.as_ref().unwrap();
        assert_eq!(spacing.before.as_deref(), Some("240"));
        assert_eq!(spacing.after.as_deref(), Some("120"));

        let run_props = p.runs[0].props.as_ref().unwrap();
        assert!(run_props.bold);
        assert!(run_props.italic);
        assert_eq!(run_props.size.as_deref(), Some("28"));
        assert_eq!(run_props.color.as_deref(), Some("FF0000"));
        assert_eq!(run_props.font.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_bold_toggle_off() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>plain</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(p.runs[0].props.is_none() || !p.runs[0].props.as_ref().unwrap().bold);
    }

    #[test]
    fn test_parse_tab_and_break() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:tab/><w:br/><w:t>after</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(p.runs[0].tab);
        assert!(p.runs[0].line_break);
    }

    #[test]
    fn test_parse_table() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:tbl>
                    <w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr>
                    <w:tblGrid><w:gridCol w:w="4788"/><w:gridCol w:w="4788"/></w:tblGrid>
                    <w:tr>
                        <w:tc><w:tcPr><w:tcW w:w="4788" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>A1</w:t></w:r></w:p></w:tc>
                        <w:tc><w:p><w:r><w:t>B1</w:t></w:r></w:p></w:tc>
                    </w:tr>
                    <w:tr>
                        <w:tc><w:p><w:r><w:t>A2</w:t></w:r></w:p></w:tc>
                        <w:tc><w:p><w:r><w:t>B2</w:t></w:r></w:p></w:tc>
                    </w:tr>
                </w:tbl>
                <w:p><w:r><w:t>after table</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        assert_eq!(blocks.len(), 2);

        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.grid, vec!["4788", "4788"]);
        assert_eq!(
            table.props.as_ref().unwrap().style.as_deref(),
            Some("TableGrid")
        );
        assert_eq!(table.cell_text(0, 0).unwrap(), "A1");
        assert_eq!(table.cell_text(1, 1).unwrap(), "B2");
        assert!(table.rows[0].cells[0].props.is_some());

        let Block::Paragraph(p) = &blocks[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.text(), "after table");
    }

    #[test]
    fn test_parse_drawing() {
        let xml = br#"<w:document
            xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
            xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
            <w:body>
                <w:p>
                    <w:r>
                        <w:drawing>
                            <wp:inline distT="0" distB="0" distL="0" distR="0">
                                <wp:extent cx="1905000" cy="1428750"/>
                                <wp:docPr id="1" name="logo.png"/>
                                <a:graphic>
                                    <a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">
                                        <pic:pic>
                                            <pic:blipFill>
                                                <a:blip r:embed="rId4"/>
                                            </pic:blipFill>
                                        </pic:pic>
                                    </a:graphicData>
                                </a:graphic>
                            </wp:inline>
                        </w:drawing>
                    </w:r>
                </w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        let drawing = p.runs[0].drawing.as_ref().unwrap();
        assert_eq!(drawing.rel_id, "rId4");
        assert_eq!(drawing.name, "logo.png");
        assert_eq!(drawing.width_emu, 1905000);
        assert_eq!(drawing.height_emu, 1428750);
    }

    #[test]
    fn test_empty_body() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#;
        let blocks = parse_document(xml).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_multiple_text_fragments_in_run() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t>Hello, </w:t><w:t>world</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let blocks = parse_document(xml).unwrap();
        let Block::Paragraph(p) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.runs[0].texts.len(), 2);
        assert_eq!(p.text(), "Hello, world");
    }
}
