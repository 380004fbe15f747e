//! WordprocessingML emitters
//!
//! Serializes the document model back to `word/document.xml` and emits
//! header/footer part XML. Output is built as strings with explicit
//! escaping, and is deterministic for identical models.

use std::collections::BTreeMap;

use crate::document::{Block, Paragraph, ParagraphProps, Run, RunProps};
use crate::header_footer::{HeaderFooter, HeaderFooterKind};
use crate::image::Drawing;
use crate::table::{Table, TableWidth};

/// WordprocessingML main namespace
pub const WORDPROCESSINGML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Officedocument relationships namespace
pub const RELATIONSHIPS_REF_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Emit the complete `word/document.xml` for a body
pub fn document_xml(
    body: &[Block],
    header_footers: &BTreeMap<HeaderFooterKind, HeaderFooter>,
) -> String {
    let mut writer = XmlWriter::default();

    writer
        .out
        .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    writer.out.push('\n');
    writer.out.push_str(r#"<w:document "#);
    writer
        .out
        .push_str(&format!(r#"xmlns:w="{WORDPROCESSINGML_NS}" "#));
    writer
        .out
        .push_str(&format!(r#"xmlns:r="{RELATIONSHIPS_REF_NS}" "#));
    writer.out.push_str(
        r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    );
    writer
        .out
        .push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
    writer
        .out
        .push_str(r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#);
    writer.out.push('\n');
    writer.out.push_str("<w:body>\n");

    for block in body {
        match block {
            Block::Paragraph(paragraph) => writer.paragraph(paragraph),
            Block::Table(table) => writer.table(table),
        }
    }

    writer.section_properties(header_footers);

    writer.out.push_str("</w:body>\n");
    writer.out.push_str("</w:document>");
    writer.out
}

/// Emit a header or footer part
pub fn header_footer_xml(entry: &HeaderFooter) -> String {
    let tag = if entry.kind.is_footer() {
        "w:ftr"
    } else {
        "w:hdr"
    };

    let mut writer = XmlWriter::default();
    writer
        .out
        .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    writer.out.push('\n');
    writer.out.push_str(&format!(
        r#"<{tag} xmlns:w="{WORDPROCESSINGML_NS}" xmlns:r="{RELATIONSHIPS_REF_NS}">"#
    ));
    writer.out.push('\n');
    for paragraph in &entry.paragraphs {
        writer.paragraph(paragraph);
    }
    writer.out.push_str(&format!("</{tag}>"));
    writer.out
}

#[derive(Default)]
struct XmlWriter {
    out: String,
    next_drawing_id: usize,
}

impl XmlWriter {
    fn paragraph(&mut self, paragraph: &Paragraph) {
        if paragraph.props.is_none() && paragraph.runs.is_empty() {
            self.out.push_str("<w:p/>\n");
            return;
        }

        self.out.push_str("<w:p>\n");
        if let Some(props) = &paragraph.props {
            self.paragraph_props(props);
        }
        for run in &paragraph.runs {
            self.run(run);
        }
        self.out.push_str("</w:p>\n");
    }

    fn paragraph_props(&mut self, props: &ParagraphProps) {
        self.out.push_str("<w:pPr>\n");
        if let Some(style) = &props.style {
            self.out
                .push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", escape_xml(style)));
        }
        if let Some(justification) = props.justification {
            self.out
                .push_str(&format!("<w:jc w:val=\"{}\"/>\n", justification.as_str()));
        }
        if let Some(spacing) = &props.spacing {
            self.out.push_str("<w:spacing");
            if let Some(before) = &spacing.before {
                self.out
                    .push_str(&format!(" w:before=\"{}\"", escape_xml(before)));
            }
            if let Some(after) = &spacing.after {
                self.out
                    .push_str(&format!(" w:after=\"{}\"", escape_xml(after)));
            }
            if let Some(line) = &spacing.line {
                self.out.push_str(&format!(" w:line=\"{}\"", escape_xml(line)));
            }
            self.out.push_str("/>\n");
        }
        self.out.push_str("</w:pPr>\n");
    }

    fn run(&mut self, run: &Run) {
        self.out.push_str("<w:r>\n");
        if let Some(props) = &run.props {
            self.run_props(props);
        }
        if run.tab {
            self.out.push_str("<w:tab/>\n");
        }
        if run.line_break {
            self.out.push_str("<w:br/>\n");
        }
        for text in &run.texts {
            if text.preserve_space {
                self.out.push_str(&format!(
                    "<w:t xml:space=\"preserve\">{}</w:t>\n",
                    escape_xml(&text.content)
                ));
            } else {
                self.out
                    .push_str(&format!("<w:t>{}</w:t>\n", escape_xml(&text.content)));
            }
        }
        if let Some(drawing) = &run.drawing {
            self.drawing(drawing);
        }
        self.out.push_str("</w:r>\n");
    }

    fn run_props(&mut self, props: &RunProps) {
        self.out.push_str("<w:rPr>\n");
        if props.bold {
            self.out.push_str("<w:b/>\n");
        }
        if props.italic {
            self.out.push_str("<w:i/>\n");
        }
        if let Some(size) = &props.size {
            self.out
                .push_str(&format!("<w:sz w:val=\"{}\"/>\n", escape_xml(size)));
        }
        if let Some(color) = &props.color {
            self.out
                .push_str(&format!("<w:color w:val=\"{}\"/>\n", escape_xml(color)));
        }
        if let Some(font) = &props.font {
            self.out
                .push_str(&format!("<w:rFonts w:ascii=\"{}\"/>\n", escape_xml(font)));
        }
        self.out.push_str("</w:rPr>\n");
    }

    fn drawing(&mut self, drawing: &Drawing) {
        self.next_drawing_id += 1;
        let id = self.next_drawing_id;
        let name = escape_xml(&drawing.name);
        let (cx, cy) = (drawing.width_emu, drawing.height_emu);

        self.out.push_str("<w:drawing>\n");
        self.out.push_str(&format!(
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">
<wp:extent cx="{cx}" cy="{cy}"/>
<wp:effectExtent l="0" t="0" r="0" b="0"/>
<wp:docPr id="{id}" name="{name}"/>
<wp:cNvGraphicFramePr/>
<a:graphic>
<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">
<pic:pic>
<pic:nvPicPr>
<pic:cNvPr id="{id}" name="{name}"/>
<pic:cNvPicPr/>
</pic:nvPicPr>
<pic:blipFill>
<a:blip r:embed="{rel_id}"/>
<a:stretch><a:fillRect/></a:stretch>
</pic:blipFill>
<pic:spPr>
<a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>
<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
</pic:spPr>
</pic:pic>
</a:graphicData>
</a:graphic>
</wp:inline>
"#,
            rel_id = escape_xml(&drawing.rel_id),
        ));
        self.out.push_str("</w:drawing>\n");
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<w:tbl>\n");

        self.out.push_str("<w:tblPr>\n");
        if let Some(props) = &table.props {
            if let Some(style) = &props.style {
                self.out
                    .push_str(&format!("<w:tblStyle w:val=\"{}\"/>\n", escape_xml(style)));
            }
            if let Some(width) = &props.width {
                self.table_width("w:tblW", width);
            }
        }
        self.out.push_str("</w:tblPr>\n");

        if !table.grid.is_empty() {
            self.out.push_str("<w:tblGrid>\n");
            for width in &table.grid {
                if width.is_empty() {
                    self.out.push_str("<w:gridCol/>\n");
                } else {
                    self.out
                        .push_str(&format!("<w:gridCol w:w=\"{}\"/>\n", escape_xml(width)));
                }
            }
            self.out.push_str("</w:tblGrid>\n");
        }

        for row in &table.rows {
            self.out.push_str("<w:tr>\n");
            for cell in &row.cells {
                self.out.push_str("<w:tc>\n");
                if let Some(props) = &cell.props {
                    self.out.push_str("<w:tcPr>\n");
                    if let Some(width) = &props.width {
                        self.table_width("w:tcW", width);
                    }
                    self.out.push_str("</w:tcPr>\n");
                }
                if cell.paragraphs.is_empty() {
                    // A cell must hold at least one paragraph
                    self.out.push_str("<w:p/>\n");
                } else {
                    for paragraph in &cell.paragraphs {
                        self.paragraph(paragraph);
                    }
                }
                self.out.push_str("</w:tc>\n");
            }
            self.out.push_str("</w:tr>\n");
        }

        self.out.push_str("</w:tbl>\n");
    }

    fn table_width(&mut self, tag: &str, width: &TableWidth) {
        self.out.push_str(&format!(
            "<{tag} w:w=\"{}\" w:type=\"{}\"/>\n",
            escape_xml(&width.width),
            escape_xml(&width.width_type)
        ));
    }

    fn section_properties(
        &mut self,
        header_footers: &BTreeMap<HeaderFooterKind, HeaderFooter>,
    ) {
        let referenced: Vec<(&HeaderFooterKind, &str)> = header_footers
            .iter()
            .filter_map(|(kind, entry)| entry.rel_id.as_deref().map(|id| (kind, id)))
            .collect();
        if referenced.is_empty() {
            return;
        }

        self.out.push_str("<w:sectPr>\n");
        for (kind, rel_id) in referenced {
            let tag = if kind.is_footer() {
                "w:footerReference"
            } else {
                "w:headerReference"
            };
            self.out.push_str(&format!(
                "<{tag} w:type=\"{}\" r:id=\"{}\"/>\n",
                kind.scope(),
                escape_xml(rel_id)
            ));
        }
        self.out.push_str("</w:sectPr>\n");
    }
}
