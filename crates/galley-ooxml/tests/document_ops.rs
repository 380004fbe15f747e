//! Document operation coverage: body edits, tables, clone independence

use galley_ooxml::{
    Block, Document, HeaderFooterKind, HeaderFooterOptions, Justification, ParagraphOptions,
};

fn doc_with(texts: &[&str]) -> Document {
    let mut doc = Document::new();
    for text in texts {
        doc.add_paragraph(*text);
    }
    doc
}

#[test]
fn paragraph_sequence_edits() {
    let mut doc = doc_with(&["a", "b", "c"]);

    doc.insert_paragraph_at(0, "start").unwrap();
    doc.delete_paragraph(2).unwrap();
    assert_eq!(doc.paragraph_texts(), vec!["start", "a", "c"]);

    doc.delete_paragraph_range(0, 1).unwrap();
    assert_eq!(doc.paragraph_texts(), vec!["c"]);
}

#[test]
fn paragraph_indices_skip_tables() {
    let mut doc = Document::new();
    doc.add_paragraph("before");
    doc.add_table(1, 1);
    doc.add_paragraph("after");

    // Paragraph indices address the paragraph sequence, not body blocks
    assert_eq!(doc.paragraph_text(1).unwrap(), "after");
    doc.insert_paragraph_at(1, "middle").unwrap();

    assert_eq!(doc.paragraph_texts(), vec!["before", "middle", "after"]);
    // The insertion lands just before the paragraph it displaces
    assert!(matches!(doc.body[1], Block::Table(_)));
    assert!(matches!(doc.body[2], Block::Paragraph(_)));
}

#[test]
fn replace_and_find() {
    let mut doc = doc_with(&["the quick fox", "lazy dog", "the end"]);

    assert_eq!(doc.find_text("THE"), vec![0, 2]);
    assert_eq!(doc.replace_text("the", "a"), 2);
    assert_eq!(doc.paragraph_text(0).unwrap(), "a quick fox");

    doc.replace_text_in_paragraph(1, "lazy", "sleepy").unwrap();
    assert_eq!(doc.paragraph_text(1).unwrap(), "sleepy dog");
    assert!(doc.replace_text_in_paragraph(10, "x", "y").is_err());
}

#[test]
fn clone_is_fully_independent() {
    let mut original = doc_with(&["shared text"]);
    original.add_table(1, 2);

    let mut copy = original.clone();

    // Mutate the clone in every dimension
    copy.add_paragraph("new");
    copy.replace_text("shared", "replaced");
    copy.table_mut(0).unwrap().set_cell_text(0, 0, "x").unwrap();
    copy.set_header(
        HeaderFooterKind::HeaderDefault,
        "clone header",
        &HeaderFooterOptions::default(),
    )
    .unwrap();

    assert_eq!(original.paragraph_count(), 1);
    assert_eq!(original.paragraph_text(0).unwrap(), "shared text");
    assert_eq!(original.table(0).unwrap().cell_text(0, 0).unwrap(), "");
    assert!(!original.has_header(HeaderFooterKind::HeaderDefault));

    // And the other direction
    original.add_paragraph("only original");
    assert_eq!(copy.paragraph_count(), 2);
}

#[test]
fn styled_paragraphs_roundtrip() {
    let mut doc = Document::new();
    doc.add_paragraph_with(
        "Centered heading",
        &ParagraphOptions::new()
            .bold()
            .color("1F4E79")
            .alignment(Justification::Center)
            .style("Heading2"),
    );

    let bytes = doc.to_bytes().unwrap();
    let restored = Document::from_bytes(bytes).unwrap();

    let paragraph = restored.paragraphs().next().unwrap();
    assert_eq!(paragraph.style(), Some("Heading2"));
    let props = paragraph.props.as_ref().unwrap();
    assert_eq!(props.justification, Some(Justification::Center));
    let run_props = paragraph.runs[0].props.as_ref().unwrap();
    assert!(run_props.bold);
    assert_eq!(run_props.color.as_deref(), Some("1F4E79"));
}

#[test]
fn tables_roundtrip_with_content() {
    let mut doc = Document::new();
    let table = doc.add_table(2, 2);
    table.set_cell_text(0, 0, "Name").unwrap();
    table.set_cell_text(0, 1, "Price").unwrap();
    table.set_cell_text(1, 0, "Widget").unwrap();
    table.set_cell_text(1, 1, "$10").unwrap();

    let bytes = doc.to_bytes().unwrap();
    let restored = Document::from_bytes(bytes).unwrap();

    let table = restored.table(0).unwrap();
    assert_eq!(table.cell_text(0, 0).unwrap(), "Name");
    assert_eq!(table.cell_text(1, 1).unwrap(), "$10");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 2);
}

#[test]
fn header_footer_full_cycle() {
    let mut doc = Document::new();
    doc.add_paragraph("body");

    doc.set_header(
        HeaderFooterKind::HeaderDefault,
        "Acme Corp",
        &HeaderFooterOptions::new()
            .bold()
            .alignment(Justification::Center),
    )
    .unwrap();
    doc.set_footer(
        HeaderFooterKind::FooterDefault,
        "Page footer",
        &HeaderFooterOptions::new().italic().size("18"),
    )
    .unwrap();
    doc.set_footer(
        HeaderFooterKind::FooterEven,
        "Even pages",
        &HeaderFooterOptions::default(),
    )
    .unwrap();

    assert!(doc.has_header(HeaderFooterKind::HeaderDefault));
    assert!(doc.has_footer(HeaderFooterKind::FooterEven));

    let bytes = doc.to_bytes().unwrap();
    let archive = galley_ooxml::OoxmlArchive::from_reader(std::io::Cursor::new(bytes)).unwrap();
    assert!(archive.contains("word/header1.xml"));
    assert!(archive.contains("word/footer1.xml"));
    assert!(archive.contains("word/footer2.xml"));

    let footer_xml = archive.get_string("word/footer1.xml").unwrap();
    assert!(footer_xml.contains("<w:ftr"));
    assert!(footer_xml.contains("Page footer"));
    assert!(footer_xml.contains("<w:i/>"));

    doc.remove_footer(HeaderFooterKind::FooterEven).unwrap();
    let bytes = doc.to_bytes().unwrap();
    let archive = galley_ooxml::OoxmlArchive::from_reader(std::io::Cursor::new(bytes)).unwrap();
    assert!(!archive.contains("word/footer2.xml"));
    assert!(archive.contains("word/footer1.xml"));

    // The removed part must vanish from every place that referenced it
    let types = archive.get_string("[Content_Types].xml").unwrap();
    assert!(!types.contains("/word/footer2.xml"));
    assert!(types.contains("/word/footer1.xml"));
    let rels = archive.get_string("word/_rels/document.xml.rels").unwrap();
    assert!(!rels.contains("footer2.xml"));
}

#[test]
fn delete_table_by_table_index() {
    let mut doc = Document::new();
    doc.add_paragraph("p");
    doc.add_table(1, 1);
    doc.add_table(2, 2);

    doc.delete_table(0).unwrap();
    assert_eq!(doc.table_count(), 1);
    assert_eq!(doc.table(0).unwrap().row_count(), 2);
    assert!(doc.delete_table(5).is_err());
}
