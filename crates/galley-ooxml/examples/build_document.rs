//! Example: Build a document from scratch
//!
//! Usage: cargo run --example build_document -- output.docx

use std::env;
use std::process;

use galley_ooxml::{
    Document, HeaderFooterKind, HeaderFooterOptions, Justification, ParagraphOptions,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.docx>", args[0]);
        process::exit(1);
    }
    let output = &args[1];

    let mut doc = Document::new();
    doc.set_title("Galley Demo");

    doc.add_paragraph_with(
        "Project Status Report",
        &ParagraphOptions::new()
            .bold()
            .size("32")
            .alignment(Justification::Center)
            .style("Heading1"),
    );
    doc.add_paragraph("");
    doc.add_paragraph("All milestones are on track.");
    doc.add_paragraph_with(
        "Risks are tracked in the table below.",
        &ParagraphOptions::new().italic().color("1F4E79"),
    );

    let table = doc.add_table(3, 2);
    table.set_cell_text(0, 0, "Risk").expect("cell in range");
    table.set_cell_text(0, 1, "Severity").expect("cell in range");
    table.set_cell_text(1, 0, "Schedule slip").expect("cell in range");
    table.set_cell_text(1, 1, "Medium").expect("cell in range");
    table.set_cell_text(2, 0, "Scope creep").expect("cell in range");
    table.set_cell_text(2, 1, "Low").expect("cell in range");

    if let Err(err) = doc.set_header(
        HeaderFooterKind::HeaderDefault,
        "Internal - Project Status",
        &HeaderFooterOptions::new().alignment(Justification::Center),
    ) {
        eprintln!("Error setting header: {err}");
        process::exit(1);
    }

    let replaced = doc.replace_text("on track", "ahead of schedule");
    println!("Adjusted {replaced} paragraph(s)");

    match doc.save(output) {
        Ok(()) => println!("Created: {output}"),
        Err(err) => {
            eprintln!("Error saving document: {err}");
            process::exit(1);
        }
    }
}
