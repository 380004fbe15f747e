//! Example: Render a template document against JSON data
//!
//! Usage: cargo run --example render_invoice -- template.docx data.json output.docx

use std::env;
use std::process;

use galley_template::{RenderOptions, Template, TemplateData};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <template.docx> <data.json|data.yaml> <output.docx>", args[0]);
        eprintln!();
        eprintln!("The template may use {{{{.Var}}}}, {{{{range .Coll}}}}...{{{{end}}}},");
        eprintln!("and {{{{if .Cond}}}}...{{{{else}}}}...{{{{end}}}} directives.");
        process::exit(1);
    }

    let template = match Template::load(&args[1]) {
        Ok(template) => template,
        Err(err) => {
            eprintln!("Error loading template: {err}");
            process::exit(1);
        }
    };

    println!("Template variables: {:?}", template.variables());

    let data = match TemplateData::from_file(&args[2]) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Error loading data: {err}");
            process::exit(1);
        }
    };

    let options = RenderOptions {
        strict: false,
        default_value: String::new(),
        remove_empty: true,
    };

    match template.render_to_file(&data, &args[3], &options) {
        Ok(()) => println!("Rendered: {}", args[3]),
        Err(err) => {
            eprintln!("Error rendering: {err}");
            process::exit(1);
        }
    }
}
