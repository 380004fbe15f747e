//! Diff renderers
//!
//! Every renderer sits behind the same single-capability trait and turns a
//! [`DiffResult`] into a string: a self-contained HTML page with inline
//! CSS, CommonMark-compatible Markdown, or plain text with optional ANSI
//! coloring. All three handle the reserved `Modified` kind even though the
//! comparison currently never emits it.

use crate::{Change, ChangeKind, DiffResult};

/// Render a comparison result to a string
pub trait Render {
    fn render(&self, result: &DiffResult) -> String;
}

/// Escape text for embedding in HTML
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Color-coded HTML document renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    /// Include the statistics block
    pub show_stats: bool,
}

impl HtmlRenderer {
    pub fn new(show_stats: bool) -> Self {
        Self { show_stats }
    }

    fn change(&self, change: &Change) -> String {
        let (class, text) = match change.kind {
            ChangeKind::Added => ("added", escape_html(&change.new)),
            ChangeKind::Deleted => ("deleted", escape_html(&change.old)),
            ChangeKind::Modified => (
                "modified",
                format!(
                    "{} &rarr; {}",
                    escape_html(&change.old),
                    escape_html(&change.new)
                ),
            ),
            ChangeKind::Unchanged => ("unchanged", escape_html(&change.old)),
        };
        format!(
            "<div class=\"diff-line {class}\"><span class=\"position\">Line {}:</span>{text}</div>\n",
            change.position + 1
        )
    }
}

impl Render for HtmlRenderer {
    fn render(&self, result: &DiffResult) -> String {
        let mut out = String::new();

        out.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Document Diff</title>
    <style>
        body { font-family: 'Segoe UI', Arial, sans-serif; margin: 20px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 3px solid #4CAF50; padding-bottom: 10px; }
        .stats { background: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0; }
        .stats-item { display: inline-block; margin-right: 30px; }
        .stats-label { font-weight: bold; color: #666; }
        .stats-value { color: #333; font-size: 1.2em; }
        .diff-line { padding: 8px 12px; margin: 2px 0; font-family: 'Courier New', monospace; border-left: 4px solid transparent; }
        .added { background-color: #e6ffed; border-left-color: #28a745; }
        .deleted { background-color: #ffeef0; border-left-color: #dc3545; text-decoration: line-through; }
        .modified { background-color: #fff3cd; border-left-color: #ffc107; }
        .unchanged { color: #666; }
        .position { color: #999; font-size: 0.9em; margin-right: 10px; }
        .legend { margin: 20px 0; padding: 10px; background: #f0f0f0; border-radius: 5px; }
        .legend-item { display: inline-block; margin-right: 20px; }
        .legend-color { display: inline-block; width: 20px; height: 20px; margin-right: 5px; vertical-align: middle; border-radius: 3px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Document Comparison</h1>
"#,
        );
        out.push_str(&format!(
            "        <p><strong>Old:</strong> {}</p>\n",
            escape_html(&result.old_document)
        ));
        out.push_str(&format!(
            "        <p><strong>New:</strong> {}</p>\n",
            escape_html(&result.new_document)
        ));

        if self.show_stats {
            out.push_str("        <div class=\"stats\">\n            <h2>Statistics</h2>\n");
            for (label, value, color) in [
                ("Total Changes", result.stats.total_changes, None),
                ("Added", result.stats.added, Some("#28a745")),
                ("Deleted", result.stats.deleted, Some("#dc3545")),
                ("Modified", result.stats.modified, Some("#ffc107")),
            ] {
                let style = color
                    .map(|c| format!(" style=\"color: {c};\""))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "            <div class=\"stats-item\"><span class=\"stats-label\">{label}:</span> <span class=\"stats-value\"{style}>{value}</span></div>\n"
                ));
            }
            out.push_str("        </div>\n");
        }

        out.push_str(
            r#"        <div class="legend">
            <strong>Legend:</strong>
            <span class="legend-item"><span class="legend-color" style="background: #e6ffed;"></span>Added</span>
            <span class="legend-item"><span class="legend-color" style="background: #ffeef0;"></span>Deleted</span>
            <span class="legend-item"><span class="legend-color" style="background: #fff3cd;"></span>Modified</span>
        </div>
        <h2>Changes</h2>
        <div class="diff">
"#,
        );

        if result.changes.is_empty() {
            out.push_str(
                "<p style=\"color: #28a745; font-weight: bold;\">No changes detected - documents are identical</p>\n",
            );
        } else {
            for change in &result.changes {
                out.push_str(&self.change(change));
            }
        }

        out.push_str("        </div>\n    </div>\n</body>\n</html>\n");
        out
    }
}

/// CommonMark-compatible renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    /// Include the statistics block
    pub show_stats: bool,
}

impl MarkdownRenderer {
    pub fn new(show_stats: bool) -> Self {
        Self { show_stats }
    }

    fn change(&self, change: &Change) -> String {
        let line = change.position + 1;
        match change.kind {
            ChangeKind::Added => format!("**Line {line}** `+` {}\n\n", change.new),
            ChangeKind::Deleted => format!("**Line {line}** `-` ~~{}~~\n\n", change.old),
            ChangeKind::Modified => {
                format!("**Line {line}** `~` ~~{}~~ -> {}\n\n", change.old, change.new)
            }
            ChangeKind::Unchanged => String::new(),
        }
    }
}

impl Render for MarkdownRenderer {
    fn render(&self, result: &DiffResult) -> String {
        let mut out = String::new();

        out.push_str("# Document Comparison\n\n");
        out.push_str(&format!("**Old:** {}  \n", result.old_document));
        out.push_str(&format!("**New:** {}\n\n", result.new_document));

        if self.show_stats {
            out.push_str("## Statistics\n\n");
            out.push_str(&format!(
                "- **Total Changes:** {}\n",
                result.stats.total_changes
            ));
            out.push_str(&format!("- **Added:** {}\n", result.stats.added));
            out.push_str(&format!("- **Deleted:** {}\n", result.stats.deleted));
            out.push_str(&format!("- **Modified:** {}\n\n", result.stats.modified));
        }

        out.push_str("## Changes\n\n");
        if result.changes.is_empty() {
            out.push_str("No changes detected - documents are identical\n");
        } else {
            for change in &result.changes {
                out.push_str(&self.change(change));
            }
        }

        out
    }
}

const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

/// Plain-text renderer with optional ANSI coloring
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    /// Include the statistics block
    pub show_stats: bool,
    /// Wrap change lines in ANSI color codes
    pub color: bool,
}

impl TextRenderer {
    pub fn new(show_stats: bool, color: bool) -> Self {
        Self { show_stats, color }
    }

    fn paint(&self, code: &str, text: String) -> String {
        if self.color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text
        }
    }

    fn change(&self, change: &Change) -> String {
        let line = change.position + 1;
        match change.kind {
            ChangeKind::Added => self.paint(
                ANSI_GREEN,
                format!("[ADDED] Line {line}: + {}\n", change.new),
            ),
            ChangeKind::Deleted => self.paint(
                ANSI_RED,
                format!("[DELETED] Line {line}: - {}\n", change.old),
            ),
            ChangeKind::Modified => self.paint(
                ANSI_YELLOW,
                format!(
                    "[MODIFIED] Line {line}: {} -> {}\n",
                    change.old, change.new
                ),
            ),
            ChangeKind::Unchanged => String::new(),
        }
    }
}

impl Render for TextRenderer {
    fn render(&self, result: &DiffResult) -> String {
        let mut out = String::new();

        out.push_str("Document Comparison\n");
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");
        out.push_str(&format!("Old: {}\n", result.old_document));
        out.push_str(&format!("New: {}\n\n", result.new_document));

        if self.show_stats {
            out.push_str("Statistics:\n");
            out.push_str(&format!(
                "  Total Changes: {}\n",
                result.stats.total_changes
            ));
            out.push_str(&format!("  Added:         {}\n", result.stats.added));
            out.push_str(&format!("  Deleted:       {}\n", result.stats.deleted));
            out.push_str(&format!("  Modified:      {}\n\n", result.stats.modified));
        }

        out.push_str("Changes:\n");
        out.push_str(&"-".repeat(50));
        out.push_str("\n\n");

        if result.changes.is_empty() {
            out.push_str("No changes detected - documents are identical\n");
        } else {
            for change in &result.changes {
                out.push_str(&self.change(change));
            }
        }

        out
    }
}
