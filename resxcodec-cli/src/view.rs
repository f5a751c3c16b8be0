use std::path::Path;

use resxcodec::{Entry, ResxDocument};
use unicode_width::UnicodeWidthChar;

use crate::validation::{read_document, validate_input};

/// Shortens `value` to at most `max_width` display columns, marking the cut
/// with `...`. Line breaks are shown as `↵` so each value stays on one line.
pub fn truncate(value: &str, max_width: usize) -> String {
    let flat: String = value
        .replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\n' { '↵' } else { c })
        .collect();

    let total: usize = flat.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return flat;
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

fn display(value: &str, full: bool, max_width: usize) -> String {
    if full {
        value.to_string()
    } else {
        truncate(value, max_width)
    }
}

/// Print the entries of a document.
pub fn print_view(path: &Path, document: &ResxDocument, entries: &[Entry], full: bool, max_width: usize) {
    println!("=== {} ===", path.display());
    println!("Entries: {}", entries.len());
    println!("Line ending: {}", document.line_ending());
    println!("Indent: {:?}", document.descriptor().indent);

    for (i, entry) in entries.iter().enumerate() {
        println!("\n  Entry {}: {}", i + 1, entry.name);
        println!("    Value: {}", display(&entry.value, full, max_width));

        if let Some(comment) = &entry.comment {
            println!("    Comment: {}", display(comment, full, max_width));
        }
        for (key, value) in &entry.attributes {
            println!("    @{}: {}", key, display(value, full, max_width));
        }
    }
}

pub async fn run_view_command(input: &Path, full: bool, max_width: usize) -> Result<(), String> {
    validate_input(input)?;
    let document = read_document(input).await?;
    let entries = document
        .entries()
        .map_err(|e| format!("Failed to read entries from '{}': {}", input.display(), e))?;
    print_view(input, &document, &entries, full, max_width);
    Ok(())
}
