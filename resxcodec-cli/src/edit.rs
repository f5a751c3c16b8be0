use std::path::Path;

use resxcodec::{Entry, ResxDocument};
use tracing::debug;

use crate::validation::{
    read_document, validate_entry_name, validate_input, validate_output_path, write_document,
};

async fn load_entries(input: &Path) -> Result<(ResxDocument, Vec<Entry>), String> {
    validate_input(input)?;
    let document = read_document(input).await?;
    let entries = document
        .entries()
        .map_err(|e| format!("Failed to read entries from '{}': {}", input.display(), e))?;
    Ok((document, entries))
}

async fn save_entries(input: &Path, mut document: ResxDocument, entries: &[Entry]) -> Result<(), String> {
    document
        .replace_entries(entries)
        .map_err(|e| format!("Error writing entries: {}", e))?;
    write_document(input, &document).await
}

/// Adds an entry, or updates the first entry with the same name.
///
/// An existing comment is kept unless a new one is given; an empty comment
/// removes it.
pub async fn run_set_command(
    input: &Path,
    key: String,
    value: String,
    comment: Option<String>,
) -> Result<(), String> {
    validate_entry_name(&key)?;
    let (document, mut entries) = load_entries(input).await?;

    match entries.iter_mut().find(|e| e.name == key) {
        Some(entry) => {
            entry.value = value;
            if let Some(comment) = comment {
                entry.comment = Some(comment).filter(|c| !c.is_empty());
            }
            save_entries(input, document, &entries).await?;
            println!("✅ Updated '{}' in {}", key, input.display());
        }
        None => {
            let mut entry = Entry::new(key.as_str(), value);
            if let Some(comment) = comment {
                entry = entry.with_comment(comment);
            }
            entries.push(entry);
            save_entries(input, document, &entries).await?;
            println!("✅ Added '{}' to {}", key, input.display());
        }
    }
    Ok(())
}

/// Removes every entry named `key`; a missing key is a no-op.
pub async fn run_remove_command(input: &Path, key: String) -> Result<(), String> {
    let (document, mut entries) = load_entries(input).await?;

    let before = entries.len();
    entries.retain(|e| e.name != key);
    if entries.len() == before {
        println!("ℹ️  Key '{}' not found in {}; nothing to remove", key, input.display());
        return Ok(());
    }

    debug!(removed = before - entries.len(), "removing entries");
    save_entries(input, document, &entries).await?;
    println!("✅ Removed '{}' from {}", key, input.display());
    Ok(())
}

/// Creates an empty resx file.
pub async fn run_new_command(output: &Path, force: bool) -> Result<(), String> {
    if output.exists() && !force {
        return Err(format!(
            "File already exists: {} (use --force to overwrite)",
            output.display()
        ));
    }
    validate_output_path(output)?;

    let document = ResxDocument::empty().map_err(|e| e.to_string())?;
    write_document(output, &document).await?;
    println!("✅ Created {}", output.display());
    Ok(())
}
