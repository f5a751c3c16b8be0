//! The `update` message contract with table UIs: `dump` produces one,
//! `apply` consumes one.

use std::path::Path;

use resxcodec::Message;
use tokio::io::AsyncReadExt;

use crate::validation::{read_document, validate_file_path, validate_input, write_document};

pub async fn run_dump_command(input: &Path, pretty: bool) -> Result<(), String> {
    validate_input(input)?;
    let document = read_document(input).await?;
    let entries = document
        .entries()
        .map_err(|e| format!("Failed to read entries from '{}': {}", input.display(), e))?;

    let message = Message::update(entries);
    let json = if pretty {
        serde_json::to_string_pretty(&message).map_err(|e| e.to_string())?
    } else {
        message.to_json().map_err(|e| e.to_string())?
    };
    println!("{}", json);
    Ok(())
}

async fn read_message(path: Option<&Path>) -> Result<Message, String> {
    let text = match path {
        Some(path) => {
            validate_file_path(path)?;
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Cannot read message '{}': {}", path.display(), e))?
        }
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| format!("Cannot read message from stdin: {}", e))?;
            text
        }
    };
    Message::from_json(&text).map_err(|e| format!("Invalid update message: {}", e))
}

/// Replaces all entries of `input` with those of an update message.
pub async fn run_apply_command(input: &Path, message: Option<&Path>) -> Result<(), String> {
    validate_input(input)?;
    let message = read_message(message).await?;
    let mut document = read_document(input).await?;

    let entries = message.into_entries();
    document
        .replace_entries(&entries)
        .map_err(|e| format!("Error writing entries: {}", e))?;
    write_document(input, &document).await?;
    println!("✅ Applied {} entries to {}", entries.len(), input.display());
    Ok(())
}
