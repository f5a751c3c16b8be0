use std::path::Path;

use resxcodec::{ResxDocument, traits::Parser};

const RESX_EXTENSIONS: [&str; 2] = ["resx", "resw"];

/// Validate file path exists and is readable
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate the file has a `.resx` or `.resw` extension
pub fn validate_resx_extension(path: &Path) -> Result<(), String> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if RESX_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported file type: {} (expected .resx or .resw)",
            path.display()
        ))
    }
}

/// Validate an existing resx input file
pub fn validate_input(path: &Path) -> Result<(), String> {
    validate_file_path(path)?;
    validate_resx_extension(path)
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    validate_resx_extension(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    Ok(())
}

/// Validate an entry name given on the command line
pub fn validate_entry_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Entry name cannot be empty".to_string());
    }
    Ok(())
}

/// Reads and opens a resx document.
pub async fn read_document(path: &Path) -> Result<ResxDocument, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Cannot read '{}': {}", path.display(), e))?;
    ResxDocument::from_bytes(&bytes).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Writes a document back in the encoding it was read with.
pub async fn write_document(path: &Path, document: &ResxDocument) -> Result<(), String> {
    tokio::fs::write(path, document.to_bytes())
        .await
        .map_err(|e| format!("Cannot write '{}': {}", path.display(), e))
}
