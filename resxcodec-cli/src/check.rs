use std::path::{Path, PathBuf};

use tracing::debug;

use crate::validation::{read_document, validate_input};

/// 1-based line of the first difference between `a` and `b`.
pub fn first_difference_line(a: &str, b: &str) -> Option<usize> {
    let offset = a
        .bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))?;
    Some(a.as_bytes()[..offset].iter().filter(|&&c| c == b'\n').count() + 1)
}

async fn check_file(path: &Path) -> Result<String, String> {
    validate_input(path)?;
    let document = read_document(path).await?;
    let entries = document.entries().map_err(|e| e.to_string())?;
    let rebuilt = document.rebuilt_text().map_err(|e| e.to_string())?;

    match first_difference_line(document.text(), &rebuilt) {
        None => Ok(format!(
            "{} entries, {}, indent {:?}",
            entries.len(),
            document.line_ending(),
            document.descriptor().indent
        )),
        Some(line) => Err(format!("rewriting would change line {}", line)),
    }
}

/// Parses and rebuilds each file, reporting whether it round-trips unchanged.
pub async fn run_check_command(inputs: &[PathBuf]) -> Result<(), String> {
    let mut failed = 0;
    for input in inputs {
        match check_file(input).await {
            Ok(summary) => println!("✅ {}: {}", input.display(), summary),
            Err(e) => {
                failed += 1;
                debug!(path = %input.display(), error = %e, "check failed");
                println!("❌ {}: {}", input.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed the check", failed, inputs.len()));
    }
    Ok(())
}
