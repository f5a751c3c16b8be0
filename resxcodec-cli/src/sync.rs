//! `sync` and `update-all`: propagate entry names from a main resource to
//! its locale files.

use std::path::{Path, PathBuf};

use resxcodec::{
    Entry, Notifier, ReconcileReport, locale_siblings, main_resource_path, reconcile_document,
};
use tracing::{debug, info};

use crate::validation::{read_document, validate_input, write_document};

async fn read_main_entries(main: &Path) -> Result<Vec<Entry>, String> {
    validate_input(main).map_err(|e| format!("Main resource unavailable: {}", e))?;
    read_document(main)
        .await?
        .entries()
        .map_err(|e| format!("Failed to read entries from '{}': {}", main.display(), e))
}

/// Appends the names missing from `path`. The file is only written when
/// something was appended.
pub async fn sync_file(main_entries: &[Entry], path: &Path) -> Result<ReconcileReport, String> {
    let mut document = read_document(path).await?;
    let appended = reconcile_document(main_entries, &mut document)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    if !appended.is_empty() {
        write_document(path, &document).await?;
    }
    debug!(path = %path.display(), appended = appended.len(), "synced locale file");
    Ok(ReconcileReport {
        path: path.to_path_buf(),
        appended,
    })
}

/// Locale files next to `main`, sorted.
pub async fn find_locale_siblings(main: &Path) -> Result<Vec<PathBuf>, String> {
    let owned = main.to_path_buf();
    tokio::task::spawn_blocking(move || locale_siblings(&owned))
        .await
        .map_err(|e| format!("Sibling lookup failed: {}", e))?
        .map_err(|e| format!("Cannot list the folder of '{}': {}", main.display(), e))
}

fn print_report(report: &ReconcileReport) {
    if report.appended.is_empty() {
        println!("✅ {}: up to date", report.path.display());
    } else {
        println!(
            "✅ {}: added {} ({})",
            report.path.display(),
            report.appended.len(),
            report.appended.join(", ")
        );
    }
}

/// Syncs a locale file with its main resource.
pub async fn run_sync_command(target: &Path, notifier: &dyn Notifier) -> Result<(), String> {
    validate_input(target)?;
    let main = match main_resource_path(target) {
        Ok(main) => main,
        Err(e) => {
            notifier.report(&e);
            return Ok(());
        }
    };

    let main_entries = read_main_entries(&main).await?;
    let report = sync_file(&main_entries, target).await?;
    print_report(&report);
    Ok(())
}

/// Propagates the names of `main` to every locale file next to it.
///
/// Each file is handled on its own; failures are reported and the rest of
/// the batch still runs.
pub async fn run_update_all_command(
    main: &Path,
    json: bool,
    notifier: &dyn Notifier,
) -> Result<(), String> {
    let main_entries = read_main_entries(main).await?;
    let siblings = find_locale_siblings(main).await?;
    if siblings.is_empty() {
        notifier.info(&format!("No locale files found next to {}", main.display()));
        return Ok(());
    }
    info!(main = %main.display(), count = siblings.len(), "updating locale files");

    let mut reports = Vec::new();
    let mut failures = 0;
    for sibling in &siblings {
        match sync_file(&main_entries, sibling).await {
            Ok(report) => {
                if !json {
                    print_report(&report);
                }
                reports.push(report);
            }
            Err(e) => {
                failures += 1;
                notifier.error(&e);
            }
        }
    }

    if json {
        let text = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
        println!("{}", text);
    } else {
        let changed = reports.iter().filter(|r| !r.appended.is_empty()).count();
        let added: usize = reports.iter().map(|r| r.appended.len()).sum();
        println!(
            "Updated {} of {} locale files, {} entries added",
            changed,
            siblings.len(),
            added
        );
    }

    if failures > 0 {
        return Err(format!(
            "{} of {} locale files could not be synced",
            failures,
            siblings.len()
        ));
    }
    Ok(())
}
