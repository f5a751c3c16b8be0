//! `watch`: hosts one document for a table UI speaking the `update` message
//! protocol as JSON lines.
//!
//! stdout carries update messages to the UI, stdin carries update messages
//! from it. External edits to the file are picked up through a file watcher.
//! Both sources are served by one loop, so changes are handled strictly in
//! order.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use resxcodec::{EditorSession, FocusTracker, Message, Notifier, document::decode_text};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, warn};

use crate::validation::{read_document, validate_input, write_document};

/// Change notifications arriving within this window are handled as one.
const DEBOUNCE: Duration = Duration::from_millis(50);

async fn emit(message: &Message) -> Result<(), String> {
    let mut line = message.to_json().map_err(|e| e.to_string())?;
    line.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(line.as_bytes())
        .await
        .map_err(|e| format!("Cannot write to stdout: {}", e))?;
    stdout
        .flush()
        .await
        .map_err(|e| format!("Cannot write to stdout: {}", e))
}

/// Whether a watcher event may have changed the file named `file_name`.
fn concerns(event: &Event, file_name: &OsString) -> bool {
    !matches!(event.kind, EventKind::Access(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

async fn handle_ui_line(
    session: &mut EditorSession,
    path: &Path,
    line: &str,
    notifier: &dyn Notifier,
) {
    let message = match Message::from_json(line) {
        Ok(message) => message,
        Err(e) => {
            notifier.report(&e);
            return;
        }
    };
    let staged = match session.stage_update(&message.into_entries()) {
        Ok(staged) => staged,
        Err(e) => {
            notifier.report(&e);
            return;
        }
    };
    match write_document(path, staged.document()).await {
        Ok(()) => {
            let version = session.commit_update(staged);
            debug!(version, "saved document");
        }
        Err(e) => notifier.error(&e),
    }
}

async fn handle_file_change(
    session: &mut EditorSession,
    path: &Path,
    notifier: &dyn Notifier,
) -> Result<(), String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            notifier.warn(&format!("Cannot read '{}': {}", path.display(), e));
            return Ok(());
        }
    };
    let text = match decode_text(&bytes) {
        Ok((text, _)) => text,
        Err(e) => {
            notifier.report(&e);
            return Ok(());
        }
    };
    if let Some(message) = session.on_external_change(text, notifier) {
        emit(&message).await?;
    }
    Ok(())
}

/// Serves `input` until stdin closes. The document becomes the focused one
/// once it has been opened.
pub async fn run_watch_command(
    input: &Path,
    focus: &mut FocusTracker,
    notifier: &dyn Notifier,
) -> Result<(), String> {
    validate_input(input)?;
    let path: PathBuf = input.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| format!("Invalid file path: {}", path.display()))?;

    let document = read_document(&path).await?;
    let (mut session, initial) = EditorSession::open(document)
        .map_err(|e| format!("Failed to read entries from '{}': {}", path.display(), e))?;
    focus.focus(&path);
    debug!(path = %path.display(), "focused document");
    emit(&initial).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        },
        Config::default(),
    )
    .map_err(|e| format!("Failed to create watcher: {}", e))?;

    // the file may be replaced rather than rewritten in place
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("Failed to watch '{}': {}", dir.display(), e))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.map_err(|e| format!("Cannot read from stdin: {}", e))?;
                match line {
                    None => break,
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => handle_ui_line(&mut session, &path, &line, notifier).await,
                }
            }
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    Ok(event) if concerns(&event, &file_name) => {
                        tokio::time::sleep(DEBOUNCE).await;
                        while rx.try_recv().is_ok() {}
                        handle_file_change(&mut session, &path, notifier).await?;
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "file watcher error"),
                }
            }
        }
    }

    debug!(version = session.version(), "watch finished");
    Ok(())
}
