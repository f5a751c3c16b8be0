//! Editing session glue between a document on disk and a table UI.
//!
//! The UI only ever sees full `update` messages. Writes made by the session
//! itself come back as change notifications from the file watcher; those are
//! recognized by content and swallowed once, so the UI is not refreshed with
//! its own edit.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    document::ResxDocument,
    error::{Error, Severity},
    types::{Entry, Message},
};

/// Sink for user-visible messages.
pub trait Notifier {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Shows `error` at the level its kind calls for.
    fn report(&self, error: &Error) {
        let message = error.to_string();
        match error.severity() {
            Severity::Info => self.info(&message),
            Severity::Warning => self.warn(&message),
            Severity::Error => self.error(&message),
        }
    }
}

/// Remembers the most recently focused document.
///
/// Commands run without an explicit target fall back to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTracker {
    active: Option<PathBuf>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(active: Option<PathBuf>) -> Self {
        Self { active }
    }

    pub fn focus(&mut self, path: impl Into<PathBuf>) {
        self.active = Some(path.into());
    }

    pub fn active(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// The explicit target if given, otherwise the focused document.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf, Error> {
        explicit
            .or(self.active())
            .map(Path::to_path_buf)
            .ok_or(Error::NoActiveDocument)
    }
}

/// Document text rebuilt from a UI update, waiting to be written.
#[derive(Debug, Clone)]
pub struct StagedUpdate {
    document: ResxDocument,
    entries: usize,
}

impl StagedUpdate {
    pub fn document(&self) -> &ResxDocument {
        &self.document
    }
}

#[derive(Debug)]
pub struct EditorSession {
    document: ResxDocument,
    version: u64,
    last_written: Option<u64>,
    // Text of the last write, until its change notification is seen.
    pending_echo: Option<String>,
    broken: bool,
}

impl EditorSession {
    /// Opens a session and returns the initial update for the UI.
    pub fn open(document: ResxDocument) -> Result<(Self, Message), Error> {
        let entries = document.entries()?;
        let session = Self {
            document,
            version: 0,
            last_written: None,
            pending_echo: None,
            broken: false,
        };
        Ok((session, Message::update(entries)))
    }

    pub fn document(&self) -> &ResxDocument {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version produced by the session's own last write.
    pub fn last_written(&self) -> Option<u64> {
        self.last_written
    }

    /// Whether the last external change left the document unparseable.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Rebuilds the document with a full entry list coming from the UI.
    ///
    /// The session itself is untouched until the staged text has been written
    /// and handed to [`EditorSession::commit_update`]. Refused while the file
    /// on disk is malformed, so an external edit is never overwritten with
    /// stale entries.
    pub fn stage_update(&self, entries: &[Entry]) -> Result<StagedUpdate, Error> {
        if self.broken {
            return Err(Error::invalid_resource(
                "document changed on disk and can no longer be parsed; fix the file first",
            ));
        }
        let mut document = self.document.clone();
        document.replace_entries(entries)?;
        Ok(StagedUpdate {
            document,
            entries: entries.len(),
        })
    }

    /// Adopts a staged update once it is on disk and returns the new version.
    pub fn commit_update(&mut self, staged: StagedUpdate) -> u64 {
        self.version += 1;
        self.last_written = Some(self.version);
        self.pending_echo = Some(staged.document.text().to_string());
        self.document = staged.document;
        debug!(version = self.version, entries = staged.entries, "applied update");
        self.version
    }

    /// Handles a change of the file on disk.
    ///
    /// Returns the update to send to the UI, or `None` when the change is the
    /// session's own write. Malformed text is reported through `notifier` and
    /// yields an empty update.
    pub fn on_external_change(&mut self, text: String, notifier: &dyn Notifier) -> Option<Message> {
        self.version += 1;
        if self.pending_echo.take().is_some_and(|written| written == text) {
            debug!(version = self.version, "suppressed own write");
            return None;
        }

        let entries = self
            .document
            .reload(text)
            .and_then(|_| self.document.entries());
        match entries {
            Ok(entries) => {
                self.broken = false;
                Some(Message::update(entries))
            }
            Err(e) => {
                notifier.report(&e);
                self.broken = true;
                Some(Message::update(Vec::new()))
            }
        }
    }
}
