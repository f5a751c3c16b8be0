//! All error types for the resxcodec crate.
//!
//! These are returned from all fallible operations (locating, parsing, building,
//! reconciling, file I/O).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("document has no `{0}` tag")]
    MissingAnchor(&'static str),

    #[error("text encoding error: {0}")]
    Encoding(String),

    #[error("file name does not match pattern '<name>.<locale>.resx': {0}")]
    NamingPattern(String),

    #[error("no active document")]
    NoActiveDocument,
}

/// How loudly an error is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Error {
    /// Creates a new invalid resource error
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Error::InvalidResource(message.into())
    }

    /// Severity used when the error is shown to the user.
    ///
    /// A file that does not follow the locale naming convention only aborts the
    /// command, and a command without a target is a no-op; everything else is
    /// a real failure.
    pub fn severity(&self) -> Severity {
        match self {
            Error::NamingPattern(_) => Severity::Info,
            Error::NoActiveDocument => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
