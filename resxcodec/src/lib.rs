#![forbid(unsafe_code)]
//! Formatting-preserving editing of `.resx` / `.resw` localization files.
//!
//! A resx document is treated as three parts: everything up to the last
//! `</resheader>`, the run of `<data>` entries, and the closing `</root>`.
//! Only the middle part is ever rewritten, using the document's own indent and
//! line ending, so parsing and rebuilding an unchanged file gives back the same
//! bytes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resxcodec::{Entry, ResxDocument, traits::Parser};
//!
//! let mut document = ResxDocument::read_from("Strings.resx")?;
//! let mut entries = document.entries()?;
//! entries.push(Entry::new("Farewell", "Goodbye").with_comment("Shown on exit"));
//! document.replace_entries(&entries)?;
//! document.write_to("Strings.resx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Locale variants (`Strings.de.resx`, `Strings.pt-BR.resx`) are kept in step
//! with the main file through [`reconcile`](crate::reconcile::reconcile).

pub mod builder;
pub mod document;
pub mod error;
pub mod parser;
pub mod reconcile;
pub mod segment;
pub mod session;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    builder::{build, build_segment},
    document::{EMPTY_RESX, ResxDocument, TextEncoding},
    error::{Error, Severity},
    parser::{parse, parse_segment},
    reconcile::{
        LocaleFileName, ReconcileReport, locale_siblings, main_resource_path, missing_names,
        reconcile, reconcile_document,
    },
    segment::{FormattingDescriptor, LineEnding, locate},
    session::{EditorSession, FocusTracker, Notifier, StagedUpdate},
    types::{Entry, Message, find_entry},
};
