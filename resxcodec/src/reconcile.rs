//! Propagating entry names from a main resource file to its locale variants.
//!
//! Sync is one-directional: the main file decides which names exist, never
//! their values. Names missing from a locale file are appended with an empty
//! value; nothing is removed, deduplicated or reordered.
//!
//! Locale files follow `<base>.<lang>[-<REGION>].resx` (or `.resw`) next to
//! the main file `<base>.resx`.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::{document::ResxDocument, error::Error, types::Entry};

lazy_static! {
    static ref LOCALE_FILE_REGEX: Regex =
        Regex::new(r"^(?P<base>.+)\.(?P<lang>[a-z]{2})(?:-(?P<region>[A-Z]{2}))?\.(?P<ext>res[xw])$")
            .unwrap();
}

/// A file name of the form `<base>.<lang>[-<REGION>].<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFileName {
    pub base: String,
    pub language: String,
    pub region: Option<String>,
    pub extension: String,
}

impl LocaleFileName {
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = LOCALE_FILE_REGEX.captures(file_name)?;
        let name = Self {
            base: caps["base"].to_string(),
            language: caps["lang"].to_string(),
            region: caps.name("region").map(|m| m.as_str().to_string()),
            extension: caps["ext"].to_string(),
        };
        name.language_identifier()?;
        Some(name)
    }

    /// `en`, `de-AT`, ...
    pub fn locale(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{}", self.language, region),
            None => self.language.clone(),
        }
    }

    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.locale().parse().ok()
    }

    /// File name of the main resource this locale file belongs to.
    pub fn main_file_name(&self) -> String {
        format!("{}.{}", self.base, self.extension)
    }
}

/// Resolves the main resource of a locale file: `Strings.de-AT.resx` → `Strings.resx`.
pub fn main_resource_path(path: &Path) -> Result<PathBuf, Error> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let locale = LocaleFileName::parse(file_name)
        .ok_or_else(|| Error::NamingPattern(file_name.to_string()))?;
    Ok(path.with_file_name(locale.main_file_name()))
}

/// Whether `candidate` is a locale variant of `main` (compared by file name).
pub fn is_locale_sibling(main: &Path, candidate: &Path) -> bool {
    let (Some(stem), Some(ext)) = (
        main.file_stem().and_then(|s| s.to_str()),
        main.extension().and_then(|s| s.to_str()),
    ) else {
        return false;
    };
    candidate
        .file_name()
        .and_then(|s| s.to_str())
        .and_then(LocaleFileName::parse)
        .is_some_and(|locale| locale.base == stem && locale.extension == ext)
}

/// Lists the locale variants next to `main`, sorted by file name.
pub fn locale_siblings(main: &Path) -> Result<Vec<PathBuf>, Error> {
    let dir = match main.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut siblings = Vec::new();
    for dent in std::fs::read_dir(dir)? {
        let dent = dent?;
        if !dent.file_type()?.is_file() {
            continue;
        }
        let path = dent.path();
        if is_locale_sibling(main, &path) {
            siblings.push(path);
        }
    }
    siblings.sort();
    Ok(siblings)
}

/// Names present in `main` but absent from `other`, in main's order.
pub fn missing_names(main: &[Entry], other: &[Entry]) -> Vec<String> {
    let present: HashSet<&str> = other.iter().map(|e| e.name.as_str()).collect();
    let mut seen = HashSet::new();
    main.iter()
        .map(|e| e.name.as_str())
        .filter(|name| !present.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Appends an empty entry to `other` for each name it is missing.
///
/// Returns the appended names.
pub fn reconcile(main: &[Entry], other: &mut Vec<Entry>) -> Vec<String> {
    let missing = missing_names(main, other);
    other.extend(missing.iter().map(|name| Entry::new(name.as_str(), "")));
    missing
}

/// Outcome of syncing one locale file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub path: PathBuf,
    pub appended: Vec<String>,
}

/// Syncs one open document with the main entries.
///
/// The document is only rewritten when something was appended.
pub fn reconcile_document(main: &[Entry], document: &mut ResxDocument) -> Result<Vec<String>, Error> {
    let mut entries = document.entries()?;
    let appended = reconcile(main, &mut entries);
    if !appended.is_empty() {
        document.replace_entries(&entries)?;
    }
    Ok(appended)
}
