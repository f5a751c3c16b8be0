//! Core types for resxcodec.
//! The parser decodes into these; the builder serializes these.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single `<data>` entry of a resx file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Entry {
    /// The `name` attribute. Consumers key entries by name, so it should be
    /// unique within a document, but duplicates are tolerated.
    pub name: String,

    /// The localized text, stored exactly as decoded.
    #[serde(default)]
    pub value: String,

    /// Optional comment for translators. `None` never produces a `<comment>` element.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    /// Other attributes of the `<data>` element (`type`, `mimetype`, ...), in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into()).filter(|c: &String| !c.is_empty());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Looks up an additional attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entry {{ name: {}, value: {}", self.name, self.value)?;
        if let Some(comment) = &self.comment {
            write!(f, ", comment: {}", comment)?;
        }
        write!(f, " }}")
    }
}

/// Returns the first entry named `name`.
pub fn find_entry<'a>(entries: &'a [Entry], name: &str) -> Option<&'a Entry> {
    entries.iter().find(|e| e.name == name)
}

/// Messages exchanged between a document host and the table UI.
///
/// Serialized as `{"type": "update", "obj": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Full replacement of the entry list, in either direction.
    Update { obj: Vec<Entry> },
}

impl Message {
    pub fn update(entries: Vec<Entry>) -> Self {
        Message::Update { obj: entries }
    }

    /// Consumes the message and returns its entry list.
    ///
    /// Empty comments coming from the UI are normalized to absent.
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Message::Update { obj } => obj
                .into_iter()
                .map(|mut entry| {
                    if entry.comment.as_deref() == Some("") {
                        entry.comment = None;
                    }
                    entry
                })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::Json)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Json)
    }
}
