//! An open resx document: decoded text, on-disk encoding, and the segment
//! formatting captured when it was opened.
//!
//! All writes go through [`ResxDocument::replace_entries`], which only ever
//! touches `[segment_start, segment_end)`.

use std::io::{BufRead, Write};

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

use crate::{
    builder::build_segment,
    error::Error,
    parser::parse_segment,
    segment::{FormattingDescriptor, LineEnding, locate},
    traits::Parser,
    types::Entry,
};

/// Template written for new, empty resx files.
pub const EMPTY_RESX: &str = include_str!("empty.resx");

/// Byte encoding of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    /// Encodes `text` including the byte order mark, if any.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut out = Vec::with_capacity(text.len() + 3);
                out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
                out.extend_from_slice(text.as_bytes());
                out
            }
            TextEncoding::Utf16Le => std::iter::once(0xFEFF)
                .chain(text.encode_utf16())
                .flat_map(u16::to_le_bytes)
                .collect(),
            TextEncoding::Utf16Be => std::iter::once(0xFEFF)
                .chain(text.encode_utf16())
                .flat_map(u16::to_be_bytes)
                .collect(),
        }
    }
}

/// Decodes file bytes, honoring a UTF-8 or UTF-16 byte order mark.
///
/// Bytes without a BOM must be valid UTF-8; invalid input is an error rather
/// than being replaced, so a later write never corrupts the file.
pub fn decode_text(bytes: &[u8]) -> Result<(String, TextEncoding), Error> {
    let (encoding, bom_len): (&'static Encoding, usize) =
        Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let text_encoding = if encoding == UTF_16LE {
        TextEncoding::Utf16Le
    } else if encoding == UTF_16BE {
        TextEncoding::Utf16Be
    } else if bom_len > 0 {
        TextEncoding::Utf8Bom
    } else {
        TextEncoding::Utf8
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(Error::Encoding(format!("invalid {} data", encoding.name())));
    }
    Ok((text.into_owned(), text_encoding))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResxDocument {
    text: String,
    encoding: TextEncoding,
    descriptor: FormattingDescriptor,
}

impl ResxDocument {
    /// Opens a UTF-8 document from text.
    pub fn new(text: impl Into<String>) -> Result<Self, Error> {
        Self::with_encoding(text.into(), TextEncoding::Utf8)
    }

    /// Opens a document that will be written back with `encoding`.
    pub fn with_encoding(text: String, encoding: TextEncoding) -> Result<Self, Error> {
        let descriptor = locate(&text, LineEnding::detect(&text))?;
        Ok(Self {
            text,
            encoding,
            descriptor,
        })
    }

    /// Opens the empty-file template.
    pub fn empty() -> Result<Self, Error> {
        Self::new(EMPTY_RESX)
    }

    /// Opens a document from raw file bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let (text, encoding) = decode_text(bytes)?;
        Self::with_encoding(text, encoding)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn line_ending(&self) -> LineEnding {
        self.descriptor.line_ending
    }

    pub fn descriptor(&self) -> &FormattingDescriptor {
        &self.descriptor
    }

    /// The editable `<data>` segment.
    pub fn segment(&self) -> &str {
        self.descriptor.slice(&self.text)
    }

    pub fn entries(&self) -> Result<Vec<Entry>, Error> {
        parse_segment(self.segment())
    }

    /// Replaces all entries. Fails when the current segment cannot be read.
    /// On failure the document is left unchanged.
    pub fn replace_entries(&mut self, entries: &[Entry]) -> Result<(), Error> {
        parse_segment(self.segment())?;
        let fragment = build_segment(entries, &self.descriptor)?;
        self.text.replace_range(self.descriptor.range(), &fragment);
        self.descriptor.segment_end = self.descriptor.segment_start + fragment.len();
        Ok(())
    }

    /// Swaps in text changed outside of this document.
    ///
    /// The indent and line ending captured at open are kept; only the segment
    /// offsets follow the new text. On failure the document is left unchanged.
    pub fn reload(&mut self, text: String) -> Result<(), Error> {
        let located = locate(&text, self.descriptor.line_ending)?;
        self.descriptor.segment_start = located.segment_start;
        self.descriptor.segment_end = located.segment_end;
        self.text = text;
        Ok(())
    }

    /// The text this document would have after parsing and rebuilding its
    /// entries unchanged.
    pub fn rebuilt_text(&self) -> Result<String, Error> {
        let mut copy = self.clone();
        copy.replace_entries(&self.entries()?)?;
        Ok(copy.text)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoding.encode(&self.text)
    }
}

impl Parser for ResxDocument {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(&self.to_bytes()).map_err(Error::Io)
    }
}
