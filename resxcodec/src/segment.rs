//! Locating the editable `<data>` segment of a resx document.
//!
//! A resx file is a `<root>` element holding `<resheader>` metadata followed by
//! `<data>` entries. Only the bytes between the last `</resheader>` line and
//! `</root>` are ever rewritten; [`locate`] finds that range and captures the
//! formatting needed to write entries back in the document's own style.

use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

use crate::error::Error;

pub const RESHEADER_CLOSE: &str = "</resheader>";
pub const ROOT_CLOSE: &str = "</root>";
const DATA_OPEN: &str = "<data";

/// Line ending convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Declared end-of-line mode of a document: the style of its first line
    /// break, `Lf` for single-line text.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }
}

impl Display for LineEnding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "LF"),
            LineEnding::CrLf => write!(f, "CRLF"),
        }
    }
}

/// Offsets and formatting captured when a document is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingDescriptor {
    /// First byte of the first `<data>` line.
    pub segment_start: usize,
    /// First byte that belongs to the closing `</root>` line.
    pub segment_end: usize,
    /// Indent unit; `<data>` sits at one unit, its children at two.
    pub indent: String,
    pub line_ending: LineEnding,
}

impl FormattingDescriptor {
    pub fn range(&self) -> Range<usize> {
        self.segment_start..self.segment_end
    }

    /// The segment text of `document`.
    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        &document[self.range()]
    }
}

fn is_horizontal_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Finds the editable segment of `text` and its formatting.
///
/// `line_ending` is the document's declared end-of-line mode, used when writing
/// entries back.
pub fn locate(text: &str, line_ending: LineEnding) -> Result<FormattingDescriptor, Error> {
    let header_close = text
        .rfind(RESHEADER_CLOSE)
        .ok_or(Error::MissingAnchor(RESHEADER_CLOSE))?;
    let header_end = header_close + RESHEADER_CLOSE.len();

    let root_close = text
        .rfind(ROOT_CLOSE)
        .ok_or(Error::MissingAnchor(ROOT_CLOSE))?;
    if root_close < header_end {
        return Err(Error::invalid_resource(format!(
            "`{}` appears after `{}`",
            RESHEADER_CLOSE, ROOT_CLOSE
        )));
    }

    // trailing blanks and the line break stay on the `</resheader>` line
    let trailing = text.as_bytes()[header_end..]
        .iter()
        .take_while(|b| is_horizontal_space(**b))
        .count();
    let after_header = &text[header_end + trailing..];
    let segment_start = if after_header.starts_with("\r\n") {
        header_end + trailing + 2
    } else if after_header.starts_with('\n') {
        header_end + trailing + 1
    } else {
        header_end
    };

    // keep the indentation of `</root>` outside the segment
    let root_line = line_start(text, root_close);
    let segment_end = if root_line >= segment_start
        && text.as_bytes()[root_line..root_close]
            .iter()
            .all(|b| is_horizontal_space(*b))
    {
        root_line
    } else {
        root_close
    };

    let run = text.as_bytes()[segment_start..]
        .iter()
        .take_while(|b| is_horizontal_space(**b))
        .count();
    let indent = if text[segment_start + run..].starts_with(DATA_OPEN) {
        text[segment_start..segment_start + run].to_string()
    } else {
        // no entries yet: `<data>` goes where `<resheader>` is
        let header_line = line_start(text, header_close);
        text.as_bytes()[header_line..header_close]
            .iter()
            .take_while(|b| is_horizontal_space(**b))
            .map(|b| *b as char)
            .collect()
    };

    Ok(FormattingDescriptor {
        segment_start,
        segment_end,
        indent,
        line_ending,
    })
}
