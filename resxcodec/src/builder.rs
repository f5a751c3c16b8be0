//! Encoding entries back into the `<data>` segment of a resx document.
//!
//! The output reproduces the layout Visual Studio and the ResX editor write:
//!
//! ```text
//! {indent}<data name="Name" xml:space="preserve">
//! {indent}{indent}<value>Text</value>
//! {indent}{indent}<comment>Note</comment>
//! {indent}</data>
//! ```
//!
//! with the document's own indent unit and line ending, so rebuilding an
//! unmodified segment gives back the same bytes.

use std::borrow::Cow;

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use tracing::error;

use crate::{
    error::Error,
    segment::{FormattingDescriptor, LineEnding},
    types::Entry,
};

const NAME_ATTR: &[u8] = b"name";
const XML_SPACE_ATTR: &[u8] = b"xml:space";
const PRESERVE: &[u8] = b"preserve";

/// Builds a segment, reporting failures instead of returning them.
///
/// A failure yields an empty string; never partial output.
pub fn build(entries: &[Entry], descriptor: &FormattingDescriptor) -> String {
    match build_segment(entries, descriptor) {
        Ok(segment) => segment,
        Err(e) => {
            error!(error = %e, "failed to build resx entries");
            String::new()
        }
    }
}

/// Encodes `entries` as a fragment for `[segment_start, segment_end)`.
///
/// An empty list encodes to the empty string.
pub fn build_segment(entries: &[Entry], descriptor: &FormattingDescriptor) -> Result<String, Error> {
    if entries.is_empty() {
        return Ok(String::new());
    }

    let eol = descriptor.line_ending.as_str();
    let indent = descriptor.indent.as_str();
    let child_indent = indent.repeat(2);
    let mut writer = Writer::new(Vec::new());

    for entry in entries {
        check_name(&entry.name)?;

        let mut data = BytesStart::new("data");
        let name = escape_attribute(&entry.name);
        data.push_attribute((NAME_ATTR, name.as_bytes()));
        for (key, value) in &entry.attributes {
            check_attribute(entry, key, value)?;
            let value = escape_attribute(value);
            data.push_attribute((key.as_bytes(), value.as_bytes()));
        }
        data.push_attribute((XML_SPACE_ATTR, PRESERVE));

        write_raw(&mut writer, indent)?;
        writer.write_event(Event::Start(data))?;
        write_raw(&mut writer, eol)?;

        write_text_element(
            &mut writer,
            "value",
            &entry.value,
            &child_indent,
            descriptor.line_ending,
        )?;
        if let Some(comment) = entry.comment.as_deref().filter(|c| !c.is_empty()) {
            write_text_element(
                &mut writer,
                "comment",
                comment,
                &child_indent,
                descriptor.line_ending,
            )?;
        }

        write_raw(&mut writer, indent)?;
        writer.write_event(Event::End(BytesEnd::new("data")))?;
        write_raw(&mut writer, eol)?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Encoding(e.to_string()))
}

fn write_raw(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), Error> {
    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
    indent: &str,
    line_ending: LineEnding,
) -> Result<(), Error> {
    check_text(tag, text)?;
    let text = normalize_line_breaks(text, line_ending);

    write_raw(writer, indent)?;
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    // `"` and `'` are legal in text content and stay literal
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(&*text))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    write_raw(writer, line_ending.as_str())
}

/// Rewrites lone `\n` line breaks to the document's line ending.
fn normalize_line_breaks(text: &str, line_ending: LineEnding) -> Cow<'_, str> {
    if line_ending == LineEnding::Lf || !text.contains('\n') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev = '\0';
    for c in text.chars() {
        if c == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(c);
        prev = c;
    }
    Cow::Owned(out)
}

/// Escapes an attribute value for a double-quoted attribute.
fn escape_attribute(raw: &str) -> Cow<'_, str> {
    let escaped = partial_escape(raw);
    if !escaped.contains(['"', '\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn check_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::invalid_resource("entry name cannot be empty"));
    }
    check_text("name", name)
}

fn check_text(what: &str, text: &str) -> Result<(), Error> {
    if text.contains('\0') {
        return Err(Error::invalid_resource(format!(
            "{} contains a NUL character",
            what
        )));
    }
    Ok(())
}

fn check_attribute(entry: &Entry, key: &str, value: &str) -> Result<(), Error> {
    let reserved = key.as_bytes() == NAME_ATTR || key.as_bytes() == XML_SPACE_ATTR;
    let malformed = key.is_empty()
        || key
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '=' | '<' | '>' | '"' | '\'' | '/' | '&'));
    if reserved || malformed {
        return Err(Error::invalid_resource(format!(
            "invalid attribute '{}' on entry '{}'",
            key, entry.name
        )));
    }
    check_text(key, value)
}
