//! Decoding the `<data>` segment of a resx document into entries.
//!
//! Every piece of text is kept as an opaque string: values that look like
//! numbers or booleans stay text, whitespace is never trimmed, and a single
//! `<data>` element still yields a one-element list.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::error;

use crate::{
    error::Error,
    segment::{LineEnding, locate},
    types::Entry,
};

const DATA: &[u8] = b"data";
const VALUE: &[u8] = b"value";
const COMMENT: &[u8] = b"comment";
const NAME_ATTR: &[u8] = b"name";
const XML_SPACE_ATTR: &[u8] = b"xml:space";

/// Parses a whole document, reporting failures instead of returning them.
///
/// A malformed document or one without `</resheader>`/`</root>` yields an
/// empty list.
pub fn parse(document: &str, line_ending: LineEnding) -> Vec<Entry> {
    let result = locate(document, line_ending)
        .and_then(|descriptor| parse_segment(descriptor.slice(document)));
    match result {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "failed to parse resx document");
            Vec::new()
        }
    }
}

/// Parses the text between the last `</resheader>` line and `</root>`.
pub fn parse_segment(segment: &str) -> Result<Vec<Entry>, Error> {
    let mut reader = Reader::from_str(segment);
    reader.config_mut().trim_text(false);

    let mut entries = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == DATA => {
                let mut entry = parse_data_attributes(e)?;
                parse_data_children(&mut entry, &mut reader)?;
                entries.push(entry);
            }
            Event::Empty(ref e) if e.name().as_ref() == DATA => {
                entries.push(parse_data_attributes(e)?);
            }
            Event::Start(e) | Event::Empty(e) => {
                return Err(Error::invalid_resource(format!(
                    "unexpected element <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Text(e) => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(Error::invalid_resource(format!(
                        "unexpected text between entries: {:?}",
                        String::from_utf8_lossy(&e)
                    )));
                }
            }
            Event::End(e) => {
                return Err(Error::invalid_resource(format!(
                    "unexpected closing tag </{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Comment(_) => {
                return Err(Error::invalid_resource(
                    "XML comment between entries cannot be kept on save",
                ));
            }
            Event::PI(_) => {
                return Err(Error::invalid_resource(
                    "processing instruction between entries cannot be kept on save",
                ));
            }
            Event::Eof => break,
            _ => {
                return Err(Error::invalid_resource(
                    "unexpected markup between entries",
                ));
            }
        }
    }
    Ok(entries)
}

fn parse_data_attributes(e: &BytesStart) -> Result<Entry, Error> {
    let mut name = None;
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::invalid_resource(e.to_string()))?;
        match attr.key.as_ref() {
            NAME_ATTR => name = Some(attr.unescape_value()?.to_string()),
            // written back on every build
            XML_SPACE_ATTR => {}
            key => attributes.push((
                String::from_utf8_lossy(key).to_string(),
                attr.unescape_value()?.to_string(),
            )),
        }
    }
    let name = name.ok_or_else(|| Error::invalid_resource("data tag missing 'name'"))?;

    Ok(Entry {
        name,
        value: String::new(),
        comment: None,
        attributes,
    })
}

fn parse_data_children(entry: &mut Entry, reader: &mut Reader<&[u8]>) -> Result<(), Error> {
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == VALUE => {
                entry.value = read_text(reader)?;
            }
            Event::Empty(ref e) if e.name().as_ref() == VALUE => {
                entry.value = String::new();
            }
            Event::Start(ref e) if e.name().as_ref() == COMMENT => {
                let comment = read_text(reader)?;
                entry.comment = Some(comment).filter(|c| !c.is_empty());
            }
            Event::Empty(ref e) if e.name().as_ref() == COMMENT => {
                entry.comment = None;
            }
            Event::Start(e) | Event::Empty(e) => {
                return Err(Error::invalid_resource(format!(
                    "unexpected element <{}> in data '{}'",
                    String::from_utf8_lossy(e.name().as_ref()),
                    entry.name
                )));
            }
            Event::Text(e) => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(Error::invalid_resource(format!(
                        "unexpected text in data '{}'",
                        entry.name
                    )));
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(Error::invalid_resource(format!(
                    "unexpected end of input in data '{}'",
                    entry.name
                )));
            }
            _ => {}
        }
    }
}

/// Reads the text content of the current element up to its closing tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, Error> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => {
                let raw = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| Error::Encoding(e.to_string()))?;
                text.push_str(&raw);
            }
            Event::End(_) => return Ok(text),
            Event::Start(e) | Event::Empty(e) => {
                return Err(Error::invalid_resource(format!(
                    "unexpected element <{}> inside text",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Eof => return Err(Error::invalid_resource("unexpected end of input")),
            _ => {}
        }
    }
}
