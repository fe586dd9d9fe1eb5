use crate::{Error, Result};
use log::info;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::fs;
use std::mem;
use std::path::Path;

/// Name of the parameter descriptor at the root of an extracted package.
pub const PARAMETERS_FILE_NAME: &str = "parameters.xml";
/// `parameterEntry` kind that is dropped once `Web.config` is specialised.
pub const XML_FILE_KIND: &str = "XmlFile";

const PARAMETER: &[u8] = b"parameter";
const PARAMETER_ENTRY: &[u8] = b"parameterEntry";

/// Remove every `XmlFile` parameter from the descriptor at `path`, rewriting
/// it in place.
///
/// Returns the names of the removed parameters in document order. A missing
/// or malformed file is a [`Error::ParseError`].
pub fn prune_parameters(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::ParseError(format!("{}: {}", path.display(), e)))?;

    let (document, removed) = prune_document(&text)?;
    for name in &removed {
        info!("removing msdeploy package parameter: {}", name);
    }

    fs::write(path, document)?;
    Ok(removed)
}

/// Drop `parameter` elements whose direct `parameterEntry` child has
/// `kind="XmlFile"`, together with the whitespace run in front of them.
///
/// Everything else is written back byte for byte.
pub fn prune_document(text: &str) -> Result<(Vec<u8>, Vec<String>)> {
    let mut reader = Reader::from_str(text);
    let mut writer = Writer::new(Vec::with_capacity(text.len()));
    let mut removed = Vec::new();

    let mut whitespace: Vec<Event> = Vec::new();
    let mut parameter: Option<PendingParameter> = None;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| parse_error(reader.buffer_position(), e))?;

        match &event {
            Event::Eof => break,
            Event::Start(_) => {
                depth += 1;
                seen_root = true;
            }
            Event::Empty(_) => seen_root = true,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }

        if let Some(pending) = parameter.as_mut() {
            pending.push(event)?;
            if pending.is_closed() {
                if let Some(pending) = parameter.take() {
                    if pending.xml_file {
                        removed.push(pending.name.unwrap_or_default());
                    } else {
                        write_all(&mut writer, pending.events)?;
                    }
                }
            }
            continue;
        }

        match classify(&event) {
            Classified::Whitespace => whitespace.push(event),
            Classified::ParameterStart => {
                let leading = mem::take(&mut whitespace);
                parameter = Some(PendingParameter::open(leading, event)?);
            }
            Classified::Other => {
                write_all(&mut writer, mem::take(&mut whitespace))?;
                write_event(&mut writer, event)?;
            }
        }
    }

    if parameter.is_some() || depth != 0 {
        return Err(Error::ParseError("unexpected end of document".to_string()));
    }
    if !seen_root {
        return Err(Error::ParseError("document has no root element".to_string()));
    }

    write_all(&mut writer, whitespace)?;
    Ok((writer.into_inner(), removed))
}

enum Classified {
    Whitespace,
    ParameterStart,
    Other,
}

fn classify(event: &Event) -> Classified {
    match event {
        Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => Classified::Whitespace,
        Event::Start(start) if start.name().as_ref() == PARAMETER => Classified::ParameterStart,
        _ => Classified::Other,
    }
}

/// A buffered `parameter` element awaiting its closing tag.
struct PendingParameter<'a> {
    events: Vec<Event<'a>>,
    name: Option<String>,
    depth: usize,
    xml_file: bool,
}

impl<'a> PendingParameter<'a> {
    fn open(leading: Vec<Event<'a>>, start: Event<'a>) -> Result<Self> {
        let name = match &start {
            Event::Start(start) => attribute(start, "name")?,
            _ => None,
        };
        let mut events = leading;
        events.push(start);
        Ok(Self {
            events,
            name,
            depth: 1,
            xml_file: false,
        })
    }

    fn push(&mut self, event: Event<'a>) -> Result<()> {
        match &event {
            Event::Start(start) => {
                if self.depth == 1 && is_xml_file_entry(start)? {
                    self.xml_file = true;
                }
                self.depth += 1;
            }
            Event::Empty(start) => {
                if self.depth == 1 && is_xml_file_entry(start)? {
                    self.xml_file = true;
                }
            }
            Event::End(_) => self.depth -= 1,
            _ => {}
        }
        self.events.push(event);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.depth == 0
    }
}

fn is_xml_file_entry(start: &BytesStart) -> Result<bool> {
    if start.name().as_ref() != PARAMETER_ENTRY {
        return Ok(false);
    }
    Ok(attribute(start, "kind")?.as_deref() == Some(XML_FILE_KIND))
}

fn attribute(start: &BytesStart, name: &str) -> Result<Option<String>> {
    let Some(attr) = start.try_get_attribute(name).map_err(xml_error)? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(xml_error)?;
    Ok(Some(value.into_owned()))
}

fn write_all<'a>(writer: &mut Writer<Vec<u8>>, events: Vec<Event<'a>>) -> Result<()> {
    for event in events {
        write_event(writer, event)?;
    }
    Ok(())
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    writer.write_event(event).map_err(xml_error)?;
    Ok(())
}

fn parse_error(position: impl Display, err: impl Display) -> Error {
    Error::ParseError(format!("at byte {}: {}", position, err))
}

fn xml_error(err: impl Display) -> Error {
    Error::ParseError(err.to_string())
}
