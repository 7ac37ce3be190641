// SPDX-License-Identifier: MIT

//! `.fbt` definition loader.

use crate::error::DefinitionError;
use fbrt_core::{DataType, PortDescriptor, PortKind};
use quick_xml::events::Event as XmlEvent;
use quick_xml::reader::Reader;

/// Parsed interface of an FB type: its four port lists plus the raw XML
/// text, retained unparsed for the (stubbed) OPC-UA collaborator.
#[derive(Debug, Clone)]
pub struct FbDefinition {
    pub input_events: Vec<PortDescriptor>,
    pub output_events: Vec<PortDescriptor>,
    pub input_vars: Vec<PortDescriptor>,
    pub output_vars: Vec<PortDescriptor>,
    raw_xml: String,
}

impl FbDefinition {
    pub fn raw_xml(&self) -> &str {
        &self.raw_xml
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    EventInputs,
    EventOutputs,
    InputVars,
    OutputVars,
}

/// Parse an `.fbt` XML document's `InterfaceList` into port descriptors.
///
/// Coercion rules (non-fatal):
/// - event port types other than `Event` are rewritten to `Event` with a warning.
/// - variable types outside the recognized set are coerced to `String` with a warning.
/// Missing `Name` is the one hard error.
pub fn parse_fbt(xml_text: &str) -> Result<FbDefinition, DefinitionError> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut section = Section::None;
    let mut def = FbDefinition {
        input_events: Vec::new(),
        output_events: Vec::new(),
        input_vars: Vec::new(),
        output_vars: Vec::new(),
        raw_xml: xml_text.to_string(),
    };

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Eof => break,
            XmlEvent::Start(e) | XmlEvent::Empty(e) => {
                let name = e.local_name();
                let tag = std::str::from_utf8(name.as_ref())?;
                match tag {
                    "EventInputs" => section = Section::EventInputs,
                    "EventOutputs" => section = Section::EventOutputs,
                    "InputVars" => section = Section::InputVars,
                    "OutputVars" => section = Section::OutputVars,
                    "Event" if section == Section::EventInputs || section == Section::EventOutputs => {
                        let port = parse_event_port(&e)?;
                        push_port(&mut def, section, port);
                    }
                    "VarDeclaration" if section == Section::InputVars || section == Section::OutputVars => {
                        let port = parse_var_port(&e)?;
                        push_port(&mut def, section, port);
                    }
                    _ => {}
                }
            }
            XmlEvent::End(e) => {
                let tag = std::str::from_utf8(e.local_name().as_ref())?;
                if matches!(
                    tag,
                    "EventInputs" | "EventOutputs" | "InputVars" | "OutputVars"
                ) {
                    section = Section::None;
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(def)
}

fn push_port(def: &mut FbDefinition, section: Section, port: PortDescriptor) {
    match section {
        Section::EventInputs => def.input_events.push(port),
        Section::EventOutputs => def.output_events.push(port),
        Section::InputVars => def.input_vars.push(port),
        Section::OutputVars => def.output_vars.push(port),
        Section::None => {}
    }
}

fn parse_event_port(e: &quick_xml::events::BytesStart) -> Result<PortDescriptor, DefinitionError> {
    let mut name = None;
    let mut declared_type = None;
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.local_name().as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        match key {
            "Name" => name = Some(value),
            "Type" => declared_type = Some(value),
            _ => {}
        }
    }
    let name = name.ok_or(DefinitionError::MissingName)?;
    if let Some(t) = declared_type {
        if t != "Event" {
            tracing::warn!(port = %name, declared = %t, "event port type coerced to Event");
        }
    }
    Ok(PortDescriptor {
        name,
        kind: PortKind::Event,
    })
}

fn parse_var_port(e: &quick_xml::events::BytesStart) -> Result<PortDescriptor, DefinitionError> {
    let mut name = None;
    let mut declared_type = None;
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.local_name().as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        match key {
            "Name" => name = Some(value),
            "Type" => declared_type = Some(value),
            _ => {}
        }
    }
    let name = name.ok_or(DefinitionError::MissingName)?;
    let dtype = match declared_type.as_deref() {
        Some(t) => DataType::from_xml_name(t).unwrap_or_else(|| {
            tracing::warn!(port = %name, declared = %t, "unrecognized variable type coerced to String");
            DataType::String
        }),
        None => DataType::String,
    };
    Ok(PortDescriptor {
        name,
        kind: PortKind::Variable(dtype),
    })
}
