// SPDX-License-Identifier: MIT

//! Response XML building. Responses always echo the request's `ID`
//! attribute with a `Status`; `READ` additionally nests the watch
//! resource tree.

use fbrt_core::{Value, WatchSample};
use quick_xml::events::{BytesEnd, BytesStart, Event as XmlEvent};
use quick_xml::writer::Writer;
use std::io::Cursor;

/// One watched port's drained samples, keyed by FB for grouping.
#[derive(Debug, Clone)]
pub struct WatchPortSamples {
    pub port_name: String,
    pub samples: Vec<(u64, WatchSample)>,
}

#[derive(Debug, Clone)]
pub struct WatchGroup {
    pub fb_name: String,
    pub ports: Vec<WatchPortSamples>,
}

/// Builds a bare status response: `<Response ID="..." Status="OK"/>` or,
/// on failure, `<Response ID="..." Status="FAIL" Message="..."/>`.
pub fn build_status_response(id: &str, failure: Option<&str>) -> String {
    match failure {
        None => format!(r#"<Response ID="{id}" Status="OK"/>"#),
        Some(message) => format!(
            r#"<Response ID="{id}" Status="FAIL" Message="{}"/>"#,
            escape_attr(message)
        ),
    }
}

/// Builds the `READ`/`Watches` response: the status element nesting a
/// `<Resource>` tree with one `<FB>` per non-empty group — empty FB
/// groups are omitted.
pub fn build_read_response(id: &str, config_id: &str, groups: &[WatchGroup]) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut response_start = BytesStart::new("Response");
    response_start.push_attribute(("ID", id));
    response_start.push_attribute(("Status", "OK"));
    writer.write_event(XmlEvent::Start(response_start)).ok();

    let mut resource_start = BytesStart::new("Resource");
    resource_start.push_attribute(("Name", config_id));
    writer.write_event(XmlEvent::Start(resource_start)).ok();

    for group in groups {
        if group.ports.iter().all(|p| p.samples.is_empty()) {
            continue;
        }
        let mut fb_start = BytesStart::new("FB");
        fb_start.push_attribute(("Name", group.fb_name.as_str()));
        writer.write_event(XmlEvent::Start(fb_start)).ok();

        for port in &group.ports {
            if port.samples.is_empty() {
                continue;
            }
            let mut port_start = BytesStart::new("Port");
            port_start.push_attribute(("Name", port.port_name.as_str()));
            writer.write_event(XmlEvent::Start(port_start)).ok();

            for (timestamp, sample) in &port.samples {
                let mut sample_start = BytesStart::new("Sample");
                let time_str = timestamp.to_string();
                sample_start.push_attribute(("Time", time_str.as_str()));
                sample_start.push_attribute(("Value", format_sample(sample).as_str()));
                writer.write_event(XmlEvent::Empty(sample_start)).ok();
            }

            writer
                .write_event(XmlEvent::End(BytesEnd::new("Port")))
                .ok();
        }

        writer.write_event(XmlEvent::End(BytesEnd::new("FB"))).ok();
    }

    writer
        .write_event(XmlEvent::End(BytesEnd::new("Resource")))
        .ok();
    writer
        .write_event(XmlEvent::End(BytesEnd::new("Response")))
        .ok();

    String::from_utf8(writer.into_inner().into_inner()).unwrap_or_default()
}

fn format_sample(sample: &WatchSample) -> String {
    match sample {
        WatchSample::Event(counter) => counter.to_string(),
        WatchSample::Var(value) => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Unset => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Real(n) => n.to_string(),
        Value::LReal(n) => n.to_string(),
        Value::Str(s) => s.clone(),
        Value::DateAndTime(dt) => dt.to_rfc3339(),
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
