//! Simplified BPMN XML.
//!
//! The export is a flat listing, not a schema-valid BPMN document: every
//! element becomes one self-closing tag and every connection a
//! `sequenceFlow`, all inside a single process. Geometry is not written.

use log::{debug, info};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};

use crate::{
    error::{ExportError, ImportError},
    sample,
    store::Snapshot,
};

const BPMN_NAMESPACE: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
const PROCESS_ID: &str = "Process_1";
const XML_DECLARATION: &str = "<?xml";

/// Writes the simplified XML listing of a diagram.
///
/// # Errors
///
/// Returns [`ExportError::Xml`] if the writer fails.
///
/// # Examples
///
/// ```
/// # use procanvas::{export::to_xml, store::Snapshot};
/// let xml = to_xml(&Snapshot::default()).unwrap();
/// assert!(xml.starts_with("<?xml"));
/// assert!(xml.contains(r#"<process id="Process_1" isExecutable="false">"#));
/// ```
pub fn to_xml(snapshot: &Snapshot) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("definitions").with_attributes([
            ("xmlns", BPMN_NAMESPACE),
            ("id", "Definitions_1"),
            ("targetNamespace", "http://bpmn.io/schema/bpmn"),
        ])),
    )?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("process").with_attributes([
            ("id", PROCESS_ID),
            ("isExecutable", "false"),
        ])),
    )?;

    for element in &snapshot.elements {
        let tag = BytesStart::new(element.kind.xml_tag()).with_attributes([
            ("id", element.id.as_str()),
            ("name", element.name.as_str()),
        ]);
        write(&mut writer, Event::Empty(tag))?;
    }

    for connection in &snapshot.connections {
        let mut tag = BytesStart::new("sequenceFlow").with_attributes([
            ("id", connection.id.as_str()),
            ("sourceRef", connection.source.as_str()),
            ("targetRef", connection.target.as_str()),
        ]);
        if let Some(name) = &connection.name {
            tag.push_attribute(("name", name.as_str()));
        }
        write(&mut writer, Event::Empty(tag))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("process")))?;
    write(&mut writer, Event::End(BytesEnd::new("definitions")))?;

    let xml = String::from_utf8(writer.into_inner())
        .map_err(|err| ExportError::Xml(err.to_string()))?;
    debug!(
        elements = snapshot.elements.len(),
        connections = snapshot.connections.len(),
        bytes = xml.len();
        "Wrote XML diagram"
    );
    Ok(xml)
}

/// Imports an XML diagram.
///
/// The text is not parsed. Input that starts with an XML declaration loads
/// the sample diagram; anything else is rejected.
///
/// # Errors
///
/// Returns [`ImportError::NotXml`] if the trimmed text does not start with
/// `<?xml`.
pub fn from_xml(text: &str) -> Result<Snapshot, ImportError> {
    if !text.trim_start().starts_with(XML_DECLARATION) {
        return Err(ImportError::NotXml);
    }
    info!("XML import loads the sample diagram");
    Ok(sample::sample_diagram())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|err| ExportError::Xml(err.to_string()))
}

#[cfg(test)]
mod tests {
    use procanvas_core::{
        geometry::Point,
        model::{Connection, ConnectionKind, DiagramElement, ElementKind},
    };

    use super::*;

    fn snapshot() -> Snapshot {
        let mut approve = DiagramElement::new("gateway_2".into(), ElementKind::Gateway, Point::default());
        approve.name = "Approved & signed?".to_string();
        let mut flow = Connection::new(
            "flow_3".into(),
            "event_1".into(),
            "gateway_2".into(),
            ConnectionKind::SequenceFlow,
        );
        flow.name = Some("yes".to_string());
        Snapshot::new(
            vec![
                DiagramElement::new("event_1".into(), ElementKind::StartEvent, Point::default()),
                approve,
            ],
            vec![flow],
        )
    }

    #[test]
    fn test_writes_elements_and_flows() {
        let xml = to_xml(&snapshot()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<process id="Process_1" isExecutable="false">"#));
        assert!(xml.contains(r#"<startEvent id="event_1" name="Start"/>"#));
        assert!(xml.contains(
            r#"<sequenceFlow id="flow_3" sourceRef="event_1" targetRef="gateway_2" name="yes"/>"#
        ));
        assert!(xml.trim_end().ends_with("</definitions>"));
    }

    #[test]
    fn test_escapes_attribute_values() {
        let xml = to_xml(&snapshot()).unwrap();
        assert!(xml.contains(r#"name="Approved &amp; signed?""#));
    }

    #[test]
    fn test_import_requires_declaration() {
        assert!(matches!(from_xml("<definitions/>"), Err(ImportError::NotXml)));
        assert!(matches!(from_xml(""), Err(ImportError::NotXml)));

        let loaded = from_xml("  <?xml version=\"1.0\"?>\n<definitions/>").unwrap();
        assert_eq!(loaded, sample::sample_diagram());
    }
}
