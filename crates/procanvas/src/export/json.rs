//! JSON diagram documents.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use procanvas_core::model::{Connection, DiagramElement};

use crate::{
    error::{ExportError, ImportError},
    store::Snapshot,
};

/// Version written into the metadata block of every export.
pub const FORMAT_VERSION: &str = "1.0";

/// Provenance block of an exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

/// The JSON document shape: `{elements, connections, metadata}`.
///
/// Metadata is optional when reading so hand-written diagrams load too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramDocument {
    #[serde(default)]
    pub elements: Vec<DiagramElement>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExportMetadata>,
}

impl From<DiagramDocument> for Snapshot {
    fn from(document: DiagramDocument) -> Self {
        Snapshot::new(document.elements, document.connections)
    }
}

/// Borrowing twin of [`DiagramDocument`] so exporting does not clone.
#[derive(Serialize)]
struct DocumentRef<'a> {
    elements: &'a [DiagramElement],
    connections: &'a [Connection],
    metadata: ExportMetadata,
}

/// Serializes a diagram, stamped with the current time.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json(snapshot: &Snapshot) -> Result<String, ExportError> {
    to_json_at(snapshot, Utc::now())
}

/// Serializes a diagram with an explicit export timestamp.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json_at(snapshot: &Snapshot, exported_at: DateTime<Utc>) -> Result<String, ExportError> {
    let document = DocumentRef {
        elements: &snapshot.elements,
        connections: &snapshot.connections,
        metadata: ExportMetadata {
            exported_at,
            version: FORMAT_VERSION.to_string(),
        },
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parses a JSON diagram document.
///
/// # Errors
///
/// Returns [`ImportError::Json`] for malformed input or unknown element kinds.
pub fn from_json(text: &str) -> Result<Snapshot, ImportError> {
    let document: DiagramDocument = serde_json::from_str(text)?;
    debug!(
        elements = document.elements.len(),
        connections = document.connections.len(),
        version:? = document.metadata.as_ref().map(|m| m.version.as_str());
        "Parsed JSON diagram"
    );
    Ok(document.into())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use procanvas_core::{
        geometry::Point,
        model::{ConnectionKind, ElementKind},
    };

    use super::*;

    fn snapshot() -> Snapshot {
        let mut task = DiagramElement::new("task_1".into(), ElementKind::Task, Point::new(300.0, 160.0));
        task.metadata.documentation = Some("Checks the order".to_string());
        Snapshot::new(
            vec![
                DiagramElement::new("s1".into(), ElementKind::StartEvent, Point::new(100.0, 150.0)),
                task,
            ],
            vec![Connection::new(
                "flow_1".into(),
                "s1".into(),
                "task_1".into(),
                ConnectionKind::SequenceFlow,
            )],
        )
    }

    #[test]
    fn test_document_shape() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let json = to_json_at(&snapshot(), at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["elements"][0]["type"], "start-event");
        assert_eq!(value["elements"][1]["documentation"], "Checks the order");
        assert_eq!(value["connections"][0]["type"], "sequence-flow");
        assert_eq!(value["metadata"]["version"], "1.0");
        assert_eq!(value["metadata"]["exportedAt"], "2026-10-16T09:30:00Z");
    }

    #[test]
    fn test_round_trip_is_faithful() {
        let original = snapshot();
        let restored = from_json(&to_json(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_metadata_is_optional() {
        let snapshot = from_json(
            r#"{"elements":[{"id":"e1","type":"end-event","x":0,"y":0,"width":36,"height":36}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.elements.len(), 1);
        assert_eq!(snapshot.elements[0].name, "");
        assert!(snapshot.connections.is_empty());
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let err = from_json(
            r#"{"elements":[{"id":"e1","type":"swimlane","x":0,"y":0,"width":1,"height":1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }
}
