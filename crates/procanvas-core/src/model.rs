//! Diagram data model.
//!
//! This module provides the plain data types a process diagram is made of:
//!
//! - [`DiagramElement`] - A node placed on the canvas
//! - [`Connection`] - A directed edge between two elements
//! - [`ElementKind`] / [`ConnectionKind`] - The fixed vocabularies for both
//! - [`ElementMetadata`] - Optional properties edited through the properties dialog
//!
//! The types carry no editing behavior. Referential integrity between
//! connections and elements is maintained by the editor when it deletes
//! elements, not by these types.
//!
//! Serialization follows the exported JSON document shape: element kinds are
//! stored under `type` in kebab-case, metadata fields are flattened into the
//! element object in camelCase.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::{ConnectionId, ElementId},
};

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} kind `{name}`")]
pub struct UnknownKindError {
    category: &'static str,
    name: String,
}

/// The kind of a diagram element.
///
/// The kind decides default size, default label, rendering and the tag used
/// by the XML export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    StartEvent,
    IntermediateEvent,
    EndEvent,
    Task,
    UserTask,
    ServiceTask,
    /// Exclusive gateway
    Gateway,
    ParallelGateway,
    InclusiveGateway,
    Subprocess,
    DataObject,
    DataStore,
    Pool,
    Lane,
    TextAnnotation,
}

impl ElementKind {
    /// Every element kind, in palette order.
    pub const ALL: [ElementKind; 15] = [
        Self::StartEvent,
        Self::IntermediateEvent,
        Self::EndEvent,
        Self::Task,
        Self::UserTask,
        Self::ServiceTask,
        Self::Gateway,
        Self::ParallelGateway,
        Self::InclusiveGateway,
        Self::Subprocess,
        Self::DataObject,
        Self::DataStore,
        Self::Pool,
        Self::Lane,
        Self::TextAnnotation,
    ];

    /// Returns the kebab-case name used in serialized diagrams.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartEvent => "start-event",
            Self::IntermediateEvent => "intermediate-event",
            Self::EndEvent => "end-event",
            Self::Task => "task",
            Self::UserTask => "user-task",
            Self::ServiceTask => "service-task",
            Self::Gateway => "gateway",
            Self::ParallelGateway => "parallel-gateway",
            Self::InclusiveGateway => "inclusive-gateway",
            Self::Subprocess => "subprocess",
            Self::DataObject => "data-object",
            Self::DataStore => "data-store",
            Self::Pool => "pool",
            Self::Lane => "lane",
            Self::TextAnnotation => "text-annotation",
        }
    }

    /// Returns the size a freshly placed element of this kind gets.
    pub fn default_size(self) -> Size {
        match self {
            Self::StartEvent | Self::IntermediateEvent | Self::EndEvent => Size::new(36.0, 36.0),
            Self::Task | Self::UserTask | Self::ServiceTask => Size::new(120.0, 80.0),
            Self::Gateway | Self::ParallelGateway | Self::InclusiveGateway => Size::new(50.0, 50.0),
            Self::Subprocess => Size::new(200.0, 120.0),
            Self::DataObject => Size::new(36.0, 50.0),
            Self::DataStore => Size::new(50.0, 50.0),
            Self::Pool => Size::new(600.0, 200.0),
            Self::Lane => Size::new(600.0, 120.0),
            Self::TextAnnotation => Size::new(120.0, 40.0),
        }
    }

    /// Returns the label a freshly placed element of this kind gets.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::StartEvent => "Start",
            Self::IntermediateEvent => "Intermediate Event",
            Self::EndEvent => "End",
            Self::Task => "Task",
            Self::UserTask => "User Task",
            Self::ServiceTask => "Service Task",
            Self::Gateway => "Gateway",
            Self::ParallelGateway => "Parallel Gateway",
            Self::InclusiveGateway => "Inclusive Gateway",
            Self::Subprocess => "Subprocess",
            Self::DataObject => "Data Object",
            Self::DataStore => "Data Store",
            Self::Pool => "Pool",
            Self::Lane => "Lane",
            Self::TextAnnotation => "Annotation",
        }
    }

    /// Returns the BPMN tag name written by the XML export.
    pub fn xml_tag(self) -> &'static str {
        match self {
            Self::StartEvent => "startEvent",
            Self::IntermediateEvent => "intermediateThrowEvent",
            Self::EndEvent => "endEvent",
            Self::Task => "task",
            Self::UserTask => "userTask",
            Self::ServiceTask => "serviceTask",
            Self::Gateway => "exclusiveGateway",
            Self::ParallelGateway => "parallelGateway",
            Self::InclusiveGateway => "inclusiveGateway",
            Self::Subprocess => "subProcess",
            Self::DataObject => "dataObjectReference",
            Self::DataStore => "dataStoreReference",
            Self::Pool => "participant",
            Self::Lane => "lane",
            Self::TextAnnotation => "textAnnotation",
        }
    }

    /// Returns the prefix used when minting ids for this kind.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::StartEvent | Self::IntermediateEvent | Self::EndEvent => "event",
            Self::Task | Self::UserTask | Self::ServiceTask => "task",
            Self::Gateway | Self::ParallelGateway | Self::InclusiveGateway => "gateway",
            Self::Subprocess => "subprocess",
            Self::DataObject | Self::DataStore => "data",
            Self::Pool | Self::Lane => "pool",
            Self::TextAnnotation => "annotation",
        }
    }

    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::StartEvent | Self::IntermediateEvent | Self::EndEvent
        )
    }

    pub fn is_task(self) -> bool {
        matches!(self, Self::Task | Self::UserTask | Self::ServiceTask)
    }

    pub fn is_gateway(self) -> bool {
        matches!(
            self,
            Self::Gateway | Self::ParallelGateway | Self::InclusiveGateway
        )
    }

    /// Pools and lanes: large containers drawn beneath everything else.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Pool | Self::Lane)
    }

    /// Returns true for kinds that take part in the sequence flow.
    pub fn is_flow_node(self) -> bool {
        self.is_event() || self.is_task() || self.is_gateway() || self == Self::Subprocess
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKindError {
                category: "element",
                name: s.to_string(),
            })
    }
}

/// The kind of a connection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    #[default]
    SequenceFlow,
    MessageFlow,
    Association,
    DataAssociation,
}

impl ConnectionKind {
    pub const ALL: [ConnectionKind; 4] = [
        Self::SequenceFlow,
        Self::MessageFlow,
        Self::Association,
        Self::DataAssociation,
    ];

    /// Returns the kebab-case name used in serialized diagrams.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SequenceFlow => "sequence-flow",
            Self::MessageFlow => "message-flow",
            Self::Association => "association",
            Self::DataAssociation => "data-association",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKindError {
                category: "connection",
                name: s.to_string(),
            })
    }
}

/// Optional element properties edited through the properties dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// CSS color string overriding the node fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A node placed on the canvas.
///
/// Position and size are in unscaled diagram coordinates, `x`/`y` being the
/// top-left corner.
///
/// # Examples
///
/// ```
/// use procanvas_core::{geometry::Point, model::{DiagramElement, ElementKind}};
///
/// let task = DiagramElement::new("task_1".into(), ElementKind::Task, Point::new(300.0, 160.0));
/// assert_eq!(task.name, "Task");
/// assert_eq!(task.width, 120.0);
/// assert_eq!(task.bounds().center(), Point::new(360.0, 200.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(flatten)]
    pub metadata: ElementMetadata,
}

impl DiagramElement {
    /// Creates an element of `kind` at `position` with the kind's default size and name.
    pub fn new(id: ElementId, kind: ElementKind, position: Point) -> Self {
        let size = kind.default_size();
        Self {
            id,
            kind,
            name: kind.default_name().to_string(),
            x: position.x(),
            y: position.y(),
            width: size.width(),
            height: size.height(),
            metadata: ElementMetadata::default(),
        }
    }

    /// Returns the top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position(), self.size())
    }

    /// Moves the top-left corner to `position`.
    pub fn set_position(&mut self, position: Point) {
        self.x = position.x();
        self.y = position.y();
    }
}

/// A directed edge between two elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: ElementId,
    pub target: ElementId,
    #[serde(rename = "type", default)]
    pub kind: ConnectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Manual routing points between source and target, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Point>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        source: ElementId,
        target: ElementId,
        kind: ConnectionKind,
    ) -> Self {
        Self {
            id,
            source,
            target,
            kind,
            name: None,
            waypoints: Vec::new(),
        }
    }

    /// Returns true if either endpoint is `element`.
    pub fn references(&self, element: &ElementId) -> bool {
        self.source == *element || self.target == *element
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_round_trips_through_str() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>(), Ok(kind));
        }
        assert!("swimlane".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_connection_kind_from_str() {
        assert_eq!(
            "message-flow".parse::<ConnectionKind>(),
            Ok(ConnectionKind::MessageFlow)
        );
        let err = "wire".parse::<ConnectionKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown connection kind `wire`");
    }

    #[test]
    fn test_kind_categories() {
        assert!(ElementKind::EndEvent.is_event());
        assert!(ElementKind::ServiceTask.is_task());
        assert!(ElementKind::InclusiveGateway.is_gateway());
        assert!(ElementKind::Lane.is_container());
        assert!(ElementKind::Subprocess.is_flow_node());
        assert!(!ElementKind::DataStore.is_flow_node());
        assert!(!ElementKind::TextAnnotation.is_flow_node());
    }

    #[test]
    fn test_default_sizes_vary_by_kind() {
        assert_eq!(ElementKind::StartEvent.default_size(), Size::new(36.0, 36.0));
        assert_eq!(ElementKind::Task.default_size(), Size::new(120.0, 80.0));
        assert_eq!(ElementKind::Gateway.default_size(), Size::new(50.0, 50.0));
        assert_eq!(ElementKind::Pool.default_size(), Size::new(600.0, 200.0));
    }

    #[test]
    fn test_element_serializes_with_flattened_metadata() {
        let mut element =
            DiagramElement::new("task_1".into(), ElementKind::UserTask, Point::new(10.0, 20.0));
        element.metadata.due_date = Some("2026-11-01".to_string());

        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "user-task");
        assert_eq!(value["dueDate"], "2026-11-01");
        assert!(value.get("assignee").is_none());
        assert!(value.get("metadata").is_none());

        let back: DiagramElement = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_connection_defaults_when_deserializing() {
        let connection: Connection =
            serde_json::from_str(r#"{"id":"flow_1","source":"a","target":"b"}"#).unwrap();
        assert_eq!(connection.kind, ConnectionKind::SequenceFlow);
        assert!(connection.name.is_none());
        assert!(connection.waypoints.is_empty());
        assert!(connection.references(&ElementId::new("b")));
        assert!(!connection.is_self_loop());
    }
}
