//! The canned sample diagram.
//!
//! A small approval process: a start event, a review task, an exclusive
//! gateway and two outcomes, one through a second task. It is what an XML
//! import loads and what `procanvas sample` writes.

use procanvas_core::{
    geometry::Point,
    model::{Connection, ConnectionKind, DiagramElement, ElementKind},
};

use crate::store::Snapshot;

/// Builds the sample diagram.
///
/// # Examples
///
/// ```
/// # use procanvas::{sample::sample_diagram, validate::validate};
/// let diagram = sample_diagram();
/// assert_eq!(diagram.elements.len(), 6);
/// assert!(validate(&diagram).is_empty());
/// ```
pub fn sample_diagram() -> Snapshot {
    let element = |id: &str, kind: ElementKind, name: &str, x: f32, y: f32| {
        let mut element = DiagramElement::new(id.into(), kind, Point::new(x, y));
        element.name = name.to_string();
        element
    };
    let flow = |id: &str, source: &str, target: &str, name: Option<&str>| {
        let mut connection = Connection::new(
            id.into(),
            source.into(),
            target.into(),
            ConnectionKind::SequenceFlow,
        );
        connection.name = name.map(str::to_string);
        connection
    };

    Snapshot::new(
        vec![
            element("start_1", ElementKind::StartEvent, "Request received", 100.0, 182.0),
            element("task_1", ElementKind::UserTask, "Review request", 200.0, 160.0),
            element("gateway_1", ElementKind::Gateway, "Approved?", 380.0, 175.0),
            element("task_2", ElementKind::ServiceTask, "Process request", 500.0, 160.0),
            element("end_1", ElementKind::EndEvent, "Done", 680.0, 182.0),
            element("end_2", ElementKind::EndEvent, "Rejected", 387.0, 320.0),
        ],
        vec![
            flow("flow_1", "start_1", "task_1", None),
            flow("flow_2", "task_1", "gateway_1", None),
            flow("flow_3", "gateway_1", "task_2", Some("Yes")),
            flow("flow_4", "task_2", "end_1", None),
            flow("flow_5", "gateway_1", "end_2", Some("No")),
        ],
    )
}
