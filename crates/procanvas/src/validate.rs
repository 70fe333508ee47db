//! Ad-hoc diagram checks.
//!
//! These are lint-style rules, not BPMN schema validation. The editor never
//! runs them on its own; the CLI `validate` command reports them.

use std::{collections::HashSet, fmt};

use serde::Serialize;

use procanvas_core::model::{ConnectionKind, ElementKind};

use crate::{ProcanvasError, store::Snapshot};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// The rule an issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingStartEvent,
    MissingEndEvent,
    DanglingConnection,
    SelfConnection,
    NoIncomingFlow,
    NoOutgoingFlow,
    IncomingToStartEvent,
    OutgoingFromEndEvent,
    DuplicateElementId,
    DuplicateConnectionId,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::MissingEndEvent | Self::NoIncomingFlow | Self::NoOutgoingFlow => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// One finding, optionally about a specific element or connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Id of the element or connection concerned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: IssueKind, subject: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            subject: subject.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Returns true if any issue is an error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues
        .iter()
        .any(|issue| issue.severity == Severity::Error)
}

/// Validates a diagram and rejects it if any issue is an error.
///
/// Warnings alone do not reject the diagram; they are returned so the caller
/// can report them.
///
/// # Errors
///
/// Returns [`ProcanvasError::Invalid`] holding every issue, warnings
/// included, when at least one error is found.
pub fn check(snapshot: &Snapshot) -> Result<Vec<ValidationIssue>, ProcanvasError> {
    let issues = validate(snapshot);
    if has_errors(&issues) {
        return Err(ProcanvasError::Invalid(issues));
    }
    Ok(issues)
}

/// Checks a diagram and returns every issue found, errors first.
///
/// An empty diagram has no issues. Only sequence flows count as incoming or
/// outgoing flow.
pub fn validate(snapshot: &Snapshot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for element in &snapshot.elements {
        if !seen.insert(element.id.as_str()) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateElementId,
                Some(element.id.as_str()),
                format!("element id `{}` is used more than once", element.id),
            ));
        }
    }
    let element_ids = seen;

    let mut seen = HashSet::new();
    for connection in &snapshot.connections {
        if !seen.insert(connection.id.as_str()) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateConnectionId,
                Some(connection.id.as_str()),
                format!("connection id `{}` is used more than once", connection.id),
            ));
        }
    }

    // Any kind of link connects a node; only sequence flows give it direction.
    let mut linked_in: HashSet<&str> = HashSet::new();
    let mut linked_out: HashSet<&str> = HashSet::new();
    let mut flow_in: HashSet<&str> = HashSet::new();
    let mut flow_out: HashSet<&str> = HashSet::new();
    for connection in &snapshot.connections {
        let id = connection.id.as_str();
        for endpoint in [&connection.source, &connection.target] {
            if !element_ids.contains(endpoint.as_str()) {
                issues.push(ValidationIssue::new(
                    IssueKind::DanglingConnection,
                    Some(id),
                    format!("connection `{id}` references missing element `{endpoint}`"),
                ));
            }
        }
        if connection.is_self_loop() {
            issues.push(ValidationIssue::new(
                IssueKind::SelfConnection,
                Some(id),
                format!("connection `{id}` connects `{}` to itself", connection.source),
            ));
        }
        linked_out.insert(connection.source.as_str());
        linked_in.insert(connection.target.as_str());
        if connection.kind == ConnectionKind::SequenceFlow {
            flow_out.insert(connection.source.as_str());
            flow_in.insert(connection.target.as_str());
        }
    }

    let flow_nodes: Vec<_> = snapshot
        .elements
        .iter()
        .filter(|element| element.kind.is_flow_node())
        .collect();
    if !flow_nodes.is_empty() {
        if !flow_nodes.iter().any(|e| e.kind == ElementKind::StartEvent) {
            issues.push(ValidationIssue::new(
                IssueKind::MissingStartEvent,
                None,
                "process has no start event",
            ));
        }
        if !flow_nodes.iter().any(|e| e.kind == ElementKind::EndEvent) {
            issues.push(ValidationIssue::new(
                IssueKind::MissingEndEvent,
                None,
                "process has no end event",
            ));
        }
    }

    for element in flow_nodes {
        let id = element.id.as_str();
        let label = if element.name.is_empty() { id } else { element.name.as_str() };

        match element.kind {
            ElementKind::StartEvent => {
                if flow_in.contains(id) {
                    issues.push(ValidationIssue::new(
                        IssueKind::IncomingToStartEvent,
                        Some(id),
                        format!("start event `{label}` has an incoming sequence flow"),
                    ));
                }
            }
            ElementKind::EndEvent => {
                if flow_out.contains(id) {
                    issues.push(ValidationIssue::new(
                        IssueKind::OutgoingFromEndEvent,
                        Some(id),
                        format!("end event `{label}` has an outgoing sequence flow"),
                    ));
                }
            }
            _ => {}
        }

        if !linked_in.contains(id) && element.kind != ElementKind::StartEvent {
            issues.push(ValidationIssue::new(
                IssueKind::NoIncomingFlow,
                Some(id),
                format!("{} `{label}` has no incoming connection", element.kind),
            ));
        }
        if !linked_out.contains(id) && element.kind != ElementKind::EndEvent {
            issues.push(ValidationIssue::new(
                IssueKind::NoOutgoingFlow,
                Some(id),
                format!("{} `{label}` has no outgoing connection", element.kind),
            ));
        }
    }

    // Stable: keeps discovery order within a severity.
    issues.sort_by_key(|issue| std::cmp::Reverse(issue.severity));
    issues
}
