//! Error adapter for converting ProcanvasError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`ProcanvasError::Invalid`] holds several validation issues, each
//! issue is rendered as its own diagnostic.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity};

use procanvas::{
    ExportError, ImportError, ProcanvasError,
    validate::{IssueKind, Severity, ValidationIssue},
};

/// Adapter for a single validation issue.
pub struct IssueAdapter<'a>(pub &'a ValidationIssue);

impl fmt::Debug for IssueAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IssueAdapter").field(&self.0).finish()
    }
}

impl fmt::Display for IssueAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.message)
    }
}

impl std::error::Error for IssueAdapter<'_> {}

impl MietteDiagnostic for IssueAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(issue_code(self.0.kind)))
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.0.severity {
            Severity::Warning => MietteSeverity::Warning,
            Severity::Error => MietteSeverity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        issue_help(self.0.kind).map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for non-validation [`ProcanvasError`] variants.
pub struct ErrorAdapter<'a>(pub &'a ProcanvasError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ProcanvasError::Io(_) => "procanvas::io",
            ProcanvasError::Import(ImportError::Json(_)) => "procanvas::import::json",
            ProcanvasError::Import(ImportError::NotXml) => "procanvas::import::not_xml",
            ProcanvasError::Export(ExportError::Json(_)) => "procanvas::export::json",
            ProcanvasError::Export(ExportError::Xml(_)) => "procanvas::export::xml",
            ProcanvasError::Config(_) => "procanvas::config",
            ProcanvasError::Invalid(_) => "procanvas::validate",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ProcanvasError::Import(ImportError::Json(_)) => {
                "diagram files hold an `elements` and a `connections` array, see `procanvas sample`"
            }
            ProcanvasError::Import(ImportError::NotXml) => {
                "input that does not start with `{` is read as XML and needs an `<?xml` declaration"
            }
            ProcanvasError::Config(_) => "check the TOML configuration passed with --config",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// One validation issue.
    Issue(IssueAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Issue(i) => fmt::Display::fmt(i, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Issue(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(i) => i.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Issue(i) => i.severity(),
            Reportable::Error(_) => None,
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(i) => i.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

fn issue_code(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::MissingStartEvent => "procanvas::validate::missing_start_event",
        IssueKind::MissingEndEvent => "procanvas::validate::missing_end_event",
        IssueKind::DanglingConnection => "procanvas::validate::dangling_connection",
        IssueKind::SelfConnection => "procanvas::validate::self_connection",
        IssueKind::NoIncomingFlow => "procanvas::validate::no_incoming_flow",
        IssueKind::NoOutgoingFlow => "procanvas::validate::no_outgoing_flow",
        IssueKind::IncomingToStartEvent => "procanvas::validate::incoming_to_start_event",
        IssueKind::OutgoingFromEndEvent => "procanvas::validate::outgoing_from_end_event",
        IssueKind::DuplicateElementId => "procanvas::validate::duplicate_element_id",
        IssueKind::DuplicateConnectionId => "procanvas::validate::duplicate_connection_id",
    }
}

fn issue_help(kind: IssueKind) -> Option<&'static str> {
    match kind {
        IssueKind::MissingStartEvent => Some("add a start event where the process begins"),
        IssueKind::MissingEndEvent => Some("add an end event where the process finishes"),
        IssueKind::DanglingConnection => {
            Some("delete the connection or restore the element it points at")
        }
        IssueKind::IncomingToStartEvent => Some("start events only have outgoing flow"),
        IssueKind::OutgoingFromEndEvent => Some("end events only have incoming flow"),
        IssueKind::DuplicateElementId | IssueKind::DuplicateConnectionId => {
            Some("ids are shared by elements and connections and must be unique")
        }
        _ => None,
    }
}

/// Convert a [`ProcanvasError`] into a list of reportable errors.
///
/// For [`ProcanvasError::Invalid`], this returns one [`Reportable`] per
/// issue. For other error variants, this returns a single [`Reportable`].
pub fn to_reportables(err: &ProcanvasError) -> Vec<Reportable<'_>> {
    match err {
        ProcanvasError::Invalid(issues) => issues
            .iter()
            .map(|issue| Reportable::Issue(IssueAdapter(issue)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use procanvas::{
        model::{Connection, ConnectionKind},
        store::Snapshot,
        validate,
    };

    use super::*;

    #[test]
    fn test_each_issue_is_reported() {
        let snapshot = Snapshot::new(
            Vec::new(),
            vec![Connection::new(
                "flow_1".into(),
                "a".into(),
                "a".into(),
                ConnectionKind::SequenceFlow,
            )],
        );
        let err = validate::check(&snapshot).unwrap_err();
        let ProcanvasError::Invalid(issues) = &err else {
            panic!("expected Invalid, got {err:?}");
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), issues.len());
        assert_eq!(reportables[0].to_string(), issues[0].message);
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()).as_deref(),
            Some("procanvas::validate::dangling_connection")
        );
        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Error));
    }

    #[test]
    fn test_non_validation_error() {
        let err = ProcanvasError::Import(ImportError::NotXml);

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.code().map(|c| c.to_string()).as_deref(),
                    Some("procanvas::import::not_xml")
                );
                assert!(e.help().is_some());
            }
            Reportable::Issue(_) => panic!("Expected Error"),
        }
    }
}
