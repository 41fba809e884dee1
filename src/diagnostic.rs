//! Validation diagnostics
//!
//! Every violation found during a pass is delivered as a [`Diagnostic`]
//! to a [`DiagnosticSink`]. Diagnostics never abort the pass; sibling
//! fields are still checked after a failure.

use std::fmt;

use serde::Serialize;

use crate::schema::SchemaNode;

/// Category of a validation violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Validation target or schema root did not resolve to an object
    StructuralMismatch,
    /// A schema node is unusable (e.g. a nameless nominal class)
    MalformedConstraint,
    /// A required field was null or undefined
    MissingRequired,
    /// The value's resolved tag differed from the expected tag
    TypeMismatch,
    /// The value was not SameValue-equal to any allowed literal
    NotOneOf,
    /// The value satisfied none of a union's alternatives
    NoMatchingAlternative,
    /// The value did not conform to the expected nominal class
    NominalMismatch,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::StructuralMismatch => write!(f, "structural_mismatch"),
            DiagnosticKind::MalformedConstraint => write!(f, "malformed_constraint"),
            DiagnosticKind::MissingRequired => write!(f, "missing_required"),
            DiagnosticKind::TypeMismatch => write!(f, "type_mismatch"),
            DiagnosticKind::NotOneOf => write!(f, "not_one_of"),
            DiagnosticKind::NoMatchingAlternative => write!(f, "no_matching_alternative"),
            DiagnosticKind::NominalMismatch => write!(f, "nominal_mismatch"),
        }
    }
}

/// A single validation violation
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Caller-supplied tag naming the validation site
    pub tag_name: String,
    /// Dotted path to the affected field (e.g. `server.ports[1]`)
    pub field_path: String,
    /// Category of the violation
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
    /// Expected type or value set, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Observed type or value, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// The constraint node the value was checked against
    #[serde(skip)]
    pub constraint: Option<SchemaNode>,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(
        kind: DiagnosticKind,
        tag_name: impl Into<String>,
        field_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            field_path: field_path.into(),
            kind,
            message: message.into(),
            expected: None,
            actual: None,
            constraint: None,
        }
    }

    /// Set the expected type or value set
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Set the observed type or value
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    /// Attach the constraint node that was violated
    pub fn with_constraint(mut self, node: SchemaNode) -> Self {
        self.constraint = Some(node);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at '{}': {}",
            self.kind, self.tag_name, self.field_path, self.message
        )
    }
}

/// Receiver for diagnostics, invoked once per violation
pub trait DiagnosticSink {
    /// Deliver one violation; the pass continues regardless
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Adapter turning a closure into a sink
pub struct SinkFn<F: FnMut(Diagnostic)>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for SinkFn<F> {
    fn report(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic);
    }
}

/// Sink that discards everything; used for trial runs
pub(crate) struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// True when the pass produced no diagnostics
    pub valid: bool,
    /// Every violation found, in traversal order
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Build a result from collected diagnostics
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            valid: diagnostics.is_empty(),
            diagnostics,
        }
    }

    /// Diagnostics of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind == kind).collect()
    }
}
