//! The recursive validation engine
//!
//! Walks a value and a schema tree in lockstep, depth-first and
//! pre-order. Defaults are injected into the value through the `&mut`
//! parameter; every violation becomes a [`Diagnostic`] delivered to the
//! sink, and traversal always continues past a failed field to its
//! siblings. Validation never panics and never returns an error.

use tracing::{debug, trace, warn};

use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, NullSink, ValidationResult};
use crate::schema::{Constraint, SchemaNode};
use crate::tag::{resolve, TypeTag};
use crate::value::{same_value, Key, ObjectValue, Value};

/// Tag used when the caller does not name the validation site
pub const ANONYMOUS_TAG: &str = "<<anonymous>>";

/// Validation entry point with a tag name and path prefix
#[derive(Debug, Clone)]
pub struct Validator {
    tag_name: String,
    path_prefix: String,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a validator with the anonymous tag and no path prefix
    pub fn new() -> Self {
        Self {
            tag_name: ANONYMOUS_TAG.to_string(),
            path_prefix: String::new(),
        }
    }

    /// Name the validation site in diagnostics
    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Prefix every reported field path
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Validate `data` against a schema tree, collecting diagnostics
    ///
    /// `data` must be an object and `schema` a shape; anything else is
    /// a structural mismatch and the pass stops before traversal.
    /// Missing fields with defaults are filled in through `data`.
    pub fn validate(&self, data: &mut Value, schema: &SchemaNode) -> ValidationResult {
        let mut diagnostics = Vec::new();
        self.validate_with_sink(data, schema, &mut diagnostics);
        ValidationResult::from_diagnostics(diagnostics)
    }

    /// Validate `data`, delivering each violation to `sink` as found
    pub fn validate_with_sink(
        &self,
        data: &mut Value,
        schema: &SchemaNode,
        sink: &mut dyn DiagnosticSink,
    ) {
        trace!(tag_name = %self.tag_name, "starting validation pass");
        self.validate_object(data, schema, &self.path_prefix, sink);
    }

    fn validate_object(
        &self,
        data: &mut Value,
        schema: &SchemaNode,
        path: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let Constraint::Shape(fields) = schema.constraint() else {
            sink.report(
                Diagnostic::new(
                    DiagnosticKind::StructuralMismatch,
                    &self.tag_name,
                    path,
                    "schema node does not describe an object shape",
                )
                .with_expected(TypeTag::Object.to_string())
                .with_actual(schema.expected_name())
                .with_constraint(schema.clone()),
            );
            return false;
        };

        let Value::Object(object) = data else {
            sink.report(
                Diagnostic::new(
                    DiagnosticKind::StructuralMismatch,
                    &self.tag_name,
                    path,
                    format!(
                        "validation target must be an Object, found {}",
                        resolve(data)
                    ),
                )
                .with_expected(TypeTag::Object.to_string())
                .with_actual(resolve(data).to_string())
                .with_constraint(schema.clone()),
            );
            return false;
        };

        let mut ok = true;
        for (key, node) in fields {
            ok &= self.validate_field(key, object, node, path, sink);
        }
        ok
    }

    fn validate_field(
        &self,
        key: &Key,
        object: &mut ObjectValue,
        node: &SchemaNode,
        prefix: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let path = join_path(prefix, &key.to_string());

        // An unusable node skips the field before any side effect
        if let Some(message) = malformed_constraint(node) {
            warn!(field = %path, %message, "skipping field with malformed constraint");
            sink.report(
                Diagnostic::new(
                    DiagnosticKind::MalformedConstraint,
                    &self.tag_name,
                    &path,
                    message,
                )
                .with_constraint(node.clone()),
            );
            return false;
        }

        let missing = matches!(object.get(key), None | Some(Value::Undefined));
        if missing {
            if let Some(default) = node.default_value() {
                debug!(field = %path, default = %default, "injecting default value");
                object.insert(key.clone(), default.clone());
            }
        }

        match object.get_mut(key) {
            Some(value) => self.validate_value(value, node, &path, sink),
            None => {
                if node.is_required() {
                    sink.report(self.required_diagnostic(node, &path, "undefined"));
                    false
                } else {
                    true
                }
            }
        }
    }

    fn validate_value(
        &self,
        value: &mut Value,
        node: &SchemaNode,
        path: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        if value.is_nullish() {
            if node.is_required() {
                let observed = if value.is_null() { "null" } else { "undefined" };
                sink.report(self.required_diagnostic(node, path, observed));
                return false;
            }
            // Absent and not required: nothing further to check
            return true;
        }

        match node.constraint() {
            Constraint::Any => true,
            Constraint::InstanceOf(class) => {
                let conforms = matches!(value, Value::Object(object) if object.conforms_to(class));
                if conforms {
                    return true;
                }
                sink.report(
                    Diagnostic::new(
                        DiagnosticKind::NominalMismatch,
                        &self.tag_name,
                        path,
                        format!("value does not conform to nominal type {}", class.name()),
                    )
                    .with_expected(class.name().to_string())
                    .with_actual(resolve(value).to_string())
                    .with_constraint(node.clone()),
                );
                false
            }
            Constraint::Enum(allowed) => {
                if allowed.iter().any(|candidate| same_value(candidate, value)) {
                    return true;
                }
                sink.report(
                    Diagnostic::new(
                        DiagnosticKind::NotOneOf,
                        &self.tag_name,
                        path,
                        format!("value {} is not {}", value, node.expected_name()),
                    )
                    .with_expected(node.expected_name())
                    .with_actual(value.to_string())
                    .with_constraint(node.clone()),
                );
                false
            }
            Constraint::Union(alternatives) => {
                // Trial runs stay silent; only the overall failure is reported
                let matched = alternatives
                    .iter()
                    .any(|alt| self.validate_value(&mut *value, alt, path, &mut NullSink));
                if matched {
                    return true;
                }
                sink.report(
                    Diagnostic::new(
                        DiagnosticKind::NoMatchingAlternative,
                        &self.tag_name,
                        path,
                        format!("value matches none of {}", node.expected_name()),
                    )
                    .with_expected(node.expected_name())
                    .with_actual(resolve(value).to_string())
                    .with_constraint(node.clone()),
                );
                false
            }
            Constraint::Primitive(tag) => self.check_tag(value, tag, node, path, sink),
            Constraint::ArrayOf(element) => {
                if !self.check_tag(value, &TypeTag::Array, node, path, sink) {
                    return false;
                }
                let Value::Array(items) = value else {
                    return false;
                };
                let mut ok = true;
                for index in 0..items.len() {
                    let element_path = format!("{}[{}]", path, index);
                    if let Some(message) = malformed_constraint(element) {
                        sink.report(
                            Diagnostic::new(
                                DiagnosticKind::MalformedConstraint,
                                &self.tag_name,
                                &element_path,
                                message,
                            )
                            .with_constraint((**element).clone()),
                        );
                        ok = false;
                        continue;
                    }
                    if items[index].is_undefined() {
                        if let Some(default) = element.default_value() {
                            items[index] = default.clone();
                        }
                    }
                    ok &= self.validate_value(&mut items[index], element, &element_path, sink);
                }
                ok
            }
            Constraint::Shape(_) => {
                if !self.check_tag(value, &TypeTag::Object, node, path, sink) {
                    return false;
                }
                self.validate_object(value, node, path, sink)
            }
        }
    }

    fn check_tag(
        &self,
        value: &Value,
        expected: &TypeTag,
        node: &SchemaNode,
        path: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let observed = resolve(value);
        if observed == *expected {
            return true;
        }
        sink.report(
            Diagnostic::new(
                DiagnosticKind::TypeMismatch,
                &self.tag_name,
                path,
                format!("its type is {}, but it should be {}", observed, expected),
            )
            .with_expected(expected.to_string())
            .with_actual(observed.to_string())
            .with_constraint(node.clone()),
        );
        false
    }

    fn required_diagnostic(&self, node: &SchemaNode, path: &str, observed: &str) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::MissingRequired,
            &self.tag_name,
            path,
            format!("it is marked as required, but its value is '{}'", observed),
        )
        .with_actual(observed.to_string())
        .with_constraint(node.clone())
    }
}

/// Validate with the default (anonymous) validator
pub fn validate(data: &mut Value, schema: &SchemaNode) -> ValidationResult {
    Validator::new().validate(data, schema)
}

fn malformed_constraint(node: &SchemaNode) -> Option<String> {
    match node.constraint() {
        Constraint::InstanceOf(class) if class.name().is_empty() => Some(
            "constraint references a nominal type without a discoverable name".to_string(),
        ),
        _ => None,
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else if segment.is_empty() {
        prefix.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
