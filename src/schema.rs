//! Schema nodes and checker factories
//!
//! A [`SchemaNode`] describes the permitted type for one field plus an
//! optional default and a required flag. The constraint itself is a
//! closed sum type, so enum lists, union lists, per-field dispatch
//! tables, and direct constraints are distinct variants rather than
//! shapes that have to be probed at validation time.
//!
//! Nodes are built through the [`checkers`] factories and the fluent
//! [`with_default`](SchemaNode::with_default) /
//! [`required`](SchemaNode::required) builders, then consumed
//! read-only by the validation engine. A schema tree must be acyclic;
//! `Box`/owned children make cycles unrepresentable.

use std::collections::BTreeMap;

use crate::tag::TypeTag;
use crate::value::{ClassRef, Key, Value};

/// The constraint carried by a schema node
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Matches anything; never produces a violation
    Any,
    /// The value's resolved tag must equal this tag
    Primitive(TypeTag),
    /// An array whose every element satisfies the inner node
    ArrayOf(Box<SchemaNode>),
    /// The value must conform to this nominal class
    InstanceOf(ClassRef),
    /// The value must be SameValue-equal to one of these literals
    Enum(Vec<Value>),
    /// The value must satisfy at least one alternative
    Union(Vec<SchemaNode>),
    /// An object whose fields satisfy the mapped nodes
    Shape(BTreeMap<Key, SchemaNode>),
}

/// One field constraint: a type, an optional default, a required flag
#[derive(Debug, Clone)]
pub struct SchemaNode {
    constraint: Constraint,
    default: Option<Value>,
    required: bool,
}

impl SchemaNode {
    /// Wrap a constraint in a node with no default, not required
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            default: None,
            required: false,
        }
    }

    /// The constraint this node enforces
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Default injected when the field is absent
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a null/undefined value is a violation
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Set the default injected when the field is absent
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Human-readable name of the expected type, for diagnostics
    pub(crate) fn expected_name(&self) -> String {
        match &self.constraint {
            Constraint::Any => "Any".to_string(),
            Constraint::Primitive(tag) => tag.to_string(),
            Constraint::ArrayOf(_) => TypeTag::Array.to_string(),
            Constraint::Shape(_) => TypeTag::Object.to_string(),
            Constraint::InstanceOf(class) => class.name().to_string(),
            Constraint::Enum(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("one of [{}]", rendered.join(", "))
            }
            Constraint::Union(alternatives) => {
                let rendered: Vec<String> =
                    alternatives.iter().map(|n| n.expected_name()).collect();
                format!("one of type [{}]", rendered.join(" | "))
            }
        }
    }
}

/// Checker factories
///
/// Each factory returns a [`SchemaNode`]; the fallible ones report
/// malformed arguments as [`SchemaError`](crate::SchemaError) values
/// and yield no node.
pub mod checkers {
    use super::*;
    use crate::error::{Result, SchemaError};

    /// A node matching exactly `tag`
    pub fn primitive(tag: TypeTag) -> SchemaNode {
        SchemaNode::new(Constraint::Primitive(tag))
    }

    /// Matches any value
    pub fn any() -> SchemaNode {
        SchemaNode::new(Constraint::Any)
    }

    /// Matches arrays (elements unconstrained)
    pub fn array() -> SchemaNode {
        primitive(TypeTag::Array)
    }

    /// Matches booleans
    pub fn bool() -> SchemaNode {
        primitive(TypeTag::Boolean)
    }

    /// Matches callable handles
    pub fn func() -> SchemaNode {
        primitive(TypeTag::Function)
    }

    /// Matches numbers (NaN resolves to its own tag and does not match)
    pub fn number() -> SchemaNode {
        primitive(TypeTag::Number)
    }

    /// Matches objects (fields unconstrained)
    pub fn object() -> SchemaNode {
        primitive(TypeTag::Object)
    }

    /// Matches strings
    pub fn string() -> SchemaNode {
        primitive(TypeTag::String)
    }

    /// Matches unique symbols
    pub fn unique_symbol() -> SchemaNode {
        primitive(TypeTag::UniqueSymbol)
    }

    /// An array whose every element satisfies `element`
    pub fn array_of(element: SchemaNode) -> SchemaNode {
        SchemaNode::new(Constraint::ArrayOf(Box::new(element)))
    }

    /// A value conforming to the nominal class `class`
    ///
    /// Fails when the class has no discoverable name.
    pub fn instance_of(class: &ClassRef) -> Result<SchemaNode> {
        if class.name().is_empty() {
            return Err(SchemaError::AnonymousClass);
        }
        Ok(SchemaNode::new(Constraint::InstanceOf(class.clone())))
    }

    /// A value SameValue-equal to one of `values`
    ///
    /// Fails on an empty list.
    pub fn one_of(values: Vec<Value>) -> Result<SchemaNode> {
        if values.is_empty() {
            return Err(SchemaError::EmptyEnum);
        }
        Ok(SchemaNode::new(Constraint::Enum(values)))
    }

    /// A value satisfying at least one of `alternatives`
    ///
    /// Fails on an empty list.
    pub fn one_of_type(alternatives: Vec<SchemaNode>) -> Result<SchemaNode> {
        if alternatives.is_empty() {
            return Err(SchemaError::EmptyUnion);
        }
        Ok(SchemaNode::new(Constraint::Union(alternatives)))
    }

    /// An object whose fields satisfy the mapped nodes
    pub fn shape<K, I>(fields: I) -> SchemaNode
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        let map = fields
            .into_iter()
            .map(|(key, node)| (key.into(), node))
            .collect();
        SchemaNode::new(Constraint::Shape(map))
    }

    /// Reserved extension point for homogeneous object maps
    ///
    /// Declared for surface compatibility; always fails and yields no
    /// usable node.
    pub fn object_of(_element: SchemaNode) -> Result<SchemaNode> {
        Err(SchemaError::Reserved("object_of"))
    }
}
