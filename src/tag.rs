//! Type-tag resolution
//!
//! Classifies any [`Value`] into a canonical semantic type tag. The
//! taxonomy is closed for the value model itself; opaque host objects
//! are classified through a fixed internal-class-tag table and, when
//! that yields nothing, a chain of capability probes (window loop,
//! document node type, callee, indexed collection) before falling back
//! to the raw class tag.
//!
//! Every downstream type comparison goes through [`resolve`], so the
//! tag taxonomy must stay exhaustive and stable.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::value::Value;

/// Node-type discriminator carried by document handles.
pub const DOCUMENT_NODE_TYPE: u32 = 9;

/// Canonical semantic type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    Undefined,
    NaN,
    Null,
    Boolean,
    Number,
    String,
    Function,
    Array,
    Date,
    RegExp,
    UniqueSymbol,
    Object,
    Window,
    Document,
    Arguments,
    NodeList,
    /// Host node name or raw internal class tag with no table entry
    Named(String),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Undefined => write!(f, "Undefined"),
            TypeTag::NaN => write!(f, "NaN"),
            TypeTag::Null => write!(f, "Null"),
            TypeTag::Boolean => write!(f, "Boolean"),
            TypeTag::Number => write!(f, "Number"),
            TypeTag::String => write!(f, "String"),
            TypeTag::Function => write!(f, "Function"),
            TypeTag::Array => write!(f, "Array"),
            TypeTag::Date => write!(f, "Date"),
            TypeTag::RegExp => write!(f, "RegExp"),
            TypeTag::UniqueSymbol => write!(f, "UniqueSymbol"),
            TypeTag::Object => write!(f, "Object"),
            TypeTag::Window => write!(f, "Window"),
            TypeTag::Document => write!(f, "Document"),
            TypeTag::Arguments => write!(f, "Arguments"),
            TypeTag::NodeList => write!(f, "NodeList"),
            TypeTag::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Capability surface of an opaque host object
///
/// Hosts expose whatever probes they support; every method has a
/// conservative default so a minimal handle only needs [`class_tag`].
///
/// [`class_tag`]: HostValue::class_tag
pub trait HostValue: fmt::Debug + Send + Sync {
    /// Engine-level internal class tag, e.g. `HTMLDocument`. A wrapped
    /// form like `[object HTMLDocument]` is accepted and stripped.
    fn class_tag(&self) -> &str;

    /// Host-provided named handle (element/node name)
    fn node_name(&self) -> Option<&str> {
        None
    }

    /// Node-type discriminator; [`DOCUMENT_NODE_TYPE`] marks documents
    fn node_type(&self) -> Option<u32> {
        None
    }

    /// True when the handle's `document` refers back to the handle
    /// itself without being the identical handle (the window loop)
    fn is_window_like(&self) -> bool {
        false
    }

    /// True when the handle exposes a `callee` capability
    fn has_callee(&self) -> bool {
        false
    }

    /// Finite length of an indexed collection with an `item` accessor
    fn item_length(&self) -> Option<usize> {
        None
    }
}

/// Shared handle to a host object
#[derive(Clone)]
pub struct HostHandle(Arc<dyn HostValue>);

impl HostHandle {
    /// Wrap a host object
    pub fn new(host: impl HostValue + 'static) -> Self {
        Self(Arc::new(host))
    }

    /// The internal class tag, stripped of any `[object ...]` wrapping
    pub fn class_tag(&self) -> &str {
        strip_class_tag(self.0.class_tag())
    }

    /// Identity comparison between two handles
    pub fn same_handle(a: &HostHandle, b: &HostHandle) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    fn probe(&self) -> &dyn HostValue {
        self.0.as_ref()
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostHandle").field(&self.class_tag()).finish()
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        HostHandle::same_handle(self, other)
    }
}

fn strip_class_tag(tag: &str) -> &str {
    tag.strip_prefix("[object ")
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(tag)
}

/// Fixed table mapping internal class tags to semantic tags.
fn class_table(tag: &str) -> Option<TypeTag> {
    match tag {
        "Boolean" => Some(TypeTag::Boolean),
        "Number" => Some(TypeTag::Number),
        "String" => Some(TypeTag::String),
        "Function" => Some(TypeTag::Function),
        "Array" => Some(TypeTag::Array),
        "Date" => Some(TypeTag::Date),
        "RegExp" => Some(TypeTag::RegExp),
        "Symbol" => Some(TypeTag::UniqueSymbol),
        "Object" => Some(TypeTag::Object),
        "Arguments" => Some(TypeTag::Arguments),
        "Window" | "DOMWindow" | "global" => Some(TypeTag::Window),
        "Document" | "HTMLDocument" => Some(TypeTag::Document),
        "NodeList" | "HTMLCollection" | "StaticNodeList" | "IXMLDOMNodeList" => {
            Some(TypeTag::NodeList)
        }
        _ => None,
    }
}

/// Resolve a value to its canonical type tag
pub fn resolve(value: &Value) -> TypeTag {
    match value {
        Value::Undefined => TypeTag::Undefined,
        Value::Number(n) if n.is_nan() => TypeTag::NaN,
        Value::Null => TypeTag::Null,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Number,
        Value::String(_) => TypeTag::String,
        Value::Array(_) => TypeTag::Array,
        Value::Object(_) => TypeTag::Object,
        Value::Function(_) => TypeTag::Function,
        Value::Date(_) => TypeTag::Date,
        Value::RegExp(_) => TypeTag::RegExp,
        Value::Symbol(_) => TypeTag::UniqueSymbol,
        Value::Host(handle) => resolve_host(handle),
    }
}

/// True when the value resolves to exactly `tag`
pub fn matches(value: &Value, tag: &TypeTag) -> bool {
    resolve(value) == *tag
}

fn resolve_host(handle: &HostHandle) -> TypeTag {
    let class_tag = handle.class_tag();
    if let Some(tag) = class_table(class_tag) {
        return tag;
    }

    let host = handle.probe();
    if let Some(name) = host.node_name() {
        return TypeTag::Named(name.to_string());
    }

    // No table entry and no node name: structural disambiguation
    if host.is_window_like() {
        TypeTag::Window
    } else if host.node_type() == Some(DOCUMENT_NODE_TYPE) {
        TypeTag::Document
    } else if host.has_callee() {
        TypeTag::Arguments
    } else if host.item_length().is_some() {
        TypeTag::NodeList
    } else {
        TypeTag::Named(class_tag.to_string())
    }
}
