//! Dynamic value model
//!
//! Validation operates on [`Value`], a closed sum over the runtime
//! universe the type resolver can classify: scalars, arrays, objects
//! (optionally branded with a nominal class), callable handles, dates,
//! regular expressions, unique symbols, and opaque host objects.
//!
//! The module also provides [`same_value`], the SameValue equality
//! notion used for enum membership: positive and negative zero are
//! distinct, and NaN is equal to itself.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::tag::HostHandle;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

fn next_identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)
}

/// A unique symbol value
///
/// Each symbol carries a process-unique identity; the optional
/// description is display-only and never participates in equality.
#[derive(Debug, Clone)]
pub struct SymbolValue {
    id: u64,
    description: Option<String>,
}

impl SymbolValue {
    /// Create a symbol with a description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: next_identity(),
            description: Some(description.into()),
        }
    }

    /// Create a symbol without a description
    pub fn anonymous() -> Self {
        Self {
            id: next_identity(),
            description: None,
        }
    }

    /// Get the symbol description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for SymbolValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SymbolValue {}

impl PartialOrd for SymbolValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for SymbolValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// A named callable handle
///
/// The engine never invokes functions; it only classifies them and
/// compares them by identity for enum membership.
#[derive(Debug, Clone)]
pub struct FunctionRef {
    id: u64,
    name: String,
}

impl FunctionRef {
    /// Create a named function handle
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: next_identity(),
            name: name.into(),
        }
    }

    /// Get the function name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FunctionRef {}

/// A nominal type usable for instance-of conformance checks
///
/// Classes form a single-inheritance chain through `parent`. Two class
/// references denote the same type only when they point at the same
/// allocation; names are for display and diagnostics.
#[derive(Debug)]
pub struct Class {
    name: String,
    parent: Option<ClassRef>,
}

/// Shared reference to a [`Class`]
pub type ClassRef = Arc<Class>;

impl Class {
    /// Create a root class
    pub fn new(name: impl Into<String>) -> ClassRef {
        Arc::new(Self {
            name: name.into(),
            parent: None,
        })
    }

    /// Create a class deriving from a parent
    pub fn with_parent(name: impl Into<String>, parent: &ClassRef) -> ClassRef {
        Arc::new(Self {
            name: name.into(),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Get the class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parent class, if any
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }
}

/// Walk the chain from `class` upward looking for `ancestor`.
pub(crate) fn derives_from(class: &ClassRef, ancestor: &ClassRef) -> bool {
    let mut current = Some(class);
    while let Some(c) = current {
        if Arc::ptr_eq(c, ancestor) {
            return true;
        }
        current = c.parent();
    }
    false
}

/// An object field key: a plain name or a unique symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Plain string key
    Name(String),
    /// Unique symbol key
    Symbol(SymbolValue),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Symbol(sym) => write!(f, "{}", sym),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<SymbolValue> for Key {
    fn from(sym: SymbolValue) -> Self {
        Key::Symbol(sym)
    }
}

/// An object value: an optional nominal brand plus a field map
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    class: Option<ClassRef>,
    fields: BTreeMap<Key, Value>,
}

impl ObjectValue {
    /// Create an empty plain object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty instance of a nominal class
    pub fn instance_of(class: &ClassRef) -> Self {
        Self {
            class: Some(Arc::clone(class)),
            fields: BTreeMap::new(),
        }
    }

    /// Get the nominal class brand, if any
    pub fn class(&self) -> Option<&ClassRef> {
        self.class.as_ref()
    }

    /// True when this object was constructed as `class` or derives from it
    pub fn conforms_to(&self, class: &ClassRef) -> bool {
        self.class
            .as_ref()
            .map(|c| derives_from(c, class))
            .unwrap_or(false)
    }

    /// Insert a field, returning the previous value if present
    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Get a field by key
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a mutable field by key
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Remove a field by key
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.fields.remove(key)
    }

    /// True when the key is present (even if the value is `Undefined`)
    pub fn contains_key(&self, key: &Key) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.fields.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the object has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        let same_class = match (&self.class, &other.class) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_class && self.fields == other.fields
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for ObjectValue {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut object = ObjectValue::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

/// A dynamic runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; a missing object field reads as `Undefined`
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// IEEE 754 double; NaN is representable and resolves to its own tag
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Ordered element list
    Array(Vec<Value>),
    /// Field map, optionally branded with a nominal class
    Object(ObjectValue),
    /// Named callable handle
    Function(FunctionRef),
    /// Date as milliseconds since the Unix epoch
    Date(i64),
    /// Regular expression source
    RegExp(String),
    /// Unique symbol
    Symbol(SymbolValue),
    /// Opaque host object, classified through capability probes
    Host(HostHandle),
}

impl Value {
    /// Build a plain object value from key/value pairs
    pub fn object<K, I>(fields: I) -> Value
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().collect())
    }

    /// True for `Undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `Null` or `Undefined`; everything else counts as
    /// present, including `0`, `""`, and `false`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Convert a JSON document into a plain value tree
    ///
    /// Numbers become doubles; JSON `null` maps to [`Value::Null`]
    /// (JSON has no way to express `Undefined`).
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from_json(v)))
                    .collect::<ObjectValue>(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(object) => {
                write!(f, "{{")?;
                for (i, (key, value)) in object.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "[Function: {}]", func.name()),
            Value::Date(ms) => write!(f, "[Date {}]", ms),
            Value::RegExp(source) => write!(f, "/{}/", source),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Host(handle) => write!(f, "[object {}]", handle.class_tag()),
        }
    }
}

/// SameValue equality
///
/// Identical values are equal, except that `+0` and `-0` are
/// distinguished and NaN is equal to itself. Symbols, functions, and
/// host handles compare by identity; arrays and objects compare
/// structurally field by field, since owned values carry no stable
/// reference identity.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                // +0 and -0 compare equal under IEEE ==; tell them apart
                *x != 0.0 || x.is_sign_negative() == y.is_sign_negative()
            } else {
                x.is_nan() && y.is_nan()
            }
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::RegExp(x), Value::RegExp(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| same_value(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            let same_class = match (x.class(), y.class()) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            };
            same_class
                && x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && same_value(va, vb))
        }
        (Value::Host(x), Value::Host(y)) => HostHandle::same_handle(x, y),
        _ => false,
    }
}
