//! Runtime schema validation with default injection
//!
//! Given an arbitrary dynamic [`Value`] and a declarative schema tree
//! built from [`checkers`] factories, the engine recursively verifies
//! the value, fills in defaults for missing fields, and reports every
//! violation as a structured [`Diagnostic`] — without panicking and
//! without stopping at the first failure.
//!
//! ## Architecture
//!
//! 1. **Type tags** ([`tag`]): canonicalize any runtime value into a
//!    semantic type name, including capability-probed host objects.
//! 2. **Values** ([`value`]): the dynamic value model plus SameValue
//!    equality (±0 distinguished, NaN self-equal) used for enum
//!    membership.
//! 3. **Schemas** ([`schema`]): a closed constraint sum type built
//!    through checker factories with fluent default/required builders.
//! 4. **Engine** ([`engine`]): the depth-first traversal that judges
//!    each field, injects defaults, and feeds the diagnostic sink.
//!
//! ## Example
//!
//! ```rust
//! use prop_validation::{checkers, Validator, Value};
//!
//! let schema = checkers::shape([
//!     ("name", checkers::string().required()),
//!     ("port", checkers::number().with_default(8080.0)),
//! ]);
//!
//! let mut config = Value::from_json(serde_json::json!({ "name": "api" }));
//! let result = Validator::new()
//!     .with_tag_name("ServerConfig")
//!     .validate(&mut config, &schema);
//!
//! assert!(result.valid);
//! // The missing port was filled in from the schema default
//! assert_eq!(
//!     config,
//!     Value::object([("name", Value::from("api")), ("port", Value::from(8080.0))])
//! );
//! ```
//!
//! Validation is a single synchronous pass over an in-memory value
//! graph: no I/O, no blocking, no cancellation points. Schema trees
//! are immutable during validation and may be shared across passes;
//! the value under validation is borrowed `&mut` for the duration, so
//! exclusive access to it is a compile-time fact.

pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod schema;
pub mod tag;
pub mod value;

pub use diagnostic::{
    Diagnostic, DiagnosticKind, DiagnosticSink, SinkFn, ValidationResult,
};
pub use engine::{validate, Validator, ANONYMOUS_TAG};
pub use error::{Result, SchemaError};
pub use schema::{checkers, Constraint, SchemaNode};
pub use tag::{matches, resolve, HostHandle, HostValue, TypeTag, DOCUMENT_NODE_TYPE};
pub use value::{
    same_value, Class, ClassRef, FunctionRef, Key, ObjectValue, SymbolValue, Value,
};

/// Engine version (from Cargo.toml)
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
