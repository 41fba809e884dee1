//! End-to-end validation tests
//!
//! Exercises the full pipeline: schema construction through the
//! checker factories, the recursive traversal, default injection, and
//! diagnostic delivery.

use pretty_assertions::assert_eq;

use prop_validation::{
    checkers, validate, Class, Constraint, Diagnostic, DiagnosticKind, ObjectValue, SchemaNode,
    SinkFn, SymbolValue, Validator, Value,
};

#[test]
fn default_is_injected_for_missing_field() {
    let schema = checkers::shape([("x", checkers::number().with_default(5.0))]);
    let mut data = Value::object::<&str, _>([]);

    let result = validate(&mut data, &schema);

    assert!(result.valid);
    assert!(result.diagnostics.is_empty());
    assert_eq!(data, Value::object([("x", Value::from(5.0))]));
}

#[test]
fn validation_is_idempotent() {
    let schema = checkers::shape([
        ("x", checkers::number().with_default(5.0)),
        ("name", checkers::string()),
    ]);
    let mut data = Value::object([("name", Value::from(42.0))]);

    let first = validate(&mut data, &schema);
    let after_first = data.clone();
    let second = validate(&mut data, &schema);

    assert_eq!(first.diagnostics.len(), second.diagnostics.len());
    assert_eq!(data, after_first);
}

#[test]
fn required_field_distinguishes_null_from_undefined() {
    let schema = checkers::shape([("name", checkers::string().required())]);

    let mut with_null = Value::object([("name", Value::Null)]);
    let result = validate(&mut with_null, &schema);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MissingRequired);
    assert!(result.diagnostics[0].message.contains("'null'"));

    let mut empty = Value::object::<&str, _>([]);
    let result = validate(&mut empty, &schema);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MissingRequired);
    assert!(result.diagnostics[0].message.contains("'undefined'"));
}

#[test]
fn required_satisfied_by_default_injection() {
    let schema = checkers::shape([("mode", checkers::string().with_default("auto").required())]);
    let mut data = Value::object::<&str, _>([]);

    let result = validate(&mut data, &schema);

    assert!(result.valid);
    assert_eq!(data, Value::object([("mode", Value::from("auto"))]));
}

#[test]
fn type_mismatch_reports_observed_and_expected() {
    let schema = checkers::shape([("age", checkers::number())]);
    let mut data = Value::object([("age", Value::from("12"))]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeMismatch);
    assert_eq!(diagnostic.field_path, "age");
    assert_eq!(diagnostic.actual.as_deref(), Some("String"));
    assert_eq!(diagnostic.expected.as_deref(), Some("Number"));
}

#[test]
fn falsy_but_defined_values_are_still_checked() {
    // 0 and "" are present; presence is not-null/undefined
    let schema = checkers::shape([("count", checkers::number())]);
    let mut data = Value::object([("count", Value::from(0.0))]);
    assert!(validate(&mut data, &schema).valid);

    let schema = checkers::shape([("count", checkers::number())]);
    let mut data = Value::object([("count", Value::from(""))]);
    let result = validate(&mut data, &schema);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::TypeMismatch);
}

#[test]
fn optional_null_field_passes() {
    let schema = checkers::shape([("note", checkers::string())]);
    let mut data = Value::object([("note", Value::Null)]);
    assert!(validate(&mut data, &schema).valid);
}

#[test]
fn enum_membership_uses_same_value() {
    let schema = checkers::shape([(
        "level",
        checkers::one_of(vec![Value::from(1.0), Value::from(2.0), Value::from(3.0)]).unwrap(),
    )]);

    let mut bad = Value::object([("level", Value::from(4.0))]);
    let result = validate(&mut bad, &schema);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NotOneOf);
    assert!(result.diagnostics[0]
        .expected
        .as_deref()
        .unwrap()
        .contains("one of [1, 2, 3]"));

    let mut good = Value::object([("level", Value::from(2.0))]);
    assert!(validate(&mut good, &schema).valid);
}

#[test]
fn enum_distinguishes_zero_signs_and_accepts_nan() {
    let schema = checkers::shape([(
        "x",
        checkers::one_of(vec![Value::Number(0.0)]).unwrap(),
    )]);
    let mut neg_zero = Value::object([("x", Value::Number(-0.0))]);
    let result = validate(&mut neg_zero, &schema);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NotOneOf);

    let schema = checkers::shape([(
        "x",
        checkers::one_of(vec![Value::Number(f64::NAN)]).unwrap(),
    )]);
    let mut nan = Value::object([("x", Value::Number(f64::NAN))]);
    assert!(validate(&mut nan, &schema).valid);
}

#[test]
fn nested_shape_reports_dotted_path() {
    let schema = checkers::shape([("obj", checkers::shape([("a", checkers::number())]))]);
    let mut data = Value::object([(
        "obj",
        Value::object([("a", Value::from("x"))]),
    )]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].field_path, "obj.a");
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::TypeMismatch);
}

#[test]
fn array_elements_report_indexed_paths() {
    let schema = checkers::shape([("field", checkers::array_of(checkers::string()))]);
    let mut data = Value::object([(
        "field",
        Value::Array(vec![
            Value::from("a"),
            Value::from(1.0),
            Value::from("c"),
        ]),
    )]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].field_path, "field[1]");
    assert_eq!(result.diagnostics[0].actual.as_deref(), Some("Number"));
}

#[test]
fn array_of_shapes_recurses_per_element() {
    let schema = checkers::shape([(
        "servers",
        checkers::array_of(checkers::shape([("host", checkers::string())])),
    )]);
    let mut data = Value::object([(
        "servers",
        Value::Array(vec![
            Value::object([("host", Value::from("a"))]),
            Value::object([("host", Value::from(1.0))]),
        ]),
    )]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].field_path, "servers[1].host");
}

#[test]
fn array_element_defaults_fill_undefined_slots() {
    let schema = checkers::shape([(
        "xs",
        checkers::array_of(checkers::number().with_default(7.0)),
    )]);
    let mut data = Value::object([(
        "xs",
        Value::Array(vec![Value::from(1.0), Value::Undefined]),
    )]);

    let result = validate(&mut data, &schema);

    assert!(result.valid);
    assert_eq!(
        data,
        Value::object([(
            "xs",
            Value::Array(vec![Value::from(1.0), Value::from(7.0)])
        )])
    );
}

#[test]
fn union_accepts_any_matching_alternative() {
    let schema = checkers::shape([(
        "id",
        checkers::one_of_type(vec![checkers::number(), checkers::string()]).unwrap(),
    )]);

    let mut as_string = Value::object([("id", Value::from("abc"))]);
    assert!(validate(&mut as_string, &schema).valid);

    let mut as_number = Value::object([("id", Value::from(7.0))]);
    assert!(validate(&mut as_number, &schema).valid);
}

#[test]
fn union_failure_is_a_single_diagnostic() {
    let schema = checkers::shape([(
        "id",
        checkers::one_of_type(vec![checkers::number(), checkers::string()]).unwrap(),
    )]);
    let mut data = Value::object([("id", Value::Bool(true))]);

    let result = validate(&mut data, &schema);

    // Failed trial runs leave no diagnostics behind
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::NoMatchingAlternative
    );
    assert!(result.diagnostics[0]
        .expected
        .as_deref()
        .unwrap()
        .contains("Number | String"));
}

#[test]
fn instance_of_walks_the_class_chain() {
    let base = Class::new("Shape");
    let derived = Class::with_parent("Circle", &base);
    let schema = checkers::shape([("item", checkers::instance_of(&base).unwrap())]);

    let mut conforming = Value::object([(
        "item",
        Value::Object(ObjectValue::instance_of(&derived)),
    )]);
    assert!(validate(&mut conforming, &schema).valid);

    let mut plain = Value::object([("item", Value::object([("r", Value::from(1.0))]))]);
    let result = validate(&mut plain, &schema);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NominalMismatch);
    assert!(result.diagnostics[0].message.contains("Shape"));
}

#[test]
fn malformed_constraint_skips_field_without_side_effects() {
    let anonymous = Class::new("");
    let node = SchemaNode::new(Constraint::InstanceOf(anonymous)).with_default(1.0);
    let schema = checkers::shape([("x", node)]);
    let mut data = Value::object::<&str, _>([]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::MalformedConstraint
    );
    // The field was skipped before default injection
    assert_eq!(data, Value::object::<&str, _>([]));
}

#[test]
fn any_accepts_every_value() {
    let schema = checkers::shape([("x", checkers::any())]);
    for value in [
        Value::Bool(true),
        Value::from(0.0),
        Value::from(""),
        Value::Array(vec![]),
        Value::object::<&str, _>([]),
    ] {
        let mut data = Value::object([("x", value)]);
        assert!(validate(&mut data, &schema).valid);
    }
}

#[test]
fn siblings_are_checked_past_a_failure() {
    let schema = checkers::shape([
        ("a", checkers::number()),
        ("b", checkers::string()),
        ("c", checkers::bool()),
    ]);
    let mut data = Value::object([
        ("a", Value::from("no")),
        ("b", Value::from(1.0)),
        ("c", Value::Bool(true)),
    ]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 2);
    let paths: Vec<&str> = result
        .diagnostics
        .iter()
        .map(|d| d.field_path.as_str())
        .collect();
    assert!(paths.contains(&"a"));
    assert!(paths.contains(&"b"));
}

#[test]
fn symbol_keys_render_in_field_paths() {
    let sym = SymbolValue::new("id");
    let schema = checkers::shape([(sym.clone(), checkers::number())]);
    let mut data = Value::object([(sym, Value::from("x"))]);

    let result = validate(&mut data, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].field_path, "Symbol(id)");
}

#[test]
fn diagnostics_stream_through_a_closure_sink() {
    let schema = checkers::shape([
        ("a", checkers::number()),
        ("b", checkers::string()),
    ]);
    let mut data = Value::object([
        ("a", Value::from("no")),
        ("b", Value::from(2.0)),
    ]);

    let mut count = 0usize;
    let mut sink = SinkFn(|diagnostic: Diagnostic| {
        assert!(!diagnostic.field_path.is_empty());
        count += 1;
    });
    Validator::new().validate_with_sink(&mut data, &schema, &mut sink);

    assert_eq!(count, 2);
}

#[test]
fn validate_from_json_document() {
    let schema = checkers::shape([
        ("name", checkers::string().required()),
        ("port", checkers::number().with_default(8080.0)),
        (
            "tags",
            checkers::array_of(checkers::string()),
        ),
    ]);
    let mut config = Value::from_json(serde_json::json!({
        "name": "api",
        "tags": ["fast", 1]
    }));

    let result = Validator::new()
        .with_tag_name("ServerConfig")
        .validate(&mut config, &schema);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].field_path, "tags[1]");
    assert_eq!(result.diagnostics[0].tag_name, "ServerConfig");
}
