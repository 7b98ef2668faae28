mod common;

use std::collections::HashMap;

use common::{init_tracing, sample_context};
use property_context::{Bindings, Context, ContextError, Properties, PropertyContext};
use serde_json::{json, Value};

// A number is not a String: the setter never runs and the old value stays.
#[test]
fn test_type_mismatch_rejected_atomically() {
    let mut ctx = sample_context();
    let err = ctx.put("readWrite", json!(17)).unwrap_err();
    assert!(
        matches!(err, ContextError::InvalidValue { ref key, .. } if key == "readWrite"),
        "Expected InvalidValue, got: {err:?}"
    );
    assert_eq!(ctx.get("readWrite").unwrap(), Some(json!("readWrite")));
}

#[test]
fn test_null_rejected_by_non_optional_setter() {
    let mut ctx = sample_context();
    assert!(matches!(ctx.put("writeOnly", Value::Null), Err(ContextError::InvalidValue { .. })));
    assert_eq!(ctx.host().return_write_only(), "writeOnly");
}

#[test]
fn test_retrieve_type_mismatch() {
    let mut ctx = sample_context();
    ctx.put("count", json!("many")).unwrap();
    assert!(matches!(ctx.retrieve::<u64>("count"), Err(ContextError::InvalidValue { .. })));
    assert_eq!(ctx.retrieve::<u64>("missing").unwrap(), None);
}

struct Port(u16);

impl Properties for Port {
    fn bindings() -> Bindings<Self> {
        Bindings::new().try_read_write(
            "port",
            |p: &Port| p.0,
            |p: &mut Port, n: u16| {
                if n < 1024 {
                    return Err(format!("port {n} is privileged"));
                }
                p.0 = n;
                Ok(())
            },
        )
    }
}

#[test]
fn test_accessor_validation_failure() {
    init_tracing();
    let mut ctx = PropertyContext::new(Port(8080)).unwrap();
    let err = ctx.put("port", json!(80)).unwrap_err();
    assert_eq!(err.to_string(), "invalid value for property `port`: port 80 is privileged");
    assert_eq!(ctx.get("port").unwrap(), Some(json!(8080)));

    assert!(matches!(ctx.put("port", json!(70000)), Err(ContextError::InvalidValue { .. })));
    ctx.put("port", json!(9090)).unwrap();
    assert_eq!(ctx.host().0, 9090);
}

struct Twice;

impl Properties for Twice {
    fn bindings() -> Bindings<Self> {
        Bindings::new()
            .read_only("name", |_: &Twice| "a")
            .read_only("name", |_: &Twice| "b")
    }
}

#[test]
fn test_duplicate_binding_fails_construction() {
    let err = PropertyContext::new(Twice).err().unwrap();
    assert!(matches!(err, ContextError::DuplicateBinding(ref k) if k == "name"));
}

struct Grid {
    cells: HashMap<(i32, i32), i32>,
}

impl Properties for Grid {
    fn bindings() -> Bindings<Self> {
        Bindings::new().read_only("cells", |g: &Grid| g.cells.clone())
    }
}

// JSON object keys must be strings, so the getter's output cannot be converted.
#[test]
fn test_unserializable_getter_output() {
    init_tracing();
    let ctx = PropertyContext::new(Grid { cells: HashMap::from([((1, 2), 3)]) }).unwrap();

    let err = ctx.get("cells").unwrap_err();
    assert!(
        matches!(err, ContextError::InvalidValue { ref key, .. } if key == "cells"),
        "Expected InvalidValue, got: {err:?}"
    );
    assert!(matches!(ctx.to_json(), Err(ContextError::InvalidValue { .. })));

    let entries: Vec<(String, bool)> = ctx.entries().map(|(k, v)| (k.to_owned(), v.is_ok())).collect();
    assert_eq!(entries, vec![("cells".to_owned(), false)]);
    assert!(!ctx.contains_value(&Value::Null));
}
