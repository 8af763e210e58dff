use std::collections::BTreeMap;

/// A field value in an entity record, a step's inputs/outputs, or a flow
/// node's parameter map.
///
/// Flowsint's execution mode is dynamic: records travel as
/// JSON-compatible values rather than statically-typed structs, and typed
/// entities are validated on entry (see `flowsint-types`).
pub type Value = serde_json::Value;

/// A record keyed by field name — the shape of an entity's fields, a step's
/// `inputs`/`outputs`, or an enricher node's `params`.
pub type Record = BTreeMap<String, Value>;

/// Returns `true` for the "empty" values the Node Loader drops: empty
/// strings, `null`, and empty arrays/objects.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
