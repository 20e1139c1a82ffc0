use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::internal::CodecError;

/// Ordered field map of a serialized entity state
///
/// BTreeMap keeps field names sorted, which is what makes snapshots stable
/// byte for byte: the same logical state always encodes identically.
pub type FieldMap = BTreeMap<String, Value>;

/// Per-field before/after pair produced by diffing two states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Field name to before/after mapping; encodes to
/// {"field": {"old": ..., "new": ...}} and to {} when nothing differs
pub type ChangedFields = BTreeMap<String, FieldChange>;

/// Snapshot of an entity state at event time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub object_repr: String,
    pub object_json_repr: String,
}

/// Substituted when a state refuses to serialize; the event is still written
/// because partial audit data outweighs no audit data
pub const UNSERIALIZABLE: &str = "<unserializable>";

/// Normalize an entity state into an ordered field map
///
/// Fails when the state cannot be converted to JSON at all, or when it
/// converts to something other than an object (a bare number, a list).
/// Option fields that are None arrive as explicit nulls, not absences.
pub fn field_map(state: &impl Serialize) -> Result<FieldMap, CodecError> {
    let value =
        serde_json::to_value(state).map_err(|source| CodecError::Unserializable { source })?;

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(CodecError::NotAnObject {
            got: json_type_name(&other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a field map as a display string plus compact JSON
///
/// The display string is space-joined key=value pairs in key order; values
/// print as their JSON form so strings stay quoted and unambiguous.
pub fn snapshot(fields: &FieldMap) -> Snapshot {
    let object_repr = fields
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ");

    let object_json_repr =
        Value::Object(fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect()).to_string();

    Snapshot {
        object_repr,
        object_json_repr,
    }
}

/// Snapshot recorded when serialization of the real state failed
pub fn placeholder_snapshot() -> Snapshot {
    Snapshot {
        object_repr: UNSERIALIZABLE.to_string(),
        object_json_repr: Value::String(UNSERIALIZABLE.to_string()).to_string(),
    }
}

/// Union-diff two field maps
///
/// Walks the union of field names; an entry appears only where the sides
/// differ. A side missing a field contributes an explicit null, so adds and
/// removes read the same way as value changes. diff(s, s) is empty but
/// present, never absent.
pub fn diff(old: &FieldMap, new: &FieldMap) -> ChangedFields {
    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    let mut changes = ChangedFields::new();
    for name in names {
        let old_value = old.get(name).cloned().unwrap_or(Value::Null);
        let new_value = new.get(name).cloned().unwrap_or(Value::Null);
        if old_value != new_value {
            changes.insert(
                name.clone(),
                FieldChange {
                    old: old_value,
                    new: new_value,
                },
            );
        }
    }
    changes
}

/// Encode a change set for the changed_fields column
pub fn encode_changed_fields(changes: &ChangedFields) -> Result<String, CodecError> {
    serde_json::to_string(changes).map_err(|source| CodecError::Unserializable { source })
}

/// Decode a changed_fields column value back into a change set
pub fn decode_changed_fields(text: &str) -> Result<ChangedFields, CodecError> {
    serde_json::from_str(text).map_err(|source| CodecError::Unserializable { source })
}
