//! Field-level diff between a stored client and an incoming patch.

use serde_json::{Map, Value};

use clientdesk_entity::audit::{ChangeSet, FieldChange};

/// Compare `incoming` against `current` and report every differing field.
///
/// Only keys present in both maps are compared, so a field left out of the
/// patch is never reported. Values are compared as JSON without coercion:
/// `"8"` and `8` differ. Arrays and objects are skipped on either side.
/// An empty result means nothing changed and no audit entry is due.
pub fn diff_fields(current: &Map<String, Value>, incoming: &Map<String, Value>) -> ChangeSet {
    incoming
        .iter()
        .filter(|(_, new)| is_scalar(new))
        .filter_map(|(field, new)| {
            let old = current.get(field)?;
            if !is_scalar(old) || old == new {
                return None;
            }
            Some((
                field.clone(),
                FieldChange::new(Some(old.clone()), Some(new.clone())),
            ))
        })
        .collect()
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
