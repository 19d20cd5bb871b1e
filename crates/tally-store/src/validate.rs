//! Structural validation of a decoded dashboard document.
//!
//! The document always arrives from disk as untrusted bytes, so the shape
//! check runs on the untyped [`serde_json::Value`] before anything
//! deserializes into the domain types. Pure predicate: no I/O, no
//! mutation, never panics. The reason text is diagnostic only.

use serde_json::Value;

/// Required top-level string fields.
const STRING_FIELDS: [&str; 3] = ["project_name", "created_at", "updated_at"];

/// Required top-level numeric fields.
const NUMBER_FIELDS: [&str; 5] = [
    "version",
    "total_sessions",
    "total_tokens",
    "total_cost",
    "total_duration_secs",
];

/// Checks that `value` has the coarse shape of a dashboard document:
/// every required field present, maps where maps are expected, lists
/// where lists are expected, numbers where numbers are expected.
pub fn validate_state(value: &Value) -> Result<(), String> {
    let Some(root) = value.as_object() else {
        return Err(format!(
            "top-level document must be an object, found {}",
            type_name(value)
        ));
    };

    for field in NUMBER_FIELDS {
        match root.get(field) {
            None => return Err(format!("missing required field '{field}'")),
            Some(v) if !v.is_number() => {
                return Err(format!(
                    "field '{field}' must be a number, found {}",
                    type_name(v)
                ));
            }
            Some(_) => {}
        }
    }

    for field in STRING_FIELDS {
        match root.get(field) {
            None => return Err(format!("missing required field '{field}'")),
            Some(v) if !v.is_string() => {
                return Err(format!(
                    "field '{field}' must be a string, found {}",
                    type_name(v)
                ));
            }
            Some(_) => {}
        }
    }

    match root.get("agents") {
        None => return Err("missing required field 'agents'".to_string()),
        Some(v) if !v.is_object() => {
            return Err(format!("field 'agents' must be a map, found {}", type_name(v)));
        }
        Some(_) => {}
    }

    for field in ["events", "sessions"] {
        match root.get(field) {
            None => return Err(format!("missing required field '{field}'")),
            Some(v) if !v.is_array() => {
                return Err(format!(
                    "field '{field}' must be a list, found {}",
                    type_name(v)
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tally_core::DashboardState;

    #[test]
    fn accepts_a_freshly_constructed_document() {
        let value = serde_json::to_value(DashboardState::empty("demo")).unwrap();
        assert_eq!(validate_state(&value), Ok(()));
    }

    #[test]
    fn rejects_non_object_top_level() {
        assert!(validate_state(&json!([1, 2, 3])).is_err());
        assert!(validate_state(&json!("state")).is_err());
        assert!(validate_state(&json!(null)).is_err());
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut value = serde_json::to_value(DashboardState::empty("demo")).unwrap();
        value.as_object_mut().unwrap().remove("events");
        let reason = validate_state(&value).unwrap_err();
        assert!(reason.contains("events"), "unexpected reason: {reason}");
    }

    #[test]
    fn rejects_wrong_coarse_types() {
        let base = serde_json::to_value(DashboardState::empty("demo")).unwrap();

        let mut agents_as_list = base.clone();
        agents_as_list["agents"] = json!([]);
        assert!(validate_state(&agents_as_list).is_err());

        let mut version_as_string = base.clone();
        version_as_string["version"] = json!("1");
        assert!(validate_state(&version_as_string).is_err());

        let mut sessions_as_map = base;
        sessions_as_map["sessions"] = json!({});
        assert!(validate_state(&sessions_as_map).is_err());
    }

    #[test]
    fn tolerates_unknown_extra_fields() {
        let mut value = serde_json::to_value(DashboardState::empty("demo")).unwrap();
        value["extra"] = json!({"anything": true});
        assert_eq!(validate_state(&value), Ok(()));
    }
}
