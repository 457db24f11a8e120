use serde_json::Value;

use crate::schema::{FieldKind, FieldSchema};
use crate::text::{display_text, is_truthy};

/// Extract the raw value a field points at. `None` means "no value".
///
/// Pure function of its inputs; a missing record, key or path segment is
/// never an error.
pub fn resolve(record: Option<&Value>, field: &FieldSchema) -> Option<Value> {
    let record = record?;

    match &field.kind {
        FieldKind::Nested { path } => resolve_path(record, path.as_deref()?),
        FieldKind::Address { compose } => compose_parts(record, compose.as_deref()?, ", "),
        FieldKind::Compose { compose } => compose_parts(record, compose.as_deref()?, " "),
        FieldKind::Default
        | FieldKind::Multiline
        | FieldKind::Files
        | FieldKind::Email
        | FieldKind::Url
        | FieldKind::Phone
        | FieldKind::Date
        | FieldKind::Array
        | FieldKind::Unknown(_) => lookup(record, &field.key).cloned(),
    }
}

/// Walk a dot-separated path. Any falsy or non-container intermediate ends
/// the walk with `None`.
pub fn resolve_path(record: &Value, path: &str) -> Option<Value> {
    let mut current = record;
    for segment in path.split('.') {
        if !is_truthy(current) {
            return None;
        }
        current = lookup(current, segment)?;
    }
    match current {
        Value::Null => None,
        other => Some(other.clone()),
    }
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn compose_parts(record: &Value, names: &[String], separator: &str) -> Option<Value> {
    let parts: Vec<String> = names
        .iter()
        .filter_map(|name| lookup(record, name))
        .filter(|value| is_truthy(value))
        .map(display_text)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(Value::String(parts.join(separator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(path: &str) -> FieldSchema {
        FieldSchema::new(
            "n",
            "N",
            FieldKind::Nested {
                path: Some(path.to_string()),
            },
        )
    }

    fn composed(kind: &str, names: &[&str]) -> FieldSchema {
        let compose = Some(names.iter().map(|s| s.to_string()).collect());
        let kind = match kind {
            "address" => FieldKind::Address { compose },
            _ => FieldKind::Compose { compose },
        };
        FieldSchema::new("c", "C", kind)
    }

    #[test]
    fn test_missing_record_is_none() {
        let field = FieldSchema::new("a", "A", FieldKind::Default);
        assert_eq!(resolve(None, &field), None);
    }

    #[test]
    fn test_direct_lookup() {
        let record = json!({"a": "value", "b": 0});
        assert_eq!(
            resolve(Some(&record), &FieldSchema::new("a", "A", FieldKind::Default)),
            Some(json!("value"))
        );
        assert_eq!(
            resolve(Some(&record), &FieldSchema::new("b", "B", FieldKind::Email)),
            Some(json!(0))
        );
        assert_eq!(
            resolve(Some(&record), &FieldSchema::new("zz", "Z", FieldKind::Date)),
            None
        );
    }

    #[test]
    fn test_nested_paths() {
        let record = json!({
            "org": {"contact": {"name": "Ada"}, "tags": ["x", "y"], "empty": ""},
        });
        assert_eq!(resolve(Some(&record), &nested("org.contact.name")), Some(json!("Ada")));
        assert_eq!(resolve(Some(&record), &nested("org.tags.1")), Some(json!("y")));
        assert_eq!(resolve(Some(&record), &nested("org.missing.name")), None);
        assert_eq!(resolve(Some(&record), &nested("org.contact.name.first")), None);
        assert_eq!(resolve(Some(&record), &nested("org.empty.deeper")), None);
        assert_eq!(resolve(Some(&record), &nested("nothing")), None);
    }

    #[test]
    fn test_nested_without_path_is_none() {
        let record = json!({"n": "direct"});
        let field = FieldSchema::new("n", "N", FieldKind::Nested { path: None });
        assert_eq!(resolve(Some(&record), &field), None);
    }

    #[test]
    fn test_address_joins_truthy_parts() {
        let record = json!({"line1": "1 High St", "line2": "", "town": "Coventry", "postcode": null});
        let field = composed("address", &["line1", "line2", "town", "postcode", "absent"]);
        assert_eq!(
            resolve(Some(&record), &field),
            Some(json!("1 High St, Coventry"))
        );
    }

    #[test]
    fn test_compose_uses_space() {
        let record = json!({"first": "Jane", "middle": 0, "last": "Lee"});
        let field = composed("compose", &["first", "middle", "last"]);
        assert_eq!(resolve(Some(&record), &field), Some(json!("Jane Lee")));
    }

    #[test]
    fn test_compose_all_falsy_is_none() {
        let record = json!({"first": "", "last": false});
        assert_eq!(resolve(Some(&record), &composed("compose", &["first", "last"])), None);
        assert_eq!(resolve(Some(&record), &composed("address", &["first", "last"])), None);
        let field = FieldSchema::new("c", "C", FieldKind::Address { compose: None });
        assert_eq!(resolve(Some(&record), &field), None);
    }
}
