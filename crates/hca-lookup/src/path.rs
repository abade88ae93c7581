//! Dotted-path resolution over JSON values.
//!
//! A segment selects a field of an object. When the current value is an
//! array, a numeric segment indexes into it and any other segment is
//! broadcast over the elements, keeping the elements that have the field.
//! A single match is returned as-is; several matches are returned as an
//! array in document order.

use serde_json::Value;

/// Resolves `segments` against `root`, returning `None` if any segment
/// matches nothing.
pub fn resolve(root: &Value, segments: &[&str]) -> Option<Value> {
    let mut candidates: Vec<&Value> = vec![root];
    for segment in segments {
        let mut next = Vec::new();
        for candidate in candidates {
            step(candidate, segment, &mut next);
        }
        if next.is_empty() {
            return None;
        }
        candidates = next;
    }
    match candidates.as_slice() {
        [single] => Some((*single).clone()),
        many => Some(Value::Array(many.iter().map(|v| (*v).clone()).collect())),
    }
}

fn step<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(v) = map.get(segment) {
                out.push(v);
            }
        }
        Value::Array(items) => {
            if let Ok(index) = segment.parse::<usize>() {
                if let Some(v) = items.get(index) {
                    out.push(v);
                }
                return;
            }
            out.extend(items.iter().filter_map(|item| item.get(segment)));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn direct_field() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(resolve(&doc, &["a", "b"]), Some(json!(1)));
        assert_eq!(resolve(&doc, &["a"]), Some(json!({"b": 1})));
    }

    #[test]
    fn missing_field() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(resolve(&doc, &["a", "c"]), None);
        assert_eq!(resolve(&doc, &["a", "b", "c"]), None);
    }

    #[test]
    fn broadcast_over_array() {
        let doc = json!({"contributors": [
            {"name": "Ada", "email": "ada@example.org"},
            {"name": "Grace"}
        ]});
        assert_eq!(
            resolve(&doc, &["contributors", "name"]),
            Some(json!(["Ada", "Grace"]))
        );
        // Only one element carries the field, so the match is a scalar.
        assert_eq!(
            resolve(&doc, &["contributors", "email"]),
            Some(json!("ada@example.org"))
        );
        assert_eq!(resolve(&doc, &["contributors", "laboratory"]), None);
    }

    #[test]
    fn numeric_segment_indexes() {
        let doc = json!({"publications": [{"title": "A"}, {"title": "B"}]});
        assert_eq!(resolve(&doc, &["publications", "1", "title"]), Some(json!("B")));
        assert_eq!(resolve(&doc, &["publications", "2"]), None);
    }

    #[test]
    fn array_value_is_a_single_match() {
        let doc = json!({"genus_species": [{"text": "Homo sapiens"}]});
        assert_eq!(
            resolve(&doc, &["genus_species"]),
            Some(json!([{"text": "Homo sapiens"}]))
        );
    }

    #[test]
    fn empty_array_broadcast_is_missing() {
        let doc = json!({"organ_parts": []});
        assert_eq!(resolve(&doc, &["organ_parts", "text"]), None);
    }
}
