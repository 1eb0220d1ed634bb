//! Normalises the backend's response shapes at the boundary.
//!
//! Lists arrive either as a bare array or wrapped, e.g.
//! `{"attendance": [...], "total": 42}` or `{"data": [...], "count": 3}`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

const LIST_KEYS: [&str; 4] = ["data", "attendance", "items", "results"];
const TOTAL_KEYS: [&str; 2] = ["total", "count"];

/// One fetched page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole collection; equals `items.len()` when the backend omits it.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::from_items(Vec::new())
    }
}

pub fn normalize_list<T: DeserializeOwned>(value: Value, plural: &str) -> Result<Page<T>, ClientError> {
    let (items, total) = match value {
        Value::Array(items) => (items, None),
        Value::Object(mut map) => {
            let key = LIST_KEYS
                .iter()
                .copied()
                .chain(std::iter::once(plural))
                .find(|key| map.get(*key).is_some_and(Value::is_array))
                .ok_or_else(|| {
                    ClientError::UnexpectedResponse(format!("no list of {plural} in response"))
                })?
                .to_string();
            let total = TOTAL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64));
            let Some(Value::Array(items)) = map.remove(&key) else {
                return Err(ClientError::UnexpectedResponse(format!(
                    "no list of {plural} in response"
                )));
            };
            (items, total)
        }
        other => {
            return Err(ClientError::UnexpectedResponse(format!(
                "expected a list of {plural}, got {other}"
            )));
        }
    };

    let items: Vec<T> = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()?;
    let total = total
        .and_then(|t| usize::try_from(t).ok())
        .unwrap_or(items.len());
    Ok(Page { items, total })
}

/// Unwraps `{"data": {...}}` around a single entity. Entities carrying their own
/// id are returned unchanged.
pub fn unwrap_single(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.contains_key("data") && !map.contains_key("_id") && !map.contains_key("id") =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_bare_array() {
        let page: Page<Item> = normalize_list(json!([{"name": "a"}, {"name": "b"}]), "classes").unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_attendance_envelope_with_total() {
        let page: Page<Item> = normalize_list(
            json!({"attendance": [{"name": "a"}], "total": 31, "page": 2}),
            "attendance",
        )
        .unwrap();
        assert_eq!(page.items, vec![Item { name: "a".into() }]);
        assert_eq!(page.total, 31);
    }

    #[test]
    fn test_data_envelope_with_count() {
        let page: Page<Item> =
            normalize_list(json!({"data": [{"name": "a"}], "count": 9}), "staff").unwrap();
        assert_eq!(page.total, 9);
    }

    #[test]
    fn test_plural_key_envelope() {
        let page: Page<Item> =
            normalize_list(json!({"gyms": [{"name": "a"}, {"name": "b"}]}), "gyms").unwrap();
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_unrecognised_shape() {
        let result: Result<Page<Item>, _> = normalize_list(json!({"msg": "ok"}), "gyms");
        assert!(matches!(result, Err(ClientError::UnexpectedResponse(_))));
        let result: Result<Page<Item>, _> = normalize_list(json!("nope"), "gyms");
        assert!(result.is_err());
    }

    #[test]
    fn test_unwrap_single() {
        assert_eq!(unwrap_single(json!({"data": {"name": "a"}})), json!({"name": "a"}));
        let entity = json!({"_id": "1", "data": "payload"});
        assert_eq!(unwrap_single(entity.clone()), entity);
    }
}
