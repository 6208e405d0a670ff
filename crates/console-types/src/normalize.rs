//! Defensive shaping of server payloads into guaranteed containers.
//!
//! The backend occasionally returns `null` items, stringly-typed counts, or
//! bare arrays where an envelope is expected. These normalizers decide
//! malformed-vs-well-formed with explicit checks on the raw JSON value and
//! fall back to safe defaults, so calling code never branches on missing
//! fields. Well-formed input is always a fixed point.

use crate::envelopes::Page;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Shape a paginated endpoint response.
///
/// Guarantees `items: []`, `total_count: 0`, `page: 1`, `page_size: 10`
/// for any field that is missing or of the wrong type. Elements of `items`
/// that fail to decode as `T` are dropped.
pub fn paginated<T: DeserializeOwned>(data: &Value) -> Page<T> {
    let items = data
        .get("items")
        .and_then(Value::as_array)
        .map(|array| {
            array
                .iter()
                .filter_map(|element| serde_json::from_value(element.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Page {
        items,
        total_count: data.get("totalCount").and_then(Value::as_u64).unwrap_or(0),
        page: field_or(data, "page", 1),
        page_size: field_or(data, "pageSize", 10),
    }
}

/// Shape a lookup endpoint response into a plain list.
///
/// Accepts either a bare array or an `{items: [...]}` envelope; anything
/// else yields an empty list.
pub fn lookup<T: DeserializeOwned>(data: &Value) -> Vec<T> {
    let array = match data {
        Value::Array(array) => array,
        _ => match data.get("items").and_then(Value::as_array) {
            Some(array) => array,
            None => return Vec::new(),
        },
    };

    array
        .iter()
        .filter_map(|element| serde_json::from_value(element.clone()).ok())
        .collect()
}

/// Shape a single-entity response, merging it over caller-supplied defaults.
///
/// Fields present in `data` win; fields absent keep the fallback values.
/// Non-object payloads (null, arrays, scalars) yield the fallback unchanged.
pub fn item<T>(data: &Value, fallback: T) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Some(incoming) = data.as_object() else {
        return fallback;
    };

    let mut merged = match serde_json::to_value(&fallback) {
        Ok(Value::Object(map)) => map,
        _ => return fallback,
    };
    for (key, value) in incoming {
        merged.insert(key.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(fallback)
}

fn field_or(data: &Value, key: &str, default: u32) -> u32 {
    data.get(key)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Region, UserDraft};
    use serde_json::json;

    #[test]
    fn paginated_defaults_every_malformed_field() {
        // null items plus a stringly-typed count must normalize to the
        // empty first page.
        let page: Page<Region> = paginated(&json!({ "items": null, "totalCount": "5" }));
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn paginated_is_a_fixed_point_on_well_formed_input() {
        let value = json!({
            "items": [{ "id": 1, "name": "North" }],
            "totalCount": 1,
            "page": 2,
            "pageSize": 25,
        });

        let page: Page<Region> = paginated(&value);
        assert_eq!(serde_json::to_value(&page).unwrap(), value);

        let again: Page<Region> = paginated(&serde_json::to_value(&page).unwrap());
        assert_eq!(again, page);
    }

    #[test]
    fn paginated_handles_non_object_payload() {
        let page: Page<Region> = paginated(&Value::Null);
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn paginated_drops_undecodable_items() {
        let page: Page<Region> = paginated(&json!({
            "items": [{ "id": 1, "name": "North" }, { "bogus": true }],
            "totalCount": 2,
        }));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn lookup_accepts_bare_array() {
        let regions: Vec<Region> = lookup(&json!([{ "id": 1, "name": "North" }]));
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn lookup_accepts_items_envelope() {
        let regions: Vec<Region> = lookup(&json!({ "items": [{ "id": 2, "name": "South" }] }));
        assert_eq!(regions[0].id, 2);
    }

    #[test]
    fn lookup_defaults_to_empty() {
        let regions: Vec<Region> = lookup(&json!("nope"));
        assert!(regions.is_empty());
    }

    #[test]
    fn item_merges_over_fallback() {
        let merged = item(
            &json!({ "username": "clerk01" }),
            UserDraft::default(),
        );
        assert_eq!(merged.username, "clerk01");
        assert_eq!(merged.role, crate::models::Role::User);
    }

    #[test]
    fn item_returns_fallback_for_non_object() {
        let merged = item(&Value::Null, UserDraft::default());
        assert_eq!(merged, UserDraft::default());
    }
}
