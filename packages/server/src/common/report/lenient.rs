//! Per-field deserializers for report sections.
//!
//! A field holding `null` or a value of the wrong JSON type falls back to its
//! empty form while sibling fields keep what arrived. Only a section whose
//! top level is not an object (or array, for list sections) fails to parse.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::common::text::display_value;

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => display_value(&other),
    }
}

pub fn opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => serde_json::from_value(value).ok(),
    })
}

/// Array items that fit `T`; a lone value becomes a one-item list.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        value => serde_json::from_value(value).ok().into_iter().collect(),
    })
}

pub fn map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, value)| serde_json::from_value(value).ok().map(|v| (key, v)))
            .collect(),
        _ => IndexMap::new(),
    })
}

pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        value => stringify(value),
    })
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => Some(stringify(value)),
    })
}

pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(stringify).collect(),
        value => vec![stringify(value)],
    })
}

pub fn string_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| (key, stringify(value)))
            .collect(),
        _ => IndexMap::new(),
    })
}

/// Counts arrive as numbers or numeric strings.
pub fn count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0) as usize,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// A present report key with an unexpected shape becomes the section's default.
pub fn section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => Some(serde_json::from_value(value).unwrap_or_default()),
    })
}

/// Insight lists keep string entries and stringify anything else.
pub fn insights<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(items.into_iter().map(stringify).collect()),
        _ => Some(Vec::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "list")]
        items: Vec<u32>,
        #[serde(deserialize_with = "strings")]
        tags: Vec<String>,
        #[serde(deserialize_with = "string")]
        label: String,
        #[serde(deserialize_with = "count")]
        total: usize,
        #[serde(deserialize_with = "map")]
        scores: IndexMap<String, u32>,
    }

    #[test]
    fn mismatched_fields_fall_back_one_at_a_time() {
        let sample: Sample = serde_json::from_value(json!({
            "items": [1, "dois", 3],
            "tags": null,
            "label": 42,
            "total": "15",
            "scores": {"a": 1, "b": "x"}
        }))
        .unwrap();

        assert_eq!(sample.items, vec![1, 3]);
        assert!(sample.tags.is_empty());
        assert_eq!(sample.label, "42");
        assert_eq!(sample.total, 15);
        assert_eq!(sample.scores.len(), 1);
    }

    #[test]
    fn lone_values_become_single_item_lists() {
        let sample: Sample = serde_json::from_value(json!({
            "items": 7,
            "tags": "único",
            "scores": []
        }))
        .unwrap();

        assert_eq!(sample.items, vec![7]);
        assert_eq!(sample.tags, vec!["único".to_string()]);
        assert!(sample.scores.is_empty());
    }
}
