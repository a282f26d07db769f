//! Forgiving deserializers for model-produced JSON.
//!
//! Models drift from the requested shape: a "description" comes back as an
//! object, a list as a single string, a step number as `"1"`. These helpers
//! accept the drift instead of failing the whole reply.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Any JSON value as text; `null` becomes empty
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

/// An array of anything as a list of strings; a scalar becomes a one-item list
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        other => vec![value_to_text(other)],
    })
}

/// A boolean, also accepting `"true"`/`"yes"` strings
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes"),
        _ => false,
    })
}

/// A step number given as a number or numeric string; zero otherwise
pub fn number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "super::text")]
        text: String,
        #[serde(default, deserialize_with = "super::text_list")]
        list: Vec<String>,
        #[serde(default, deserialize_with = "super::flag")]
        flag: bool,
        #[serde(default, deserialize_with = "super::number")]
        number: u32,
    }

    #[test]
    fn test_accepts_drifted_shapes() {
        let loose: Loose = serde_json::from_str(
            r#"{"text": {"small": "1s"}, "list": "input.csv", "flag": "yes", "number": "3"}"#,
        )
        .unwrap();
        assert_eq!(loose.text, r#"{"small":"1s"}"#);
        assert_eq!(loose.list, vec!["input.csv"]);
        assert!(loose.flag);
        assert_eq!(loose.number, 3);
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let loose: Loose = serde_json::from_str(r#"{"text": null, "list": null}"#).unwrap();
        assert_eq!(loose.text, "");
        assert!(loose.list.is_empty());
        assert!(!loose.flag);
        assert_eq!(loose.number, 0);
    }
}
