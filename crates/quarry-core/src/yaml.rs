//! Lenient YAML scalars for manifest text fields
//!
//! Authors write `when: false`, `default: true` or `default: 8080` unquoted;
//! these decode to their plain text form.

use serde::{de, Deserialize, Deserializer};
use serde_yaml::Value;

fn scalar(value: Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Tagged(tagged) => scalar(tagged.value),
        Value::Sequence(_) => Err("expected a scalar, found a sequence".to_string()),
        Value::Mapping(_) => Err("expected a scalar, found a mapping".to_string()),
    }
}

/// Any scalar as a string; null is empty
pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar(Value::deserialize(deserializer)?).map_err(de::Error::custom)
}

/// A sequence of scalars as strings; null is empty
pub(crate) fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(scalar)
            .collect::<Result<_, _>>()
            .map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a sequence, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "super::string")]
        value: String,
        #[serde(default, deserialize_with = "super::strings")]
        items: Vec<String>,
    }

    fn parse(yaml: &str) -> Result<Field, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    #[test]
    fn test_unquoted_scalars_become_text() {
        assert_eq!(parse("value: false").unwrap().value, "false");
        assert_eq!(parse("value: true").unwrap().value, "true");
        assert_eq!(parse("value: 8080").unwrap().value, "8080");
        assert_eq!(parse("value: 1.5").unwrap().value, "1.5");
        assert_eq!(parse("value: plain").unwrap().value, "plain");
        assert_eq!(parse("value:").unwrap().value, "");
        assert_eq!(parse("{}").unwrap().value, "");
    }

    #[test]
    fn test_sequence_items_become_text() {
        let field = parse("items: [a, 2, true]").unwrap();
        assert_eq!(field.items, ["a", "2", "true"]);
        assert!(parse("items:").unwrap().items.is_empty());
    }

    #[test]
    fn test_collections_are_rejected_as_scalars() {
        assert!(parse("value: [a]").is_err());
        assert!(parse("value: {a: b}").is_err());
        assert!(parse("items: a").is_err());
    }
}
