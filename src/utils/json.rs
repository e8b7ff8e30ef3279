use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

// NOTE: identifiers come back as JSON numbers or strings depending on the entity,
//       both are displayed the same way.
pub fn parse_serde_json_value_to_raw_string(v: &Value) -> String {
    let mut parsed_string = v.to_string();
    // Trim leading double quote
    if parsed_string.starts_with('"') {
        parsed_string.remove(0);
    }
    // Trim trailing double quote
    if parsed_string.ends_with('"') {
        parsed_string.pop();
    }
    parsed_string
}

/// Same as [`parse_serde_json_value_to_raw_string`], but `null` and blank values map to `None`.
pub fn optional_raw_string(v: Option<&Value>) -> Option<String> {
    match v {
        None | Some(Value::Null) => None,
        Some(value) => {
            let raw = parse_serde_json_value_to_raw_string(value);
            if raw.trim().is_empty() {
                None
            } else {
                Some(raw)
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Millis(i64),
    Text(String),
}

/// Accepts epoch milliseconds (what the server emits for dates) or RFC 3339 text.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<TimestampRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(TimestampRepr::Millis(millis)) => DateTime::<Utc>::from_timestamp_millis(millis)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {millis}"))),
        Some(TimestampRepr::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|date| Some(date.with_timezone(&Utc)))
            .map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn raw_string_strips_quotes() {
        assert_eq!(parse_serde_json_value_to_raw_string(&json!("jdoe")), "jdoe");
        assert_eq!(parse_serde_json_value_to_raw_string(&json!(42)), "42");
    }

    #[test]
    fn optional_raw_string_skips_null_and_blank() {
        assert_eq!(optional_raw_string(None), None);
        assert_eq!(optional_raw_string(Some(&Value::Null)), None);
        assert_eq!(optional_raw_string(Some(&json!("  "))), None);
        assert_eq!(
            optional_raw_string(Some(&json!("dig-rha"))),
            Some("dig-rha".to_string())
        );
    }

    #[test]
    fn timestamps_from_millis_and_text() {
        let millis: Stamped = serde_json::from_value(json!({ "at": 1_700_000_000_000_i64 })).unwrap();
        assert_eq!(millis.at.unwrap().timestamp(), 1_700_000_000);

        let text: Stamped =
            serde_json::from_value(json!({ "at": "2023-11-14T22:13:20Z" })).unwrap();
        assert_eq!(text.at.unwrap().timestamp(), 1_700_000_000);

        let missing: Stamped = serde_json::from_value(json!({})).unwrap();
        assert!(missing.at.is_none());

        let null: Stamped = serde_json::from_value(json!({ "at": null })).unwrap();
        assert!(null.at.is_none());
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(serde_json::from_value::<Stamped>(json!({ "at": "yesterday" })).is_err());
    }
}
