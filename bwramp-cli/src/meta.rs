use serde_json::{Map, Value};
use tracing::warn;

/// Parse the `--meta` flag into the extra keys of the session `meta`.
///
/// Anything other than a JSON object is logged and replaced by an empty
/// map; bad metadata never stops a measurement run.
pub fn parse_extra(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = json_kind(&other), "--meta is not a JSON object, ignoring");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "--meta is not valid JSON, ignoring");
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_is_kept() {
        let extra = parse_extra(r#"{"site": "lab-a", "run": 3}"#);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["site"], json!("lab-a"));
        assert_eq!(extra["run"], json!(3));
    }

    #[test]
    fn empty_object_is_empty() {
        assert!(parse_extra("{}").is_empty());
    }

    #[test]
    fn invalid_json_becomes_empty() {
        assert!(parse_extra("{site: lab-a").is_empty());
        assert!(parse_extra("").is_empty());
    }

    #[test]
    fn non_object_becomes_empty() {
        assert!(parse_extra("[1, 2]").is_empty());
        assert!(parse_extra(r#""lab-a""#).is_empty());
        assert!(parse_extra("null").is_empty());
    }
}
