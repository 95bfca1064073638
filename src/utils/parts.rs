use crate::types::Part;
use serde_json::Value;

/// Function response pulled out of a part list
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionResponsePayload {
    pub name: String,
    pub value: Value,
}

/// Concatenates every text part in order; non-text parts are ignored.
pub fn extract_text(parts: &[Part]) -> String {
    parts.iter().filter_map(Part::as_text).collect()
}

/// Collects function responses in order.
///
/// The value is the payload's `output` field when the payload is an object that has
/// one, otherwise the whole payload; a null payload becomes `{}`.
pub fn extract_function_responses(parts: &[Part]) -> Vec<FunctionResponsePayload> {
    parts
        .iter()
        .filter_map(|p| match p {
            Part::FunctionResponse { name, response } => Some(FunctionResponsePayload {
                name: name.clone(),
                value: response_value(response),
            }),
            _ => None,
        })
        .collect()
}

fn response_value(response: &Value) -> Value {
    match response {
        Value::Object(map) => match map.get("output") {
            Some(output) => output.clone(),
            None => response.clone(),
        },
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn text_skips_non_text_parts() {
        let parts = vec![
            Part::text("Hello"),
            Part::function_call("f", Map::new()),
            Part::text(", world"),
        ];
        assert_eq!(extract_text(&parts), "Hello, world");
        assert_eq!(extract_text(&[]), "");
        assert_eq!(extract_text(&[Part::function_call("f", Map::new())]), "");
    }

    #[test]
    fn function_response_prefers_output_field() {
        let parts = vec![
            Part::text("ignored"),
            Part::function_response("read_file", json!({"output": "file body", "meta": 1})),
            Part::function_response("ls", json!({"entries": ["a", "b"]})),
            Part::function_response("noop", Value::Null),
            Part::function_response("count", json!(3)),
        ];

        let got = extract_function_responses(&parts);
        assert_eq!(got.len(), 4);
        assert_eq!(got[0].value, json!("file body"));
        assert_eq!(got[1].value, json!({"entries": ["a", "b"]}));
        assert_eq!(got[2].value, json!({}));
        assert_eq!(got[3].name, "count");
        assert_eq!(got[3].value, json!(3));
    }
}
