//! Conversation contents: turns and their parts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Model,
    System,
    Tool,
}

/// A single piece of a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    FunctionCall {
        name: String,
        #[serde(default)]
        args: Map<String, Value>,
    },
    FunctionResponse {
        name: String,
        #[serde(default)]
        response: Value,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    pub fn function_call(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Part::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Part::FunctionResponse {
            name: name.into(),
            response,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// A role-tagged turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One entry of the conversation, decided once at ingestion.
///
/// A bare string carries no role; the translators treat it as user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Turn(Turn),
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::turn(Role::User, vec![Part::text(text)])
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::turn(Role::Model, vec![Part::text(text)])
    }

    pub fn turn(role: Role, parts: Vec<Part>) -> Self {
        Content::Turn(Turn { role, parts })
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Content::Text(_) => None,
            Content::Turn(t) => Some(t.role),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

/// System instruction (plain string or parts whose text gets joined)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SystemInstruction {
    Text(String),
    Parts(Vec<Part>),
}

impl SystemInstruction {
    /// The instruction as plain text, `None` when it resolves to an empty string.
    pub fn resolve(&self) -> Option<String> {
        let text = match self {
            SystemInstruction::Text(t) => t.clone(),
            SystemInstruction::Parts(parts) => crate::utils::parts::extract_text(parts),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<&str> for SystemInstruction {
    fn from(text: &str) -> Self {
        SystemInstruction::Text(text.to_string())
    }
}

impl From<String> for SystemInstruction {
    fn from(text: String) -> Self {
        SystemInstruction::Text(text)
    }
}

impl From<Vec<Part>> for SystemInstruction {
    fn from(parts: Vec<Part>) -> Self {
        SystemInstruction::Parts(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_deserializes_both_shapes() {
        let contents: Vec<Content> = serde_json::from_value(json!([
            "plain prompt",
            {"role": "assistant", "parts": [{"text": "hi"}]},
            {"role": "tool", "parts": [{"functionResponse": {"name": "f", "response": {"output": 1}}}]}
        ]))
        .unwrap();

        assert_eq!(contents[0], Content::Text("plain prompt".into()));
        assert_eq!(contents[1].role(), Some(Role::Model));
        assert_eq!(
            contents[2],
            Content::turn(Role::Tool, vec![Part::function_response("f", json!({"output": 1}))])
        );
    }

    #[test]
    fn system_instruction_resolves_parts() {
        let si = SystemInstruction::from(vec![
            Part::text("Be "),
            Part::function_call("ignored", Map::new()),
            Part::text("brief."),
        ]);
        assert_eq!(si.resolve().as_deref(), Some("Be brief."));
        assert_eq!(SystemInstruction::from("").resolve(), None);
    }
}
