//! Request translation: abstract request -> Ollama request bodies.
//!
//! Two independent builders share the system-instruction and part-extraction logic:
//! [`build_prompt`] flattens the conversation for `/api/generate`, [`build_messages`]
//! keeps it as a message list for `/api/chat`.

use super::types::{
    ChatMessage, ChatRequest, ChatRole, CompletionRequest, Options, ToolSchema, ToolSchemaFunction,
};
use crate::config::PromptStyle;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Role, Tool};
use crate::utils::parts::{extract_function_responses, extract_text};
use serde_json::Value;
use tracing::debug;

/// Flattened prompt plus the separately-sent system text.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptParts {
    pub prompt: String,
    pub system: Option<String>,
}

/// Chat messages plus the tool schema list.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParts {
    pub messages: Vec<ChatMessage>,
    pub tools: Option<Vec<ToolSchema>>,
}

/// Flatten the conversation into a single completion prompt.
///
/// Bare strings and user turns contribute `"<text>\n"`; model turns follow `style`.
/// System and tool turns have no place in a completion transcript and are skipped.
/// The result is trimmed.
pub fn build_prompt(request: &GenerateContentRequest, style: &PromptStyle) -> PromptParts {
    let system = request
        .system_instruction
        .as_ref()
        .and_then(|si| si.resolve());

    let mut prompt = String::new();
    for content in &request.contents {
        match content {
            Content::Text(text) => {
                prompt.push_str(text);
                prompt.push('\n');
            }
            Content::Turn(turn) => match turn.role {
                Role::User => {
                    prompt.push_str(&extract_text(&turn.parts));
                    prompt.push('\n');
                }
                Role::Model => {
                    let text = extract_text(&turn.parts);
                    match style {
                        PromptStyle::Transcript {
                            assistant_prefix,
                            human_prefix,
                        } => {
                            prompt.push_str(assistant_prefix);
                            prompt.push_str(&text);
                            prompt.push('\n');
                            prompt.push_str(human_prefix);
                        }
                        PromptStyle::Plain => {
                            prompt.push_str(&text);
                            prompt.push('\n');
                        }
                    }
                }
                Role::System | Role::Tool => {}
            },
        }
    }

    PromptParts {
        prompt: prompt.trim().to_string(),
        system,
    }
}

/// Build the chat message list and tool schema.
///
/// Function responses in a turn take priority: each becomes its own `tool` message and
/// the turn's plain text is not sent. Turns that yield no content are dropped.
pub fn build_messages(request: &GenerateContentRequest) -> ChatParts {
    let mut messages = Vec::with_capacity(request.contents.len() + 1);

    if let Some(system) = request
        .system_instruction
        .as_ref()
        .and_then(|si| si.resolve())
    {
        messages.push(ChatMessage::new(ChatRole::System, system));
    }

    for content in &request.contents {
        let turn = match content {
            Content::Text(text) => {
                messages.push(ChatMessage::new(ChatRole::User, text.clone()));
                continue;
            }
            Content::Turn(turn) => turn,
        };

        let role = chat_role(turn.role);
        let responses = extract_function_responses(&turn.parts);
        let text = extract_text(&turn.parts);

        if !responses.is_empty() {
            if !text.is_empty() {
                debug!(
                    dropped_chars = text.len(),
                    "turn has function responses; its plain text is not sent"
                );
            }
            for r in responses {
                let content = match r.value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                messages.push(ChatMessage::new(ChatRole::Tool, content));
            }
        } else if !text.is_empty() {
            messages.push(ChatMessage::new(role, text));
        }
    }

    let tools = request.tools.as_deref().map(build_tools);

    ChatParts { messages, tools }
}

/// Declared functions in the chat `tools` shape.
pub fn build_tools(tools: &[Tool]) -> Vec<ToolSchema> {
    tools
        .iter()
        .flat_map(|t| t.function_declarations.iter())
        .map(|f| ToolSchema {
            tool_type: "function".to_string(),
            function: ToolSchemaFunction {
                name: f.name.clone(),
                description: f.description.clone().unwrap_or_default(),
                parameters: f
                    .parameters
                    .clone()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            },
        })
        .collect()
}

pub fn build_options(config: &GenerationConfig) -> Options {
    Options {
        temperature: config.temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        num_predict: config.max_output_tokens,
        stop: config.stop_sequences.clone(),
        seed: config.seed,
    }
}

/// Complete `/api/generate` body.
pub fn completion_request(
    model: &str,
    request: &GenerateContentRequest,
    style: &PromptStyle,
    stream: bool,
    keep_alive: Option<&str>,
) -> CompletionRequest {
    let PromptParts { prompt, system } = build_prompt(request, style);
    CompletionRequest {
        model: model.to_string(),
        prompt,
        system,
        stream,
        options: build_options(&request.config),
        keep_alive: keep_alive.map(str::to_string),
    }
}

/// Complete `/api/chat` body.
pub fn chat_request(
    model: &str,
    request: &GenerateContentRequest,
    stream: bool,
    keep_alive: Option<&str>,
) -> ChatRequest {
    let ChatParts { messages, tools } = build_messages(request);
    ChatRequest {
        model: model.to_string(),
        messages,
        tools,
        stream,
        options: build_options(&request.config),
        keep_alive: keep_alive.map(str::to_string),
    }
}

fn chat_role(role: Role) -> ChatRole {
    match role {
        Role::User => ChatRole::User,
        Role::Model => ChatRole::Assistant,
        Role::System => ChatRole::System,
        Role::Tool => ChatRole::Tool,
    }
}
