//! Backend records -> unified responses
//!
//! The two Ollama protocols finish differently:
//! - `/api/generate` without streaming: `done=false` maps to `MAX_TOKENS`
//! - `/api/generate` streaming and `/api/chat`: `done=false` leaves the finish reason unset
//!
//! Usage metadata is attached to every non-streaming completion, and otherwise only to
//! the `done` record.

use crate::protocol::{ChatRecord, CompletionRecord, ToolArguments, WireToolCall};
use crate::types::{Candidate, FinishReason, GenerateContentResponse, Part, UsageMetadata};
use crate::{BoxStream, Error, Result};
use futures::{future, stream, StreamExt};
use serde_json::{Map, Value};
use tracing::warn;

fn single(candidate: Candidate, usage: Option<UsageMetadata>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![candidate],
        usage_metadata: usage,
    }
}

fn final_usage(done: bool, prompt: Option<u32>, output: Option<u32>) -> Option<UsageMetadata> {
    done.then(|| UsageMetadata::from_counts(prompt, output))
}

fn streaming_finish(done: bool) -> Option<FinishReason> {
    done.then_some(FinishReason::Stop)
}

/// Non-streaming `/api/generate` reply.
pub fn map_completion(record: CompletionRecord) -> GenerateContentResponse {
    let finish = if record.done {
        FinishReason::Stop
    } else {
        // A well-behaved backend never sends this without streaming.
        warn!(
            done_reason = record.done_reason.as_deref().unwrap_or(""),
            "non-streaming completion reply without done=true, reporting MAX_TOKENS"
        );
        FinishReason::MaxTokens
    };
    let usage = UsageMetadata::from_counts(record.prompt_eval_count, record.eval_count);
    single(
        Candidate::new(vec![Part::text(record.response)], Some(finish)),
        Some(usage),
    )
}

/// One streamed `/api/generate` line.
pub fn map_completion_chunk(record: CompletionRecord) -> GenerateContentResponse {
    let usage = final_usage(record.done, record.prompt_eval_count, record.eval_count);
    single(
        Candidate::new(
            vec![Part::text(record.response)],
            streaming_finish(record.done),
        ),
        usage,
    )
}

/// One `/api/chat` reply, whole or streamed.
///
/// String-encoded tool arguments must parse to a JSON object; anything else is an
/// [`Error::ToolArguments`].
pub fn map_chat_record(record: ChatRecord) -> Result<GenerateContentResponse> {
    let mut parts = Vec::new();
    if let Some(message) = record.message {
        if !message.content.is_empty() {
            parts.push(Part::text(message.content));
        }
        for call in message.tool_calls.unwrap_or_default() {
            parts.push(function_call_part(call)?);
        }
    }
    let usage = final_usage(record.done, record.prompt_eval_count, record.eval_count);
    Ok(single(
        Candidate::new(parts, streaming_finish(record.done)),
        usage,
    ))
}

fn function_call_part(call: WireToolCall) -> Result<Part> {
    let name = call.function.name;
    let args = match call.function.arguments {
        ToolArguments::Structured(map) => map,
        ToolArguments::Encoded(raw) => parse_arguments(&name, &raw)?,
    };
    Ok(Part::function_call(name, args))
}

fn parse_arguments(name: &str, raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::ToolArguments {
            name: name.to_string(),
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(Error::ToolArguments {
            name: name.to_string(),
            message: e.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn map_completion_stream(
    records: BoxStream<'static, CompletionRecord>,
) -> BoxStream<'static, GenerateContentResponse> {
    Box::pin(records.map(|r| r.map(map_completion_chunk)))
}

pub fn map_chat_stream(
    records: BoxStream<'static, ChatRecord>,
) -> BoxStream<'static, GenerateContentResponse> {
    // A bad tool call is terminal: nothing after it is yielded.
    Box::pin(records.scan(false, |failed, record| {
        if *failed {
            return future::ready(None);
        }
        let item = record.and_then(map_chat_record);
        *failed = item.is_err();
        future::ready(Some(item))
    }))
}
