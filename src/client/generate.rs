//! Generation paths: `/api/generate` for plain requests, `/api/chat` once tools are declared.

use crate::client::core::{OllamaClient, ResponseStream};
use crate::pipeline::{
    decode_stream, map_chat_record, map_chat_stream, map_completion, map_completion_stream,
};
use crate::protocol::{
    chat_request, completion_request, ChatRecord, CompletionRecord, CHAT_PATH, GENERATE_PATH,
};
use crate::types::{GenerateContentRequest, GenerateContentResponse};
use crate::Result;
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

impl OllamaClient {
    pub(crate) async fn generate_once(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let request_id = Uuid::new_v4().to_string();
        let model = self.model_for(&request.model);
        let cancel = request.cancel.as_ref();
        let start = Instant::now();

        let response = if request.has_tool_declarations() {
            let body = chat_request(model, request, false, self.keep_alive());
            debug!(
                request_id = %request_id,
                model,
                endpoint = CHAT_PATH,
                messages = body.messages.len(),
                tools = body.tools.as_ref().map_or(0, Vec::len),
                "sending ollama chat request"
            );
            let record: ChatRecord = self.transport.post_for_json(CHAT_PATH, &body, cancel).await?;
            map_chat_record(record)?
        } else {
            let body = completion_request(
                model,
                request,
                &self.config.prompt_style,
                false,
                self.keep_alive(),
            );
            debug!(
                request_id = %request_id,
                model,
                endpoint = GENERATE_PATH,
                prompt_chars = body.prompt.chars().count(),
                has_system = body.system.is_some(),
                "sending ollama completion request"
            );
            let record: CompletionRecord = self
                .transport
                .post_for_json(GENERATE_PATH, &body, cancel)
                .await?;
            map_completion(record)
        };

        info!(
            request_id = %request_id,
            model,
            duration_ms = start.elapsed().as_millis(),
            finish_reason = ?response.finish_reason(),
            total_tokens = response.usage_metadata.map(|u| u.total_token_count),
            "ollama generation complete"
        );
        Ok(response)
    }

    pub(crate) async fn open_stream(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream> {
        let request_id = Uuid::new_v4().to_string();
        let model = self.model_for(&request.model);
        let cancel = request.cancel.as_ref();

        if request.has_tool_declarations() {
            let body = chat_request(model, request, true, self.keep_alive());
            debug!(
                request_id = %request_id,
                model,
                endpoint = CHAT_PATH,
                messages = body.messages.len(),
                "opening ollama chat stream"
            );
            let bytes = self.transport.post_stream(CHAT_PATH, &body, cancel).await?;
            let records = decode_stream::<ChatRecord>(bytes, request.cancel.clone());
            Ok(log_completion(map_chat_stream(records), request_id, model))
        } else {
            let body = completion_request(
                model,
                request,
                &self.config.prompt_style,
                true,
                self.keep_alive(),
            );
            debug!(
                request_id = %request_id,
                model,
                endpoint = GENERATE_PATH,
                prompt_chars = body.prompt.chars().count(),
                "opening ollama completion stream"
            );
            let bytes = self
                .transport
                .post_stream(GENERATE_PATH, &body, cancel)
                .await?;
            let records = decode_stream::<CompletionRecord>(bytes, request.cancel.clone());
            Ok(log_completion(map_completion_stream(records), request_id, model))
        }
    }
}

/// Logs the final (`done`) response of a stream as it passes through.
fn log_completion(responses: ResponseStream, request_id: String, model: &str) -> ResponseStream {
    let model = model.to_string();
    let start = Instant::now();
    Box::pin(responses.inspect(move |item| {
        if let Ok(response) = item {
            if response.finish_reason().is_some() {
                info!(
                    request_id = %request_id,
                    model = %model,
                    duration_ms = start.elapsed().as_millis(),
                    total_tokens = response.usage_metadata.map(|u| u.total_token_count),
                    "ollama stream complete"
                );
            }
        }
    }))
}
