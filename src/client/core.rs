use crate::config::OllamaConfig;
use crate::embeddings::{EmbedContentRequest, EmbedContentResponse};
use crate::models::ModelDirectory;
use crate::protocol::build_prompt;
use crate::telemetry::{ErrorReport, ErrorReporter, Operation, REPORT_TIMEOUT};
use crate::tokens::TokenCounter;
use crate::transport::HttpTransport;
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::{BoxStream, Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tracing::warn;

/// Lazily pulled responses, one per decoded NDJSON record.
pub type ResponseStream = BoxStream<'static, GenerateContentResponse>;

/// Provider-agnostic content generation contract.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// One complete response.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;

    /// Single-pass stream of partial responses; the last one carries the finish reason
    /// and usage.
    async fn generate_content_stream(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream>;

    /// Rough prompt size; not a tokenizer.
    fn estimate_tokens(&self, request: &GenerateContentRequest) -> usize;

    async fn embed_content(&self, request: &EmbedContentRequest) -> Result<EmbedContentResponse>;

    /// Model ids a caller can pick from.
    async fn list_models(&self) -> Vec<String>;
}

/// Ollama content generator.
///
/// Holds only read-only configuration and shared handles; concurrent calls are
/// independent.
#[derive(Clone)]
pub struct OllamaClient {
    pub(crate) config: Arc<OllamaConfig>,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) directory: ModelDirectory,
    pub(crate) reporter: Arc<dyn ErrorReporter>,
    pub(crate) counter: Arc<dyn TokenCounter>,
}

impl OllamaClient {
    pub fn builder() -> crate::client::builder::OllamaClientBuilder {
        crate::client::builder::OllamaClientBuilder::new()
    }

    /// Build from `OLLAMA_*` environment variables, probing the server first.
    pub async fn from_env() -> Result<Self> {
        crate::client::builder::OllamaClientBuilder::from_env()
            .build()
            .await
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    pub fn host(&self) -> &str {
        self.transport.base_url()
    }

    /// The configured default model.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn models(&self) -> &ModelDirectory {
        &self.directory
    }

    /// The request's model when it names one, otherwise the configured default.
    pub(crate) fn model_for<'a>(&'a self, requested: &'a str) -> &'a str {
        let requested = requested.trim();
        if requested.is_empty() {
            &self.config.model
        } else {
            requested
        }
    }

    pub(crate) fn keep_alive(&self) -> Option<&str> {
        self.config.keep_alive.as_deref()
    }

    async fn report(&self, operation: Operation, context: &str, err: &Error, contents: &[Content]) {
        report_error(
            self.reporter.as_ref(),
            ErrorReport::new(operation, context, err, contents.to_vec()),
        )
        .await;
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("host", &self.transport.base_url())
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

pub(crate) async fn report_error(reporter: &dyn ErrorReporter, report: ErrorReport) {
    let operation = report.operation;
    match tokio::time::timeout(REPORT_TIMEOUT, reporter.report(report)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(operation = operation.tag(), error = %e, "error reporter failed"),
        Err(_) => warn!(
            operation = operation.tag(),
            timeout_ms = REPORT_TIMEOUT.as_millis() as u64,
            "error reporter timed out, report dropped"
        ),
    }
}

#[async_trait]
impl ContentGenerator for OllamaClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        match self.generate_once(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let err = e.into_generation();
                self.report(
                    Operation::Generate,
                    "Error generating content via Ollama",
                    &err,
                    &request.contents,
                )
                .await;
                Err(err)
            }
        }
    }

    async fn generate_content_stream(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream> {
        let responses = match self.open_stream(request).await {
            Ok(responses) => responses,
            Err(e) => {
                let err = e.into_streaming();
                self.report(
                    Operation::GenerateStream,
                    "Error opening Ollama content stream",
                    &err,
                    &request.contents,
                )
                .await;
                return Err(err);
            }
        };

        let reporter = self.reporter.clone();
        let contents = Arc::new(request.contents.clone());
        let stream = responses.then(move |item| {
            let reporter = reporter.clone();
            let contents = contents.clone();
            async move {
                match item {
                    Ok(response) => Ok(response),
                    Err(e) => {
                        let err = e.into_streaming();
                        report_error(
                            reporter.as_ref(),
                            ErrorReport::new(
                                Operation::GenerateStream,
                                "Error streaming content via Ollama",
                                &err,
                                contents.as_ref().clone(),
                            ),
                        )
                        .await;
                        Err(err)
                    }
                }
            }
        });
        Ok(Box::pin(stream))
    }

    fn estimate_tokens(&self, request: &GenerateContentRequest) -> usize {
        let parts = build_prompt(request, &self.config.prompt_style);
        self.counter.count(&parts.prompt)
    }

    async fn embed_content(&self, request: &EmbedContentRequest) -> Result<EmbedContentResponse> {
        match self.embed_once(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let err = e.into_embedding();
                self.report(
                    Operation::Embed,
                    "Error generating embeddings via Ollama",
                    &err,
                    &[],
                )
                .await;
                Err(err)
            }
        }
    }

    async fn list_models(&self) -> Vec<String> {
        self.directory.resolve_available_models().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FunctionDeclaration, Part, Role, Tool};

    async fn offline_client() -> OllamaClient {
        OllamaClient::builder()
            .host("http://127.0.0.1:9")
            .skip_probe(true)
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn estimate_uses_completion_prompt_even_with_tools() {
        let client = offline_client().await;
        let req = GenerateContentRequest::new(vec![Content::user("Hello world")]);
        assert_eq!(client.estimate_tokens(&req), 3);

        let with_tools = req.with_tools(vec![Tool::new(vec![FunctionDeclaration::new("f")])]);
        assert_eq!(client.estimate_tokens(&with_tools), 3);
    }

    #[tokio::test]
    async fn estimate_counts_transcript_markers() {
        let client = offline_client().await;
        let req = GenerateContentRequest::new(vec![
            Content::user("Hi"),
            Content::turn(Role::Model, vec![Part::text("Yo")]),
        ]);
        // "Hi\nAssistant: Yo\nHuman:" is 23 characters.
        assert_eq!(client.estimate_tokens(&req), 6);
    }

    #[tokio::test]
    async fn request_model_overrides_default() {
        let client = offline_client().await;
        assert_eq!(client.model_for(""), "llama3.2");
        assert_eq!(client.model_for("  "), "llama3.2");
        assert_eq!(client.model_for("mistral"), "mistral");
    }
}
