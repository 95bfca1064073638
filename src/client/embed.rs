use crate::client::core::OllamaClient;
use crate::embeddings::{EmbedContentRequest, EmbedContentResponse};
use crate::protocol::{EmbeddingsRequest, EmbeddingsResponse, EMBEDDINGS_PATH};
use crate::Result;
use tracing::debug;

impl OllamaClient {
    pub(crate) async fn embed_once(
        &self,
        request: &EmbedContentRequest,
    ) -> Result<EmbedContentResponse> {
        let model = self.model_for(request.model.as_deref().unwrap_or(""));
        let body = EmbeddingsRequest {
            model: model.to_string(),
            prompt: request.input.clone(),
            keep_alive: self.keep_alive().map(str::to_string),
        };
        debug!(
            model,
            endpoint = EMBEDDINGS_PATH,
            inputs = request.input.len(),
            "sending ollama embeddings request"
        );
        let wire: EmbeddingsResponse = self
            .transport
            .post_for_json(EMBEDDINGS_PATH, &body, request.cancel.as_ref())
            .await?;
        EmbedContentResponse::from_wire(wire, &request.input)
    }
}
