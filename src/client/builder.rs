use crate::client::core::OllamaClient;
use crate::config::{OllamaConfig, PromptStyle};
use crate::models::ModelDirectory;
use crate::telemetry::ErrorReporter;
use crate::tokens::{CharacterEstimator, TokenCounter};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// Builder for [`OllamaClient`].
///
/// `build()` validates the configuration and, unless [`skip_probe`](Self::skip_probe)
/// is set, fails fast with [`Error::Unavailable`] when the server does not answer
/// `GET /api/tags` within two seconds.
pub struct OllamaClientBuilder {
    config: OllamaConfig,
    reporter: Arc<dyn ErrorReporter>,
    counter: Arc<dyn TokenCounter>,
    skip_probe: bool,
}

impl OllamaClientBuilder {
    pub fn new() -> Self {
        Self::with_config(OllamaConfig::default())
    }

    /// Start from [`OllamaConfig::from_env`].
    pub fn from_env() -> Self {
        Self::with_config(OllamaConfig::from_env())
    }

    pub fn with_config(config: OllamaConfig) -> Self {
        Self {
            config,
            reporter: crate::telemetry::tracing_reporter(),
            counter: Arc::new(CharacterEstimator::new()),
            skip_probe: false,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Default model for requests that do not name one.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn recommended_models(mut self, models: Vec<String>) -> Self {
        self.config.recommended_models = models;
        self
    }

    pub fn prompt_style(mut self, style: PromptStyle) -> Self {
        self.config.prompt_style = style;
        self
    }

    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.config.keep_alive = Some(keep_alive.into());
        self
    }

    /// Inject an error reporter. Default logs through `tracing`.
    pub fn error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Skip the availability probe (offline construction, tests).
    pub fn skip_probe(mut self, skip: bool) -> Self {
        self.skip_probe = skip;
        self
    }

    pub async fn build(self) -> Result<OllamaClient> {
        let config = self.config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config.host)?);
        let directory = ModelDirectory::new(
            transport.clone(),
            config.model.clone(),
            config.recommended_models.clone(),
        );

        if !self.skip_probe && !directory.probe_availability().await {
            return Err(Error::Unavailable {
                host: config.host.clone(),
            });
        }

        info!(
            host = %config.host,
            model = %config.model,
            probed = !self.skip_probe,
            "ollama client ready"
        );

        Ok(OllamaClient {
            config: Arc::new(config),
            transport,
            directory,
            reporter: self.reporter,
            counter: self.counter,
        })
    }
}

impl Default for OllamaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_fails_fast_with_host_in_message() {
        // Port 9 (discard) is not an Ollama server.
        let err = OllamaClientBuilder::new()
            .host("http://127.0.0.1:9")
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Unavailable { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:9"));
    }

    #[tokio::test]
    async fn invalid_host_is_a_configuration_error() {
        let err = OllamaClientBuilder::new()
            .host("ftp://models.local")
            .skip_probe(true)
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn host_without_scheme_is_normalized() {
        let client = OllamaClientBuilder::new()
            .host("localhost:11434/")
            .model("mistral")
            .keep_alive("5m")
            .error_reporter(crate::telemetry::noop_reporter())
            .skip_probe(true)
            .build()
            .await
            .unwrap();
        assert_eq!(client.host(), "http://localhost:11434");
        assert_eq!(client.model(), "mistral");
        assert_eq!(client.config().keep_alive.as_deref(), Some("5m"));
    }
}
