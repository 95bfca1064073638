//! Mock Ollama server fixture shared by the integration tests.

#![allow(dead_code)]

use ai_lib_ollama::telemetry::InMemoryErrorReporter;
use ai_lib_ollama::{OllamaClient, OllamaClientBuilder};
use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test fixture that manages a mock Ollama server.
pub struct MockOllama {
    pub server: ServerGuard,
    pub reporter: InMemoryErrorReporter,
}

impl MockOllama {
    pub async fn new() -> Self {
        init_tracing();
        Self {
            server: Server::new_async().await,
            reporter: InMemoryErrorReporter::default(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Builder pointed at the mock server, recording errors in `self.reporter`.
    pub fn builder(&self) -> OllamaClientBuilder {
        OllamaClientBuilder::new()
            .host(self.url())
            .error_reporter(Arc::new(self.reporter.clone()))
            .skip_probe(true)
    }

    pub async fn client(&self) -> OllamaClient {
        self.builder().build().await.expect("client builds")
    }

    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// One JSON object per line, newline-terminated.
    pub async fn mock_ndjson(&mut self, path: &str, lines: &[&str]) -> Mock {
        let body: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        self.server
            .mock("POST", path)
            .with_status(200)
            .with_header("content-type", "application/x-ndjson")
            .with_body(body)
            .create_async()
            .await
    }

    /// A mock that must never be hit.
    pub async fn forbid(&mut self, method: &str, path: &str) -> Mock {
        self.server
            .mock(method, path)
            .expect(0)
            .create_async()
            .await
    }
}
