//! # ai-lib-ollama
//!
//! 面向本地 Ollama 服务的内容生成适配器：在同一个与厂商无关的接口后面，统一 completion 与 chat 两套协议。
//!
//! Content-generator adapter for a local Ollama server. It lets a provider-agnostic
//! "generate content" interface (multi-turn conversations with typed parts, tool
//! declarations, streaming, token accounting) talk to the two wire protocols Ollama
//! exposes: the single-prompt `/api/generate` endpoint and the multi-message
//! `/api/chat` endpoint with tool calling.
//!
//! ## Overview
//!
//! - **Path selection**: requests without tool declarations go to `/api/generate`,
//!   requests with at least one declaration go to `/api/chat`
//! - **Streaming**: newline-delimited JSON is decoded incrementally; a malformed line is
//!   logged and skipped, never fatal
//! - **Tool calling**: Ollama tool-call arguments arrive either as a JSON string or as an
//!   object; both become structured `FunctionCall` parts
//! - **Model discovery**: installed models are listed from `/api/tags`, with a fixed
//!   recommended list as fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_lib_ollama::{Content, ContentGenerator, GenerateContentRequest, OllamaClient};
//!
//! #[tokio::main]
//! async fn main() -> ai_lib_ollama::Result<()> {
//!     let client = OllamaClient::builder()
//!         .host("http://localhost:11434")
//!         .model("llama3.2")
//!         .build()
//!         .await?;
//!
//!     let request = GenerateContentRequest::new(vec![Content::user("Hello!")]);
//!     let response = client.generate_content(&request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Provider-agnostic request/response model |
//! | [`protocol`] | Ollama wire shapes and request translation |
//! | [`pipeline`] | NDJSON decoding and response mapping |
//! | [`client`] | The adapter facade and its builder |
//! | [`models`] | Model inventory, selection and liveness probe |
//! | [`embeddings`] | Embedding request/response types |
//! | [`tokens`] | Token estimation |
//! | [`telemetry`] | Error-reporting sinks |

pub mod client;
pub mod config;
pub mod embeddings;
pub mod models;
pub mod pipeline;
pub mod protocol;
pub mod telemetry;
pub mod tokens;
pub mod transport;
pub mod types;
pub mod utils;

pub use client::{CancelHandle, ContentGenerator, OllamaClient, OllamaClientBuilder, ResponseStream};
pub use config::{OllamaConfig, PromptStyle};
pub use embeddings::{EmbedContentRequest, EmbedContentResponse, EmbeddingInput};
pub use models::{ModelDirectory, ModelInfo};
pub use telemetry::{ErrorReport, ErrorReporter, Operation};
pub use types::{
    Candidate, Content, FinishReason, FunctionDeclaration, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part, Role, SystemInstruction, Tool, Turn,
    UsageMetadata,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
