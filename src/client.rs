//! Adapter facade for a local Ollama server.
//!
//! [`OllamaClient`] implements [`ContentGenerator`], choosing `/api/generate` or
//! `/api/chat` per request. Implementation details are split into submodules under
//! `src/client/`.

pub mod builder;
pub mod core;
mod embed;
mod generate;
pub mod types;

pub use builder::OllamaClientBuilder;
pub use core::{ContentGenerator, OllamaClient, ResponseStream};
pub use types::CancelHandle;
