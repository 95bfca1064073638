//! Embedding support.
//!
//! Requests always go to `POST /api/embeddings`; see
//! [`crate::ContentGenerator::embed_content`].

mod types;

pub use types::{EmbedContentRequest, EmbedContentResponse, EmbeddingInput};
