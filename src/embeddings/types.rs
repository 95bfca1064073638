//! Embedding types and data structures.

use crate::client::CancelHandle;
use crate::protocol::EmbeddingsResponse;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single text or a batch; serialized as a string or a string array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Request for generating embeddings.
#[derive(Debug, Clone)]
pub struct EmbedContentRequest {
    /// Model id; `None` means the client's configured model
    pub model: Option<String>,
    pub input: EmbeddingInput,
    pub cancel: Option<CancelHandle>,
}

impl EmbedContentRequest {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            model: None,
            input: EmbeddingInput::Single(text.into()),
            cancel: None,
        }
    }

    pub fn batch(texts: Vec<String>) -> Self {
        Self {
            model: None,
            input: EmbeddingInput::Batch(texts),
            cancel: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// One vector per input text, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedContentResponse {
    pub embeddings: Vec<Vec<f32>>,
}

impl EmbedContentResponse {
    pub fn first(&self) -> Option<&[f32]> {
        self.embeddings.first().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Accepts the batch shape (`embeddings`) for any input, and the single shape
    /// (`embedding`) only when exactly one text was sent.
    pub(crate) fn from_wire(wire: EmbeddingsResponse, input: &EmbeddingInput) -> Result<Self> {
        match (wire.embeddings, wire.embedding) {
            (Some(embeddings), _) => Ok(Self { embeddings }),
            (None, Some(embedding)) if input.len() == 1 => Ok(Self {
                embeddings: vec![embedding],
            }),
            (None, Some(_)) => Err(Error::InvalidResponse(format!(
                "single embedding returned for {} input texts",
                input.len()
            ))),
            (None, None) => Err(Error::InvalidResponse(
                "embeddings reply carries neither 'embedding' nor 'embeddings'".to_string(),
            )),
        }
    }
}
