use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Component that raised the error (e.g., "http_transport", "model_directory")
    pub source: Option<String>,
    /// Additional context about the error (e.g., endpoint, model)
    pub details: Option<String>,
    /// HTTP status code when the error came from a backend reply
    pub status_code: Option<u16>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }
}

/// Unified error type for the Ollama adapter.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ollama backend not available: {0}")]
    Transport(#[from] TransportError),

    #[error("Ollama API error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response from Ollama: {0}")]
    InvalidResponse(String),

    #[error("Invalid arguments for tool call '{name}': {message}")]
    ToolArguments { name: String, message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Ollama is not available at {host}. Make sure Ollama is installed and running (`ollama serve`).")]
    Unavailable { host: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Failed to generate content with Ollama: {message}")]
    Generation {
        message: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to stream content from Ollama: {message}")]
    Streaming {
        message: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to generate embeddings with Ollama: {message}")]
    Embedding {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if let Some(status) = ctx.status_code {
        parts.push(format!("status: {}", status));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Wrap as a top-level "generation failed" error, keeping the original as `source`.
    pub fn into_generation(self) -> Self {
        Error::Generation {
            message: self.to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap as a top-level "streaming failed" error, keeping the original as `source`.
    pub fn into_streaming(self) -> Self {
        Error::Streaming {
            message: self.to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap as a top-level "embedding failed" error, keeping the original as `source`.
    pub fn into_embedding(self) -> Self {
        Error::Embedding {
            message: self.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost adapter error, looking through the top-level wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Generation { source, .. }
            | Error::Streaming { source, .. }
            | Error::Embedding { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Error::Cancelled)
    }

    /// HTTP status of a non-2xx backend reply, if that is what failed.
    pub fn status_code(&self) -> Option<u16> {
        match self.root() {
            Error::Remote { status, .. } => Some(*status),
            Error::Configuration { context, .. } => context.status_code,
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_keep_inner_message_and_source() {
        let inner = Error::Remote {
            status: 500,
            message: "model crashed".into(),
        };
        let wrapped = inner.into_generation();
        let text = wrapped.to_string();
        assert!(text.starts_with("Failed to generate content with Ollama"));
        assert!(text.contains("HTTP 500: model crashed"));
        assert_eq!(wrapped.status_code(), Some(500));
        assert!(std::error::Error::source(&wrapped).is_some());
    }

    #[test]
    fn cancelled_is_visible_through_wrapper() {
        let err = Error::Cancelled.into_streaming();
        assert!(err.is_cancelled());
        assert!(!Error::Cancelled.into_embedding().to_string().is_empty());
    }

    #[test]
    fn configuration_error_formats_context() {
        let err = Error::configuration_with_context(
            "unsupported scheme",
            ErrorContext::new()
                .with_details("ftp://host")
                .with_source("config"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: unsupported scheme (details: ftp://host, source: config)"
        );
        assert!(err.context().is_some());
    }
}
