//! 配置模块：Ollama 主机、默认模型、推荐模型列表与 prompt 风格。
//!
//! Adapter configuration.
//!
//! Everything the adapter needs is injected through [`OllamaConfig`]; nothing reads
//! ambient globals after construction. [`OllamaConfig::from_env`] is a convenience for
//! the usual `OLLAMA_HOST` / `OLLAMA_MODEL` variables.

use crate::models::{DEFAULT_MODEL, DEFAULT_RECOMMENDED_MODELS};
use crate::{Error, ErrorContext, Result};

pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// How model turns are rendered into the flat `/api/generate` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStyle {
    /// `"<assistant_prefix><text>\n<human_prefix>"` after each model turn, leaving the
    /// transcript open for the next human turn.
    Transcript {
        assistant_prefix: String,
        human_prefix: String,
    },
    /// Model turns are appended like user turns: `"<text>\n"`.
    Plain,
}

impl Default for PromptStyle {
    fn default() -> Self {
        PromptStyle::Transcript {
            assistant_prefix: "Assistant: ".to_string(),
            human_prefix: "Human: ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    pub host: String,
    /// Model used when a request does not name one
    pub model: String,
    /// Ordered preference list for model selection and the offline fallback inventory
    pub recommended_models: Vec<String>,
    pub prompt_style: PromptStyle,
    /// Forwarded as `keep_alive` (e.g. "5m", "-1")
    pub keep_alive: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            recommended_models: DEFAULT_RECOMMENDED_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            prompt_style: PromptStyle::default(),
            keep_alive: None,
        }
    }
}

impl OllamaConfig {
    /// Defaults overridden by `OLLAMA_HOST`, `OLLAMA_MODEL` and `OLLAMA_KEEP_ALIVE`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(host) = var("OLLAMA_HOST") {
            config.host = host;
        }
        if let Some(model) = var("OLLAMA_MODEL") {
            config.model = model;
        }
        config.keep_alive = var("OLLAMA_KEEP_ALIVE");
        config
    }

    /// Normalize and check the configuration.
    ///
    /// A host without scheme gets `http://`; trailing slashes are removed.
    pub fn validate(mut self) -> Result<Self> {
        let host = self.host.trim().trim_end_matches('/').to_string();
        let host = if host.contains("://") {
            host
        } else {
            format!("http://{}", host)
        };

        let parsed = url::Url::parse(&host).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid Ollama host URL: {}", e),
                ErrorContext::new()
                    .with_details(host.clone())
                    .with_source("ollama_config"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported URL scheme '{}'", parsed.scheme()),
                ErrorContext::new()
                    .with_details(host)
                    .with_source("ollama_config"),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "default model must not be empty",
                ErrorContext::new().with_source("ollama_config"),
            ));
        }

        self.host = host;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults_and_ignores_blank_values() {
        let vars: HashMap<&str, &str> = [
            ("OLLAMA_HOST", "http://gpu-box:11434"),
            ("OLLAMA_MODEL", "  "),
            ("OLLAMA_KEEP_ALIVE", "10m"),
        ]
        .into_iter()
        .collect();

        let config = OllamaConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.host, "http://gpu-box:11434");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.keep_alive.as_deref(), Some("10m"));
        assert_eq!(config.recommended_models.len(), DEFAULT_RECOMMENDED_MODELS.len());
    }

    #[test]
    fn validate_normalizes_host() {
        let config = OllamaConfig {
            host: "127.0.0.1:11434/".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(config.host, "http://127.0.0.1:11434");
    }

    #[test]
    fn validate_rejects_bad_scheme_and_empty_model() {
        let err = OllamaConfig {
            host: "ftp://example.com".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme 'ftp'"));

        let err = OllamaConfig {
            model: String::new(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
