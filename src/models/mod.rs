//! 模型目录：查询已安装模型、按偏好顺序选择模型、探测 Ollama 是否在线。
//!
//! # Model Directory
//!
//! Everything here goes through `GET /api/tags`:
//!
//! - [`ModelDirectory::list_models`]: full inventory records, errors propagate
//! - [`ModelDirectory::list_installed_models`]: names only, empty on any failure
//! - [`ModelDirectory::resolve_available_models`]: installed names, or the recommended list
//! - [`ModelDirectory::resolve_best_model`]: never fails, never empty
//! - [`ModelDirectory::probe_availability`]: liveness with a 2 second ceiling

use crate::protocol::{TagsResponse, TAGS_PATH};
use crate::transport::HttpTransport;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "llama3.2";

/// Preference order used for model selection and as the offline inventory.
pub const DEFAULT_RECOMMENDED_MODELS: &[&str] = &[
    "llama3.2",
    "llama3.1",
    "qwen2.5-coder",
    "mistral",
    "codellama",
    "phi3",
    "gemma2",
];

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// One entry of the `/api/tags` inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Clone)]
pub struct ModelDirectory {
    transport: Arc<HttpTransport>,
    default_model: String,
    recommended: Vec<String>,
}

impl ModelDirectory {
    pub fn new(
        transport: Arc<HttpTransport>,
        default_model: impl Into<String>,
        recommended: Vec<String>,
    ) -> Self {
        Self {
            transport,
            default_model: default_model.into(),
            recommended,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn recommended_models(&self) -> &[String] {
        &self.recommended
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let tags: TagsResponse = self.transport.get_json(TAGS_PATH).await?;
        Ok(tags.models)
    }

    /// Installed model names. Advisory: failures are logged and yield an empty list.
    pub async fn list_installed_models(&self) -> Vec<String> {
        match self.list_models().await {
            Ok(models) => models.into_iter().map(|m| m.name).collect(),
            Err(e) => {
                warn!(
                    host = self.transport.base_url(),
                    error = %e,
                    "failed to list installed Ollama models"
                );
                Vec::new()
            }
        }
    }

    pub async fn resolve_available_models(&self) -> Vec<String> {
        let installed = self.list_installed_models().await;
        if installed.is_empty() {
            debug!("no installed models reported, using recommended list");
            self.recommended.clone()
        } else {
            installed
        }
    }

    pub async fn resolve_best_model(&self) -> String {
        let available = self.resolve_available_models().await;
        select_best_model(&available, &self.default_model, &self.recommended)
    }

    pub async fn probe_availability(&self) -> bool {
        self.transport.probe(TAGS_PATH, PROBE_TIMEOUT).await
    }
}

/// Ollama lists `llama3.2` as `llama3.2:latest`; both name the same model.
fn same_model(a: &str, b: &str) -> bool {
    a.strip_suffix(":latest").unwrap_or(a) == b.strip_suffix(":latest").unwrap_or(b)
}

/// Pick a model from `available`.
///
/// Order: the default if available, then the first recommended model that is
/// available, then the first available model, then the default itself.
pub fn select_best_model(available: &[String], default: &str, recommended: &[String]) -> String {
    let is_available = |candidate: &str| available.iter().any(|m| same_model(m, candidate));

    if is_available(default) {
        return default.to_string();
    }
    if let Some(found) = recommended.iter().find(|r| is_available(r)) {
        return found.clone();
    }
    available
        .first()
        .cloned()
        .unwrap_or_else(|| default.to_string())
}
