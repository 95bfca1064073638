use crate::client::types::{run_cancellable, CancelHandle};
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::time::{Duration, Instant};
use tracing::debug;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url` (already validated, no trailing slash).
    ///
    /// Generation calls carry no client-side timeout; callers bound them with a
    /// [`CancelHandle`]. Only the connect phase is limited.
    pub fn new(base_url: &str) -> Result<Self> {
        let connect_timeout_secs = env::var("OLLAMA_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .pool_max_idle_per_host(
                env::var("OLLAMA_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and return the response once its status is known to be 2xx.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        cancel: Option<&CancelHandle>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path);
        let start = Instant::now();
        let resp = run_cancellable(cancel, async {
            self.client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| Error::Transport(TransportError::Http(e)))
        })
        .await?;

        debug!(
            http_status = resp.status().as_u16(),
            endpoint = path,
            duration_ms = start.elapsed().as_millis(),
            "ollama response headers received"
        );
        Self::check_status(resp).await
    }

    /// POST a JSON body and decode the whole JSON reply.
    pub async fn post_for_json<B, R>(
        &self,
        path: &str,
        body: &B,
        cancel: Option<&CancelHandle>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.post_json(path, body, cancel).await?;
        let bytes = run_cancellable(cancel, async {
            resp.bytes()
                .await
                .map_err(|e| Error::Transport(TransportError::Http(e)))
        })
        .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a JSON body and hand back the raw body as a byte stream.
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        cancel: Option<&CancelHandle>,
    ) -> Result<BoxStream<'static, Bytes>> {
        let resp = self.post_json(path, body, cancel).await?;
        let byte_stream = resp
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(Box::pin(byte_stream))
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let resp = Self::check_status(resp).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET `path` with a hard timeout; true only for a 2xx reply.
    pub async fn probe(&self, path: &str, timeout: Duration) -> bool {
        match self.client.get(self.url(path)).timeout(timeout).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(endpoint = path, error = %e, "ollama probe failed");
                false
            }
        }
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Remote {
            status: status.as_u16(),
            message: error_message_from_body(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
        })
    }
}

/// Ollama replies `{"error": "..."}` on failure; fall back to the raw body text.
fn error_message_from_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let from_json = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
    Some(from_json.unwrap_or_else(|| trimmed.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
