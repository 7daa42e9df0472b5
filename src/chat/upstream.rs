//! HTTP upstream engine
//!
//! Forwards the raw protocol payload to a remote conversation service and
//! classifies its response by content type:
//!
//! ```text
//! POST /chatkit ──► HttpEngine ──► upstream_url
//!                                    │
//!     text/event-stream  ◄───────────┤  Streaming (relayed live)
//!     application/json   ◄───────────┤  Document (passed through)
//!     anything else      ◄───────────┘  Value
//! ```

use crate::chat::dispatch::{classify_content_type, ResultKind};
use crate::chat::engine::{ChatEngine, ChatResult, RequestContext};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use std::time::Duration;

/// Conversation engine reached over HTTP
pub struct HttpEngine {
    client: reqwest::Client,
    url: reqwest::Url,
    forward_headers: Vec<String>,
}

impl HttpEngine {
    /// Create an engine for the given upstream URL
    pub fn new(url: &str, connect_timeout: Duration, forward_headers: Vec<String>) -> Result<Self> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| Error::Config(format!("Invalid upstream URL '{}': {}", url, e)))?;

        // No overall timeout: streamed responses may stay open indefinitely
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            url,
            forward_headers,
        })
    }

    /// Build from configuration; `None` when no upstream is configured
    pub fn from_config(config: &EngineConfig) -> Result<Option<Self>> {
        match config.upstream_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(Some(Self::new(
                url.trim(),
                Duration::from_secs(config.connect_timeout_secs),
                config.forward_headers.clone(),
            )?)),
            _ => Ok(None),
        }
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn send(&self, payload: Bytes, ctx: &RequestContext) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);

        for name in &self.forward_headers {
            if let Some(value) = ctx.headers.get(name.as_str()).and_then(|v| v.to_str().ok()) {
                request = request.header(name.as_str(), value);
            }
        }

        let response = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                return Err(Error::UpstreamFailure("request cancelled".to_string()));
            }
            response = request.send() => response.map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    Error::UpstreamUnavailable(format!("{}: {}", self.url, e))
                } else {
                    Error::UpstreamFailure(e.to_string())
                }
            })?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(Error::UpstreamFailure(format!(
                "upstream returned {}: {}",
                status, preview
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatEngine for HttpEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn process(&self, payload: Bytes, ctx: RequestContext) -> Result<ChatResult> {
        let response = self.send(payload, &ctx).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match classify_content_type(content_type.as_deref()) {
            ResultKind::Streaming => {
                let events = response
                    .bytes_stream()
                    .map_err(|e| Error::UpstreamFailure(e.to_string()))
                    .boxed();
                Ok(ChatResult::Streaming(events))
            }
            ResultKind::Document => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| Error::UpstreamFailure(e.to_string()))?;
                Ok(ChatResult::Document(body))
            }
            ResultKind::Value => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| Error::UpstreamFailure(e.to_string()))?;
                let value = serde_json::from_slice(&body).unwrap_or_else(|_| {
                    serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
                });
                Ok(ChatResult::Value(value))
            }
        }
    }
}
