// src/source/remote.rs
//! Embedded-mode source: one HTTP GET against a configured endpoint returning
//! a JSON array of `{id, title, body, created_at, expires_at?}` objects.

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use sha2::{Digest, Sha256};

use crate::message::Message;
use crate::source::{sanitize_batch, FetchError, MessageSource};

/// Transport parameters for the remote endpoint. Supplied once at
/// construction, immutable afterward.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Empty means remote fetching is disabled.
    pub url: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

pub struct RemoteSource {
    cfg: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteSource {
    pub fn new(cfg: RemoteConfig) -> Self {
        Self {
            cfg,
            client: reqwest::Client::new(),
        }
    }

    async fn attempt(&self) -> Result<Vec<Message>, FetchError> {
        let resp = self
            .client
            .get(&self.cfg.url)
            .timeout(Duration::from_millis(self.cfg.timeout_ms))
            .send()
            .await
            .map_err(|e| classify_transport(&e, self.cfg.timeout_ms))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Unreachable(format!("http status {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| classify_transport(&e, self.cfg.timeout_ms))?;

        let raw: Vec<Message> = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
        Ok(sanitize_batch(raw))
    }
}

fn classify_transport(e: &reqwest::Error, timeout_ms: u64) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(timeout_ms)
    } else {
        FetchError::Unreachable(e.to_string())
    }
}

/// Timeouts, connection failures and 5xx are worth a retry; a body we cannot
/// decode is not going to improve on the next attempt.
fn is_transient(e: &FetchError) -> bool {
    match e {
        FetchError::Timeout(_) => true,
        FetchError::Unreachable(msg) => !msg.starts_with("http status 4"),
        _ => false,
    }
}

#[async_trait]
impl MessageSource for RemoteSource {
    async fn fetch(&self) -> Result<Vec<Message>, FetchError> {
        if self.cfg.url.is_empty() {
            return Err(FetchError::EmptyConfig);
        }

        let mut last_err = None;
        for attempt in 0..=self.cfg.max_retries {
            if attempt > 0 {
                // Short linear backoff between retries.
                tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
            }
            match self.attempt().await {
                Ok(messages) => {
                    counter!("relay_fetch_total").increment(1);
                    return Ok(messages);
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, url = %self.cfg.url, "remote fetch attempt failed");
                    counter!("relay_fetch_errors_total").increment(1);
                    let transient = is_transient(&e);
                    last_err = Some(e);
                    if !transient {
                        break;
                    }
                }
            }
        }

        // The loop ran at least once, so an error is always recorded here.
        Err(last_err.unwrap_or(FetchError::EmptyConfig))
    }

    fn name(&self) -> &'static str {
        "remote"
    }

    fn source_key(&self) -> String {
        let digest = Sha256::digest(self.cfg.url.as_bytes());
        let mut hex = String::with_capacity(16);
        for b in &digest[..8] {
            hex.push_str(&format!("{b:02x}"));
        }
        format!("remote:{hex}")
    }
}
