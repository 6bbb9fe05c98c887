/*!
 * Provider implementations for different translation backends.
 *
 * This module contains client implementations for the supported backends:
 * - Google: the public Google Translate web endpoint
 * - Ollama: Local LLM server
 * - Mock: deterministic in-process backend for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// A provider is configured once with a fixed language pair and then only
/// translates single lines of text. It may fail by returning an error or by
/// returning `Ok(None)`; callers treat both as recoverable.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human readable backend name
    fn name(&self) -> &str;

    /// Translate one line of (placeholder-protected) text
    ///
    /// # Arguments
    /// * `text` - The text to translate
    ///
    /// # Returns
    /// * `Ok(Some(translation))`, `Ok(None)` when the backend produced no result, or an error
    async fn translate(&self, text: &str) -> Result<Option<String>, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

pub mod google;
pub mod mock;
pub mod ollama;

/// Spaces out consecutive requests to honor a requests-per-minute limit
#[derive(Debug)]
pub(crate) struct RequestPacer {
    /// Minimum gap between two requests
    min_interval: Option<std::time::Duration>,
    /// When the previous request was sent
    last_request: tokio::sync::Mutex<Option<tokio::time::Instant>>,
}

impl RequestPacer {
    /// Create a pacer for an optional requests-per-minute limit (`None` or 0 disables pacing)
    pub(crate) fn new(rate_limit: Option<u32>) -> Self {
        let min_interval = rate_limit
            .filter(|rpm| *rpm > 0)
            .map(|rpm| std::time::Duration::from_millis(60_000 / rpm as u64));
        Self {
            min_interval,
            last_request: tokio::sync::Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed
    pub(crate) async fn wait(&self) {
        let Some(interval) = self.min_interval else {
            return;
        };
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + interval;
            if ready_at > tokio::time::Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(tokio::time::Instant::now());
    }
}

/// Exponential backoff: `base * 2^attempt`
pub(crate) fn backoff_delay(base_ms: u64, attempt: u32) -> std::time::Duration {
    std::time::Duration::from_millis(base_ms.saturating_mul(1u64 << attempt.min(16)))
}
