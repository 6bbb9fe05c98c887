use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, RequestPacer, backoff_delay};

/// Default host of the public Google Translate web endpoint
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com";

/// Google Translate client bound to one language pair
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint base URL
    endpoint: String,
    /// Source language code
    source_language: String,
    /// Target language code
    target_language: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Request pacing
    pacer: RequestPacer,
}

impl GoogleTranslate {
    /// Create a client with default retry settings
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self::new_with_config(
            source_language,
            target_language,
            DEFAULT_GOOGLE_ENDPOINT,
            30,
            3,
            1000,
            None,
        )
    }

    /// Create a client with explicit endpoint, timeout, retry and rate limit settings
    pub fn new_with_config(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            DEFAULT_GOOGLE_ENDPOINT.to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint,
            source_language: source_language.into(),
            target_language: target_language.into(),
            max_retries,
            backoff_base_ms,
            pacer: RequestPacer::new(rate_limit),
        }
    }

    /// Send one request, without retrying
    async fn request(&self, text: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/translate_a/single", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_language.as_str()),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(format!(
                "Google Translate answered {}",
                status
            )));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract the translated text from a `translate_a/single` response.
    ///
    /// The payload is a nested array whose first element lists the translated
    /// segments; the first item of each segment is the translated chunk.
    pub fn extract_text(response: &Value) -> Result<Option<String>, ProviderError> {
        let segments = match response.get(0) {
            Some(Value::Array(segments)) => segments,
            Some(Value::Null) => return Ok(None),
            _ => {
                return Err(ProviderError::ParseError(
                    "unexpected Google Translate payload".to_string(),
                ));
            }
        };

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        Ok((!text.is_empty()).then_some(text))
    }
}

fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) | ProviderError::RateLimitExceeded(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        _ => false,
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str) -> Result<Option<String>, ProviderError> {
        let mut attempt = 0;
        loop {
            self.pacer.wait().await;

            match self.request(text).await {
                Ok(payload) => return Self::extract_text(&payload),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    let delay = backoff_delay(self.backoff_base_ms, attempt);
                    warn!("Google Translate request failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(
                        "Google Translate request failed after {} attempt(s): {}",
                        attempt + 1,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.request("Hello").await.map(|_| ())
    }
}
