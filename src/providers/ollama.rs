use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, RequestPacer, backoff_delay};

/// Instruction appended to every prompt so the model leaves protected spans alone
const TOKEN_INSTRUCTION: &str = "Tokens of the form __PH_0__, __PH_1__ and so on are \
     placeholders: copy them unchanged. Reply with the translation only.";

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name to use for generation
    model: String,
    /// System prompt with the language pair filled in
    system_prompt: String,
    /// Sampling temperature
    temperature: f32,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Request pacing
    pacer: RequestPacer,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: None,
        }
    }

    /// Set the system message
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions { temperature: Some(temperature) });
        self
    }

    /// Disable streaming
    pub fn no_stream(mut self) -> Self {
        self.stream = Some(false);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client
    ///
    /// `system_prompt` may contain `{source_language}` and `{target_language}`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_config(
        base_url: impl Into<String>,
        model: impl Into<String>,
        system_prompt: &str,
        source_language: &str,
        target_language: &str,
        temperature: f32,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Force HTTP/1.1 - Ollama uses HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            model: model.into(),
            system_prompt: render_system_prompt(system_prompt, source_language, target_language),
            temperature,
            max_retries,
            backoff_base_ms,
            pacer: RequestPacer::new(rate_limit),
        }
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let mut attempt = 0;

        loop {
            self.pacer.wait().await;

            let result = match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        response
                            .json::<GenerationResponse>()
                            .await
                            .map_err(|e| ProviderError::ParseError(e.to_string()))
                    } else {
                        let message = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        })
                    }
                }
                Err(e) => Err(ProviderError::ConnectionError(e.to_string())),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    let delay = backoff_delay(self.backoff_base_ms, attempt);
                    warn!("Ollama request failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Ollama request failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}

fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500 || *status_code == 429,
        _ => false,
    }
}

/// Fill the language pair into a system prompt template
pub fn render_system_prompt(
    template: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    format!(
        "{} {}",
        template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language),
        TOKEN_INSTRUCTION
    )
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn translate(&self, text: &str) -> Result<Option<String>, ProviderError> {
        let request = GenerationRequest::new(&self.model, text)
            .system(&self.system_prompt)
            .temperature(self.temperature)
            .no_stream();

        let response = self.generate(&request).await?;
        let translated = response.response.trim();
        if translated.is_empty() {
            Ok(None)
        } else {
            Ok(Some(translated.to_string()))
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "Ollama server is not reachable".to_string(),
            })
        }
    }
}
