//! Gemini backend implementation
//!
//! HTTP client for the generative language API:
//! `POST {base}/models/{model}:generateContent?key={api_key}`.
//! Only the first candidate's first text part is read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};

use super::types::GenerationConfig;
use super::AIBackend;

/// Prompt used by `health_check`
const PING_PROMPT: &str = "Reply with the single word OK.";

/// Gemini backend
///
/// A backend without an API key is valid but unconfigured: `is_configured`
/// returns false and `generate` fails without touching the network.
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    generation: GenerationConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        let defaults = GeminiConfig::default();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            timeout: defaults.timeout,
            generation: GenerationConfig::default(),
        }
    }

    pub fn from_config(config: &GeminiConfig, generation: GenerationConfig) -> Self {
        Self::new(&config.base_url, &config.model, config.api_key.as_deref())
            .with_timeout(config.timeout)
            .with_generation(generation)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }
}

/// Request to the generateContent endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response from the generateContent endpoint
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait]
impl AIBackend for GeminiBackend {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::NotConfigured("GEMINI_API_KEY is not set".into()))?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.generation,
        };

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .first_text()
            .ok_or_else(|| Error::InvalidData("No candidate text in Gemini response".into()))?;
        debug!("Gemini response: {}", text);

        Ok(text)
    }

    async fn health_check(&self) -> bool {
        if !self.is_configured() {
            return false;
        }
        match self.generate(PING_PROMPT).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Gemini health check failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
