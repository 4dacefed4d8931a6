//! Generative AI backend abstraction
//!
//! This module provides a backend-agnostic interface for text generation. The
//! insight gateways build prompts, call `generate`, and parse whatever text
//! comes back; the backend only moves prompts and text.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_config(&config);
//! if ai.is_configured() {
//!     let text = ai.generate("Give me three saving tips").await?;
//!     println!("{}", text);
//! }
//! ```
//!
//! # Configuration
//!
//! See `config::GeminiConfig`. Environment variables:
//! - `GEMINI_API_KEY`: API key (no key means unconfigured, never an error)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_API_BASE`: API base URL

mod gemini;
mod mock;
pub mod parsing;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use types::*;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Whether a credential is present; an unconfigured backend is never called
    fn is_configured(&self) -> bool;

    /// Send one prompt and return the raw text of the first candidate
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend answers a trivial prompt
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Gemini generative language API
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create the Gemini client described by `config`
    ///
    /// Always succeeds; without an API key the client reports
    /// `is_configured() == false`.
    pub fn from_config(config: &Config) -> Self {
        AIClient::Gemini(GeminiBackend::from_config(&config.gemini, config.generation))
    }

    /// Create a Gemini backend directly
    pub fn gemini(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        AIClient::Gemini(GeminiBackend::new(base_url, model, api_key))
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    fn is_configured(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.is_configured(),
            AIClient::Mock(b) => b.is_configured(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(prompt).await,
            AIClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
