//! Mock backend for testing
//!
//! Provides canned responses for every prompt family the gateways send.
//! Useful for unit tests and development without an API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

const MOCK_INSIGHTS: &str = r#"Here are your insights:
[
  {"type": "warning", "title": "Dining Out Adds Up", "description": "Food & Dining is your largest category this month.", "category": "Food & Dining", "impact": "high", "actionable": true},
  {"type": "tip", "title": "Review Subscriptions", "description": "Recurring charges are worth a quarterly review.", "impact": "medium"}
]"#;

const MOCK_RECOMMENDATIONS: &str = r#"["Set a monthly budget of $400 for Food & Dining", "Keep Transportation under $150 per month", "Move $100 a month into savings"]"#;

const MOCK_ADVICE: &str = r#"["Plan meals ahead to cut dining costs", "Batch errands to save on transport", "Review your subscriptions every quarter"]"#;

/// Mock AI backend for testing
///
/// Returns a canned answer matching the kind of prompt it receives, or a fixed
/// response when one is set. Every `generate` and `health_check` call is
/// counted, and the counter is shared across clones.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether the backend reports a credential
    pub configured: bool,
    /// Whether every call should fail like a transport error
    pub fail: bool,
    /// Fixed text returned by `generate`, if set
    pub response: Option<String>,
    model: String,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            configured: true,
            fail: false,
            response: None,
            model: "mock".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockBackend {
    /// Create a new mock backend (configured and healthy)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose calls all fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Create a mock without a credential
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    /// Create a mock that answers every prompt with `text`
    pub fn with_response(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Number of backend calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn canned(prompt: &str) -> &'static str {
        let prompt = prompt.to_lowercase();
        if prompt.contains("budget recommendations") {
            MOCK_RECOMMENDATIONS
        } else if prompt.contains("spending advice") {
            MOCK_ADVICE
        } else {
            MOCK_INSIGHTS
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.configured {
            return Err(Error::NotConfigured("mock backend has no credential".into()));
        }
        if self.fail {
            return Err(Error::Remote {
                status: 503,
                body: "mock backend unavailable".to_string(),
            });
        }
        Ok(match &self.response {
            Some(text) => text.clone(),
            None => Self::canned(prompt).to_string(),
        })
    }

    async fn health_check(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.configured && !self.fail
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
