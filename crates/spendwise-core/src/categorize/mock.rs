//! Mock categorizer backend for testing
//!
//! Answers locally without network I/O and counts every call, so tests can
//! assert how many "remote" requests a gateway issued.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{BulkCategorization, CategorizationResult, ExpenseItem};

use super::keywords::KeywordCategorizer;
use super::CategorizerBackend;

/// Confidence the mock reports for its own answers
const MOCK_CONFIDENCE: f64 = 0.95;

/// Mock categorization backend
///
/// By default it categorizes with the keyword table at a higher confidence.
/// It can be forced to fail, to answer every request with a fixed label, or to
/// return bulk results in reverse order like a service that does not keep
/// request order.
#[derive(Clone, Default)]
pub struct MockCategorizer {
    /// Whether every call should fail like a transport error
    pub fail: bool,
    /// Fixed label returned for every item, if set
    pub label: Option<String>,
    /// Whether bulk results come back in reverse input order
    pub reversed: bool,
    calls: Arc<AtomicUsize>,
}

impl MockCategorizer {
    /// Create a working mock
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

    /// Create a mock that answers every request with `label`
    pub fn with_label(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::default()
        }
    }

    /// Create a mock whose bulk answers are in reverse input order
    pub fn reversed() -> Self {
        Self {
            reversed: true,
            ..Self::default()
        }
    }

    /// Number of backend calls made so far (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Remote {
                status: 503,
                body: "mock categorizer unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn answer(&self, description: &str, merchant: Option<&str>) -> CategorizationResult {
        let category = match &self.label {
            Some(label) => label.clone(),
            None => {
                KeywordCategorizer::new()
                    .categorize(description, merchant)
                    .category
            }
        };
        CategorizationResult {
            category,
            confidence: MOCK_CONFIDENCE,
        }
    }
}

#[async_trait]
impl CategorizerBackend for MockCategorizer {
    async fn categorize(
        &self,
        description: &str,
        merchant: Option<&str>,
    ) -> Result<CategorizationResult> {
        self.record_call()?;
        Ok(self.answer(description, merchant))
    }

    async fn categorize_bulk(&self, items: &[ExpenseItem]) -> Result<Vec<BulkCategorization>> {
        self.record_call()?;
        let mut results: Vec<BulkCategorization> = items
            .iter()
            .map(|item| {
                let result = self.answer(&item.description, item.merchant.as_deref());
                BulkCategorization {
                    id: item.id.clone(),
                    category: result.category,
                    confidence: result.confidence,
                }
            })
            .collect();
        if self.reversed {
            results.reverse();
        }
        Ok(results)
    }

    async fn health_check(&self) -> bool {
        self.record_call().is_ok()
    }

    fn host(&self) -> &str {
        "mock://categorizer"
    }
}
