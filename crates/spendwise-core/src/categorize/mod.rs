//! Expense categorization
//!
//! The gateway asks the external categorization service first and degrades to
//! the local keyword table on any failure. It never returns an error.
//!
//! # Architecture
//!
//! - `CategorizerBackend` trait: remote categorization operations
//! - `CategorizerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - `CategorizationGateway`: call-or-fallback policy on top of a client
//!
//! # Usage
//!
//! ```rust,ignore
//! let gateway = CategorizationGateway::from_config(&config.categorizer);
//! let result = gateway.categorize_one("Coffee at Starbucks", None).await;
//! println!("{} ({:.2})", result.category, result.confidence);
//! ```

mod http;
mod keywords;
mod mock;

pub use http::HttpCategorizer;
pub use keywords::{KeywordCategorizer, DEFAULT_CONFIDENCE, MATCH_CONFIDENCE};
pub use mock::MockCategorizer;

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::config::CategorizerConfig;
use crate::error::{Error, Result};
use crate::models::{BulkCategorization, CategorizationResult, Category, ExpenseItem};

/// Interface of a remote categorization service
#[async_trait]
pub trait CategorizerBackend: Send + Sync {
    /// Categorize a single expense
    async fn categorize(
        &self,
        description: &str,
        merchant: Option<&str>,
    ) -> Result<CategorizationResult>;

    /// Categorize a batch of expenses in one request
    async fn categorize_bulk(&self, items: &[ExpenseItem]) -> Result<Vec<BulkCategorization>>;

    /// Check if the service is reachable
    async fn health_check(&self) -> bool;

    /// Get the service URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete categorizer client enum
#[derive(Clone)]
pub enum CategorizerClient {
    /// External categorization service over HTTP
    Http(HttpCategorizer),
    /// Mock backend for testing
    Mock(MockCategorizer),
}

#[async_trait]
impl CategorizerBackend for CategorizerClient {
    async fn categorize(
        &self,
        description: &str,
        merchant: Option<&str>,
    ) -> Result<CategorizationResult> {
        match self {
            CategorizerClient::Http(b) => b.categorize(description, merchant).await,
            CategorizerClient::Mock(b) => b.categorize(description, merchant).await,
        }
    }

    async fn categorize_bulk(&self, items: &[ExpenseItem]) -> Result<Vec<BulkCategorization>> {
        match self {
            CategorizerClient::Http(b) => b.categorize_bulk(items).await,
            CategorizerClient::Mock(b) => b.categorize_bulk(items).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            CategorizerClient::Http(b) => b.health_check().await,
            CategorizerClient::Mock(b) => b.health_check().await,
        }
    }

    fn host(&self) -> &str {
        match self {
            CategorizerClient::Http(b) => b.host(),
            CategorizerClient::Mock(b) => b.host(),
        }
    }
}

/// Categorization with remote-first, keyword-fallback semantics
///
/// Remote answers are passed through verbatim, including labels outside the
/// known category set (those are logged). Use
/// `CategorizationResult::validated` before persisting if that matters.
#[derive(Clone)]
pub struct CategorizationGateway {
    backend: CategorizerClient,
    keywords: KeywordCategorizer,
}

impl CategorizationGateway {
    pub fn new(backend: CategorizerClient) -> Self {
        Self {
            backend,
            keywords: KeywordCategorizer::new(),
        }
    }

    /// Gateway over the HTTP categorization service described by `config`
    pub fn from_config(config: &CategorizerConfig) -> Self {
        Self::new(CategorizerClient::Http(HttpCategorizer::from_config(config)))
    }

    /// Gateway over a mock backend
    pub fn mock(mock: MockCategorizer) -> Self {
        Self::new(CategorizerClient::Mock(mock))
    }

    pub fn backend(&self) -> &CategorizerClient {
        &self.backend
    }

    /// Categorize one expense; falls back to keyword rules on any remote failure
    pub async fn categorize_one(
        &self,
        description: &str,
        merchant: Option<&str>,
    ) -> CategorizationResult {
        match self.backend.categorize(description, merchant).await {
            Ok(result) => {
                if !Category::is_known(&result.category) {
                    warn!(
                        category = %result.category,
                        "Categorizer returned a label outside the known set"
                    );
                }
                result
            }
            Err(e) => {
                error!(error = %e, host = %self.backend.host(), "Categorization failed, using keyword fallback");
                self.keywords.categorize(description, merchant)
            }
        }
    }

    /// Categorize a batch with a single remote request
    ///
    /// If that request fails or its answer does not cover exactly the input
    /// ids, every item falls back to keyword rules together.
    pub async fn categorize_bulk(&self, items: &[ExpenseItem]) -> Vec<BulkCategorization> {
        if items.is_empty() {
            return Vec::new();
        }

        let remote = self
            .backend
            .categorize_bulk(items)
            .await
            .and_then(|results| check_bulk_shape(items, results));

        match remote {
            Ok(results) => {
                let unknown = results
                    .iter()
                    .filter(|r| !Category::is_known(&r.category))
                    .count();
                if unknown > 0 {
                    warn!(
                        unknown,
                        total = results.len(),
                        "Categorizer returned labels outside the known set"
                    );
                }
                results
            }
            Err(e) => {
                error!(
                    error = %e,
                    count = items.len(),
                    host = %self.backend.host(),
                    "Bulk categorization failed, using keyword fallback for all items"
                );
                items
                    .iter()
                    .map(|item| {
                        let result = self
                            .keywords
                            .categorize(&item.description, item.merchant.as_deref());
                        BulkCategorization {
                            id: item.id.clone(),
                            category: result.category,
                            confidence: result.confidence,
                        }
                    })
                    .collect()
            }
        }
    }

    /// Local keyword suggestions (no network I/O)
    pub fn suggestions(&self, description: &str, merchant: Option<&str>) -> Vec<Category> {
        self.keywords.suggestions(description, merchant)
    }

    /// Liveness probe for the remote service; never fails
    pub async fn ping(&self) -> bool {
        self.backend.health_check().await
    }
}

/// Reject bulk answers that drop, repeat or invent items
///
/// Every input id must appear exactly once; order is free.
fn check_bulk_shape(
    items: &[ExpenseItem],
    results: Vec<BulkCategorization>,
) -> Result<Vec<BulkCategorization>> {
    if results.len() != items.len() {
        return Err(Error::InvalidData(format!(
            "Bulk response has {} results for {} items",
            results.len(),
            items.len()
        )));
    }

    let mut pending: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    for result in &results {
        if !pending.remove(result.id.as_str()) {
            return Err(Error::InvalidData(format!(
                "Bulk response contains unknown or repeated id {}",
                result.id
            )));
        }
    }

    Ok(results)
}
