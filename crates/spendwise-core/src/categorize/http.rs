//! HTTP client for the external categorization service
//!
//! Endpoints:
//! - `POST /categorize` `{description, merchant?}` -> `{category, confidence}`
//! - `POST /categorize/bulk` `{expenses: [...]}` -> `{results: [...]}`
//! - `GET /health` (liveness)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CategorizerConfig;
use crate::error::{Error, Result};
use crate::models::{BulkCategorization, CategorizationResult, ExpenseItem};

use super::CategorizerBackend;

/// Categorization service client
///
/// Every request carries the configured timeout (10s by default). One request
/// is issued per call; bulk calls send the whole batch at once.
#[derive(Clone)]
pub struct HttpCategorizer {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCategorizer {
    /// Create a new client
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &CategorizerConfig) -> Self {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug, Serialize)]
struct CategorizeRequest<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BulkRequest<'a> {
    expenses: &'a [ExpenseItem],
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    results: Vec<BulkCategorization>,
}

/// Turn a non-2xx response into `Error::Remote`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CategorizerBackend for HttpCategorizer {
    async fn categorize(
        &self,
        description: &str,
        merchant: Option<&str>,
    ) -> Result<CategorizationResult> {
        let response = self
            .http_client
            .post(format!("{}/categorize", self.base_url))
            .timeout(self.timeout)
            .json(&CategorizeRequest {
                description,
                merchant,
            })
            .send()
            .await?;

        let result: CategorizationResult = check_status(response).await?.json().await?;
        debug!(category = %result.category, confidence = result.confidence, "Categorizer response");
        Ok(result)
    }

    async fn categorize_bulk(&self, items: &[ExpenseItem]) -> Result<Vec<BulkCategorization>> {
        let response = self
            .http_client
            .post(format!("{}/categorize/bulk", self.base_url))
            .timeout(self.timeout)
            .json(&BulkRequest { expenses: items })
            .send()
            .await?;

        let bulk: BulkResponse = check_status(response).await?.json().await?;
        debug!(count = bulk.results.len(), "Categorizer bulk response");
        Ok(bulk.results)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Categorizer health check failed");
                false
            }
        }
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
