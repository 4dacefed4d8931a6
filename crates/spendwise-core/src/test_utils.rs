//! Test utilities for spendwise-core
//!
//! Mock HTTP servers standing in for the external categorization service and
//! the Gemini API. Each binds to an ephemeral port, counts the requests it
//! receives and shuts down when dropped.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::oneshot;

use crate::categorize::KeywordCategorizer;
use crate::models::{BulkCategorization, ExpenseItem};

/// Confidence reported by the mock categorization service
pub const MOCK_SERVICE_CONFIDENCE: f64 = 0.9;

/// Default text returned by the mock Gemini server
pub const MOCK_GEMINI_TEXT: &str = r#"Sure! Based on your data, here is what I found:
[
  {"type": "warning", "title": "Travel Is Your Biggest Expense", "description": "Travel makes up most of your spending.", "category": "Travel", "impact": "high"},
  {"type": "achievement", "title": "Consistent Tracking", "description": "You log expenses regularly.", "impact": "low", "actionable": false}
]
Let me know if you need anything else."#;

/// How a mock server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockMode {
    /// Well-formed success responses
    #[default]
    Ok,
    /// HTTP 500 on every endpoint
    ErrorStatus,
    /// HTTP 200 with a body that is not JSON
    Malformed,
    /// Well-formed responses after a delay
    Slow(Duration),
}

#[derive(Clone)]
struct ServerState {
    mode: MockMode,
    requests: Arc<AtomicUsize>,
    text: Arc<String>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl ServerState {
    fn new(mode: MockMode, text: &str) -> Self {
        Self {
            mode,
            requests: Arc::new(AtomicUsize::new(0)),
            text: Arc::new(text.to_string()),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Count the request and return an early response if the mode calls for one
    async fn intercept(&self) -> Option<Response> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            MockMode::Ok => None,
            MockMode::ErrorStatus => {
                Some((StatusCode::INTERNAL_SERVER_ERROR, "mock failure").into_response())
            }
            MockMode::Malformed => Some((StatusCode::OK, "this is not json").into_response()),
            MockMode::Slow(delay) => {
                tokio::time::sleep(delay).await;
                None
            }
        }
    }
}

/// A running mock server
struct RunningServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl RunningServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mock categorization service
///
/// Answers with the keyword categorizer's label at a fixed confidence.
pub struct MockCategorizationServer {
    server: RunningServer,
    state: ServerState,
}

impl MockCategorizationServer {
    /// Start a well-behaved server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockMode::Ok).await
    }

    /// Start a server answering in `mode`
    pub async fn start_with(mode: MockMode) -> Self {
        let state = ServerState::new(mode, "");
        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/categorize", post(handle_categorize))
            .route("/categorize/bulk", post(handle_categorize_bulk))
            .with_state(state.clone());

        Self {
            server: RunningServer::spawn(app).await,
            state,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Number of requests received so far
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.server.stop();
    }
}

/// Mock Gemini generateContent API
pub struct MockGeminiServer {
    server: RunningServer,
    state: ServerState,
}

impl MockGeminiServer {
    /// Start a well-behaved server returning `MOCK_GEMINI_TEXT`
    pub async fn start() -> Self {
        Self::start_with(MockMode::Ok).await
    }

    /// Start a server answering in `mode`
    pub async fn start_with(mode: MockMode) -> Self {
        Self::spawn(ServerState::new(mode, MOCK_GEMINI_TEXT)).await
    }

    /// Start a well-behaved server whose candidate text is `text`
    pub async fn start_with_text(text: &str) -> Self {
        Self::spawn(ServerState::new(MockMode::Ok, text)).await
    }

    async fn spawn(state: ServerState) -> Self {
        let app = Router::new()
            .route("/models/:target", post(handle_generate_content))
            .with_state(state.clone());

        Self {
            server: RunningServer::spawn(app).await,
            state,
        }
    }

    /// Get the API base URL for this mock server
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Number of requests received so far
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// The prompt text of the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        self.state
            .last_prompt
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.server.stop();
    }
}

#[derive(Debug, Deserialize)]
struct CategorizeBody {
    description: String,
    merchant: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BulkBody {
    expenses: Vec<ExpenseItem>,
}

#[derive(Debug, Serialize)]
struct BulkBodyResponse {
    results: Vec<BulkCategorization>,
}

async fn handle_health(State(state): State<ServerState>) -> Response {
    if let Some(early) = state.intercept().await {
        return early;
    }
    Json(json!({"status": "ok"})).into_response()
}

async fn handle_categorize(
    State(state): State<ServerState>,
    Json(body): Json<CategorizeBody>,
) -> Response {
    if let Some(early) = state.intercept().await {
        return early;
    }
    let result = KeywordCategorizer::new().categorize(&body.description, body.merchant.as_deref());
    Json(json!({
        "category": result.category,
        "confidence": MOCK_SERVICE_CONFIDENCE,
    }))
    .into_response()
}

async fn handle_categorize_bulk(
    State(state): State<ServerState>,
    Json(body): Json<BulkBody>,
) -> Response {
    if let Some(early) = state.intercept().await {
        return early;
    }
    let keywords = KeywordCategorizer::new();
    let results = body
        .expenses
        .iter()
        .map(|item| BulkCategorization {
            id: item.id.clone(),
            category: keywords
                .categorize(&item.description, item.merchant.as_deref())
                .category,
            confidence: MOCK_SERVICE_CONFIDENCE,
        })
        .collect();
    Json(BulkBodyResponse { results }).into_response()
}

async fn handle_generate_content(
    State(state): State<ServerState>,
    Path(target): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if let Some(prompt) = body["contents"][0]["parts"][0]["text"].as_str() {
        if let Ok(mut last) = state.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
    }

    if let Some(early) = state.intercept().await {
        return early;
    }

    if !target.ends_with(":generateContent") {
        return (StatusCode::NOT_FOUND, "unknown method").into_response();
    }
    if query.get("key").map_or(true, |k| k.is_empty()) {
        return (StatusCode::BAD_REQUEST, "API key not valid").into_response();
    }

    Json(json!({
        "candidates": [
            {"content": {"parts": [{"text": state.text.as_str()}], "role": "model"}}
        ]
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIBackend, AIClient, GeminiBackend};
    use crate::categorize::{
        CategorizationGateway, CategorizerBackend, CategorizerClient, HttpCategorizer,
        DEFAULT_CONFIDENCE, MATCH_CONFIDENCE,
    };
    use crate::insights::{Impact, InsightGateway, InsightType};
    use crate::models::ExpenseRecord;
    use crate::prompts::PromptLibrary;

    fn http_gateway(server: &MockCategorizationServer, timeout: Duration) -> CategorizationGateway {
        CategorizationGateway::new(CategorizerClient::Http(HttpCategorizer::new(
            &server.url(),
            timeout,
        )))
    }

    fn items() -> Vec<ExpenseItem> {
        vec![
            ExpenseItem {
                id: "1".to_string(),
                description: "Coffee".to_string(),
                merchant: Some("Starbucks".to_string()),
            },
            ExpenseItem {
                id: "2".to_string(),
                description: "Monthly rent".to_string(),
                merchant: None,
            },
        ]
    }

    fn insight_gateway(server: &MockGeminiServer, key: Option<&str>) -> InsightGateway {
        InsightGateway::new(AIClient::gemini(&server.url(), "gemini-1.5-flash", key))
            .with_prompts(PromptLibrary::embedded_only())
    }

    fn travel_expense() -> ExpenseRecord {
        ExpenseRecord {
            id: Some("t1".to_string()),
            description: "Flight to Denver".to_string(),
            merchant: Some("United".to_string()),
            category: "Travel".to_string(),
            amount: 1500.0,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_categorizer_health_check() {
        let server = MockCategorizationServer::start().await;
        let client = HttpCategorizer::new(&server.url(), Duration::from_secs(5));
        assert!(client.health_check().await);
        assert_eq!(server.requests(), 1);
    }

    #[tokio::test]
    async fn test_categorizer_remote_success() {
        let server = MockCategorizationServer::start().await;
        let gateway = http_gateway(&server, Duration::from_secs(5));

        let result = gateway.categorize_one("Coffee", Some("Starbucks")).await;
        assert_eq!(result.category, "Food & Dining");
        assert_eq!(result.confidence, MOCK_SERVICE_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_categorizer_error_status_falls_back() {
        let server = MockCategorizationServer::start_with(MockMode::ErrorStatus).await;
        let gateway = http_gateway(&server, Duration::from_secs(5));

        let result = gateway.categorize_one("Coffee at Starbucks", None).await;
        assert_eq!(result.category, "Food & Dining");
        assert_eq!(result.confidence, MATCH_CONFIDENCE);

        let result = gateway.categorize_one("xyz123", Some("qqq")).await;
        assert_eq!(result.category, "Other");
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(server.requests(), 2);
    }

    #[tokio::test]
    async fn test_categorizer_malformed_falls_back() {
        let server = MockCategorizationServer::start_with(MockMode::Malformed).await;
        let gateway = http_gateway(&server, Duration::from_secs(5));

        let result = gateway.categorize_one("Uber ride", None).await;
        assert_eq!(result.category, "Transportation");
        assert_eq!(result.confidence, MATCH_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_categorizer_timeout_falls_back() {
        let server =
            MockCategorizationServer::start_with(MockMode::Slow(Duration::from_millis(800))).await;
        let gateway = http_gateway(&server, Duration::from_millis(100));

        let result = gateway.categorize_one("Netflix subscription", None).await;
        assert_eq!(result.category, "Entertainment");
        assert_eq!(result.confidence, MATCH_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_bulk_one_request_per_batch() {
        let server = MockCategorizationServer::start().await;
        let gateway = http_gateway(&server, Duration::from_secs(5));

        let results = gateway.categorize_bulk(&items()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "1");
        assert_eq!(results[0].confidence, MOCK_SERVICE_CONFIDENCE);
        assert_eq!(results[1].category, "Bills & Utilities");
        assert_eq!(server.requests(), 1);
    }

    #[tokio::test]
    async fn test_bulk_failure_falls_back_for_all() {
        let server = MockCategorizationServer::start_with(MockMode::ErrorStatus).await;
        let gateway = http_gateway(&server, Duration::from_secs(5));

        let results = gateway.categorize_bulk(&items()).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.confidence == MATCH_CONFIDENCE));
        assert_eq!(results[1].id, "2");
        assert_eq!(server.requests(), 1);
    }

    #[tokio::test]
    async fn test_gemini_generate() {
        let server = MockGeminiServer::start_with_text("hello there").await;
        let backend = GeminiBackend::new(&server.url(), "gemini-1.5-flash", Some("test-key"));

        assert_eq!(backend.generate("Say hi").await.unwrap(), "hello there");
        assert_eq!(server.last_prompt().as_deref(), Some("Say hi"));
        assert!(backend.health_check().await);
        assert_eq!(server.requests(), 2);
    }

    #[tokio::test]
    async fn test_gemini_error_status() {
        let server = MockGeminiServer::start_with(MockMode::ErrorStatus).await;
        let backend = GeminiBackend::new(&server.url(), "gemini-1.5-flash", Some("test-key"));

        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Remote { status: 500, .. }));
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_insights_end_to_end() {
        let server = MockGeminiServer::start().await;
        let gateway = insight_gateway(&server, Some("test-key"));

        let insights = gateway.generate_insights(&[travel_expense()]).await;
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightType::Warning);
        assert_eq!(insights[0].category.as_deref(), Some("Travel"));
        assert!(insights[0].actionable);
        assert!(!insights[1].actionable);
        assert_eq!(insights[1].impact, Impact::Low);

        let prompt = server.last_prompt().unwrap();
        assert!(prompt.contains("Total Spent: $1500.00"));
        assert!(prompt.contains("- Travel: $1500.00"));
        assert!(prompt.contains("Flight to Denver at United"));
        assert!(prompt.contains("Top Merchants:\n- United: $1500.00"));
    }

    #[tokio::test]
    async fn test_insights_malformed_falls_back() {
        let server = MockGeminiServer::start_with(MockMode::Malformed).await;
        let gateway = insight_gateway(&server, Some("test-key"));

        let insights = gateway.generate_insights(&[travel_expense()]).await;
        assert_eq!(insights.len(), 1);
        assert!(insights[0].id.starts_with("fallback-"));
        assert_eq!(server.requests(), 1);
    }

    #[tokio::test]
    async fn test_insights_without_key_skip_network() {
        let server = MockGeminiServer::start().await;
        let gateway = insight_gateway(&server, None);

        let insights = gateway.generate_insights(&[travel_expense()]).await;
        assert_eq!(insights[0].kind, InsightType::Warning);
        assert!(!gateway.ping().await);
        assert_eq!(server.requests(), 0);
    }

    #[tokio::test]
    async fn test_recommendations_from_bullet_text() {
        let server =
            MockGeminiServer::start_with_text("1. Intro\n- Cap dining at $300\n• Cook at home").await;
        let gateway = insight_gateway(&server, Some("test-key"));

        let recs = gateway
            .generate_budget_recommendations(&[travel_expense()], &[])
            .await;
        assert_eq!(recs, vec!["1. Intro", "Cap dining at $300", "Cook at home"]);
        assert!(server
            .last_prompt()
            .unwrap()
            .contains("budget recommendations"));
    }
}
