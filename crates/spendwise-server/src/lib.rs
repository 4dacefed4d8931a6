//! Spendwise Web Server
//!
//! Axum-based REST API exposing expense categorization and AI insights.
//!
//! - Restrictive CORS policy unless origins are configured
//! - Input validation with 400 responses for missing descriptions
//! - Sanitized error responses
//! - Backends are probed once at startup; every endpoint keeps working when
//!   they are down

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use spendwise_core::{AIBackend, CategorizationGateway, CategorizerBackend, Config, InsightGateway};

mod handlers;

/// Maximum number of expenses accepted by one bulk request
pub const MAX_BULK_ITEMS: usize = 1000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub categorizer: CategorizationGateway,
    pub insights: InsightGateway,
}

impl AppState {
    /// Build both gateways from service configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            categorizer: CategorizationGateway::from_config(&config.categorizer),
            insights: InsightGateway::from_config(config),
        }
    }
}

/// Create the application router
pub fn create_router(config: &Config, server_config: ServerConfig) -> Router {
    let state = Arc::new(AppState::from_config(config));

    info!(
        "Categorization service: {}",
        state.categorizer.backend().host()
    );
    if state.insights.ai().is_configured() {
        info!(
            "AI backend configured: {} (model: {})",
            state.insights.ai().host(),
            state.insights.ai().model()
        );
    } else {
        info!("ℹ️  AI backend not configured (set GEMINI_API_KEY to enable AI insights)");
    }

    create_router_with_state(state, &server_config)
}

/// Create the application router around existing state (for testing)
pub fn create_router_with_state(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::list_categories))
        .route("/categorize", post(handlers::categorize))
        .route("/categorize/bulk", post(handlers::categorize_bulk))
        .route("/categorize/suggestions", post(handlers::suggest_categories))
        .route("/insights", post(handlers::generate_insights))
        .route("/recommendations", post(handlers::generate_recommendations))
        .route("/advice", post(handlers::generate_advice));

    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(config, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    config: Config,
    host: &str,
    port: u16,
    server_config: ServerConfig,
) -> anyhow::Result<()> {
    check_connections(&config).await;

    let app = create_router(&config, server_config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log backend connection status
async fn check_connections(config: &Config) {
    let categorizer = CategorizationGateway::from_config(&config.categorizer);
    if categorizer.ping().await {
        info!(
            "✅ Categorization service connected: {}",
            categorizer.backend().host()
        );
    } else {
        warn!(
            "⚠️  Categorization service not responding: {} (keyword fallback will be used)",
            categorizer.backend().host()
        );
    }

    let insights = InsightGateway::from_config(config);
    if !insights.ai().is_configured() {
        warn!("⚠️  GEMINI_API_KEY not set, insights will use rule-based fallback");
    } else if insights.ping().await {
        info!(
            "✅ AI backend connected: {} (model: {})",
            insights.ai().host(),
            insights.ai().model()
        );
    } else {
        warn!(
            "⚠️  AI backend configured but not responding: {} (model: {})",
            insights.ai().host(),
            insights.ai().model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err.into()),
        }
    }
}

#[cfg(test)]
mod tests;
