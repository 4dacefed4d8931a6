//! Health and metadata handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use spendwise_core::Category;

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether the categorization service answered
    pub categorizer: bool,
    /// Whether the AI backend answered (false when unconfigured)
    pub ai: bool,
}

/// GET /api/health - Server status plus backend reachability
///
/// Always 200: a down backend only means the fallbacks are in use.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (categorizer, ai) = tokio::join!(state.categorizer.ping(), state.insights.ping());
    Json(HealthResponse {
        status: "ok",
        categorizer,
        ai,
    })
}

/// GET /api/categories - The closed category label set
pub async fn list_categories() -> Json<Vec<&'static str>> {
    Json(Category::all().iter().map(Category::as_str).collect())
}
