//! Insight, recommendation and advice handlers
//!
//! These never fail on backend trouble; the gateways fall back to rules.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;
use spendwise_core::{Budget, CategoryTotal, ExpenseRecord, Insight, TrendPoint};

/// Request body for insight generation
#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
}

/// Request body for budget recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

/// Request body for spending advice
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    #[serde(default)]
    pub category_breakdown: Vec<CategoryTotal>,
    #[serde(default)]
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: Vec<String>,
}

/// POST /api/insights - Generate insights for a list of expenses
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InsightsRequest>,
) -> Json<InsightsResponse> {
    let insights = state.insights.generate_insights(&body.expenses).await;
    Json(InsightsResponse { insights })
}

/// POST /api/recommendations - Budget recommendations (max 5)
pub async fn generate_recommendations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendationsRequest>,
) -> Json<RecommendationsResponse> {
    let recommendations = state
        .insights
        .generate_budget_recommendations(&body.expenses, &body.budgets)
        .await;
    Json(RecommendationsResponse { recommendations })
}

/// POST /api/advice - Spending advice (max 5)
pub async fn generate_advice(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdviceRequest>,
) -> Json<AdviceResponse> {
    let advice = state
        .insights
        .generate_spending_advice(&body.category_breakdown, &body.trends)
        .await;
    Json(AdviceResponse { advice })
}
