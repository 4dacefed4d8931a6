//! Categorization handlers

use std::collections::HashSet;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, MAX_BULK_ITEMS};
use spendwise_core::{BulkCategorization, CategorizationResult, Category, ExpenseItem};

/// Request body for categorizing a single expense
#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    #[serde(default)]
    pub description: String,
    pub merchant: Option<String>,
}

impl CategorizeRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.description.trim().is_empty() {
            return Err(AppError::bad_request("description is required"));
        }
        Ok(())
    }

    fn merchant(&self) -> Option<&str> {
        self.merchant.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// One expense in a bulk request
#[derive(Debug, Deserialize)]
pub struct BulkExpense {
    pub id: Option<String>,
    pub description: Option<String>,
    pub merchant: Option<String>,
}

/// Request body for bulk categorization
#[derive(Debug, Deserialize)]
pub struct BulkCategorizeRequest {
    pub expenses: Vec<BulkExpense>,
}

/// Response for bulk categorization
#[derive(Debug, Serialize)]
pub struct BulkCategorizeResponse {
    pub results: Vec<BulkCategorization>,
}

/// Response for category suggestions
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Category>,
}

/// POST /api/categorize - Categorize one expense
pub async fn categorize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategorizeRequest>,
) -> Result<Json<CategorizationResult>, AppError> {
    body.validate()?;
    let result = state
        .categorizer
        .categorize_one(body.description.trim(), body.merchant())
        .await;
    Ok(Json(result))
}

/// POST /api/categorize/bulk - Categorize a batch with one upstream request
///
/// Items without an id are keyed by their position in the request. Ids must
/// be unique after that, so a positional id colliding with an explicit one is
/// rejected.
pub async fn categorize_bulk(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkCategorizeRequest>,
) -> Result<Json<BulkCategorizeResponse>, AppError> {
    if body.expenses.len() > MAX_BULK_ITEMS {
        return Err(AppError::bad_request(&format!(
            "at most {} expenses per request",
            MAX_BULK_ITEMS
        )));
    }

    let items = body
        .expenses
        .into_iter()
        .enumerate()
        .map(|(index, expense)| {
            let description = expense
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .ok_or_else(|| {
                    AppError::bad_request(&format!("expenses[{}].description is required", index))
                })?;
            Ok(ExpenseItem {
                id: expense.id.unwrap_or_else(|| index.to_string()),
                description,
                merchant: expense.merchant.filter(|m| !m.trim().is_empty()),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let mut seen = HashSet::new();
    if let Some(dup) = items.iter().find(|item| !seen.insert(item.id.as_str())) {
        return Err(AppError::bad_request(&format!(
            "duplicate expense id {}",
            dup.id
        )));
    }

    let results = state.categorizer.categorize_bulk(&items).await;
    Ok(Json(BulkCategorizeResponse { results }))
}

/// POST /api/categorize/suggestions - Local keyword suggestions (max 3)
pub async fn suggest_categories(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategorizeRequest>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    body.validate()?;
    let suggestions = state
        .categorizer
        .suggestions(&body.description, body.merchant());
    Ok(Json(SuggestionsResponse { suggestions }))
}
