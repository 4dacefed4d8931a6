//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use spendwise_core::{MockBackend, MockCategorizer};
use tower::ServiceExt;

fn setup_app(categorizer: MockCategorizer, ai: MockBackend) -> Router {
    let state = Arc::new(AppState {
        categorizer: CategorizationGateway::mock(categorizer),
        insights: InsightGateway::mock(ai),
    });
    create_router_with_state(state, &ServerConfig::default())
}

fn setup_test_app() -> Router {
    setup_app(MockCategorizer::new(), MockBackend::unconfigured())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ========== Health / Metadata ==========

#[tokio::test]
async fn test_health_reports_backends() {
    let app = setup_app(MockCategorizer::new(), MockBackend::unconfigured());

    let response = app.oneshot(get_request("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["categorizer"], true);
    assert_eq!(json["ai"], false);
}

#[tokio::test]
async fn test_health_with_failing_backends_is_still_ok() {
    let app = setup_app(MockCategorizer::failing(), MockBackend::failing());

    let response = app.oneshot(get_request("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["categorizer"], false);
    assert_eq!(json["ai"], false);
}

#[tokio::test]
async fn test_list_categories() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let labels = json.as_array().unwrap();
    assert_eq!(labels.len(), 12);
    assert_eq!(labels[0], "Food & Dining");
    assert!(labels.iter().any(|l| l == "Gifts & Donations"));
}

// ========== Categorization ==========

#[tokio::test]
async fn test_categorize() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/categorize",
            serde_json::json!({"description": "Uber ride", "merchant": "Uber"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Transportation");
    assert_eq!(json["confidence"], 0.95);
}

#[tokio::test]
async fn test_categorize_falls_back_when_service_down() {
    let app = setup_app(MockCategorizer::failing(), MockBackend::unconfigured());

    let response = app
        .oneshot(post_json(
            "/api/categorize",
            serde_json::json!({"description": "Coffee at Starbucks"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Food & Dining");
    assert_eq!(json["confidence"], 0.7);
}

#[tokio::test]
async fn test_categorize_requires_description() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/categorize",
            serde_json::json!({"description": "   ", "merchant": "Shell"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "description is required");
}

#[tokio::test]
async fn test_categorize_bulk() {
    let mock = MockCategorizer::new();
    let app = setup_app(mock.clone(), MockBackend::unconfigured());

    let body = serde_json::json!({
        "expenses": [
            {"id": "a", "description": "Pizza night", "merchant": "Dominos"},
            {"description": "Electric bill"},
            {"id": "c", "description": "xyz123"}
        ]
    });
    let response = app
        .oneshot(post_json("/api/categorize/bulk", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["id"], "a");
    assert_eq!(results[0]["category"], "Food & Dining");
    assert_eq!(results[1]["id"], "1");
    assert_eq!(results[1]["category"], "Bills & Utilities");
    assert_eq!(results[2]["category"], "Other");
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_categorize_bulk_rejects_missing_description() {
    let mock = MockCategorizer::new();
    let app = setup_app(mock.clone(), MockBackend::unconfigured());

    let body = serde_json::json!({
        "expenses": [
            {"id": "a", "description": "Lunch"},
            {"id": "b", "merchant": "Target"}
        ]
    });
    let response = app
        .oneshot(post_json("/api/categorize/bulk", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "expenses[1].description is required");
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_categorize_bulk_rejects_colliding_ids() {
    let mock = MockCategorizer::new();
    let app = setup_app(mock.clone(), MockBackend::unconfigured());

    let body = serde_json::json!({
        "expenses": [
            {"id": "1", "description": "Lunch"},
            {"description": "Parking"}
        ]
    });
    let response = app
        .oneshot(post_json("/api/categorize/bulk", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "duplicate expense id 1");
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_categorize_bulk_empty() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/categorize/bulk",
            serde_json::json!({"expenses": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_suggestions() {
    let mock = MockCategorizer::new();
    let app = setup_app(mock.clone(), MockBackend::unconfigured());

    let response = app
        .oneshot(post_json(
            "/api/categorize/suggestions",
            serde_json::json!({"description": "Movie tickets and popcorn at the mall"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let suggestions = json["suggestions"].as_array().unwrap();
    assert_eq!(suggestions[0], "Shopping");
    assert_eq!(suggestions[1], "Entertainment");
    assert_eq!(mock.calls(), 0);
}

// ========== Insights ==========

#[tokio::test]
async fn test_insights_empty_list() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/insights", serde_json::json!({"expenses": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json["insights"].as_array().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["type"], "tip");
    assert!(insights[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_insights_fallback_warning() {
    let ai = MockBackend::unconfigured();
    let app = setup_app(MockCategorizer::new(), ai.clone());

    let body = serde_json::json!({
        "expenses": [
            {"description": "New laptop", "category": "Shopping", "amount": 1500.0, "date": "2024-05-02"}
        ]
    });
    let response = app.oneshot(post_json("/api/insights", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json["insights"].as_array().unwrap();
    assert_eq!(insights[0]["type"], "warning");
    assert_eq!(insights[0]["impact"], "high");
    assert_eq!(ai.calls(), 0);
}

#[tokio::test]
async fn test_insights_from_ai() {
    let ai = MockBackend::new();
    let app = setup_app(MockCategorizer::new(), ai.clone());

    let body = serde_json::json!({
        "expenses": [{"description": "Dinner", "category": "Food & Dining", "amount": 42.5}]
    });
    let response = app.oneshot(post_json("/api/insights", body)).await.unwrap();

    let json = get_body_json(response).await;
    let insights = json["insights"].as_array().unwrap();
    assert_eq!(insights.len(), 2);
    assert!(insights[0]["id"].as_str().unwrap().starts_with("ai-insight-"));
    assert_eq!(ai.calls(), 1);
}

#[tokio::test]
async fn test_recommendations() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "expenses": [
            {"description": "Shoes", "category": "Shopping", "amount": 300.0},
            {"description": "Hotel", "category": "Travel", "amount": 80.0}
        ],
        "budgets": [{"category": "Shopping", "amount": 200.0}]
    });
    let response = app
        .oneshot(post_json("/api/recommendations", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs[0].as_str().unwrap().contains("over budget for Shopping"));
    assert!(recs[1].as_str().unwrap().contains("budget for Travel"));
}

#[tokio::test]
async fn test_advice() {
    let app = setup_test_app();

    let trends: Vec<serde_json::Value> = (1..=8)
        .map(|d| serde_json::json!({"date": format!("2024-05-0{}", d), "amount": 30.0}))
        .collect();
    let body = serde_json::json!({
        "categoryBreakdown": [
            {"category": "Food & Dining", "total": 220.0},
            {"category": "Travel", "total": 90.0}
        ],
        "trends": trends
    });
    let response = app.oneshot(post_json("/api/advice", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let advice = json["advice"].as_array().unwrap();
    assert_eq!(advice.len(), 5);
    assert!(advice[0].as_str().unwrap().contains("Food & Dining"));
    assert!(advice[1].as_str().unwrap().contains("$30.00"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/insights")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[test]
fn test_app_error_from_anyhow_hides_detail() {
    let err: AppError = anyhow::anyhow!("secret detail").into();
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
