use super::*;
use crate::reports::{fetch_constituencies, fetch_dashboard};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::protocol::{LegalDocsRequest, LegalDocsResponse};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    received: Arc<Mutex<Vec<Value>>>,
}

async fn generate_docs(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.received.lock().await.push(body);
    Json(json!({
        "rti_application": "To, The PIO",
        "first_appeal": "To, The First Appellate Authority",
        "pil_brief": "Preliminary Note for Counsel"
    }))
}

async fn failing_detail() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "An error occurred while generating documents: quota" })),
    )
}

async fn bad_gateway() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "<html>upstream down</html>")
}

async fn empty_success() -> impl IntoResponse {
    StatusCode::OK
}

async fn slow_budget() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "optimal_allocation": [] }))
}

async fn constituencies() -> impl IntoResponse {
    Json(json!([
        {
            "id": 1,
            "mp_name": "A. Kumar",
            "constituency_name": "Example North",
            "state": "Karnataka",
            "transparency_status": "Missing",
            "last_report_date": null,
            "mp_email": null
        },
        {
            "id": 2,
            "mp_name": "B. Rao",
            "constituency_name": "Riverside",
            "state": "Kerala",
            "transparency_status": "Current",
            "last_report_date": "2024-01-31",
            "mp_email": "b.rao@example.org"
        }
    ]))
}

async fn dashboard(Path(name): Path<String>) -> impl IntoResponse {
    if name != "riverside" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Constituency not found" })),
        )
            .into_response();
    }
    Json(json!({
        "id": 2,
        "mp_name": "B. Rao",
        "constituency_name": "Riverside",
        "last_report_date": "2024-01-31",
        "total_expenditure": 2500000.0,
        "total_projects": 18,
        "spending_by_category": [],
        "top_10_contractors": [],
        "ai_insights": []
    }))
    .into_response()
}

async fn spawn_backend() -> anyhow::Result<(String, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();

    let app = Router::new()
        .route("/api/v1/legal/generate-docs", post(generate_docs))
        .route("/api/v1/insights/detail", post(failing_detail))
        .route("/api/v1/budget/generate-optimal", post(bad_gateway))
        .route("/api/v1/constituencies", get(constituencies))
        .route("/api/v1/dashboard/:name", get(dashboard))
        .with_state(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}"), state))
}

async fn spawn_single_route(path: &'static str, router: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().nest(path, router);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn legal_request() -> LegalDocsRequest {
    LegalDocsRequest {
        constituency_name: "Example North".to_string(),
        mp_name: "A. Kumar".to_string(),
        finding: "The official transparency report is missing.".to_string(),
    }
}

#[tokio::test]
async fn posts_payload_and_parses_success_body() {
    let (server_url, state) = spawn_backend().await.expect("spawn server");
    let gateway = HttpGateway::new(&format!("{server_url}/"), None).expect("gateway");

    let response: LegalDocsResponse =
        call(&gateway, &Endpoint::GenerateLegalDocs, &legal_request())
            .await
            .expect("generate docs");

    assert_eq!(response.pil_brief, "Preliminary Note for Counsel");
    let received = state.received.lock().await.clone();
    assert_eq!(
        received,
        vec![json!({
            "constituency_name": "Example North",
            "mp_name": "A. Kumar",
            "finding": "The official transparency report is missing."
        })]
    );
}

#[tokio::test]
async fn non_success_status_carries_backend_detail() {
    let (server_url, _) = spawn_backend().await.expect("spawn server");
    let gateway = HttpGateway::new(&server_url, None).expect("gateway");

    let err = gateway
        .invoke(&Endpoint::InsightDetail, json!({}))
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(500));
    assert_eq!(
        err.user_message(),
        "An error occurred while generating documents: quota"
    );
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status_message() {
    let (server_url, _) = spawn_backend().await.expect("spawn server");
    let gateway = HttpGateway::new(&server_url, None).expect("gateway");

    let err = gateway
        .invoke(&Endpoint::GenerateOptimalBudget, json!({}))
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.user_message(), "Request failed with status 502");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let gateway = HttpGateway::new(&format!("http://{addr}"), None).expect("gateway");
    let err = gateway
        .invoke(&Endpoint::GenerateLegalDocs, json!({}))
        .await
        .expect_err("must fail");

    assert!(matches!(err, GatewayError::Transport { .. }), "{err:?}");
    assert_eq!(err.status(), None);
    assert_eq!(err.user_message(), TRANSPORT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn empty_success_body_is_a_contract_violation() {
    let server_url = spawn_single_route(
        "/api/v1/insights",
        Router::new().route("/detail", post(empty_success)),
    )
    .await
    .expect("spawn server");
    let gateway = HttpGateway::new(&server_url, None).expect("gateway");

    let err = gateway
        .invoke(&Endpoint::InsightDetail, json!({}))
        .await
        .expect_err("must fail");

    assert!(matches!(err, GatewayError::InvalidResponse { .. }), "{err:?}");
    assert_eq!(err.user_message(), INVALID_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn wrong_shape_is_reported_by_typed_call() {
    let (server_url, _) = spawn_backend().await.expect("spawn server");
    let gateway = HttpGateway::new(&server_url, None).expect("gateway");

    let err = call::<_, LegalDocsResponse>(&gateway, &Endpoint::ListConstituencies, &Value::Null)
        .await
        .expect_err("a list is not a bundle");

    assert!(matches!(err, GatewayError::InvalidResponse { .. }), "{err:?}");
}

#[tokio::test]
async fn configured_timeout_turns_hung_request_into_transport_failure() {
    let server_url = spawn_single_route(
        "/api/v1/budget",
        Router::new().route("/generate-optimal", post(slow_budget)),
    )
    .await
    .expect("spawn server");
    let gateway =
        HttpGateway::new(&server_url, Some(Duration::from_millis(100))).expect("gateway");

    let err = gateway
        .invoke(&Endpoint::GenerateOptimalBudget, json!({}))
        .await
        .expect_err("must time out");

    assert_eq!(
        err,
        GatewayError::Transport {
            endpoint: "/api/v1/budget/generate-optimal".to_string(),
            reason: "request timed out".to_string(),
        }
    );
}

#[tokio::test]
async fn directory_and_dashboard_reads() {
    let (server_url, _) = spawn_backend().await.expect("spawn server");
    let gateway = HttpGateway::new(&server_url, None).expect("gateway");

    let records = fetch_constituencies(&gateway).await.expect("directory");
    assert_eq!(records.len(), 2);
    assert!(records[0].is_actionable());
    assert!(records[0].mp_email.is_none());

    let report = fetch_dashboard(&gateway, "riverside")
        .await
        .expect("dashboard")
        .expect("report exists");
    assert_eq!(report.total_projects, 18);

    let missing = fetch_dashboard(&gateway, "example-north")
        .await
        .expect("404 is not an error");
    assert!(missing.is_none());
}

#[test]
fn rejects_unparseable_base_url() {
    assert!(HttpGateway::new("not a url", None).is_err());
}
