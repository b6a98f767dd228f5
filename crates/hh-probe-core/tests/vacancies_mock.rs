//! Runner tests against a local mock of the vacancies endpoint

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use hh_probe_core::{catalog, Check, FailureKind, ProbeConfig, Runner};

const GOOD_KEY: &str = "good-key";

#[derive(Default)]
struct MockState {
    /// `found` per search text, 100 when absent
    found: HashMap<String, u64>,
}

async fn vacancies(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != format!("Bearer {}", GOOD_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"errors": [{"type": "oauth", "value": "bad_authorization"}]})),
        );
    }

    let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let per_page: u64 = params.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(20);
    if per_page > 100 || (page + 1) * per_page > 2000 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"errors": [{"type": "bad_argument"}]})),
        );
    }

    let text = params.get("text").cloned().unwrap_or_default();
    let found = state.found.get(&text).copied().unwrap_or(100);
    let items: Vec<Value> = (0..per_page.min(found))
        .map(|i| json!({"id": i.to_string()}))
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "found": found,
            "page": page,
            "per_page": per_page,
            "pages": found.div_ceil(per_page),
            "items": items,
        })),
    )
}

/// Serve a router on an ephemeral loopback port, returning its base URL
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

async fn spawn_mock(found: &[(&str, u64)]) -> String {
    let state = Arc::new(MockState {
        found: found.iter().map(|(t, n)| (t.to_string(), *n)).collect(),
    });
    let app = Router::new()
        .route("/vacancies", get(vacancies))
        .with_state(state);
    spawn(app).await
}

fn runner(endpoint: &str, key: &str) -> Runner {
    let config = ProbeConfig::new(Some(key), Some(endpoint), Some(2)).unwrap();
    Runner::new(&config).unwrap()
}

fn named(names: &[&str]) -> Vec<Check> {
    catalog()
        .into_iter()
        .filter(|c| names.contains(&c.name))
        .collect()
}

#[tokio::test]
async fn test_connectivity_passes_with_valid_key() {
    let endpoint = spawn_mock(&[]).await;
    let report = runner(&endpoint, GOOD_KEY).run(&named(&["connectivity"])).await;

    assert!(report.passed());
    assert!(report.render_text().starts_with("PASS connectivity\n"));
}

#[tokio::test]
async fn test_rejected_key_is_auth_failure() {
    let endpoint = spawn_mock(&[]).await;
    let report = runner(&endpoint, "wrong-key").run(&named(&["connectivity"])).await;

    assert!(!report.passed());
    assert_eq!(
        report.first_failure().unwrap().failure_kind(),
        Some(FailureKind::AuthRejected)
    );
}

#[tokio::test]
async fn test_status_and_shape_checks() {
    let endpoint = spawn_mock(&[]).await;
    let checks = named(&[
        "valid-text",
        "null-byte",
        "unicode",
        "invalid-auth",
        "non-json-accept-ignored",
        "pagination",
        "too-big-pagination",
        "too-deep-pagination",
    ]);
    assert_eq!(checks.len(), 8);

    let report = runner(&endpoint, GOOD_KEY).run(&checks).await;
    assert!(report.passed(), "{}", report.render_text());
}

#[tokio::test]
async fn test_found_comparisons() {
    let endpoint = spawn_mock(&[
        ("нефть OR бензин", 20),
        ("нефть", 15),
        ("cola", 10),
        ("cola NOT pepsi", 12),
    ])
    .await;
    let report = runner(&endpoint, GOOD_KEY).run(&named(&["or", "not"])).await;

    let or = &report.results[0];
    assert!(or.passed());
    assert_eq!(or.found, vec![20, 15]);

    let not = &report.results[1];
    assert_eq!(not.failure_kind(), Some(FailureKind::Assertion));
    assert_eq!(not.found, vec![10, 12]);
}

#[tokio::test]
async fn test_fail_fast_stops_run() {
    let endpoint = spawn_mock(&[]).await;
    let report = runner(&endpoint, "wrong-key")
        .with_fail_fast(true)
        .run(&named(&["connectivity", "unicode"]))
        .await;

    assert_eq!(report.results.len(), 1);
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let app = Router::new().route("/vacancies", get(|| async { "<html>maintenance</html>" }));
    let endpoint = spawn(app).await;
    let report = runner(&endpoint, GOOD_KEY)
        .run(&named(&["connectivity", "or"]))
        .await;

    for result in &report.results {
        assert_eq!(result.failure_kind(), Some(FailureKind::MalformedBody), "{}", result.name);
    }
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let app = Router::new().route(
        "/vacancies",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"found": 1, "items": []}))
        }),
    );
    let endpoint = spawn(app).await;
    let config = ProbeConfig::new(Some(GOOD_KEY), Some(&endpoint), Some(1)).unwrap();
    let report = Runner::new(&config)
        .unwrap()
        .run(&named(&["connectivity"]))
        .await;

    let result = &report.results[0];
    assert_eq!(result.failure_kind(), Some(FailureKind::Transport));
    assert!(report.render_text().contains("timed out"));
}

#[tokio::test]
async fn test_repeated_runs_match() {
    let endpoint = spawn_mock(&[("python OR java", 50), ("NAME:(python or java)", 30)]).await;
    let runner = runner(&endpoint, GOOD_KEY);
    let checks = named(&["connectivity", "field-search", "too-big-pagination"]);

    let first = runner.run(&checks).await;
    let second = runner.run(&checks).await;
    assert!(first.passed());
    assert_eq!(first, second);
}
