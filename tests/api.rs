//! HTTP-level tests for the proxy endpoints and dashboard, with the
//! Marketplace stubbed by wiremock

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use marketplace_dash::config::AppConfig;
use marketplace_dash::metrics::{REQ_ERRORS, REQ_LATENCY};
use marketplace_dash::router::create_api_router;
use marketplace_dash::state::AppState;
use marketplace_dash::transport::marketplace::MARKETPLACE_ACCEPT;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATS_PATH: &str = "/_apis/gallery/publishers/eliostruyf/extensions/vscode-demo-time/stats";
const QUERY_PATH: &str = "/_apis/public/gallery/extensionquery";

fn app(vars: &[(&str, &str)]) -> Router {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let env = config::Environment::default().source(Some(map));
    let cfg = AppConfig::from_env(env).expect("config");
    create_api_router(AppState::new(cfg).expect("state"))
}

fn live_app(server: &MockServer) -> Router {
    let uri = server.uri();
    app(&[("VSCODE_MARKETPLACE_PAT", "secret"), ("MARKETPLACE_URL", uri.as_str())])
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).expect("json body"))
}

fn sample_stats() -> Value {
    json!({
        "extensionName": "vscode-demo-time",
        "publisherName": "eliostruyf",
        "statCount": 2,
        "dailyStats": [
            {
                "version": null,
                "statisticDate": "2025-07-03T00:00:00Z",
                "counts": { "webPageViews": 40, "installCount": 7, "averageRating": 4.5 }
            },
            {
                "version": null,
                "statisticDate": "2025-07-02T00:00:00Z",
                "counts": { "webPageViews": 2, "webDownloadCount": 3 }
            }
        ]
    })
}

fn sample_query_response() -> Value {
    json!({
        "results": [{
            "extensions": [
                {
                    "extensionName": "vscode-front-matter",
                    "displayName": "Front Matter CMS",
                    "shortDescription": "CMS",
                    "publisher": { "publisherName": "eliostruyf" }
                },
                {
                    "extensionName": "vscode-demo-time",
                    "displayName": "Demo Time",
                    "shortDescription": "Demos"
                }
            ]
        }]
    })
}

#[tokio::test]
async fn stats_requires_pat() {
    let (status, body) = get_json(app(&[]), "/api/stats").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "PAT token is required" }));
}

#[tokio::test]
async fn extensions_require_pat() {
    let (status, body) = get_json(app(&[]), "/api/extensions").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "PAT token is required");
}

#[tokio::test]
async fn stats_pass_through_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .and(query_param("aggregate", "1"))
        .and(query_param("afterDate", "2025-06-01T00:00:00.000Z"))
        .and(header_is("authorization", "Basic OnNlY3JldA=="))
        .and(header_is("accept", MARKETPLACE_ACCEPT))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_stats()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, headers, body) = get(
        live_app(&server),
        "/api/stats?afterDate=2025-06-01T00%3A00%3A00.000Z",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, sample_stats());
}

#[tokio::test]
async fn stats_for_selected_extension() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/_apis/gallery/publishers/eliostruyf/extensions/vscode-front-matter/stats",
        ))
        .and(query_param("aggregate", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_json(
        live_app(&server),
        "/api/stats?extension=vscode-front-matter&aggregate=7",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn stats_upstream_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let (status, body) = get_json(live_app(&server), "/api/stats").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({
            "error": "Failed to fetch stats from VS Code Marketplace",
            "status": 403,
            "statusText": "Forbidden"
        })
    );
}

#[tokio::test]
async fn stats_malformed_upstream_body_is_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let (status, body) = get_json(live_app(&server), "/api/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().unwrap().contains("decode"));
}

#[tokio::test]
async fn stats_rejects_path_like_extension() {
    let server = MockServer::start().await;
    let (status, body) = get_json(live_app(&server), "/api/stats?extension=..%2Fadmin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid extension name");
}

#[tokio::test]
async fn stats_unreachable_upstream_is_internal_error() {
    // bind then release a port so the connection is refused
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{port}/");
    let app = app(&[("VSCODE_MARKETPLACE_PAT", "secret"), ("MARKETPLACE_URL", base.as_str())]);

    let (status, body) = get_json(app, "/api/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().unwrap().contains("marketplace stats"));
}

#[tokio::test]
async fn upstream_calls_are_measured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let errors = REQ_ERRORS.with_label_values(&["marketplace", "stats"]);
    let latency = REQ_LATENCY.with_label_values(&["marketplace", "stats"]);
    let errors_before = errors.get();
    let samples_before = latency.get_sample_count();

    let (status, _) = get_json(live_app(&server), "/api/stats").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(errors.get() > errors_before);
    assert!(latency.get_sample_count() > samples_before);
}

#[tokio::test]
async fn extensions_are_reshaped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header_is("authorization", "Basic OnNlY3JldA=="))
        .and(body_partial_json(json!({
            "flags": 866,
            "filters": [{ "pageSize": 50, "pageNumber": 1, "sortBy": 4 }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_json(live_app(&server), "/api/extensions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "extensionName": "vscode-front-matter",
                "displayName": "Front Matter CMS",
                "shortDescription": "CMS"
            },
            {
                "extensionName": "vscode-demo-time",
                "displayName": "Demo Time",
                "shortDescription": "Demos"
            }
        ])
    );
}

#[tokio::test]
async fn extensions_upstream_error_names_resource() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body) = get_json(live_app(&server), "/api/extensions").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to fetch extensions from VS Code Marketplace"
    );
    assert_eq!(body["status"], 500);
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let req = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let resp = app(&[]).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn preflight_advertises_methods_and_headers() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/stats")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let resp = app(&[]).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let methods = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));

    let allowed = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("authorization"));
}

#[tokio::test]
async fn dashboard_json_uses_mock_without_pat() {
    let (status, body) = get_json(app(&[]), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert_eq!(
        body["notice"]["message"],
        "Using mock data. Provide a PAT token to fetch real data."
    );
    assert_eq!(body["extensionName"], "vscode-demo-time");
    assert_eq!(body["totals"]["pageViews"], 334);
    assert_eq!(body["cards"].as_array().unwrap().len(), 4);
    assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn dashboard_mock_flag_overrides_pat() {
    let (status, body) = get_json(
        app(&[("VSCODE_MARKETPLACE_PAT", "secret"), ("USE_MOCK_DATA", "true")]),
        "/api/dashboard?extension=vscode-front-matter",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert_eq!(body["extensionName"], "vscode-front-matter");
    assert_eq!(body["selector"]["selectedLabel"], "Front Matter CMS");
}

#[tokio::test]
async fn dashboard_falls_back_to_mock_on_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, body) = get_json(live_app(&server), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert_eq!(body["notice"]["level"], "error");
    assert_eq!(
        body["notice"]["message"],
        "API call failed. Using mock data instead."
    );
    assert_eq!(body["statCount"], 31);
}

#[tokio::test]
async fn dashboard_lists_mock_extensions_when_query_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_stats()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let app = live_app(&server);
    let (status, body) = get_json(app.clone(), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live");
    assert_eq!(body["totals"]["pageViews"], 42);

    let options: Vec<&str> = body["selector"]["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["extensionName"].as_str().unwrap())
        .collect();
    assert_eq!(
        options,
        ["vscode-demo-time", "vscode-front-matter", "vscode-remote-control"]
    );

    let (_, _, metrics) = get(app, "/metrics").await;
    let metrics = String::from_utf8(metrics).unwrap();
    assert!(metrics.contains("dash_mock_fallbacks_total{resource=\"extensions\"}"));
}

#[tokio::test]
async fn dashboard_uses_live_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .and(query_param("aggregate", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_stats()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .mount(&server)
        .await;

    let (status, body) = get_json(
        live_app(&server),
        "/api/dashboard?sort=pageViews&order=desc&metric=installs",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live");
    assert_eq!(body["notice"]["message"], "Loaded real extension statistics");
    assert_eq!(body["totals"]["pageViews"], 42);
    assert_eq!(body["totals"]["downloads"], 3);
    assert_eq!(body["chart"]["labels"], json!(["Jul 02, 2025", "Jul 03, 2025"]));
    assert_eq!(body["chart"]["series"].as_array().unwrap().len(), 1);
    assert_eq!(body["chart"]["series"][0]["data"], json!([0, 7]));

    let rows = body["table"]["rows"].as_array().unwrap();
    assert_eq!(rows[0]["pageViews"], 40);
    assert_eq!(rows[0]["rating"], 4.5);
    assert_eq!(rows[1]["rating"], Value::Null);

    let options: Vec<&str> = body["selector"]["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["displayName"].as_str().unwrap())
        .collect();
    assert_eq!(options, ["Demo Time", "Front Matter CMS"]);
}

#[tokio::test]
async fn dashboard_page_renders_html() {
    let (status, headers, body) = get(app(&[]), "/?metric=uninstalls").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<h1>vscode-demo-time</h1>"));
    assert!(html.contains("Using mock data."));
    assert_eq!(html.matches("<polyline").count(), 1);
}

#[tokio::test]
async fn health_and_metrics() {
    let (status, _, _) = get(app(&[]), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, _) = get(app(&[]), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}
