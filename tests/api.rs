//! Router tests exercising the HTTP surface end to end.
//!
//! Run with: cargo test --test api

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use dht_series::common::AppState;
use dht_series::config::{Config, Deployment};
use dht_series::routes;
use dht_series::series::{AlertThresholds, ThresholdRange};

fn test_config() -> Config {
    Config {
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        disable_rate_limiting: true,
        rate_limit_metadata_per_second: 1,
        rate_limit_metadata_burst: 60,
        rate_limit_data_per_second: 10,
        rate_limit_data_burst: 60,
        alert_thresholds: AlertThresholds {
            temperature: ThresholdRange {
                low: 10.0,
                high: 35.0,
            },
            humidity: ThresholdRange {
                low: 20.0,
                high: 70.0,
            },
        },
        alert_sound: None,
        deployment: Deployment::Local,
    }
}

fn app() -> Router {
    routes::build_router(AppState::new(test_config()))
}

fn process_request(body: &Value, query: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/series/process{query}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_body(location: &str) -> Value {
    json!({
        "location": location,
        "samples": [
            {"timestamp": "2026-08-01T00:00:00Z", "temperature": 20.0, "humidity": 50.0, "location": location},
            {"timestamp": "2026-08-01T00:30:00Z", "temperature": 22.0, "humidity": 52.0, "location": location},
            {"timestamp": "2026-08-01T02:00:00Z", "temperature": 24.0, "humidity": 54.0, "location": location},
        ],
        "from": "2026-08-01T00:00:00Z",
        "to": "2026-08-01T02:00:00Z",
        "rolling_window": 2,
    })
}

#[tokio::test]
async fn healthz_returns_ok() {
    let response = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn presets_lists_the_lookup_table() {
    let response = app()
        .oneshot(Request::get("/api/presets").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let presets = body.as_array().unwrap();
    assert_eq!(presets.len(), 5);
    assert_eq!(presets[0]["name"], "1h");
    assert_eq!(presets[0]["rolling_window"], 5);
}

#[tokio::test]
async fn process_returns_annotated_series() {
    let response = app()
        .oneshot(process_request(&sample_body("living-room"), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["resolution"], "1-min");
    assert_eq!(body["series"].as_array().unwrap().len(), 121);
    assert_eq!(body["series"][30]["temperature"], 22.0);
    assert_eq!(body["series"][30]["temperature_mean"], 21.0);
    assert_eq!(body["summary"]["count"], 121);
    assert_eq!(body["summary"]["latest_temperature"], 24.0);
    // In-range readings: nothing fires.
    assert_eq!(body["alerts"]["fired"].as_array().unwrap().len(), 0);
    assert_eq!(body["alerts"]["state"]["temperature_active"], false);
}

#[tokio::test]
async fn process_fires_edge_triggered_alert_once() {
    let app = app();

    let mut body = sample_body("attic");
    body["thresholds"] = json!({
        "temperature": {"low": 10.0, "high": 21.0},
        "humidity": {"low": 20.0, "high": 70.0},
    });

    // First refresh: latest temperature 24.0 exceeds high=21 and fires.
    let response = app
        .clone()
        .oneshot(process_request(&body, ""))
        .await
        .unwrap();
    let first = json_body(response).await;
    assert_eq!(first["alerts"]["fired"].as_array().unwrap().len(), 1);
    assert_eq!(first["alerts"]["fired"][0]["metric"], "temperature");
    assert_eq!(first["alerts"]["fired"][0]["kind"], "high");
    assert_eq!(first["alerts"]["state"]["temperature_active"], true);

    // Same condition on the next refresh: suppressed, still active.
    let response = app.oneshot(process_request(&body, "")).await.unwrap();
    let second = json_body(response).await;
    assert_eq!(second["alerts"]["fired"].as_array().unwrap().len(), 0);
    assert_eq!(second["alerts"]["state"]["temperature_active"], true);
}

#[tokio::test]
async fn process_with_empty_samples_reports_no_data() {
    let body = json!({
        "location": "cellar",
        "samples": [],
        "from": "2026-08-01T00:00:00Z",
        "to": "2026-08-01T01:00:00Z",
    });

    let response = app().oneshot(process_request(&body, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    assert_eq!(parsed["status"], "no_data");
    assert_eq!(parsed["series"].as_array().unwrap().len(), 0);
    assert_eq!(parsed["summary"]["count"], 0);
    assert_eq!(parsed["summary"]["temperature"], Value::Null);
}

#[tokio::test]
async fn process_rejects_misordered_fetch_window() {
    let mut body = sample_body("bedroom");
    body["fetch_from"] = json!("2026-08-01T00:30:00Z");

    let response = app().oneshot(process_request(&body, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let parsed = json_body(response).await;
    assert!(parsed["error"].as_str().unwrap().contains("fetch"));
}

#[tokio::test]
async fn process_rejects_unknown_preset() {
    let body = json!({
        "location": "bedroom",
        "samples": [],
        "preset": "fortnight",
    });

    let response = app().oneshot(process_request(&body, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn process_requires_a_window() {
    let body = json!({
        "location": "bedroom",
        "samples": [],
    });

    let response = app().oneshot(process_request(&body, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn process_streams_csv_when_requested() {
    let response = app()
        .oneshot(process_request(&sample_body("bedroom"), "?format=csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("time,temperature,humidity,temperature_mean,humidity_mean,event")
    );
    // Header plus one row per grid position.
    assert_eq!(text.lines().count(), 122);
}

#[tokio::test]
async fn process_negotiates_ndjson_via_accept_header() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/series/process")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/x-ndjson")
        .body(Body::from(
            serde_json::to_vec(&sample_body("bedroom")).unwrap(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/x-ndjson"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 121);
    let first: Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["temperature"], 20.0);
}
