use std::sync::Arc;
use std::time::Duration;

use compute_cpi_data::routes::routes;
use compute_cpi_data::services::fetch::DataClient;
use compute_cpi_data::services::store::DataStore;
use serde_json::Value;
use warp::http::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VARIANTS: &str = include_str!("fixtures/compute-cpi-variants.json");
const HISTORICAL: &str = include_str!("fixtures/historical.json");
const RANKINGS: &str = include_str!("fixtures/rankings.json");

fn json_body(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

async fn upstream() -> MockServer {
    let server = MockServer::start().await;
    for (route, body) in [
        ("/data/compute-cpi.json", VARIANTS),
        ("/data/historical.json", HISTORICAL),
        ("/data/rankings/latest.json", RANKINGS),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(json_body(body))
            .mount(&server)
            .await;
    }
    server
}

fn store_for(server: &MockServer) -> Arc<DataStore> {
    Arc::new(DataStore::new(DataClient::new(server.uri()), Duration::from_secs(300)))
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response is JSON")
}

#[tokio::test]
async fn serves_adapted_compute_cpi() {
    let server = upstream().await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().method("GET").path("/api/v1/compute-cpi").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp.body());
    assert_eq!(body["subindices"]["bulk"]["weight"], serde_json::json!(35.0));
    assert_eq!(body["persona_cpis"]["agentic"]["cpi"], serde_json::json!(15.0));
    assert_eq!(body["spreads"]["context_premium"]["is_estimated"], serde_json::json!(true));
    assert!(body["exchange_rates"].is_object());
    assert!(body.get("market_data").is_none());
}

#[tokio::test]
async fn second_request_within_ttl_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/compute-cpi.json"))
        .respond_with(json_body(VARIANTS))
        .expect(1)
        .mount(&server)
        .await;
    let api = routes(store_for(&server));

    for _ in 0..2 {
        let resp = warp::test::request().path("/api/v1/compute-cpi").reply(&api).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn concurrent_cold_requests_share_one_upstream_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/compute-cpi.json"))
        .respond_with(json_body(VARIANTS).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_for(&server);

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.get_compute_cpi().await })
        })
        .collect();

    for task in tasks {
        let data = task.await.unwrap().unwrap();
        assert_eq!(data.subindices["bulk"].weight, 35.0);
    }
}

#[tokio::test]
async fn failed_refresh_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/rankings/latest.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/rankings/latest.json"))
        .respond_with(json_body(RANKINGS))
        .mount(&server)
        .await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/rankings").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let resp = warp::test::request().path("/api/v1/rankings").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn serves_null_headline_when_upstream_omits_it() {
    let mut raw: Value = serde_json::from_str(VARIANTS).unwrap();
    raw.as_object_mut().unwrap().remove("compute_cpi");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/compute-cpi.json"))
        .respond_with(json_body(&raw.to_string()))
        .mount(&server)
        .await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/compute-cpi").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert!(body["compute_cpi"].is_null());
    assert_eq!(body["subindices"]["bulk"]["weight"], serde_json::json!(35.0));
}

#[tokio::test]
async fn serves_recent_history_newest_first() {
    let server = upstream().await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/historical/recent/2").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    let series = body["historical_series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["period"], "May 2025");
    assert_eq!(series[1]["period"], "Apr 2025");

    let resp = warp::test::request().path("/api/v1/historical").reply(&api).await;
    let body = body_json(resp.body());
    assert_eq!(body["historical_series"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn serves_normalized_rankings() {
    let server = upstream().await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/rankings").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert_eq!(body["by_market_share"][0]["metric_value"], serde_json::json!(34.0));
    assert_eq!(body["by_quality_adjusted_price"][1]["secondary_value"], serde_json::json!(0.3));
    assert_eq!(body["market_velocity"]["declining"][0]["rate"], serde_json::json!(-7.5));
}

#[tokio::test]
async fn upstream_failure_becomes_bad_gateway_with_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/rankings").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(resp.body());
    assert!(body["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn missing_bucket_is_reported_without_partial_data() {
    let mut raw: Value = serde_json::from_str(VARIANTS).unwrap();
    raw["methodology_variants"].as_object_mut().unwrap().remove("general");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/compute-cpi.json"))
        .respond_with(json_body(&raw.to_string()))
        .mount(&server)
        .await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/compute-cpi").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(resp.body());
    assert!(body["error"].as_str().unwrap().contains("general"));
    assert!(body.get("subindices").is_none());
}

#[tokio::test]
async fn calculator_uses_page_defaults_and_rejects_unknown_models() {
    let server = MockServer::start().await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/calculator").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert_eq!(body["monthly_spend"], serde_json::json!(10000.0));
    assert!((body["savings_percent"].as_f64().unwrap() - 73.25).abs() < 1e-6);

    let resp = warp::test::request()
        .path("/api/v1/calculator?monthly_spend=5000&workload=agentic&model=llama")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp.body())["error"].as_str().unwrap().contains("llama"));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = MockServer::start().await;
    let api = routes(store_for(&server));

    let resp = warp::test::request().path("/api/v1/nope").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp.body())["error"], "Not Found");
}
