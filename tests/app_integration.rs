use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::fs;
use tower::ServiceExt;
use tracing::{error, info};

use fxrelay::core::config::AppConfig;
use fxrelay::server::build_router;

mod test_utils {
    use super::*;
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "250"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount": 250.0, "base": "USD", "date": "2024-03-08", "rates": {"EUR": 228.55}}"#,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount": 1.0, "base": "USD", "date": "2024-03-08",
                    "rates": {"AUD": 1.51, "CAD": 1.35, "CHF": 0.88, "EUR": 0.9142, "GBP": 0.78, "JPY": 147.1}}"#,
            ))
            .mount(&mock_server)
            .await;

        // Any date range
        Mock::given(method("GET"))
            .and(path_regex(r"^/\d{4}-\d{2}-\d{2}\.\.\d{4}-\d{2}-\d{2}$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount": 1.0, "base": "USD", "start_date": "2024-03-01", "end_date": "2024-03-08",
                    "rates": {
                        "2024-03-01": {"EUR": 0.9000, "JPY": 150.0},
                        "2024-03-08": {"EUR": 0.9142, "JPY": 147.1}
                    }}"#,
            ))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn app_for(mock_server: &MockServer) -> axum::Router {
        let config = AppConfig::default()
            .with_env_overrides(|key| (key == "FX_UPSTREAM_URL").then(|| mock_server.uri()))
            .expect("Failed to apply overrides");
        let state = fxrelay::build_state(&config).expect("Failed to build state");
        build_router(state)
    }

    pub async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub fn invoke_request(key: &str, body: Value) -> Request<Body> {
        Request::post(format!("/entrypoints/{key}/invoke"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

use test_utils::*;

#[test_log::test(tokio::test)]
async fn test_health_and_catalog() {
    let mock_server = create_mock_server().await;

    let app = app_for(&mock_server).await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = app_for(&mock_server).await;
    let (status, body) = call(app, Request::get("/entrypoints").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("catalog should be an array");
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0]["key"], "overview");
    assert_eq!(entries[0]["price"], Value::Null);
    assert_eq!(entries[1]["price"]["currency"], "USD");
}

#[test_log::test(tokio::test)]
async fn test_overview_with_empty_body() {
    let mock_server = create_mock_server().await;
    let app = app_for(&mock_server).await;

    let request = Request::post("/entrypoints/overview/invoke")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(app, request).await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    assert_eq!(body["output"]["base"], "USD");
    assert_eq!(body["output"]["rates"]["JPY"], 147.1);
}

#[test_log::test(tokio::test)]
async fn test_convert_flow() {
    let mock_server = create_mock_server().await;
    let app = app_for(&mock_server).await;

    let (status, body) = call(
        app,
        invoke_request("convert", json!({"input": {"amount": 250, "from": "usd", "to": "eur"}})),
    )
    .await;
    info!(%body, "convert response");
    assert_eq!(status, StatusCode::OK);
    let output = &body["output"];
    assert_eq!(output["original"]["currency"], "USD");
    assert_eq!(output["converted"]["amount"], 228.55);
    assert_eq!(output["rate"].as_f64().unwrap(), 228.55 / 250.0);
}

#[test_log::test(tokio::test)]
async fn test_compare_and_report_flow() {
    let mock_server = create_mock_server().await;

    let app = app_for(&mock_server).await;
    let (status, body) = call(
        app,
        invoke_request("compare", json!({"input": {"currencies": ["EUR", "JPY", "GBP"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"]["comparison"].as_array().unwrap().len(), 3);
    assert_eq!(body["output"]["strongest"]["currency"], "GBP");
    assert_eq!(body["output"]["weakest"]["currency"], "JPY");

    let app = app_for(&mock_server).await;
    let (status, body) = call(
        app,
        invoke_request("report", json!({"input": {"targets": ["eur", "jpy"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    let trends = body["output"]["trends"].as_array().unwrap();
    assert_eq!(trends[0]["currency"], "EUR");
    assert_eq!(trends[0]["changePercent"], "+1.58%");
    assert_eq!(trends[1]["changePercent"], "-1.93%");
}

#[test_log::test(tokio::test)]
async fn test_repeated_calls_return_identical_content() {
    let mock_server = create_mock_server().await;

    let inputs = [
        ("rates", json!({"input": {"base": "usd", "targets": ["EUR", "JPY"]}})),
        ("compare", json!({"input": {"currencies": ["JPY", "eur", "GBP"]}})),
    ];
    for (key, input) in inputs {
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let app = app_for(&mock_server).await;
            let (status, mut body) = call(app, invoke_request(key, input.clone())).await;
            assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
            let output = body["output"].as_object_mut().expect("output should be an object");
            assert!(output.remove("fetchedAt").is_some());
            outputs.push(body);
        }
        assert_eq!(outputs[0], outputs[1], "{key} differs between calls");
    }
}

#[test_log::test(tokio::test)]
async fn test_error_responses() {
    let mock_server = create_mock_server().await;

    let app = app_for(&mock_server).await;
    let (status, body) = call(
        app,
        invoke_request(
            "history",
            json!({"input": {"targets": ["EUR"], "startDate": "01-01-2024", "endDate": "2024-01-31"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let app = app_for(&mock_server).await;
    let (status, body) = call(app, invoke_request("forecast", json!({"input": {}}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let app = app_for(&mock_server).await;
    let request = Request::post("/entrypoints/rates/invoke")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = call(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("malformed request body")
    );
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_is_bad_gateway() {
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server).await;
    let (status, body) = call(app, invoke_request("rates", json!({"input": {"base": "EUR"}}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert_eq!(body["error"]["message"], "upstream error: HTTP 503");
}

#[test_log::test(tokio::test)]
async fn test_config_file_is_loaded() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    fs::write(
        config_path,
        "port: 4321\nupstream:\n  base_url: http://localhost:1\n  timeout_secs: 3\n",
    )
    .expect("Failed to write config file");

    let config = AppConfig::load_from_path(config_path).expect("Failed to load config");
    assert_eq!(config.port, 4321);
    assert_eq!(config.upstream.timeout_secs, 3);
    assert!(fxrelay::build_state(&config).is_ok());
}

#[test_log::test(tokio::test)]
#[ignore = "hits the real Frankfurter API"]
async fn test_real_frankfurter_api() {
    use fxrelay::core::{CurrencyCode, RateProvider};
    use fxrelay::providers::FrankfurterProvider;

    let provider = FrankfurterProvider::new(
        fxrelay::core::config::DEFAULT_UPSTREAM_URL,
        std::time::Duration::from_secs(30),
    )
    .unwrap();
    let base: CurrencyCode = "USD".parse().unwrap();
    let targets: Vec<CurrencyCode> = vec!["EUR".parse().unwrap()];

    match provider.latest(&base, &targets).await {
        Ok(snapshot) => {
            info!(?snapshot, "Received successful rate response");
            assert!(snapshot.rates["EUR"] > 0.0, "Rate should be positive");
        }
        Err(e) => {
            error!("Rate API request failed: {e}\n{e:?}");
            panic!("Rate API request failed: {e}");
        }
    }
}
