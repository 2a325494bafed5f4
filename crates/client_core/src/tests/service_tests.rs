use super::*;
use axum::{
    http::StatusCode as AxumStatus,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::Gender;
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

use crate::validator::{validate, FormInput};

fn scenario_input() -> ValidatedInput {
    validate(&FormInput {
        gender: Some(Gender::Male),
        waist: Some(90.0),
        height: Some(175.0),
        weight: Some(80.0),
        age: Some(30),
    })
    .expect("valid input")
}

async fn spawn_server(app: Router) -> Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}")).expect("url")
}

fn low_risk_reply() -> Value {
    json!({
        "success": true,
        "trunk_fat_percentage": 22.5,
        "interpretation": {
            "risk_level": "较低",
            "advice": "keep going",
            "detailed_advice": "good",
            "cutoff_note": "28.6% cutoff",
            "recommendation": []
        }
    })
}

#[derive(Clone)]
struct Captured {
    tx: Arc<Mutex<Option<oneshot::Sender<(HeaderMap, Value)>>>>,
}

#[tokio::test]
async fn posts_json_payload_and_returns_prediction() {
    let (tx, rx) = oneshot::channel();
    let state = Captured {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/predict",
            post(
                |axum::extract::State(state): axum::extract::State<Captured>,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    if let Some(tx) = state.tx.lock().await.take() {
                        let _ = tx.send((headers, body));
                    }
                    Json(low_risk_reply())
                },
            ),
        )
        .with_state(state);
    let base = spawn_server(app).await;

    let client = HttpPredictionClient::new(base);
    let prediction = client.predict(&scenario_input()).await.expect("prediction");
    assert_eq!(prediction.trunk_fat_percentage, 22.5);
    assert_eq!(prediction.interpretation.risk_level, "较低");
    assert!(prediction.interpretation.recommendation.is_empty());

    let (headers, body) = rx.await.expect("captured request");
    assert_eq!(
        body,
        json!({"gender": "male", "waist": 90.0, "height": 175.0, "weight": 80.0, "age": 30})
    );
    assert_eq!(headers.get("accept").and_then(|v| v.to_str().ok()), Some("application/json"));
    assert!(headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json")));
}

#[tokio::test]
async fn error_status_uses_server_message() {
    let app = Router::new().route(
        "/predict",
        post(|| async {
            (
                AxumStatus::SERVICE_UNAVAILABLE,
                Json(json!({"error": "model unavailable"})),
            )
        }),
    );
    let client = HttpPredictionClient::new(spawn_server(app).await);

    let err = client.predict(&scenario_input()).await.expect_err("http error");
    assert_eq!(
        err,
        SubmitError::Http {
            status: 503,
            message: "model unavailable".to_string()
        }
    );
    assert_eq!(err.to_string(), "model unavailable");
}

#[tokio::test]
async fn error_status_without_body_names_status_code() {
    let app = Router::new().route(
        "/predict",
        post(|| async { AxumStatus::INTERNAL_SERVER_ERROR.into_response() }),
    );
    let client = HttpPredictionClient::new(spawn_server(app).await);

    let err = client.predict(&scenario_input()).await.expect_err("http error");
    assert_eq!(err.kind(), "http");
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn error_status_wins_over_success_flag_in_body() {
    let app = Router::new().route(
        "/predict",
        post(|| async { (AxumStatus::BAD_REQUEST, Json(low_risk_reply())) }),
    );
    let client = HttpPredictionClient::new(spawn_server(app).await);

    let err = client.predict(&scenario_input()).await.expect_err("http error");
    assert!(matches!(err, SubmitError::Http { status: 400, .. }));
}

#[tokio::test]
async fn success_false_with_ok_status_is_business_error() {
    let app = Router::new().route(
        "/predict",
        post(|| async { Json(json!({"success": false, "error": "模型未加载"})) }),
    );
    let client = HttpPredictionClient::new(spawn_server(app).await);

    let err = client.predict(&scenario_input()).await.expect_err("business error");
    assert_eq!(err, SubmitError::Business("模型未加载".to_string()));
}

#[tokio::test]
async fn undecodable_reply_is_network_error() {
    let app = Router::new().route("/predict", post(|| async { "not json" }));
    let client = HttpPredictionClient::new(spawn_server(app).await);

    let err = client.predict(&scenario_input()).await.expect_err("malformed");
    assert_eq!(err.kind(), "network");
    assert!(err.to_string().contains("malformed reply"));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = HttpPredictionClient::new(Url::parse(&format!("http://{addr}")).expect("url"));
    let err = client.predict(&scenario_input()).await.expect_err("transport");
    assert!(matches!(err, SubmitError::Network(_)));
}

#[tokio::test]
async fn predict_path_is_absolute_under_base() {
    let app = Router::new().route("/predict", post(|| async { Json(low_risk_reply()) }));
    let base = spawn_server(app).await;
    let nested = base.join("/app/").expect("nested");

    let client = HttpPredictionClient::new(nested);
    client.predict(&scenario_input()).await.expect("prediction");
}

#[tokio::test]
async fn health_probe_decodes_status() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "status": "healthy",
                "model_loaded": true,
                "features": ["Female", "Waist", "Height", "Weight", "Age"]
            }))
        }),
    );
    let client = HttpPredictionClient::new(spawn_server(app).await);

    let health = client.health().await.expect("health");
    assert_eq!(health.status, "healthy");
    assert!(health.model_loaded);
    assert_eq!(health.features.len(), 5);
}

#[test]
fn success_reply_missing_interpretation_is_malformed() {
    let err = interpret_response(PredictionResponse {
        success: true,
        trunk_fat_percentage: Some(30.0),
        interpretation: None,
        error: None,
    })
    .expect_err("malformed");
    assert_eq!(err.kind(), "network");
}

#[test]
fn business_failure_without_message_gets_fallback() {
    let err = interpret_response(PredictionResponse {
        success: false,
        trunk_fat_percentage: None,
        interpretation: None,
        error: None,
    })
    .expect_err("business");
    assert_eq!(err, SubmitError::Business("预测失败".to_string()));
}
