//! JSON API tests
//!
//! These drive the router in-process with `tower::ServiceExt::oneshot`. Rate limiting
//! needs a peer address and is only added by `create_router`, so it is not exercised here.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use symptom_check::history::store::{JsonLinesStore, MemoryStore};
use symptom_check::web::server::{build_router, AppState};
use symptom_check::{Disease, DiseaseCatalog, Matcher};

fn embedded_app() -> Router {
    let catalog = DiseaseCatalog::load_embedded().expect("embedded catalog");
    build_router(Arc::new(AppState::new(
        catalog,
        Matcher::default(),
        MemoryStore::new(),
    )))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn profile() -> Value {
    json!({
        "name": "Ada",
        "age": "36",
        "gender": "female",
        "height": "1.80",
        "weight": "81",
        "blood_type": "O+",
    })
}

#[tokio::test]
async fn test_index_served_with_security_headers() {
    let app = embedded_app();
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_symptoms_sorted_by_name() {
    let app = embedded_app();
    let (status, body) = send(&app, get("/api/symptoms")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["symptoms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 27);
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_catalog_lists_diseases() {
    let app = embedded_app();
    let (status, body) = send(&app, get("/api/catalog")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 12);
    assert_eq!(body["diseases"][0]["name"], "Common Cold");
    assert_eq!(body["fingerprint"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn test_predict_best_match_and_alternatives() {
    let app = embedded_app();
    let (status, body) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": ["Fever", "Cough", "Fatigue"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prediction = &body["prediction"];
    assert_eq!(prediction["disease_id"], 3);
    assert_eq!(prediction["disease_name"], "COVID-19");
    assert_eq!(prediction["probability"], 60.0);
    assert_eq!(prediction["urgency_level"], "medium");
    assert_eq!(
        prediction["matched_symptoms"],
        json!(["Cough", "Fatigue", "Fever"])
    );
    assert_eq!(
        prediction["alternative_diseases"],
        json!([
            {"name": "Influenza", "probability": 50.0},
            {"name": "Pneumonia", "probability": 40.0},
        ])
    );
    assert_eq!(body["recorded"], false);
}

#[tokio::test]
async fn test_predict_unknown_symptom() {
    let app = embedded_app();
    let (status, body) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": ["Hiccups"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prediction = &body["prediction"];
    assert_eq!(prediction["disease_name"], "Unknown");
    assert!(prediction["disease_id"].is_null());
    assert_eq!(prediction["probability"], 0.0);
    assert_eq!(prediction["urgency_level"], "low");
    assert_eq!(prediction["alternative_diseases"], json!([]));
}

#[tokio::test]
async fn test_predict_requires_symptoms() {
    let app = embedded_app();
    for body in [json!({"symptoms": []}), json!({"symptoms": ["  ", ""]}), json!({})] {
        let (status, response) = send(&app, post_json("/api/predict", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Please select at least one symptom");
        assert_eq!(response["error_type"], "no_symptoms");
        assert!(response["details"].is_null());
    }
}

#[tokio::test]
async fn test_predict_rejects_unknown_patient() {
    let app = embedded_app();
    let (status, body) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": ["Fever"], "patient_id": 42})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "patient_not_found");
}

#[tokio::test]
async fn test_patient_registration_and_history() {
    let app = embedded_app();

    let (status, created) = send(&app, post_json("/api/patients", &profile())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["patient"]["patient_id"], 1);
    assert_eq!(created["patient"]["blood_type"], "O+");
    assert_eq!(created["bmi"], 25.0);

    let (_, first) = send(
        &app,
        post_json(
            "/api/predict",
            &json!({"symptoms": ["Sneezing", "Runny Nose", "Itchy Eyes"], "patient_id": 1}),
        ),
    )
    .await;
    assert_eq!(first["recorded"], true);
    assert_eq!(first["prediction"]["disease_name"], "Seasonal Allergies");
    assert_eq!(first["prediction"]["urgency_level"], "high");

    // No overlap, so nothing is recorded
    let (_, unknown) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": ["Hiccups"], "patient_id": 1})),
    )
    .await;
    assert_eq!(unknown["recorded"], false);

    let (status, dashboard) = send(&app, get("/api/patients/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["patient"]["name"], "Ada");
    assert_eq!(dashboard["bmi"], 25.0);
    let predictions = dashboard["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0]["disease_name"], "Seasonal Allergies");
    assert_eq!(predictions[0]["probability"], 100.0);

    let (status, history) = send(&app, get("/api/patients/1/predictions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["count"], 1);
}

#[tokio::test]
async fn test_patient_ids_increase() {
    let app = embedded_app();
    let (_, first) = send(&app, post_json("/api/patients", &profile())).await;
    let (_, second) = send(&app, post_json("/api/patients", &profile())).await;

    assert_eq!(first["patient"]["patient_id"], 1);
    assert_eq!(second["patient"]["patient_id"], 2);
}

#[tokio::test]
async fn test_patient_validation_errors() {
    let app = embedded_app();

    let mut missing = profile();
    missing["gender"] = json!("");
    let (status, body) = send(&app, post_json("/api/patients", &missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "missing_field");

    let mut bad_age = profile();
    bad_age["age"] = json!("thirty");
    let (status, body) = send(&app, post_json("/api/patients", &bad_age)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Age must be a number.");

    let mut bad_blood = profile();
    bad_blood["blood_type"] = json!("C+");
    let (status, body) = send(&app, post_json("/api/patients", &bad_blood)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid blood type selected.");
}

#[tokio::test]
async fn test_unknown_patient_dashboard() {
    let app = embedded_app();
    let (status, body) = send(&app, get("/api/patients/9")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found.");
}

#[tokio::test]
async fn test_custom_catalog_tie_goes_to_lowest_id() {
    let mut catalog = DiseaseCatalog::new();
    catalog
        .add_disease(Disease::new(2, "D2").with_symptoms(["Fever", "Cough"]))
        .unwrap();
    catalog
        .add_disease(Disease::new(1, "D1").with_symptoms(["Fever", "Rash"]))
        .unwrap();
    let app = build_router(Arc::new(AppState::new(
        catalog,
        Matcher::default(),
        MemoryStore::new(),
    )));

    let (_, body) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": ["Fever"]})),
    )
    .await;
    assert_eq!(body["prediction"]["disease_name"], "D1");
    assert_eq!(
        body["prediction"]["alternative_diseases"],
        json!([{"name": "D2", "probability": 50.0}])
    );
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = embedded_app();
    let huge = "x".repeat(symptom_check::web::server::MAX_BODY_SIZE + 1);
    let (status, _) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": [huge]})),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_file_history_survives_truncated_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    std::fs::write(&path, r#"{"patient_id":1,"disease_id":"#).unwrap();

    let catalog = DiseaseCatalog::load_embedded().unwrap();
    let app = build_router(Arc::new(AppState::new(
        catalog,
        Matcher::default(),
        JsonLinesStore::new(&path),
    )));
    send(&app, post_json("/api/patients", &profile())).await;

    let (status, history) = send(&app, get("/api/patients/1/predictions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["count"], 0);

    let (status, body) = send(
        &app,
        post_json("/api/predict", &json!({"symptoms": ["Wheezing"], "patient_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], true);

    let (status, dashboard) = send(&app, get("/api/patients/1")).await;
    assert_eq!(status, StatusCode::OK);
    let predictions = dashboard["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0]["disease_name"], "Asthma");
}
