use axum::http::header;
use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::store::DiseaseCatalog;
use crate::cli::ServeArgs;
use crate::core::patient::PatientProfile;
use crate::core::types::PatientId;
use crate::history::store::{record_prediction, JsonLinesStore, PredictionRecord, PredictionStore};
use crate::matching::engine::{Matcher, PredictionResult};
use crate::utils::validation::{
    validate_observed_symptoms, validate_profile, ProfileForm, ValidationError,
};

/// Request body size limit (symptom lists and profiles are small)
pub const MAX_BODY_SIZE: usize = 64 * 1024; // 64KB

/// Shared application state
pub struct AppState {
    pub catalog: DiseaseCatalog,
    pub matcher: Matcher,
    history: Mutex<Box<dyn PredictionStore + Send>>,
    patients: Mutex<BTreeMap<PatientId, PatientProfile>>,
}

impl AppState {
    pub fn new(
        catalog: DiseaseCatalog,
        matcher: Matcher,
        history: impl PredictionStore + Send + 'static,
    ) -> Self {
        Self {
            catalog,
            matcher,
            history: Mutex::new(Box::new(history)),
            patients: Mutex::new(BTreeMap::new()),
        }
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Body of `POST /api/predict`
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub patient_id: Option<PatientId>,
}

#[derive(Serialize)]
struct PredictResponse {
    prediction: PredictionResult,
    recorded: bool,
    processing_time_ms: u64,
}

#[derive(Serialize)]
struct PatientResponse {
    patient: PatientProfile,
    bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    predictions: Option<Vec<PredictionRecord>>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

fn validation_error_response(err: &ValidationError) -> Response {
    let error_type = match err {
        ValidationError::NoSymptoms => "no_symptoms",
        ValidationError::TooManySymptoms => "too_many_symptoms",
        ValidationError::SymptomNameTooLong | ValidationError::InvalidSymptomName => {
            "invalid_symptom"
        }
        ValidationError::MissingField(_) => "missing_field",
        ValidationError::FieldTooLong(_) => "field_too_long",
        ValidationError::InvalidAge
        | ValidationError::InvalidMeasurement
        | ValidationError::InvalidBloodType => "invalid_field",
    };
    error_response(
        StatusCode::BAD_REQUEST,
        create_safe_error_response(error_type, &err.to_string(), None),
    )
}

fn patient_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        create_safe_error_response("patient_not_found", "Patient not found.", None),
    )
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Build the application router with routes and security headers, limits and timeouts.
///
/// Rate limiting needs the peer address, so it is added by [`create_router`].
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/css/styles.css", get(styles_css_handler))
        .route("/static/js/main.js", get(main_js_handler))
        .route("/api/symptoms", get(symptoms_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/patients", post(create_patient_handler))
        .route("/api/patients/{id}", get(patient_handler))
        .route("/api/patients/{id}/predictions", get(patient_predictions_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("cache-control"),
                    HeaderValue::from_static("no-store"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the rate limiter cannot be configured.
pub fn create_router(args: &ServeArgs) -> anyhow::Result<Router> {
    let catalog = DiseaseCatalog::load(args.catalog.as_deref())?;
    tracing::info!(
        "Loaded catalog with {} diseases (fingerprint {})",
        catalog.len(),
        catalog.fingerprint()
    );

    let history = JsonLinesStore::new(&args.history);
    let state = Arc::new(AppState::new(catalog, Matcher::default(), history));

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(build_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_router(&args)?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting symptom-check web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

async fn styles_css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("static/css/styles.css"),
    )
}

async fn main_js_handler() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        include_str!("static/js/main.js"),
    )
}

/// Reportable symptoms sorted by name
async fn symptoms_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let symptoms = state.catalog.symptoms_by_name();
    Json(serde_json::json!({
        "count": symptoms.len(),
        "symptoms": symptoms,
    }))
}

/// Return list of diseases in catalog
async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let diseases: Vec<serde_json::Value> = state
        .catalog
        .diseases()
        .map(|d| {
            serde_json::json!({
                "id": d.id,
                "name": d.name,
                "symptom_count": d.symptoms.len(),
                "symptoms": d.symptoms,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": diseases.len(),
        "fingerprint": state.catalog.fingerprint(),
        "diseases": diseases,
    }))
}

/// API endpoint for predicting a disease from symptoms
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let start_time = std::time::Instant::now();

    let observed = match validate_observed_symptoms(&request.symptoms) {
        Ok(observed) => observed,
        Err(e) => return validation_error_response(&e),
    };

    if let Some(patient_id) = request.patient_id {
        let known = state
            .patients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&patient_id);
        if !known {
            return patient_not_found();
        }
    }

    let prediction = state.matcher.predict(&state.catalog, &observed);

    let mut recorded = false;
    if let Some(patient_id) = request.patient_id {
        let history_state = Arc::clone(&state);
        let result = prediction.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut history = history_state
                .history
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            record_prediction(history.as_mut(), patient_id, &result).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|written| written);

        match outcome {
            Ok(written) => recorded = written,
            Err(e) => {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    create_safe_error_response(
                        "history_write_failed",
                        "Error checking symptoms",
                        Some(&e),
                    ),
                );
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time_ms = start_time.elapsed().as_millis() as u64;

    Json(PredictResponse {
        prediction,
        recorded,
        processing_time_ms,
    })
    .into_response()
}

/// Register a patient profile
async fn create_patient_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ProfileForm>,
) -> Response {
    let mut patients = state.patients.lock().unwrap_or_else(PoisonError::into_inner);
    let next_id = patients
        .keys()
        .next_back()
        .map_or(1, |id| id.0.saturating_add(1));

    let profile = match validate_profile(PatientId(next_id), &form) {
        Ok(profile) => profile,
        Err(e) => return validation_error_response(&e),
    };

    tracing::info!("Registered patient {}", profile.patient_id);
    patients.insert(profile.patient_id, profile.clone());

    let bmi = profile.bmi();
    (
        StatusCode::CREATED,
        Json(PatientResponse {
            patient: profile,
            bmi,
            predictions: None,
        }),
    )
        .into_response()
}

/// Patient dashboard: profile, BMI and prediction history
async fn patient_handler(State(state): State<Arc<AppState>>, Path(id): Path<u32>) -> Response {
    let Some(profile) = state
        .patients
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&PatientId(id))
        .cloned()
    else {
        return patient_not_found();
    };

    let predictions = match load_history(&state, PatientId(id)).await {
        Ok(records) => records,
        Err(response) => return *response,
    };

    let bmi = profile.bmi();
    Json(PatientResponse {
        patient: profile,
        bmi,
        predictions: Some(predictions),
    })
    .into_response()
}

/// Prediction history for a patient, newest first
async fn patient_predictions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Response {
    match load_history(&state, PatientId(id)).await {
        Ok(records) => Json(serde_json::json!({
            "patient_id": id,
            "count": records.len(),
            "predictions": records,
        }))
        .into_response(),
        Err(response) => *response,
    }
}

/// Read a patient's history on the blocking pool; file-backed stores do synchronous IO
async fn load_history(
    state: &Arc<AppState>,
    patient_id: PatientId,
) -> Result<Vec<PredictionRecord>, Box<Response>> {
    let history_state = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        let history = history_state
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        history.for_patient(patient_id).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())
    .and_then(|records| records)
    .map_err(|e| {
        Box::new(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response(
                "history_read_failed",
                "Error loading prediction history",
                Some(&e),
            ),
        ))
    })
}
