// HTTP request handlers

use axum::{
    extract::{Form, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use super::page;
use super::PredictionServer;
use crate::data::StudentRecord;
use crate::predictor::Prediction;
use crate::training::FeatureWeight;

/// Create the main application router
pub fn create_router(server: Arc<PredictionServer>) -> Router {
    Router::new()
        // Browser form
        .route("/", get(show_form))
        .route("/predict", post(submit_form))
        // JSON API
        .route("/v1/predict", post(handle_predict))
        .route("/v1/model", get(get_model))
        // Health
        .route("/health", get(health_check))
        .with_state(server)
}

/// Response body for /v1/predict
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub model_id: String,
    pub band_label: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// Handle GET / - Render the input form
async fn show_form() -> Html<String> {
    Html(page::render_form())
}

/// Handle POST /predict - Form submission from the browser
async fn submit_form(
    State(server): State<Arc<PredictionServer>>,
    Form(record): Form<StudentRecord>,
) -> Html<String> {
    let prediction = server.predictor().predict(&record);
    tracing::info!(score = prediction.score, band = ?prediction.band, "Form prediction");
    Html(page::render_result(&record, &prediction))
}

/// Handle POST /v1/predict - JSON prediction endpoint
async fn handle_predict(
    State(server): State<Arc<PredictionServer>>,
    Json(record): Json<StudentRecord>,
) -> Json<PredictionResponse> {
    let predictor = server.predictor();
    let prediction = predictor.predict(&record);

    tracing::info!(score = prediction.score, band = ?prediction.band, "API prediction");

    Json(PredictionResponse {
        model_id: predictor.metadata().model_id.clone(),
        band_label: prediction.band.label().to_string(),
        prediction,
    })
}

/// Model description
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub trained_at: String,
    pub schema_fingerprint: String,
    pub intercept: f64,
    pub features: Vec<FeatureWeight>,
}

/// Handle GET /v1/model - Schema and coefficients of the loaded model
async fn get_model(State(server): State<Arc<PredictionServer>>) -> Json<ModelInfo> {
    let predictor = server.predictor();
    let metadata = predictor.metadata();

    let features = predictor
        .schema()
        .names()
        .iter()
        .zip(predictor.model().coefficients().iter())
        .map(|(feature, &coefficient)| FeatureWeight {
            feature: feature.clone(),
            coefficient,
        })
        .collect();

    Json(ModelInfo {
        model_id: metadata.model_id.clone(),
        trained_at: metadata.trained_at.clone(),
        schema_fingerprint: metadata.schema_fingerprint.clone(),
        intercept: predictor.model().intercept(),
        features,
    })
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_id: String,
    pub uptime_seconds: u64,
}

/// Handle GET /health - Health check endpoint
pub async fn health_check(State(server): State<Arc<PredictionServer>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        model_id: server.predictor().metadata().model_id.clone(),
        uptime_seconds: server.uptime_seconds(),
    })
}
