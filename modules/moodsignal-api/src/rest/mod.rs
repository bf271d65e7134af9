use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use moodsignal_common::{Handle, Label};

use crate::error::ApiError;
use crate::AppState;

// --- Request / response bodies ---

#[derive(Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    username: String,
    max_items: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub username: String,
    pub depression: Label,
    pub confidence: f64,
    pub posts_analyzed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DemographicsResponse {
    pub depression_demographic: u8,
    pub confidence_percentage: f64,
    pub message: String,
}

#[derive(Deserialize)]
pub struct VerdictRequest {
    #[serde(default)]
    username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerdictResponse {
    pub username: String,
    pub final_prediction: Label,
    pub weighted_score: f64,
    pub tweet_score: f64,
    pub demographic_score: f64,
    pub message: String,
}

// --- Handlers ---

pub async fn api_welcome() -> Json<Value> {
    Json(serde_json::json!({"message": "Welcome to the MoodSignal API!"}))
}

pub async fn api_predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let handle = Handle::parse(&body.username)?;
    let analysis = state.pipeline.analyze(&handle, body.max_items).await?;

    Ok(Json(PredictResponse {
        username: analysis.handle.to_string(),
        depression: analysis.label,
        confidence: analysis.confidence,
        posts_analyzed: analysis.posts_analyzed,
    }))
}

pub async fn api_store_demographics(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<DemographicsResponse>, ApiError> {
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let handle = Handle::parse(username)?;
    let prediction = state.pipeline.submit_demographics(&handle, &body).await?;

    Ok(Json(DemographicsResponse {
        depression_demographic: prediction.class,
        confidence_percentage: prediction.confidence_percentage(),
        message: "Data stored successfully".to_string(),
    }))
}

pub async fn api_final_prediction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerdictRequest>,
) -> Result<Json<VerdictResponse>, ApiError> {
    let handle = Handle::parse(&body.username)?;
    let verdict = state.pipeline.final_verdict(&handle).await?;

    Ok(Json(VerdictResponse {
        username: handle.to_string(),
        final_prediction: verdict.label,
        weighted_score: verdict.weighted_score,
        tweet_score: verdict.text_score,
        demographic_score: verdict.demographic_score,
        message: "Weighted prediction calculated successfully".to_string(),
    }))
}
