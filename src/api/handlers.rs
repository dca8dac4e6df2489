use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{error::AppResult, models::Mood, services::recommend::Recommendation};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub score: f64,
    pub mood: Mood,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Free text to score for sentiment; empty or absent defaults the
    /// mood to neutral
    #[serde(default)]
    pub text: Option<String>,
    /// Reviewed movie title; when present, recommendations target the
    /// single genre resolved from it
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GenreEntry {
    pub name: String,
    pub id: u64,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Scores standalone text for sentiment
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let (score, mood) = state.recommender.analyze(&request.text)?;

    Ok(Json(AnalyzeResponse {
        score: score.value(),
        mood,
    }))
}

/// Runs the full mood-to-recommendation pipeline
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<Recommendation>> {
    let recommendation = state
        .recommender
        .recommend(request.text.as_deref(), request.title.as_deref(), request.limit)
        .await?;

    Ok(Json(recommendation))
}

/// Lists the genre vocabulary with catalog ids
pub async fn genres(State(state): State<AppState>) -> Json<Vec<GenreEntry>> {
    let entries = state
        .recommender
        .catalog()
        .entries()
        .iter()
        .map(|(tag, id)| GenreEntry {
            name: tag.as_str().to_string(),
            id: *id,
        })
        .collect();

    Json(entries)
}
