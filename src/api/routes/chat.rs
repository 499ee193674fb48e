//! Chat Routes
//!
//! - POST /api/chat - Analyze health metrics and relay the message upstream

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ChatRequest, ChatResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/chat
///
/// Evaluates `healthContext`, embeds the analysis and `message` into a
/// prompt, and returns the upstream reply together with the analysis.
/// An empty or missing message is accepted.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(req) = payload?;

    let message = req.message.unwrap_or_default();
    let metrics = req.health_context.unwrap_or_default();

    let analysis = state.evaluator.evaluate(&metrics);

    tracing::info!(
        message_len = message.len(),
        calories = %analysis.overview.calories.status,
        mood = %analysis.overview.mood.status,
        water = %analysis.overview.water.status,
        recommendations = analysis.recommendations.len(),
        "Health analysis computed"
    );

    let reply = state.relay.respond(&message, &analysis).await?;

    Ok(Json(ChatResponse::success(reply, analysis)))
}
