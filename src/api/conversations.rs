use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Message;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_conversation))
        .route("/:user_id/eligibility", get(get_eligibility))
        .route("/:user_id/messages", post(send_message))
}

async fn get_conversation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(other_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>> {
    let messages = state
        .conversations()
        .get_conversation(user.id, other_id)
        .await?;
    Ok(Json(messages))
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
}

async fn get_eligibility(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(other_id): Path<Uuid>,
) -> Result<Json<EligibilityResponse>> {
    let eligible = state.conversations().is_eligible(user.id, other_id).await?;
    Ok(Json(EligibilityResponse { eligible }))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(other_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let message = state
        .conversations()
        .send(user.id, other_id, &payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
