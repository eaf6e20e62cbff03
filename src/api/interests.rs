use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{Interest, InterestRole, InterestStatus, ResolveDecision};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(propose_interest).get(list_interests))
        .route("/with/:user_id", get(interest_with))
        .route("/:id/resolve", post(resolve_interest))
}

#[derive(Debug, Deserialize)]
pub struct ProposeRequest {
    pub receiver_id: Uuid,
}

async fn propose_interest(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProposeRequest>,
) -> Result<(StatusCode, Json<Interest>)> {
    let interest = state
        .interests()
        .propose(user.id, payload.receiver_id)
        .await?;
    Ok((StatusCode::CREATED, Json(interest)))
}

#[derive(Debug, Deserialize)]
pub struct ListInterestsQuery {
    pub role: Option<InterestRole>,
    pub status: Option<InterestStatus>,
}

async fn list_interests(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListInterestsQuery>,
) -> Result<Json<Vec<Interest>>> {
    let interests = state
        .interests()
        .list_for(
            user.id,
            query.role.unwrap_or(InterestRole::Either),
            query.status,
        )
        .await?;
    Ok(Json(interests))
}

#[derive(Debug, Serialize)]
pub struct InterestBetweenResponse {
    pub interest: Option<Interest>,
}

async fn interest_with(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(other_id): Path<Uuid>,
) -> Result<Json<InterestBetweenResponse>> {
    let interest = state.interests().find_between(user.id, other_id).await?;
    Ok(Json(InterestBetweenResponse { interest }))
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub decision: ResolveDecision,
}

async fn resolve_interest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<Interest>> {
    let interest = state
        .interests()
        .resolve(id, user.id, payload.decision)
        .await?;
    Ok(Json(interest))
}
