use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{PlanType, User};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_me))
        .route("/entitlements", get(get_entitlements))
}

async fn get_me(State(state): State<AppState>, current: CurrentUser) -> Result<Json<User>> {
    let user = state.entitlements().resolve_user(current.id).await?;
    Ok(Json(user))
}

/// Snapshot of what the caller may currently do, so clients can grey out the
/// interest button instead of discovering the quota on submit.
#[derive(Debug, Serialize)]
pub struct EntitlementsResponse {
    pub user_id: Uuid,
    pub is_admin: bool,
    pub plan: PlanType,
    pub plan_active: bool,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub interests_sent: i32,
    pub free_interest_cap: u32,
    /// None means unlimited.
    pub interests_remaining: Option<u32>,
    pub can_send_interest: bool,
}

async fn get_entitlements(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<EntitlementsResponse>> {
    let svc = state.entitlements();
    let user = svc.resolve_user(current.id).await?;

    let now = Utc::now();
    let plan_active = user.plan_active(now);
    let cap = svc.free_interest_cap();
    let interests_remaining = if user.is_admin() || plan_active {
        None
    } else {
        Some(cap.saturating_sub(user.interests_sent.max(0) as u32))
    };

    Ok(Json(EntitlementsResponse {
        user_id: user.id,
        is_admin: user.is_admin(),
        plan: user.plan,
        plan_active,
        plan_expires_at: user.plan_expires_at,
        interests_sent: user.interests_sent,
        free_interest_cap: cap,
        interests_remaining,
        can_send_interest: svc.can_send_interest(&user),
    }))
}
