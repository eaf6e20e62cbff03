use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{PlanType, User};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans))
        .route("/upgrade", post(upgrade_plan))
}

#[derive(Debug, Serialize)]
pub struct PlanInfo {
    pub plan: PlanType,
    pub display_name: &'static str,
    pub price_inr: u32,
    pub duration_months: Option<u32>,
    /// None means unlimited interests while the plan is active.
    pub interest_allowance: Option<u32>,
}

async fn list_plans(State(state): State<AppState>) -> Json<Vec<PlanInfo>> {
    let cap = state.config.matching.free_interest_cap;
    let plans = [
        PlanType::Free,
        PlanType::Silver,
        PlanType::Gold,
        PlanType::Platinum,
    ]
    .into_iter()
    .map(|plan| PlanInfo {
        plan,
        display_name: plan.display_name(),
        price_inr: plan.price_inr(),
        duration_months: plan.duration_months(),
        interest_allowance: if plan.is_paid() { None } else { Some(cap) },
    })
    .collect();

    Json(plans)
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub plan: PlanType,
}

async fn upgrade_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<UpgradeRequest>,
) -> Result<Json<User>> {
    let user = state.users().upgrade_plan(user.id, payload.plan).await?;
    Ok(Json(user))
}
