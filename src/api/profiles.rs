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
use crate::models::{Gender, NewUser, PlanType, ProfileFilter, User, UserReport};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register).get(browse))
        .route("/:id", get(get_profile))
        .route("/:id/report", post(report_profile))
}

/// What other members see of a profile. Email and income stay off the public
/// view.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub full_name: String,
    pub gender: Gender,
    pub age: i32,
    pub height_cm: Option<i32>,
    pub marital_status: Option<String>,
    pub religion: Option<String>,
    pub caste: Option<String>,
    pub mother_tongue: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub nri: bool,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub plan: PlanType,
}

impl From<User> for ProfileView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            gender: user.gender,
            age: user.age,
            height_cm: user.height_cm,
            marital_status: user.marital_status,
            religion: user.religion,
            caste: user.caste,
            mother_tongue: user.mother_tongue,
            city: user.city,
            state: user.state,
            country: user.country,
            education: user.education,
            occupation: user.occupation,
            nri: user.nri,
            bio: user.bio,
            photo_url: user.photo_url,
            plan: user.plan,
        }
    }
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.users().register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub gender: Option<Gender>,
    pub religion: Option<String>,
    pub mother_tongue: Option<String>,
    pub marital_status: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub nri: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileView>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

async fn browse(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ProfileListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let filter = ProfileFilter {
        gender: query.gender,
        religion: query.religion,
        mother_tongue: query.mother_tongue,
        marital_status: query.marital_status,
        city: query.city,
        state: query.state,
        min_age: query.min_age,
        max_age: query.max_age,
        nri: query.nri,
        search: query.search,
    };
    let (users, total) = state.users().browse(&filter, page, limit).await?;

    Ok(Json(ProfileListResponse {
        profiles: users.into_iter().map(ProfileView::from).collect(),
        total,
        page,
        limit,
    }))
}

async fn get_profile(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileView>> {
    let user = state.users().get_profile(id).await?;
    Ok(Json(ProfileView::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub reason: String,
}

async fn report_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportRequest>,
) -> Result<(StatusCode, Json<UserReport>)> {
    let report = state
        .users()
        .report_user(user.id, id, &payload.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}
