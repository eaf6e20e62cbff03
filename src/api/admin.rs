use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::CurrentAdmin;
use crate::models::{
    AccountStatus, AuditLog, ListUsersParams, ModerationStatus, PlatformStats, ReportStatus, User,
    UserReport,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/status", post(set_account_status))
        .route("/users/:id/moderation", post(set_moderation_status))
        .route("/stats", get(get_stats))
        .route("/reports", get(list_reports))
        .route("/reports/:id/resolve", post(resolve_report))
        .route("/audit-logs", get(list_audit_logs))
}

#[derive(Debug, Deserialize)]
pub struct AdminUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<AccountStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

async fn list_users(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<AdminUsersQuery>,
) -> Result<Json<UserListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let params = ListUsersParams {
        page,
        limit,
        status: query.status,
        search: query.search,
    };
    let (users, total) = state.admin().list_users(&params).await?;

    Ok(Json(UserListResponse {
        users,
        total,
        page,
        limit,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetAccountStatusRequest {
    pub status: AccountStatus,
}

async fn set_account_status(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAccountStatusRequest>,
) -> Result<Json<User>> {
    let user = state
        .admin()
        .set_account_status(admin.user.id, id, payload.status)
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct SetModerationStatusRequest {
    pub status: ModerationStatus,
}

async fn set_moderation_status(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetModerationStatusRequest>,
) -> Result<Json<User>> {
    let user = state
        .admin()
        .set_moderation_status(admin.user.id, id, payload.status)
        .await?;
    Ok(Json(user))
}

async fn get_stats(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<PlatformStats>> {
    let stats = state.admin().platform_stats().await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<ReportStatus>,
}

async fn list_reports(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<UserReport>>> {
    let reports = state.admin().list_reports(query.status).await?;
    Ok(Json(reports))
}

async fn resolve_report(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<UserReport>> {
    let report = state.admin().resolve_report(admin.user.id, id).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct AuditLogsQuery {
    pub limit: Option<u32>,
}

async fn list_audit_logs(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<AuditLogsQuery>,
) -> Result<Json<Vec<AuditLog>>> {
    let limit = query.limit.unwrap_or(50).min(200);
    let logs = state.admin().list_audit_logs(limit).await?;
    Ok(Json(logs))
}
