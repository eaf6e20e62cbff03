use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    SetAccountStatus,
    SetModerationStatus,
    ResolveReport,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::SetAccountStatus => "set_account_status",
            AuditAction::SetModerationStatus => "set_moderation_status",
            AuditAction::ResolveReport => "resolve_report",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub target_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewAuditLog {
    pub admin_id: Uuid,
    pub action: AuditAction,
    pub target_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Resolved,
}

/// A member's complaint about another member, worked off by admins.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserReport {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_id: Uuid,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Paging and filters for the admin user list. `status`/`search` narrow the
/// result, pages are 1-based.
#[derive(Debug, Clone)]
pub struct ListUsersParams {
    pub page: u32,
    pub limit: u32,
    pub status: Option<crate::models::AccountStatus>,
    pub search: Option<String>,
}

impl Default for ListUsersParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            status: None,
            search: None,
        }
    }
}

/// Headline numbers for the admin overview.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlatformStats {
    pub total_users: i64,
    pub active_users: i64,
    pub suspended_users: i64,
    pub banned_users: i64,
    pub pending_moderation: i64,
    pub premium_users: i64,
    pub interests_total: i64,
    pub interests_pending: i64,
    pub interests_accepted: i64,
    pub interests_rejected: i64,
    pub messages_total: i64,
    pub open_reports: i64,
}
