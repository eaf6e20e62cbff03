use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    AccountStatus, AuditAction, AuditLog, ListUsersParams, ModerationStatus, NewAuditLog,
    PlatformStats, ReportStatus, User, UserReport,
};
use crate::store::MatchStore;

/// Back-office operations. Every mutation leaves an audit trail entry.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn MatchStore>,
}

impl AdminService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self, params: &ListUsersParams) -> Result<(Vec<User>, i64)> {
        self.store.list_users(params).await
    }

    /// Loads a moderation target; admin accounts are off limits, which also
    /// rules out acting on yourself.
    async fn load_member(&self, target_id: Uuid) -> Result<User> {
        let user = self
            .store
            .user_by_id(target_id)
            .await?
            .ok_or(AppError::UserNotFound(target_id))?;
        if user.is_admin() {
            return Err(AppError::BadRequest(
                "admin accounts cannot be moderated".to_string(),
            ));
        }
        Ok(user)
    }

    pub async fn set_account_status(
        &self,
        admin_id: Uuid,
        target_id: Uuid,
        status: AccountStatus,
    ) -> Result<User> {
        self.load_member(target_id).await?;
        let user = self.store.set_account_status(target_id, status).await?;

        self.store
            .insert_audit_log(NewAuditLog {
                admin_id,
                action: AuditAction::SetAccountStatus,
                target_id: Some(target_id),
                details: Some(json!({ "status": status })),
            })
            .await?;

        tracing::info!(%admin_id, %target_id, ?status, "account status changed");
        Ok(user)
    }

    pub async fn set_moderation_status(
        &self,
        admin_id: Uuid,
        target_id: Uuid,
        status: ModerationStatus,
    ) -> Result<User> {
        // A verdict is approved or rejected; pending is only ever the
        // starting state.
        if status == ModerationStatus::Pending {
            return Err(AppError::BadRequest(
                "moderation verdict must be approved or rejected".to_string(),
            ));
        }

        self.load_member(target_id).await?;
        let user = self.store.set_moderation_status(target_id, status).await?;

        self.store
            .insert_audit_log(NewAuditLog {
                admin_id,
                action: AuditAction::SetModerationStatus,
                target_id: Some(target_id),
                details: Some(json!({ "status": status })),
            })
            .await?;

        tracing::info!(%admin_id, %target_id, ?status, "profile moderated");
        Ok(user)
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        self.store.platform_stats().await
    }

    pub async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<UserReport>> {
        self.store.list_reports(status).await
    }

    pub async fn resolve_report(&self, admin_id: Uuid, report_id: Uuid) -> Result<UserReport> {
        let report = self
            .store
            .report_by_id(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("report {}", report_id)))?;
        if report.status == ReportStatus::Resolved {
            return Err(AppError::Conflict("report already resolved".to_string()));
        }

        let resolved = self
            .store
            .resolve_report(report_id)
            .await?
            .ok_or_else(|| AppError::Conflict("report already resolved".to_string()))?;

        self.store
            .insert_audit_log(NewAuditLog {
                admin_id,
                action: AuditAction::ResolveReport,
                target_id: Some(report.reported_id),
                details: Some(json!({ "report_id": report_id })),
            })
            .await?;

        Ok(resolved)
    }

    pub async fn list_audit_logs(&self, limit: u32) -> Result<Vec<AuditLog>> {
        self.store.list_audit_logs(limit).await
    }
}
