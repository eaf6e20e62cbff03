use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{NewUser, PlanType, ProfileFilter, ReportStatus, User, UserReport};
use crate::store::MatchStore;

/// Member-facing profile operations: registration, lookup, browsing, plan
/// purchases and reporting.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn MatchStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Creates a profile with every omitted field defaulted up front: free
    /// plan, zero interests sent, moderation pending, account active.
    pub async fn register(&self, mut new: NewUser) -> Result<User> {
        new.email = new.email.trim().to_lowercase();
        new.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if self.store.user_by_email(&new.email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let user = User::from_registration(Uuid::new_v4(), new, Utc::now());
        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, "profile registered");
        Ok(user)
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<User> {
        self.store
            .user_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound(id))
    }

    /// Public browse listing. Only active, approved member profiles appear;
    /// admins and unmoderated accounts never do.
    pub async fn browse(
        &self,
        filter: &ProfileFilter,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<User>, i64)> {
        self.store.list_profiles(filter, page, limit).await
    }

    /// Applies a paid-plan purchase. Validity always runs from the purchase
    /// moment; buying again while active restarts the clock on the new plan.
    pub async fn upgrade_plan(&self, user_id: Uuid, plan: PlanType) -> Result<User> {
        let now = Utc::now();
        let expires_at = plan
            .expiry_from(now)
            .ok_or_else(|| AppError::BadRequest("cannot upgrade to the free plan".to_string()))?;

        let user = self.store.set_plan(user_id, plan, Some(expires_at)).await?;
        tracing::info!(user_id = %user.id, plan = plan.display_name(), "plan upgraded");
        Ok(user)
    }

    /// Files a complaint about another member. One open report per
    /// reporter/reported pair at a time.
    pub async fn report_user(
        &self,
        reporter_id: Uuid,
        reported_id: Uuid,
        reason: &str,
    ) -> Result<UserReport> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::BadRequest("report reason is required".to_string()));
        }
        if reporter_id == reported_id {
            return Err(AppError::BadRequest("you cannot report yourself".to_string()));
        }
        if self.store.user_by_id(reported_id).await?.is_none() {
            return Err(AppError::UserNotFound(reported_id));
        }
        if self.store.open_report_exists(reporter_id, reported_id).await? {
            return Err(AppError::Conflict(
                "an open report for this member already exists".to_string(),
            ));
        }

        let report = UserReport {
            id: Uuid::new_v4(),
            reporter_id,
            reported_id,
            reason: reason.to_string(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.store.insert_report(&report).await?;
        Ok(report)
    }
}
