use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    AccountStatus, AuditLog, Interest, InterestRole, InterestStatus, ListUsersParams, Message,
    ModerationStatus, NewAuditLog, PlanType, PlatformStats, ProfileFilter, ReportStatus, User,
    UserReport, UserRole,
};
use crate::store::MatchStore;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    interests: Vec<Interest>,
    messages: Vec<Message>,
    reports: Vec<UserReport>,
    audit_logs: Vec<AuditLog>,
}

/// HashMap-backed store used by the test suite and local tooling. One mutex
/// guards all tables, which serializes `create_interest` and gives it the
/// same check-then-insert atomicity the Postgres store gets from its unique
/// pair index.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_profile_filter(user: &User, filter: &ProfileFilter) -> bool {
    fn text_eq(value: &Option<String>, wanted: &Option<String>) -> bool {
        match wanted {
            None => true,
            Some(w) => value
                .as_deref()
                .map(|v| v.eq_ignore_ascii_case(w))
                .unwrap_or(false),
        }
    }

    if let Some(gender) = filter.gender {
        if user.gender != gender {
            return false;
        }
    }
    if !text_eq(&user.religion, &filter.religion)
        || !text_eq(&user.mother_tongue, &filter.mother_tongue)
        || !text_eq(&user.marital_status, &filter.marital_status)
        || !text_eq(&user.city, &filter.city)
        || !text_eq(&user.state, &filter.state)
    {
        return false;
    }
    if let Some(min) = filter.min_age {
        if user.age < min {
            return false;
        }
    }
    if let Some(max) = filter.max_age {
        if user.age > max {
            return false;
        }
    }
    if let Some(nri) = filter.nri {
        if user.nri != nri {
            return false;
        }
    }
    if let Some(ref search) = filter.search {
        let needle = search.to_lowercase();
        let haystacks = [
            Some(user.full_name.as_str()),
            user.city.as_deref(),
            user.occupation.as_deref(),
        ];
        if !haystacks
            .iter()
            .flatten()
            .any(|h| h.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    true
}

fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Vec<T> {
    let offset = ((page.max(1) - 1) * limit) as usize;
    items.iter().skip(offset).take(limit as usize).cloned().collect()
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("email already registered".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_profiles(
        &self,
        filter: &ProfileFilter,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<User>, i64)> {
        let inner = self.inner.lock().await;
        let mut visible: Vec<User> = inner
            .users
            .values()
            .filter(|u| {
                u.role == UserRole::User
                    && u.account_status == AccountStatus::Active
                    && u.moderation_status == ModerationStatus::Approved
                    && matches_profile_filter(u, filter)
            })
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = visible.len() as i64;
        Ok((paginate(&visible, page, limit), total))
    }

    async fn list_users(&self, params: &ListUsersParams) -> Result<(Vec<User>, i64)> {
        let inner = self.inner.lock().await;
        let needle = params.search.as_ref().map(|s| s.to_lowercase());
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| {
                params
                    .status
                    .map(|status| u.account_status == status)
                    .unwrap_or(true)
                    && needle
                        .as_ref()
                        .map(|n| {
                            u.full_name.to_lowercase().contains(n)
                                || u.email.to_lowercase().contains(n)
                        })
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = users.len() as i64;
        Ok((paginate(&users, params.page, params.limit), total))
    }

    async fn increment_interests_sent(&self, user_id: Uuid) -> Result<User> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UserNotFound(user_id))?;
        user.interests_sent += 1;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_plan(
        &self,
        user_id: Uuid,
        plan: PlanType,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<User> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UserNotFound(user_id))?;
        user.plan = plan;
        user.plan_expires_at = expires_at;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_account_status(&self, user_id: Uuid, status: AccountStatus) -> Result<User> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UserNotFound(user_id))?;
        user.account_status = status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_moderation_status(&self, user_id: Uuid, status: ModerationStatus) -> Result<User> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UserNotFound(user_id))?;
        user.moderation_status = status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn create_interest(&self, sender_id: Uuid, receiver_id: Uuid) -> Result<Interest> {
        // One lock span covers the duplicate check, the insert and the
        // counter bump; concurrent proposals for the same pair serialize
        // here.
        let mut inner = self.inner.lock().await;
        if inner
            .interests
            .iter()
            .any(|i| i.links(sender_id, receiver_id))
        {
            return Err(AppError::InterestAlreadyExists);
        }
        let now = Utc::now();
        let sender = inner
            .users
            .get_mut(&sender_id)
            .ok_or(AppError::UserNotFound(sender_id))?;
        sender.interests_sent += 1;
        sender.updated_at = now;
        let interest = Interest {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            status: InterestStatus::Pending,
            created_at: now,
        };
        inner.interests.push(interest.clone());
        Ok(interest)
    }

    async fn interest_by_id(&self, id: Uuid) -> Result<Option<Interest>> {
        let inner = self.inner.lock().await;
        Ok(inner.interests.iter().find(|i| i.id == id).cloned())
    }

    async fn interest_between(&self, a: Uuid, b: Uuid) -> Result<Option<Interest>> {
        let inner = self.inner.lock().await;
        Ok(inner.interests.iter().find(|i| i.links(a, b)).cloned())
    }

    async fn resolve_interest(&self, id: Uuid, status: InterestStatus) -> Result<Option<Interest>> {
        let mut inner = self.inner.lock().await;
        match inner.interests.iter_mut().find(|i| i.id == id) {
            Some(interest) if interest.status == InterestStatus::Pending => {
                interest.status = status;
                Ok(Some(interest.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_interests_for(
        &self,
        user_id: Uuid,
        role: InterestRole,
        status: Option<InterestStatus>,
    ) -> Result<Vec<Interest>> {
        let inner = self.inner.lock().await;
        let mut interests: Vec<Interest> = inner
            .interests
            .iter()
            .filter(|i| match role {
                InterestRole::Sender => i.sender_id == user_id,
                InterestRole::Receiver => i.receiver_id == user_id,
                InterestRole::Either => i.sender_id == user_id || i.receiver_id == user_id,
            })
            .filter(|i| status.map(|s| i.status == s).unwrap_or(true))
            .cloned()
            .collect();
        interests.sort_by_key(|i| i.created_at);
        Ok(interests)
    }

    async fn insert_message(&self, message: &Message) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.messages.push(message.clone());
        Ok(())
    }

    async fn messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        let inner = self.inner.lock().await;
        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b)
                    || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn insert_report(&self, report: &UserReport) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.reports.push(report.clone());
        Ok(())
    }

    async fn report_by_id(&self, id: Uuid) -> Result<Option<UserReport>> {
        let inner = self.inner.lock().await;
        Ok(inner.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn open_report_exists(&self, reporter_id: Uuid, reported_id: Uuid) -> Result<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.reports.iter().any(|r| {
            r.reporter_id == reporter_id
                && r.reported_id == reported_id
                && r.status == ReportStatus::Pending
        }))
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<UserReport>> {
        let inner = self.inner.lock().await;
        let mut reports: Vec<UserReport> = inner
            .reports
            .iter()
            .filter(|r| status.map(|s| r.status == s).unwrap_or(true))
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn resolve_report(&self, id: Uuid) -> Result<Option<UserReport>> {
        let mut inner = self.inner.lock().await;
        match inner.reports.iter_mut().find(|r| r.id == id) {
            Some(report) if report.status == ReportStatus::Pending => {
                report.status = ReportStatus::Resolved;
                report.resolved_at = Some(Utc::now());
                Ok(Some(report.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn insert_audit_log(&self, entry: NewAuditLog) -> Result<AuditLog> {
        let mut inner = self.inner.lock().await;
        let log = AuditLog {
            id: Uuid::new_v4(),
            admin_id: entry.admin_id,
            action: entry.action.as_str().to_string(),
            target_id: entry.target_id,
            details: entry.details,
            created_at: Utc::now(),
        };
        inner.audit_logs.push(log.clone());
        Ok(log)
    }

    async fn list_audit_logs(&self, limit: u32) -> Result<Vec<AuditLog>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .audit_logs
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn platform_stats(&self) -> Result<PlatformStats> {
        let inner = self.inner.lock().await;
        let now = Utc::now();
        let mut stats = PlatformStats::default();
        for user in inner.users.values().filter(|u| u.role == UserRole::User) {
            stats.total_users += 1;
            match user.account_status {
                AccountStatus::Active => stats.active_users += 1,
                AccountStatus::Suspended => stats.suspended_users += 1,
                AccountStatus::Banned => stats.banned_users += 1,
            }
            if user.moderation_status == ModerationStatus::Pending {
                stats.pending_moderation += 1;
            }
            if user.plan_active(now) {
                stats.premium_users += 1;
            }
        }
        for interest in &inner.interests {
            stats.interests_total += 1;
            match interest.status {
                InterestStatus::Pending => stats.interests_pending += 1,
                InterestStatus::Accepted => stats.interests_accepted += 1,
                InterestStatus::Rejected => stats.interests_rejected += 1,
            }
        }
        stats.messages_total = inner.messages.len() as i64;
        stats.open_reports = inner
            .reports
            .iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .count() as i64;
        Ok(stats)
    }
}
