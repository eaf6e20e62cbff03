//! Persistence boundary. Services never touch storage directly; they hold an
//! `Arc<dyn MatchStore>` and everything stateful goes through this trait, so
//! the whole domain runs unchanged against Postgres or the in-memory store.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AccountStatus, AuditLog, Interest, InterestRole, InterestStatus, ListUsersParams, Message,
    ModerationStatus, NewAuditLog, PlanType, PlatformStats, ProfileFilter, ReportStatus, User,
    UserReport,
};

#[async_trait]
pub trait MatchStore: Send + Sync {
    // ---- users ----

    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Browse listing: active, approved, non-admin profiles only.
    async fn list_profiles(
        &self,
        filter: &ProfileFilter,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<User>, i64)>;

    /// Back-office listing: every profile regardless of status.
    async fn list_users(&self, params: &ListUsersParams) -> Result<(Vec<User>, i64)>;

    /// Bumps the sent-interest counter by one and returns the fresh
    /// entitlement snapshot.
    async fn increment_interests_sent(&self, user_id: Uuid) -> Result<User>;

    async fn set_plan(
        &self,
        user_id: Uuid,
        plan: PlanType,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<User>;

    async fn set_account_status(&self, user_id: Uuid, status: AccountStatus) -> Result<User>;

    async fn set_moderation_status(&self, user_id: Uuid, status: ModerationStatus) -> Result<User>;

    // ---- interests ----

    /// Inserts a pending interest and bumps the sender's counter as one
    /// atomic action. The unordered pair is protected by a uniqueness
    /// guarantee: when any record for {sender, receiver} already exists, in
    /// either direction and any status, this fails with
    /// `InterestAlreadyExists` and nothing is written.
    async fn create_interest(&self, sender_id: Uuid, receiver_id: Uuid) -> Result<Interest>;

    async fn interest_by_id(&self, id: Uuid) -> Result<Option<Interest>>;

    /// Unordered-pair lookup: matches either direction.
    async fn interest_between(&self, a: Uuid, b: Uuid) -> Result<Option<Interest>>;

    /// Moves a still-pending interest to `status`. Returns `None` when the
    /// record is missing or no longer pending, so a lost race never
    /// overwrites a terminal state.
    async fn resolve_interest(&self, id: Uuid, status: InterestStatus) -> Result<Option<Interest>>;

    /// Interests where the user plays `role`, oldest first.
    async fn list_interests_for(
        &self,
        user_id: Uuid,
        role: InterestRole,
        status: Option<InterestStatus>,
    ) -> Result<Vec<Interest>>;

    // ---- messages ----

    async fn insert_message(&self, message: &Message) -> Result<()>;

    /// Full history between the pair, oldest first.
    async fn messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>>;

    // ---- reports ----

    async fn insert_report(&self, report: &UserReport) -> Result<()>;

    async fn report_by_id(&self, id: Uuid) -> Result<Option<UserReport>>;

    async fn open_report_exists(&self, reporter_id: Uuid, reported_id: Uuid) -> Result<bool>;

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<UserReport>>;

    /// Marks a still-pending report resolved; `None` when missing or already
    /// worked off.
    async fn resolve_report(&self, id: Uuid) -> Result<Option<UserReport>>;

    // ---- audit & stats ----

    async fn insert_audit_log(&self, entry: NewAuditLog) -> Result<AuditLog>;

    async fn list_audit_logs(&self, limit: u32) -> Result<Vec<AuditLog>>;

    async fn platform_stats(&self) -> Result<PlatformStats>;
}
