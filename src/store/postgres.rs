use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    AccountStatus, AuditLog, Interest, InterestRole, InterestStatus, ListUsersParams, Message,
    ModerationStatus, NewAuditLog, PlanType, PlatformStats, ProfileFilter, ReportStatus, User,
    UserReport,
};
use crate::store::MatchStore;

/// Postgres implementation. The unordered-pair invariant is enforced by a
/// unique index over (LEAST(sender_id, receiver_id), GREATEST(sender_id,
/// receiver_id)), and `create_interest` writes the row and the sender's
/// counter inside one transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, full_name, email, gender, age, height_cm, marital_status,
                religion, caste, mother_tongue, city, state, country,
                education, occupation, annual_income, nri, bio, photo_url,
                role, account_status, moderation_status, plan,
                plan_expires_at, interests_sent, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
            )
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.gender)
        .bind(user.age)
        .bind(user.height_cm)
        .bind(&user.marital_status)
        .bind(&user.religion)
        .bind(&user.caste)
        .bind(&user.mother_tongue)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.country)
        .bind(&user.education)
        .bind(&user.occupation)
        .bind(&user.annual_income)
        .bind(user.nri)
        .bind(&user.bio)
        .bind(&user.photo_url)
        .bind(user.role)
        .bind(user.account_status)
        .bind(user.moderation_status)
        .bind(user.plan)
        .bind(user.plan_expires_at)
        .bind(user.interests_sent)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::Conflict("email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_profiles(
        &self,
        filter: &ProfileFilter,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<User>, i64)> {
        let offset = ((page.max(1) - 1) * limit) as i64;

        // Fixed visibility rules first, then one numbered placeholder per
        // provided filter; the bind chains below must follow the same order.
        let mut where_clauses = vec![
            "role = 'user'".to_string(),
            "account_status = 'active'".to_string(),
            "moderation_status = 'approved'".to_string(),
        ];
        let mut n = 0u32;

        if filter.gender.is_some() {
            n += 1;
            where_clauses.push(format!("gender = ${}", n));
        }
        if filter.religion.is_some() {
            n += 1;
            where_clauses.push(format!("religion ILIKE ${}", n));
        }
        if filter.mother_tongue.is_some() {
            n += 1;
            where_clauses.push(format!("mother_tongue ILIKE ${}", n));
        }
        if filter.marital_status.is_some() {
            n += 1;
            where_clauses.push(format!("marital_status ILIKE ${}", n));
        }
        if filter.city.is_some() {
            n += 1;
            where_clauses.push(format!("city ILIKE ${}", n));
        }
        if filter.state.is_some() {
            n += 1;
            where_clauses.push(format!("state ILIKE ${}", n));
        }
        if filter.min_age.is_some() {
            n += 1;
            where_clauses.push(format!("age >= ${}", n));
        }
        if filter.max_age.is_some() {
            n += 1;
            where_clauses.push(format!("age <= ${}", n));
        }
        if filter.nri.is_some() {
            n += 1;
            where_clauses.push(format!("nri = ${}", n));
        }
        if filter.search.is_some() {
            n += 1;
            where_clauses.push(format!(
                "(full_name ILIKE ${n} OR city ILIKE ${n} OR occupation ILIKE ${n})",
                n = n
            ));
        }

        let where_clause = where_clauses.join(" AND ");
        let list_sql = format!(
            "SELECT * FROM users WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            n + 1,
            n + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);

        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let mut list_query = sqlx::query_as::<_, User>(&list_sql);
        if let Some(gender) = filter.gender {
            list_query = list_query.bind(gender);
        }
        if let Some(ref religion) = filter.religion {
            list_query = list_query.bind(religion);
        }
        if let Some(ref mother_tongue) = filter.mother_tongue {
            list_query = list_query.bind(mother_tongue);
        }
        if let Some(ref marital_status) = filter.marital_status {
            list_query = list_query.bind(marital_status);
        }
        if let Some(ref city) = filter.city {
            list_query = list_query.bind(city);
        }
        if let Some(ref state) = filter.state {
            list_query = list_query.bind(state);
        }
        if let Some(min_age) = filter.min_age {
            list_query = list_query.bind(min_age);
        }
        if let Some(max_age) = filter.max_age {
            list_query = list_query.bind(max_age);
        }
        if let Some(nri) = filter.nri {
            list_query = list_query.bind(nri);
        }
        if let Some(ref pattern) = search_pattern {
            list_query = list_query.bind(pattern);
        }
        let users = list_query
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(gender) = filter.gender {
            count_query = count_query.bind(gender);
        }
        if let Some(ref religion) = filter.religion {
            count_query = count_query.bind(religion);
        }
        if let Some(ref mother_tongue) = filter.mother_tongue {
            count_query = count_query.bind(mother_tongue);
        }
        if let Some(ref marital_status) = filter.marital_status {
            count_query = count_query.bind(marital_status);
        }
        if let Some(ref city) = filter.city {
            count_query = count_query.bind(city);
        }
        if let Some(ref state) = filter.state {
            count_query = count_query.bind(state);
        }
        if let Some(min_age) = filter.min_age {
            count_query = count_query.bind(min_age);
        }
        if let Some(max_age) = filter.max_age {
            count_query = count_query.bind(max_age);
        }
        if let Some(nri) = filter.nri {
            count_query = count_query.bind(nri);
        }
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.bind(pattern);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        Ok((users, total))
    }

    async fn list_users(&self, params: &ListUsersParams) -> Result<(Vec<User>, i64)> {
        let offset = ((params.page.max(1) - 1) * params.limit) as i64;

        let mut where_clauses = vec!["1=1".to_string()];
        let mut n = 0u32;
        if params.status.is_some() {
            n += 1;
            where_clauses.push(format!("account_status = ${}", n));
        }
        if params.search.is_some() {
            n += 1;
            where_clauses.push(format!(
                "(full_name ILIKE ${n} OR email ILIKE ${n})",
                n = n
            ));
        }
        let where_clause = where_clauses.join(" AND ");

        let list_sql = format!(
            "SELECT * FROM users WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            n + 1,
            n + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);
        let search_pattern = params.search.as_ref().map(|s| format!("%{}%", s));

        let mut list_query = sqlx::query_as::<_, User>(&list_sql);
        if let Some(status) = params.status {
            list_query = list_query.bind(status);
        }
        if let Some(ref pattern) = search_pattern {
            list_query = list_query.bind(pattern);
        }
        let users = list_query
            .bind(params.limit as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(status) = params.status {
            count_query = count_query.bind(status);
        }
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.bind(pattern);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        Ok((users, total))
    }

    async fn increment_interests_sent(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET interests_sent = interests_sent + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
    }

    async fn set_plan(
        &self,
        user_id: Uuid,
        plan: PlanType,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET plan = $2, plan_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(plan)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
    }

    async fn set_account_status(&self, user_id: Uuid, status: AccountStatus) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET account_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
    }

    async fn set_moderation_status(&self, user_id: Uuid, status: ModerationStatus) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET moderation_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
    }

    async fn create_interest(&self, sender_id: Uuid, receiver_id: Uuid) -> Result<Interest> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Interest>(
            r#"
            INSERT INTO interests (id, sender_id, receiver_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sender_id)
        .bind(receiver_id)
        .bind(InterestStatus::Pending)
        .fetch_one(&mut *tx)
        .await;

        let interest = match inserted {
            Ok(interest) => interest,
            // The pair index fires for either direction and any status.
            Err(e) if is_unique_violation(&e) => return Err(AppError::InterestAlreadyExists),
            Err(e) => return Err(e.into()),
        };

        let updated = sqlx::query(
            "UPDATE users SET interests_sent = interests_sent + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(sender_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls the insert back.
            return Err(AppError::UserNotFound(sender_id));
        }

        tx.commit().await?;
        Ok(interest)
    }

    async fn interest_by_id(&self, id: Uuid) -> Result<Option<Interest>> {
        let interest = sqlx::query_as::<_, Interest>("SELECT * FROM interests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(interest)
    }

    async fn interest_between(&self, a: Uuid, b: Uuid) -> Result<Option<Interest>> {
        let interest = sqlx::query_as::<_, Interest>(
            r#"
            SELECT * FROM interests
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;
        Ok(interest)
    }

    async fn resolve_interest(&self, id: Uuid, status: InterestStatus) -> Result<Option<Interest>> {
        let interest = sqlx::query_as::<_, Interest>(
            r#"
            UPDATE interests
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(interest)
    }

    async fn list_interests_for(
        &self,
        user_id: Uuid,
        role: InterestRole,
        status: Option<InterestStatus>,
    ) -> Result<Vec<Interest>> {
        let role_clause = match role {
            InterestRole::Sender => "sender_id = $1",
            InterestRole::Receiver => "receiver_id = $1",
            InterestRole::Either => "(sender_id = $1 OR receiver_id = $1)",
        };
        let sql = if status.is_some() {
            format!(
                "SELECT * FROM interests WHERE {} AND status = $2 ORDER BY created_at ASC",
                role_clause
            )
        } else {
            format!(
                "SELECT * FROM interests WHERE {} ORDER BY created_at ASC",
                role_clause
            )
        };

        let mut query = sqlx::query_as::<_, Interest>(&sql).bind(user_id);
        if let Some(status) = status {
            query = query.bind(status);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn insert_message(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, receiver_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(&message.text)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn insert_report(&self, report: &UserReport) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, reporter_id, reported_id, reason, status, created_at, resolved_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(report.id)
        .bind(report.reporter_id)
        .bind(report.reported_id)
        .bind(&report.reason)
        .bind(report.status)
        .bind(report.created_at)
        .bind(report.resolved_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn report_by_id(&self, id: Uuid) -> Result<Option<UserReport>> {
        let report = sqlx::query_as::<_, UserReport>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(report)
    }

    async fn open_report_exists(&self, reporter_id: Uuid, reported_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS present FROM reports
            WHERE reporter_id = $1 AND reported_id = $2 AND status = 'pending'
            LIMIT 1
            "#,
        )
        .bind(reporter_id)
        .bind(reported_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<UserReport>> {
        let reports = if let Some(status) = status {
            sqlx::query_as::<_, UserReport>(
                "SELECT * FROM reports WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, UserReport>("SELECT * FROM reports ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?
        };
        Ok(reports)
    }

    async fn resolve_report(&self, id: Uuid) -> Result<Option<UserReport>> {
        let report = sqlx::query_as::<_, UserReport>(
            r#"
            UPDATE reports
            SET status = 'resolved', resolved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    async fn insert_audit_log(&self, entry: NewAuditLog) -> Result<AuditLog> {
        let log = sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (id, admin_id, action, target_id, details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.admin_id)
        .bind(entry.action.as_str())
        .bind(entry.target_id)
        .bind(entry.details)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    async fn list_audit_logs(&self, limit: u32) -> Result<Vec<AuditLog>> {
        let logs = sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    async fn platform_stats(&self) -> Result<PlatformStats> {
        let (total_users, active_users, suspended_users, banned_users, pending_moderation, premium_users): (i64, i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE account_status = 'active'),
                    COUNT(*) FILTER (WHERE account_status = 'suspended'),
                    COUNT(*) FILTER (WHERE account_status = 'banned'),
                    COUNT(*) FILTER (WHERE moderation_status = 'pending'),
                    COUNT(*) FILTER (WHERE plan <> 'free' AND plan_expires_at > NOW())
                FROM users
                WHERE role = 'user'
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let (interests_total, interests_pending, interests_accepted, interests_rejected): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'pending'),
                    COUNT(*) FILTER (WHERE status = 'accepted'),
                    COUNT(*) FILTER (WHERE status = 'rejected')
                FROM interests
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let messages_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;

        let open_reports: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        Ok(PlatformStats {
            total_users,
            active_users,
            suspended_users,
            banned_users,
            pending_moderation,
            premium_users,
            interests_total,
            interests_pending,
            interests_accepted,
            interests_rejected,
            messages_total,
            open_reports,
        })
    }
}
