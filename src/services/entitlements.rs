use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::store::MatchStore;

/// Answers the identity and entitlement questions the matchmaking flows ask
/// before acting: who is this user, may they send another interest, are they
/// staff. The interest quota is the one rule that varies by plan, and it is
/// decided here and nowhere else.
#[derive(Clone)]
pub struct EntitlementService {
    store: Arc<dyn MatchStore>,
    free_interest_cap: u32,
}

impl EntitlementService {
    pub fn new(store: Arc<dyn MatchStore>, free_interest_cap: u32) -> Self {
        Self {
            store,
            free_interest_cap,
        }
    }

    pub async fn resolve_user(&self, user_id: Uuid) -> Result<User> {
        self.store
            .user_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound(user_id))
    }

    /// Pure predicate; it never touches the counter. Admins and holders of
    /// an unexpired paid plan are unlimited, free accounts are capped. An
    /// expired paid plan counts as free again.
    pub fn can_send_interest(&self, user: &User) -> bool {
        if user.is_admin() {
            return true;
        }
        if user.plan_active(Utc::now()) {
            return true;
        }
        (user.interests_sent.max(0) as u32) < self.free_interest_cap
    }

    pub fn is_admin(&self, user: &User) -> bool {
        user.is_admin()
    }

    /// Bumps the sent counter and returns the fresh snapshot. Exactly one
    /// call per created interest: `propose` gets this applied inside the
    /// store's insert transaction, so it must not be repeated there.
    pub async fn record_interest_sent(&self, user_id: Uuid) -> Result<User> {
        self.store.increment_interests_sent(user_id).await
    }

    pub fn free_interest_cap(&self) -> u32 {
        self.free_interest_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, NewUser, PlanType, UserRole};
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn service() -> EntitlementService {
        EntitlementService::new(Arc::new(MemoryStore::new()), 2)
    }

    fn member(interests_sent: i32) -> User {
        let new = NewUser {
            full_name: "Test Member".to_string(),
            email: "member@example.com".to_string(),
            gender: Gender::Female,
            age: 28,
            height_cm: None,
            marital_status: None,
            religion: None,
            caste: None,
            mother_tongue: None,
            city: None,
            state: None,
            country: None,
            education: None,
            occupation: None,
            annual_income: None,
            nri: false,
            bio: None,
            photo_url: None,
        };
        let mut user = User::from_registration(Uuid::new_v4(), new, Utc::now());
        user.interests_sent = interests_sent;
        user
    }

    #[test]
    fn free_accounts_stop_at_the_cap() {
        let svc = service();
        assert!(svc.can_send_interest(&member(0)));
        assert!(svc.can_send_interest(&member(1)));
        assert!(!svc.can_send_interest(&member(2)));
        assert!(!svc.can_send_interest(&member(5)));
    }

    #[test]
    fn active_paid_plan_is_unlimited() {
        let svc = service();
        let mut user = member(40);
        user.apply_plan(PlanType::Silver, Utc::now());
        assert!(svc.can_send_interest(&user));
    }

    #[test]
    fn expired_paid_plan_counts_as_free() {
        let svc = service();
        let mut user = member(2);
        user.apply_plan(PlanType::Gold, Utc::now() - Duration::days(120));
        assert!(!svc.can_send_interest(&user));
    }

    #[test]
    fn admins_are_never_capped() {
        let svc = service();
        let mut user = member(99);
        user.role = UserRole::Admin;
        assert!(svc.can_send_interest(&user));
    }
}
