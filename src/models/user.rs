use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "account_status", rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "moderation_status", rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Subscription plan. Paid plans unlock unlimited interests while active;
/// the Free plan is capped per the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "plan_type", rename_all = "snake_case")]
pub enum PlanType {
    Free,
    Silver,
    Gold,
    Platinum,
}

impl PlanType {
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanType::Free)
    }

    pub fn price_inr(&self) -> u32 {
        match self {
            PlanType::Free => 0,
            PlanType::Silver => 149,
            PlanType::Gold => 399,
            PlanType::Platinum => 699,
        }
    }

    /// Validity purchased in one upgrade. None for the free plan.
    pub fn duration_months(&self) -> Option<u32> {
        match self {
            PlanType::Free => None,
            PlanType::Silver => Some(1),
            PlanType::Gold => Some(3),
            PlanType::Platinum => Some(6),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlanType::Free => "Free",
            PlanType::Silver => "Silver",
            PlanType::Gold => "Gold",
            PlanType::Platinum => "Platinum",
        }
    }

    /// Expiry for a purchase made at `now`, approximating a month as 30 days
    /// the way the billing copy does. None for the free plan.
    pub fn expiry_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration_months()
            .map(|months| now + Duration::days(30 * months as i64))
    }
}

/// A member profile together with its entitlement snapshot. One row in
/// `users`; admins live in the same table with `role = admin`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
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
    pub annual_income: Option<String>,
    pub nri: bool,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub role: UserRole,
    pub account_status: AccountStatus,
    pub moderation_status: ModerationStatus,
    pub plan: PlanType,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub interests_sent: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the user currently holds an unexpired paid plan. A paid plan
    /// with no expiry on record counts as inactive.
    pub fn plan_active(&self, now: DateTime<Utc>) -> bool {
        self.plan.is_paid()
            && self
                .plan_expires_at
                .map(|expires| expires > now)
                .unwrap_or(false)
    }

    /// Build a freshly registered profile. Every field the caller left out
    /// gets its default here, not at read time.
    pub fn from_registration(id: Uuid, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: new.full_name,
            email: new.email,
            gender: new.gender,
            age: new.age,
            height_cm: new.height_cm,
            marital_status: new.marital_status,
            religion: new.religion,
            caste: new.caste,
            mother_tongue: new.mother_tongue,
            city: new.city,
            state: new.state,
            country: new.country.unwrap_or_else(|| "India".to_string()),
            education: new.education,
            occupation: new.occupation,
            annual_income: new.annual_income,
            nri: new.nri,
            bio: new.bio,
            photo_url: new.photo_url,
            role: UserRole::User,
            account_status: AccountStatus::Active,
            moderation_status: ModerationStatus::Pending,
            plan: PlanType::Free,
            plan_expires_at: None,
            interests_sent: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a paid-plan purchase: validity runs from `now`.
    pub fn apply_plan(&mut self, plan: PlanType, now: DateTime<Utc>) {
        self.plan = plan;
        self.plan_expires_at = plan.expiry_from(now);
        self.updated_at = now;
    }
}

/// Registration payload. Optional profile fields default at construction,
/// see [`User::from_registration`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 2, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub gender: Gender,
    #[validate(range(min = 18, max = 100))]
    pub age: i32,
    #[validate(range(min = 100, max = 250))]
    pub height_cm: Option<i32>,
    pub marital_status: Option<String>,
    pub religion: Option<String>,
    pub caste: Option<String>,
    pub mother_tongue: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub annual_income: Option<String>,
    #[serde(default)]
    pub nri: bool,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

/// Search criteria for the public profile browser. All fields combine with
/// AND; omitted fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFilter {
    pub gender: Option<Gender>,
    pub religion: Option<String>,
    pub mother_tongue: Option<String>,
    pub marital_status: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub nri: Option<bool>,
    /// Case-insensitive match over name, city and occupation.
    pub search: Option<String>,
}
