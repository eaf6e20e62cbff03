//! Shared fixtures for the integration tests: an in-memory store wired up
//! exactly the way `main` wires Postgres, plus helpers that seed the usual
//! cast of accounts.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use samta_api::config::{Config, DatabaseConfig, MatchingConfig, ServerConfig};
use samta_api::models::{Gender, ModerationStatus, NewUser, PlanType, User, UserRole};
use samta_api::services::{
    AdminService, ConversationService, EntitlementService, InterestService, UserService,
};
use samta_api::store::{MatchStore, MemoryStore};
use samta_api::AppState;

pub const FREE_INTEREST_CAP: u32 = 2;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn entitlements(&self) -> EntitlementService {
        EntitlementService::new(self.store.clone(), FREE_INTEREST_CAP)
    }

    pub fn interests(&self) -> InterestService {
        InterestService::new(self.store.clone(), self.entitlements())
    }

    pub fn conversations(&self) -> ConversationService {
        ConversationService::new(self.store.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.store.clone())
    }

    /// The full HTTP application over the same store.
    pub fn http(&self) -> axum::Router {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
            },
            matching: MatchingConfig {
                free_interest_cap: FREE_INTEREST_CAP,
            },
        };
        let state = AppState::new(self.store.clone(), Arc::new(config));
        samta_api::api::router(state)
    }

    /// An approved, active free member.
    pub async fn member(&self, name: &str, gender: Gender, age: i32) -> User {
        let mut user =
            User::from_registration(Uuid::new_v4(), profile(name, gender, age), Utc::now());
        user.moderation_status = ModerationStatus::Approved;
        self.store.insert_user(&user).await.unwrap();
        user
    }

    /// An approved member holding an active paid plan.
    pub async fn premium_member(
        &self,
        name: &str,
        gender: Gender,
        age: i32,
        plan: PlanType,
    ) -> User {
        let mut user =
            User::from_registration(Uuid::new_v4(), profile(name, gender, age), Utc::now());
        user.moderation_status = ModerationStatus::Approved;
        user.apply_plan(plan, Utc::now());
        self.store.insert_user(&user).await.unwrap();
        user
    }

    pub async fn admin_user(&self, name: &str) -> User {
        let mut user =
            User::from_registration(Uuid::new_v4(), profile(name, Gender::Male, 40), Utc::now());
        user.role = UserRole::Admin;
        user.moderation_status = ModerationStatus::Approved;
        self.store.insert_user(&user).await.unwrap();
        user
    }
}

pub fn profile(name: &str, gender: Gender, age: i32) -> NewUser {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    NewUser {
        full_name: name.to_string(),
        email,
        gender,
        age,
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
    }
}
