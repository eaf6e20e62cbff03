use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    AdminService, ConversationService, EntitlementService, InterestService, UserService,
};
use crate::store::MatchStore;

/// Shared application state. Handlers build the service they need per
/// request; the store handle and config are the only long-lived pieces.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn MatchStore>, config: Arc<Config>) -> Self {
        Self { store, config }
    }

    pub fn entitlements(&self) -> EntitlementService {
        EntitlementService::new(self.store.clone(), self.config.matching.free_interest_cap)
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
}
