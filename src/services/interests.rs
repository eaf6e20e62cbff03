use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Interest, InterestRole, InterestStatus, ResolveDecision};
use crate::services::EntitlementService;
use crate::store::MatchStore;

/// Owns the interest state machine: a pair starts with no record, `propose`
/// creates the single pending record, `resolve` moves it to accepted or
/// rejected, and there it stays. Records are never deleted.
#[derive(Clone)]
pub struct InterestService {
    store: Arc<dyn MatchStore>,
    entitlements: EntitlementService,
}

impl InterestService {
    pub fn new(store: Arc<dyn MatchStore>, entitlements: EntitlementService) -> Self {
        Self {
            store,
            entitlements,
        }
    }

    /// Denial rules run in a fixed order, each with its own error, so the
    /// same situation always reports the same failure: self-interest, then
    /// unknown users, then admin participants, then an existing record for
    /// the pair, then the sender's quota.
    pub async fn propose(&self, sender_id: Uuid, receiver_id: Uuid) -> Result<Interest> {
        if sender_id == receiver_id {
            return Err(AppError::SelfInterestForbidden);
        }

        let sender = self.entitlements.resolve_user(sender_id).await?;
        let receiver = self.entitlements.resolve_user(receiver_id).await?;

        if self.entitlements.is_admin(&sender) || self.entitlements.is_admin(&receiver) {
            return Err(AppError::AdminNotAParticipant);
        }

        // Any record for the pair blocks a new proposal, a rejected one
        // included; rejection is final for the pair.
        if self
            .store
            .interest_between(sender_id, receiver_id)
            .await?
            .is_some()
        {
            return Err(AppError::InterestAlreadyExists);
        }

        if !self.entitlements.can_send_interest(&sender) {
            return Err(AppError::InterestQuotaExceeded {
                cap: self.entitlements.free_interest_cap(),
            });
        }

        // The store re-checks the pair under its own lock or index and bumps
        // the sender's counter in the same atomic step, so two simultaneous
        // proposals cannot both land.
        self.store.create_interest(sender_id, receiver_id).await
    }

    /// Only the receiver of a pending interest may decide it. The decision
    /// is final for the record.
    pub async fn resolve(
        &self,
        interest_id: Uuid,
        acting_user_id: Uuid,
        decision: ResolveDecision,
    ) -> Result<Interest> {
        let interest = self
            .store
            .interest_by_id(interest_id)
            .await?
            .ok_or(AppError::InterestNotFound(interest_id))?;

        if interest.status != InterestStatus::Pending {
            return Err(AppError::InterestNotPending);
        }
        if interest.receiver_id != acting_user_id {
            return Err(AppError::NotAuthorizedToResolve);
        }

        self.store
            .resolve_interest(interest_id, decision.into())
            .await?
            // A concurrent resolve can win between the read and the update.
            .ok_or(AppError::InterestNotPending)
    }

    pub async fn find_between(&self, a: Uuid, b: Uuid) -> Result<Option<Interest>> {
        self.store.interest_between(a, b).await
    }

    /// Interests involving the user on the given side, oldest first.
    pub async fn list_for(
        &self,
        user_id: Uuid,
        role: InterestRole,
        status: Option<InterestStatus>,
    ) -> Result<Vec<Interest>> {
        self.store.list_interests_for(user_id, role, status).await
    }
}
