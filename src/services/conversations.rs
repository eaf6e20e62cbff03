use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Interest, InterestStatus, Message};
use crate::store::MatchStore;

/// The single authority on whether two members may chat. Eligibility is
/// derived from the pair's interest record on every call, never cached, so
/// an acceptance or a lost record is reflected immediately.
#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn MatchStore>,
}

impl ConversationService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// The accepted interest governing this pair, if any.
    async fn governing_interest(&self, a: Uuid, b: Uuid) -> Result<Option<Interest>> {
        let interest = self.store.interest_between(a, b).await?;
        Ok(interest.filter(|i| i.status == InterestStatus::Accepted))
    }

    pub async fn is_eligible(&self, a: Uuid, b: Uuid) -> Result<bool> {
        Ok(self.governing_interest(a, b).await?.is_some())
    }

    /// Appends one message to the pair's conversation. The conversation id
    /// is the governing interest's id, so the thread identity is stable for
    /// the lifetime of the match.
    pub async fn send(&self, sender_id: Uuid, receiver_id: Uuid, text: &str) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyMessage);
        }

        if self.store.user_by_id(receiver_id).await?.is_none() {
            return Err(AppError::UserNotFound(receiver_id));
        }

        let interest = self
            .governing_interest(sender_id, receiver_id)
            .await?
            .ok_or(AppError::ConversationNotUnlocked)?;

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: interest.id,
            sender_id,
            receiver_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_message(&message).await?;
        Ok(message)
    }

    /// Everything the pair has said to each other, oldest first.
    pub async fn get_conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        self.store.messages_between(a, b).await
    }
}
