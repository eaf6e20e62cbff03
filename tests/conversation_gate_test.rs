//! Conversation gate: messaging stays locked until the pair's interest is
//! accepted, and the thread is keyed by that interest.
//!
//! Run: cargo test --test conversation_gate_test

mod common;

use common::TestApp;
use samta_api::models::{Gender, ResolveDecision};
use samta_api::AppError;
use uuid::Uuid;

#[tokio::test]
async fn no_interest_means_no_conversation() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;

    assert!(!app
        .conversations()
        .is_eligible(asha.id, bharat.id)
        .await
        .unwrap());

    let err = app
        .conversations()
        .send(asha.id, bharat.id, "Hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConversationNotUnlocked));
}

#[tokio::test]
async fn pending_and_rejected_interests_do_not_unlock() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;

    let interest = app.interests().propose(asha.id, bharat.id).await.unwrap();
    assert!(!app
        .conversations()
        .is_eligible(asha.id, bharat.id)
        .await
        .unwrap());

    app.interests()
        .resolve(interest.id, bharat.id, ResolveDecision::Rejected)
        .await
        .unwrap();
    assert!(!app
        .conversations()
        .is_eligible(asha.id, bharat.id)
        .await
        .unwrap());

    let err = app
        .conversations()
        .send(bharat.id, asha.id, "Hello?")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConversationNotUnlocked));
}

#[tokio::test]
async fn acceptance_unlocks_both_directions_without_any_extra_step() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;

    let interest = app.interests().propose(asha.id, bharat.id).await.unwrap();
    app.interests()
        .resolve(interest.id, bharat.id, ResolveDecision::Accepted)
        .await
        .unwrap();

    // Eligibility is recomputed from the record, so the very next call
    // already sees the acceptance.
    assert!(app
        .conversations()
        .is_eligible(asha.id, bharat.id)
        .await
        .unwrap());
    assert!(app
        .conversations()
        .is_eligible(bharat.id, asha.id)
        .await
        .unwrap());

    let from_sender = app
        .conversations()
        .send(asha.id, bharat.id, "So nice to match with you!")
        .await
        .unwrap();
    let from_receiver = app
        .conversations()
        .send(bharat.id, asha.id, "Likewise!")
        .await
        .unwrap();

    // The thread is keyed by the interest that unlocked it.
    assert_eq!(from_sender.conversation_id, interest.id);
    assert_eq!(from_receiver.conversation_id, interest.id);
}

#[tokio::test]
async fn blank_messages_are_refused_before_anything_else() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;

    // Receiver does not even exist; the empty check fires first.
    let err = app
        .conversations()
        .send(asha.id, Uuid::new_v4(), "   \n\t  ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyMessage));
}

#[tokio::test]
async fn sending_to_an_unknown_receiver_fails() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let ghost = Uuid::new_v4();

    let err = app
        .conversations()
        .send(asha.id, ghost, "Anyone there?")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(id) if id == ghost));
}

#[tokio::test]
async fn message_text_is_stored_trimmed() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;

    let interest = app.interests().propose(asha.id, bharat.id).await.unwrap();
    app.interests()
        .resolve(interest.id, bharat.id, ResolveDecision::Accepted)
        .await
        .unwrap();

    let message = app
        .conversations()
        .send(asha.id, bharat.id, "  Hello there  ")
        .await
        .unwrap();
    assert_eq!(message.text, "Hello there");
}

#[tokio::test]
async fn history_interleaves_both_sides_oldest_first() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;

    let interest = app.interests().propose(asha.id, bharat.id).await.unwrap();
    app.interests()
        .resolve(interest.id, bharat.id, ResolveDecision::Accepted)
        .await
        .unwrap();

    app.conversations()
        .send(asha.id, bharat.id, "one")
        .await
        .unwrap();
    app.conversations()
        .send(bharat.id, asha.id, "two")
        .await
        .unwrap();
    app.conversations()
        .send(asha.id, bharat.id, "three")
        .await
        .unwrap();

    let history = app
        .conversations()
        .get_conversation(bharat.id, asha.id)
        .await
        .unwrap();
    let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);

    // A pair with no thread reads as empty, not as an error.
    let chitra = app.member("Chitra Nair", Gender::Female, 26).await;
    let empty = app
        .conversations()
        .get_conversation(asha.id, chitra.id)
        .await
        .unwrap();
    assert!(empty.is_empty());
}
