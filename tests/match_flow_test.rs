//! End-to-end matchmaking: registration, browsing, the interest exchange,
//! the unlocked conversation and the quota along the way.
//!
//! Run: cargo test --test match_flow_test

mod common;

use common::{profile, TestApp};
use samta_api::models::{
    Gender, InterestRole, InterestStatus, ModerationStatus, PlanType, ProfileFilter,
    ResolveDecision,
};
use samta_api::AppError;

#[tokio::test]
async fn registration_to_conversation() {
    let app = TestApp::new();

    let priya = app
        .users()
        .register(profile("Priya Sharma", Gender::Female, 27))
        .await
        .unwrap();
    let rahul = app
        .users()
        .register(profile("Rahul Mehra", Gender::Male, 30))
        .await
        .unwrap();

    assert_eq!(priya.interests_sent, 0);
    assert_eq!(priya.plan, PlanType::Free);
    assert_eq!(priya.moderation_status, ModerationStatus::Pending);

    // Priya expresses interest.
    let interest = app.interests().propose(priya.id, rahul.id).await.unwrap();
    assert_eq!(interest.status, InterestStatus::Pending);

    // No conversation until Rahul accepts.
    assert!(!app
        .conversations()
        .is_eligible(rahul.id, priya.id)
        .await
        .unwrap());
    let err = app
        .conversations()
        .send(rahul.id, priya.id, "Hi!")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConversationNotUnlocked));

    // Rahul finds the proposal in his received list and accepts it.
    let received = app
        .interests()
        .list_for(rahul.id, InterestRole::Receiver, Some(InterestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].sender_id, priya.id);

    let accepted = app
        .interests()
        .resolve(received[0].id, rahul.id, ResolveDecision::Accepted)
        .await
        .unwrap();
    assert_eq!(accepted.status, InterestStatus::Accepted);

    // The match unlocks chat in both directions.
    app.conversations()
        .send(rahul.id, priya.id, "Hello Priya, lovely profile!")
        .await
        .unwrap();
    app.conversations()
        .send(priya.id, rahul.id, "Thank you! Tell me about your work?")
        .await
        .unwrap();
    app.conversations()
        .send(rahul.id, priya.id, "Civil engineer, mostly bridges.")
        .await
        .unwrap();

    let thread = app
        .conversations()
        .get_conversation(priya.id, rahul.id)
        .await
        .unwrap();
    assert_eq!(thread.len(), 3);
    assert!(thread.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    assert!(thread.iter().all(|m| m.conversation_id == accepted.id));

    // The pair's record is permanent; no second proposal either way.
    let err = app.interests().propose(rahul.id, priya.id).await.unwrap_err();
    assert!(matches!(err, AppError::InterestAlreadyExists));
}

#[tokio::test]
async fn duplicate_emails_cannot_register() {
    let app = TestApp::new();

    app.users()
        .register(profile("Priya Sharma", Gender::Female, 27))
        .await
        .unwrap();

    let mut again = profile("Priya S", Gender::Female, 28);
    again.email = "  PRIYA.SHARMA@example.com ".to_string();
    let err = app.users().register(again).await.unwrap_err();
    assert!(
        matches!(err, AppError::Conflict(_)),
        "emails are compared case-insensitively after trimming"
    );
}

#[tokio::test]
async fn rejected_payloads_never_reach_the_store() {
    let app = TestApp::new();

    let mut minor = profile("Too Young", Gender::Male, 16);
    let err = app.users().register(minor.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    minor.age = 19;
    minor.email = "not-an-email".to_string();
    let err = app.users().register(minor).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let (profiles, total) = app
        .users()
        .browse(&ProfileFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(profiles.is_empty());
}

#[tokio::test]
async fn browse_shows_only_approved_active_members() {
    let app = TestApp::new();
    let admin = app.admin_user("Back Office").await;

    let fresh = app
        .users()
        .register(profile("Priya Sharma", Gender::Female, 27))
        .await
        .unwrap();

    // Pending moderation keeps the profile out of the browser.
    let (_, total) = app
        .users()
        .browse(&ProfileFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);

    app.admin()
        .set_moderation_status(admin.id, fresh.id, ModerationStatus::Approved)
        .await
        .unwrap();
    let (profiles, total) = app
        .users()
        .browse(&ProfileFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(profiles[0].id, fresh.id);

    // Admin accounts never show up for members.
    let filter = ProfileFilter {
        search: Some("Back Office".to_string()),
        ..Default::default()
    };
    let (_, total) = app.users().browse(&filter, 1, 20).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn a_free_member_can_upgrade_mid_search_and_keep_going() {
    let app = TestApp::new();
    let priya = app.member("Priya Sharma", Gender::Female, 27).await;
    let first = app.member("Rahul Mehra", Gender::Male, 30).await;
    let second = app.member("Arjun Das", Gender::Male, 32).await;
    let third = app.member("Vikram Joshi", Gender::Male, 29).await;

    app.interests().propose(priya.id, first.id).await.unwrap();
    app.interests().propose(priya.id, second.id).await.unwrap();

    let err = app.interests().propose(priya.id, third.id).await.unwrap_err();
    assert!(matches!(err, AppError::InterestQuotaExceeded { .. }));

    app.users()
        .upgrade_plan(priya.id, PlanType::Platinum)
        .await
        .unwrap();
    let interest = app.interests().propose(priya.id, third.id).await.unwrap();
    assert_eq!(interest.status, InterestStatus::Pending);

    let sent = app
        .interests()
        .list_for(priya.id, InterestRole::Sender, None)
        .await
        .unwrap();
    assert_eq!(sent.len(), 3);
}
