//! Entitlement resolution: how the free cap, paid plans and the sent
//! counter interact across the proposal flow.
//!
//! Run: cargo test --test entitlement_test

mod common;

use chrono::{Duration, Utc};
use common::{profile, TestApp, FREE_INTEREST_CAP};
use samta_api::models::{Gender, ModerationStatus, PlanType, ResolveDecision, User};
use samta_api::store::MatchStore;
use samta_api::AppError;
use uuid::Uuid;

#[tokio::test]
async fn an_active_paid_plan_is_unlimited() {
    let app = TestApp::new();
    let dev = app
        .premium_member("Dev Kumar", Gender::Male, 31, PlanType::Gold)
        .await;

    for i in 0..5 {
        let other = app
            .member(&format!("Member {}", i), Gender::Female, 25 + i)
            .await;
        app.interests().propose(dev.id, other.id).await.unwrap();
    }

    let dev = app.entitlements().resolve_user(dev.id).await.unwrap();
    assert_eq!(dev.interests_sent, 5, "the counter still tracks every send");
}

#[tokio::test]
async fn upgrading_lifts_the_cap_immediately() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;
    let chitra = app.member("Chitra Nair", Gender::Female, 26).await;
    let dev = app.member("Dev Kumar", Gender::Male, 31).await;

    app.interests().propose(asha.id, bharat.id).await.unwrap();
    app.interests().propose(asha.id, chitra.id).await.unwrap();
    let err = app.interests().propose(asha.id, dev.id).await.unwrap_err();
    assert!(matches!(err, AppError::InterestQuotaExceeded { .. }));

    let upgraded = app
        .users()
        .upgrade_plan(asha.id, PlanType::Silver)
        .await
        .unwrap();
    assert_eq!(upgraded.plan, PlanType::Silver);
    assert!(upgraded.plan_expires_at.is_some());

    app.interests().propose(asha.id, dev.id).await.unwrap();
}

#[tokio::test]
async fn an_expired_plan_counts_as_free_again() {
    let app = TestApp::new();

    let mut lapsed = User::from_registration(
        Uuid::new_v4(),
        profile("Lapsed Member", Gender::Male, 33),
        Utc::now(),
    );
    lapsed.moderation_status = ModerationStatus::Approved;
    lapsed.apply_plan(PlanType::Gold, Utc::now() - Duration::days(120));
    lapsed.interests_sent = FREE_INTEREST_CAP as i32;
    app.store.insert_user(&lapsed).await.unwrap();

    let other = app.member("Asha Rao", Gender::Female, 27).await;
    let err = app.interests().propose(lapsed.id, other.id).await.unwrap_err();
    assert!(matches!(err, AppError::InterestQuotaExceeded { cap } if cap == FREE_INTEREST_CAP));
}

#[tokio::test]
async fn the_free_plan_cannot_be_purchased() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;

    let err = app
        .users()
        .upgrade_plan(asha.id, PlanType::Free)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn resolving_a_user_reflects_the_stored_snapshot() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;

    let resolved = app.entitlements().resolve_user(asha.id).await.unwrap();
    assert_eq!(resolved.id, asha.id);
    assert_eq!(resolved.interests_sent, 0);

    let missing = Uuid::new_v4();
    let err = app.entitlements().resolve_user(missing).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(id) if id == missing));
}

#[tokio::test]
async fn recording_a_send_bumps_the_counter() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;

    let after = app
        .entitlements()
        .record_interest_sent(asha.id)
        .await
        .unwrap();
    assert_eq!(after.interests_sent, 1);

    let after = app
        .entitlements()
        .record_interest_sent(asha.id)
        .await
        .unwrap();
    assert_eq!(after.interests_sent, 2);
}

#[tokio::test]
async fn rejections_do_not_refund_quota() {
    let app = TestApp::new();
    let asha = app.member("Asha Rao", Gender::Female, 27).await;
    let bharat = app.member("Bharat Singh", Gender::Male, 30).await;
    let chitra = app.member("Chitra Nair", Gender::Female, 26).await;
    let dev = app.member("Dev Kumar", Gender::Male, 31).await;

    let first = app.interests().propose(asha.id, bharat.id).await.unwrap();
    let second = app.interests().propose(asha.id, chitra.id).await.unwrap();
    app.interests()
        .resolve(first.id, bharat.id, ResolveDecision::Rejected)
        .await
        .unwrap();
    app.interests()
        .resolve(second.id, chitra.id, ResolveDecision::Rejected)
        .await
        .unwrap();

    // The counter counts sends, not open proposals.
    let err = app.interests().propose(asha.id, dev.id).await.unwrap_err();
    assert!(matches!(err, AppError::InterestQuotaExceeded { .. }));
}
