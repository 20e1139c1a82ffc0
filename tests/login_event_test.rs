mod common;

use audit_trail::types::db::login_event::Entity as LoginEvent;
use audit_trail::types::internal::{EventId, LoginKind};
use sea_orm::{EntityTrait, QueryOrder};

#[tokio::test]
async fn test_failed_login_for_unknown_username_persists() {
    let trail = common::setup_trail().await;

    // "ghost" never resolved to an account, so there is no user reference,
    // but the attempted identity is still worth keeping
    let id = trail
        .recorder
        .try_record_login(LoginKind::Failed, Some("ghost"), None, Some("10.0.0.8"))
        .await
        .unwrap();
    assert!(matches!(id, EventId::Login(_)));

    let records = trail.queries.recent_login(10, 0).await.unwrap();
    assert_eq!(records.len(), 1);

    let event = &records[0];
    assert_eq!(event.kind, LoginKind::Failed);
    assert_eq!(event.username.as_deref(), Some("ghost"));
    assert_eq!(event.user_id, None);
    assert_eq!(event.remote_ip.as_deref(), Some("10.0.0.8"));
}

#[tokio::test]
async fn test_login_and_logout_carry_the_resolved_user() {
    let trail = common::setup_trail().await;

    trail
        .recorder
        .try_record_login(LoginKind::Login, Some("operator"), Some(7), Some("192.0.2.1"))
        .await
        .unwrap();
    trail
        .recorder
        .try_record_login(LoginKind::Logout, Some("operator"), Some(7), Some("192.0.2.1"))
        .await
        .unwrap();

    let records = trail.queries.recent_login(10, 0).await.unwrap();
    assert_eq!(records.len(), 2);

    // Newest first
    assert_eq!(records[0].kind, LoginKind::Logout);
    assert_eq!(records[1].kind, LoginKind::Login);
    for event in &records {
        assert_eq!(event.username.as_deref(), Some("operator"));
        assert_eq!(event.user_id, Some(7));
        assert_eq!(event.remote_ip.as_deref(), Some("192.0.2.1"));
    }
}

#[tokio::test]
async fn test_persisted_login_codes_match_fixed_table() {
    let trail = common::setup_trail().await;

    trail
        .recorder
        .try_record_login(LoginKind::Login, Some("operator"), Some(7), None)
        .await
        .unwrap();
    trail
        .recorder
        .try_record_login(LoginKind::Logout, Some("operator"), Some(7), None)
        .await
        .unwrap();
    trail
        .recorder
        .try_record_login(LoginKind::Failed, Some("operator"), None, None)
        .await
        .unwrap();

    let codes: Vec<i16> = LoginEvent::find()
        .order_by_asc(audit_trail::types::db::login_event::Column::Id)
        .all(&trail.db)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.login_type)
        .collect();

    assert_eq!(codes, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_submit_login_event_reports_the_written_id() {
    let trail = common::setup_trail().await;

    let id = trail
        .recorder
        .submit_login_event(LoginKind::Login, Some("operator"), Some(7), None)
        .await;

    assert!(matches!(id, Some(EventId::Login(_))));
}

#[tokio::test]
async fn test_submit_login_event_swallows_storage_failures() {
    let trail = common::setup_trail().await;
    trail.db.clone().close().await.unwrap();

    // The pool is gone; submit must log and report None instead of failing
    // the caller
    let id = trail
        .recorder
        .submit_login_event(LoginKind::Login, Some("operator"), Some(7), None)
        .await;

    assert_eq!(id, None);
}
