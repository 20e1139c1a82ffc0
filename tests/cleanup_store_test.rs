mod common;

use audit_trail::errors::{RecorderError, RegistryError};
use audit_trail::types::db::crud_event::Entity as CrudEvent;
use audit_trail::types::internal::{CrudEventKind, KeyVariant, LoginKind, ObjectId, PrimaryKeyKind};
use audit_trail::AuditTrail;
use chrono::Utc;
use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

async fn seed_crud_types(trail: &AuditTrail) {
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();
    trail
        .recorder
        .register("ledger_line", PrimaryKeyKind::BigInteger)
        .await
        .unwrap();
    trail
        .recorder
        .register("api_token", PrimaryKeyKind::Uuid)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_detach_user_nulls_reference_but_preserves_pk_string() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Create)
        .actor(42)
        .new_state(&json!({ "name": "bolt" }))
        .record()
        .await
        .unwrap();

    let detached = trail.cleanup.detach_user(42).await.unwrap();
    assert_eq!(detached, 1);

    // The user reference is gone, the string copy of the pk is not: the
    // trail stays attributable after account deletion
    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(5))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, None);
    assert_eq!(history[0].user_pk_as_string.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_detach_user_covers_all_event_tables() {
    let trail = common::setup_trail().await;
    seed_crud_types(&trail).await;

    let token_id = Uuid::new_v4();
    trail
        .recorder
        .crud_event("inventory_item", 1, CrudEventKind::Create)
        .actor(42)
        .new_state(&json!({ "n": 1 }))
        .record()
        .await
        .unwrap();
    trail
        .recorder
        .crud_event("ledger_line", 9_999_999_999i64, CrudEventKind::Create)
        .actor(42)
        .new_state(&json!({ "n": 2 }))
        .record()
        .await
        .unwrap();
    trail
        .recorder
        .crud_event("api_token", token_id, CrudEventKind::Create)
        .actor(42)
        .new_state(&json!({ "n": 3 }))
        .record()
        .await
        .unwrap();
    trail
        .recorder
        .try_record_login(LoginKind::Login, Some("deleted_user"), Some(42), None)
        .await
        .unwrap();
    trail
        .recorder
        .try_record_request("/ledger", "GET", None, Some(42), None)
        .await
        .unwrap();

    let detached = trail.cleanup.detach_user(42).await.unwrap();
    assert_eq!(detached, 5);

    // Nothing is attributable through the reference anymore
    let remaining = trail.queries.by_user(42, None, None).await.unwrap();
    assert!(remaining.is_empty());

    // The rows themselves survive with their historical identity intact
    for (entity_type, object_id) in [
        ("inventory_item", ObjectId::Integer(1)),
        ("ledger_line", ObjectId::BigInteger(9_999_999_999)),
        ("api_token", ObjectId::Uuid(token_id)),
    ] {
        let history = trail.queries.history_of(entity_type, object_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id, None);
        assert_eq!(history[0].user_pk_as_string.as_deref(), Some("42"));
    }

    let logins = trail.queries.recent_login(10, 0).await.unwrap();
    assert_eq!(logins[0].user_id, None);
    assert_eq!(logins[0].username.as_deref(), Some("deleted_user"));

    let requests = trail.queries.recent_request(10, 0).await.unwrap();
    assert_eq!(requests[0].user_id, None);
    assert_eq!(requests[0].url, "/ledger");
}

#[tokio::test]
async fn test_detach_user_leaves_other_users_alone() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 1, CrudEventKind::Create)
        .actor(42)
        .new_state(&json!({ "n": 1 }))
        .record()
        .await
        .unwrap();
    trail
        .recorder
        .crud_event("inventory_item", 2, CrudEventKind::Create)
        .actor(7)
        .new_state(&json!({ "n": 2 }))
        .record()
        .await
        .unwrap();

    trail.cleanup.detach_user(42).await.unwrap();

    let kept = trail.queries.by_user(7, None, None).await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].user_id(), Some(7));
}

#[tokio::test]
async fn test_purge_content_type_cascades_to_history() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();
    trail
        .recorder
        .register("ledger_line", PrimaryKeyKind::BigInteger)
        .await
        .unwrap();

    for n in 1..=2 {
        trail
            .recorder
            .crud_event("inventory_item", n, CrudEventKind::Create)
            .new_state(&json!({ "n": n }))
            .record()
            .await
            .unwrap();
    }
    trail
        .recorder
        .crud_event("ledger_line", 10i64, CrudEventKind::Create)
        .new_state(&json!({ "n": 10 }))
        .record()
        .await
        .unwrap();

    let purged = trail.cleanup.purge_content_type("inventory_item").await.unwrap();
    assert_eq!(purged, 2);

    // The registration is gone along with its rows
    let result = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(1))
        .await;
    assert!(matches!(
        result,
        Err(RecorderError::Registry(RegistryError::UnknownEntityType(_)))
    ));
    assert!(CrudEvent::find().all(&trail.db).await.unwrap().is_empty());

    // Other types are untouched
    let kept = trail
        .queries
        .history_of("ledger_line", ObjectId::BigInteger(10))
        .await
        .unwrap();
    assert_eq!(kept.len(), 1);
}

#[tokio::test]
async fn test_purge_of_unknown_content_type_fails_without_side_effects() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();
    trail
        .recorder
        .crud_event("inventory_item", 1, CrudEventKind::Create)
        .new_state(&json!({ "n": 1 }))
        .record()
        .await
        .unwrap();

    let result = trail.cleanup.purge_content_type("never_registered").await;
    assert!(matches!(
        result,
        Err(RecorderError::Registry(RegistryError::UnknownEntityType(_)))
    ));

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(1))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_purged_name_can_be_registered_under_a_new_kind() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();
    trail
        .recorder
        .crud_event("inventory_item", 1, CrudEventKind::Create)
        .new_state(&json!({ "n": 1 }))
        .record()
        .await
        .unwrap();

    trail.cleanup.purge_content_type("inventory_item").await.unwrap();

    // The old registration no longer constrains the name, including in the
    // registry cache
    let reregistered = trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Uuid)
        .await
        .unwrap();
    assert_eq!(reregistered.variant, KeyVariant::Uuid);

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Uuid(Uuid::new_v4()))
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_prune_before_removes_only_older_rows() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 1, CrudEventKind::Create)
        .new_state(&json!({ "n": 1 }))
        .record()
        .await
        .unwrap();
    trail
        .recorder
        .try_record_login(LoginKind::Login, Some("operator"), Some(7), None)
        .await
        .unwrap();
    trail
        .recorder
        .try_record_request("/old", "GET", None, None, None)
        .await
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
    let cutoff = Utc::now();
    tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;

    trail
        .recorder
        .crud_event("inventory_item", 2, CrudEventKind::Create)
        .new_state(&json!({ "n": 2 }))
        .record()
        .await
        .unwrap();
    trail
        .recorder
        .try_record_login(LoginKind::Logout, Some("operator"), Some(7), None)
        .await
        .unwrap();
    trail
        .recorder
        .try_record_request("/new", "GET", None, None, None)
        .await
        .unwrap();

    let pruned = trail.cleanup.prune_before(cutoff).await.unwrap();
    assert_eq!(pruned, 3);

    let crud = trail.queries.recent_crud(10, 0).await.unwrap();
    assert_eq!(crud.len(), 1);
    assert_eq!(crud[0].object_id, ObjectId::Integer(2));

    let logins = trail.queries.recent_login(10, 0).await.unwrap();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].kind, LoginKind::Logout);

    let requests = trail.queries.recent_request(10, 0).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "/new");
}
