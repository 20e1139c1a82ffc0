mod common;

use audit_trail::codec;
use audit_trail::errors::{IngestError, RecorderError, RegistryError};
use audit_trail::recorder::Tracked;
use audit_trail::types::db::crud_event::Entity as CrudEvent;
use audit_trail::types::db::crud_event_big_integer::Entity as CrudEventBigInteger;
use audit_trail::types::internal::{CrudEventKind, EventId, KeyVariant, ObjectId, PrimaryKeyKind};
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Serialize)]
struct InventoryItem {
    id: i32,
    name: String,
    qty: u32,
}

#[derive(Serialize)]
struct LedgerLine {
    id: i64,
    name: String,
}

#[derive(Serialize)]
struct TeamMembership {
    id: i32,
    members: Vec<i64>,
}

struct Opaque;

impl Serialize for Opaque {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(serde::ser::Error::custom("not representable"))
    }
}

fn item(id: i32, name: &str, qty: u32) -> InventoryItem {
    InventoryItem {
        id,
        name: name.to_string(),
        qty,
    }
}

#[tokio::test]
async fn test_create_event_snapshots_new_state_without_diff() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    let id = trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Create)
        .actor(42)
        .new_state(&item(5, "bolt", 3))
        .record()
        .await
        .unwrap();

    assert!(matches!(id, EventId::Crud(KeyVariant::Integer, _)));

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(5))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    let event = &history[0];
    assert!(event.is_create());
    assert_eq!(event.changed_fields, None);
    assert_eq!(
        event.object_repr.as_deref(),
        Some(r#"id=5 name="bolt" qty=3"#)
    );
    assert_eq!(
        event.object_json_repr.as_deref(),
        Some(r#"{"id":5,"name":"bolt","qty":3}"#)
    );
    assert_eq!(event.user_id, Some(42));
    assert_eq!(event.user_pk_as_string.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_history_returns_newest_event_first() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Create)
        .new_state(&item(5, "bolt", 3))
        .record()
        .await
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Update)
        .old_state(&item(5, "bolt", 3))
        .new_state(&item(5, "bolt", 4))
        .record()
        .await
        .unwrap();

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(5))
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].is_update());
    assert!(history[1].is_create());
}

#[tokio::test]
async fn test_update_of_big_integer_entity_carries_decodable_diff() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("ledger_line", PrimaryKeyKind::BigInteger)
        .await
        .unwrap();

    let old = LedgerLine {
        id: 9_999_999_999,
        name: "A".to_string(),
    };
    let new = LedgerLine {
        id: 9_999_999_999,
        name: "B".to_string(),
    };

    let id = trail
        .recorder
        .crud_event("ledger_line", 9_999_999_999i64, CrudEventKind::Update)
        .old_state(&old)
        .new_state(&new)
        .record()
        .await
        .unwrap();

    assert!(matches!(id, EventId::Crud(KeyVariant::BigInteger, _)));

    // Landed in the big-integer table with the key intact
    let rows = CrudEventBigInteger::find().all(&trail.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].object_id, 9_999_999_999);
    assert_eq!(rows[0].event_type, 2);

    let changed = rows[0].changed_fields.as_deref().unwrap();
    assert_eq!(changed, r#"{"name":{"old":"A","new":"B"}}"#);

    let decoded = codec::decode_changed_fields(changed).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded["name"].old, serde_json::json!("A"));
    assert_eq!(decoded["name"].new, serde_json::json!("B"));
}

#[tokio::test]
async fn test_update_with_identical_states_records_empty_diff() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Update)
        .old_state(&item(5, "bolt", 3))
        .new_state(&item(5, "bolt", 3))
        .record()
        .await
        .unwrap();

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(5))
        .await
        .unwrap();

    // Empty but present, never absent
    assert_eq!(history[0].changed_fields.as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_delete_event_snapshots_last_state() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Delete)
        .actor(42)
        .old_state(&item(5, "bolt", 4))
        .record()
        .await
        .unwrap();

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(5))
        .await
        .unwrap();

    let event = &history[0];
    assert!(event.is_delete());
    assert_eq!(event.changed_fields, None);
    assert_eq!(
        event.object_repr.as_deref(),
        Some(r#"id=5 name="bolt" qty=4"#)
    );
}

#[tokio::test]
async fn test_persisted_crud_codes_match_fixed_table() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    let kinds = [
        CrudEventKind::Create,
        CrudEventKind::Update,
        CrudEventKind::Delete,
        CrudEventKind::M2mChange,
        CrudEventKind::M2mChangeRev,
    ];
    for kind in kinds {
        trail
            .recorder
            .crud_event("inventory_item", 5, kind)
            .old_state(&item(5, "bolt", 3))
            .new_state(&item(5, "bolt", 3))
            .record()
            .await
            .unwrap();
    }

    let codes: Vec<i16> = CrudEvent::find()
        .order_by_asc(audit_trail::types::db::crud_event::Column::Id)
        .all(&trail.db)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.event_type)
        .collect();

    assert_eq!(codes, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_m2m_events_diff_relation_membership() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("team_membership", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    let before = TeamMembership {
        id: 3,
        members: vec![1, 2],
    };
    let after = TeamMembership {
        id: 3,
        members: vec![1, 2, 9],
    };

    trail
        .recorder
        .crud_event("team_membership", 3, CrudEventKind::M2mChange)
        .old_state(&before)
        .new_state(&after)
        .record()
        .await
        .unwrap();

    // Assumption: a reverse-side event diffs the relation membership as
    // observed from the reverse side, same mechanics as the forward event.
    trail
        .recorder
        .crud_event("team_membership", 3, CrudEventKind::M2mChangeRev)
        .old_state(&after)
        .new_state(&before)
        .record()
        .await
        .unwrap();

    let history = trail
        .queries
        .history_of("team_membership", ObjectId::Integer(3))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);

    let reverse = &history[0];
    assert_eq!(reverse.kind, CrudEventKind::M2mChangeRev);
    let decoded = codec::decode_changed_fields(reverse.changed_fields.as_deref().unwrap()).unwrap();
    assert_eq!(decoded["members"].old, serde_json::json!([1, 2, 9]));
    assert_eq!(decoded["members"].new, serde_json::json!([1, 2]));

    let forward = &history[1];
    assert_eq!(forward.kind, CrudEventKind::M2mChange);
    let decoded = codec::decode_changed_fields(forward.changed_fields.as_deref().unwrap()).unwrap();
    assert_eq!(decoded["members"].old, serde_json::json!([1, 2]));
    assert_eq!(decoded["members"].new, serde_json::json!([1, 2, 9]));
}

#[tokio::test]
async fn test_unknown_entity_type_is_rejected() {
    let trail = common::setup_trail().await;

    let result = trail
        .recorder
        .crud_event("never_registered", 1, CrudEventKind::Create)
        .record()
        .await;

    assert!(matches!(
        result,
        Err(RecorderError::Registry(RegistryError::UnknownEntityType(_)))
    ));

    // submit swallows the failure instead of panicking
    let submitted = trail
        .recorder
        .crud_event("never_registered", 1, CrudEventKind::Create)
        .submit()
        .await;
    assert_eq!(submitted, None);

    assert!(CrudEvent::find().all(&trail.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_object_id_variant_must_match_registration() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    let result = trail
        .recorder
        .crud_event("inventory_item", Uuid::new_v4(), CrudEventKind::Create)
        .record()
        .await;

    match result {
        Err(RecorderError::Ingest(IngestError::KeyVariantMismatch {
            entity_type,
            registered,
            submitted,
        })) => {
            assert_eq!(entity_type, "inventory_item");
            assert_eq!(registered, KeyVariant::Integer);
            assert_eq!(submitted, KeyVariant::Uuid);
        }
        other => panic!("Expected KeyVariantMismatch, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_anonymous_events_carry_no_actor() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    trail
        .recorder
        .crud_event("inventory_item", 5, CrudEventKind::Create)
        .new_state(&item(5, "bolt", 3))
        .record()
        .await
        .unwrap();

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(5))
        .await
        .unwrap();

    assert_eq!(history[0].user_id, None);
    assert_eq!(history[0].user_pk_as_string, None);
}

#[tokio::test]
async fn test_unserializable_state_degrades_to_placeholder() {
    let trail = common::setup_trail().await;
    trail
        .recorder
        .register("inventory_item", PrimaryKeyKind::Integer)
        .await
        .unwrap();

    let id = trail
        .recorder
        .crud_event("inventory_item", 9, CrudEventKind::Create)
        .new_state(&Opaque)
        .submit()
        .await;

    // The event is still written; partial audit data beats none
    assert!(id.is_some());

    let history = trail
        .queries
        .history_of("inventory_item", ObjectId::Integer(9))
        .await
        .unwrap();
    assert_eq!(history[0].object_repr.as_deref(), Some("<unserializable>"));
    assert_eq!(
        history[0].object_json_repr.as_deref(),
        Some(r#""<unserializable>""#)
    );
}

#[derive(Serialize)]
struct ApiToken {
    id: Uuid,
    label: String,
}

impl Tracked for ApiToken {
    const ENTITY_TYPE: &'static str = "api_token";
    const KEY_KIND: PrimaryKeyKind = PrimaryKeyKind::Uuid;

    fn object_id(&self) -> ObjectId {
        ObjectId::Uuid(self.id)
    }
}

#[derive(Serialize)]
struct GhostRow {
    id: i32,
}

impl Tracked for GhostRow {
    const ENTITY_TYPE: &'static str = "ghost_row";
    const KEY_KIND: PrimaryKeyKind = PrimaryKeyKind::Integer;

    fn object_id(&self) -> ObjectId {
        ObjectId::Integer(self.id)
    }
}

#[tokio::test]
async fn test_tracked_entities_record_through_the_typed_seam() {
    let trail = common::setup_trail().await;
    trail.recorder.register_tracked::<ApiToken>().await.unwrap();

    let token = ApiToken {
        id: Uuid::new_v4(),
        label: "ci".to_string(),
    };
    let id = trail
        .recorder
        .record_created(&token, Some(7))
        .await
        .unwrap();
    assert!(matches!(id, EventId::Crud(KeyVariant::Uuid, _)));

    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    let renamed = ApiToken {
        id: token.id,
        label: "ci-rotated".to_string(),
    };
    trail
        .recorder
        .record_updated(&token, &renamed, Some(7))
        .await
        .unwrap();

    let history = trail
        .queries
        .history_of("api_token", ObjectId::Uuid(token.id))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_update());

    let decoded =
        codec::decode_changed_fields(history[0].changed_fields.as_deref().unwrap()).unwrap();
    assert_eq!(decoded["label"].old, serde_json::json!("ci"));
    assert_eq!(decoded["label"].new, serde_json::json!("ci-rotated"));
}

#[tokio::test]
async fn test_tracked_submit_swallows_missing_registration() {
    let trail = common::setup_trail().await;

    let row = GhostRow { id: 1 };
    let submitted = trail.recorder.submit_created(&row, None).await;

    assert_eq!(submitted, None);
}

#[tokio::test]
async fn test_request_events_persist_all_fields() {
    let trail = common::setup_trail().await;

    let id = trail
        .recorder
        .try_record_request(
            "/admin/users",
            "POST",
            Some("page=2"),
            Some(42),
            Some("192.168.1.10"),
        )
        .await
        .unwrap();
    assert!(matches!(id, EventId::Request(_)));

    let records = trail.queries.recent_request(10, 0).await.unwrap();
    assert_eq!(records.len(), 1);

    let event = &records[0];
    assert_eq!(event.url, "/admin/users");
    assert_eq!(event.method, "POST");
    assert_eq!(event.query_string.as_deref(), Some("page=2"));
    assert_eq!(event.user_id, Some(42));
    assert_eq!(event.remote_ip.as_deref(), Some("192.168.1.10"));
}
