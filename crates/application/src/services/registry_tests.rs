//! 注册表单元测试

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use domain::{MessageType, Timestamp};

use crate::clock::{Clock, ManualClock};
use crate::error::ApplicationError;
use crate::memory::{InMemoryMessageRepository, InMemoryParticipantRepository};
use crate::services::{MessageStore, ParticipantRegistry};
use crate::validation::JoinRequest;

const BROADCAST: &str = "Todos";

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn build() -> (Arc<ParticipantRegistry>, Arc<MessageStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let participants = Arc::new(InMemoryParticipantRepository::default());
    let messages = Arc::new(InMemoryMessageRepository::default());
    let store = Arc::new(MessageStore::new(
        messages,
        participants.clone(),
        clock.clone(),
        BROADCAST,
    ));
    let registry = Arc::new(ParticipantRegistry::new(
        participants,
        store.clone(),
        clock.clone(),
    ));
    (registry, store, clock)
}

fn join(name: &str) -> JoinRequest {
    JoinRequest {
        name: name.to_string(),
    }
}

#[tokio::test]
async fn join_then_duplicate_join_conflicts() {
    let (registry, _, _) = build();

    let participant = registry.join(join("ana")).await.unwrap();
    assert_eq!(participant.name, "ana");
    assert_eq!(participant.last_heartbeat, t0());

    let err = registry.join(join("ana")).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));
    assert_eq!(err.error_code(), "conflict");
}

#[tokio::test]
async fn join_with_blank_name_is_invalid_and_leaves_no_trace() {
    let (registry, store, _) = build();

    let err = registry.join(join("  ")).await.unwrap_err();
    let ApplicationError::InvalidInput(violations) = err else {
        panic!("expected InvalidInput");
    };
    assert_eq!(violations[0].field, "name");

    assert!(registry.list().await.unwrap().is_empty());
    assert!(store.query("ana", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn join_emits_status_notice_to_broadcast() {
    let (registry, store, _) = build();
    registry.join(join("ana")).await.unwrap();

    let messages = store.query("bia", None).await.unwrap();
    assert_eq!(messages.len(), 1);
    let notice = &messages[0];
    assert_eq!(notice.from, "ana");
    assert_eq!(notice.to, BROADCAST);
    assert_eq!(notice.text, "ana joins the room");
    assert_eq!(notice.message_type, MessageType::Status);
}

#[tokio::test]
async fn list_returns_current_participants() {
    let (registry, _, _) = build();
    registry.join(join("ana")).await.unwrap();
    registry.join(join("bia")).await.unwrap();

    let mut names: Vec<_> = registry
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["ana", "bia"]);
}

#[tokio::test]
async fn heartbeat_refreshes_timestamp() {
    let (registry, _, clock) = build();
    registry.join(join("ana")).await.unwrap();

    clock.advance(TimeDelta::seconds(42));
    registry.heartbeat("ana").await.unwrap();

    let participants = registry.list().await.unwrap();
    assert_eq!(
        participants[0].last_heartbeat,
        t0() + TimeDelta::seconds(42)
    );
}

#[tokio::test]
async fn heartbeat_for_unknown_participant_is_not_found() {
    let (registry, _, _) = build();
    let err = registry.heartbeat("ghost").await.unwrap_err();
    assert_eq!(err.error_code(), "not_found");
}

#[tokio::test]
async fn exists_tracks_membership() {
    let (registry, _, _) = build();
    assert!(!registry.exists("ana").await.unwrap());

    registry.join(join("ana")).await.unwrap();
    assert!(registry.exists("ana").await.unwrap());
}

#[tokio::test]
async fn evict_if_stale_respects_fresh_heartbeats() {
    let (registry, _, clock) = build();
    registry.join(join("ana")).await.unwrap();

    // 基于旧读取的驱逐决策：心跳已在决策后刷新，必须放弃驱逐
    let stale_before = clock.now() + TimeDelta::seconds(1);
    clock.advance(TimeDelta::seconds(5));
    registry.heartbeat("ana").await.unwrap();

    assert!(!registry.evict_if_stale("ana", stale_before).await.unwrap());
    assert!(registry.exists("ana").await.unwrap());
}
