//! 消息存储服务单元测试

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use domain::{MessageType, Timestamp};
use uuid::Uuid;

use crate::clock::ManualClock;
use crate::error::ApplicationError;
use crate::memory::{InMemoryMessageRepository, InMemoryParticipantRepository};
use crate::services::{MessageStore, ParticipantRegistry};
use crate::validation::{JoinRequest, SendMessageRequest};

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

async fn join(registry: &ParticipantRegistry, name: &str) {
    registry
        .join(JoinRequest {
            name: name.to_string(),
        })
        .await
        .unwrap();
}

fn public(to: &str, text: &str) -> SendMessageRequest {
    SendMessageRequest {
        to: to.to_string(),
        text: text.to_string(),
        message_type: "message".to_string(),
    }
}

fn private(to: &str, text: &str) -> SendMessageRequest {
    SendMessageRequest {
        to: to.to_string(),
        text: text.to_string(),
        message_type: "private_message".to_string(),
    }
}

#[tokio::test]
async fn append_round_trips_and_reaches_recipient() {
    let (registry, store, clock) = build();
    join(&registry, "ana").await;
    join(&registry, "bia").await;

    clock.advance(TimeDelta::seconds(3));
    let message = store.append("ana", public(BROADCAST, "olá")).await.unwrap();

    assert_eq!(message.from, "ana");
    assert_eq!(message.to, BROADCAST);
    assert_eq!(message.text, "olá");
    assert_eq!(message.message_type, MessageType::Message);
    assert_eq!(message.sent_at, t0() + TimeDelta::seconds(3));

    let seen = store.query("bia", None).await.unwrap();
    assert!(seen.iter().any(|m| m.id == message.id));
}

#[tokio::test]
async fn append_from_stranger_is_unauthorized() {
    let (registry, store, _) = build();
    join(&registry, "bia").await;

    let err = store.append("ghost", public(BROADCAST, "oi")).await.unwrap_err();
    assert_eq!(err.error_code(), "unauthorized");
    // 未授权的消息不落库
    assert_eq!(store.query("bia", None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn append_collects_all_violations() {
    let (registry, store, _) = build();
    join(&registry, "ana").await;

    let request = SendMessageRequest {
        to: String::new(),
        text: String::new(),
        message_type: "status".to_string(),
    };
    let err = store.append("ana", request).await.unwrap_err();
    let ApplicationError::InvalidInput(violations) = err else {
        panic!("expected InvalidInput");
    };
    let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
    assert_eq!(fields, vec!["to", "text", "type"]);
}

#[tokio::test]
async fn append_system_bypasses_sender_authorization() {
    let (_, store, _) = build();

    // 刚被驱逐的参与者已不在场，离场通知依然要写入
    let notice = store
        .append_system("ana", "ana leaves the room")
        .await
        .unwrap();
    assert_eq!(notice.to, BROADCAST);
    assert_eq!(notice.message_type, MessageType::Status);
}

#[tokio::test]
async fn private_message_is_invisible_to_third_parties() {
    let (registry, store, _) = build();
    join(&registry, "ana").await;
    join(&registry, "bia").await;
    join(&registry, "carla").await;

    let message = store.append("ana", private("bia", "oi")).await.unwrap();

    let for_bia = store.query("bia", None).await.unwrap();
    assert!(for_bia.iter().any(|m| m.id == message.id));

    let for_ana = store.query("ana", None).await.unwrap();
    assert!(for_ana.iter().any(|m| m.id == message.id));

    let for_carla = store.query("carla", None).await.unwrap();
    assert!(for_carla.iter().all(|m| m.id != message.id));
}

#[tokio::test]
async fn query_never_leaks_foreign_audiences() {
    let (registry, store, _) = build();
    join(&registry, "ana").await;
    join(&registry, "bia").await;
    store.append("ana", private("bia", "segredo")).await.unwrap();
    store.append("ana", public(BROADCAST, "olá")).await.unwrap();

    for message in store.query("carla", None).await.unwrap() {
        assert!(
            message.from == "carla" || message.to == "carla" || message.to == BROADCAST,
            "leaked message {message:?}"
        );
    }
}

#[tokio::test]
async fn positive_limit_keeps_chronological_tail() {
    let (registry, store, clock) = build();
    join(&registry, "ana").await;

    for i in 0..5 {
        clock.advance(TimeDelta::seconds(1));
        store
            .append("ana", public(BROADCAST, &format!("m{i}")))
            .await
            .unwrap();
    }

    let tail = store.query("ana", Some(2)).await.unwrap();
    let texts: Vec<_> = tail.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["m3", "m4"]);
}

#[tokio::test]
async fn absent_or_zero_limit_returns_everything() {
    let (registry, store, _) = build();
    join(&registry, "ana").await;
    store.append("ana", public(BROADCAST, "um")).await.unwrap();
    store.append("ana", public(BROADCAST, "dois")).await.unwrap();

    // 入场通知加两条消息
    assert_eq!(store.query("ana", None).await.unwrap().len(), 3);
    assert_eq!(store.query("ana", Some(0)).await.unwrap().len(), 3);
    assert_eq!(store.query("ana", Some(100)).await.unwrap().len(), 3);
}

#[tokio::test]
async fn delete_unknown_message_is_not_found() {
    let (_, store, _) = build();
    let err = store.delete(Uuid::new_v4(), "ana").await.unwrap_err();
    assert_eq!(err.error_code(), "not_found");
}

#[tokio::test]
async fn delete_by_non_sender_is_forbidden() {
    let (registry, store, _) = build();
    join(&registry, "ana").await;
    join(&registry, "bia").await;
    let message = store.append("ana", public(BROADCAST, "olá")).await.unwrap();

    let err = store.delete(message.id, "bia").await.unwrap_err();
    assert_eq!(err.error_code(), "forbidden");

    // 消息仍然在
    let seen = store.query("bia", None).await.unwrap();
    assert!(seen.iter().any(|m| m.id == message.id));
}

#[tokio::test]
async fn delete_by_sender_removes_from_every_query() {
    let (registry, store, _) = build();
    join(&registry, "ana").await;
    join(&registry, "bia").await;
    let message = store.append("ana", private("bia", "oi")).await.unwrap();

    store.delete(message.id, "ana").await.unwrap();

    for user in ["ana", "bia"] {
        let seen = store.query(user, None).await.unwrap();
        assert!(seen.iter().all(|m| m.id != message.id));
    }
}
