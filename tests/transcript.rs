//! Conversation log integration tests
//!
//! Covers the append protocol: seed exactly once, exactly two messages per
//! turn, valid JSON on disk at all times, idempotent removal.

use lingua_gateway::{Message, Role, TranscriptStore};

fn store_in(dir: &tempfile::TempDir) -> TranscriptStore {
    TranscriptStore::new(dir.path().join("logs.json"))
}

fn seed() -> Vec<Message> {
    vec![Message::text(
        Role::System,
        "You are an assistant.".to_string(),
    )]
}

#[tokio::test]
async fn first_turn_grows_log_by_seed_plus_two() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert!(store.seed_if_missing(&seed()).await.unwrap());
    store
        .append(Message::user_with_image(
            "What is this object?".to_string(),
            "data:image/jpeg;base64,QUFBQQ==".to_string(),
        ))
        .await
        .unwrap();
    store
        .append(Message::text(Role::Assistant, "It is a gear.".to_string()))
        .await
        .unwrap();

    let log = store.load().await.unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].role, Role::System);
    assert_eq!(log[1].role, Role::User);
    assert_eq!(log[2].as_text(), Some("It is a gear."));
}

#[tokio::test]
async fn subsequent_turns_grow_log_by_exactly_two() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.seed_if_missing(&seed()).await.unwrap();

    for turn in 1..=3_usize {
        // An existing log is never re-seeded
        assert!(!store.seed_if_missing(&seed()).await.unwrap());

        store
            .append(Message::user_with_image(
                format!("question {turn}"),
                "data:image/jpeg;base64,QQ==".to_string(),
            ))
            .await
            .unwrap();
        store
            .append(Message::text(Role::Assistant, format!("answer {turn}")))
            .await
            .unwrap();

        let log = store.load().await.unwrap();
        assert_eq!(log.len(), 1 + turn * 2);
    }
}

#[tokio::test]
async fn log_on_disk_is_always_a_valid_message_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.json");
    let store = TranscriptStore::new(&path);

    store.seed_if_missing(&seed()).await.unwrap();
    store
        .append(Message::text(Role::Assistant, "hello".to_string()))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.is_array());

    // The atomic write leaves no temp file behind
    assert!(!dir.path().join("logs.json.tmp").exists());
}

#[tokio::test]
async fn remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    // Removing a log that never existed succeeds
    store.remove().await.unwrap();

    store.seed_if_missing(&seed()).await.unwrap();
    assert!(store.exists());

    store.remove().await.unwrap();
    assert!(!store.exists());

    // And removing again succeeds too
    store.remove().await.unwrap();
}

#[tokio::test]
async fn concurrent_appends_do_not_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.seed_if_missing(&[]).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16_usize {
        let store = store.clone();
        tasks.spawn(async move {
            store
                .append(Message::text(Role::Assistant, format!("message {i}")))
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let log = store.load().await.unwrap();
    assert_eq!(log.len(), 16);
}
