// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn processing against an in-memory store and a scripted gateway.

use std::sync::Arc;
use std::time::Duration;

use hango_chat::{
    ConversationState, Degradation, FALLBACK_REPLY, MemoryManager, TurnRequest, decode, encode,
};
use hango_config::MemoryConfig;
use hango_core::{HangoError, Persona, ThreadRecord};
use hango_test_utils::{InMemoryThreadStore, MockGateway, MockReply, is_summary_request};
use tracing_test::traced_test;

const MODEL: &str = "gpt-4.1-mini";

struct Fixture {
    store: Arc<InMemoryThreadStore>,
    gateway: Arc<MockGateway>,
    manager: MemoryManager,
}

fn fixture_with(replies: Vec<MockReply>, config: MemoryConfig) -> Fixture {
    let store = Arc::new(InMemoryThreadStore::new());
    let gateway = Arc::new(MockGateway::with_replies(replies));
    let manager = MemoryManager::new(store.clone(), gateway.clone(), &config, MODEL);
    Fixture {
        store,
        gateway,
        manager,
    }
}

fn fixture(replies: Vec<MockReply>) -> Fixture {
    fixture_with(replies, MemoryConfig::default())
}

fn turn(message: &str) -> TurnRequest {
    TurnRequest {
        thread_id: "chat-1".into(),
        user_id: "user-1".into(),
        persona: Persona::AiFriend,
        message: message.into(),
        message_count: None,
    }
}

async fn seed(store: &InMemoryThreadStore, state: &ConversationState) {
    store
        .seed(ThreadRecord {
            thread_id: "chat-1".into(),
            user_id: "user-1".into(),
            persona_id: "ai_friend".into(),
            encoded_state: encode(state),
            message_count: 0,
            updated_at: "2026-03-01T00:00:00.000Z".into(),
        })
        .await;
}

async fn stored(store: &InMemoryThreadStore) -> ConversationState {
    let record = store.record("chat-1").await.expect("record should exist");
    decode(Some(&record.encoded_state))
}

#[tokio::test]
async fn first_turn_persists_segmented_state() {
    let f = fixture(vec![MockReply::text("Hello")]);

    let outcome = f.manager.process_turn(turn("Hi")).await.unwrap();

    assert_eq!(outcome.reply, "Hello");
    assert!(!outcome.compacted);
    assert!(outcome.degradations.is_empty());
    let record = f.store.record("chat-1").await.unwrap();
    assert_eq!(record.encoded_state, "__SUMMARY____RECENT__Human: Hi\nAI: Hello");
    assert_eq!(record.persona_id, "ai_friend");
    assert_eq!(record.message_count, 0);
    assert_eq!(record.updated_at, outcome.timestamp);
}

#[tokio::test]
async fn sequential_turns_append_with_newline() {
    let f = fixture(vec![MockReply::text("r1"), MockReply::text("r2")]);

    f.manager.process_turn(turn("m1")).await.unwrap();
    f.manager.process_turn(turn("m2")).await.unwrap();

    assert_eq!(
        stored(&f.store).await.recent,
        "Human: m1\nAI: r1\nHuman: m2\nAI: r2"
    );

    let requests = f.gateway.requests().await;
    let second_prompt = requests[1].system_content().unwrap();
    assert!(second_prompt.ends_with("\n\nRecent conversation:\nHuman: m1\nAI: r1"));
    assert_eq!(requests[1].user_content(), Some("m2"));
}

#[tokio::test]
async fn reply_prompt_includes_summary_and_persona() {
    let f = fixture(vec![MockReply::text("ok")]);
    seed(&f.store, &ConversationState::new("They like hiking.", "Human: a\nAI: b")).await;

    let mut request = turn("next");
    request.persona = Persona::AiTutor;
    f.manager.process_turn(request).await.unwrap();

    let requests = f.gateway.requests().await;
    let prompt = requests[0].system_content().unwrap();
    assert!(prompt.starts_with(Persona::AiTutor.system_prompt()));
    assert!(prompt.contains("\n\nPrevious conversation summary:\nThey like hiking."));
    assert!(prompt.ends_with("\n\nRecent conversation:\nHuman: a\nAI: b"));
    assert_eq!(requests[0].model, MODEL);
}

#[tokio::test]
async fn legacy_record_is_upgraded_on_save() {
    let f = fixture(vec![MockReply::text("r2")]);
    f.store
        .seed(ThreadRecord {
            thread_id: "chat-1".into(),
            user_id: "user-1".into(),
            persona_id: "ai_friend".into(),
            encoded_state: "Human: m1\nAI: r1".into(),
            message_count: 2,
            updated_at: "2025-01-01T00:00:00.000Z".into(),
        })
        .await;

    f.manager.process_turn(turn("m2")).await.unwrap();

    let record = f.store.record("chat-1").await.unwrap();
    assert_eq!(
        record.encoded_state,
        "__SUMMARY____RECENT__Human: m1\nAI: r1\nHuman: m2\nAI: r2"
    );
}

#[tokio::test]
async fn empty_reply_uses_fallback() {
    let f = fixture(vec![MockReply::Empty]);
    let outcome = f.manager.process_turn(turn("Hi")).await.unwrap();
    assert_eq!(outcome.reply, FALLBACK_REPLY);
    assert!(stored(&f.store).await.recent.ends_with(FALLBACK_REPLY));
}

#[tokio::test]
async fn message_count_is_stored_unverified() {
    let f = fixture(vec![MockReply::text("r")]);
    let mut request = turn("m");
    request.message_count = Some(42);
    f.manager.process_turn(request).await.unwrap();
    assert_eq!(f.store.record("chat-1").await.unwrap().message_count, 42);
}

#[tokio::test]
async fn invalid_input_touches_nothing() {
    let f = fixture(vec![]);
    let err = f.manager.process_turn(turn("   ")).await.unwrap_err();

    assert!(matches!(err, HangoError::Validation(_)));
    assert_eq!(f.gateway.call_count().await, 0);
    assert_eq!(f.store.write_count(), 0);
}

#[tokio::test]
async fn reply_failure_is_fatal_and_writes_nothing() {
    let f = fixture(vec![MockReply::Fail(500)]);
    let before = ConversationState::new("S", "Human: a\nAI: b");
    seed(&f.store, &before).await;

    let err = f.manager.process_turn(turn("Hi")).await.unwrap_err();

    assert!(matches!(err, HangoError::Completion { .. }));
    assert_eq!(f.store.write_count(), 0);
    assert_eq!(stored(&f.store).await, before);
}

#[tokio::test]
async fn reply_timeout_is_fatal() {
    let f = fixture(vec![MockReply::Timeout]);
    let err = f.manager.process_turn(turn("Hi")).await.unwrap_err();
    assert!(matches!(err, HangoError::Timeout { .. }));
    assert_eq!(f.store.write_count(), 0);
}

#[tokio::test]
async fn total_at_threshold_does_not_compact() {
    // "Human: m\nAI: r" is 14 characters; joined with '\n' it adds 15.
    let f = fixture(vec![MockReply::text("r")]);
    seed(&f.store, &ConversationState::new("", "x".repeat(8000 - 15))).await;

    let outcome = f.manager.process_turn(turn("m")).await.unwrap();

    assert!(!outcome.compacted);
    assert_eq!(f.gateway.call_count().await, 1);
    assert_eq!(stored(&f.store).await.total_len(), 8000);
}

#[tokio::test]
async fn total_one_over_threshold_compacts() {
    let f = fixture(vec![MockReply::text("r"), MockReply::text("A short summary.")]);
    seed(&f.store, &ConversationState::new("", "x".repeat(8000 - 14))).await;

    let outcome = f.manager.process_turn(turn("m")).await.unwrap();

    assert!(outcome.compacted);
    let requests = f.gateway.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(is_summary_request(&requests[1]));
    assert_eq!(requests[1].temperature, 0.0);
    assert_eq!(requests[1].max_output_tokens, 2000);
    assert!(
        requests[1]
            .user_content()
            .unwrap()
            .starts_with("Recent conversation:xxx")
    );
    assert_eq!(
        stored(&f.store).await,
        ConversationState::new("A short summary.", "")
    );
}

#[tokio::test]
async fn compaction_input_includes_previous_summary() {
    let f = fixture(vec![MockReply::text("r"), MockReply::text("new summary")]);
    seed(&f.store, &ConversationState::new("old", "y".repeat(8000))).await;

    f.manager.process_turn(turn("m")).await.unwrap();

    let summary_request = &f.gateway.summary_requests().await[0];
    let input = summary_request.user_content().unwrap();
    assert!(input.starts_with("Previous conversation summary:old\n\nRecent conversation:yyy"));
    assert!(input.ends_with("Human: m\nAI: r"));
}

#[tokio::test]
#[traced_test]
async fn compaction_failure_keeps_state_bit_identical() {
    let f = fixture(vec![MockReply::text("r"), MockReply::Fail(503)]);
    let seeded = ConversationState::new("S", "z".repeat(8000));
    seed(&f.store, &seeded).await;

    let outcome = f.manager.process_turn(turn("m")).await.unwrap();

    assert_eq!(outcome.reply, "r");
    assert!(!outcome.compacted);
    assert!(matches!(
        outcome.degradations.as_slice(),
        [Degradation::CompactionFailed { .. }]
    ));
    let mut expected = seeded;
    expected.append_turn("m", "r");
    assert_eq!(stored(&f.store).await, expected);
    assert!(logs_contain("compaction failed"));
}

#[tokio::test]
async fn empty_summary_counts_as_failure() {
    let f = fixture(vec![MockReply::text("r"), MockReply::text("  \n ")]);
    seed(&f.store, &ConversationState::new("", "z".repeat(8001))).await;

    let outcome = f.manager.process_turn(turn("m")).await.unwrap();

    assert!(!outcome.compacted);
    assert!(outcome.is_degraded());
    assert!(stored(&f.store).await.recent.starts_with("zzz"));
}

#[tokio::test]
async fn oversized_state_retries_compaction_next_turn() {
    let f = fixture(vec![
        MockReply::text("r1"),
        MockReply::Fail(500),
        MockReply::text("r2"),
        MockReply::text("finally summarized"),
    ]);
    seed(&f.store, &ConversationState::new("", "z".repeat(8001))).await;

    let first = f.manager.process_turn(turn("m1")).await.unwrap();
    let second = f.manager.process_turn(turn("m2")).await.unwrap();

    assert!(!first.compacted);
    assert!(second.compacted);
    assert_eq!(f.gateway.summary_requests().await.len(), 2);
    assert_eq!(
        stored(&f.store).await,
        ConversationState::new("finally summarized", "")
    );
}

#[tokio::test]
async fn summary_output_is_scrubbed_of_recent_sentinel() {
    let f = fixture(vec![
        MockReply::text("r"),
        MockReply::text("They said __RECENT__ once."),
    ]);
    seed(&f.store, &ConversationState::new("", "z".repeat(8001))).await;

    f.manager.process_turn(turn("m")).await.unwrap();

    let state = stored(&f.store).await;
    assert_eq!(state.summary, "They said  once.");
    assert_eq!(state.recent, "");
}

#[tokio::test]
#[traced_test]
async fn summary_of_only_sentinels_counts_as_failure() {
    let f = fixture(vec![
        MockReply::text("r"),
        MockReply::text("  __RECENT__ \n"),
    ]);
    let seeded = ConversationState::new("S", "z".repeat(8000));
    seed(&f.store, &seeded).await;

    let outcome = f.manager.process_turn(turn("m")).await.unwrap();

    assert_eq!(outcome.reply, "r");
    assert!(!outcome.compacted);
    assert!(matches!(
        outcome.degradations.as_slice(),
        [Degradation::CompactionFailed { .. }]
    ));
    let mut expected = seeded;
    expected.append_turn("m", "r");
    assert_eq!(stored(&f.store).await, expected);
    assert!(logs_contain("compaction failed"));
}

#[tokio::test]
#[traced_test]
async fn unreadable_history_degrades_to_empty_memory() {
    let f = fixture(vec![MockReply::text("Hello")]);
    seed(&f.store, &ConversationState::new("S", "old")).await;
    f.store.set_fail_reads(true);

    let outcome = f.manager.process_turn(turn("Hi")).await.unwrap();

    assert!(matches!(
        outcome.degradations.as_slice(),
        [Degradation::HistoryUnavailable { .. }]
    ));
    let prompt = f.gateway.requests().await[0]
        .system_content()
        .unwrap()
        .to_string();
    assert_eq!(prompt, Persona::AiFriend.system_prompt());
    // The turn overwrites the unreadable history.
    assert_eq!(
        stored(&f.store).await,
        ConversationState::new("", "Human: Hi\nAI: Hello")
    );
    assert!(logs_contain("history unavailable"));
}

#[tokio::test]
async fn persist_failure_still_returns_reply() {
    let f = fixture(vec![MockReply::text("Hello")]);
    f.store.set_fail_writes(true);

    let outcome = f.manager.process_turn(turn("Hi")).await.unwrap();

    assert_eq!(outcome.reply, "Hello");
    assert!(matches!(
        outcome.degradations.as_slice(),
        [Degradation::PersistFailed { .. }]
    ));
    assert!(f.store.record("chat-1").await.is_none());
}

#[tokio::test]
async fn other_users_thread_reads_as_empty() {
    let f = fixture(vec![MockReply::text("r")]);
    seed(&f.store, &ConversationState::new("secret", "private")).await;

    let mut request = turn("m");
    request.user_id = "someone-else".into();
    f.manager.process_turn(request).await.unwrap();

    let prompt = f.gateway.requests().await[0]
        .system_content()
        .unwrap()
        .to_string();
    assert!(!prompt.contains("secret"));
    // Ownership stays with the original user.
    assert_eq!(f.store.record("chat-1").await.unwrap().user_id, "user-1");
}

#[tokio::test]
async fn concurrent_turns_on_one_thread_are_both_kept() {
    let store = Arc::new(InMemoryThreadStore::new());
    let gateway = Arc::new(
        MockGateway::with_replies(vec![MockReply::text("r1"), MockReply::text("r2")])
            .with_delay(Duration::from_millis(50)),
    );
    let manager = Arc::new(MemoryManager::new(
        store.clone(),
        gateway.clone(),
        &MemoryConfig::default(),
        MODEL,
    ));

    let a = tokio::spawn({
        let manager = manager.clone();
        async move { manager.process_turn(turn("m1")).await }
    });
    let b = tokio::spawn({
        let manager = manager.clone();
        async move { manager.process_turn(turn("m2")).await }
    });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let recent = stored(&store).await.recent;
    assert!(recent.contains("Human: m1\nAI: "), "got {recent:?}");
    assert!(recent.contains("Human: m2\nAI: "), "got {recent:?}");
    assert_eq!(recent.matches("Human: ").count(), 2);
    assert!(manager.locks().is_empty());
}

#[tokio::test]
async fn without_serialization_last_write_wins() {
    let store = Arc::new(InMemoryThreadStore::new());
    let gateway = Arc::new(
        MockGateway::with_replies(vec![MockReply::text("r1"), MockReply::text("r2")])
            .with_delay(Duration::from_millis(100)),
    );
    let config = MemoryConfig {
        serialize_threads: false,
        ..MemoryConfig::default()
    };
    let manager = Arc::new(MemoryManager::new(store.clone(), gateway, &config, MODEL));

    let a = tokio::spawn({
        let manager = manager.clone();
        async move { manager.process_turn(turn("m1")).await }
    });
    let b = tokio::spawn({
        let manager = manager.clone();
        async move { manager.process_turn(turn("m2")).await }
    });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Both turns read the empty state, so one overwrote the other.
    let recent = stored(&store).await.recent;
    assert_eq!(recent.matches("Human: ").count(), 1, "got {recent:?}");
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn different_threads_do_not_wait_on_each_other() {
    let delay = Duration::from_millis(300);
    let store = Arc::new(InMemoryThreadStore::new());
    let gateway = Arc::new(MockGateway::new().with_delay(delay));
    let manager = Arc::new(MemoryManager::new(
        store.clone(),
        gateway,
        &MemoryConfig::default(),
        MODEL,
    ));

    let started = std::time::Instant::now();
    let a = tokio::spawn({
        let manager = manager.clone();
        async move { manager.process_turn(turn("to one")).await }
    });
    let b = tokio::spawn({
        let manager = manager.clone();
        let mut other = turn("to two");
        other.thread_id = "chat-2".into();
        async move { manager.process_turn(other).await }
    });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // One reply delay in total: the per-thread locks did not serialize them.
    assert!(started.elapsed() < delay * 2, "took {:?}", started.elapsed());
    assert_eq!(stored(&store).await.recent, "Human: to one\nAI: mock response");
    let second = store.record("chat-2").await.unwrap();
    assert_eq!(
        decode(Some(&second.encoded_state)).recent,
        "Human: to two\nAI: mock response"
    );
}
