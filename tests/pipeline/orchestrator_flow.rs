use super::memory_harness::{ScriptedProvider, temp_store};
use engram::config::GuardLevel;
use engram::judge::ConfidenceJudge;
use engram::orchestrator::{MemoryOrchestrator, TurnRequest};
use engram::store::{MemoryFilter, MemoryStatus, MemoryStore};
use std::sync::Arc;
use tempfile::TempDir;

fn rule_only_orchestrator() -> (TempDir, Arc<MemoryStore>, MemoryOrchestrator) {
    let (tmp, store) = temp_store();
    let store = Arc::new(store);
    let orchestrator =
        MemoryOrchestrator::new(store.clone(), ConfidenceJudge::rule_only(), 2);
    (tmp, store, orchestrator)
}

fn turn(user: &str, assistant: &str) -> TurnRequest {
    let mut request = TurnRequest::new(user, assistant);
    request.session_id = Some("session-1".into());
    request.user_message_id = Some("msg-user".into());
    request.assistant_message_id = Some("msg-assistant".into());
    request
}

#[tokio::test]
async fn bilingual_turn_stores_two_implicit_facts() {
    let (_tmp, store, orchestrator) = rule_only_orchestrator();
    let stats = orchestrator
        .apply_turn_memory_updates(&turn("我叫小明，我喜欢喝茶，请帮我查下天气", "好的，今天天气晴。"))
        .await;

    assert_eq!(stats.total_changes, 2);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.judge_rejected, 0);

    let records = store.list_memories(&MemoryFilter::default()).expect("list");
    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert!(texts.contains(&"我叫小明"));
    assert!(texts.contains(&"我喜欢喝茶"));
}

#[tokio::test]
async fn full_remember_then_forget_round_trip() {
    let (_tmp, store, orchestrator) = rule_only_orchestrator();
    orchestrator
        .apply_turn_memory_updates(&turn("remember: I live in Berlin", "Noted."))
        .await;

    let stats = orchestrator
        .apply_turn_memory_updates(&turn("forget: I live in Berlin", "Forgotten."))
        .await;
    assert_eq!(stats.deleted, 1);

    let active = store
        .list_memories(&MemoryFilter {
            status: Some(MemoryStatus::Created),
            ..MemoryFilter::default()
        })
        .expect("list");
    assert!(active.is_empty());

    // Soft delete keeps the audit row.
    let all = store.list_memories(&MemoryFilter::default()).expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, MemoryStatus::Deleted);
}

#[tokio::test]
async fn repeated_turns_merge_rather_than_duplicate() {
    let (_tmp, store, orchestrator) = rule_only_orchestrator();
    let first = orchestrator
        .apply_turn_memory_updates(&turn("我喜欢喝茶", "好的"))
        .await;
    let second = orchestrator
        .apply_turn_memory_updates(&turn("我喜欢喝茶！", "好的"))
        .await;

    assert_eq!(first.created, 1);
    assert_eq!(second.updated, 1);
    assert_eq!(
        store.list_memories(&MemoryFilter::default()).expect("list").len(),
        1
    );
}

#[tokio::test]
async fn turn_stats_count_rejections_and_skips() {
    let (_tmp, _store, orchestrator) = rule_only_orchestrator();
    let stats = orchestrator
        .apply_turn_memory_updates(&turn(
            "remember: what is my name?\nforget: x",
            "Your name is Ming.",
        ))
        .await;

    assert_eq!(stats.total_changes, 2);
    assert_eq!(stats.judge_rejected, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.created, 0);
    assert_eq!(stats.deleted, 0);
}

#[tokio::test]
async fn llm_judge_reviews_borderline_implicit_candidates() {
    let (_tmp, store) = temp_store();
    let store = Arc::new(store);
    let provider = ScriptedProvider::new(
        r#"{"decision": false, "confidence": 0.9, "reason": "one-off instruction"}"#,
    );
    let judge = ConfidenceJudge::new(Some(provider.clone()), "gpt-3.5-turbo", 0.0);
    let orchestrator = MemoryOrchestrator::new(store.clone(), judge, 2);

    let mut request = turn("from now on reply in English", "Sure.");
    request.guard = GuardLevel::Relaxed;
    request.llm_judge_enabled = true;

    let stats = orchestrator.apply_turn_memory_updates(&request).await;
    assert_eq!(stats.llm_reviewed, 1);
    assert_eq!(stats.judge_rejected, 1);
    assert_eq!(provider.call_count(), 1);
    assert!(store.list_memories(&MemoryFilter::default()).expect("list").is_empty());
}

#[tokio::test]
async fn implicit_memories_go_stale_when_their_session_ends() {
    let (_tmp, store, orchestrator) = rule_only_orchestrator();
    orchestrator
        .apply_turn_memory_updates(&turn("我喜欢喝茶", "好的"))
        .await;

    store
        .deactivate_sources_for_session("session-1")
        .expect("deactivate");

    let records = store.list_memories(&MemoryFilter::default()).expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, MemoryStatus::Stale);
}

#[tokio::test]
async fn small_talk_turn_is_a_no_op() {
    let (_tmp, store, orchestrator) = rule_only_orchestrator();
    let stats = orchestrator
        .apply_turn_memory_updates(&turn("thanks, that helped!", "Any time."))
        .await;

    assert_eq!(stats, engram::orchestrator::TurnStats::default());
    assert!(store.list_memories(&MemoryFilter::default()).expect("list").is_empty());
}
