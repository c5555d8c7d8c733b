use super::memory_harness::{FailingProvider, ScriptedProvider, StalledProvider};
use engram::config::GuardLevel;
use engram::judge::{ConfidenceJudge, JudgeSource};
use std::sync::Arc;

// Rule score 0.66: borderline against both the standard (0.72) and
// relaxed (0.62) implicit thresholds.
const BORDERLINE: &str = "from now on reply in English";

fn judge_with(provider: Arc<dyn engram::provider::CompletionProvider>) -> ConfidenceJudge {
    ConfidenceJudge::new(Some(provider), "gpt-3.5-turbo", 0.0)
}

#[tokio::test]
async fn llm_flips_borderline_rejection_into_acceptance() {
    let provider = ScriptedProvider::new(
        r#"{"decision": true, "confidence": 0.9, "reason": "durable preference"}"#,
    );
    let judge = judge_with(provider.clone());

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Standard, true).await;
    assert!(verdict.accepted);
    assert_eq!(verdict.source, JudgeSource::Llm);
    assert!((verdict.score - 0.9).abs() < f64::EPSILON);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn llm_flips_borderline_acceptance_into_rejection() {
    let provider = ScriptedProvider::new(
        r#"{"decision": false, "confidence": 0.85, "reason": "one-off instruction"}"#,
    );
    let judge = judge_with(provider.clone());

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Relaxed, true).await;
    assert!(!verdict.accepted);
    assert_eq!(verdict.source, JudgeSource::Llm);
}

#[tokio::test]
async fn repeated_judgments_hit_the_cache() {
    let provider = ScriptedProvider::new(
        r#"{"decision": true, "confidence": 0.9, "reason": "durable"}"#,
    );
    let judge = judge_with(provider.clone());

    for _ in 0..3 {
        let verdict = judge.judge(BORDERLINE, false, GuardLevel::Standard, true).await;
        assert!(verdict.accepted);
    }
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn different_guard_levels_cache_separately() {
    let provider = ScriptedProvider::new(
        r#"{"decision": true, "confidence": 0.9, "reason": "durable"}"#,
    );
    let judge = judge_with(provider.clone());

    judge.judge(BORDERLINE, false, GuardLevel::Standard, true).await;
    judge.judge(BORDERLINE, false, GuardLevel::Relaxed, true).await;
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn confident_scores_never_escalate() {
    let provider = ScriptedProvider::new(
        r#"{"decision": false, "confidence": 0.9, "reason": "irrelevant"}"#,
    );
    let judge = judge_with(provider.clone());

    // 0.84 against 0.72 sits outside the borderline band.
    let verdict = judge.judge("我叫小明", false, GuardLevel::Standard, true).await;
    assert!(verdict.accepted);
    assert_eq!(verdict.source, JudgeSource::Rule);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn questions_never_escalate() {
    let provider = ScriptedProvider::new(
        r#"{"decision": true, "confidence": 0.99, "reason": "sure"}"#,
    );
    let judge = judge_with(provider.clone());

    let verdict = judge.judge("能不能帮我查天气", false, GuardLevel::Relaxed, true).await;
    assert!(!verdict.accepted);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn disabled_flag_skips_the_provider_entirely() {
    let provider = ScriptedProvider::new(
        r#"{"decision": true, "confidence": 0.9, "reason": "durable"}"#,
    );
    let judge = judge_with(provider.clone());

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Standard, false).await;
    assert_eq!(verdict.source, JudgeSource::Rule);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_degrades_to_rule_verdict() {
    let judge = judge_with(Arc::new(StalledProvider));

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Relaxed, true).await;
    assert!(verdict.accepted, "rule verdict at relaxed accepts 0.66");
    assert_eq!(verdict.source, JudgeSource::Rule);
}

#[tokio::test]
async fn transport_failure_degrades_to_rule_verdict() {
    let judge = judge_with(Arc::new(FailingProvider));

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Standard, true).await;
    assert!(!verdict.accepted, "rule verdict at standard rejects 0.66");
    assert_eq!(verdict.source, JudgeSource::Rule);
}

#[tokio::test]
async fn unparseable_reply_degrades_to_rule_verdict() {
    let judge = judge_with(ScriptedProvider::new("I think you should keep it."));

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Relaxed, true).await;
    assert_eq!(verdict.source, JudgeSource::Rule);
}

#[tokio::test]
async fn low_confidence_judgment_degrades_to_rule_verdict() {
    let judge = judge_with(ScriptedProvider::new(
        r#"{"decision": false, "confidence": 0.3, "reason": "unsure"}"#,
    ));

    let verdict = judge.judge(BORDERLINE, false, GuardLevel::Relaxed, true).await;
    assert!(verdict.accepted);
    assert_eq!(verdict.source, JudgeSource::Rule);
}
