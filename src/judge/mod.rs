//! Confidence judgment for add-candidates: rule scoring, guard-level
//! thresholds, and LLM escalation for the borderline band.
//!
//! The LLM path never raises to the caller and never replaces a rule
//! verdict with worse information: any timeout, transport error, parse
//! failure, or low-confidence judgment silently degrades to the rule
//! verdict. Single attempt, no retries — a deliberate latency trade-off.

pub mod cache;
pub mod parse;

use crate::config::GuardLevel;
use crate::error::JudgeError;
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::text::{self, signals, signals::SignalCategory};
use cache::JudgeCache;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Half-width of the score band around the threshold that triggers LLM
/// escalation.
pub const BORDERLINE_BAND: f64 = 0.08;

const LLM_INPUT_MAX_CHARS: usize = 280;
const LLM_TIMEOUT: Duration = Duration::from_secs(5);
const LLM_MIN_CONFIDENCE: f64 = 0.55;
const LLM_MAX_TOKENS: u32 = 200;

const JUDGE_SYSTEM_PROMPT: &str = "You judge whether a statement is a durable fact about the user \
worth remembering long-term. Reject questions, transient or dated remarks, procedural/shell \
text, and requests addressed to the assistant. Respond with only a JSON object: \
{\"decision\": true|false, \"confidence\": 0.0-1.0, \"reason\": \"short explanation\"}.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeSource {
    Rule,
    Llm,
}

#[derive(Debug, Clone)]
pub struct JudgeResult {
    pub accepted: bool,
    pub score: f64,
    pub reason: String,
    pub source: JudgeSource,
}

/// Acceptance threshold keyed by explicitness and guard level.
/// Monotone per row: relaxed ≤ standard ≤ strict.
pub fn guard_threshold(is_explicit: bool, guard: GuardLevel) -> f64 {
    match (is_explicit, guard) {
        (true, GuardLevel::Strict) => 0.70,
        (true, GuardLevel::Standard) => 0.60,
        (true, GuardLevel::Relaxed) => 0.52,
        (false, GuardLevel::Strict) => 0.80,
        (false, GuardLevel::Standard) => 0.72,
        (false, GuardLevel::Relaxed) => 0.62,
    }
}

/// Rule-based durability score in [0,1] with a human-readable reason.
///
/// Question-like text short-circuits; otherwise adjustments are additive
/// and the first triggering category (in priority order) names the
/// reason — except procedural, which always wins the reason slot.
pub fn score_memory_text(raw: &str) -> (f64, String) {
    let normalized = text::normalize(raw);
    if normalized.is_empty() {
        return (0.0, "empty".into());
    }
    if text::is_question_like(&normalized) {
        return (0.05, "question-like".into());
    }

    let mut score: f64 = 0.5;
    let mut reason: Option<&'static str> = None;

    if signals::has_factual_signal(&normalized) {
        score += 0.28;
        reason.get_or_insert("factual-personal");
    }
    if SignalCategory::AssistantStyle.matches(&normalized) {
        score += 0.10;
        reason.get_or_insert("assistant-style");
    }
    if SignalCategory::RequestStyle.matches(&normalized) {
        score -= 0.14;
        reason.get_or_insert("request-style");
    }
    if SignalCategory::Transient.matches(&normalized) {
        score -= 0.18;
        reason.get_or_insert("transient");
    }
    if SignalCategory::Procedural.matches(&normalized) {
        score -= 0.40;
        reason = Some("procedural-like");
    }

    let chars = normalized.chars().count();
    if chars < 6 {
        score -= 0.20;
    } else if chars <= 120 {
        score += 0.06;
    } else if chars > 240 {
        score -= 0.08;
    }

    (score.clamp(0.0, 1.0), reason.unwrap_or("no-signal").into())
}

/// Scores add-candidates and escalates the borderline band to an LLM.
pub struct ConfidenceJudge {
    provider: Option<Arc<dyn CompletionProvider>>,
    cache: Mutex<JudgeCache>,
    model: String,
    temperature: f64,
}

impl ConfidenceJudge {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            cache: Mutex::new(JudgeCache::with_defaults()),
            model: model.into(),
            temperature,
        }
    }

    /// Judge with no LLM escalation path at all.
    pub fn rule_only() -> Self {
        Self::new(None, "", 0.0)
    }

    pub async fn judge(
        &self,
        candidate_text: &str,
        is_explicit: bool,
        guard: GuardLevel,
        llm_enabled: bool,
    ) -> JudgeResult {
        let (score, reason) = score_memory_text(candidate_text);
        let threshold = guard_threshold(is_explicit, guard);
        let rule_verdict = JudgeResult {
            accepted: score >= threshold,
            score,
            reason: reason.clone(),
            source: JudgeSource::Rule,
        };

        if !llm_enabled || self.provider.is_none() {
            return rule_verdict;
        }
        if matches!(reason.as_str(), "empty" | "question-like" | "procedural-like") {
            return rule_verdict;
        }
        if (score - threshold).abs() > BORDERLINE_BAND {
            return rule_verdict;
        }

        let normalized = text::normalize(candidate_text);
        let cache_key = format!("{guard}|{is_explicit}|{normalized}");
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&cache_key) {
                return hit;
            }
        }

        match self.escalate(&normalized).await {
            Ok(llm_verdict) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.insert(cache_key, llm_verdict.clone());
                }
                llm_verdict
            }
            Err(error) => {
                tracing::debug!("llm judgment degraded to rule verdict: {error:#}");
                rule_verdict
            }
        }
    }

    async fn escalate(&self, normalized_text: &str) -> anyhow::Result<JudgeResult> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no completion provider configured"))?;

        let request = CompletionRequest {
            system_prompt: Some(JUDGE_SYSTEM_PROMPT.to_string()),
            user_prompt: text::truncate_chars(normalized_text, LLM_INPUT_MAX_CHARS).to_string(),
            model: self.model.clone(),
            max_tokens: LLM_MAX_TOKENS,
            temperature: self.temperature,
        };

        let raw = tokio::time::timeout(LLM_TIMEOUT, provider.complete(&request))
            .await
            .map_err(|_| JudgeError::Timeout {
                timeout_secs: LLM_TIMEOUT.as_secs(),
            })??;

        let judgment = parse::parse_judgment(&raw).map_err(JudgeError::Unparseable)?;
        if judgment.confidence < LLM_MIN_CONFIDENCE {
            return Err(JudgeError::LowConfidence(judgment.confidence).into());
        }

        Ok(JudgeResult {
            accepted: judgment.accepted,
            score: judgment.confidence,
            reason: judgment.reason,
            source: JudgeSource::Llm,
        })
    }
}
