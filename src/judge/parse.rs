//! Permissive parsing of LLM judgment output.
//!
//! Parse failure is an expected outcome, not an error condition: the
//! caller degrades to its rule verdict, so this module returns a tagged
//! result and never panics on malformed text.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// A structured judgment recovered from free-form LLM output.
#[derive(Debug, Clone)]
pub struct LlmJudgment {
    pub accepted: bool,
    pub confidence: f64,
    pub reason: String,
}

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced-json pattern")
});

static ACCEPT_WORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(yes|true|accept|accepted|keep|store|remember|durable)\b")
        .expect("accept-wording pattern")
});

static REJECT_WORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(no|false|reject|rejected|skip|drop|discard|transient)\b")
        .expect("reject-wording pattern")
});

/// Recover `{accepted, confidence, reason}` from raw completion text.
/// Accepts a fenced or bare JSON object; the decision field may be a
/// boolean or acceptance wording as a string.
pub fn parse_judgment(raw: &str) -> Result<LlmJudgment, String> {
    let body = extract_json_object(raw).ok_or_else(|| "no JSON object found".to_string())?;
    let value: Value =
        serde_json::from_str(&body).map_err(|error| format!("invalid JSON: {error}"))?;
    let object = value
        .as_object()
        .ok_or_else(|| "top-level value is not an object".to_string())?;

    let decision = object
        .get("decision")
        .or_else(|| object.get("accepted"))
        .or_else(|| object.get("accept"))
        .ok_or_else(|| "missing decision field".to_string())?;
    let accepted = decision_to_bool(decision)
        .ok_or_else(|| format!("unrecognized decision value: {decision}"))?;

    // A decision without a stated confidence is treated as barely trusted.
    let confidence = object
        .get("confidence")
        .or_else(|| object.get("score"))
        .and_then(Value::as_f64)
        .unwrap_or(0.6)
        .clamp(0.0, 1.0);

    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .map_or_else(|| "llm".to_string(), ToString::to_string);

    Ok(LlmJudgment {
        accepted,
        confidence,
        reason,
    })
}

fn extract_json_object(raw: &str) -> Option<String> {
    if let Some(captures) = FENCED_JSON.captures(raw) {
        return Some(captures[1].to_string());
    }
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| raw[start..=end].to_string())
}

fn decision_to_bool(decision: &Value) -> Option<bool> {
    match decision {
        Value::Bool(flag) => Some(*flag),
        Value::String(wording) => {
            if ACCEPT_WORDING.is_match(wording) {
                Some(true)
            } else if REJECT_WORDING.is_match(wording) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}
