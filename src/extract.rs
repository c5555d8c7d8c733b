//! Candidate extraction: one conversational turn in, tagged add/delete
//! candidates out.
//!
//! Explicit commands ("remember: …" / "请记住：…") are always surfaced at
//! confidence 0.99. Implicit extraction mines the user side of the turn
//! for durable personal facts, hard-capped at two per turn.

use crate::config::GuardLevel;
use crate::judge::guard_threshold;
use crate::text::{self, signals};
use regex::Regex;
use std::sync::LazyLock;

pub const EXPLICIT_CONFIDENCE: f64 = 0.99;

/// Implicit adds per turn never exceed this, whatever the caller asks for.
pub const MAX_IMPLICIT_ADDS: usize = 2;

const MIN_FRAGMENT_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryAction {
    Add,
    Delete,
}

/// A transient add/delete candidate produced by extraction, consumed by
/// the judge and store. Never persisted.
#[derive(Debug, Clone)]
pub struct ExtractedChange {
    pub action: MemoryAction,
    pub text: String,
    pub confidence: f64,
    pub is_explicit: bool,
    pub reason: String,
}

static EXPLICIT_ADD_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(please\s+)?(remember( this)?|store this in memory|save (this )?to memory|note this down)\s*[:：]\s*(?P<rest>.+)$",
    )
    .expect("explicit-add pattern (en)")
});

static EXPLICIT_ADD_ZH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(请|帮我)?(记住|记一下|记下来|保存到记忆|存到记忆)\s*[:：，,]?\s*(?P<rest>.+)$")
        .expect("explicit-add pattern (zh)")
});

static EXPLICIT_DELETE_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(please\s+)?(forget( this| that| it)?|remove from memory|delete (this |that )?memory)\s*[:：]\s*(?P<rest>.+)$",
    )
    .expect("explicit-delete pattern (en)")
});

static EXPLICIT_DELETE_ZH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(请|帮我)?(忘记|忘掉|别记|删除记忆|删掉记忆)\s*[:：，,]?\s*(?P<rest>.+)$")
        .expect("explicit-delete pattern (zh)")
});

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("code-fence pattern"));

static FRAGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[。！？!?.;；,，\n]+").expect("fragment-split pattern"));

/// Extract all memory-change candidates from one turn.
///
/// Output order: explicit deletes, explicit adds, implicit adds —
/// deduplicated by `(action, lowercased text)`.
pub fn extract(
    user_text: &str,
    assistant_text: &str,
    guard: GuardLevel,
    max_implicit_adds: usize,
) -> Vec<ExtractedChange> {
    let mut changes = Vec::new();

    for line in user_text.lines() {
        if let Some(rest) = capture_rest(&EXPLICIT_DELETE_EN, line)
            .or_else(|| capture_rest(&EXPLICIT_DELETE_ZH, line))
        {
            changes.push(ExtractedChange {
                action: MemoryAction::Delete,
                text: rest,
                confidence: EXPLICIT_CONFIDENCE,
                is_explicit: true,
                reason: "explicit-forget".into(),
            });
        }
    }

    for line in user_text.lines() {
        if let Some(rest) =
            capture_rest(&EXPLICIT_ADD_EN, line).or_else(|| capture_rest(&EXPLICIT_ADD_ZH, line))
        {
            changes.push(ExtractedChange {
                action: MemoryAction::Add,
                text: rest,
                confidence: EXPLICIT_CONFIDENCE,
                is_explicit: true,
                reason: "explicit-command".into(),
            });
        }
    }

    changes.extend(implicit_adds(user_text, assistant_text, guard, max_implicit_adds));

    dedupe(changes)
}

fn capture_rest(pattern: &Regex, line: &str) -> Option<String> {
    let captures = pattern.captures(line)?;
    let rest = text::normalize(captures.name("rest")?.as_str());
    (!rest.is_empty()).then_some(rest)
}

/// Implicit extraction mines only the user side; the assistant side just
/// has to be non-empty (a turn with no reply is not a completed exchange).
fn implicit_adds(
    user_text: &str,
    assistant_text: &str,
    guard: GuardLevel,
    max_implicit_adds: usize,
) -> Vec<ExtractedChange> {
    let cap = max_implicit_adds.min(MAX_IMPLICIT_ADDS);
    if cap == 0 {
        return Vec::new();
    }

    let user_stripped = strip_explicit_lines(&strip_code_fences(user_text));
    let assistant_stripped = strip_code_fences(assistant_text);
    if user_stripped.trim().is_empty() || assistant_stripped.trim().is_empty() {
        return Vec::new();
    }

    let threshold = guard_threshold(false, guard);
    let mut survivors = Vec::new();

    for raw_fragment in FRAGMENT_SPLIT.split(&user_stripped) {
        if survivors.len() == cap {
            break;
        }

        let fragment = clip_request_tail(raw_fragment.trim());
        let fragment = text::normalize(&fragment);
        if rejects_fragment(&fragment) {
            continue;
        }

        let Some((category, score)) = signals::implicit_priority(&fragment) else {
            continue;
        };
        if score < threshold {
            continue;
        }

        survivors.push(ExtractedChange {
            action: MemoryAction::Add,
            text: fragment,
            confidence: score,
            is_explicit: false,
            reason: category.label().into(),
        });
    }

    survivors
}

fn rejects_fragment(fragment: &str) -> bool {
    if fragment.is_empty() {
        return true;
    }
    if fragment.chars().count() < MIN_FRAGMENT_CHARS && !signals::has_factual_signal(fragment) {
        return true;
    }
    if signals::is_small_talk(fragment)
        || text::is_question_like(fragment)
        || signals::is_assistant_voice(fragment)
        || signals::SignalCategory::Procedural.matches(fragment)
        || signals::is_non_durable_topic(fragment)
        || signals::is_metadata_line(fragment)
    {
        return true;
    }
    // Dated references only survive when anchored to something durable.
    if signals::SignalCategory::Transient.matches(fragment)
        && !(signals::SignalCategory::PersonalProfile.matches(fragment)
            || signals::SignalCategory::PersonalOwnership.matches(fragment)
            || signals::SignalCategory::AssistantStyle.matches(fragment))
    {
        return true;
    }
    false
}

fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, " ").into_owned()
}

/// Drop lines that are explicit commands so they are not re-mined as
/// implicit candidates.
fn strip_explicit_lines(text: &str) -> String {
    text.lines()
        .filter(|line| {
            !(EXPLICIT_ADD_EN.is_match(line)
                || EXPLICIT_ADD_ZH.is_match(line)
                || EXPLICIT_DELETE_EN.is_match(line)
                || EXPLICIT_DELETE_ZH.is_match(line))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clip a fragment at the first request transition ("…, can you help me")
/// so trailing requests don't pollute the stored fact.
fn clip_request_tail(fragment: &str) -> String {
    match signals::request_tail_start(fragment) {
        Some(idx) => fragment[..idx].trim_end().to_string(),
        None => fragment.to_string(),
    }
}

fn dedupe(changes: Vec<ExtractedChange>) -> Vec<ExtractedChange> {
    let mut seen = std::collections::HashSet::new();
    changes
        .into_iter()
        .filter(|change| {
            seen.insert((
                matches!(change.action, MemoryAction::Delete),
                change.text.to_lowercase(),
            ))
        })
        .collect()
}
