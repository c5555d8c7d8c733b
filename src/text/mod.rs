//! Pure text normalization shared by the extractor, judge, and store.
//!
//! Everything here is referentially transparent: no clocks, no I/O, no
//! per-call regex compilation (patterns live in [`signals`] as process-wide
//! `LazyLock` constants).

pub mod signals;

/// Collapse internal whitespace runs to a single space and trim.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical key for exact/delete matching: lowercase, every
/// non-letter/non-digit character (Unicode-aware) folded to a space,
/// whitespace collapsed.
pub fn match_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            key.push(ch);
        } else {
            key.push(' ');
        }
    }
    normalize(&key)
}

/// Leading subject phrases stripped before near-duplicate comparison,
/// longest first so "the user s" wins over "the user". These operate on
/// `match_key` output, so apostrophes and punctuation are already spaces.
const SUBJECT_PREFIXES: &[&str] = &[
    "the user s",
    "the users",
    "the user",
    "this user",
    "i am",
    "i m",
    "my",
    "i",
    "该用户的",
    "该用户是",
    "该用户",
    "用户的",
    "用户是",
    "用户",
    "我们的",
    "我们",
    "我的",
    "我是",
    "我",
    "你们的",
    "你的",
    "你",
];

/// Match key with leading subject pronouns/determiners removed and light
/// ASCII inflection folding, so "I like tea" and "the user likes tea"
/// compare equal.
pub fn semantic_key(text: &str) -> String {
    let key = match_key(text);
    let mut stripped = key.as_str();

    loop {
        let mut changed = false;
        for prefix in SUBJECT_PREFIXES {
            if let Some(rest) = strip_subject_prefix(stripped, prefix) {
                if rest.is_empty() {
                    // Stripping the whole key would make it match everything.
                    return stem_tokens(&key);
                }
                stripped = rest;
                changed = true;
                break;
            }
        }
        if !changed {
            break;
        }
    }

    stem_tokens(stripped)
}

fn strip_subject_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = key.strip_prefix(prefix)?;
    if prefix.is_ascii() {
        // ASCII prefixes must end on a token boundary.
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix(' ')
        }
    } else {
        Some(rest.trim_start())
    }
}

/// Fold plural/third-person `s` on ASCII tokens ("likes" → "like").
/// CJK tokens pass through untouched.
fn stem_tokens(key: &str) -> String {
    key.split_whitespace()
        .map(stem_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn stem_token(token: &str) -> &str {
    if token.is_ascii()
        && token.len() >= 4
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
    {
        &token[..token.len() - 1]
    } else {
        token
    }
}

/// Authoritative question-likeness test. Governs rejection in both
/// extraction and scoring: terminal question mark in either script, an
/// interrogative prefix token, an embedded A-not-A/yes-no construction,
/// or a sentence-final question particle.
pub fn is_question_like(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.ends_with('?') || trimmed.ends_with('？') {
        return true;
    }
    signals::question_prefix(trimmed)
        || signals::embedded_interrogative(trimmed)
        || signals::final_question_particle(trimmed)
}

/// True if the text carries any CJK ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}

pub(crate) fn is_cjk_char(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}')
}

/// Truncate on a char boundary, never mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
