//! Text-preference heuristic for merge-on-write.

use regex::Regex;
use std::sync::LazyLock;

static THIRD_PERSON_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(the user|this user|该用户|用户)").expect("third-person-lead pattern")
});

static FIRST_PERSON_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(i\b|i['’]|my\b|我)").expect("first-person-lead pattern")
});

/// Pick the better phrasing between an existing record's text and an
/// incoming duplicate: first-person beats third-person-marker leads, and
/// ties go to the longer (more specific) text, existing text winning an
/// exact tie.
pub fn choose_preferred<'a>(existing: &'a str, incoming: &'a str) -> &'a str {
    let existing_quality = quality(existing);
    let incoming_quality = quality(incoming);

    if incoming_quality > existing_quality {
        return incoming;
    }
    if existing_quality > incoming_quality {
        return existing;
    }
    if incoming.chars().count() > existing.chars().count() {
        incoming
    } else {
        existing
    }
}

fn quality(text: &str) -> i32 {
    let mut score = 0;
    if THIRD_PERSON_LEAD.is_match(text) {
        score -= 2;
    }
    if FIRST_PERSON_LEAD.is_match(text) {
        score += 1;
    }
    score
}
