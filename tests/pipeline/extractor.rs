use engram::config::GuardLevel;
use engram::extract::{MemoryAction, extract};

#[test]
fn mixed_turn_orders_deletes_before_adds() {
    let user = "forget: I live in Berlin\nremember: I live in Munich\n我喜欢喝茶";
    let changes = extract(user, "好的", GuardLevel::Standard, 2);

    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0].action, MemoryAction::Delete);
    assert_eq!(changes[0].text, "I live in Berlin");
    assert_eq!(changes[1].action, MemoryAction::Add);
    assert!(changes[1].is_explicit);
    assert_eq!(changes[2].text, "我喜欢喝茶");
    assert!(!changes[2].is_explicit);
}

#[test]
fn request_tail_is_clipped_from_implicit_candidate() {
    let changes = extract(
        "I have two cats, can you recommend some names",
        "Sure!",
        GuardLevel::Standard,
        2,
    );
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].text, "I have two cats");
    assert_eq!(changes[0].reason, "personal-ownership");
}

#[test]
fn assistant_style_preference_is_extracted() {
    let changes = extract("以后请用中文回答", "好的", GuardLevel::Standard, 2);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].reason, "assistant-style");
    assert!((changes[0].confidence - 0.86).abs() < f64::EPSILON);
}

#[test]
fn small_talk_turn_extracts_nothing() {
    for user in ["thanks!", "你好", "ok cool"] {
        let changes = extract(user, "you're welcome", GuardLevel::Standard, 2);
        assert!(changes.is_empty(), "extracted from small talk: {user}");
    }
}

#[test]
fn multiline_explicit_commands_each_extract() {
    let user = "remember: I work as a nurse\nremember: my favourite color is green";
    let changes = extract(user, "Noted.", GuardLevel::Standard, 0);
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|c| c.is_explicit));
}

#[test]
fn explicit_rest_must_be_non_empty() {
    let changes = extract("remember:   ", "ok", GuardLevel::Standard, 0);
    assert!(changes.is_empty());
}

#[test]
fn duplicate_implicit_and_explicit_text_deduped() {
    let user = "请记住：我喜欢喝茶\n我喜欢喝茶";
    let changes = extract(user, "好的", GuardLevel::Standard, 2);
    assert_eq!(changes.len(), 1);
    assert!(changes[0].is_explicit, "explicit wins the dedupe");
}
