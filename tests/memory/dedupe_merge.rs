use super::memory_harness::{temp_store, user_source};
use engram::store::{MemoryFilter, MemoryPatch, MemoryStatus};

#[test]
fn punctuation_and_case_variants_merge_exactly() {
    let (_tmp, store) = temp_store();
    let first = store
        .create_or_revive("I like tea", 0.8, false, &user_source())
        .expect("create");
    let second = store
        .create_or_revive("i like tea!!", 0.7, false, &user_source())
        .expect("revive");

    assert!(second.updated && !second.created);
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(
        store.list_memories(&MemoryFilter::default()).expect("list").len(),
        1
    );
}

#[test]
fn near_duplicate_merges_and_keeps_first_person_text() {
    let (_tmp, store) = temp_store();
    store
        .create_or_revive("the user likes tea", 0.7, false, &user_source())
        .expect("create");
    let merged = store
        .create_or_revive("I like tea", 0.88, false, &user_source())
        .expect("merge");

    assert!(merged.updated);
    assert_eq!(merged.record.text, "I like tea");
    assert!((merged.record.confidence - 0.88).abs() < f64::EPSILON);
}

#[test]
fn merge_keeps_higher_confidence_and_sticky_explicit() {
    let (_tmp, store) = temp_store();
    store
        .create_or_revive("I like tea", 0.99, true, &user_source())
        .expect("create");
    let merged = store
        .create_or_revive("I like tea", 0.6, false, &user_source())
        .expect("merge");

    assert!((merged.record.confidence - 0.99).abs() < f64::EPSILON);
    assert!(merged.record.is_explicit, "explicit flag must not regress");
}

#[test]
fn merge_appends_rather_than_replaces_provenance() {
    let (_tmp, store) = temp_store();
    let first = store
        .create_or_revive("I like tea", 0.8, false, &user_source())
        .expect("create");
    store
        .create_or_revive("I like tea!", 0.8, false, &user_source())
        .expect("merge");

    let sources = store.sources_for(&first.record.id).expect("sources");
    assert_eq!(sources.len(), 2);
}

#[test]
fn distinct_facts_do_not_merge() {
    let (_tmp, store) = temp_store();
    store
        .create_or_revive("I like tea", 0.8, false, &user_source())
        .expect("create");
    let second = store
        .create_or_revive("my daughter was born in May", 0.9, false, &user_source())
        .expect("create");

    assert!(second.created);
    assert_eq!(
        store.list_memories(&MemoryFilter::default()).expect("list").len(),
        2
    );
}

#[test]
fn stale_record_revives_on_rewrite() {
    let (_tmp, store) = temp_store();
    let outcome = store
        .create_or_revive("我喜欢喝茶", 0.88, false, &user_source())
        .expect("create");
    store
        .update_memory(
            &outcome.record.id,
            &MemoryPatch {
                status: Some(MemoryStatus::Stale),
                ..MemoryPatch::default()
            },
        )
        .expect("update");

    let revived = store
        .create_or_revive("我喜欢喝茶", 0.9, false, &user_source())
        .expect("revive");
    assert!(revived.updated);
    assert_eq!(revived.record.id, outcome.record.id);
    assert_eq!(revived.record.status, MemoryStatus::Created);
}

#[test]
fn deleted_record_never_revives() {
    let (_tmp, store) = temp_store();
    let outcome = store
        .create_or_revive("我喜欢喝茶", 0.88, false, &user_source())
        .expect("create");
    store.delete_memory(&outcome.record.id).expect("delete");

    let fresh = store
        .create_or_revive("我喜欢喝茶", 0.9, false, &user_source())
        .expect("create again");
    assert!(fresh.created);
    assert_ne!(fresh.record.id, outcome.record.id);
}
