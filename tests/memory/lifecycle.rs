use super::memory_harness::{session_source, temp_store, user_source};
use engram::store::{MemoryFilter, MemoryStatus};

#[test]
fn session_teardown_marks_orphaned_implicit_stale() {
    let (_tmp, store) = temp_store();
    let implicit = store
        .create_or_revive("我喜欢喝茶", 0.88, false, &session_source("session-a"))
        .expect("create");
    let explicit = store
        .create_or_revive("I live in Berlin", 0.99, true, &session_source("session-a"))
        .expect("create");

    let deactivated = store
        .deactivate_sources_for_session("session-a")
        .expect("deactivate");
    assert_eq!(deactivated, 2);

    let implicit_after = store
        .get_memory(&implicit.record.id)
        .expect("get")
        .expect("present");
    assert_eq!(implicit_after.status, MemoryStatus::Stale);

    // Explicit memories outlive their sources.
    let explicit_after = store
        .get_memory(&explicit.record.id)
        .expect("get")
        .expect("present");
    assert_eq!(explicit_after.status, MemoryStatus::Created);
}

#[test]
fn implicit_with_surviving_source_stays_created() {
    let (_tmp, store) = temp_store();
    let outcome = store
        .create_or_revive("我喜欢喝茶", 0.88, false, &session_source("session-a"))
        .expect("create");
    store
        .attach_source(&outcome.record.id, &session_source("session-b"))
        .expect("attach");

    store
        .deactivate_sources_for_session("session-a")
        .expect("deactivate");

    let record = store
        .get_memory(&outcome.record.id)
        .expect("get")
        .expect("present");
    assert_eq!(record.status, MemoryStatus::Created);
}

#[test]
fn sweep_reports_zero_when_nothing_is_orphaned() {
    let (_tmp, store) = temp_store();
    store
        .create_or_revive("我喜欢喝茶", 0.88, false, &user_source())
        .expect("create");
    assert_eq!(store.mark_orphaned_implicit_stale().expect("sweep"), 0);
}

#[test]
fn purge_removes_assistant_voice_and_procedural_records() {
    let (_tmp, store) = temp_store();
    // The store itself does not judge; seed it with records that slipped
    // past extraction in an older version.
    store
        .create_or_revive("我可以帮你查天气", 0.8, false, &user_source())
        .expect("create");
    store
        .create_or_revive("git push --force origin main", 0.8, false, &user_source())
        .expect("create");
    store
        .create_or_revive("what is my name?", 0.8, false, &user_source())
        .expect("create");
    let keeper = store
        .create_or_revive("我喜欢喝茶", 0.88, false, &user_source())
        .expect("create");

    let purged = store.purge_non_personal().expect("purge");
    assert_eq!(purged, 3);

    let remaining = store
        .list_memories(&MemoryFilter {
            status: Some(MemoryStatus::Created),
            ..MemoryFilter::default()
        })
        .expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keeper.record.id);
}

#[test]
fn stale_records_are_excluded_from_created_listings() {
    let (_tmp, store) = temp_store();
    store
        .create_or_revive("我喜欢喝茶", 0.88, false, &session_source("session-a"))
        .expect("create");
    store
        .deactivate_sources_for_session("session-a")
        .expect("deactivate");

    let created = store
        .list_memories(&MemoryFilter {
            status: Some(MemoryStatus::Created),
            ..MemoryFilter::default()
        })
        .expect("list");
    assert!(created.is_empty());

    let stale = store
        .list_memories(&MemoryFilter {
            status: Some(MemoryStatus::Stale),
            ..MemoryFilter::default()
        })
        .expect("list");
    assert_eq!(stale.len(), 1);
}
