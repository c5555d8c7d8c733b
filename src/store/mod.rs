//! Persisted memory records and their provenance links.
//!
//! Single logical writer per store instance: a `Mutex<Connection>`
//! serializes in-process use, and no cross-process locking is attempted.
//! Deletion is always soft — records flip to `deleted`, rows stay.

pub mod merge;
pub mod similarity;

use crate::error::StoreError;
use crate::text;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Error as SqlError, OptionalExtension, params, types::Type};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Stored text is normalized and truncated to this many chars.
pub const TEXT_MAX_CHARS: usize = 360;

/// Near-duplicate scan looks at this many most-recently-updated records.
/// A deliberate scalability trade-off: older records can escape the merge
/// in very large memory sets; fingerprint exact-match still catches them.
pub const RECENT_SCAN_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStatus {
    Created,
    Stale,
    Deleted,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    User,
    Assistant,
    Tool,
    System,
}

/// A durable fact about the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub text: String,
    pub fingerprint: String,
    pub confidence: f64,
    pub is_explicit: bool,
    pub status: MemoryStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_used_at: Option<i64>,
}

/// Provenance link tying a memory to the turn/message that produced or
/// reinforced it. Appended, never removed — only deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySourceRow {
    pub id: String,
    pub memory_id: String,
    pub session_id: Option<String>,
    pub message_id: Option<String>,
    pub role: SourceRole,
    pub is_active: bool,
    pub created_at: i64,
}

/// Provenance for one write, supplied by the orchestration layer.
#[derive(Debug, Clone)]
pub struct SourceAttribution {
    pub session_id: Option<String>,
    pub message_id: Option<String>,
    pub role: SourceRole,
}

#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub record: MemoryRecord,
    pub created: bool,
    pub updated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFilter {
    pub status: Option<MemoryStatus>,
    pub is_explicit: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPatch {
    pub text: Option<String>,
    pub confidence: Option<f64>,
    pub status: Option<MemoryStatus>,
    pub is_explicit: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total: u64,
    pub created: u64,
    pub stale: u64,
    pub deleted: u64,
    pub explicit: u64,
    pub implicit: u64,
}

pub struct MemoryStore {
    conn: Mutex<Connection>,
    /// Last issued timestamp; guarantees strictly increasing `updated_at`
    /// even when wall-clock millis collide within one turn.
    clock: Mutex<i64>,
}

impl MemoryStore {
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock: Mutex::new(0),
        })
    }

    /// In-memory store, primarily for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock: Mutex::new(0),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS user_memories (
                 id           TEXT PRIMARY KEY,
                 text         TEXT NOT NULL,
                 fingerprint  TEXT NOT NULL,
                 confidence   REAL NOT NULL,
                 is_explicit  INTEGER NOT NULL DEFAULT 0,
                 status       TEXT NOT NULL,
                 created_at   INTEGER NOT NULL,
                 updated_at   INTEGER NOT NULL,
                 last_used_at INTEGER
             );
             CREATE INDEX IF NOT EXISTS idx_user_memories_fingerprint
                 ON user_memories(fingerprint);
             CREATE INDEX IF NOT EXISTS idx_user_memories_updated
                 ON user_memories(updated_at DESC);

             CREATE TABLE IF NOT EXISTS user_memory_sources (
                 id         TEXT PRIMARY KEY,
                 memory_id  TEXT NOT NULL REFERENCES user_memories(id) ON DELETE CASCADE,
                 session_id TEXT,
                 message_id TEXT,
                 role       TEXT NOT NULL,
                 is_active  INTEGER NOT NULL DEFAULT 1,
                 created_at INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_memory_sources_memory
                 ON user_memory_sources(memory_id);
             CREATE INDEX IF NOT EXISTS idx_memory_sources_session
                 ON user_memory_sources(session_id);",
        )?;
        Ok(())
    }

    fn lock_connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|error| anyhow::anyhow!("Lock error: {error}"))
    }

    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.clock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let issued = now.max(*last + 1);
        *last = issued;
        issued
    }

    /// SHA-256 of the match key, hex-encoded.
    pub fn fingerprint(memory_text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text::match_key(memory_text).as_bytes());
        hex::encode(hasher.finalize())
    }

    fn status_to_str(status: MemoryStatus) -> &'static str {
        match status {
            MemoryStatus::Created => "created",
            MemoryStatus::Stale => "stale",
            MemoryStatus::Deleted => "deleted",
        }
    }

    fn str_to_status(value: &str, column_index: usize) -> rusqlite::Result<MemoryStatus> {
        match value {
            "created" => Ok(MemoryStatus::Created),
            "stale" => Ok(MemoryStatus::Stale),
            "deleted" => Ok(MemoryStatus::Deleted),
            _ => Err(SqlError::FromSqlConversionFailure(
                column_index,
                Type::Text,
                format!("unknown memory status: {value}").into(),
            )),
        }
    }

    fn role_to_str(role: SourceRole) -> &'static str {
        match role {
            SourceRole::User => "user",
            SourceRole::Assistant => "assistant",
            SourceRole::Tool => "tool",
            SourceRole::System => "system",
        }
    }

    fn str_to_role(value: &str, column_index: usize) -> rusqlite::Result<SourceRole> {
        match value {
            "user" => Ok(SourceRole::User),
            "assistant" => Ok(SourceRole::Assistant),
            "tool" => Ok(SourceRole::Tool),
            "system" => Ok(SourceRole::System),
            _ => Err(SqlError::FromSqlConversionFailure(
                column_index,
                Type::Text,
                format!("unknown source role: {value}").into(),
            )),
        }
    }

    fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemoryRecord> {
        let status_raw: String = row.get(5)?;
        Ok(MemoryRecord {
            id: row.get(0)?,
            text: row.get(1)?,
            fingerprint: row.get(2)?,
            confidence: row.get(3)?,
            is_explicit: row.get(4)?,
            status: Self::str_to_status(&status_raw, 5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            last_used_at: row.get(8)?,
        })
    }

    fn map_source_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemorySourceRow> {
        let role_raw: String = row.get(4)?;
        Ok(MemorySourceRow {
            id: row.get(0)?,
            memory_id: row.get(1)?,
            session_id: row.get(2)?,
            message_id: row.get(3)?,
            role: Self::str_to_role(&role_raw, 4)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    const RECORD_COLUMNS: &'static str = "id, text, fingerprint, confidence, is_explicit, status, \
         created_at, updated_at, last_used_at";

    // ── Create-or-revive ─────────────────────────────────────────────────

    /// Insert a new memory or merge into an existing duplicate.
    ///
    /// Exact duplicates are found by fingerprint; near-duplicates by
    /// semantic-key similarity over the recent scan window. A match
    /// merges (preferred text, sticky explicit flag, max confidence) and
    /// revives `stale` records back to `created`.
    pub fn create_or_revive(
        &self,
        memory_text: &str,
        confidence: f64,
        is_explicit: bool,
        source: &SourceAttribution,
    ) -> Result<UpsertOutcome> {
        let normalized = text::normalize(memory_text);
        let normalized = text::truncate_chars(&normalized, TEXT_MAX_CHARS).to_string();
        if normalized.is_empty() {
            return Err(StoreError::InvalidInput("memory text empty after normalization".into()).into());
        }

        let fingerprint = Self::fingerprint(&normalized);
        let now = self.next_timestamp();
        let conn = self.lock_connection()?;

        let existing = Self::find_duplicate(&conn, &fingerprint, &normalized)?;

        if let Some(existing) = existing {
            let merged_text =
                merge::choose_preferred(&existing.text, &normalized).to_string();
            let merged_fingerprint = Self::fingerprint(&merged_text);
            let merged_confidence = existing.confidence.max(confidence);
            let merged_explicit = existing.is_explicit || is_explicit;

            conn.execute(
                "UPDATE user_memories
                 SET text = ?1, fingerprint = ?2, confidence = ?3, is_explicit = ?4,
                     status = 'created', updated_at = ?5
                 WHERE id = ?6",
                params![
                    merged_text,
                    merged_fingerprint,
                    merged_confidence,
                    merged_explicit,
                    now,
                    existing.id
                ],
            )?;
            Self::append_source(&conn, &existing.id, source, now)?;
            tracing::debug!(memory_id = %existing.id, "merged duplicate memory");

            let record = MemoryRecord {
                text: merged_text,
                fingerprint: merged_fingerprint,
                confidence: merged_confidence,
                is_explicit: merged_explicit,
                status: MemoryStatus::Created,
                updated_at: now,
                ..existing
            };
            return Ok(UpsertOutcome {
                record,
                created: false,
                updated: true,
            });
        }

        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO user_memories
                 (id, text, fingerprint, confidence, is_explicit, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'created', ?6, ?6)",
            params![id, normalized, fingerprint, confidence, is_explicit, now],
        )?;
        Self::append_source(&conn, &id, source, now)?;
        tracing::debug!(memory_id = %id, "created memory");

        Ok(UpsertOutcome {
            record: MemoryRecord {
                id,
                text: normalized,
                fingerprint,
                confidence,
                is_explicit,
                status: MemoryStatus::Created,
                created_at: now,
                updated_at: now,
                last_used_at: None,
            },
            created: true,
            updated: false,
        })
    }

    fn find_duplicate(
        conn: &Connection,
        fingerprint: &str,
        normalized: &str,
    ) -> Result<Option<MemoryRecord>> {
        let exact = conn
            .query_row(
                &format!(
                    "SELECT {} FROM user_memories
                     WHERE fingerprint = ?1 AND status != 'deleted'
                     LIMIT 1",
                    Self::RECORD_COLUMNS
                ),
                params![fingerprint],
                Self::map_record_row,
            )
            .optional()?;
        if exact.is_some() {
            return Ok(exact);
        }

        let incoming_key = text::semantic_key(normalized);
        let mut statement = conn.prepare(&format!(
            "SELECT {} FROM user_memories
             WHERE status != 'deleted'
             ORDER BY updated_at DESC
             LIMIT {}",
            Self::RECORD_COLUMNS,
            RECENT_SCAN_LIMIT
        ))?;
        let candidates = statement.query_map([], Self::map_record_row)?;

        let mut best: Option<(f64, MemoryRecord)> = None;
        for candidate in candidates {
            let candidate = candidate?;
            let score = similarity::similarity(&incoming_key, &text::semantic_key(&candidate.text));
            if score >= similarity::SIMILARITY_THRESHOLD
                && best.as_ref().is_none_or(|(top, _)| score > *top)
            {
                best = Some((score, candidate));
            }
        }
        if let Some((score, record)) = best {
            tracing::debug!(memory_id = %record.id, score, "near-duplicate match");
            return Ok(Some(record));
        }
        Ok(None)
    }

    fn append_source(
        conn: &Connection,
        memory_id: &str,
        source: &SourceAttribution,
        now: i64,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO user_memory_sources
                 (id, memory_id, session_id, message_id, role, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
            params![
                Uuid::new_v4().to_string(),
                memory_id,
                source.session_id,
                source.message_id,
                Self::role_to_str(source.role),
                now
            ],
        )?;
        Ok(())
    }

    // ── CRUD / listing ───────────────────────────────────────────────────

    pub fn list_memories(&self, filter: &MemoryFilter) -> Result<Vec<MemoryRecord>> {
        let conn = self.lock_connection()?;
        let mut sql = format!(
            "SELECT {} FROM user_memories WHERE 1=1",
            Self::RECORD_COLUMNS
        );
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(Self::status_to_str(status).to_string()));
        }
        if let Some(is_explicit) = filter.is_explicit {
            sql.push_str(" AND is_explicit = ?");
            params.push(Box::new(is_explicit));
        }
        sql.push_str(" ORDER BY updated_at DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut statement = conn.prepare(&sql)?;
        let rows = statement.query_map(
            rusqlite::params_from_iter(params.iter().map(AsRef::as_ref)),
            Self::map_record_row,
        )?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn get_memory(&self, id: &str) -> Result<Option<MemoryRecord>> {
        let conn = self.lock_connection()?;
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM user_memories WHERE id = ?1",
                    Self::RECORD_COLUMNS
                ),
                params![id],
                Self::map_record_row,
            )
            .optional()?)
    }

    /// Patch a memory in place. The one caller-facing input error in this
    /// store: a text patch that is empty after trimming.
    pub fn update_memory(&self, id: &str, patch: &MemoryPatch) -> Result<Option<MemoryRecord>> {
        let now = self.next_timestamp();
        let conn = self.lock_connection()?;

        let mut set_clauses = vec!["updated_at = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(now)];

        if let Some(new_text) = &patch.text {
            let normalized = text::normalize(new_text);
            if normalized.is_empty() {
                return Err(StoreError::InvalidInput("memory text empty after trimming".into()).into());
            }
            let truncated = text::truncate_chars(&normalized, TEXT_MAX_CHARS).to_string();
            set_clauses.push("fingerprint = ?".to_string());
            params.push(Box::new(Self::fingerprint(&truncated)));
            set_clauses.push("text = ?".to_string());
            params.push(Box::new(truncated));
        }
        if let Some(confidence) = patch.confidence {
            set_clauses.push("confidence = ?".to_string());
            params.push(Box::new(confidence.clamp(0.0, 1.0)));
        }
        if let Some(status) = patch.status {
            set_clauses.push("status = ?".to_string());
            params.push(Box::new(Self::status_to_str(status).to_string()));
        }
        if let Some(is_explicit) = patch.is_explicit {
            set_clauses.push("is_explicit = ?".to_string());
            params.push(Box::new(is_explicit));
        }

        params.push(Box::new(id.to_string()));
        let sql = format!(
            "UPDATE user_memories SET {} WHERE id = ?",
            set_clauses.join(", ")
        );
        let changed = conn.execute(
            &sql,
            rusqlite::params_from_iter(params.iter().map(AsRef::as_ref)),
        )?;
        if changed == 0 {
            return Ok(None);
        }

        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM user_memories WHERE id = ?1",
                    Self::RECORD_COLUMNS
                ),
                params![id],
                Self::map_record_row,
            )
            .optional()?)
    }

    /// Soft-delete: terminal status flip plus source deactivation.
    pub fn delete_memory(&self, id: &str) -> Result<bool> {
        let now = self.next_timestamp();
        let conn = self.lock_connection()?;
        let changed = conn.execute(
            "UPDATE user_memories SET status = 'deleted', updated_at = ?1
             WHERE id = ?2 AND status != 'deleted'",
            params![now, id],
        )?;
        if changed > 0 {
            conn.execute(
                "UPDATE user_memory_sources SET is_active = 0 WHERE memory_id = ?1",
                params![id],
            )?;
            tracing::debug!(memory_id = %id, "deleted memory");
        }
        Ok(changed > 0)
    }

    /// Add a provenance row to an existing memory.
    pub fn attach_source(&self, memory_id: &str, source: &SourceAttribution) -> Result<()> {
        let now = self.next_timestamp();
        let conn = self.lock_connection()?;
        Self::append_source(&conn, memory_id, source, now)
    }

    pub fn sources_for(&self, memory_id: &str) -> Result<Vec<MemorySourceRow>> {
        let conn = self.lock_connection()?;
        let mut statement = conn.prepare(
            "SELECT id, memory_id, session_id, message_id, role, is_active, created_at
             FROM user_memory_sources WHERE memory_id = ?1 ORDER BY created_at",
        )?;
        let rows = statement.query_map(params![memory_id], Self::map_source_row)?;
        let mut sources = Vec::new();
        for row in rows {
            // A corrupted provenance row is dropped, not fatal.
            match row {
                Ok(source) => sources.push(source),
                Err(error) => tracing::warn!(%memory_id, "skipping malformed source row: {error}"),
            }
        }
        Ok(sources)
    }

    /// Record that a memory was consumed by a later turn. Called by the
    /// recall side, which lives outside this crate.
    pub fn mark_used(&self, id: &str) -> Result<bool> {
        let now = self.next_timestamp();
        let conn = self.lock_connection()?;
        let changed = conn.execute(
            "UPDATE user_memories SET last_used_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(changed > 0)
    }

    // ── Delete-candidate resolution ──────────────────────────────────────

    /// Resolve a free-text delete candidate against stored memories and
    /// soft-delete the single best match. Returns the deleted record's id.
    ///
    /// The fragment must be meaningful (≥2 tokens, or ≥4 chars for
    /// unsegmented CJK, ≥6 otherwise) or nothing is deleted.
    pub fn resolve_delete_candidate(&self, fragment: &str) -> Result<Option<String>> {
        let fragment_key = text::match_key(fragment);
        if !Self::is_meaningful_fragment(&fragment_key) {
            return Ok(None);
        }

        let candidates = self.list_memories(&MemoryFilter::default())?;
        let mut best: Option<(u64, String)> = None;
        for record in candidates
            .iter()
            .filter(|record| record.status != MemoryStatus::Deleted)
        {
            let score = Self::delete_match_score(&fragment_key, &text::match_key(&record.text));
            if score > 0 && best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, record.id.clone()));
            }
        }

        match best {
            Some((_, id)) => {
                self.delete_memory(&id)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    fn is_meaningful_fragment(fragment_key: &str) -> bool {
        let tokens = fragment_key.split_whitespace().count();
        let chars = fragment_key.chars().filter(|ch| !ch.is_whitespace()).count();
        if tokens >= 2 {
            return true;
        }
        if text::contains_cjk(fragment_key) {
            chars >= 4
        } else {
            chars >= 6
        }
    }

    /// Exact key equality scores 1000+len; a bounded substring (token
    /// boundaries, or raw containment for unsegmented CJK) scores
    /// 100+len; anything else 0.
    fn delete_match_score(fragment_key: &str, record_key: &str) -> u64 {
        if fragment_key.is_empty() || record_key.is_empty() {
            return 0;
        }
        let fragment_len = fragment_key.chars().count() as u64;
        if fragment_key == record_key {
            return 1000 + fragment_len;
        }

        let token_bounded = format!(" {record_key} ").contains(&format!(" {fragment_key} "));
        let unsegmented_cjk =
            !fragment_key.contains(' ') && text::contains_cjk(fragment_key);
        if token_bounded || (unsegmented_cjk && record_key.contains(fragment_key)) {
            let record_len = record_key.chars().count() as u64;
            return 100 + fragment_len.min(record_len);
        }
        0
    }

    // ── Lifecycle maintenance ────────────────────────────────────────────

    /// Implicit records with no active provenance left go `stale`.
    pub fn mark_orphaned_implicit_stale(&self) -> Result<usize> {
        let now = self.next_timestamp();
        let conn = self.lock_connection()?;
        let changed = conn.execute(
            "UPDATE user_memories SET status = 'stale', updated_at = ?1
             WHERE is_explicit = 0 AND status = 'created'
               AND id NOT IN (
                   SELECT memory_id FROM user_memory_sources WHERE is_active = 1
               )",
            params![now],
        )?;
        if changed > 0 {
            tracing::info!(count = changed, "marked orphaned implicit memories stale");
        }
        Ok(changed)
    }

    /// Deactivate all provenance rows for a session (e.g. on session
    /// deletion), then sweep for newly orphaned implicit memories.
    pub fn deactivate_sources_for_session(&self, session_id: &str) -> Result<usize> {
        let deactivated = {
            let conn = self.lock_connection()?;
            conn.execute(
                "UPDATE user_memory_sources SET is_active = 0 WHERE session_id = ?1",
                params![session_id],
            )?
        };
        if deactivated > 0 {
            self.mark_orphaned_implicit_stale()?;
        }
        Ok(deactivated)
    }

    /// Safety net for records that slipped through earlier heuristics:
    /// delete anything created that reads like assistant phrasing, shell
    /// commands, or a question.
    pub fn purge_non_personal(&self) -> Result<usize> {
        let created = self.list_memories(&MemoryFilter {
            status: Some(MemoryStatus::Created),
            ..MemoryFilter::default()
        })?;

        let mut purged = 0;
        for record in created {
            let suspect = text::signals::is_assistant_voice(&record.text)
                || text::signals::SignalCategory::Procedural.matches(&record.text)
                || text::is_question_like(&record.text);
            if suspect && self.delete_memory(&record.id)? {
                purged += 1;
            }
        }
        if purged > 0 {
            tracing::info!(count = purged, "purged non-personal memories");
        }
        Ok(purged)
    }

    pub fn memory_stats(&self) -> Result<MemoryStats> {
        let conn = self.lock_connection()?;
        let mut statement = conn.prepare(
            "SELECT status, is_explicit, COUNT(*) FROM user_memories
             GROUP BY status, is_explicit",
        )?;
        let rows = statement.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut stats = MemoryStats::default();
        for row in rows {
            let (status, is_explicit, count) = row?;
            #[allow(clippy::cast_sign_loss)]
            let count = count.max(0) as u64;
            stats.total += count;
            if is_explicit {
                stats.explicit += count;
            } else {
                stats.implicit += count;
            }
            match status.as_str() {
                "created" => stats.created += count,
                "stale" => stats.stale += count,
                "deleted" => stats.deleted += count,
                _ => {}
            }
        }
        Ok(stats)
    }
}
