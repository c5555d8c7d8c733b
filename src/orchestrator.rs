//! Per-turn coordination: extraction → judgment → store writes.
//!
//! One call per completed exchange. Failures on individual changes are
//! logged and counted as skips; a turn's memory work never fails the
//! conversation around it.

use crate::config::{GuardLevel, MemoryConfig};
use crate::extract::{self, MemoryAction};
use crate::judge::{ConfidenceJudge, JudgeSource};
use crate::provider::{CompletionProvider, OpenAiCompatProvider};
use crate::store::{MemoryStore, SourceAttribution, SourceRole};
use std::sync::Arc;

/// Everything the orchestrator needs to know about one exchange.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub session_id: Option<String>,
    pub user_text: String,
    pub assistant_text: String,
    pub user_message_id: Option<String>,
    pub assistant_message_id: Option<String>,
    pub guard: GuardLevel,
    pub implicit_enabled: bool,
    pub llm_judge_enabled: bool,
}

impl TurnRequest {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            session_id: None,
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            user_message_id: None,
            assistant_message_id: None,
            guard: GuardLevel::default(),
            implicit_enabled: true,
            llm_judge_enabled: false,
        }
    }
}

/// Tally of what one turn did to the memory set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnStats {
    pub total_changes: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub judge_rejected: usize,
    pub llm_reviewed: usize,
    pub skipped: usize,
}

pub struct MemoryOrchestrator {
    store: Arc<MemoryStore>,
    judge: ConfidenceJudge,
    max_implicit_adds: usize,
}

impl MemoryOrchestrator {
    pub fn new(store: Arc<MemoryStore>, judge: ConfidenceJudge, max_implicit_adds: usize) -> Self {
        Self {
            store,
            judge,
            max_implicit_adds,
        }
    }

    /// Wire up from config: provider only when the LLM judge is enabled
    /// and a key is present.
    pub fn from_config(
        store: Arc<MemoryStore>,
        config: &MemoryConfig,
        api_key: Option<&str>,
    ) -> Self {
        let provider: Option<Arc<dyn CompletionProvider>> =
            if config.llm_judge_enabled && api_key.is_some() {
                Some(Arc::new(OpenAiCompatProvider::new(
                    config.base_url.clone(),
                    api_key,
                )))
            } else {
                None
            };
        let judge = ConfidenceJudge::new(provider, config.judge_model.clone(), config.judge_temperature);
        Self::new(store, judge, config.max_implicit_adds)
    }

    /// Process one completed exchange end to end.
    pub async fn apply_turn_memory_updates(&self, turn: &TurnRequest) -> TurnStats {
        let max_implicit = if turn.implicit_enabled {
            self.max_implicit_adds
        } else {
            0
        };
        let changes = extract::extract(
            &turn.user_text,
            &turn.assistant_text,
            turn.guard,
            max_implicit,
        );

        let mut stats = TurnStats {
            total_changes: changes.len(),
            ..TurnStats::default()
        };

        for change in &changes {
            match change.action {
                MemoryAction::Delete => self.apply_delete(&change.text, &mut stats),
                MemoryAction::Add => self.apply_add(turn, change, &mut stats).await,
            }
        }

        // Provenance may have shifted under merged records; sweep every turn.
        if let Err(error) = self.store.mark_orphaned_implicit_stale() {
            tracing::warn!("stale sweep failed: {error:#}");
        }

        tracing::debug!(
            created = stats.created,
            updated = stats.updated,
            deleted = stats.deleted,
            rejected = stats.judge_rejected,
            "turn memory updates applied"
        );
        stats
    }

    fn apply_delete(&self, fragment: &str, stats: &mut TurnStats) {
        match self.store.resolve_delete_candidate(fragment) {
            Ok(Some(memory_id)) => {
                tracing::debug!(%memory_id, "resolved delete candidate");
                stats.deleted += 1;
            }
            Ok(None) => stats.skipped += 1,
            Err(error) => {
                tracing::warn!("delete resolution failed: {error:#}");
                stats.skipped += 1;
            }
        }
    }

    async fn apply_add(
        &self,
        turn: &TurnRequest,
        change: &extract::ExtractedChange,
        stats: &mut TurnStats,
    ) {
        let verdict = self
            .judge
            .judge(
                &change.text,
                change.is_explicit,
                turn.guard,
                turn.llm_judge_enabled,
            )
            .await;
        if verdict.source == JudgeSource::Llm {
            stats.llm_reviewed += 1;
        }
        if !verdict.accepted {
            tracing::debug!(reason = %verdict.reason, score = verdict.score, "add candidate rejected");
            stats.judge_rejected += 1;
            stats.skipped += 1;
            return;
        }

        let confidence = change.confidence.max(verdict.score).min(1.0);
        let source = SourceAttribution {
            session_id: turn.session_id.clone(),
            message_id: turn.user_message_id.clone(),
            role: SourceRole::User,
        };
        match self
            .store
            .create_or_revive(&change.text, confidence, change.is_explicit, &source)
        {
            Ok(outcome) => {
                if outcome.created {
                    stats.created += 1;
                } else {
                    stats.updated += 1;
                }
                // Implicit facts were inferred from the exchange, so the
                // assistant reply is provenance too.
                if !change.is_explicit && turn.assistant_message_id.is_some() {
                    let assistant_source = SourceAttribution {
                        session_id: turn.session_id.clone(),
                        message_id: turn.assistant_message_id.clone(),
                        role: SourceRole::Assistant,
                    };
                    if let Err(error) =
                        self.store
                            .attach_source(&outcome.record.id, &assistant_source)
                    {
                        tracing::warn!("source attach failed: {error:#}");
                    }
                }
            }
            Err(error) => {
                tracing::warn!("memory write failed: {error:#}");
                stats.skipped += 1;
            }
        }
    }
}
