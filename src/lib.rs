#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod error;
pub mod extract;
pub mod judge;
pub mod orchestrator;
pub mod provider;
pub mod store;
pub mod text;

pub use config::{GuardLevel, MemoryConfig};
pub use error::{EngramError, Result};
pub use extract::{ExtractedChange, MemoryAction};
pub use judge::{ConfidenceJudge, JudgeResult, JudgeSource};
pub use orchestrator::{MemoryOrchestrator, TurnRequest, TurnStats};
pub use provider::{CompletionProvider, CompletionRequest};
pub use store::{
    MemoryFilter, MemoryPatch, MemoryRecord, MemoryStatus, MemoryStore, SourceAttribution,
    SourceRole, UpsertOutcome,
};
