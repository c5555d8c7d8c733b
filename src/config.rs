use serde::{Deserialize, Serialize};

/// Sensitivity tier controlling how aggressively candidate memories are
/// accepted. Thresholds are monotone: `Relaxed` ≤ `Standard` ≤ `Strict`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuardLevel {
    Strict,
    #[default]
    Standard,
    Relaxed,
}

impl std::fmt::Display for GuardLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Strict => "strict",
            Self::Standard => "standard",
            Self::Relaxed => "relaxed",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for GuardLevel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "standard" => Ok(Self::Standard),
            "relaxed" => Ok(Self::Relaxed),
            _ => anyhow::bail!("invalid guard level: {value}"),
        }
    }
}

/// Configuration for the durable-memory subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Acceptance sensitivity: "strict" | "standard" | "relaxed"
    #[serde(default)]
    pub guard_level: GuardLevel,
    /// Extract implicit (inferred) memories from conversation turns
    #[serde(default = "default_implicit_enabled")]
    pub implicit_enabled: bool,
    /// Escalate borderline judgments to the LLM
    #[serde(default)]
    pub llm_judge_enabled: bool,
    /// Max implicit adds per turn (hard-capped at 2 by the extractor)
    #[serde(default = "default_max_implicit_adds")]
    pub max_implicit_adds: usize,
    /// Model used for LLM judgment calls
    #[serde(default = "default_judge_model")]
    pub judge_model: String,
    /// Temperature for LLM judgment calls (near-deterministic)
    #[serde(default)]
    pub judge_temperature: f64,
    /// OpenAI-compatible endpoint base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            guard_level: GuardLevel::default(),
            implicit_enabled: default_implicit_enabled(),
            llm_judge_enabled: false,
            max_implicit_adds: default_max_implicit_adds(),
            judge_model: default_judge_model(),
            judge_temperature: 0.0,
            base_url: default_base_url(),
        }
    }
}

fn default_implicit_enabled() -> bool {
    true
}
fn default_max_implicit_adds() -> usize {
    2
}
fn default_judge_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
