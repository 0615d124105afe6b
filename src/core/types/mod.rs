use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;

/// Target language used when the caller does not pick one.
pub const DEFAULT_TARGET_LANGUAGE: &str = "zh-Hans";

/// Engine tried when the configured order is empty.
pub const DEFAULT_ENGINE: &str = "google";

/// Closed set of translation backends the crate knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineId {
    Google,
    Microsoft,
    Custom,
}

impl EngineId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
            Self::Custom => "custom",
        }
    }

    /// Maps a configured identifier to an engine. Case and surrounding
    /// whitespace are ignored; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Some(Self::Google),
            "microsoft" => Some(Self::Microsoft),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-configured priority sequence of engine identifiers.
///
/// Entries are kept as normalized strings rather than [`EngineId`] so that
/// identifiers this build does not know survive parsing and are skipped at
/// dispatch time instead of rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOrder {
    entries: Vec<String>,
}

impl EngineOrder {
    /// Splits a comma-separated value, trimming and lower-casing each token.
    /// Blank tokens are dropped; an order with no tokens left is `["google"]`.
    pub fn parse(raw: &str) -> Self {
        let entries: Vec<String> = raw
            .split(',')
            .map(|token| token.trim().to_ascii_lowercase())
            .filter(|token| !token.is_empty())
            .collect();

        if entries.is_empty() {
            return Self::default();
        }

        Self { entries }
    }

    pub fn from_engines(engines: &[EngineId]) -> Self {
        if engines.is_empty() {
            return Self::default();
        }

        Self {
            entries: engines.iter().map(|id| id.as_str().to_string()).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EngineOrder {
    fn default() -> Self {
        Self {
            entries: vec![DEFAULT_ENGINE.to_string()],
        }
    }
}

impl fmt::Display for EngineOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join(","))
    }
}

/// Outbound proxy shared by every backend. Either fully present or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySpec {
    pub scheme: String,
    pub host: String,
    pub port: String,
}

impl ProxySpec {
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// The same URL for both schemes; split proxies are not supported.
    pub fn slots(&self) -> ProxySlots {
        let url = self.url();
        ProxySlots {
            http: url.clone(),
            https: url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySlots {
    pub http: String,
    pub https: String,
}

/// One engine invocation made by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineAttempt {
    pub engine: EngineId,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Failure(EngineError),
}

impl EngineAttempt {
    pub fn failure(&self) -> Option<&EngineError> {
        match &self.outcome {
            AttemptOutcome::Failure(error) => Some(error),
            AttemptOutcome::Success(_) => None,
        }
    }
}

/// Successful translation plus the failed attempts that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// `None` when no engine ran (empty input).
    pub engine: Option<EngineId>,
    pub attempts: Vec<EngineAttempt>,
}

impl Translation {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            engine: None,
            attempts: Vec::new(),
        }
    }
}

/// Every engine that ran, in order, when none of them produced a translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateFailure {
    pub attempts: Vec<EngineAttempt>,
}

impl AggregateFailure {
    pub fn last_error(&self) -> Option<&EngineError> {
        self.attempts.iter().rev().find_map(EngineAttempt::failure)
    }

    /// Description of the final failure only, the legacy diagnostic.
    pub fn describe_last(&self) -> String {
        match self.last_error() {
            Some(error) => error.to_string(),
            None => "no engine was attempted".to_string(),
        }
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempt(s) failed; last: {}",
            self.attempts.len(),
            self.describe_last()
        )
    }
}
