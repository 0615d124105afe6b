use thiserror::Error;

use crate::core::types::{AggregateFailure, EngineId, EngineOrder};

/// Failure raised while loading settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse config: {message}")]
    Parse { message: String },
    #[error("invalid timeout: {timeout_secs} s")]
    InvalidTimeout { timeout_secs: u64 },
}

impl From<::config::ConfigError> for ConfigError {
    fn from(error: ::config::ConfigError) -> Self {
        Self::Parse {
            message: error.to_string(),
        }
    }
}

/// Failure of a single engine. The orchestrator records it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(
        "engine config error{context}: {message}",
        context = format_context(*.engine, None)
    )]
    Config { engine: EngineId, message: String },
    #[error(
        "engine network error{context}: {message}",
        context = format_context(*.engine, None)
    )]
    Network { engine: EngineId, message: String },
    #[error(
        "engine protocol error{context}: {message}",
        context = format_context(*.engine, *.status_code)
    )]
    Protocol {
        engine: EngineId,
        status_code: Option<u16>,
        message: String,
    },
}

impl EngineError {
    pub fn engine(&self) -> EngineId {
        match self {
            Self::Config { engine, .. }
            | Self::Network { engine, .. }
            | Self::Protocol { engine, .. } => *engine,
        }
    }

    pub fn config(engine: EngineId, message: impl Into<String>) -> Self {
        Self::Config {
            engine,
            message: message.into(),
        }
    }

    pub fn network(engine: EngineId, message: impl Into<String>) -> Self {
        Self::Network {
            engine,
            message: message.into(),
        }
    }

    pub fn protocol(engine: EngineId, message: impl Into<String>) -> Self {
        Self::Protocol {
            engine,
            status_code: None,
            message: message.into(),
        }
    }

    pub fn status(engine: EngineId, status_code: u16, message: impl Into<String>) -> Self {
        Self::Protocol {
            engine,
            status_code: Some(status_code),
            message: message.into(),
        }
    }
}

/// Failure of the opaque web-scrape capability behind the Google engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("scrape transport failed: {0}")]
    Transport(String),
    #[error("scrape returned status {status_code}")]
    Status { status_code: u16 },
    #[error("unexpected scrape response: {0}")]
    Shape(String),
}

/// Failure of a whole translation chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("all engines failed: {0}")]
    AllEnginesFailed(AggregateFailure),
    #[error("no registered engine in order [{order}]")]
    NoEngineAvailable { order: EngineOrder },
    #[error("translation cancelled after {} attempt(s)", .0.attempts.len())]
    Cancelled(AggregateFailure),
}

impl TranslateError {
    /// Attempts made before the chain gave up.
    pub fn attempts(&self) -> &[crate::core::types::EngineAttempt] {
        match self {
            Self::AllEnginesFailed(failure) | Self::Cancelled(failure) => &failure.attempts,
            Self::NoEngineAvailable { .. } => &[],
        }
    }

    /// Single-line description used by the legacy string mode.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::AllEnginesFailed(failure) => failure.describe_last(),
            other => other.to_string(),
        }
    }
}

fn format_context(engine: EngineId, status_code: Option<u16>) -> String {
    let mut context = vec![format!("engine={engine}")];

    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    format!(" [{}]", context.join(", "))
}
