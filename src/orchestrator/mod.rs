use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::core::error::TranslateError;
use crate::core::traits::TranslationEngine;
use crate::core::types::{
    AggregateFailure, AttemptOutcome, EngineAttempt, EngineOrder, Translation,
};
use crate::registry::EngineRegistry;

/// Cloneable cancellation flag, checked before each engine attempt.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Walks an [`EngineOrder`] one engine at a time and stops at the first
/// success.
pub struct EngineOrchestrator {
    registry: EngineRegistry,
}

pub struct EngineOrchestratorBuilder {
    engines: Vec<Arc<dyn TranslationEngine>>,
}

impl EngineOrchestrator {
    pub fn builder() -> EngineOrchestratorBuilder {
        EngineOrchestratorBuilder {
            engines: Vec::new(),
        }
    }

    pub async fn translate(
        &self,
        text: &str,
        order: &EngineOrder,
        target_language: &str,
        cancel: Option<&CancelHandle>,
    ) -> Result<Translation, TranslateError> {
        let mut attempts = Vec::new();

        for identifier in order.iter() {
            let Some(engine) = self.registry.resolve(identifier) else {
                debug!(engine = identifier, "skipping unknown engine");
                continue;
            };

            if cancel.is_some_and(CancelHandle::is_cancelled) {
                debug!(attempts = attempts.len(), "translation chain cancelled");
                return Err(TranslateError::Cancelled(AggregateFailure { attempts }));
            }

            let engine_id = engine.id();
            debug!(engine = %engine_id, "attempting translation");

            match engine.translate(text, target_language).await {
                Ok(translated) => {
                    info!(engine = %engine_id, "translation succeeded");
                    return Ok(Translation {
                        text: translated,
                        engine: Some(engine_id),
                        attempts,
                    });
                }
                Err(error) => {
                    warn!(engine = %engine_id, error = %error, "translation engine failed");
                    attempts.push(EngineAttempt {
                        engine: engine_id,
                        outcome: AttemptOutcome::Failure(error),
                    });
                }
            }
        }

        if attempts.is_empty() {
            return Err(TranslateError::NoEngineAvailable {
                order: order.clone(),
            });
        }

        Err(TranslateError::AllEnginesFailed(AggregateFailure { attempts }))
    }
}

impl EngineOrchestratorBuilder {
    pub fn with_engine(mut self, engine: Arc<dyn TranslationEngine>) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn build(self) -> EngineOrchestrator {
        let mut registry = EngineRegistry::new();
        for engine in self.engines {
            registry.register(engine);
        }

        EngineOrchestrator { registry }
    }
}
