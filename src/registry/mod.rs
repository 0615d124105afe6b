use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::traits::TranslationEngine;
use crate::core::types::EngineId;

/// Identifier -> engine lookup. An order entry that names no registered
/// engine is a lookup miss, never an error.
#[derive(Default, Clone)]
pub struct EngineRegistry {
    engines: IndexMap<EngineId, Arc<dyn TranslationEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `engine` under its own id, replacing any earlier instance.
    pub fn register(&mut self, engine: Arc<dyn TranslationEngine>) {
        self.engines.insert(engine.id(), engine);
    }

    pub fn get(&self, engine: EngineId) -> Option<Arc<dyn TranslationEngine>> {
        self.engines.get(&engine).map(Arc::clone)
    }

    /// Resolves one raw order entry.
    pub fn resolve(&self, identifier: &str) -> Option<Arc<dyn TranslationEngine>> {
        EngineId::parse(identifier).and_then(|engine| self.get(engine))
    }

    pub fn contains(&self, engine: EngineId) -> bool {
        self.engines.contains_key(&engine)
    }

    /// Registered ids in registration order.
    pub fn engine_ids(&self) -> Vec<EngineId> {
        self.engines.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
