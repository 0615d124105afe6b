use async_trait::async_trait;

use crate::core::error::{EngineError, ScrapeError};
use crate::core::types::EngineId;

/// Adapter contract: one external backend behind a uniform
/// `translate(text) -> text` call.
///
/// Implementations must turn every problem (missing settings, transport
/// failures, unexpected bodies) into an [`EngineError`] so the orchestrator
/// can record it and continue with the next engine.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Stable engine identifier for dispatch and diagnostics.
    fn id(&self) -> EngineId;

    /// Translates `text` into `target_language`.
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, EngineError>;
}

/// Result of one scrape of the public web-translate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapedTranslation {
    /// Translated segments; the first is the primary translation.
    pub segments: Vec<String>,
    /// Dictionary data, only populated for single-word queries.
    pub dictionary: Vec<DictionaryEntry>,
}

/// Dictionary block for one word class (noun, verb, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word_class: String,
    pub terms: Vec<DictionaryTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryTerm {
    pub term: String,
    pub back_translations: Vec<String>,
}

/// Opaque web-translate capability used by the Google engine. Request
/// signing, tokens and endpoint quirks stay behind this seam.
#[async_trait]
pub trait WebTranslateCapability: Send + Sync {
    async fn scrape(
        &self,
        host: &str,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<ScrapedTranslation, ScrapeError>;
}
