use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::TranslationSettings;
use crate::core::error::{EngineError, ScrapeError};
use crate::core::traits::{DictionaryEntry, TranslationEngine, WebTranslateCapability};
use crate::core::types::EngineId;

const SOURCE_LANGUAGE: &str = "auto";
const DICTIONARY_INDENT: &str = "    ";

/// Google web-translate adapter on top of an opaque scrape capability.
pub struct GoogleEngine {
    scraper: Arc<dyn WebTranslateCapability>,
    host: String,
    word_details: bool,
    timeout: Duration,
}

impl GoogleEngine {
    pub fn new(scraper: Arc<dyn WebTranslateCapability>, settings: &TranslationSettings) -> Self {
        Self {
            scraper,
            host: settings.google_host.clone(),
            word_details: settings.google_word_details,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TranslationEngine for GoogleEngine {
    fn id(&self) -> EngineId {
        EngineId::Google
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, EngineError> {
        let target = google_target(target_language);
        let scrape = self
            .scraper
            .scrape(&self.host, text, SOURCE_LANGUAGE, target);

        let scraped = tokio::time::timeout(self.timeout, scrape)
            .await
            .map_err(|_| {
                EngineError::network(
                    EngineId::Google,
                    format!("scrape timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(map_scrape_error)?;

        if self.word_details && is_single_word(text) && !scraped.dictionary.is_empty() {
            return Ok(render_dictionary(&scraped.dictionary));
        }

        scraped
            .segments
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::protocol(EngineId::Google, "scrape returned no segments"))
    }
}

/// Google's endpoint uses region-style Chinese codes. An empty target means
/// the default `zh-Hans`.
pub(crate) fn google_target(target_language: &str) -> &str {
    match target_language.trim() {
        "" | "zh-Hans" | "zh-hans" | "zh" => "zh-CN",
        "zh-Hant" | "zh-hant" => "zh-TW",
        other => other,
    }
}

fn map_scrape_error(error: ScrapeError) -> EngineError {
    match error {
        ScrapeError::Transport(message) => EngineError::network(EngineId::Google, message),
        ScrapeError::Status { status_code } => EngineError::status(
            EngineId::Google,
            status_code,
            "scrape endpoint rejected the request",
        ),
        ScrapeError::Shape(message) => EngineError::protocol(EngineId::Google, message),
    }
}

fn is_single_word(text: &str) -> bool {
    text.split_whitespace().count() == 1
}

/// One block per word class, each term indented on its own line.
pub(crate) fn render_dictionary(entries: &[DictionaryEntry]) -> String {
    let mut blocks = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut block = entry.word_class.clone();
        for term in &entry.terms {
            block.push('\n');
            block.push_str(DICTIONARY_INDENT);
            block.push_str(&term.term);
            block.push_str(" [");
            block.push_str(&term.back_translations.join(", "));
            block.push(']');
        }
        blocks.push(block);
    }

    blocks.join("\n\n")
}
