use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::core::error::{ConfigError, TranslateError};
use crate::core::types::{DEFAULT_TARGET_LANGUAGE, EngineOrder, Translation};
use crate::engines::custom::CustomEngine;
use crate::engines::google::GoogleEngine;
use crate::engines::google_scrape::GtxScraper;
use crate::engines::microsoft::MicrosoftEngine;
use crate::orchestrator::{CancelHandle, EngineOrchestrator};
use crate::transport::http::{HttpClient, ReqwestTransport};

/// Public entry point: input validation plus the configured engine order.
pub struct TranslationFacade {
    orchestrator: EngineOrchestrator,
    order: EngineOrder,
}

impl TranslationFacade {
    /// Loads `CONFIG.ini` from the working directory and builds every engine.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_settings(&Settings::load()?)
    }

    /// Builds the shared reqwest transport (proxy and timeout applied) and
    /// registers all three engines on it.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(
            settings.translation.timeout_secs,
            settings.network.proxy.as_ref(),
        )?;

        Ok(Self::with_http_client(settings, Arc::new(transport)))
    }

    /// Same engine set as [`Self::from_settings`] over a caller-supplied
    /// HTTP client.
    pub fn with_http_client(settings: &Settings, http: Arc<dyn HttpClient>) -> Self {
        let translation = &settings.translation;
        let scraper = Arc::new(GtxScraper::new(Arc::clone(&http)));
        let microsoft = MicrosoftEngine::new(Arc::clone(&http), translation);

        let orchestrator = EngineOrchestrator::builder()
            .with_engine(Arc::new(GoogleEngine::new(scraper, translation)))
            .with_engine(Arc::new(microsoft))
            .with_engine(Arc::new(CustomEngine::new(http, translation)))
            .build();

        Self::with_orchestrator(orchestrator, translation.engine_order.clone())
    }

    pub fn with_orchestrator(orchestrator: EngineOrchestrator, order: EngineOrder) -> Self {
        Self {
            orchestrator,
            order,
        }
    }

    /// Translates `text`, trying engines in the configured order.
    ///
    /// Surrounding whitespace is stripped before any engine sees the text.
    /// Empty or whitespace-only input returns an empty [`Translation`]
    /// without touching any engine.
    pub async fn get_translation(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Translation, TranslateError> {
        self.translate_inner(text, target_language, None).await
    }

    /// [`Self::get_translation`] with a cancellation handle honored between
    /// engine attempts.
    pub async fn get_translation_with_cancel(
        &self,
        text: &str,
        target_language: &str,
        cancel: &CancelHandle,
    ) -> Result<Translation, TranslateError> {
        self.translate_inner(text, target_language, Some(cancel)).await
    }

    /// Legacy string mode: never fails, failures become
    /// `"Translation failed: {last error}"`.
    pub async fn get_translation_text(&self, text: &str, target_language: &str) -> String {
        match self.get_translation(text, target_language).await {
            Ok(translation) => translation.text,
            Err(error) => format!("Translation failed: {}", error.diagnostic()),
        }
    }

    /// [`Self::get_translation_text`] into the default `zh-Hans` target.
    pub async fn translate_text(&self, text: &str) -> String {
        self.get_translation_text(text, DEFAULT_TARGET_LANGUAGE).await
    }

    async fn translate_inner(
        &self,
        text: &str,
        target_language: &str,
        cancel: Option<&CancelHandle>,
    ) -> Result<Translation, TranslateError> {
        let text = text.trim();
        if text.is_empty() {
            debug!("empty input, skipping translation");
            return Ok(Translation::empty());
        }

        let target = match target_language.trim() {
            "" => DEFAULT_TARGET_LANGUAGE,
            target => target,
        };

        self.orchestrator
            .translate(text, &self.order, target, cancel)
            .await
    }
}
