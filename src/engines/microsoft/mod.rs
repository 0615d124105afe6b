use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::TranslationSettings;
use crate::core::error::EngineError;
use crate::core::traits::TranslationEngine;
use crate::core::types::{DEFAULT_TARGET_LANGUAGE, EngineId};
use crate::engines::body_excerpt;
use crate::transport::http::{HttpClient, HttpRequest};

pub const MICROSOFT_TRANSLATE_URL: &str = "https://api.cognitive.microsofttranslator.com/translate";
const MICROSOFT_API_VERSION: &str = "3.0";

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";
const TRACE_ID_HEADER: &str = "X-ClientTraceId";

#[derive(Debug, Deserialize)]
struct TranslateItem {
    #[serde(default)]
    translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    text: String,
}

/// Key-authenticated Microsoft Translator REST API (v3).
pub struct MicrosoftEngine {
    http: Arc<dyn HttpClient>,
    endpoint: String,
    api_key: Option<String>,
    region: String,
}

impl MicrosoftEngine {
    pub fn new(http: Arc<dyn HttpClient>, settings: &TranslationSettings) -> Self {
        Self::with_endpoint(http, settings, MICROSOFT_TRANSLATE_URL)
    }

    pub fn with_endpoint(
        http: Arc<dyn HttpClient>,
        settings: &TranslationSettings,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: settings.microsoft_key.clone(),
            region: settings.microsoft_region.clone(),
        }
    }

    fn build_request(&self, api_key: &str, text: &str, target_language: &str) -> HttpRequest {
        let target = if target_language.is_empty() {
            DEFAULT_TARGET_LANGUAGE
        } else {
            target_language
        };

        HttpRequest::post_json(&self.endpoint, json!([{ "text": text }]))
            .with_query("api-version", MICROSOFT_API_VERSION)
            .with_query("to", target)
            .with_header(SUBSCRIPTION_KEY_HEADER, api_key)
            .with_header(SUBSCRIPTION_REGION_HEADER, &self.region)
            .with_header(TRACE_ID_HEADER, Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl TranslationEngine for MicrosoftEngine {
    fn id(&self) -> EngineId {
        EngineId::Microsoft
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, EngineError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            EngineError::config(EngineId::Microsoft, "translation.microsoft_key is not set")
        })?;

        let response = self
            .http
            .send(self.build_request(api_key, text, target_language))
            .await
            .map_err(|error| error.into_engine_error(EngineId::Microsoft))?;

        if !response.is_success() {
            return Err(EngineError::status(
                EngineId::Microsoft,
                response.status_code,
                body_excerpt(&response.body),
            ));
        }

        let items: Vec<TranslateItem> = serde_json::from_str(&response.body).map_err(|error| {
            EngineError::protocol(
                EngineId::Microsoft,
                format!("unexpected response body: {error}"),
            )
        })?;

        items
            .into_iter()
            .next()
            .and_then(|item| item.translations.into_iter().next())
            .map(|entry| entry.text)
            .ok_or_else(|| {
                EngineError::protocol(EngineId::Microsoft, "response has no translations[0].text")
            })
    }
}
