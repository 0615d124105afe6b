use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::TranslationSettings;
use crate::core::error::EngineError;
use crate::core::traits::TranslationEngine;
use crate::core::types::{DEFAULT_TARGET_LANGUAGE, EngineId};
use crate::engines::body_excerpt;
use crate::engines::custom_shapes::ShapeMatcher;
use crate::transport::http::{HttpClient, HttpRequest};

#[derive(Debug, Serialize)]
struct CustomRequestBody<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

/// Operator-defined HTTP endpoint.
pub struct CustomEngine {
    http: Arc<dyn HttpClient>,
    api_url: Option<String>,
    api_key: Option<String>,
    source_lang: String,
    target_lang: String,
    shapes: ShapeMatcher,
}

impl CustomEngine {
    pub fn new(http: Arc<dyn HttpClient>, settings: &TranslationSettings) -> Self {
        Self {
            http,
            api_url: settings.custom_api_url.clone(),
            api_key: settings.custom_api_key.clone(),
            source_lang: settings.custom_source_lang.clone(),
            target_lang: settings.custom_target_lang.clone(),
            shapes: ShapeMatcher::standard(),
        }
    }

    pub fn with_shapes(mut self, shapes: ShapeMatcher) -> Self {
        self.shapes = shapes;
        self
    }

    /// The configured target applies unless the caller asked for something
    /// other than the default.
    fn resolve_target<'a>(&'a self, target_language: &'a str) -> &'a str {
        if target_language.is_empty() || target_language == DEFAULT_TARGET_LANGUAGE {
            &self.target_lang
        } else {
            target_language
        }
    }
}

#[async_trait]
impl TranslationEngine for CustomEngine {
    fn id(&self) -> EngineId {
        EngineId::Custom
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, EngineError> {
        let Some(api_url) = self.api_url.as_deref() else {
            return Err(EngineError::config(
                EngineId::Custom,
                "translation.custom_api_url is not set",
            ));
        };

        let body = CustomRequestBody {
            text,
            source_lang: &self.source_lang,
            target_lang: self.resolve_target(target_language),
        };
        let payload = serde_json::to_value(&body)
            .map_err(|error| EngineError::protocol(EngineId::Custom, error.to_string()))?;

        let mut request = HttpRequest::post_json(api_url, payload);
        if let Some(api_key) = &self.api_key {
            request = request.with_header("Authorization", format!("Bearer {api_key}"));
        }

        let response = self
            .http
            .send(request)
            .await
            .map_err(|error| error.into_engine_error(EngineId::Custom))?;

        if !response.is_success() {
            return Err(EngineError::status(
                EngineId::Custom,
                response.status_code,
                body_excerpt(&response.body),
            ));
        }

        Ok(self.shapes.extract(&response.body))
    }
}
