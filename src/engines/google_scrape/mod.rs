use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::ScrapeError;
use crate::core::traits::{
    DictionaryEntry, DictionaryTerm, ScrapedTranslation, WebTranslateCapability,
};
use crate::transport::http::{HttpClient, HttpRequest};

const SCRAPE_PATH: &str = "/translate_a/single";
const SCRAPE_CLIENT: &str = "gtx";

/// Keyless `translate_a/single` scraper.
///
/// The `gtx` client needs no request token; the response is a positional JSON
/// array where `[0]` holds sentence pieces and `[1]` optional dictionary data.
pub struct GtxScraper {
    http: Arc<dyn HttpClient>,
}

impl GtxScraper {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    fn build_request(host: &str, text: &str, source: &str, target: &str) -> HttpRequest {
        HttpRequest::get(scrape_url(host))
            .with_query("client", SCRAPE_CLIENT)
            .with_query("ie", "UTF-8")
            .with_query("oe", "UTF-8")
            .with_query("sl", source)
            .with_query("tl", target)
            .with_query("dt", "t")
            .with_query("dt", "bd")
            .with_query("q", text)
    }
}

#[async_trait]
impl WebTranslateCapability for GtxScraper {
    async fn scrape(
        &self,
        host: &str,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<ScrapedTranslation, ScrapeError> {
        let request = Self::build_request(host, text, source_language, target_language);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|error| ScrapeError::Transport(error.to_string()))?;

        if !response.is_success() {
            return Err(ScrapeError::Status {
                status_code: response.status_code,
            });
        }

        parse_scrape_body(&response.body)
    }
}

/// Accepts a bare host or a full base URL.
fn scrape_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}{SCRAPE_PATH}")
    } else {
        format!("https://{host}{SCRAPE_PATH}")
    }
}

pub(crate) fn parse_scrape_body(body: &str) -> Result<ScrapedTranslation, ScrapeError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|error| ScrapeError::Shape(format!("body is not JSON: {error}")))?;

    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ScrapeError::Shape("missing sentence array at [0]".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(ScrapeError::Shape("no translated sentence pieces".to_string()));
    }

    Ok(ScrapedTranslation {
        segments: vec![translated],
        dictionary: parse_dictionary(value.get(1)),
    })
}

fn parse_dictionary(value: Option<&Value>) -> Vec<DictionaryEntry> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let word_class = entry.get(0)?.as_str()?.to_string();
            let terms = entry
                .get(2)
                .and_then(Value::as_array)
                .map(|terms| terms.iter().filter_map(parse_term).collect())
                .unwrap_or_default();

            Some(DictionaryEntry { word_class, terms })
        })
        .collect()
}

fn parse_term(value: &Value) -> Option<DictionaryTerm> {
    let term = value.get(0)?.as_str()?.to_string();
    let back_translations = value
        .get(1)
        .and_then(Value::as_array)
        .map(|words| {
            words
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(DictionaryTerm {
        term,
        back_translations,
    })
}
