use serde_json::Value;
use tracing::debug;

use crate::engines::shape_contract::ResponseShape;

/// `{"result": "..."}`
pub struct ResultField;

/// `{"data": "..."}`
pub struct DataField;

/// `{"translations": [{"text": "..."}, ...]}`, first entry wins.
pub struct TranslationsList;

impl ResponseShape for ResultField {
    fn name(&self) -> &'static str {
        "result"
    }

    fn extract(&self, body: &Value) -> Option<String> {
        body.get("result").and_then(scalar_text)
    }
}

impl ResponseShape for DataField {
    fn name(&self) -> &'static str {
        "data"
    }

    fn extract(&self, body: &Value) -> Option<String> {
        body.get("data").and_then(scalar_text)
    }
}

impl ResponseShape for TranslationsList {
    fn name(&self) -> &'static str {
        "translations[0].text"
    }

    fn extract(&self, body: &Value) -> Option<String> {
        body.get("translations")
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("text"))
            .and_then(scalar_text)
    }
}

/// Lenient decoder for custom endpoint bodies.
///
/// Tries each registered shape in order and falls back to the raw body, so an
/// unrecognized layout never fails a translation on its own.
pub struct ShapeMatcher {
    shapes: Vec<Box<dyn ResponseShape>>,
}

impl ShapeMatcher {
    /// `result`, then `data`, then `translations[0].text`.
    pub fn standard() -> Self {
        Self {
            shapes: vec![
                Box::new(ResultField),
                Box::new(DataField),
                Box::new(TranslationsList),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Appends a shape; it is tried after the ones already registered.
    pub fn with_shape(mut self, shape: impl ResponseShape + 'static) -> Self {
        self.shapes.push(Box::new(shape));
        self
    }

    pub fn shape_names(&self) -> Vec<&'static str> {
        self.shapes.iter().map(|shape| shape.name()).collect()
    }

    pub fn extract(&self, raw_body: &str) -> String {
        let Ok(body) = serde_json::from_str::<Value>(raw_body) else {
            debug!("custom response is not JSON, returning raw body");
            return raw_body.to_string();
        };

        for shape in &self.shapes {
            if let Some(text) = shape.extract(&body) {
                debug!(shape = shape.name(), "custom response shape matched");
                return text;
            }
        }

        debug!("no custom response shape matched, returning raw body");
        raw_body.to_string()
    }
}

impl Default for ShapeMatcher {
    fn default() -> Self {
        Self::standard()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
