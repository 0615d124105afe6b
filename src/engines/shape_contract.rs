use serde_json::Value;

/// One recognizable response layout of an operator-defined endpoint.
///
/// Shapes are consulted in order by
/// [`ShapeMatcher`](crate::engines::custom_shapes::ShapeMatcher); the first
/// one that yields text wins. New layouts plug in here without touching the
/// custom engine or the orchestrator.
pub trait ResponseShape: Send + Sync {
    /// Short name used in debug logs.
    fn name(&self) -> &'static str;

    /// Returns the translated text when `body` has this shape.
    fn extract(&self, body: &Value) -> Option<String>;
}
