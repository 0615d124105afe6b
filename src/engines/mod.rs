pub mod custom;
pub mod custom_shapes;
pub mod google;
pub mod google_scrape;
pub mod microsoft;
pub mod shape_contract;

/// Shortens a response body for inclusion in an error message.
pub(crate) fn body_excerpt(body: &str) -> String {
    const LIMIT: usize = 200;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    match trimmed.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests;
