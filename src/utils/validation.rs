//! URL and input validation utilities

use url::Url;

use crate::core::models::{AppError, AppResult};

/// Validate a user-entered download URL.
pub fn validate_url(url: &str) -> AppResult<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(AppError::Precondition("no URL entered".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::Precondition(format!("invalid URL {:?}: {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::Precondition(format!(
            "unsupported URL scheme {:?}",
            other
        ))),
    }
}

/// Whether a string looks like a downloadable media URL.
pub fn is_valid_media_url(url: &str) -> bool {
    validate_url(url).is_ok()
}
