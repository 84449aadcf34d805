use serde_json::Value;
use thiserror::Error;

use crate::api::models::SearchResponse;

/// Shown when a failure response carries no structured message.
pub const GENERIC_SEARCH_ERROR: &str = "Erreur lors de la recherche";

/// Everything a submission can fail with. The `Display` text of each
/// variant is exactly what the error banner shows; nothing else
/// distinguishes them in the UI.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-success status; the message comes from the body's `error` field
    /// or the generic fallback.
    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    InvalidBody(#[from] serde_json::Error),
}

/// The page's network step: one form-encoded POST to `/search`.
///
/// No timeout beyond the transport's own, no retry, no cancellation.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, email: &str) -> Result<SearchResponse, SearchError> {
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .form(&[("email", email)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let parsed: Value = serde_json::from_slice(&body)?;
            let message = parsed
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| GENERIC_SEARCH_ERROR.to_string());
            return Err(SearchError::Api { status, message });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_its_message_only() {
        let err = SearchError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Email requis".to_string(),
        };
        assert_eq!(err.to_string(), "Email requis");
    }
}
