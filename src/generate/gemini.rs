use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::generate::fallback::{is_missing_model, sanitize_html};

pub const FALLBACK_MESSAGE: &str = "Unable to generate template.";
pub const EMPTY_OUTPUT: &str = "No output generated.";

/// One failed upstream call, with the HTTP status when a response was
/// actually received.
#[derive(Debug)]
pub struct UpstreamFailure {
    pub status: Option<u16>,
    pub message: String,
}

/// Thin client for the Gemini generateContent API. Borrows the shared
/// `reqwest::Client`; one instance lives for a single request.
pub struct GeminiClient<'a> {
    http: &'a reqwest::Client,
    base_url: &'a str,
    api_key: &'a str,
}

impl<'a> GeminiClient<'a> {
    pub fn new(http: &'a reqwest::Client, base_url: &'a str, api_key: &'a str) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn build_request_body(prompt_text: &str) -> Value {
        json!({
            "contents": [
                { "parts": [{ "text": prompt_text }] }
            ]
        })
    }

    /// Issue one generateContent call against a single model. Returns the raw
    /// generated text, substituting a placeholder when the model answered
    /// with no usable part.
    pub async fn generate(&self, model: &str, prompt_text: &str) -> Result<String, UpstreamFailure> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(&Self::build_request_body(prompt_text))
            .send()
            .await
            .map_err(|e| UpstreamFailure {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = extract_error_message(&body)
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            return Err(UpstreamFailure {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: Value = response.json().await.map_err(|e| UpstreamFailure {
            status: None,
            message: e.to_string(),
        })?;

        debug!(model = %model, "generateContent succeeded");
        Ok(extract_text(&body).unwrap_or(EMPTY_OUTPUT).to_string())
    }
}

/// Walk the fallback chain in order, one call at a time. Stops on the first
/// success, or on the first failure that is not a missing-model signal, or on
/// the last candidate. Returns sanitized markup and the model that produced
/// it.
pub async fn generate_with_fallback(
    client: &GeminiClient<'_>,
    models: &[String],
    prompt_text: &str,
) -> Result<(String, String), ApiError> {
    for (i, candidate) in models.iter().enumerate() {
        match client.generate(candidate, prompt_text).await {
            Ok(text) => return Ok((sanitize_html(&text), candidate.clone())),
            Err(failure) => {
                let last = i + 1 == models.len();
                if is_missing_model(failure.status, &failure.message) && !last {
                    warn!(
                        model = %candidate,
                        status = ?failure.status,
                        "model unavailable, trying next candidate"
                    );
                    continue;
                }
                return Err(ApiError::Upstream {
                    status: failure.status,
                    message: failure.message,
                });
            }
        }
    }

    // The chain always carries at least one candidate.
    Err(ApiError::Upstream {
        status: None,
        message: FALLBACK_MESSAGE.into(),
    })
}

/// First candidate's first content part, per the generateContent response
/// shape. Empty text counts as missing.
fn extract_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .filter(|t| !t.is_empty())
}

fn extract_error_message(body: &Value) -> Option<&str> {
    body.get("error")?.get("message")?.as_str()
}
