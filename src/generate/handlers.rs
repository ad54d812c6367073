use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    generate::{
        dto::{GenerateRequest, GenerateResponse},
        fallback::build_fallback_chain,
        gemini::{generate_with_fallback, GeminiClient},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/ai/generate", post(generate))
}

/// Wrap the user's description in the instruction that forces a bare,
/// self-contained HTML document out of the model.
fn build_system_prompt(prompt: &str) -> String {
    format!(
        "You are an expert UI generator. Output ONLY valid HTML and CSS inside \
         <html>...</html>. No markdown. No backticks. No explanations. \
         Generate a fully responsive template for: {}",
        prompt.trim()
    )
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if payload.prompt.trim().is_empty() {
        return Err(ApiError::Validation("Prompt is required.".into()));
    }

    let gemini = &state.config.gemini;
    let api_key = gemini
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ApiError::Configuration("Gemini API key is not configured.".into())
        })?;

    let chain = build_fallback_chain(&gemini.model);
    let system_prompt = build_system_prompt(&payload.prompt);

    let client = GeminiClient::new(&state.http, &gemini.base_url, api_key);
    let (html, model_used) = generate_with_fallback(&client, &chain, &system_prompt).await?;

    info!(user_id = %user_id, model = %model_used, "template generated");
    Ok(Json(GenerateResponse { html, model_used }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn system_prompt_embeds_trimmed_user_prompt() {
        let p = build_system_prompt("  a coffee shop landing page  ");
        assert!(p.ends_with("template for: a coffee shop landing page"));
        assert!(p.contains("No markdown. No backticks."));
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_before_any_upstream_call() {
        // base_url in the fake state points at the real Gemini host; a network
        // call here would fail the test with an upstream error instead.
        let state = AppState::fake();
        let result = generate(
            State(state),
            AuthUser(Uuid::new_v4()),
            Json(GenerateRequest {
                prompt: "   ".into(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error() {
        let mut state = AppState::fake();
        {
            let config = std::sync::Arc::get_mut(&mut state.config).expect("sole owner");
            config.gemini.api_key = None;
        }
        let result = generate(
            State(state),
            AuthUser(Uuid::new_v4()),
            Json(GenerateRequest {
                prompt: "a portfolio".into(),
            }),
        )
        .await;
        match result {
            Err(ApiError::Configuration(msg)) => {
                assert_eq!(msg, "Gemini API key is not configured.")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
