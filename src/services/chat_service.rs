use log::{info, warn};

use crate::config::{MAX_TOKENS, TEMPERATURE};
use crate::error::ApiError;
use crate::models::ai_exchange::AiRequest;
use crate::services::llm_service::{CompletionProvider, CompletionRequest};
use crate::services::prompt_service::Mode;

/// Builds the completion request for a mode tag and user content.
pub fn build_request(mode: &str, prompt: &str) -> CompletionRequest {
    CompletionRequest {
        system: Mode::from(mode).system_prompt().to_string(),
        user: prompt.to_string(),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

/// Runs one generation round trip. No retries, no caching.
pub async fn process_ai_request(
    provider: &dyn CompletionProvider,
    request: &AiRequest,
) -> Result<String, ApiError> {
    let mode = Mode::from(request.mode.as_str());
    info!("Dispatching '{}' request ({} chars)", mode.tag(), request.prompt.len());

    let completion = build_request(mode.tag(), &request.prompt);
    match provider.complete(&completion).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Completion failed for '{}' request: {}", mode.tag(), e);
            Err(e.into())
        }
    }
}
