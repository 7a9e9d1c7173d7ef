//! Gemini identification client: one `generateContent` call per request.
//!
//! Differences from a plain chat call:
//! - Google Search grounding is enabled, so the answer may carry
//!   `groundingMetadata.groundingChunks` with web links
//! - The answer is free text (markdown), not JSON
//! - Exactly one attempt. Errors go back to the caller as-is
//!
//! Response layout consumed:
//! - Text in `candidates[0].content.parts[*].text`
//! - Sources in `candidates[0].groundingMetadata.groundingChunks[*].web`
//! - Token usage in `usageMetadata`

use serde::Deserialize;

use super::error::IdentifyError;
use super::extract::{derive_identified_name, extract_sources};
use super::request::build_request;
use super::types::{IdentificationRequest, IdentificationResult};
use super::FontIdentifier;
use crate::config::GeminiConfig;

/// Gemini Flash pricing (as of 2026):
/// Input:  $0.30 per 1M tokens
/// Output: $2.50 per 1M tokens
const INPUT_COST_PER_MILLION: f64 = 0.30;
const OUTPUT_COST_PER_MILLION: f64 = 2.50;

// ── Wire types (inbound) ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub grounding_metadata: Option<GroundingMetadata>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Thought summaries are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default)]
    pub web_search_queries: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn grounding_chunks(&self) -> &[GroundingChunk] {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|g| g.grounding_chunks.as_slice())
            .unwrap_or_default()
    }
}

/// Normalize a parsed response. The answer text is passed through verbatim.
pub fn into_result(response: &GenerateContentResponse) -> Result<IdentificationResult, IdentifyError> {
    let analysis_text = response.text().ok_or(IdentifyError::EmptyResponse)?;
    let sources = extract_sources(response.grounding_chunks());
    let identified_name = derive_identified_name(&analysis_text);

    Ok(IdentificationResult {
        analysis_text,
        sources,
        identified_name,
    })
}

/// Parse a successful response body into a result.
pub fn parse_response(body: &str) -> Result<IdentificationResult, IdentifyError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| IdentifyError::service(format!("Malformed Gemini response: {}", e)))?;
    into_result(&response)
}

/// Build the error for a non-2xx response, preferring the service's own message.
fn service_error(status: reqwest::StatusCode, body: &str) -> IdentifyError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Gemini API error ({})", status));
    IdentifyError::Service {
        status: Some(status.as_u16()),
        message,
    }
}

/// Longest slice of a response body written to the error log.
const LOG_SNIPPET_CHARS: usize = 200;

/// First `max_chars` characters of `text`, cut on a char boundary.
fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client bound to one resolved configuration.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn from_config(config: GeminiConfig) -> Result<Self, IdentifyError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IdentifyError::Configuration(format!("HTTP client error: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Resolve config from the environment. Fails before any network call
    /// when no API key is available.
    pub fn from_env() -> Result<Self, IdentifyError> {
        Self::from_config(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate(&self, request: &IdentificationRequest) -> Result<IdentificationResult, IdentifyError> {
        let body = build_request(request);

        log::info!("[LLM] Provider: gemini");
        log::info!("[LLM] Model: {}", self.config.model);
        log::info!(
            "[LLM] Parts: image={}, prompt={} chars",
            request.image().is_some(),
            request.text_prompt().len()
        );

        let start = std::time::Instant::now();
        let resp = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("[LLM] HTTP request failed: {}", e);
                IdentifyError::from(e)
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            log::error!("[LLM] Failed to read response body: {}", e);
            IdentifyError::from(e)
        })?;
        log::info!("[LLM] Response in {}ms ({} bytes)", start.elapsed().as_millis(), text.len());

        if !status.is_success() {
            log::error!("[LLM] Gemini API returned {}: {}", status, snippet(&text, LOG_SNIPPET_CHARS));
            return Err(service_error(status, &text));
        }

        let response: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("[LLM] Malformed response: {}", e);
            IdentifyError::service(format!("Malformed Gemini response: {}", e))
        })?;

        log_usage(&response);

        let result = into_result(&response).inspect_err(|_| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            log::warn!("[LLM] No text in response (finishReason: {})", reason);
        })?;

        log::info!(
            "[LLM] Identified: {} ({} sources)",
            result.identified_name.as_deref().unwrap_or("-"),
            result.sources.len()
        );
        Ok(result)
    }
}

impl FontIdentifier for GeminiClient {
    async fn identify(&self, request: &IdentificationRequest) -> Result<IdentificationResult, IdentifyError> {
        self.generate(request).await
    }
}

fn log_usage(response: &GenerateContentResponse) {
    if let Some(grounding) = response.candidates.first().and_then(|c| c.grounding_metadata.as_ref()) {
        for query in &grounding.web_search_queries {
            log::info!("[LLM] Search query: {}", query);
        }
    }

    let Some(usage) = &response.usage_metadata else {
        return;
    };
    if usage.prompt_token_count == 0 && usage.candidates_token_count == 0 {
        return;
    }
    log::info!("[LLM] Input tokens: {}", usage.prompt_token_count);
    log::info!("[LLM] Output tokens: {}", usage.candidates_token_count);
    let cost = (usage.prompt_token_count as f64 * INPUT_COST_PER_MILLION
        + usage.candidates_token_count as f64 * OUTPUT_COST_PER_MILLION)
        / 1_000_000.0;
    log::info!("[LLM] Estimated cost: ${:.6}", cost);
}
