use crate::config::GeneratorSettings;
use crate::core::ScriptGenerator;
use crate::utils::error::{Result, ScriptError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Gemini `generateContent` REST 介面
pub struct GeminiGenerator {
    client: Client,
    settings: GeneratorSettings,
}

impl GeminiGenerator {
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.settings.temperature.is_none() && self.settings.max_output_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.settings.temperature,
            max_output_tokens: self.settings.max_output_tokens,
        })
    }
}

#[async_trait::async_trait]
impl ScriptGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.settings.api_key().ok_or(ScriptError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: self.generation_config(),
        };

        let url = self.endpoint();
        tracing::debug!("Making generateContent request to: {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Generation API response status: {}", status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or(raw);
            return Err(ScriptError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }

    fn name(&self) -> &str {
        &self.settings.model
    }
}

/// 取第一個 candidate 的所有文字片段（略過 thought）並串接
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ScriptError::PromptBlocked { reason });
        }
        return Err(ScriptError::EmptyResponse);
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            tracing::warn!("Generation finished early: {}", reason);
        }
    }

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        return Err(ScriptError::EmptyResponse);
    }
    Ok(text)
}
