//! Gemini `generateContent` image client.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ProviderError;
use crate::provider::{GeneratedImages, ImageGenerationClient, ImagePayload};

// ── Gemini wire types ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ── Client ──

pub struct GeminiImageClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.generation_timeout)
            .build()?;

        let model = config
            .gemini_model
            .strip_prefix("models/")
            .unwrap_or(&config.gemini_model)
            .to_string();

        Ok(Self {
            http_client,
            api_key: config.gemini_api_key.clone(),
            model,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Pulls the human-readable message out of Gemini's `{"error": {...}}`
/// envelope, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

fn collect_images(response: GenerateContentResponse) -> Result<GeneratedImages, ProviderError> {
    let mut images = Vec::new();
    for part in response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|content| content.parts)
    {
        if let Some(inline) = part.inline_data {
            let bytes = BASE64
                .decode(inline.data.as_bytes())
                .map_err(|e| ProviderError::Decode(e.to_string()))?;
            images.push(ImagePayload {
                bytes,
                mime_type: inline.mime_type,
            });
        } else if let Some(text) = part.text {
            tracing::debug!("Gemini returned text part alongside image: {}", text);
        }
    }
    Ok(GeneratedImages { images })
}

#[async_trait]
impl ImageGenerationClient for GeminiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImages, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini error {}: {}", status, body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let images = collect_images(parsed)?;
        tracing::debug!("Gemini returned {} image(s)", images.images.len());
        Ok(images)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
