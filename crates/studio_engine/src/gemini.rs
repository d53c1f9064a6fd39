//! Gemini `generateContent` client for images and chat.

use serde::{Deserialize, Serialize};
use studio_logging::{studio_debug, studio_info};

use crate::prompt::{build_image_prompt, EMPTY_CHAT_REPLY, PHARMACIST_INSTRUCTION};
use crate::{
    ChatRole, ChatTurn, GenerationProvider, ImageReference, ImageStyle, ProviderError,
    ProviderFailureKind, ProviderSettings,
};

const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl GeminiProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ProviderError::new(ProviderFailureKind::Transport, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            ProviderError::new(
                ProviderFailureKind::MissingApiKey,
                "GEMINI_API_KEY is not set",
            )
        })?;

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let kind = if status.as_u16() == 429 {
                ProviderFailureKind::QuotaExceeded
            } else {
                ProviderFailureKind::HttpStatus(status.as_u16())
            };
            return Err(ProviderError::new(kind, truncate(&text)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|err| ProviderError::new(ProviderFailureKind::InvalidResponse, err.to_string()))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(ProviderError::new(
                ProviderFailureKind::NoContent,
                format!("prompt blocked: {reason}"),
            ));
        }
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate_image(
        &self,
        name: &str,
        style: ImageStyle,
    ) -> Result<ImageReference, ProviderError> {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::text(Some(ChatRole::User), build_image_prompt(name, style))],
            generation_config: GenerationConfig {
                temperature: None,
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: self.settings.aspect_ratio.clone(),
                    image_size: self.settings.image_size.clone(),
                }),
            },
        };

        studio_info!(
            "Generating image name_len={} style={:?} model={}",
            name.len(),
            style,
            self.settings.image_model
        );
        let response = self.generate_content(&self.settings.image_model, &body).await?;

        response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.inline_data.filter(|inline| !inline.data.is_empty()))
            .map(|inline| ImageReference::new(inline.mime_type, inline.data))
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderFailureKind::NoContent,
                    "no image data found in response",
                )
            })
    }

    async fn send_chat_message(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, ProviderError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(Some(turn.role), turn.text.clone()))
            .collect();
        contents.push(Content::text(Some(ChatRole::User), message.to_string()));

        let body = GenerateContentRequest {
            system_instruction: Some(Content::text(None, PHARMACIST_INSTRUCTION.to_string())),
            contents,
            generation_config: GenerationConfig {
                temperature: Some(self.settings.chat_temperature),
                response_modalities: None,
                image_config: None,
            },
        };

        studio_debug!(
            "Sending chat message history_len={} model={}",
            history.len(),
            self.settings.chat_model
        );
        let response = self.generate_content(&self.settings.chat_model, &body).await?;

        let reply: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if reply.trim().is_empty() {
            Ok(EMPTY_CHAT_REPLY.to_string())
        } else {
            Ok(reply)
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::new(ProviderFailureKind::Timeout, err.to_string());
    }
    ProviderError::new(ProviderFailureKind::Transport, err.to_string())
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

// Wire types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<ChatRole>, text: String) -> Self {
        Self {
            role: role.map(|role| role.as_str().to_string()),
            parts: vec![Part {
                text: Some(text),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    image_size: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
