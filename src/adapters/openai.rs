use crate::adapters::http::{send, truncate_body};
use crate::config::ApiKey;
use crate::domain::model::{NarrativeRequest, NarrativeResponse};
use crate::domain::ports::NarrativeGenerator;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

/// OpenAI 相容的 chat completions 介面
pub struct OpenAiNarrator {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl OpenAiNarrator {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrator {
    async fn generate(&self, request: NarrativeRequest) -> Result<NarrativeResponse> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let payload = ChatCompletionRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        };

        tracing::debug!("Requesting narrative from model {}", request.model);
        let http_request = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose())
            .json(&payload);
        let response = send(http_request).await.map_err(SiteError::generation)?;

        if !response.status.is_success() {
            let code = response.status.as_u16();
            return Err(
                SiteError::generation(format!("narrative service returned HTTP {}", code))
                    .with_status(code)
                    .with_details(truncate_body(&response.body)),
            );
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response.body).map_err(|e| {
            SiteError::generation(format!("malformed narrative response: {}", e))
                .with_details(truncate_body(&response.body))
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                SiteError::generation("response contained no message content")
                    .with_details(truncate_body(&response.body))
            })?;

        Ok(NarrativeResponse {
            text,
            usage_tokens: parsed.usage.and_then(|usage| usage.total_tokens),
        })
    }
}
