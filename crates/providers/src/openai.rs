use crate::{CompletionResponse, LlmProvider, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    cfg: Arc<OpenAiConfig>,
}

impl OpenAiProvider {
    pub fn new(cfg: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        #[derive(serde::Serialize)]
        struct ChatMessage<'a> {
            role: &'static str,
            content: &'a str,
        }
        #[derive(serde::Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChatMessageResp,
        }
        #[derive(Deserialize)]
        struct ChatMessageResp {
            content: String,
        }
        #[derive(Deserialize)]
        struct ChatApiResponse {
            choices: Vec<Choice>,
        }

        let body = ChatRequest {
            model: &self.cfg.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
        };

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.cfg.base_url))
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        debug!("chat completion status: {}", resp.status());

        let parsed: ChatApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse { text })
    }
}
