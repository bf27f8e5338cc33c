// OpenAI-compatible chat completion client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::relay::CompletionService;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(config: &RelayConfig) -> Self {
        OpenAiClient {
            client: Client::new(),
            base_url: config.completion_base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait(?Send)]
impl CompletionService for OpenAiClient {
    async fn complete(&self, persona: &str, utterance: &str, api_key: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: persona,
                },
                ChatMessage {
                    role: "user",
                    content: utterance,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        log::debug!("POST {} (model {})", url, self.model);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Completion {
                status: status.as_u16(),
            });
        }

        let data: ChatResponse = response.json().await?;
        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(Error::EmptyReply)
    }

    async fn verify_key(&self, api_key: &str) -> Result<()> {
        let url = format!("{}/models", self.base_url);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).bearer_auth(api_key).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::InvalidKey)
        }
    }
}
