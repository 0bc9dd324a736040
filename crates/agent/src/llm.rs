//! LLM client. Present at bootstrap, unused for decisions.
//!
//! The assistant keeps a completion client on hand so operators can wire up
//! conversational features later, but nothing in the dispatch pipeline calls
//! it. See the crate-level safety principle.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use crmpilot_core::config::LlmConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiClient {
    /// Builds a client from the `[llm]` config section, or `None` when no
    /// API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build LLM HTTP client")?;

        Ok(Some(Self {
            http,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone(),
            api_key,
        }))
    }

    fn build_request_body(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(prompt);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("LLM request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("LLM API error {status}: {body_text}"));
        }

        let parsed: ChatResponse =
            response.json().await.context("failed to parse LLM response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("LLM response contained no choices"))
    }
}

#[cfg(test)]
mod tests {
    use crmpilot_core::config::LlmConfig;

    use super::OpenAiClient;

    fn config_with_key() -> LlmConfig {
        LlmConfig {
            api_key: Some(String::from("sk-test").into()),
            base_url: None,
            model: "gpt-4".to_string(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn request_body_matches_chat_completions_format() {
        let client = OpenAiClient::from_config(&config_with_key())
            .expect("client should build")
            .expect("api key is set");

        let body = client.build_request_body("hello");
        let json = serde_json::to_value(&body).expect("request body should serialize");

        assert_eq!(json["model"], "gpt-4");
        let messages = json["messages"].as_array().expect("messages should be an array");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hello");
    }

    #[test]
    fn missing_api_key_yields_no_client() {
        let config = LlmConfig { api_key: None, ..config_with_key() };
        let client = OpenAiClient::from_config(&config).expect("build should not fail");
        assert!(client.is_none());
    }

    #[test]
    fn default_base_url_points_at_openai() {
        let client = OpenAiClient::from_config(&config_with_key())
            .expect("client should build")
            .expect("api key is set");
        assert_eq!(client.base_url, "https://api.openai.com");
    }
}
