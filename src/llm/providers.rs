use super::{ChatMessage, LLM, LLMConfig, LLMProvider, LLMResponse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODELS_URL: &str = "https://api.openai.com/v1/models";

/// OpenAI-compatible chat completion request body, shared by both providers
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    total_tokens: u32,
}

fn build_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?)
}

fn first_choice(response: ChatCompletionResponse, provider: &str) -> Result<LLMResponse> {
    let content = response
        .choices
        .first()
        .ok_or_else(|| Error::External(format!("no response from {}", provider)))?
        .message
        .content
        .clone();
    let tokens_used = response.usage.map(|u| u.total_tokens);
    Ok(LLMResponse {
        content,
        tokens_used,
    })
}

/// OpenAI provider implementation
pub struct OpenAIProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(Error::Configuration("OpenAI API key required".to_string()));
        }
        let client = build_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for OpenAIProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| Error::Configuration("OpenAI API key not configured".to_string()))?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to OpenAI API");

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "OpenAI API error {}: {}",
                status, text
            )));
        }

        first_choice(response.json().await?, "OpenAI")
    }

    async fn is_available(&self) -> bool {
        let Some(api_key) = &self.config.api_key else {
            return false;
        };
        match self
            .client
            .get(OPENAI_MODELS_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::OpenAI
    }
}

/// LMStudio provider implementation, for running the suggestion agent
/// against a local OpenAI-compatible server
pub struct LMStudioProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl LMStudioProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.endpoint.is_none() {
            return Err(Error::Configuration(
                "LMStudio endpoint required".to_string(),
            ));
        }
        let client = build_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for LMStudioProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let endpoint = self
            .config
            .endpoint
            .as_ref()
            .ok_or_else(|| Error::Configuration("LMStudio endpoint not configured".to_string()))?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to LMStudio at {}", endpoint);

        let response = self.client.post(endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "LMStudio API error {}: {}",
                status, text
            )));
        }

        first_choice(response.json().await?, "LMStudio")
    }

    async fn is_available(&self) -> bool {
        let Some(endpoint) = &self.config.endpoint else {
            return false;
        };
        let health_endpoint = endpoint.replace("/v1/chat/completions", "/health");
        match self.client.get(&health_endpoint).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::LMStudio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_api_key() {
        let config = LLMConfig::default();
        assert!(matches!(
            OpenAIProvider::new(config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_lmstudio_requires_endpoint() {
        let config = LLMConfig {
            provider: LLMProvider::LMStudio,
            ..Default::default()
        };
        assert!(matches!(
            LMStudioProvider::new(config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_create_llm_dispatches_on_provider() {
        let config = LLMConfig {
            provider: LLMProvider::LMStudio,
            endpoint: Some("http://localhost:1234/v1/chat/completions".to_string()),
            ..Default::default()
        };
        let llm = super::super::create_llm(&config).unwrap();
        assert_eq!(llm.provider_type(), LLMProvider::LMStudio);
    }
}
