pub mod anthropic;
pub mod error;
pub mod openai;

use crate::config::Settings;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "gpt" => Ok(Self::OpenAI),
            other => anyhow::bail!("unknown LLM provider: {other}"),
        }
    }
}

#[async_trait::async_trait]
pub trait TextSynthesizer: Send + Sync {
    fn provider(&self) -> Provider;

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;
}

pub fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn TextSynthesizer>> {
    let provider = match settings.llm_provider.as_deref() {
        Some(raw) => raw.parse::<Provider>()?,
        None => Provider::OpenAI,
    };
    Ok(match provider {
        Provider::OpenAI => Arc::new(openai::OpenAiClient::from_settings(settings)?),
        Provider::Anthropic => Arc::new(anthropic::AnthropicClient::from_settings(settings)?),
    })
}
