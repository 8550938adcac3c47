use serde::{Serialize, Deserialize};
use std::str::FromStr;
use std::fmt;
use anyhow::{Result};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelProvider {
  Gemini,
  Groq,
}

impl ModelProvider {

  pub fn as_str(&self) -> &'static str {
    match self {
      &ModelProvider::Gemini => "Gemini",
      &ModelProvider::Groq => "Groq",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModelConfig {
  pub provider: ModelProvider,
  pub model_name: String,
  pub temperature: Option<f32>,
  pub max_tokens: Option<u32>,
  pub top_p : Option<f32>
}

impl LLMModelConfig {
  // The original crew pins temperature to 0 for deterministic generation.
  pub fn deterministic(provider: ModelProvider, model_name: &str) -> Self {
    LLMModelConfig {
      provider,
      model_name: model_name.to_string(),
      temperature: Some(0.0),
      max_tokens: Some(4096),
      top_p: None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String, // e.g., "user", "assistant", "system"
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    ChatMessage { role: "system".to_string(), content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    ChatMessage { role: "user".to_string(), content: content.into() }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
  pub content: String,
}

impl fmt::Display for ModelProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ModelProvider {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "gemini" => Ok(ModelProvider::Gemini),
      "groq" => Ok(ModelProvider::Groq),
      _ => Err(format!("Unknown model provider: {}", s)),
    }
  }
}

#[async_trait]
pub trait LLMChatter : Send + Sync {
  async fn chat(&self, messages: Vec<ChatMessage>, config : &LLMModelConfig) -> Result<LLMResponse>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn provider_round_trips_through_from_str() {
    let provider: ModelProvider = "  GEMINI ".parse().unwrap();
    assert_eq!(provider, ModelProvider::Gemini);
    assert_eq!(provider.to_string(), "Gemini");
    assert!("openai".parse::<ModelProvider>().is_err());
  }

  #[test]
  fn deterministic_config_pins_temperature() {
    let config = LLMModelConfig::deterministic(ModelProvider::Groq, "llama-3.3-70b-versatile");
    assert_eq!(config.temperature, Some(0.0));
    assert_eq!(config.max_tokens, Some(4096));
  }
}
