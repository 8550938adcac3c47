use crate::advisor::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::result::Result::Ok;
use std::time::Duration;

// Request shape for the generateContent REST endpoint. Gemini has no "system"
// role in contents; system text travels in system_instruction instead.
#[derive(Serialize, Debug)]
struct GeminiGenerateRequest {
  contents: Vec<GeminiContent>,
  #[serde(rename = "systemInstruction")]
  #[serde(skip_serializing_if = "Option::is_none")]
  system_instruction: Option<GeminiContent>,
  #[serde(rename = "generationConfig")]
  generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiContent {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>, // "user" or "model"
  parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiPart {
  text: String,
}

#[derive(Serialize, Debug)]
struct GeminiGenerationConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
  #[serde(rename = "maxOutputTokens")]
  #[serde(skip_serializing_if = "Option::is_none")]
  max_output_tokens: Option<u32>,
  #[serde(rename = "topP")]
  #[serde(skip_serializing_if = "Option::is_none")]
  top_p: Option<f32>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
  content: GeminiContent,
}

#[derive(Deserialize, Debug)]
struct GeminiGenerateResponse {
  candidates: Vec<GeminiCandidate>,
}

pub struct GeminiProvider {
  base_url : String,
  api_key : String,
  model_name: String,
  client : Client
}

impl GeminiProvider {

  pub fn new(model_name: &str, api_key: &str) -> Self {
    let base_url: String = "https://generativelanguage.googleapis.com/v1beta/models".to_string();
    // A stuck completion call should not hold a report request open forever.
    let client: Client = Client::builder().timeout(Duration::from_secs(120)).build().unwrap_or_else(|_| Client::new());
    GeminiProvider { base_url, api_key: api_key.to_string(), model_name: model_name.to_string(), client }
  }

  fn build_request(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> GeminiGenerateRequest {
    let mut system_parts: Vec<GeminiPart> = Vec::new();
    let mut contents: Vec<GeminiContent> = Vec::new();

    for message in messages {
      match message.role.as_str() {
        "system" => system_parts.push(GeminiPart { text: message.content }),
        "assistant" => contents.push(GeminiContent {
          role: Some("model".to_string()),
          parts: vec![GeminiPart { text: message.content }],
        }),
        _ => contents.push(GeminiContent {
          role: Some("user".to_string()),
          parts: vec![GeminiPart { text: message.content }],
        }),
      }
    }

    let system_instruction = if system_parts.is_empty() {
      None
    } else {
      Some(GeminiContent { role: None, parts: system_parts })
    };

    return GeminiGenerateRequest {
      contents,
      system_instruction,
      generation_config: GeminiGenerationConfig {
        temperature: config.temperature,
        max_output_tokens: config.max_tokens,
        top_p: config.top_p,
      },
    };
  }
}

#[async_trait]
impl LLMChatter for GeminiProvider {
  async fn chat(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> Result<LLMResponse> {
    let request: GeminiGenerateRequest = self.build_request(messages, config);
    let url: String = format!("{}/{}:generateContent", self.base_url, self.model_name);

    let response: Response = self.client.post(&url)
      .query(&[("key", self.api_key.as_str())])
      .json(&request)
      .send().await?;

    if !response.status().is_success() {
      let status = response.status();
      let body: String = response.text().await.unwrap_or_default();
      log::error!("Error getting response from Gemini: {} {}", status, body);
      return Err(anyhow!("Gemini request failed with status {}", status));
    }

    let gemini_response: GeminiGenerateResponse = response.json().await?;
    let first: GeminiCandidate = gemini_response.candidates.into_iter().next()
      .ok_or_else(|| anyhow!("No candidates received from Gemini"))?;
    let content: String = first.content.parts.into_iter().map(|part| part.text).collect::<Vec<String>>().join("");

    return Ok(LLMResponse { content });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::advisor::llm::model_provider::ModelProvider;

  #[test]
  fn system_messages_move_into_system_instruction() {
    let provider = GeminiProvider::new("gemini-2.0-flash", "test-key");
    let config = LLMModelConfig::deterministic(ModelProvider::Gemini, "gemini-2.0-flash");
    let request = provider.build_request(
      vec![ChatMessage::system("You are an analyst."), ChatMessage::user("Analyse AAPL.")],
      &config,
    );

    let system = request.system_instruction.expect("system instruction expected");
    assert_eq!(system.parts[0].text, "You are an analyst.");
    assert_eq!(request.contents.len(), 1);
    assert_eq!(request.contents[0].role.as_deref(), Some("user"));
  }
}
