use serde::{Serialize, Deserialize};
use std::sync::OnceLock;
use std::sync::Arc;
use anyhow::Result;

use crate::advisor::llm::model_provider::{LLMModelConfig, ModelProvider, LLMChatter};
use crate::advisor::llm::gemini::GeminiProvider;
use crate::advisor::llm::groq::GroqProvider;
use crate::app::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModel {
  pub display_name: String,
  pub model_name: String, // The actual name used in API calls
  pub provider: ModelProvider,
}

impl LLMModel {
  pub fn new(display_name: &str, model_name: &str, provider: ModelProvider) -> Self {
    LLMModel {
      display_name: display_name.to_string(),
      model_name: model_name.to_string(),
      provider,
    }
  }

}

// Gemini models mirror the original crew setup: one general model for the
// analyst stages, one reasoning model for the investment decision.
fn available_models_data() -> Vec<LLMModel> {
  vec![
    LLMModel::new("[gemini] gemini-2.0-flash", "gemini-2.0-flash", ModelProvider::Gemini),
    LLMModel::new("[gemini] gemini-2.5-flash", "gemini-2.5-flash", ModelProvider::Gemini),
    LLMModel::new("[gemini] gemini-2.5-pro", "gemini-2.5-pro", ModelProvider::Gemini),

    LLMModel::new("[groq] llama-3.3-70b", "llama-3.3-70b-versatile", ModelProvider::Groq),
    LLMModel::new("[groq] llama-3.1-8b", "llama-3.1-8b-instant", ModelProvider::Groq),
  ]
}

pub static AVAILABLE_MODELS: OnceLock<Vec<LLMModel>> = OnceLock::new();

pub fn get_available_models() -> &'static [LLMModel] {
  AVAILABLE_MODELS.get_or_init(available_models_data).as_slice()
}

pub fn get_model_info(model_name: &str) -> Option<&'static LLMModel> {
  get_available_models()
      .iter()
      .find(|&model_desc| model_desc.model_name == model_name)
}

pub fn get_model(config: &LLMModelConfig, app_config: &Config) -> Result<Arc<dyn LLMChatter>> {
  log::info!("Initializing LLM client for provider: {}, model: {}", config.provider, config.model_name);

  match config.provider {
    ModelProvider::Gemini => {
      let client = GeminiProvider::new(&config.model_name, &app_config.gemini_api_key);
      return Ok(Arc::new(client));
    }
    ModelProvider::Groq => {
      let client = GroqProvider::new(&config.model_name, &app_config.groq_api_key);
      return Ok(Arc::new(client));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_lists_general_and_reasoning_models() {
    let models = get_available_models();
    assert!(models.iter().any(|m| m.model_name == "gemini-2.0-flash"));
    assert!(models.iter().any(|m| m.model_name == "gemini-2.5-pro"));
  }

  #[test]
  fn model_info_lookup_finds_known_models_only() {
    assert!(get_model_info("gemini-2.0-flash").is_some());
    assert!(get_model_info("gpt-4o").is_none());
  }
}
