use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::advisor::llm::model_provider::{LLMChatter, LLMModelConfig, ModelProvider};
use crate::advisor::llm::models::{get_model, get_model_info};
use crate::advisor::pipeline::runner::{AdvisorPipeline, AdvisorReport};
use crate::advisor::tasks::template::RunContext;
use crate::app::config::Config;

/// Builds one pipeline per request and runs it.
pub struct AdvisorService {
  config: Config,
}

impl AdvisorService {
  pub fn new(config: Config) -> Self {
    AdvisorService { config }
  }

  pub async fn run_report(&self, symbol: &str, current_date: NaiveDate,
                          model_name: Option<&str>, model_provider: Option<&str>) -> Result<AdvisorReport> {

    let general_model: &str = model_name.unwrap_or(&self.config.model);
    let general_provider: ModelProvider = match model_provider {
      Some(name) => name.parse().map_err(|e: String| anyhow!(e))?,
      None => Self::provider_for(general_model),
    };

    // The decision stage keeps the configured reasoning model even when the
    // caller overrides the analyst model.
    let reasoning_model: &str = &self.config.reasoning_model;
    let reasoning_provider: ModelProvider = Self::provider_for(reasoning_model);

    let general_config = LLMModelConfig::deterministic(general_provider, general_model);
    let reasoning_config = LLMModelConfig::deterministic(reasoning_provider, reasoning_model);

    let general: Arc<dyn LLMChatter> = get_model(&general_config, &self.config)?;
    let reasoning: Arc<dyn LLMChatter> = get_model(&reasoning_config, &self.config)?;

    let pipeline = AdvisorPipeline::new(general, general_config, reasoning, reasoning_config);
    let ctx = RunContext::new(symbol, current_date);

    return pipeline.run(&ctx).await;
  }

  fn provider_for(model_name: &str) -> ModelProvider {
    match get_model_info(model_name) {
      Some(model) => model.provider.clone(),
      None => ModelProvider::Gemini,
    }
  }
}
