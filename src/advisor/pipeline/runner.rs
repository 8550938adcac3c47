use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};
use std::sync::Arc;

use crate::advisor::decision::{parse_decision, InvestmentDecision};
use crate::advisor::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig};
use crate::advisor::tasks::spec::{analyst_tasks, decision_task, TaskSpec};
use crate::advisor::tasks::template::{resolve, RunContext};

/// Opaque text produced by one role for one task. Lives for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
  pub task: String,
  pub role: String,
  pub content: String,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorReport {
  pub symbol: String,
  pub current_date: String,
  pub news: StageResult,
  pub fundamental: StageResult,
  pub technical: StageResult,
  pub decision_raw: String,
  pub decision: InvestmentDecision,
}

// A TaskSpec with its placeholders already filled for one RunContext.
struct ResolvedTask {
  spec: &'static TaskSpec,
  description: String,
  expected_output: String,
}

impl ResolvedTask {
  fn from_spec(spec: &'static TaskSpec, ctx: &RunContext) -> Result<Self> {
    let description: String = resolve(spec.description, ctx)?;
    let expected_output: String = resolve(spec.expected_output, ctx)?;
    return Ok(ResolvedTask { spec, description, expected_output });
  }
}

pub struct AdvisorPipeline {
  general: Arc<dyn LLMChatter>,
  general_config: LLMModelConfig,
  reasoning: Arc<dyn LLMChatter>,
  reasoning_config: LLMModelConfig,
}

impl AdvisorPipeline {

  pub fn new(general: Arc<dyn LLMChatter>, general_config: LLMModelConfig,
             reasoning: Arc<dyn LLMChatter>, reasoning_config: LLMModelConfig) -> Self {
    AdvisorPipeline { general, general_config, reasoning, reasoning_config }
  }

  /// Runs the three analyst stages concurrently, joins their results, and
  /// only then runs the decision stage. If any analyst stage fails the
  /// decision stage is never invoked.
  pub async fn run(&self, ctx: &RunContext) -> Result<AdvisorReport> {
    // Resolve every template up front so a MissingVariable surfaces before
    // any external call is made.
    let analysts: Vec<ResolvedTask> = analyst_tasks().into_iter()
      .map(|spec| ResolvedTask::from_spec(spec, ctx))
      .collect::<Result<Vec<ResolvedTask>>>()?;
    let decision_resolved: ResolvedTask = ResolvedTask::from_spec(decision_task(), ctx)?;

    let mut analysts = analysts.into_iter();
    let news_task = analysts.next().context("news task missing from static config")?;
    let fund_task = analysts.next().context("fundamental task missing from static config")?;
    let tech_task = analysts.next().context("technical task missing from static config")?;

    log::info!("Running analyst stages for {} as of {}", ctx.symbol, ctx.current_date);

    let (news, fundamental, technical) = futures::try_join!(
      self.run_stage(&self.general, &self.general_config, &news_task, None),
      self.run_stage(&self.general, &self.general_config, &fund_task, None),
      self.run_stage(&self.general, &self.general_config, &tech_task, None),
    )?;

    let analyst_context: String = format!(
      "### MACRO\n{}\n\n### FUNDAMENTAL\n{}\n\n### TECHNICAL\n{}",
      news.content, fundamental.content, technical.content,
    );

    log::info!("Analyst stages complete for {}; running decision stage", ctx.symbol);

    let decision_result: StageResult = self
      .run_stage(&self.reasoning, &self.reasoning_config, &decision_resolved, Some(&analyst_context))
      .await?;
    let decision: InvestmentDecision = parse_decision(&decision_result.content)?;

    log::info!("Decision for {}: {} (target {:.2})", ctx.symbol, decision.decision, decision.target_price);

    return Ok(AdvisorReport {
      symbol: ctx.symbol.clone(),
      current_date: ctx.current_date.format("%Y-%m-%d").to_string(),
      news,
      fundamental,
      technical,
      decision_raw: decision_result.content,
      decision,
    });
  }

  async fn run_stage(&self, chatter: &Arc<dyn LLMChatter>, config: &LLMModelConfig,
                     task: &ResolvedTask, analyst_context: Option<&str>) -> Result<StageResult> {
    let profile = task.spec.role.profile();

    let mut user_prompt: String = format!(
      "{}\n\nExpected output:\n{}", task.description, task.expected_output,
    );
    if let Some(context_docs) = analyst_context {
      user_prompt.push_str("\n\nReports from the analyst stages:\n\n");
      user_prompt.push_str(context_docs);
    }

    let messages: Vec<ChatMessage> = vec![
      ChatMessage::system(profile.as_system_message()),
      ChatMessage::user(user_prompt),
    ];

    let response = chatter.chat(messages, config).await
      .with_context(|| format!("Stage '{}' failed", task.spec.name))?;

    return Ok(StageResult {
      task: task.spec.name.to_string(),
      role: profile.role.to_string(),
      content: response.content,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::advisor::decision::Recommendation;
  use crate::advisor::llm::model_provider::{LLMResponse, ModelProvider};
  use anyhow::anyhow;
  use async_trait::async_trait;
  use chrono::NaiveDate;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Mutex;
  use std::time::Duration;

  const DECISION_JSON: &str = r#"{
    "stock_ticker": "AAPL",
    "full_name": "Apple Inc.",
    "industry": "Consumer Electronics",
    "today_date": "2025-06-12",
    "decision": "HOLD",
    "macro_reasoning": "Mixed macro signals.",
    "fund_reasoning": "Fairly valued against peers.",
    "tech_reasoning": "Rangebound between key levels.",
    "current_price": 196.4,
    "target_price": 205.0,
    "expected_return": 4.4
  }"#;

  // Scripted analyst provider: answers with a payload derived from the task
  // in the prompt, optionally failing one stage, optionally delaying each
  // stage differently to scramble completion order.
  struct ScriptedAnalyst {
    fail_on: Option<&'static str>,
    staggered: bool,
    calls: AtomicUsize,
  }

  impl ScriptedAnalyst {
    fn new() -> Self {
      ScriptedAnalyst { fail_on: None, staggered: false, calls: AtomicUsize::new(0) }
    }

    fn failing_on(marker: &'static str) -> Self {
      ScriptedAnalyst { fail_on: Some(marker), staggered: false, calls: AtomicUsize::new(0) }
    }

    fn staggered() -> Self {
      ScriptedAnalyst { fail_on: None, staggered: true, calls: AtomicUsize::new(0) }
    }
  }

  fn payload_for(prompt: &str) -> (&'static str, u64) {
    if prompt.contains("news items") {
      return ("macro payload", 30);
    }
    if prompt.contains("valuation ratios") {
      return ("fundamental payload", 10);
    }
    ("technical payload", 1)
  }

  #[async_trait]
  impl LLMChatter for ScriptedAnalyst {
    async fn chat(&self, messages: Vec<ChatMessage>, _config: &LLMModelConfig) -> Result<LLMResponse> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      let prompt: &str = &messages.last().unwrap().content;
      if let Some(marker) = self.fail_on {
        if prompt.contains(marker) {
          return Err(anyhow!("injected fault for marker {:?}", marker));
        }
      }
      let (payload, delay_ms) = payload_for(prompt);
      if self.staggered {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
      }
      Ok(LLMResponse { content: payload.to_string() })
    }
  }

  // Decision provider that records the prompt it was handed.
  struct ScriptedStrategist {
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
  }

  impl ScriptedStrategist {
    fn new() -> Self {
      ScriptedStrategist { calls: AtomicUsize::new(0), last_prompt: Mutex::new(None) }
    }
  }

  #[async_trait]
  impl LLMChatter for ScriptedStrategist {
    async fn chat(&self, messages: Vec<ChatMessage>, _config: &LLMModelConfig) -> Result<LLMResponse> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      *self.last_prompt.lock().unwrap() = Some(messages.last().unwrap().content.clone());
      Ok(LLMResponse { content: format!("```json\n{}\n```", DECISION_JSON) })
    }
  }

  fn pipeline(general: Arc<ScriptedAnalyst>, reasoning: Arc<ScriptedStrategist>) -> AdvisorPipeline {
    AdvisorPipeline::new(
      general,
      LLMModelConfig::deterministic(ModelProvider::Gemini, "gemini-2.0-flash"),
      reasoning,
      LLMModelConfig::deterministic(ModelProvider::Gemini, "gemini-2.5-pro"),
    )
  }

  fn context() -> RunContext {
    RunContext::new("AAPL", NaiveDate::from_ymd_opt(2025, 6, 12).unwrap())
  }

  #[tokio::test]
  async fn full_run_joins_all_three_stage_payloads() {
    let general = Arc::new(ScriptedAnalyst::new());
    let reasoning = Arc::new(ScriptedStrategist::new());
    let report = pipeline(general.clone(), reasoning.clone()).run(&context()).await.unwrap();

    assert_eq!(report.news.content, "macro payload");
    assert_eq!(report.fundamental.content, "fundamental payload");
    assert_eq!(report.technical.content, "technical payload");
    assert_eq!(report.decision.decision, Recommendation::Hold);
    assert_eq!(general.calls.load(Ordering::SeqCst), 3);
    assert_eq!(reasoning.calls.load(Ordering::SeqCst), 1);

    let prompt = reasoning.last_prompt.lock().unwrap().clone().unwrap();
    for payload in ["macro payload", "fundamental payload", "technical payload"] {
      assert!(prompt.contains(payload), "decision prompt missing {:?}", payload);
    }
    assert!(prompt.contains("AAPL"));
    assert!(prompt.contains("2025-06-12"));
  }

  #[tokio::test]
  async fn staggered_completion_order_joins_the_same_payloads() {
    let general = Arc::new(ScriptedAnalyst::staggered());
    let reasoning = Arc::new(ScriptedStrategist::new());
    let report = pipeline(general, reasoning).run(&context()).await.unwrap();

    // The slowest stage (news) still lands in the news slot.
    assert_eq!(report.news.content, "macro payload");
    assert_eq!(report.fundamental.content, "fundamental payload");
    assert_eq!(report.technical.content, "technical payload");
  }

  async fn assert_decision_skipped_when_stage_fails(marker: &'static str) {
    let general = Arc::new(ScriptedAnalyst::failing_on(marker));
    let reasoning = Arc::new(ScriptedStrategist::new());
    let result = pipeline(general, reasoning.clone()).run(&context()).await;

    assert!(result.is_err());
    assert_eq!(reasoning.calls.load(Ordering::SeqCst), 0, "decision stage ran despite {:?} fault", marker);
  }

  #[tokio::test]
  async fn news_fault_skips_decision_stage() {
    assert_decision_skipped_when_stage_fails("news items").await;
  }

  #[tokio::test]
  async fn fundamental_fault_skips_decision_stage() {
    assert_decision_skipped_when_stage_fails("valuation ratios").await;
  }

  #[tokio::test]
  async fn technical_fault_skips_decision_stage() {
    assert_decision_skipped_when_stage_fails("daily candles").await;
  }
}
