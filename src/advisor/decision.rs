use anyhow::{anyhow, Result};
use serde::{Serialize, Deserialize, Deserializer};
use std::str::FromStr;
use std::result::Result::Err;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
  Buy,
  Hold,
  Sell,
}

impl Recommendation {
  pub fn as_str(&self) -> &'static str {
    match self {
      Recommendation::Buy => "BUY",
      Recommendation::Hold => "HOLD",
      Recommendation::Sell => "SELL",
    }
  }
}

impl FromStr for Recommendation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "buy" => Ok(Recommendation::Buy),
      "hold" => Ok(Recommendation::Hold),
      "sell" => Ok(Recommendation::Sell),
      _ => Err(format!("Unknown recommendation: {}", s)),
    }
  }
}

fn deserialize_recommendation<'de, D>(deserializer: D) -> Result<Recommendation, D::Error> where D: Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  Recommendation::from_str(&s).map_err(serde::de::Error::custom)
}

impl std::fmt::Display for Recommendation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Structured output of the investment-decision stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentDecision {
  pub stock_ticker: String,
  pub full_name: String,
  #[serde(default)]
  pub industry: String,
  pub today_date: String,
  #[serde(deserialize_with = "deserialize_recommendation")]
  pub decision: Recommendation,
  #[serde(default)]
  pub macro_reasoning: String,
  #[serde(default)]
  pub fund_reasoning: String,
  #[serde(default)]
  pub tech_reasoning: String,
  #[serde(default)]
  pub current_price: Option<f64>,
  pub target_price: f64,
  pub expected_return: f64,
}

// Models answer with fenced blocks more often than not; keep the payload only.
fn strip_code_fence(raw: &str) -> &str {
  let trimmed = raw.trim();
  if !trimmed.starts_with("```") {
    return trimmed;
  }
  let without_open = trimmed.trim_start_matches("```json").trim_start_matches("```");
  without_open.trim_end_matches("```").trim()
}

// Some responses wrap the object in prose; cut down to the outermost braces.
fn extract_json_object(raw: &str) -> Option<&str> {
  let start = raw.find('{')?;
  let end = raw.rfind('}')?;
  if end > start {
    return Some(&raw[start..=end]);
  }
  None
}

/// Parses the raw stage-4 text into an [`InvestmentDecision`].
pub fn parse_decision(raw: &str) -> Result<InvestmentDecision> {
  let stripped: &str = strip_code_fence(raw);
  let payload: &str = extract_json_object(stripped)
    .ok_or_else(|| anyhow!("No JSON object found in decision output: {:?}", raw))?;

  match serde_json::from_str::<InvestmentDecision>(payload) {
    Ok(decision) => Ok(decision),
    Err(e) => {
      log::error!("JSON decoding error: {}. Response: {:?}", e, raw);
      Err(anyhow!("Failed to parse investment decision: {}", e))
    }
  }
}
