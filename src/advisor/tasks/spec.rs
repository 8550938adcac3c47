use std::collections::HashMap;
use once_cell::sync::Lazy;
use serde::{Serialize, Deserialize};

/// The four agent roles of the advisor crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
  NewsResearcher,
  FundamentalAnalyst,
  TechnicalAnalyst,
  InvestmentStrategist,
}

impl Role {
  pub fn display_name(&self) -> &'static str {
    match self {
      Role::NewsResearcher => "Stock News Researcher",
      Role::FundamentalAnalyst => "Fundamental Analyst",
      Role::TechnicalAnalyst => "Technical Analyst",
      Role::InvestmentStrategist => "Investment Strategist",
    }
  }

  pub fn profile(&self) -> AgentProfile {
    match self {
      Role::NewsResearcher => AgentProfile {
        role: self.display_name(),
        goal: "Track and rank the macroeconomic and policy headlines that move U.S. equities.",
        backstory: "A market news researcher with years on a sell-side desk, known for \
                    separating noise from the handful of stories that actually reprice risk. \
                    Every claim is backed by a source link.",
      },
      Role::FundamentalAnalyst => AgentProfile {
        role: self.display_name(),
        goal: "Judge whether a stock is overvalued, undervalued or fairly valued from its \
               ratios, peers and earnings trend.",
        backstory: "A buy-side fundamental analyst who reads filings line by line and \
                    distrusts any multiple quoted without its industry context.",
      },
      Role::TechnicalAnalyst => AgentProfile {
        role: self.display_name(),
        goal: "Read trend, momentum and key levels from price action and standard indicators.",
        backstory: "A chartist trained on two decades of daily candles. Indicators over \
                    anecdotes, levels over opinions.",
      },
      Role::InvestmentStrategist => AgentProfile {
        role: self.display_name(),
        goal: "Weigh the macro backdrop, the valuation picture and the technical setup into \
               one accountable BUY, HOLD or SELL call.",
        backstory: "A portfolio strategist who signs the final recommendation and therefore \
                    demands that every input is reflected in the conclusion.",
      },
    }
  }
}

/// System-message material for one role.
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
  pub role: &'static str,
  pub goal: &'static str,
  pub backstory: &'static str,
}

impl AgentProfile {
  pub fn as_system_message(&self) -> String {
    format!("You are {}. {}\n\nBackground: {}", self.role, self.goal, self.backstory)
  }
}

/// A named template pair bound to a producing role. Immutable once loaded.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
  pub name: &'static str,
  pub description: &'static str,
  pub expected_output: &'static str,
  pub role: Role,
  pub order: usize,
}

pub static TASK_SPECS: Lazy<HashMap<&'static str, TaskSpec>> = Lazy::new(|| {
  let mut config: HashMap<&'static str, TaskSpec> = HashMap::new();

  config.insert("news_collecting", TaskSpec {
    name: "news_collecting",
    description: "Search for the five most impactful macroeconomic and policy news items \
                  for the U.S. market as of {current_date} that could affect {symbol} and \
                  the broader indices: Federal Reserve policy, inflation prints, employment \
                  data, trade policy and sector regulation. Rank the items by expected \
                  market impact.",
    expected_output: "A markdown report dated {current_date} listing the five selected news \
                      items in ranked order. Each item carries a headline, a source link, a \
                      one-paragraph summary and an impact analysis describing how it may \
                      move U.S. equities and {symbol} in particular.",
    role: Role::NewsResearcher,
    order: 1,
  });

  config.insert("fundamental_analysis", TaskSpec {
    name: "fundamental_analysis",
    description: "Perform a fundamental analysis of {symbol} as of {current_date}. Collect \
                  the key valuation ratios (P/E, P/B, ROE, ROA, EPS, debt-to-equity, \
                  EV/EBITDA, profit margin) and the last four quarterly income-statement \
                  trends, and compare the ratios against industry averages and direct peers.",
    expected_output: "A markdown report for {symbol} dated {current_date} containing a \
                      valuation-ratio table, a peer and industry comparison, commentary on \
                      quarterly revenue and earnings trends, and a closing verdict stating \
                      whether {symbol} looks overvalued, undervalued or fairly valued.",
    role: Role::FundamentalAnalyst,
    order: 2,
  });

  config.insert("technical_analysis", TaskSpec {
    name: "technical_analysis",
    description: "Perform a technical analysis of {symbol} using daily candles up to \
                  {current_date}. Report SMA 20/50/200, EMA 12/26, RSI-14, MACD with signal \
                  line and histogram, Bollinger Bands, and the three nearest support and \
                  resistance clusters.",
    expected_output: "A markdown report for {symbol} dated {current_date} with an indicator \
                      table, commentary on trend direction and momentum, the support and \
                      resistance levels, and a closing verdict on the prevailing trend.",
    role: Role::TechnicalAnalyst,
    order: 3,
  });

  config.insert("investment_decision", TaskSpec {
    name: "investment_decision",
    description: "Synthesize the macro news report, the fundamental analysis and the \
                  technical analysis for {symbol} into one investment decision as of \
                  {current_date}. Weigh the macro backdrop, the valuation verdict and the \
                  technical picture against each other and commit to a call.",
    expected_output: "A single JSON object with the fields stock_ticker, full_name, \
                      industry, today_date, decision (one of BUY, HOLD, SELL), \
                      macro_reasoning, fund_reasoning, tech_reasoning, current_price, \
                      target_price and expected_return. today_date must equal \
                      {current_date} and stock_ticker must equal {symbol}. Return only the \
                      JSON object, no surrounding prose.",
    role: Role::InvestmentStrategist,
    order: 4,
  });

  return config;
});

pub fn get_task_specs() -> &'static HashMap<&'static str, TaskSpec> {
  &TASK_SPECS
}

pub fn get_task(name: &str) -> Option<&'static TaskSpec> {
  TASK_SPECS.get(name)
}

/// The three independent analyst tasks, in pipeline order.
pub fn analyst_tasks() -> Vec<&'static TaskSpec> {
  let mut tasks: Vec<&'static TaskSpec> = TASK_SPECS.values()
    .filter(|spec| spec.role != Role::InvestmentStrategist)
    .collect();
  tasks.sort_by_key(|spec| spec.order);
  return tasks;
}

pub fn decision_task() -> &'static TaskSpec {
  // The map is built above with this entry present.
  TASK_SPECS.get("investment_decision").expect("investment_decision task missing from static config")
}

/// (display_name, task_name) pairs in pipeline order, for the listing endpoint.
pub fn get_task_order() -> Vec<(String, String)> {
  let mut pairs: Vec<(usize, String, String)> = TASK_SPECS.values()
    .map(|spec| (spec.order, spec.role.display_name().to_string(), spec.name.to_string()))
    .collect();
  pairs.sort_by_key(|(order, _, _)| *order);
  return pairs.into_iter().map(|(_, display, name)| (display, name)).collect();
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::advisor::tasks::template::{resolve, RunContext};
  use chrono::NaiveDate;

  fn context() -> RunContext {
    RunContext::new("AAPL", NaiveDate::from_ymd_opt(2025, 6, 12).unwrap())
  }

  #[test]
  fn every_template_resolves_without_leftover_tokens() {
    for spec in get_task_specs().values() {
      for template in [spec.description, spec.expected_output] {
        let resolved = resolve(template, &context()).unwrap();
        assert!(!resolved.contains("{symbol}"), "leftover token in {}", spec.name);
        assert!(!resolved.contains("{current_date}"), "leftover token in {}", spec.name);
      }
    }
  }

  #[test]
  fn fundamental_analysis_carries_symbol_and_date() {
    let spec = get_task("fundamental_analysis").unwrap();
    let resolved = resolve(spec.description, &context()).unwrap();
    assert!(resolved.contains("AAPL"));
    assert!(resolved.contains("2025-06-12"));
  }

  #[test]
  fn task_order_is_news_fund_tech_decision() {
    let order: Vec<String> = get_task_order().into_iter().map(|(_, name)| name).collect();
    assert_eq!(order, vec!["news_collecting", "fundamental_analysis", "technical_analysis", "investment_decision"]);
  }

  #[test]
  fn analyst_tasks_exclude_the_strategist() {
    let tasks = analyst_tasks();
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|spec| spec.role != Role::InvestmentStrategist));
  }
}
