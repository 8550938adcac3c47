use super::advisor_service::AdvisorService;
use crate::advisor::llm::models::get_available_models;
use crate::advisor::pipeline::runner::AdvisorReport;
use crate::advisor::tasks::spec::get_task_order;

use std::collections::HashMap;
use chrono::{NaiveDate, Local};
use anyhow::{anyhow, Error, Ok};
use std::result::Result;
use std::option::Option;


pub struct StockAdvisorServices {
  advisor_service : AdvisorService
}

impl StockAdvisorServices {

  pub fn new(advisor_service: AdvisorService) -> Self {
    StockAdvisorServices { advisor_service: advisor_service }
  }

  pub fn get_available_models(&self) -> Result<Vec<HashMap<String, String>>, Error> {
    let models = get_available_models().iter().map(|model| {
      let mut map = HashMap::new();
      map.insert("display_name".to_string(), model.display_name.clone());
      map.insert("model_name".to_string(), model.model_name.clone());
      map.insert("provider".to_string(), model.provider.to_string());
      map
    }).collect();

    return Ok(models);
  }

  pub fn get_available_tasks(&self) -> Result<Vec<HashMap<String, String>>, Error> {
    let tasks = get_task_order().iter().map(|(display_name, key)| {
      let mut map = HashMap::new();
      map.insert("display_name".to_string(), display_name.to_string());
      map.insert("key".to_string(), key.to_string());
      map
    }).collect();

    return Ok(tasks);
  }

  pub async fn report(&self, symbol: &str, current_date: Option<&str>,
                      model_name: Option<String>, model_provider: Option<String>) -> Result<AdvisorReport, Error> {

    if symbol.trim().is_empty() {
      return Err(anyhow!("symbol must not be empty"));
    }

    let current_date: NaiveDate = match current_date {
      Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid current_date {:?}: {}", date, e))?,
      None => Local::now().naive_local().date(),
    };

    return self.advisor_service.run_report(
      symbol,
      current_date,
      model_name.as_deref(),
      model_provider.as_deref(),
    ).await;
  }

}
