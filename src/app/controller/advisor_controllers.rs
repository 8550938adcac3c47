use std::sync::Arc;
use std::collections::HashMap;
use anyhow::Error;

use crate::advisor::pipeline::runner::AdvisorReport;
use crate::app::services::service::StockAdvisorServices;

pub struct AdvisorController {
  services : Arc<StockAdvisorServices>
}

impl AdvisorController {
  pub fn new(services: Arc<StockAdvisorServices>) -> Self {
    AdvisorController { services: services }
  }

  pub async fn get_available_tasks(&self) -> Result<Vec<HashMap<String, String>>, Error> {
    return self.services.get_available_tasks();
  }

  pub async fn get_available_models(&self) -> Result<Vec<HashMap<String, String>>, Error> {
    return self.services.get_available_models();
  }

  pub async fn report(&self, symbol: &str, current_date: Option<&str>,
                      model_name: Option<String>, model_provider: Option<String>) -> Result<AdvisorReport, Error> {

    let result = self.services.report(symbol, current_date, model_name, model_provider).await;
    if let Err(e) = &result {
      log::error!("Report pipeline failed for {}: {}", symbol, e);
    }
    return result;
  }

}
