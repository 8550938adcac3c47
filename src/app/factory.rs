use actix_web::{web, App};
use std::sync::Arc;

use crate::app::config::Config;
use crate::app::routes::routes::Routes;

use super::controller::advisor_controllers::AdvisorController;
use super::services::advisor_service::AdvisorService;
use super::services::service::StockAdvisorServices;

#[derive(Clone)]
pub struct AppState {
  pub advisor_controller: Arc<AdvisorController>
}

impl AppState {

  pub fn new(app_config: &Config) -> Self {
    let advisor_service : AdvisorService = AdvisorService::new(app_config.clone());
    let stock_advisor_service: Arc<StockAdvisorServices> = Arc::new(StockAdvisorServices::new(advisor_service));
    let advisor_controller : Arc<AdvisorController> = Arc::new(AdvisorController::new(stock_advisor_service.clone()));
    AppState { advisor_controller }
  }
}

pub struct CreateApp {
  app_state: AppState,
  #[allow(unused)]
  app_settings: Config,
}

impl CreateApp {
  pub fn new(app_settings: Config) -> Self {
    let app_state: AppState = AppState::new(&app_settings);
    CreateApp { app_state, app_settings  }
  }

  pub fn build_app(&self,) -> App<impl actix_web::dev::ServiceFactory<actix_web::dev::ServiceRequest,Config = (),Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,Error = actix_web::Error,InitError = (),>,> {
    App::new()
    .app_data(web::Data::new(self.app_state.advisor_controller.clone()))
    .configure(Routes::configure)
  }
}
