use actix_web::{web, HttpResponse, Responder};
use std::{sync::Arc};
use serde::{Serialize, Deserialize};

use crate::{ app::{controller::advisor_controllers::AdvisorController}};

#[derive(Deserialize, Serialize)]
pub struct AdvisorReportRequest {
  symbol: String,
  current_date: Option<String>,
  model_name: Option<String>,
  model_provider: Option<String>,
}


pub struct Routes;

impl Routes {

  #[allow(unused)]
  pub fn new() -> Self {
    Routes {}
  }

  pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(Self::health)));
    cfg.service(web::resource("/advisor/tasks").route(web::get().to(Self::get_tasks)));
    cfg.service(web::resource("/advisor/models").route(web::get().to(Self::get_models)));
    cfg.service(web::resource("/advisor/report").route(web::post().to(Self::report)));
  }

  async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
      "status": "ok",
      "Info": "Welcome to the US Stock Advisor.",
      "code": 200,
    }))
  }

  async fn get_tasks(controller: web::Data<Arc<AdvisorController>>) -> impl Responder {
    match controller.get_available_tasks().await {
      Ok(tasks) => HttpResponse::Ok().json(tasks),
      Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({"error": e.to_string()})),
    }
  }

  async fn get_models(controller: web::Data<Arc<AdvisorController>>) -> impl Responder {
    match controller.get_available_models().await {
      Ok(models) => HttpResponse::Ok().json(models),
      Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({"error": e.to_string()})),
    }
  }

  async fn report(controller: web::Data<Arc<AdvisorController>>, request: web::Json<AdvisorReportRequest>) -> impl Responder {
    let current_date = request.current_date.as_deref();
    let model_name = request.model_name.clone();
    let model_provider = request.model_provider.clone();

    let result = controller.report(&request.symbol, current_date, model_name, model_provider).await;

    match result {
      Ok(report) => HttpResponse::Ok().json(report),
      Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
          "error": e.to_string(),
      }))
    }
  }


}
