use std::env;

use log;

#[derive(Clone)]
pub struct Config {
  pub gemini_api_key: String,
  pub groq_api_key: String,
  pub model: String,
  pub reasoning_model: String,
}

impl Config {

  pub fn load() -> Self {
    match dotenv::dotenv() {
      Ok(_) => log::info!("Loaded .env file"),
      Err(_) => log::error!("No .env file found"),
    }

    let gemini_api_key: String = env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
      log::error!("Warning: GEMINI_API_KEY not found, Gemini requests will fail upstream");
      String::new()
    });
    let groq_api_key: String = env::var("GROQ_API_KEY").unwrap_or_else(|_| {
      log::error!("Warning: GROQ_API_KEY not found, Groq requests will fail upstream");
      String::new()
    });

    // The general model runs the analyst stages, the reasoning model the
    // decision stage, same split as MODEL / MODEL_REASONING in .env.
    let model: String = env::var("MODEL").unwrap_or_else(|_| {
      log::info!("MODEL not set, defaulting to gemini-2.0-flash");
      "gemini-2.0-flash".to_string()
    });
    let reasoning_model: String = env::var("MODEL_REASONING").unwrap_or_else(|_| {
      log::info!("MODEL_REASONING not set, defaulting to gemini-2.5-pro");
      "gemini-2.5-pro".to_string()
    });

    return Config {
      gemini_api_key, groq_api_key, model, reasoning_model
    }
  }

}
