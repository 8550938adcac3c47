pub mod model_provider;
pub mod gemini;
pub mod groq;
pub mod models;
