pub mod advisor_service;
pub mod service;
