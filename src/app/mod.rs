pub mod config;
pub mod factory;
pub mod controller;
pub mod routes;
pub mod services;
