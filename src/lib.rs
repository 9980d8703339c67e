pub mod configuration;
pub mod domain;
pub mod form;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
mod utils;
