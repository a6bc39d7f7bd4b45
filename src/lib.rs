pub mod config;
pub mod domain;
pub mod form;
pub mod intake;
pub mod record_store;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod webhook_client;
