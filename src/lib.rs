pub mod config;
pub mod errors;
pub mod ingestor;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod sources;
pub mod utils;
pub mod web;
