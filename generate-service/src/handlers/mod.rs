//! HTTP handlers for the generate service.

pub mod generate;
pub mod health;
pub mod metrics;
