pub mod config;
pub mod handlers;
pub mod models;
pub mod poller;
pub mod services;
pub mod startup;
