pub mod auth;
pub mod config;
pub mod database;
pub mod handlers;
pub mod localization;
pub mod sections;
pub mod utils;
