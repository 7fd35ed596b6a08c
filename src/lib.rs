pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use crate::config::AppConfig;
pub use crate::db::create_pool;
pub use crate::error::PricingError;
pub use crate::service::{PricingCalculator, TemplateService};
