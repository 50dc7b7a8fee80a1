//! Lendit Item Sharing Marketplace
//!
//! A Rust implementation of the Lendit sharing-marketplace server,
//! providing a REST JSON API for listing items, booking them for date
//! ranges, and requesting items that are not yet in the catalog.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
