//! Infrastructure layer: configuration, persistence and application services.

pub mod config;
pub mod services;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use services::{InventoryService, ServiceError};
pub use store::{Store, StoreError};
