use std::sync::Arc;

use stockroom_core::Locale;
use stockroom_infra::store::{self, Store, StoreError};
use stockroom_infra::{AppConfig, InventoryService};
use stockroom_inventory::WasteThresholds;

/// Shared state handed to every protected route.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub inventory: InventoryService,
    pub locale: Locale,
    pub currency: String,
    pub default_thresholds: WasteThresholds,
    pub notification_poll_seconds: u64,
}

impl AppServices {
    pub fn new(config: &AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            inventory: InventoryService::new(store, config.localizer(), config.waste_thresholds),
            locale: config.locale,
            currency: config.currency.clone(),
            default_thresholds: config.waste_thresholds,
            notification_poll_seconds: config.notification_poll_seconds,
        }
    }
}

/// Connect the configured store and wire the services on top of it.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store = store::connect(config).await?;
    Ok(AppServices::new(config, store))
}
