use tracing::instrument;

use stockroom_core::UserId;
use stockroom_inventory::{ThresholdsPatch, WasteThresholds};

use super::{InventoryService, ServiceResult};

impl InventoryService {
    /// The user's waste thresholds, or the configured defaults.
    #[instrument(skip(self), fields(%user), err)]
    pub async fn settings(&self, user: UserId) -> ServiceResult<WasteThresholds> {
        let stored = self
            .store
            .get_settings(user)
            .await
            .map_err(Self::store_failed("get_settings"))?;
        Ok(stored.unwrap_or(self.default_thresholds))
    }

    /// Merge `patch` into the current thresholds and save the result.
    #[instrument(skip(self, patch), fields(%user), err)]
    pub async fn update_settings(
        &self,
        user: UserId,
        patch: &ThresholdsPatch,
    ) -> ServiceResult<WasteThresholds> {
        let current = self.settings(user).await?;
        let next = patch.apply(current)?;
        self.store
            .save_settings(user, next)
            .await
            .map_err(Self::store_failed("save_settings"))?;
        tracing::info!(%user, safe = %next.safe, critical = %next.critical, "waste thresholds saved");
        Ok(next)
    }
}
