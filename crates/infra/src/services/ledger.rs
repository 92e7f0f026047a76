use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use stockroom_core::ItemId;
use stockroom_inventory::{InventoryItem, MovementRequest, Notification, StockMovement, plan_movement};

use super::{InventoryService, Resource, ServiceError, ServiceResult};
use crate::store::Changeset;

/// Result of an accepted movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementOutcome {
    pub item: InventoryItem,
    pub movement: StockMovement,
    pub notifications: Vec<Notification>,
}

impl MovementOutcome {
    pub fn new_quantity(&self) -> Decimal {
        self.movement.new_quantity
    }
}

impl InventoryService {
    /// Validate and apply one stock movement.
    ///
    /// The item update, ledger entry, waste row, notifications and activity
    /// entry are committed together. If the item's stock moved since it was
    /// read, nothing is written and [`ServiceError::StaleWrite`] is returned.
    #[instrument(skip(self, request), fields(%item_id, kind = %request.kind), err)]
    pub async fn apply_movement(
        &self,
        item_id: ItemId,
        request: &MovementRequest,
    ) -> ServiceResult<MovementOutcome> {
        let item = self
            .store
            .get_item(item_id)
            .await
            .map_err(Self::store_failed("get_item"))?
            .ok_or(ServiceError::NotFound(Resource::Item))?;

        let transition = plan_movement(&item, request, Utc::now(), &self.texts)?;
        let outcome = MovementOutcome {
            item: transition.item.clone(),
            movement: transition.movement.clone(),
            notifications: transition.notifications.clone(),
        };

        if let Err(err) = self.commit(Changeset::from_transition(transition)).await {
            tracing::error!(
                %item_id,
                kind = outcome.movement.kind.code(),
                quantity = %outcome.movement.quantity,
                previous_quantity = %outcome.movement.previous_quantity,
                new_quantity = %outcome.movement.new_quantity,
                error = %err,
                "movement not recorded"
            );
            return Err(err);
        }

        tracing::info!(
            %item_id,
            kind = outcome.movement.kind.code(),
            previous_quantity = %outcome.movement.previous_quantity,
            new_quantity = %outcome.movement.new_quantity,
            notifications = outcome.notifications.len(),
            "movement recorded"
        );
        Ok(outcome)
    }
}
