use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use stockroom_core::ItemId;
use stockroom_inventory::{
    ActivityAction, ActivityEntry, Category, FieldError, InventoryItem, ItemDraft, ItemInput,
    MovementKind, StockMovement, StockStatus, ValidMovement, plan_valid_movement,
};

use super::{
    InventoryService, MOVEMENTS_DEFAULT_LIMIT, MOVEMENTS_MAX_LIMIT, Resource, ServiceError,
    ServiceResult, page_size,
};
use crate::store::{Changeset, ItemFilter, ItemWrite, MovementFilter};

/// Item listing criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub status: Option<StockStatus>,
}

/// A created or updated item, plus advisory warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: InventoryItem,
    pub warnings: Vec<FieldError>,
}

/// A ledger entry with its item's current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementView {
    #[serde(flatten)]
    pub movement: StockMovement,
    pub item_name: String,
}

impl InventoryService {
    #[instrument(skip(self), fields(%id), err)]
    pub async fn get_item(&self, id: ItemId) -> ServiceResult<InventoryItem> {
        self.store
            .get_item(id)
            .await
            .map_err(Self::store_failed("get_item"))?
            .ok_or(ServiceError::NotFound(Resource::Item))
    }

    /// Items matching `query`, ordered by name.
    #[instrument(skip(self), err)]
    pub async fn list_items(&self, query: &ItemQuery) -> ServiceResult<Vec<InventoryItem>> {
        let filter = ItemFilter {
            search: query.search.clone().filter(|s| !s.trim().is_empty()),
            category: query.category,
        };
        let mut items = self
            .store
            .list_items(&filter)
            .await
            .map_err(Self::store_failed("list_items"))?;
        if let Some(status) = query.status {
            items.retain(|i| i.health().status == status);
        }
        Ok(items)
    }

    /// Create an item. A positive initial quantity is booked as an inflow so
    /// the ledger accounts for every unit in stock.
    #[instrument(skip(self, input), fields(name = %input.name), err)]
    pub async fn create_item(&self, input: &ItemInput) -> ServiceResult<ItemOutcome> {
        let (draft, warnings) = input.validate()?;
        self.ensure_name_free(&draft, None).await?;

        let now = Utc::now();
        let empty = InventoryItem::from_draft(&draft, now);
        let activity = ActivityEntry::new(
            Some(empty.id),
            ActivityAction::Add,
            Some(draft.quantity),
            self.texts.item_added(&draft.name),
            now,
        );

        let (item, movement, notifications) = if draft.quantity > Decimal::ZERO {
            let opening = ValidMovement {
                kind: MovementKind::Entrada,
                quantity: draft.quantity,
                reason: Some(self.texts.initial_stock_reason().to_string()),
            };
            let transition = plan_valid_movement(&empty, opening, now, &self.texts)?;
            (transition.item, Some(transition.movement), transition.notifications)
        } else {
            (empty, None, Vec::new())
        };

        let changes = Changeset {
            item: ItemWrite::Insert(item.clone()),
            movement,
            waste: None,
            notifications,
            activity,
        };
        self.commit(changes).await?;
        tracing::info!(item_id = %item.id, quantity = %item.quantity, "item created");

        Ok(ItemOutcome {
            item,
            warnings: warnings.warnings().to_vec(),
        })
    }

    /// Update an item's details. A changed quantity goes through the ledger as
    /// an adjustment to the new value.
    #[instrument(skip(self, input), fields(%id), err)]
    pub async fn update_item(&self, id: ItemId, input: &ItemInput) -> ServiceResult<ItemOutcome> {
        let (draft, warnings) = input.validate()?;
        let current = self.get_item(id).await?;
        self.ensure_name_free(&draft, Some(id)).await?;

        let now = Utc::now();
        let updated = current.with_details(&draft, now);
        let difference = draft.quantity - current.quantity;

        let (item, movement, notifications, activity) = if difference.is_zero() {
            let activity = ActivityEntry::new(
                Some(id),
                ActivityAction::Update,
                None,
                self.texts.item_updated(&draft.name),
                now,
            );
            (updated, None, Vec::new(), activity)
        } else {
            let adjustment = ValidMovement {
                kind: MovementKind::Ajuste,
                quantity: draft.quantity,
                reason: None,
            };
            let transition = plan_valid_movement(&updated, adjustment, now, &self.texts)?;
            let activity = ActivityEntry::new(
                Some(id),
                ActivityAction::Update,
                Some(difference),
                self.texts.stock_adjusted(&draft.name, difference, draft.unit),
                now,
            );
            (
                transition.item,
                Some(transition.movement),
                transition.notifications,
                activity,
            )
        };

        let changes = Changeset {
            item: ItemWrite::Update {
                item: item.clone(),
                expected_quantity: current.quantity,
            },
            movement,
            waste: None,
            notifications,
            activity,
        };
        self.commit(changes).await?;
        tracing::info!(item_id = %id, %difference, "item updated");

        Ok(ItemOutcome {
            item,
            warnings: warnings.warnings().to_vec(),
        })
    }

    /// Delete an item. History rows keep their reference to it.
    #[instrument(skip(self), fields(%id), err)]
    pub async fn delete_item(&self, id: ItemId) -> ServiceResult<()> {
        let current = self.get_item(id).await?;
        let history = self
            .store
            .count_movements(id)
            .await
            .map_err(Self::store_failed("count_movements"))?;

        let changes = Changeset {
            item: ItemWrite::Delete {
                id,
                expected_quantity: current.quantity,
            },
            movement: None,
            waste: None,
            notifications: Vec::new(),
            activity: ActivityEntry::new(
                None,
                ActivityAction::Delete,
                None,
                self.texts.item_removed(&current.name, history),
                Utc::now(),
            ),
        };
        self.commit(changes).await?;
        tracing::info!(item_id = %id, history, "item deleted");
        Ok(())
    }

    /// Ledger entries newest first, with item names resolved.
    #[instrument(skip(self), err)]
    pub async fn list_movements(
        &self,
        item_id: Option<ItemId>,
        kind: Option<MovementKind>,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<MovementView>> {
        let filter = MovementFilter {
            item_id,
            kind,
            limit: page_size(limit, MOVEMENTS_DEFAULT_LIMIT, MOVEMENTS_MAX_LIMIT),
        };
        let movements = self
            .store
            .list_movements(&filter)
            .await
            .map_err(Self::store_failed("list_movements"))?;
        let items = self
            .store
            .list_items(&ItemFilter::default())
            .await
            .map_err(Self::store_failed("list_items"))?;
        let names: HashMap<ItemId, String> = items.into_iter().map(|i| (i.id, i.name)).collect();

        Ok(movements
            .into_iter()
            .map(|movement| MovementView {
                item_name: names
                    .get(&movement.item_id)
                    .cloned()
                    .unwrap_or_else(|| self.texts.removed_item_name().to_string()),
                movement,
            })
            .collect())
    }

    async fn ensure_name_free(&self, draft: &ItemDraft, except: Option<ItemId>) -> ServiceResult<()> {
        let existing = self
            .store
            .find_item_by_name(&draft.name)
            .await
            .map_err(Self::store_failed("find_item_by_name"))?;
        match existing {
            Some(other) if Some(other.id) != except => {
                Err(ServiceError::DuplicateName(draft.name.clone()))
            }
            _ => Ok(()),
        }
    }
}
