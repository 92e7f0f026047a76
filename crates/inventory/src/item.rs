use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{Entity, ItemId, RawNumber, two_places};

use crate::catalog::{Category, Unit};
use crate::status::{StockHealth, classify};
use crate::validation::{StockContext, ValidationReport, validate_item};

/// A stocked product.
///
/// `quantity` is only ever changed through the ledger, so every change has a
/// matching `StockMovement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub quantity: Decimal,
    pub unit: Unit,
    pub min_stock: Decimal,
    pub cost_per_unit: Decimal,
    pub supplier: Option<String>,
    pub image_url: Option<String>,
    pub last_restocked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// New item with empty stock. Initial stock is booked as an inflow afterwards.
    pub fn from_draft(draft: &ItemDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::new(),
            name: draft.name.clone(),
            category: draft.category,
            quantity: two_places(Decimal::ZERO),
            unit: draft.unit,
            min_stock: draft.min_stock,
            cost_per_unit: draft.cost_per_unit,
            supplier: draft.supplier.clone(),
            image_url: draft.image_url.clone(),
            last_restocked: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this item with every field from `draft` except quantity.
    pub fn with_details(&self, draft: &ItemDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category,
            unit: draft.unit,
            min_stock: draft.min_stock,
            cost_per_unit: draft.cost_per_unit,
            supplier: draft.supplier.clone(),
            image_url: draft.image_url.clone(),
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn health(&self) -> StockHealth {
        classify(self.quantity, self.min_stock)
    }

    /// Stock value at cost.
    pub fn value(&self) -> Decimal {
        two_places(self.quantity * self.cost_per_unit)
    }

    pub fn stock(&self) -> StockContext {
        StockContext {
            quantity: self.quantity,
            unit: self.unit,
        }
    }

    /// Case-insensitive name comparison used for uniqueness.
    pub fn same_name(&self, other: &str) -> bool {
        self.name.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Unvalidated create/edit form as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub quantity: RawNumber,
    #[serde(default)]
    pub unit: String,
    pub min_stock: RawNumber,
    pub cost_per_unit: RawNumber,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ItemInput {
    pub fn validate(&self) -> Result<(ItemDraft, ValidationReport), ValidationReport> {
        validate_item(self)
    }
}

/// Validated, normalised item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub category: Category,
    pub quantity: Decimal,
    pub unit: Unit,
    pub min_stock: Decimal,
    pub cost_per_unit: Decimal,
    pub supplier: Option<String>,
    pub image_url: Option<String>,
}
