use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{Entity, ItemId, WasteId};

use crate::catalog::Category;

/// Loss row written for every `desperdicio` movement.
///
/// Name and category are snapshotted so reports stay readable after the item is
/// renamed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteRecord {
    pub id: WasteId,
    pub item_id: ItemId,
    pub item_name: String,
    pub category: Category,
    pub quantity: Decimal,
    pub reason: String,
    pub cost: Decimal,
    pub date: DateTime<Utc>,
}

impl Entity for WasteRecord {
    type Id = WasteId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
