//! Alerts derived from ledger transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{Entity, ItemId, NotificationId};

use crate::item::InventoryItem;
use crate::messages::Localizer;
use crate::movement::{MovementKind, StockMovement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LowStock,
    CriticalStock,
    Waste,
    Restock,
    Info,
}

impl NotificationKind {
    pub fn code(self) -> &'static str {
        match self {
            NotificationKind::LowStock => "low_stock",
            NotificationKind::CriticalStock => "critical_stock",
            NotificationKind::Waste => "waste",
            NotificationKind::Restock => "restock",
            NotificationKind::Info => "info",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            NotificationKind::LowStock,
            NotificationKind::CriticalStock,
            NotificationKind::Waste,
            NotificationKind::Restock,
            NotificationKind::Info,
        ]
        .into_iter()
        .find(|k| k.code() == s.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub item_id: Option<ItemId>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        item_id: Option<ItemId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            title: title.into(),
            message: message.into(),
            item_id,
            read: false,
            created_at: now,
        }
    }
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Notifications owed for `movement`, given the item state after it applied.
///
/// A stock alert fires whenever the new quantity is at or under the minimum:
/// critical at or under 30% of it, low otherwise. A zero minimum alerts only
/// when stock reaches zero, and then as critical. Waste always alerts,
/// independently of the stock alert. Duplicates are not suppressed.
pub fn triggered(
    item: &InventoryItem,
    movement: &StockMovement,
    texts: &Localizer,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut out = Vec::new();
    let new = movement.new_quantity;
    let min = item.min_stock;

    if new <= min {
        let critical = new * Decimal::TEN <= min * Decimal::from(3);
        let (kind, title) = if critical {
            (NotificationKind::CriticalStock, texts.critical_stock_title())
        } else {
            (NotificationKind::LowStock, texts.low_stock_title())
        };
        out.push(Notification::new(
            kind,
            title,
            texts.stock_alert_message(&item.name, new, min, item.unit),
            Some(item.id),
            now,
        ));
    }

    if movement.kind == MovementKind::Desperdicio {
        out.push(Notification::new(
            NotificationKind::Waste,
            texts.waste_title(),
            texts.waste_message(
                &item.name,
                movement.quantity,
                item.unit,
                movement.cost,
                movement.reason.as_deref().unwrap_or_default(),
            ),
            Some(item.id),
            now,
        ));
    }

    out
}
