//! Persistence boundary.
//!
//! Every mutation goes through [`Store::commit`], which applies one
//! [`Changeset`] atomically: the item write, its ledger entry, the waste row,
//! notifications and the activity entry land together or not at all.
//! Item updates, stock writes and deletes are guarded by the quantity the
//! caller planned against, so a concurrent movement turns into
//! [`StoreError::StaleWrite`] instead of a lost update. Movements write only
//! the stock columns and leave item details to `update_item`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use stockroom_core::{ItemId, NotificationId, UserId};
use stockroom_inventory::{
    ActivityEntry, Category, InventoryItem, MovementKind, Notification, StockMovement, Transition,
    WasteRecord, WasteThresholds,
};

use crate::config::AppConfig;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another item already uses this name (case-insensitive).
    #[error("duplicate item name: {0}")]
    DuplicateName(String),

    /// The item's quantity changed since the write was planned.
    #[error("stale write: item {0} changed concurrently")]
    StaleWrite(ItemId),

    #[error("not found")]
    NotFound,

    /// Backend failure; details are for logs only.
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The single item-row write in a changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemWrite {
    Insert(InventoryItem),
    Update {
        item: InventoryItem,
        expected_quantity: Decimal,
    },
    /// Stock columns only, as written by a movement.
    Stock {
        id: ItemId,
        quantity: Decimal,
        last_restocked: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        expected_quantity: Decimal,
    },
    Delete {
        id: ItemId,
        expected_quantity: Decimal,
    },
}

impl ItemWrite {
    pub fn item_id(&self) -> ItemId {
        match self {
            ItemWrite::Insert(item) | ItemWrite::Update { item, .. } => item.id,
            ItemWrite::Stock { id, .. } | ItemWrite::Delete { id, .. } => *id,
        }
    }
}

/// Records written together by one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    pub item: ItemWrite,
    pub movement: Option<StockMovement>,
    pub waste: Option<WasteRecord>,
    pub notifications: Vec<Notification>,
    pub activity: ActivityEntry,
}

impl Changeset {
    /// Changeset for a planned movement against an existing item.
    pub fn from_transition(transition: Transition) -> Self {
        Self {
            item: ItemWrite::Stock {
                id: transition.item.id,
                quantity: transition.item.quantity,
                last_restocked: transition.item.last_restocked,
                updated_at: transition.item.updated_at,
                expected_quantity: transition.expected_quantity,
            },
            movement: Some(transition.movement),
            waste: transition.waste,
            notifications: transition.notifications,
            activity: transition.activity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    pub category: Option<Category>,
}

impl ItemFilter {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        let by_name = match &self.search {
            Some(s) => item.name.to_lowercase().contains(&s.trim().to_lowercase()),
            None => true,
        };
        let by_category = self.category.is_none_or(|c| c == item.category);
        by_name && by_category
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementFilter {
    pub item_id: Option<ItemId>,
    pub kind: Option<MovementKind>,
    pub limit: usize,
}

impl Default for MovementFilter {
    fn default() -> Self {
        Self {
            item_id: None,
            kind: None,
            limit: 50,
        }
    }
}

impl MovementFilter {
    pub fn matches(&self, m: &StockMovement) -> bool {
        self.item_id.is_none_or(|id| id == m.item_id)
            && self.kind.is_none_or(|k| k == m.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub limit: usize,
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self {
            unread_only: false,
            limit: 20,
        }
    }
}

/// Consistent point-in-time read for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub items: Vec<InventoryItem>,
    /// Movements created at or after the requested instant.
    pub movements: Vec<StockMovement>,
    /// Waste rows dated at or after the requested instant.
    pub waste: Vec<WasteRecord>,
}

impl Snapshot {
    pub fn current_total(&self) -> Decimal {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Storage operations used by the services.
///
/// Implementations must make `commit` all-or-nothing and must keep movement,
/// waste and activity rows when their item is deleted.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn get_item(&self, id: ItemId) -> StoreResult<Option<InventoryItem>>;

    /// Case-insensitive exact name lookup.
    async fn find_item_by_name(&self, name: &str) -> StoreResult<Option<InventoryItem>>;

    /// Matching items ordered by name.
    async fn list_items(&self, filter: &ItemFilter) -> StoreResult<Vec<InventoryItem>>;

    async fn commit(&self, changes: Changeset) -> StoreResult<()>;

    /// Matching movements, newest first.
    async fn list_movements(&self, filter: &MovementFilter) -> StoreResult<Vec<StockMovement>>;

    async fn count_movements(&self, item_id: ItemId) -> StoreResult<u64>;

    async fn snapshot(&self, since: DateTime<Utc>) -> StoreResult<Snapshot>;

    /// Notifications, newest first.
    async fn list_notifications(&self, filter: &NotificationFilter) -> StoreResult<Vec<Notification>>;

    async fn count_unread_notifications(&self) -> StoreResult<u64>;

    /// Returns false if no such notification exists.
    async fn set_notification_read(&self, id: NotificationId, read: bool) -> StoreResult<bool>;

    /// Returns how many notifications changed.
    async fn mark_all_notifications_read(&self) -> StoreResult<u64>;

    /// Returns false if no such notification exists.
    async fn delete_notification(&self, id: NotificationId) -> StoreResult<bool>;

    /// Returns how many notifications were removed.
    async fn delete_read_notifications(&self) -> StoreResult<u64>;

    /// Most recent activity entries, newest first.
    async fn recent_activity(&self, limit: usize) -> StoreResult<Vec<ActivityEntry>>;

    async fn get_settings(&self, user: UserId) -> StoreResult<Option<WasteThresholds>>;

    async fn save_settings(&self, user: UserId, thresholds: WasteThresholds) -> StoreResult<()>;
}

/// Build the configured store: Postgres when `DATABASE_URL` is set, otherwise
/// in-memory.
pub async fn connect(config: &AppConfig) -> StoreResult<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            tracing::info!(max_connections = config.database_max_connections, "using postgres store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}
