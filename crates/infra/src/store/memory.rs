//! In-memory store for tests/dev.
//!
//! All tables sit behind one lock, so a commit is trivially atomic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use stockroom_core::{Entity, ItemId, NotificationId, UserId};
use stockroom_inventory::{
    ActivityEntry, InventoryItem, Notification, StockMovement, WasteRecord, WasteThresholds,
};

use super::{
    Changeset, ItemFilter, ItemWrite, MovementFilter, NotificationFilter, Snapshot, Store,
    StoreError, StoreResult,
};

/// Rows keyed by their entity id.
#[derive(Debug)]
struct Table<E: Entity> {
    rows: HashMap<E::Id, E>,
}

impl<E: Entity + Clone> Table<E> {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    fn get(&self, id: &E::Id) -> Option<&E> {
        self.rows.get(id)
    }

    fn get_mut(&mut self, id: &E::Id) -> Option<&mut E> {
        self.rows.get_mut(id)
    }

    fn insert(&mut self, row: E) {
        self.rows.insert(row.id(), row);
    }

    fn remove(&mut self, id: &E::Id) -> Option<E> {
        self.rows.remove(id)
    }

    fn values(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    fn filtered(&self, keep: impl Fn(&E) -> bool) -> Vec<E> {
        self.rows.values().filter(|r| keep(r)).cloned().collect()
    }
}

#[derive(Debug)]
struct Tables {
    items: Table<InventoryItem>,
    movements: Table<StockMovement>,
    waste: Table<WasteRecord>,
    notifications: Table<Notification>,
    activity: Table<ActivityEntry>,
    settings: HashMap<UserId, WasteThresholds>,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<ItemId>) -> bool {
        self.items
            .values()
            .any(|i| Some(i.id) != except && i.same_name(name))
    }

    fn check_expected(&self, id: ItemId, expected: rust_decimal::Decimal) -> StoreResult<()> {
        match self.items.get(&id) {
            None => Err(StoreError::NotFound),
            Some(current) if current.quantity != expected => Err(StoreError::StaleWrite(id)),
            Some(_) => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables {
                items: Table::new(),
                movements: Table::new(),
                waste: Table::new(),
                notifications: Table::new(),
                activity: Table::new(),
                settings: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first<T>(rows: &mut [T], at: impl Fn(&T) -> (DateTime<Utc>, uuid::Uuid)) {
    rows.sort_by(|a, b| at(b).cmp(&at(a)));
}

#[async_trait::async_trait]
impl Store for InMemoryStore {
    async fn get_item(&self, id: ItemId) -> StoreResult<Option<InventoryItem>> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn find_item_by_name(&self, name: &str) -> StoreResult<Option<InventoryItem>> {
        let tables = self.read()?;
        Ok(tables.items.values().find(|i| i.same_name(name)).cloned())
    }

    async fn list_items(&self, filter: &ItemFilter) -> StoreResult<Vec<InventoryItem>> {
        let mut items = self.read()?.items.filtered(|i| filter.matches(i));
        items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(items)
    }

    async fn commit(&self, changes: Changeset) -> StoreResult<()> {
        let mut tables = self.write()?;

        // Check everything before touching any table.
        match &changes.item {
            ItemWrite::Insert(item) => {
                if tables.name_taken(&item.name, None) {
                    return Err(StoreError::DuplicateName(item.name.clone()));
                }
            }
            ItemWrite::Update {
                item,
                expected_quantity,
            } => {
                tables.check_expected(item.id, *expected_quantity)?;
                if tables.name_taken(&item.name, Some(item.id)) {
                    return Err(StoreError::DuplicateName(item.name.clone()));
                }
            }
            ItemWrite::Stock {
                id,
                expected_quantity,
                ..
            }
            | ItemWrite::Delete {
                id,
                expected_quantity,
            } => tables.check_expected(*id, *expected_quantity)?,
        }

        match changes.item {
            ItemWrite::Insert(item) | ItemWrite::Update { item, .. } => tables.items.insert(item),
            ItemWrite::Stock {
                id,
                quantity,
                last_restocked,
                updated_at,
                ..
            } => {
                let item = tables.items.get_mut(&id).ok_or(StoreError::NotFound)?;
                item.quantity = quantity;
                item.last_restocked = last_restocked;
                item.updated_at = updated_at;
            }
            ItemWrite::Delete { id, .. } => {
                tables.items.remove(&id);
            }
        }
        if let Some(movement) = changes.movement {
            tables.movements.insert(movement);
        }
        if let Some(waste) = changes.waste {
            tables.waste.insert(waste);
        }
        for n in changes.notifications {
            tables.notifications.insert(n);
        }
        tables.activity.insert(changes.activity);
        Ok(())
    }

    async fn list_movements(&self, filter: &MovementFilter) -> StoreResult<Vec<StockMovement>> {
        let mut rows = self.read()?.movements.filtered(|m| filter.matches(m));
        newest_first(&mut rows, |m| (m.created_at, *m.id.as_uuid()));
        rows.truncate(filter.limit);
        Ok(rows)
    }

    async fn count_movements(&self, item_id: ItemId) -> StoreResult<u64> {
        let tables = self.read()?;
        Ok(tables.movements.values().filter(|m| m.item_id == item_id).count() as u64)
    }

    async fn snapshot(&self, since: DateTime<Utc>) -> StoreResult<Snapshot> {
        let tables = self.read()?;
        Ok(Snapshot {
            items: tables.items.filtered(|_| true),
            movements: tables.movements.filtered(|m| m.created_at >= since),
            waste: tables.waste.filtered(|w| w.date >= since),
        })
    }

    async fn list_notifications(&self, filter: &NotificationFilter) -> StoreResult<Vec<Notification>> {
        let mut rows = self
            .read()?
            .notifications
            .filtered(|n| !filter.unread_only || !n.read);
        newest_first(&mut rows, |n| (n.created_at, *n.id.as_uuid()));
        rows.truncate(filter.limit);
        Ok(rows)
    }

    async fn count_unread_notifications(&self) -> StoreResult<u64> {
        let tables = self.read()?;
        Ok(tables.notifications.values().filter(|n| !n.read).count() as u64)
    }

    async fn set_notification_read(&self, id: NotificationId, read: bool) -> StoreResult<bool> {
        let mut tables = self.write()?;
        match tables.notifications.get_mut(&id) {
            Some(n) => {
                n.read = read;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_notifications_read(&self) -> StoreResult<u64> {
        let mut tables = self.write()?;
        let mut changed = 0;
        for n in tables.notifications.rows.values_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_notification(&self, id: NotificationId) -> StoreResult<bool> {
        Ok(self.write()?.notifications.remove(&id).is_some())
    }

    async fn delete_read_notifications(&self) -> StoreResult<u64> {
        let mut tables = self.write()?;
        let before = tables.notifications.rows.len();
        tables.notifications.rows.retain(|_, n| !n.read);
        Ok((before - tables.notifications.rows.len()) as u64)
    }

    async fn recent_activity(&self, limit: usize) -> StoreResult<Vec<ActivityEntry>> {
        let mut rows = self.read()?.activity.filtered(|_| true);
        newest_first(&mut rows, |a| (a.created_at, *a.id.as_uuid()));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn get_settings(&self, user: UserId) -> StoreResult<Option<WasteThresholds>> {
        Ok(self.read()?.settings.get(&user).copied())
    }

    async fn save_settings(&self, user: UserId, thresholds: WasteThresholds) -> StoreResult<()> {
        self.write()?.settings.insert(user, thresholds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockroom_core::ActivityId;
    use stockroom_inventory::{ActivityAction, Category, Unit};

    fn item(name: &str, quantity: rust_decimal::Decimal) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: ItemId::new(),
            name: name.to_string(),
            category: Category::Bebidas,
            quantity,
            unit: Unit::L,
            min_stock: dec!(5),
            cost_per_unit: dec!(3.50),
            supplier: None,
            image_url: None,
            last_restocked: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn activity(item_id: Option<ItemId>) -> ActivityEntry {
        ActivityEntry {
            id: ActivityId::new(),
            item_id,
            action: ActivityAction::Add,
            quantity: None,
            description: "test".to_string(),
            created_at: Utc::now(),
        }
    }

    fn insert(it: &InventoryItem) -> Changeset {
        Changeset {
            item: ItemWrite::Insert(it.clone()),
            movement: None,
            waste: None,
            notifications: vec![],
            activity: activity(Some(it.id)),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_names_case_insensitively() {
        let store = InMemoryStore::new();
        store.commit(insert(&item("Suco de Laranja", dec!(1)))).await.unwrap();
        let err = store
            .commit(insert(&item("  suco de laranja ", dec!(1))))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(store.recent_activity(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_update_writes_nothing() {
        let store = InMemoryStore::new();
        let it = item("Água", dec!(10));
        store.commit(insert(&it)).await.unwrap();

        let mut changed = it.clone();
        changed.quantity = dec!(4);
        let err = store
            .commit(Changeset {
                item: ItemWrite::Update {
                    item: changed,
                    expected_quantity: dec!(9),
                },
                movement: None,
                waste: None,
                notifications: vec![],
                activity: activity(Some(it.id)),
            })
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::StaleWrite(it.id));
        assert_eq!(store.get_item(it.id).await.unwrap().unwrap().quantity, dec!(10));
        assert_eq!(store.recent_activity(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_items_filters_and_sorts() {
        let store = InMemoryStore::new();
        for name in ["cerveja", "Água", "Café"] {
            store.commit(insert(&item(name, dec!(1)))).await.unwrap();
        }
        let all = store.list_items(&ItemFilter::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Café", "cerveja", "Água"]);

        let filter = ItemFilter {
            search: Some("CAF".to_string()),
            category: None,
        };
        assert_eq!(store.list_items(&filter).await.unwrap().len(), 1);
    }
}
