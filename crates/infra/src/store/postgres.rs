//! Postgres-backed store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateName` (unique index on the normalized item name) |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / other | N/A | `Backend` |
//!
//! ## Concurrency
//!
//! Item updates and deletes carry the quantity they were planned against in
//! their `WHERE` clause. Zero affected rows means the item is gone or changed;
//! the transaction is rolled back and the caller gets `NotFound` or
//! `StaleWrite`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use stockroom_core::{ActivityId, ItemId, MovementId, NotificationId, UserId, WasteId};
use stockroom_inventory::{
    ActivityAction, ActivityEntry, Category, InventoryItem, MovementKind, Notification,
    NotificationKind, StockMovement, Unit, WasteRecord, WasteThresholds,
};

use super::{
    Changeset, ItemFilter, ItemWrite, MovementFilter, NotificationFilter, Snapshot, Store,
    StoreError, StoreResult,
};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

const ITEM_COLUMNS: &str = "id, name, category, quantity, unit, min_stock, cost_per_unit, \
     supplier, image_url, last_restocked, created_at, updated_at";

const MOVEMENT_COLUMNS: &str =
    "id, item_id, type, quantity, previous_quantity, new_quantity, reason, cost, created_at";

const WASTE_COLUMNS: &str = "id, item_id, item_name, category, quantity, reason, cost, date";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes that do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    async fn write_item(
        tx: &mut Transaction<'_, Postgres>,
        write: &ItemWrite,
    ) -> StoreResult<()> {
        match write {
            ItemWrite::Insert(item) => {
                sqlx::query(
                    r#"
                    INSERT INTO inventory_items (
                        id, name, category, quantity, unit, min_stock, cost_per_unit,
                        supplier, image_url, last_restocked, created_at, updated_at
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(item.id.as_uuid())
                .bind(&item.name)
                .bind(item.category.code())
                .bind(item.quantity)
                .bind(item.unit.code())
                .bind(item.min_stock)
                .bind(item.cost_per_unit)
                .bind(&item.supplier)
                .bind(&item.image_url)
                .bind(item.last_restocked)
                .bind(item.created_at)
                .bind(item.updated_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| name_conflict_or(item, "insert_item", e))?;
                Ok(())
            }
            ItemWrite::Update {
                item,
                expected_quantity,
            } => {
                let result = sqlx::query(
                    r#"
                    UPDATE inventory_items SET
                        name = $2,
                        category = $3,
                        quantity = $4,
                        unit = $5,
                        min_stock = $6,
                        cost_per_unit = $7,
                        supplier = $8,
                        image_url = $9,
                        last_restocked = $10,
                        updated_at = $11
                    WHERE id = $1 AND quantity = $12
                    "#,
                )
                .bind(item.id.as_uuid())
                .bind(&item.name)
                .bind(item.category.code())
                .bind(item.quantity)
                .bind(item.unit.code())
                .bind(item.min_stock)
                .bind(item.cost_per_unit)
                .bind(&item.supplier)
                .bind(&item.image_url)
                .bind(item.last_restocked)
                .bind(item.updated_at)
                .bind(expected_quantity)
                .execute(&mut **tx)
                .await
                .map_err(|e| name_conflict_or(item, "update_item", e))?;
                if result.rows_affected() == 0 {
                    return Err(Self::missed_write(tx, item.id).await);
                }
                Ok(())
            }
            ItemWrite::Stock {
                id,
                quantity,
                last_restocked,
                updated_at,
                expected_quantity,
            } => {
                let result = sqlx::query(
                    r#"
                    UPDATE inventory_items SET
                        quantity = $2,
                        last_restocked = $3,
                        updated_at = $4
                    WHERE id = $1 AND quantity = $5
                    "#,
                )
                .bind(id.as_uuid())
                .bind(quantity)
                .bind(last_restocked)
                .bind(updated_at)
                .bind(expected_quantity)
                .execute(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("update_stock", e))?;
                if result.rows_affected() == 0 {
                    return Err(Self::missed_write(tx, *id).await);
                }
                Ok(())
            }
            ItemWrite::Delete {
                id,
                expected_quantity,
            } => {
                let result =
                    sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND quantity = $2")
                        .bind(id.as_uuid())
                        .bind(expected_quantity)
                        .execute(&mut **tx)
                        .await
                        .map_err(|e| map_sqlx_error("delete_item", e))?;
                if result.rows_affected() == 0 {
                    return Err(Self::missed_write(tx, *id).await);
                }
                Ok(())
            }
        }
    }

    /// Explain a guarded write that matched no row.
    async fn missed_write(tx: &mut Transaction<'_, Postgres>, id: ItemId) -> StoreError {
        let exists = sqlx::query("SELECT 1 AS present FROM inventory_items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut **tx)
            .await;
        match exists {
            Ok(Some(_)) => StoreError::StaleWrite(id),
            Ok(None) => StoreError::NotFound,
            Err(e) => map_sqlx_error("check_item_exists", e),
        }
    }

    async fn insert_movement(
        tx: &mut Transaction<'_, Postgres>,
        m: &StockMovement,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, item_id, type, quantity, previous_quantity, new_quantity, reason, cost, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(m.id.as_uuid())
        .bind(m.item_id.as_uuid())
        .bind(m.kind.code())
        .bind(m.quantity)
        .bind(m.previous_quantity)
        .bind(m.new_quantity)
        .bind(&m.reason)
        .bind(m.cost)
        .bind(m.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_movement", e))?;
        Ok(())
    }

    async fn insert_waste(tx: &mut Transaction<'_, Postgres>, w: &WasteRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO waste_tracking (id, item_id, item_name, category, quantity, reason, cost, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(w.id.as_uuid())
        .bind(w.item_id.as_uuid())
        .bind(&w.item_name)
        .bind(w.category.code())
        .bind(w.quantity)
        .bind(&w.reason)
        .bind(w.cost)
        .bind(w.date)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_waste", e))?;
        Ok(())
    }

    async fn insert_notification(
        tx: &mut Transaction<'_, Postgres>,
        n: &Notification,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, type, title, message, item_id, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(n.id.as_uuid())
        .bind(n.kind.code())
        .bind(&n.title)
        .bind(&n.message)
        .bind(n.item_id.map(uuid::Uuid::from))
        .bind(n.read)
        .bind(n.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_notification", e))?;
        Ok(())
    }

    async fn insert_activity(
        tx: &mut Transaction<'_, Postgres>,
        a: &ActivityEntry,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (id, item_id, action, quantity, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(a.id.as_uuid())
        .bind(a.item_id.map(uuid::Uuid::from))
        .bind(a.action.code())
        .bind(a.quantity)
        .bind(&a.description)
        .bind(a.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_activity", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for PostgresStore {
    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn get_item(&self, id: ItemId) -> StoreResult<Option<InventoryItem>> {
        let row = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_item", e))?;
        row.map(|r| decode_row::<ItemRow>(&r).map(Into::into))
            .transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_item_by_name(&self, name: &str) -> StoreResult<Option<InventoryItem>> {
        let row = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE lower(btrim(name)) = lower(btrim($1))"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_item_by_name", e))?;
        row.map(|r| decode_row::<ItemRow>(&r).map(Into::into))
            .transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_items(&self, filter: &ItemFilter) -> StoreResult<Vec<InventoryItem>> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE ($1::text IS NULL OR name ILIKE $1)
                AND ($2::text IS NULL OR category = $2)
            ORDER BY lower(name) ASC, id ASC
            "#
        ))
        .bind(pattern)
        .bind(filter.category.map(Category::code))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_items", e))?;
        decode_all::<ItemRow, _>(&rows)
    }

    #[instrument(
        skip(self, changes),
        fields(
            item_id = %changes.item.item_id(),
            notifications = changes.notifications.len()
        ),
        err
    )]
    async fn commit(&self, changes: Changeset) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let applied = async {
            Self::write_item(&mut tx, &changes.item).await?;
            if let Some(m) = &changes.movement {
                Self::insert_movement(&mut tx, m).await?;
            }
            if let Some(w) = &changes.waste {
                Self::insert_waste(&mut tx, w).await?;
            }
            for n in &changes.notifications {
                Self::insert_notification(&mut tx, n).await?;
            }
            Self::insert_activity(&mut tx, &changes.activity).await
        }
        .await;

        if let Err(err) = applied {
            if let Err(e) = tx.rollback().await {
                tracing::error!(error = %e, cause = %err, "rollback failed");
            }
            return Err(err);
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    #[instrument(skip(self), err)]
    async fn list_movements(&self, filter: &MovementFilter) -> StoreResult<Vec<StockMovement>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM stock_movements
            WHERE ($1::uuid IS NULL OR item_id = $1)
                AND ($2::text IS NULL OR type = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#
        ))
        .bind(filter.item_id.map(uuid::Uuid::from))
        .bind(filter.kind.map(MovementKind::code))
        .bind(filter.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_movements", e))?;
        decode_all::<MovementRow, _>(&rows)
    }

    #[instrument(skip(self), fields(item_id = %item_id), err)]
    async fn count_movements(&self, item_id: ItemId) -> StoreResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM stock_movements WHERE item_id = $1")
            .bind(item_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_movements", e))?;
        read_count(&row)
    }

    #[instrument(skip(self), err)]
    async fn snapshot(&self, since: DateTime<Utc>) -> StoreResult<Snapshot> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("set_isolation", e))?;

        let items = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM inventory_items"))
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("snapshot_items", e))?;
        let movements = sqlx::query(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE created_at >= $1"
        ))
        .bind(since)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("snapshot_movements", e))?;
        let waste = sqlx::query(&format!(
            "SELECT {WASTE_COLUMNS} FROM waste_tracking WHERE date >= $1"
        ))
        .bind(since)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("snapshot_waste", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(Snapshot {
            items: decode_all::<ItemRow, _>(&items)?,
            movements: decode_all::<MovementRow, _>(&movements)?,
            waste: decode_all::<WasteRow, _>(&waste)?,
        })
    }

    #[instrument(skip(self), err)]
    async fn list_notifications(&self, filter: &NotificationFilter) -> StoreResult<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, type, title, message, item_id, read, created_at
            FROM notifications
            WHERE (NOT $1 OR NOT read)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(filter.unread_only)
        .bind(filter.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_notifications", e))?;
        decode_all::<NotificationRow, _>(&rows)
    }

    #[instrument(skip(self), err)]
    async fn count_unread_notifications(&self) -> StoreResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM notifications WHERE NOT read")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_unread_notifications", e))?;
        read_count(&row)
    }

    #[instrument(skip(self), fields(notification_id = %id), err)]
    async fn set_notification_read(&self, id: NotificationId, read: bool) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(read)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_notification_read", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn mark_all_notifications_read(&self) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE NOT read")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("mark_all_notifications_read", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(notification_id = %id), err)]
    async fn delete_notification(&self, id: NotificationId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_notification", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete_read_notifications(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE read")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_read_notifications", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn recent_activity(&self, limit: usize) -> StoreResult<Vec<ActivityEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, item_id, action, quantity, description, created_at
            FROM activity_log
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("recent_activity", e))?;
        decode_all::<ActivityRow, _>(&rows)
    }

    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn get_settings(&self, user: UserId) -> StoreResult<Option<WasteThresholds>> {
        let row = sqlx::query(
            r#"
            SELECT waste_safe_threshold, waste_critical_threshold
            FROM system_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_settings", e))?;
        row.map(|r| decode_row::<SettingsRow>(&r).map(Into::into))
            .transpose()
    }

    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn save_settings(&self, user: UserId, thresholds: WasteThresholds) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO system_settings (user_id, waste_safe_threshold, waste_critical_threshold, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                waste_safe_threshold = EXCLUDED.waste_safe_threshold,
                waste_critical_threshold = EXCLUDED.waste_critical_threshold,
                updated_at = NOW()
            "#,
        )
        .bind(user.as_uuid())
        .bind(thresholds.safe)
        .bind(thresholds.critical)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_settings", e))?;
        Ok(())
    }
}

/// ILIKE pattern matching `search` as a literal substring.
fn like_pattern(search: &str) -> String {
    let mut out = String::from("%");
    for c in search.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn read_count(row: &PgRow) -> StoreResult<u64> {
    let total: i64 = row
        .try_get("total")
        .map_err(|e| StoreError::Backend(format!("failed to read count: {e}")))?;
    Ok(total.max(0) as u64)
}

fn decode_row<R>(row: &PgRow) -> StoreResult<R>
where
    R: for<'r> FromRow<'r, PgRow>,
{
    R::from_row(row).map_err(|e| StoreError::Backend(format!("failed to decode row: {e}")))
}

fn decode_all<R, T>(rows: &[PgRow]) -> StoreResult<Vec<T>>
where
    R: for<'r> FromRow<'r, PgRow> + Into<T>,
{
    rows.iter()
        .map(|r| decode_row::<R>(r).map(Into::into))
        .collect()
}

/// Parse a text column holding an enum code.
fn code<T>(column: &str, raw: String, parse: impl Fn(&str) -> Option<T>) -> Result<T, sqlx::Error> {
    parse(&raw).ok_or_else(|| sqlx::Error::Decode(format!("unknown {column} value `{raw}`").into()))
}

fn name_conflict_or(item: &InventoryItem, operation: &str, err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateName(item.name.clone())
    } else {
        map_sqlx_error(operation, err)
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::DuplicateName(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

// SQLx row types

#[derive(Debug)]
struct ItemRow(InventoryItem);

impl<'r> FromRow<'r, PgRow> for ItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow(InventoryItem {
            id: ItemId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            category: code("category", row.try_get("category")?, Category::parse)?,
            quantity: row.try_get("quantity")?,
            unit: code("unit", row.try_get("unit")?, Unit::parse)?,
            min_stock: row.try_get("min_stock")?,
            cost_per_unit: row.try_get("cost_per_unit")?,
            supplier: row.try_get("supplier")?,
            image_url: row.try_get("image_url")?,
            last_restocked: row.try_get("last_restocked")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

impl From<ItemRow> for InventoryItem {
    fn from(row: ItemRow) -> Self {
        row.0
    }
}

#[derive(Debug)]
struct MovementRow(StockMovement);

impl<'r> FromRow<'r, PgRow> for MovementRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(MovementRow(StockMovement {
            id: MovementId::from_uuid(row.try_get("id")?),
            item_id: ItemId::from_uuid(row.try_get("item_id")?),
            kind: code("type", row.try_get("type")?, MovementKind::parse)?,
            quantity: row.try_get("quantity")?,
            previous_quantity: row.try_get("previous_quantity")?,
            new_quantity: row.try_get("new_quantity")?,
            reason: row.try_get("reason")?,
            cost: row.try_get("cost")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}

impl From<MovementRow> for StockMovement {
    fn from(row: MovementRow) -> Self {
        row.0
    }
}

#[derive(Debug)]
struct WasteRow(WasteRecord);

impl<'r> FromRow<'r, PgRow> for WasteRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(WasteRow(WasteRecord {
            id: WasteId::from_uuid(row.try_get("id")?),
            item_id: ItemId::from_uuid(row.try_get("item_id")?),
            item_name: row.try_get("item_name")?,
            category: code("category", row.try_get("category")?, Category::parse)?,
            quantity: row.try_get("quantity")?,
            reason: row.try_get("reason")?,
            cost: row.try_get("cost")?,
            date: row.try_get("date")?,
        }))
    }
}

impl From<WasteRow> for WasteRecord {
    fn from(row: WasteRow) -> Self {
        row.0
    }
}

#[derive(Debug)]
struct NotificationRow(Notification);

impl<'r> FromRow<'r, PgRow> for NotificationRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let item_id: Option<uuid::Uuid> = row.try_get("item_id")?;
        Ok(NotificationRow(Notification {
            id: NotificationId::from_uuid(row.try_get("id")?),
            kind: code("type", row.try_get("type")?, NotificationKind::parse)?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            item_id: item_id.map(ItemId::from_uuid),
            read: row.try_get("read")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        row.0
    }
}

#[derive(Debug)]
struct ActivityRow(ActivityEntry);

impl<'r> FromRow<'r, PgRow> for ActivityRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let item_id: Option<uuid::Uuid> = row.try_get("item_id")?;
        let quantity: Option<Decimal> = row.try_get("quantity")?;
        Ok(ActivityRow(ActivityEntry {
            id: ActivityId::from_uuid(row.try_get("id")?),
            item_id: item_id.map(ItemId::from_uuid),
            action: code("action", row.try_get("action")?, ActivityAction::parse)?,
            quantity,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}

impl From<ActivityRow> for ActivityEntry {
    fn from(row: ActivityRow) -> Self {
        row.0
    }
}

#[derive(Debug)]
struct SettingsRow {
    safe: Decimal,
    critical: Decimal,
}

impl<'r> FromRow<'r, PgRow> for SettingsRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(SettingsRow {
            safe: row.try_get("waste_safe_threshold")?,
            critical: row.try_get("waste_critical_threshold")?,
        })
    }
}

impl From<SettingsRow> for WasteThresholds {
    fn from(row: SettingsRow) -> Self {
        WasteThresholds {
            safe: row.safe,
            critical: row.critical,
        }
    }
}
