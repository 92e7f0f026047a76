//! Ledger planning: turn a movement request into the full set of records it
//! produces, without touching storage.
//!
//! Persistence applies a [`Transition`] atomically, guarded on the item's
//! previous quantity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{DomainError, MovementId, RawNumber, WasteId};
use thiserror::Error;

use crate::activity::{ActivityAction, ActivityEntry};
use crate::catalog::Unit;
use crate::item::InventoryItem;
use crate::messages::Localizer;
use crate::movement::{MovementKind, StockMovement};
use crate::notification::{Notification, triggered};
use crate::validation::{ValidMovement, ValidationReport, validate_movement};
use crate::waste::WasteRecord;

/// A client's movement submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub quantity: RawNumber,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("movement validation failed ({} errors)", .0.errors().len())]
    Validation(ValidationReport),

    #[error("insufficient stock: {available} {unit} available")]
    InsufficientStock {
        available: Decimal,
        unit: Unit,
        report: ValidationReport,
    },

    #[error(transparent)]
    Invariant(#[from] DomainError),
}

impl From<ValidationReport> for LedgerError {
    fn from(report: ValidationReport) -> Self {
        match report.insufficient_stock() {
            Some((available, unit)) => LedgerError::InsufficientStock {
                available,
                unit,
                report,
            },
            None => LedgerError::Validation(report),
        }
    }
}

/// Everything one accepted movement writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Quantity the item must still have for the write to apply.
    pub expected_quantity: Decimal,
    /// The item after the movement.
    pub item: InventoryItem,
    pub movement: StockMovement,
    pub waste: Option<WasteRecord>,
    pub notifications: Vec<Notification>,
    pub activity: ActivityEntry,
}

/// Validate `request` against `item` and plan the resulting writes.
pub fn plan_movement(
    item: &InventoryItem,
    request: &MovementRequest,
    now: DateTime<Utc>,
    texts: &Localizer,
) -> Result<Transition, LedgerError> {
    let valid = validate_movement(
        &request.kind,
        &request.quantity,
        request.reason.as_deref(),
        item.stock(),
    )?;
    plan_valid_movement(item, valid, now, texts)
}

/// Plan an already-validated movement.
pub fn plan_valid_movement(
    item: &InventoryItem,
    valid: ValidMovement,
    now: DateTime<Utc>,
    texts: &Localizer,
) -> Result<Transition, LedgerError> {
    let ValidMovement {
        kind,
        quantity,
        reason,
    } = valid;

    let previous = item.quantity;
    let new_quantity = kind.resulting_quantity(previous, quantity);
    let cost = kind.cost(quantity, item.cost_per_unit);

    let movement = StockMovement {
        id: MovementId::new(),
        item_id: item.id,
        kind,
        quantity,
        previous_quantity: previous,
        new_quantity,
        reason: reason.clone(),
        cost,
        created_at: now,
    };
    movement.verify()?;

    let mut after = item.clone();
    after.quantity = new_quantity;
    after.updated_at = now;
    if kind == MovementKind::Entrada {
        after.last_restocked = now;
    }

    let waste = match kind {
        MovementKind::Desperdicio => Some(WasteRecord {
            id: WasteId::new(),
            item_id: item.id,
            item_name: item.name.clone(),
            category: item.category,
            quantity,
            reason: reason.clone().unwrap_or_default(),
            cost,
            date: now,
        }),
        MovementKind::Entrada | MovementKind::Saida | MovementKind::Ajuste => None,
    };

    let notifications = triggered(&after, &movement, texts, now);

    let activity = ActivityEntry::new(
        Some(item.id),
        ActivityAction::from(kind),
        Some(quantity),
        texts.movement_description(&item.name, previous, new_quantity, item.unit, reason.as_deref()),
        now,
    );

    Ok(Transition {
        expected_quantity: previous,
        item: after,
        movement,
        waste,
        notifications,
        activity,
    })
}
