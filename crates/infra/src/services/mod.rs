//! Application services: orchestrate planning in `stockroom-inventory` and
//! persistence through a [`Store`].
//!
//! ```text
//! request
//!   ↓
//! 1. Load current state from the store
//!   ↓
//! 2. Validate and plan (pure; produces every record to write)
//!   ↓
//! 3. Commit the changeset atomically, guarded on the planned-against quantity
//! ```
//!
//! Services never retry a stale write; the conflict goes back to the caller.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use stockroom_core::{DomainError, ItemId};
use stockroom_inventory::{LedgerError, Localizer, Unit, ValidationReport, WasteThresholds};

use crate::store::{Changeset, Store, StoreError};

mod catalog;
mod ledger;
mod notifications;
mod reporting;
mod settings;

pub use catalog::{ItemOutcome, ItemQuery, MovementView};
pub use ledger::MovementOutcome;
pub use notifications::{NotificationPage, NotificationTarget};

pub const MOVEMENTS_DEFAULT_LIMIT: usize = 50;
pub const MOVEMENTS_MAX_LIMIT: usize = 500;
pub const NOTIFICATIONS_DEFAULT_LIMIT: usize = 20;
pub const NOTIFICATIONS_MAX_LIMIT: usize = 200;
pub const ACTIVITY_DEFAULT_LIMIT: usize = 10;
pub const ACTIVITY_MAX_LIMIT: usize = 100;

/// Requested page size, defaulted and clamped to `1..=max`.
pub(crate) fn page_size(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.unwrap_or(default).clamp(1, max)
}

/// What a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Item,
    Notification,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Item => f.write_str("item"),
            Resource::Notification => f.write_str("notification"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Field-level validation failures.
    #[error("validation failed ({} errors)", .0.errors().len())]
    Validation(ValidationReport),

    #[error("insufficient stock: {available} {unit} available")]
    InsufficientStock {
        available: Decimal,
        unit: Unit,
        report: ValidationReport,
    },

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("duplicate item name: {0}")]
    DuplicateName(String),

    /// The item changed between read and write; the caller may re-submit.
    #[error("item {0} was modified concurrently")]
    StaleWrite(ItemId),

    /// Storage failure. The detail is logged, never shown to users.
    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error(transparent)]
    Invariant(#[from] DomainError),
}

impl From<LedgerError> for ServiceError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::Validation(report) => ServiceError::Validation(report),
            LedgerError::InsufficientStock {
                available,
                unit,
                report,
            } => ServiceError::InsufficientStock {
                available,
                unit,
                report,
            },
            LedgerError::Invariant(e) => ServiceError::Invariant(e),
        }
    }
}

impl From<ValidationReport> for ServiceError {
    fn from(report: ValidationReport) -> Self {
        LedgerError::from(report).into()
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateName(name) => ServiceError::DuplicateName(name),
            StoreError::StaleWrite(id) => ServiceError::StaleWrite(id),
            StoreError::NotFound => ServiceError::NotFound(Resource::Item),
            StoreError::Backend(msg) => ServiceError::Persistence(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Inventory application service.
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn Store>,
    texts: Localizer,
    default_thresholds: WasteThresholds,
}

impl fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryService")
            .field("texts", &self.texts)
            .field("default_thresholds", &self.default_thresholds)
            .finish_non_exhaustive()
    }
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>, texts: Localizer, default_thresholds: WasteThresholds) -> Self {
        Self {
            store,
            texts,
            default_thresholds,
        }
    }

    pub fn texts(&self) -> &Localizer {
        &self.texts
    }

    /// Commit, logging backend failures in full before they are generalized.
    async fn commit(&self, changes: Changeset) -> ServiceResult<()> {
        let item_id = changes.item.item_id();
        self.store.commit(changes).await.map_err(|err| {
            match &err {
                StoreError::Backend(detail) => {
                    tracing::error!(%item_id, error = %detail, "commit failed")
                }
                StoreError::StaleWrite(_) => {
                    tracing::warn!(%item_id, "stale write rejected")
                }
                StoreError::DuplicateName(_) | StoreError::NotFound => {}
            }
            ServiceError::from(err)
        })
    }

    /// Map a failed store call, logging backend failures in full.
    fn store_failed(operation: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
        move |err| {
            if let StoreError::Backend(detail) = &err {
                tracing::error!(operation, error = %detail, "store call failed");
            }
            ServiceError::from(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(page_size(None, 50, 500), 50);
        assert_eq!(page_size(Some(0), 50, 500), 1);
        assert_eq!(page_size(Some(10_000), 50, 500), 500);
        assert_eq!(page_size(Some(7), 50, 500), 7);
    }

    #[test]
    fn store_errors_map_to_service_errors() {
        let id = ItemId::new();
        assert_eq!(
            ServiceError::from(StoreError::StaleWrite(id)),
            ServiceError::StaleWrite(id)
        );
        assert_eq!(
            ServiceError::from(StoreError::NotFound),
            ServiceError::NotFound(Resource::Item)
        );
        assert!(matches!(
            ServiceError::from(StoreError::Backend("boom".into())),
            ServiceError::Persistence(_)
        ));
    }
}
