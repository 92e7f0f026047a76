//! Restaurant inventory domain: stock ledger, validation and reporting.
//!
//! This crate contains business rules for inventory, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Every function takes
//! the current time explicitly so results are reproducible.

pub mod activity;
pub mod catalog;
pub mod item;
pub mod ledger;
pub mod messages;
pub mod movement;
pub mod notification;
pub mod report;
pub mod settings;
pub mod status;
pub mod validation;
pub mod waste;

pub use activity::{ActivityAction, ActivityEntry};
pub use catalog::{Category, Unit};
pub use item::{InventoryItem, ItemDraft, ItemInput};
pub use ledger::{LedgerError, MovementRequest, Transition, plan_movement, plan_valid_movement};
pub use messages::Localizer;
pub use movement::{MovementKind, StockMovement};
pub use notification::{Notification, NotificationKind};
pub use report::{
    DashboardStats, InventoryLevelPoint, MonthWindow, PeriodSummary, WINDOW_MONTHS, WastePoint,
    dashboard_stats, inventory_level_series, period_summary, waste_series,
};
pub use settings::{ThresholdsPatch, WasteLevel, WasteThresholds};
pub use status::{StockHealth, StockStatus, classify};
pub use validation::{Field, FieldError, StockContext, ValidMovement, ValidationReport, Violation};
pub use waste::WasteRecord;
