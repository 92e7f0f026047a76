//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod decimal;
pub mod entity;
pub mod error;
pub mod id;
pub mod locale;

pub use decimal::{RawNumber, two_places};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ActivityId, ItemId, MovementId, NotificationId, UserId, WasteId};
pub use locale::Locale;
