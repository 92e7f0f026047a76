use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, NotificationId, RawNumber};
use stockroom_infra::services::NotificationTarget;
use stockroom_inventory::{
    ActivityEntry, Category, InventoryItem, Localizer, MovementKind,
    MovementRequest, StockStatus,
};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

/// Movement submission body.
#[derive(Debug, Deserialize)]
pub struct SubmitMovementRequest {
    pub item_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub quantity: Option<RawNumber>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl SubmitMovementRequest {
    pub fn into_parts(self) -> Result<(ItemId, MovementRequest), axum::response::Response> {
        let item_id = parse_id::<ItemId>(self.item_id.as_deref(), "item")?;
        Ok((
            item_id,
            MovementRequest {
                kind: self.kind,
                quantity: self.quantity.unwrap_or_else(|| RawNumber::from("")),
                reason: self.reason,
            },
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MovementListQuery {
    pub item_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<usize>,
}

/// `{"id": <uuid>|"all", "read": bool}`
#[derive(Debug, Deserialize)]
pub struct MarkNotificationsRequest {
    pub id: String,
    #[serde(default = "default_read")]
    pub read: bool,
}

fn default_read() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct DeleteNotificationsQuery {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

// -------------------------
// Response DTOs
// -------------------------

/// An item with its derived stock health.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub status: StockStatus,
    pub status_label: &'static str,
    pub percentage: Decimal,
    pub total_value: Decimal,
}

impl ItemResponse {
    pub fn new(item: InventoryItem, texts: &Localizer) -> Self {
        let health = item.health();
        Self {
            status: health.status,
            status_label: health.status.label(texts.locale()),
            percentage: health.percentage,
            total_value: item.value(),
            item,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(flatten)]
    pub entry: ActivityEntry,
    pub label: &'static str,
}

impl ActivityResponse {
    pub fn new(entry: ActivityEntry, texts: &Localizer) -> Self {
        Self {
            label: entry.action.label(texts.locale()),
            entry,
        }
    }
}

// -------------------------
// Parsing helpers
// -------------------------

/// Unwrap a JSON body, turning malformed input into a 400.
pub fn body<T>(payload: Result<axum::Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload.map(|axum::Json(v)| v).map_err(|rejection| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )
    })
}

/// Unwrap query parameters, turning malformed input into a 400.
pub fn query<T>(params: Result<axum::extract::Query<T>, QueryRejection>) -> Result<T, axum::response::Response> {
    params.map(|axum::extract::Query(v)| v).map_err(|rejection| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )
    })
}

pub fn parse_id<T: std::str::FromStr>(
    raw: Option<&str>,
    what: &str,
) -> Result<T, axum::response::Response> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| errors::invalid_id(what))
}

pub fn parse_optional_id<T: std::str::FromStr>(
    raw: Option<&str>,
    what: &str,
) -> Result<Option<T>, axum::response::Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_id(Some(s), what).map(Some),
        None => Ok(None),
    }
}

pub fn parse_notification_target(raw: &str) -> Result<NotificationTarget, axum::response::Response> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(NotificationTarget::All);
    }
    parse_id::<NotificationId>(Some(raw), "notification").map(NotificationTarget::One)
}

fn unknown_filter(name: &str, value: &str) -> axum::response::Response {
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("unknown {name} `{value}`"),
    )
}

pub fn parse_category(raw: Option<&str>) -> Result<Option<Category>, axum::response::Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Category::parse(s)
            .map(Some)
            .ok_or_else(|| unknown_filter("category", s)),
        None => Ok(None),
    }
}

pub fn parse_status(raw: Option<&str>) -> Result<Option<StockStatus>, axum::response::Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => StockStatus::parse(s)
            .map(Some)
            .ok_or_else(|| unknown_filter("status", s)),
        None => Ok(None),
    }
}

pub fn parse_kind(raw: Option<&str>) -> Result<Option<MovementKind>, axum::response::Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => MovementKind::parse(s)
            .map(Some)
            .ok_or_else(|| unknown_filter("type", s)),
        None => Ok(None),
    }
}
