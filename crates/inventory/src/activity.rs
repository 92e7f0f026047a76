use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{ActivityId, Entity, ItemId, Locale};

use crate::movement::MovementKind;

/// What a user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Add,
    Update,
    Delete,
    Restock,
    Outflow,
    Waste,
    Adjustment,
}

impl ActivityAction {
    pub const ALL: [ActivityAction; 7] = [
        ActivityAction::Add,
        ActivityAction::Update,
        ActivityAction::Delete,
        ActivityAction::Restock,
        ActivityAction::Outflow,
        ActivityAction::Waste,
        ActivityAction::Adjustment,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ActivityAction::Add => "add",
            ActivityAction::Update => "update",
            ActivityAction::Delete => "delete",
            ActivityAction::Restock => "restock",
            ActivityAction::Outflow => "outflow",
            ActivityAction::Waste => "waste",
            ActivityAction::Adjustment => "adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|a| a.code() == s)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, ActivityAction::Add) => "Item adicionado",
            (Locale::PtBr, ActivityAction::Update) => "Item atualizado",
            (Locale::PtBr, ActivityAction::Delete) => "Item removido",
            (Locale::PtBr, ActivityAction::Restock) => "Reabastecimento",
            (Locale::PtBr, ActivityAction::Outflow) => "Saída",
            (Locale::PtBr, ActivityAction::Waste) => "Desperdício",
            (Locale::PtBr, ActivityAction::Adjustment) => "Ajuste",
            (Locale::En, ActivityAction::Add) => "Item added",
            (Locale::En, ActivityAction::Update) => "Item updated",
            (Locale::En, ActivityAction::Delete) => "Item removed",
            (Locale::En, ActivityAction::Restock) => "Restock",
            (Locale::En, ActivityAction::Outflow) => "Outflow",
            (Locale::En, ActivityAction::Waste) => "Waste",
            (Locale::En, ActivityAction::Adjustment) => "Adjustment",
        }
    }
}

impl From<MovementKind> for ActivityAction {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::Entrada => ActivityAction::Restock,
            MovementKind::Saida => ActivityAction::Outflow,
            MovementKind::Desperdicio => ActivityAction::Waste,
            MovementKind::Ajuste => ActivityAction::Adjustment,
        }
    }
}

/// Human-readable audit trail entry. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: ActivityId,
    /// `None` once the subject no longer exists (deletions).
    pub item_id: Option<ItemId>,
    pub action: ActivityAction,
    pub quantity: Option<Decimal>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(
        item_id: Option<ItemId>,
        action: ActivityAction,
        quantity: Option<Decimal>,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            item_id,
            action,
            quantity,
            description,
            created_at: now,
        }
    }
}

impl Entity for ActivityEntry {
    type Id = ActivityId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
